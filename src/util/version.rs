//! Source file version formatting.

/// Format a raw FBX version code (e.g. `7400`) as `major.minor`.
///
/// The minor part is the last three decimal digits with trailing zeros
/// removed, so `7400` reads `7.4` and `7510` reads `7.51`.
pub fn format_file_version(raw: u32) -> String {
    let major = raw / 1000;
    let mut minor = raw % 1000;
    while minor != 0 && minor % 10 == 0 {
        minor /= 10;
    }
    format!("{}.{}", major, minor)
}
