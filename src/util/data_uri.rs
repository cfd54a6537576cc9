//! Inline `data:` URIs for buffer payloads.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Scheme marker prepended to every inline buffer reference.
pub const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Encode raw bytes as a self-contained `data:` URI.
///
/// Never fails; an empty slice yields the bare prefix.
pub fn encode_data_uri(data: &[u8]) -> String {
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + data.len().div_ceil(3) * 4);
    uri.push_str(DATA_URI_PREFIX);
    STANDARD.encode_string(data, &mut uri);
    uri
}

/// Decode a base64 `data:` URI into its media type and payload.
///
/// Returns `None` for anything that is not a well-formed base64 data URI.
pub fn decode_data_uri(uri: &str) -> Option<(&str, Vec<u8>)> {
    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])?;
    let (param, value) = rest.split_once(',')?;
    let (mime, encoding) = param.rsplit_once(';')?;
    if !encoding.eq_ignore_ascii_case("base64") {
        return None;
    }
    let data = STANDARD.decode(value).ok()?;
    Some((mime, data))
}

/// Check whether a URI embeds its payload.
#[inline]
pub fn is_data_uri(uri: &str) -> bool {
    uri.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}
