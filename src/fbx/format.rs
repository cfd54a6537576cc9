//! Binary FBX format constants.

/// Magic bytes at the start of a binary FBX file.
pub const BINARY_MAGIC: &[u8; 21] = b"Kaydara FBX Binary  \0";

/// Two bytes following the magic (`0x1A 0x00`).
pub const MAGIC_TRAILER: [u8; 2] = [0x1A, 0x00];

/// Offset of the little-endian `u32` version code.
pub const VERSION_OFFSET: usize = 23;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 27;

/// First version whose node records use 64-bit offsets.
pub const WIDE_RECORD_VERSION: u32 = 7500;

/// Prefix of an ASCII FBX file.
pub const ASCII_MARKER: &[u8; 5] = b"; FBX";

/// Deepest record nesting accepted by the reader.
pub const MAX_RECORD_DEPTH: usize = 256;

/// Separator between an object's name and class in `Objects` records.
pub const NAME_CLASS_SEPARATOR: &str = "\0\u{1}";

/// Check whether records of this version use 64-bit offsets.
#[inline]
pub const fn has_wide_records(version: u32) -> bool {
    version >= WIDE_RECORD_VERSION
}

/// Size of a node record header (and of a null record).
#[inline]
pub const fn record_header_size(version: u32) -> usize {
    if has_wide_records(version) {
        25
    } else {
        13
    }
}

/// Array element encodings.
pub mod encoding {
    pub const RAW: u32 = 0;
    pub const ZLIB: u32 = 1;
}
