//! Logical to physical filename mapping.
//!
//! Clients may name files anything: spaces, unicode, slashes, `..`, reserved
//! device names. None of that reaches the filesystem. The physical name is the
//! lowercase hex encoding of the logical name's UTF-8 bytes, which is always a
//! plain `[0-9a-f]+` token and maps back to exactly one logical name.

use crate::error::{Error, Result};

/// Longest logical name in bytes whose encoding fits a 255-byte path component.
pub const MAX_NAME_BYTES: usize = 127;

/// Encode a logical filename into its on-disk name.
///
/// # Errors
///
/// Returns [`Error::InvalidFileName`] for empty names or names longer than
/// [`MAX_NAME_BYTES`].
pub fn encode_name(logical: &str) -> Result<String> {
    if logical.is_empty() {
        return Err(Error::InvalidFileName("name is empty".into()));
    }
    if logical.len() > MAX_NAME_BYTES {
        return Err(Error::InvalidFileName(format!(
            "name is {} bytes, limit is {MAX_NAME_BYTES}",
            logical.len()
        )));
    }
    Ok(hex::encode(logical.as_bytes()))
}

/// Decode an on-disk name back into the logical filename.
///
/// # Errors
///
/// Returns [`Error::UndecodableName`] if `physical` is not hex or does not
/// decode to UTF-8.
pub fn decode_name(physical: &str) -> Result<String> {
    let bytes = hex::decode(physical).map_err(|_| Error::UndecodableName(physical.into()))?;
    String::from_utf8(bytes).map_err(|_| Error::UndecodableName(physical.into()))
}
