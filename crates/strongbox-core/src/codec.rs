//! Binary/text conversions and secure randomness.
//!
//! Everything persisted by the vault (salts, auth hashes, nonces,
//! ciphertexts) travels as standard padded base64 text. Storage must keep
//! these strings byte-for-byte.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, StrongboxError};

/// Encode bytes as standard base64 text.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64 text.
///
/// # Errors
///
/// Returns `StrongboxError::Format` on malformed input. No whitespace
/// trimming is performed.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.as_bytes())
        .map_err(|e| StrongboxError::Format(format!("invalid base64: {}", e)))
}

/// Decode base64 text into a fixed-size array.
///
/// Malformed text is a `Format` error; well-formed text of the wrong
/// decoded length is `InvalidInput`.
pub fn decode_base64_exact<const N: usize>(text: &str, what: &str) -> Result<[u8; N]> {
    let bytes = decode_base64(text)?;
    bytes.as_slice().try_into().map_err(|_| {
        StrongboxError::InvalidInput(format!(
            "{} must be {} bytes (got {})",
            what,
            N,
            bytes.len()
        ))
    })
}

/// UTF-8 encode text.
pub fn utf8_encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// View UTF-8 bytes as text.
///
/// # Errors
///
/// Returns `StrongboxError::Format` if the bytes are not valid UTF-8.
pub fn utf8_decode(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| StrongboxError::Format(format!("invalid UTF-8: {}", e)))
}

/// Fill a buffer from the operating system CSPRNG.
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Generate `len` bytes from the operating system CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    fill_random(&mut bytes);
    bytes
}
