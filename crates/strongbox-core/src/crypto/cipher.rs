//! AES-256-GCM record encryption.
//!
//! Records are serialized to canonical JSON, sealed under the session key
//! with a fresh random 12-byte nonce, and returned as base64 text. Every
//! call draws a new nonce, so encrypting the same record twice yields two
//! different ciphertexts.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::key::EncryptionKey;
use crate::codec::{decode_base64, encode_base64, fill_random, utf8_decode, utf8_encode};
use crate::error::{Result, StrongboxError};
use crate::storage::PlaintextRecord;

/// AES-GCM nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Ciphertext and nonce, both base64, as handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub nonce: String,
}

/// Encrypt a record under `key`.
///
/// # Errors
///
/// Returns `StrongboxError::Json` if the record cannot be serialized and
/// `StrongboxError::Crypto` if the cipher rejects the input.
pub fn encrypt(record: &PlaintextRecord, key: &EncryptionKey) -> Result<EncryptedPayload> {
    let json = Zeroizing::new(serde_json::to_string(record)?);
    let plaintext = Zeroizing::new(utf8_encode(&json));
    seal(&plaintext, key)
}

/// Decrypt a stored payload back into a record.
///
/// # Errors
///
/// - `StrongboxError::Format` if either field is not valid base64
/// - `StrongboxError::Decryption` on a wrong key, tag mismatch, bad nonce
///   length, or a payload that is not a record
///
/// Failures are deterministic; retrying with the same inputs is pointless.
pub fn decrypt(ciphertext: &str, nonce: &str, key: &EncryptionKey) -> Result<PlaintextRecord> {
    let plaintext = open(ciphertext, nonce, key)?;
    let not_a_record = || StrongboxError::Decryption("payload is not a vault record".to_string());
    let json = utf8_decode(&plaintext).map_err(|_| not_a_record())?;
    serde_json::from_str(json).map_err(|_| not_a_record())
}

/// Encrypt several records. Stops at the first failure.
pub fn encrypt_batch(
    records: &[PlaintextRecord],
    key: &EncryptionKey,
) -> Result<Vec<EncryptedPayload>> {
    records.iter().map(|record| encrypt(record, key)).collect()
}

/// Decrypt several payloads independently.
///
/// One bad payload does not affect the others; each slot carries its own
/// result.
pub fn decrypt_batch(
    payloads: &[EncryptedPayload],
    key: &EncryptionKey,
) -> Vec<Result<PlaintextRecord>> {
    payloads
        .iter()
        .map(|payload| decrypt(&payload.ciphertext, &payload.nonce, key))
        .collect()
}

fn cipher_for(key: &EncryptionKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| StrongboxError::Crypto(format!("Invalid key length: {}", e)))
}

fn seal(plaintext: &[u8], key: &EncryptionKey) -> Result<EncryptedPayload> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    fill_random(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| StrongboxError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedPayload {
        ciphertext: encode_base64(&ciphertext),
        nonce: encode_base64(&nonce_bytes),
    })
}

fn open(ciphertext: &str, nonce: &str, key: &EncryptionKey) -> Result<Zeroizing<Vec<u8>>> {
    let ciphertext = decode_base64(ciphertext)?;
    let nonce = decode_base64(nonce)?;
    if nonce.len() != NONCE_LENGTH {
        return Err(StrongboxError::Decryption(format!(
            "nonce must be {} bytes (got {})",
            NONCE_LENGTH,
            nonce.len()
        )));
    }

    let cipher = cipher_for(key)?;
    cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| {
            StrongboxError::Decryption("authentication failed (wrong key or corrupted data)".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::KEY_LENGTH;

    fn key(byte: u8) -> EncryptionKey {
        EncryptionKey::from_bytes([byte; KEY_LENGTH])
    }

    fn sample() -> PlaintextRecord {
        PlaintextRecord {
            name: "Mail".to_string(),
            username: Some("me@example.com".to_string()),
            password: "hunter2-but-longer".to_string(),
            url: Some("https://mail.example.com".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = key(1);
        let payload = encrypt(&sample(), &key).unwrap();
        let decrypted = decrypt(&payload.ciphertext, &payload.nonce, &key).unwrap();

        assert_eq!(decrypted, sample());
    }

    #[test]
    fn test_nonce_is_twelve_bytes() {
        let payload = encrypt(&sample(), &key(1)).unwrap();
        assert_eq!(decode_base64(&payload.nonce).unwrap().len(), NONCE_LENGTH);
    }

    #[test]
    fn test_same_input_different_ciphertext() {
        let key = key(1);
        let first = encrypt(&sample(), &key).unwrap();
        let second = encrypt(&sample(), &key).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_ciphertext_hides_plaintext() {
        let payload = encrypt(&sample(), &key(1)).unwrap();
        let raw = decode_base64(&payload.ciphertext).unwrap();
        let needle = b"hunter2";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn test_wrong_key_fails_decryption() {
        let payload = encrypt(&sample(), &key(1)).unwrap();
        let result = decrypt(&payload.ciphertext, &payload.nonce, &key(2));

        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails_decryption() {
        let key = key(1);
        let payload = encrypt(&sample(), &key).unwrap();
        let mut raw = decode_base64(&payload.ciphertext).unwrap();
        let mid = raw.len() / 2;
        raw[mid] ^= 0xFF;

        let result = decrypt(&encode_base64(&raw), &payload.nonce, &key);
        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_swapped_nonce_fails_decryption() {
        let key = key(1);
        let first = encrypt(&sample(), &key).unwrap();
        let second = encrypt(&sample(), &key).unwrap();

        let result = decrypt(&first.ciphertext, &second.nonce, &key);
        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_short_nonce_fails_decryption() {
        let key = key(1);
        let payload = encrypt(&sample(), &key).unwrap();
        let result = decrypt(&payload.ciphertext, &encode_base64(&[0u8; 8]), &key);

        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_malformed_base64_is_format_error() {
        let key = key(1);
        let payload = encrypt(&sample(), &key).unwrap();
        let result = decrypt("%%%", &payload.nonce, &key);

        assert!(matches!(result, Err(StrongboxError::Format(_))));
    }

    #[test]
    fn test_non_record_payload_fails_decryption() {
        let key = key(1);
        let payload = seal(b"[1,2,3]", &key).unwrap();
        let result = decrypt(&payload.ciphertext, &payload.nonce, &key);

        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_non_utf8_payload_fails_decryption() {
        let key = key(1);
        let payload = seal(&[0xff, 0xfe, 0xfd], &key).unwrap();
        let result = decrypt(&payload.ciphertext, &payload.nonce, &key);

        assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn test_decrypt_batch_isolates_failures() {
        let key = key(1);
        let mut payloads = encrypt_batch(&[sample(), sample(), sample()], &key).unwrap();
        payloads[1].nonce = encode_base64(&[0u8; NONCE_LENGTH]);

        let results = decrypt_batch(&payloads, &key);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(StrongboxError::Decryption(_))));
        assert!(results[2].is_ok());
    }
}
