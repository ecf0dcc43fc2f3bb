//! Cryptographic operations for Strongbox.
//!
//! This module provides key derivation and record encryption using
//! well-audited RustCrypto crates:
//! - **PBKDF2-HMAC-SHA256** (100,000 iterations) stretches the master password
//! - **HKDF-SHA256** separates the encryption key from the stored verifier
//! - **AES-256-GCM** encrypts each record with a fresh random nonce
//!
//! ## Threat Model
//!
//! We defend against:
//! - A storage backend (remote or local) reading or tampering with records
//! - Offline brute-force attacks on a stolen identity record
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod cipher;
pub mod kdf;
pub mod key;
pub mod passphrase;

pub use cipher::{decrypt, decrypt_batch, encrypt, encrypt_batch, EncryptedPayload, NONCE_LENGTH};
pub use kdf::{derive_key, hash, initialize, unlock, verify, DerivedVault, PBKDF2_ITERATIONS};
pub use key::{AuthHash, EncryptionKey, Salt, KEY_LENGTH, SALT_LENGTH};
pub use passphrase::{validate_master_password, MIN_MASTER_PASSWORD_LENGTH};
