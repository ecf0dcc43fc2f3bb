//! # Strongbox Core
//!
//! Client-side encryption core for Strongbox, a zero-knowledge password vault.
//! The master password never leaves the device; storage only ever sees the
//! salt, the authentication hash and encrypted records.
//!
//! ## Architecture
//!
//! - **codec**: base64, UTF-8 and CSPRNG helpers
//! - **crypto**: key derivation, record encryption, master password rules
//! - **session**: the in-memory key holder (locked / unlocked)
//! - **autolock**: inactivity timer that locks a session
//! - **analyzer**: password strength and vault health scoring
//! - **storage**: identity and record stores (memory, JSON file)
//! - **resolver**: remote-then-local identity lookup
//! - **vault**: record CRUD through a session
//! - **generator**: random password generation

pub mod analyzer;
pub mod autolock;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod generator;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod vault;

pub use analyzer::{analyze, classify_password, PasswordStrength, SecurityReport};
pub use autolock::{AutoLockConfig, AutoLockTimer};
pub use error::{Result, StrongboxError};
pub use resolver::{IdentityResolver, TieredIdentityResolver};
pub use session::{SessionState, VaultCredentials, VaultSession};
pub use storage::{IdentityStore, RecordStore};
pub use vault::{DecryptedBatch, RecordVault};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
