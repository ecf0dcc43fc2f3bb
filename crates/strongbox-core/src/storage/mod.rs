//! Storage abstraction for Strongbox.
//!
//! This module defines the storage collaborator traits and the persisted
//! data model.
//!
//! ## Architecture
//!
//! The storage layer is backend-agnostic:
//! - `MemoryStore`: in-process maps (tests, local identity cache)
//! - `JsonFileStore`: a single JSON document written atomically
//! - Anything else (remote database, browser storage) implements the same traits
//!
//! ## Security
//!
//! Storage never sees plaintext or keys. It must keep the base64
//! `ciphertext`/`nonce` text of each record exactly as written; any change
//! makes the record permanently undecryptable.

pub mod json_file;
pub mod memory;
pub mod traits;
pub mod types;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{IdentityStore, RecordStore};
pub use types::{
    Category, DecryptedRecord, EncryptedRecord, NewRecord, PlaintextRecord, RecordFilter,
    VaultIdentity,
};
