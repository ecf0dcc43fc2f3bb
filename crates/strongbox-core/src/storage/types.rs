//! Core data types for the storage layer.
//!
//! Only [`VaultIdentity`] and [`EncryptedRecord`] are ever persisted.
//! [`PlaintextRecord`] exists transiently between decryption and display,
//! or between input and encryption.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

/// The durable, non-secret account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultIdentity {
    /// Identity key (also the vault identifier)
    pub email: String,

    /// Base64 salt, 16 bytes decoded
    pub salt: String,

    /// Base64 auth hash, 32 bytes decoded
    pub auth_hash: String,

    /// When this identity was registered
    pub created_at: DateTime<Utc>,
}

/// Record category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Login,
    SecureNote,
    ApiKey,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Login => "login",
            Category::SecureNote => "secure_note",
            Category::ApiKey => "api_key",
            Category::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "login" => Some(Category::Login),
            "secure_note" | "note" => Some(Category::SecureNote),
            "api_key" | "apikey" => Some(Category::ApiKey),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted, encrypted record.
///
/// `ciphertext` and `nonce` are opaque base64 text and must be stored
/// byte-for-byte. A fresh nonce accompanies every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Unique identifier for this record
    pub id: Uuid,

    /// Owning vault (the identity email)
    pub vault_id: String,

    /// Base64 AES-GCM ciphertext with tag
    pub ciphertext: String,

    /// Base64 12-byte nonce
    pub nonce: String,

    pub category: Category,

    pub favorite: bool,

    pub created_at: DateTime<Utc>,

    /// Last time the secret content was re-encrypted
    pub updated_at: DateTime<Utc>,
}

/// The logical secret. Never persisted unencrypted.
///
/// Field order is the canonical serialization order.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlaintextRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlaintextRecord {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            username: None,
            password: password.into(),
            url: None,
            notes: None,
        }
    }
}

impl fmt::Debug for PlaintextRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaintextRecord")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Drop for PlaintextRecord {
    fn drop(&mut self) {
        self.password.zeroize();
        if let Some(notes) = self.notes.as_mut() {
            notes.zeroize();
        }
    }
}

/// Builder for creating new records.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub record: PlaintextRecord,
    pub category: Category,
    pub favorite: bool,
}

impl NewRecord {
    pub fn new(record: PlaintextRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }
}

/// A record after decryption, with its storage metadata.
#[derive(Debug, Clone)]
pub struct DecryptedRecord {
    pub id: Uuid,
    pub category: Category,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record: PlaintextRecord,
}

/// Filter applied to decrypted records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub category: Option<Category>,

    pub favorites_only: bool,

    /// Case-insensitive substring of the record name
    pub name_contains: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Whether the record's plaintext metadata passes every set criterion.
    pub fn matches(&self, record: &DecryptedRecord) -> bool {
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        if self.favorites_only && !record.favorite {
            return false;
        }
        if let Some(needle) = &self.name_contains {
            let needle = needle.to_lowercase();
            if !record.record.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
