//! Identity lookup across storage tiers.
//!
//! The surrounding application may keep identities in a remote service and
//! cache them locally. The core only sees a single [`IdentityResolver`];
//! [`TieredIdentityResolver`] implements the remote-then-local strategy.

use crate::error::Result;
use crate::storage::{IdentityStore, VaultIdentity};

/// Capability to find the identity record for an email.
pub trait IdentityResolver {
    /// # Returns
    ///
    /// Returns `Ok(None)` when no tier knows the identity.
    fn resolve(&mut self, email: &str) -> Result<Option<VaultIdentity>>;
}

impl<S: IdentityStore> IdentityResolver for S {
    fn resolve(&mut self, email: &str) -> Result<Option<VaultIdentity>> {
        self.get_identity(email)
    }
}

/// Remote first, local cache second.
///
/// A remote hit refreshes the local copy. A remote error is logged and the
/// local tier is consulted; an error there is returned.
#[derive(Debug)]
pub struct TieredIdentityResolver<R, L> {
    remote: R,
    local: L,
}

impl<R: IdentityStore, L: IdentityStore> TieredIdentityResolver<R, L> {
    pub fn new(remote: R, local: L) -> Self {
        Self { remote, local }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn into_parts(self) -> (R, L) {
        (self.remote, self.local)
    }
}

impl<R: IdentityStore, L: IdentityStore> IdentityResolver for TieredIdentityResolver<R, L> {
    fn resolve(&mut self, email: &str) -> Result<Option<VaultIdentity>> {
        match self.remote.get_identity(email) {
            Ok(Some(identity)) => {
                if let Err(err) = self.local.put_identity(&identity) {
                    tracing::warn!(error = %err, "failed to refresh local identity cache");
                }
                return Ok(Some(identity));
            }
            Ok(None) => tracing::debug!("identity not found remotely; trying local cache"),
            Err(err) => {
                tracing::warn!(error = %err, "remote identity lookup failed; trying local cache")
            }
        }
        self.local.get_identity(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrongboxError;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn identity(email: &str, salt: &str) -> VaultIdentity {
        VaultIdentity {
            email: email.to_string(),
            salt: salt.to_string(),
            auth_hash: "aGFzaA==".to_string(),
            created_at: Utc::now(),
        }
    }

    struct FailingStore;

    impl IdentityStore for FailingStore {
        fn get_identity(&self, _email: &str) -> Result<Option<VaultIdentity>> {
            Err(StrongboxError::Storage("remote unavailable".to_string()))
        }

        fn put_identity(&mut self, _identity: &VaultIdentity) -> Result<()> {
            Err(StrongboxError::Storage("remote unavailable".to_string()))
        }

        fn delete_identity(&mut self, _email: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_remote_hit_refreshes_local() {
        let mut remote = MemoryStore::new();
        remote.put_identity(&identity("a@example.com", "cmVtb3Rl")).unwrap();
        let mut local = MemoryStore::new();
        local.put_identity(&identity("a@example.com", "c3RhbGU=")).unwrap();

        let mut resolver = TieredIdentityResolver::new(remote, local);
        let found = resolver.resolve("a@example.com").unwrap().unwrap();
        assert_eq!(found.salt, "cmVtb3Rl");

        let cached = resolver.local().get_identity("a@example.com").unwrap().unwrap();
        assert_eq!(cached.salt, "cmVtb3Rl");
    }

    #[test]
    fn test_remote_miss_falls_back_to_local() {
        let mut local = MemoryStore::new();
        local.put_identity(&identity("a@example.com", "bG9jYWw=")).unwrap();

        let mut resolver = TieredIdentityResolver::new(MemoryStore::new(), local);
        let found = resolver.resolve("a@example.com").unwrap().unwrap();
        assert_eq!(found.salt, "bG9jYWw=");
        assert!(resolver.resolve("b@example.com").unwrap().is_none());
    }

    #[test]
    fn test_remote_error_falls_back_to_local() {
        let mut local = MemoryStore::new();
        local.put_identity(&identity("a@example.com", "bG9jYWw=")).unwrap();

        let mut resolver = TieredIdentityResolver::new(FailingStore, local);
        assert!(resolver.resolve("a@example.com").unwrap().is_some());
    }

    #[test]
    fn test_single_store_is_a_resolver() {
        let mut store = MemoryStore::new();
        store.put_identity(&identity("a@example.com", "eA==")).unwrap();
        assert!(store.resolve("a@example.com").unwrap().is_some());
    }
}
