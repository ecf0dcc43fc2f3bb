use std::collections::HashSet;
use std::sync::OnceLock;

use proptest::prelude::*;

use strongbox_core::analyzer::password_score;
use strongbox_core::crypto::{self, EncryptionKey, Salt};
use strongbox_core::storage::PlaintextRecord;
use strongbox_core::StrongboxError;

fn shared_key() -> &'static EncryptionKey {
    static KEY: OnceLock<EncryptionKey> = OnceLock::new();
    KEY.get_or_init(|| {
        crypto::derive_key("property-test-master", Salt::generate().as_bytes())
            .expect("derive should succeed")
    })
}

fn other_key() -> &'static EncryptionKey {
    static KEY: OnceLock<EncryptionKey> = OnceLock::new();
    KEY.get_or_init(|| {
        crypto::derive_key("a-different-master", Salt::generate().as_bytes())
            .expect("derive should succeed")
    })
}

fn arb_record() -> impl Strategy<Value = PlaintextRecord> {
    (
        ".{0,40}",
        ".{0,64}",
        proptest::option::of(".{0,24}"),
        proptest::option::of(".{0,200}"),
    )
        .prop_map(|(name, password, username, notes)| {
            let mut record = PlaintextRecord::new(name, password);
            record.username = username;
            record.notes = notes;
            record
        })
}

#[test]
fn many_encryptions_give_distinct_nonces() {
    const N: usize = 64;
    let record = PlaintextRecord::new("Mail", "same-password-every-time");

    let mut nonces = HashSet::new();
    let mut ciphertexts = HashSet::new();
    for _ in 0..N {
        let payload = crypto::encrypt(&record, shared_key()).unwrap();
        nonces.insert(payload.nonce);
        ciphertexts.insert(payload.ciphertext);
    }

    assert_eq!(nonces.len(), N);
    assert_eq!(ciphertexts.len(), N);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decrypt_inverts_encrypt(record in arb_record()) {
        let payload = crypto::encrypt(&record, shared_key()).unwrap();
        let opened = crypto::decrypt(&payload.ciphertext, &payload.nonce, shared_key()).unwrap();
        prop_assert_eq!(opened, record);
    }

    #[test]
    fn repeated_encryption_never_reuses_nonce(record in arb_record()) {
        let first = crypto::encrypt(&record, shared_key()).unwrap();
        let second = crypto::encrypt(&record, shared_key()).unwrap();
        prop_assert_ne!(first.nonce, second.nonce);
        prop_assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn wrong_key_is_rejected(record in arb_record()) {
        let payload = crypto::encrypt(&record, shared_key()).unwrap();
        let result = crypto::decrypt(&payload.ciphertext, &payload.nonce, other_key());
        prop_assert!(matches!(result, Err(StrongboxError::Decryption(_))));
    }

    #[test]
    fn score_is_bounded(password in ".{0,80}") {
        prop_assert!(password_score(&password) <= 100);
    }

    #[test]
    fn appending_a_new_class_never_lowers_score(password in "[a-z]{8,20}") {
        let base = password_score(&password);
        let with_digit = password_score(&format!("{}7", password));
        prop_assert!(with_digit >= base);
    }
}
