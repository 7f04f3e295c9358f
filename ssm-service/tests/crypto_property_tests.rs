//! Property-based tests for the cipher suite, key container, and gates.

use std::sync::Arc;

use proptest::prelude::*;

use ssm_service::error::CryptoError;
use ssm_service::proto::ssm::v1::crypto_request::{KeyInfo, KeyType};
use ssm_service::proto::ssm::v1::crypto_service_server::CryptoService;
use ssm_service::proto::ssm::v1::CryptoRequest;
use ssm_service::{CipherSuite, CryptoServiceImpl, Drek};

fn drek() -> Drek {
    Drek::new([0x42; 32])
}

// =============================================================================
// Property: Seal/Open Round Trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_seal_open_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 16..=4096)) {
        let suite = CipherSuite::Aes256Gcm;
        let key = drek();

        let sealed = suite.seal(&key, &plaintext).unwrap();
        prop_assert_eq!(sealed.len(), plaintext.len() + suite.nonce_len() + suite.tag_len());

        let opened = suite.open(&key, &sealed).unwrap();
        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn prop_sealing_twice_never_repeats(plaintext in prop::collection::vec(any::<u8>(), 16..=64)) {
        let suite = CipherSuite::Aes256Gcm;
        let key = drek();

        let first = suite.seal(&key, &plaintext).unwrap();
        let second = suite.seal(&key, &plaintext).unwrap();
        prop_assert_ne!(first, second);
    }

    #[test]
    fn prop_open_with_different_key_fails(
        plaintext in prop::collection::vec(any::<u8>(), 16..=64),
        other_key in any::<[u8; 32]>().prop_filter("distinct key", |k| *k != [0x42; 32]),
    ) {
        let suite = CipherSuite::Aes256Gcm;
        let sealed = suite.seal(&drek(), &plaintext).unwrap();

        let result = suite.open(&Drek::new(other_key), &sealed);
        prop_assert_eq!(result.unwrap_err(), CryptoError::AuthenticationFailed);
    }
}

// =============================================================================
// Property: Tamper and Truncation Detection
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_any_flipped_bit_fails_authentication(
        plaintext in prop::collection::vec(any::<u8>(), 16..=128),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let suite = CipherSuite::Aes256Gcm;
        let key = drek();

        let mut sealed = suite.seal(&key, &plaintext).unwrap();
        let index = position.index(sealed.len());
        sealed[index] ^= 1 << bit;

        let result = suite.open(&key, &sealed);
        prop_assert_eq!(result.unwrap_err(), CryptoError::AuthenticationFailed);
    }

    #[test]
    fn prop_buffers_shorter_than_overhead_are_malformed(
        garbage in prop::collection::vec(any::<u8>(), 0..28),
    ) {
        let suite = CipherSuite::Aes256Gcm;
        let result = suite.open(&drek(), &garbage);
        prop_assert_eq!(result.unwrap_err(), CryptoError::MalformedCiphertext);
    }
}

// =============================================================================
// Property: Suite Resolution Gates
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_unknown_algorithms_rejected(
        algorithm in "[A-Za-z0-9]{1,12}".prop_filter("not aes", |a| !a.eq_ignore_ascii_case("aes")),
        bits_length in any::<i32>(),
        mode in "[A-Za-z0-9]{1,12}",
    ) {
        let result = CipherSuite::resolve(&algorithm, bits_length, &mode);
        prop_assert_eq!(result.unwrap_err(), CryptoError::UnsupportedAlgorithm);
    }

    #[test]
    fn prop_wrong_key_sizes_rejected(
        bits_length in any::<i32>().prop_filter("not 256", |b| *b != 256),
        mode in "[A-Za-z0-9]{1,12}",
    ) {
        let result = CipherSuite::resolve("AES", bits_length, &mode);
        prop_assert_eq!(result.unwrap_err(), CryptoError::UnsupportedKeySize);
    }

    #[test]
    fn prop_wrong_modes_rejected(
        mode in "[A-Za-z0-9]{1,12}".prop_filter("not gcm", |m| !m.eq_ignore_ascii_case("gcm")),
    ) {
        let result = CipherSuite::resolve("AES", 256, &mode);
        prop_assert_eq!(result.unwrap_err(), CryptoError::UnsupportedMode);
    }

    #[test]
    fn prop_resolution_ignores_ascii_case(case_mask in 0u8..8, mode_mask in 0u8..8) {
        let algorithm = apply_case_mask("aes", case_mask);
        let mode = apply_case_mask("gcm", mode_mask);

        let suite = CipherSuite::resolve(&algorithm, 256, &mode).unwrap();
        prop_assert_eq!(suite, CipherSuite::Aes256Gcm);
    }
}

// =============================================================================
// Property: Buffer Bounds Gate
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_out_of_bounds_buffers_rejected(
        len in prop_oneof![0usize..16, 4097usize..5000],
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let svc = CryptoServiceImpl::new(Arc::new(drek()));
            let request = CryptoRequest {
                version: "1.0".to_string(),
                key_type: KeyType::Encryption as i32,
                key_info: Some(KeyInfo {
                    algorithm: "AES".to_string(),
                    bits_length: 256,
                    mode: "GCM".to_string(),
                }),
                input_buffer: vec![0u8; len],
                input_buffer_size: len as i32,
            };

            let reply = svc
                .encrypt(tonic::Request::new(request))
                .await
                .unwrap()
                .into_inner();
            prop_assert_eq!(reply.status, CryptoError::InputOutOfBounds.code());
            prop_assert_eq!(reply.output_buffer, b"input buffer out of bounds".to_vec());
            Ok(())
        })?;
    }
}

fn apply_case_mask(word: &str, mask: u8) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << i) != 0 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}
