//! Integration tests for the PassVault crypto module.

use passvault::crypto::kdf::{stretch, MIN_MEMORY_KIB};
use passvault::crypto::keys::{derive, verify};
use passvault::crypto::{generate_password, generate_salt, open, seal, Argon2Params};

/// Cheapest params the vault accepts; keeps the suite fast.
fn fast_params() -> Argon2Params {
    Argon2Params {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Body encryption
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip_with_header_bound() {
    let key = [0xABu8; 32];
    let header = br#"{"version":1}"#;
    let body = br#"[{"website":"example.com","password":"Tr0ub4dor&3zz"}]"#;

    let sealed = seal(&key, body, header).expect("seal");
    // 12-byte nonce + 16-byte tag around the ciphertext.
    assert_eq!(sealed.len(), body.len() + 12 + 16);

    assert_eq!(open(&key, &sealed, header).expect("open"), body);
}

#[test]
fn each_seal_uses_a_fresh_nonce() {
    let key = [0xCDu8; 32];
    let a = seal(&key, b"same", b"").unwrap();
    let b = seal(&key, b"same", b"").unwrap();
    assert_ne!(a, b, "two seals of the same plaintext must differ");
}

#[test]
fn open_rejects_wrong_key_or_swapped_header() {
    let key = [0x11u8; 32];
    let sealed = seal(&key, b"secret", b"header-a").unwrap();

    assert!(open(&[0x22u8; 32], &sealed, b"header-a").is_err());
    assert!(open(&key, &sealed, b"header-b").is_err());
}

#[test]
fn open_rejects_truncated_input() {
    let key = [0x33u8; 32];
    assert!(open(&key, &[0u8; 10], b"").is_err());
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn stretch_is_deterministic_for_same_inputs() {
    let salt = generate_salt();
    let a = stretch(b"abc123XY!", &salt, &fast_params()).unwrap();
    let b = stretch(b"abc123XY!", &salt, &fast_params()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn salts_are_random() {
    assert_ne!(generate_salt(), generate_salt());
}

#[test]
fn verifier_accepts_only_the_right_master_key() {
    let salt = generate_salt();
    let material = derive("abc123XY!", &salt, &fast_params()).unwrap();

    assert!(verify("abc123XY!", &salt, &fast_params(), &material.verifier));
    assert!(!verify("abc123XY?", &salt, &fast_params(), &material.verifier));
}

#[test]
fn verifier_does_not_leak_the_working_key() {
    let salt = generate_salt();
    let material = derive("abc123XY!", &salt, &fast_params()).unwrap();
    assert_ne!(&material.verifier, material.working_key.as_bytes());
}

#[test]
fn different_salts_give_different_working_keys() {
    let a = derive("abc123XY!", &generate_salt(), &fast_params()).unwrap();
    let b = derive("abc123XY!", &generate_salt(), &fast_params()).unwrap();
    assert_ne!(a.working_key.as_bytes(), b.working_key.as_bytes());
}

#[test]
fn weak_kdf_params_are_rejected() {
    let params = Argon2Params {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };
    assert!(derive("abc123XY!", &generate_salt(), &params).is_err());
}

// ---------------------------------------------------------------------------
// Password generator
// ---------------------------------------------------------------------------

#[test]
fn generated_passwords_have_requested_length() {
    for len in [8, 24, 256] {
        assert_eq!(generate_password(len).unwrap().chars().count(), len);
    }
}

#[test]
fn generator_rejects_out_of_range_lengths() {
    assert!(generate_password(7).is_err());
    assert!(generate_password(257).is_err());
}
