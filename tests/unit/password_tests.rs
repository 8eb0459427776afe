//! Unit tests for password hashing through the public API
use backend_lib::auth::{
    validate_password_strength, PasswordEncoder, PasswordError, PasswordRequirements,
    MAX_HASH_COST, MIN_HASH_COST,
};

#[test]
fn test_hash_and_verify() {
    let encoder = PasswordEncoder::new(MIN_HASH_COST).unwrap();
    let hash = encoder.hash("secret").unwrap();

    assert!(hash.starts_with("$scrypt$"));
    assert!(!hash.contains("secret"));
    assert!(encoder.verify(&hash, "secret"));
    assert!(!encoder.verify(&hash, "Secret"));
}

#[test]
fn test_salts_differ() {
    let encoder = PasswordEncoder::new(MIN_HASH_COST).unwrap();
    assert_ne!(encoder.hash("secret").unwrap(), encoder.hash("secret").unwrap());
}

#[test]
fn test_hash_from_other_cost_still_verifies() {
    let low = PasswordEncoder::new(MIN_HASH_COST).unwrap();
    let higher = PasswordEncoder::new(MIN_HASH_COST + 1).unwrap();
    let hash = low.hash("secret").unwrap();
    assert!(higher.verify(&hash, "secret"));
}

#[test]
fn test_malformed_hash_never_verifies() {
    let encoder = PasswordEncoder::new(MIN_HASH_COST).unwrap();
    assert!(!encoder.verify("", "secret"));
    assert!(!encoder.verify("plaintext", "plaintext"));
}

#[test]
fn test_cost_bounds() {
    assert!(matches!(
        PasswordEncoder::new(MIN_HASH_COST - 1),
        Err(PasswordError::InvalidCost(_))
    ));
    assert!(matches!(
        PasswordEncoder::new(MAX_HASH_COST + 1),
        Err(PasswordError::InvalidCost(_))
    ));
}

#[test]
fn test_strength_policy() {
    let requirements = PasswordRequirements::default();
    assert!(validate_password_strength("correct-Horse-7", &requirements));
    assert!(!validate_password_strength("short", &requirements));
}
