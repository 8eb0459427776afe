//! Compares login latency for an unknown email against a wrong password
//! at the default hash cost.
//!
//! Run this test with:
//! ```text
//! cargo test --release -- --ignored --nocapture performance::login_timing
//! ```
use crate::test_utils::*;
use backend_lib::auth::{PasswordEncoder, DEFAULT_HASH_COST};
use std::time::{Duration, Instant};

async fn average_login(router: &axum::Router, email: &str, rounds: u32) -> Duration {
    let mut total = Duration::ZERO;
    for _ in 0..rounds {
        let started = Instant::now();
        send(router, post_form("/login", &login_body(email, "wrong"), None)).await;
        total += started.elapsed();
    }
    total / rounds
}

#[tokio::test]
#[ignore] // Ignored by default as it runs full-cost scrypt
async fn test_unknown_email_costs_as_much_as_wrong_password() {
    let mut settings = test_settings();
    settings.security.password_hash_cost = DEFAULT_HASH_COST;
    let (_state, router) = setup_app(&settings);
    let rounds = 5;

    let known = average_login(&router, EMAIL, rounds).await;
    let unknown = average_login(&router, "nobody@x.com", rounds).await;

    println!("Login timing (hash cost {DEFAULT_HASH_COST}, {rounds} rounds)");
    println!("  wrong password: {known:?}");
    println!("  unknown email:  {unknown:?}");

    let ratio = unknown.as_secs_f64() / known.as_secs_f64();
    assert!((0.5..2.0).contains(&ratio), "timing ratio {ratio:.2} is too skewed");
}

fn average_verify(encoder: &PasswordEncoder, hash: &str, candidate: &str, rounds: u32) -> Duration {
    let started = Instant::now();
    for _ in 0..rounds {
        assert!(!encoder.verify(hash, candidate));
    }
    started.elapsed() / rounds
}

#[test]
#[ignore] // Ignored by default; statistical and machine dependent
fn test_mismatch_position_does_not_change_verify_time() {
    let encoder = PasswordEncoder::new(12).unwrap();
    let hash = encoder.hash("correct-password-value").unwrap();
    let rounds = 50;

    // warm up
    average_verify(&encoder, &hash, "warm-up", 5);

    let early = average_verify(&encoder, &hash, "Xorrect-password-value", rounds);
    let late = average_verify(&encoder, &hash, "correct-password-valuX", rounds);

    println!("Verify timing ({rounds} rounds)");
    println!("  early mismatch: {early:?}");
    println!("  late mismatch:  {late:?}");

    let ratio = early.as_secs_f64() / late.as_secs_f64();
    assert!((0.8..1.25).contains(&ratio), "timing ratio {ratio:.2} is too skewed");
}
