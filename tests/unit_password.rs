//! Unit tests for bcrypt hashing and verification.

use classroom_manager::utils::password::{hash_password, verify_password};

// Low cost keeps the suite fast; production cost comes from SALT_ROUNDS.
const COST: u32 = 4;

#[tokio::test]
async fn hash_then_verify_accepts_the_password() {
    let digest = hash_password("correct horse battery staple", COST)
        .await
        .unwrap();

    assert!(verify_password("correct horse battery staple", &digest)
        .await
        .unwrap());
}

#[tokio::test]
async fn verify_rejects_a_wrong_password() {
    let digest = hash_password("s3cret!", COST).await.unwrap();

    assert!(!verify_password("s3cret", &digest).await.unwrap());
    assert!(!verify_password("", &digest).await.unwrap());
}

#[tokio::test]
async fn digest_never_contains_the_plaintext() {
    let digest = hash_password("plaintext-password", COST).await.unwrap();

    assert!(!digest.contains("plaintext-password"));
    assert!(digest.starts_with("$2"));
}

#[tokio::test]
async fn hashing_is_salted() {
    let a = hash_password("same-password", COST).await.unwrap();
    let b = hash_password("same-password", COST).await.unwrap();

    assert_ne!(a, b);
    assert!(verify_password("same-password", &a).await.unwrap());
    assert!(verify_password("same-password", &b).await.unwrap());
}

#[tokio::test]
async fn verify_errors_on_a_malformed_digest() {
    assert!(verify_password("whatever", "not-a-bcrypt-digest")
        .await
        .is_err());
}
