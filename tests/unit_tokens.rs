//! Unit tests for the opaque reset-token lifecycle: issue, supersede,
//! single-use consumption, expiry.

use chrono::{Duration, Utc};
use uuid::Uuid;

use classroom_manager::store::CredentialStore;
use classroom_manager::store::memory::MemoryCredentialStore;
use classroom_manager::utils::token::{
    ResetTokenError, activation_token_ttl, consume_reset_token, issue_reset_token, reset_token_ttl,
};

#[tokio::test]
async fn issued_token_is_live_and_consumable() {
    let store = MemoryCredentialStore::new();
    let user_id = Uuid::new_v4();

    let reset = issue_reset_token(&store, user_id, reset_token_ttl())
        .await
        .unwrap();
    assert_eq!(reset.token.len(), 64);
    assert!(reset.used_at.is_none());

    let now = Utc::now();
    let consumed = consume_reset_token(&store, &reset.token, now).await.unwrap();
    assert_eq!(consumed.id, reset.id);
    assert_eq!(consumed.user_id, user_id);
    assert_eq!(consumed.used_at, Some(now));

    // The store record is stamped too, not just the returned copy.
    let stored = store.find_reset_by_token(&reset.token).await.unwrap();
    assert_eq!(stored.unwrap().used_at, Some(now));
}

#[tokio::test]
async fn consumption_is_single_use() {
    let store = MemoryCredentialStore::new();
    let reset = issue_reset_token(&store, Uuid::new_v4(), reset_token_ttl())
        .await
        .unwrap();

    consume_reset_token(&store, &reset.token, Utc::now())
        .await
        .unwrap();

    let err = consume_reset_token(&store, &reset.token, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ResetTokenError::AlreadyUsed));
}

#[tokio::test]
async fn marking_used_succeeds_exactly_once() {
    let store = MemoryCredentialStore::new();
    let reset = issue_reset_token(&store, Uuid::new_v4(), reset_token_ttl())
        .await
        .unwrap();

    // Two consumers racing on the same record: only one stamp lands.
    let now = Utc::now();
    assert!(store.mark_reset_used(reset.id, now).await.unwrap());
    assert!(!store.mark_reset_used(reset.id, now).await.unwrap());

    let stored = store
        .find_reset_by_token(&reset.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.used_at, Some(now));
}

#[tokio::test]
async fn expired_token_is_rejected_unused() {
    let store = MemoryCredentialStore::new();
    let reset = issue_reset_token(&store, Uuid::new_v4(), reset_token_ttl())
        .await
        .unwrap();

    let later = Utc::now() + Duration::hours(2);
    let err = consume_reset_token(&store, &reset.token, later)
        .await
        .unwrap_err();
    assert!(matches!(err, ResetTokenError::Expired));

    // Expiry does not mark the record used.
    let stored = store.find_reset_by_token(&reset.token).await.unwrap();
    assert!(stored.unwrap().used_at.is_none());
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let store = MemoryCredentialStore::new();

    let err = consume_reset_token(&store, "0".repeat(64).as_str(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ResetTokenError::NotFound));
}

#[tokio::test]
async fn issuing_supersedes_the_previous_token() {
    let store = MemoryCredentialStore::new();
    let user_id = Uuid::new_v4();

    let first = issue_reset_token(&store, user_id, activation_token_ttl())
        .await
        .unwrap();
    let second = issue_reset_token(&store, user_id, reset_token_ttl())
        .await
        .unwrap();
    assert_ne!(first.token, second.token);

    let now = Utc::now();
    let live = store.live_resets_for_user(user_id, now).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token, second.token);

    // Both records remain; the first one is just no longer live.
    assert_eq!(store.all_resets().await.len(), 2);

    let err = consume_reset_token(&store, &first.token, now).await.unwrap_err();
    assert!(matches!(err, ResetTokenError::AlreadyUsed));
    consume_reset_token(&store, &second.token, now).await.unwrap();
}

#[tokio::test]
async fn tokens_for_other_users_are_untouched_by_supersession() {
    let store = MemoryCredentialStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let alice_reset = issue_reset_token(&store, alice, reset_token_ttl())
        .await
        .unwrap();
    issue_reset_token(&store, bob, reset_token_ttl())
        .await
        .unwrap();

    consume_reset_token(&store, &alice_reset.token, Utc::now())
        .await
        .unwrap();
    assert_eq!(store.live_resets_for_user(bob, Utc::now()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn activation_ttl_is_longer_than_reset_ttl() {
    assert_eq!(activation_token_ttl(), Duration::hours(24));
    assert_eq!(reset_token_ttl(), Duration::hours(1));
}
