//! Bearer attachment and the one-shot refresh path against a fake backend.

mod common;

use common::{FakeBackend, PASSWORD};
use pdfkit_link::{
    AuthStore, MemorySessionStorage, PdfLinkError, SessionEvents, SessionExpiredReason,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_bearer_header_matches_store_at_call_time() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    client.files().usage().await.unwrap();

    // Server rotates the token; the store follows without rebuilding the client
    backend.with_state(|s| s.access_token = "a-rotated".into());
    client.auth_store().update_tokens("a-rotated", "r1").unwrap();
    client.files().usage().await.unwrap();

    let seen = backend.with_state(|s| s.seen.clone());
    assert_eq!(seen[0].1.as_deref(), Some("Bearer a1"));
    assert_eq!(seen[1].1.as_deref(), Some("Bearer a-rotated"));
}

#[tokio::test]
async fn test_request_without_token_is_sent_anonymously() {
    let backend = FakeBackend::start().await;
    let client = backend.client(AuthStore::in_memory(), SessionEvents::new());

    let result = client.files().usage().await;

    assert!(matches!(result, Err(PdfLinkError::AuthenticationError(_))));
    let seen = backend.with_state(|s| s.seen.clone());
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, None);
    // Nothing to refresh with, so the refresh endpoint is never hit
    assert_eq!(backend.with_state(|s| s.refresh_calls), 0);
}

#[tokio::test]
async fn test_login_starts_session() {
    let backend = FakeBackend::start().await;
    let storage = MemorySessionStorage::new();
    let client = backend.client(AuthStore::new(storage.clone()), SessionEvents::new());

    let auth = client.login("alice@example.com", PASSWORD).await.unwrap();

    assert_eq!(auth.user.display_name(), "Alice Liddell");
    assert!(client.auth_store().is_authenticated());
    assert_eq!(client.auth_store().access_token().as_deref(), Some("a1"));

    let restarted = AuthStore::new(storage);
    assert!(restarted.load_stored_auth());
    assert_eq!(restarted.user().map(|u| u.email), Some("alice@example.com".into()));
}

#[tokio::test]
async fn test_wrong_password_never_refreshes() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let result = client.login("alice@example.com", "nope").await;

    match result {
        Err(PdfLinkError::AuthenticationError(msg)) => assert_eq!(msg, "Invalid email or password"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(backend.with_state(|s| s.refresh_calls), 0);
    // The existing session is left alone
    assert!(client.auth_store().is_authenticated());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_retried() {
    let backend = FakeBackend::start().await;
    let refreshed = Arc::new(AtomicUsize::new(0));
    let counter = refreshed.clone();
    let events = SessionEvents::new().on_tokens_refreshed(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let client = backend.client_with_session("stale", "r1", events);

    let usage = client.files().usage().await.unwrap();

    assert_eq!(usage.used_bytes, 250);
    assert_eq!(backend.with_state(|s| s.refresh_calls), 1);
    assert_eq!(refreshed.load(Ordering::SeqCst), 1);

    let seen = backend.with_state(|s| s.seen.clone());
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].1.as_deref(), Some("Bearer stale"));
    assert_eq!(seen[1].1.as_deref(), Some("Bearer a2"));

    let store = client.auth_store();
    assert_eq!(store.access_token().as_deref(), Some("a2"));
    assert_eq!(store.refresh_token().as_deref(), Some("r2"));
    assert_eq!(store.user(), Some(common::user_info()));
}

#[tokio::test]
async fn test_second_401_is_not_refreshed_again() {
    let backend = FakeBackend::start().await;
    backend.with_state(|s| s.reject_all_tokens = true);
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let result = client.files().usage().await;

    assert!(matches!(result, Err(PdfLinkError::AuthenticationError(_))));
    assert_eq!(backend.with_state(|s| s.refresh_calls), 1);
    assert_eq!(backend.with_state(|s| s.seen.len()), 2);
    // The refresh itself worked, so the session survives
    assert!(client.auth_store().is_authenticated());
}

#[tokio::test]
async fn test_failed_refresh_forces_logout() {
    let backend = FakeBackend::start().await;
    backend.with_state(|s| s.refresh_fails = true);

    let reasons = Arc::new(Mutex::new(Vec::new()));
    let sink = reasons.clone();
    let events = SessionEvents::new().on_session_expired(move |reason| {
        sink.lock().unwrap().push(reason);
    });

    let storage = MemorySessionStorage::new();
    let store = AuthStore::new(storage.clone());
    store.login(common::user_info(), "stale", "r1").unwrap();
    let client = backend.client(store, events);

    let result = client.files().usage().await;

    match result {
        Err(PdfLinkError::AuthenticationError(msg)) => assert_eq!(msg, "Token expired"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!client.auth_store().is_authenticated());
    assert!(!storage.contains(pdfkit_link::AUTH_STORAGE_KEY));
    assert_eq!(backend.with_state(|s| s.seen.len()), 1);

    let reasons = reasons.lock().unwrap();
    assert_eq!(reasons.len(), 1);
    assert!(matches!(reasons[0], SessionExpiredReason::RefreshFailed(_)));
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    let result = client.files().metadata("missing").await;

    match result {
        Err(PdfLinkError::ServerError {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "File not found");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(backend.with_state(|s| s.seen.len()), 1);
    assert_eq!(backend.with_state(|s| s.refresh_calls), 0);
}

#[tokio::test]
async fn test_logout_revokes_and_clears() {
    let backend = FakeBackend::start().await;
    let client = backend.client_with_session("a1", "r1", SessionEvents::new());

    client.logout().await.unwrap();

    assert_eq!(backend.with_state(|s| s.logout_calls), 1);
    assert!(!client.auth_store().is_authenticated());
}
