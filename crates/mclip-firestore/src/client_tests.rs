//! Tests for Firestore client configuration and error mapping.

use std::time::Duration;

use serial_test::serial;

use crate::client::FirestoreConfig;
use crate::error::FirestoreError;
use crate::retry::RetryConfig;

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(emulator_host: Option<&str>) -> FirestoreConfig {
    FirestoreConfig {
        project_id: "test-project".to_string(),
        database_id: "(default)".to_string(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries: 3,
            base_delay_ms: 10,
            max_delay_ms: 100,
        },
        emulator_host: emulator_host.map(str::to_string),
    }
}

fn clear_env() {
    for var in [
        "GCP_PROJECT_ID",
        "FIREBASE_PROJECT_ID",
        "FIRESTORE_DATABASE_ID",
        "FIRESTORE_CONNECT_TIMEOUT_SECS",
        "FIRESTORE_EMULATOR_HOST",
        "FIRESTORE_RETRY_BASE_MS",
        "FIRESTORE_RETRY_MAX_MS",
    ] {
        std::env::remove_var(var);
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
#[serial]
fn test_config_requires_project_id() {
    clear_env();
    assert!(FirestoreConfig::from_env().is_err());

    std::env::set_var("GCP_PROJECT_ID", "");
    assert!(FirestoreConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_config_defaults() {
    clear_env();
    std::env::set_var("FIREBASE_PROJECT_ID", "motion-app");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.project_id, "motion-app");
    assert_eq!(config.database_id, "(default)");
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.retry.base_delay_ms, 100);
    assert_eq!(config.retry.max_delay_ms, 5000);
    assert!(config.emulator_host.is_none());
    clear_env();
}

#[test]
#[serial]
fn test_config_emulator_host() {
    clear_env();
    std::env::set_var("GCP_PROJECT_ID", "demo");
    std::env::set_var("FIRESTORE_EMULATOR_HOST", "localhost:8080");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(
        config.documents_url(),
        "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
    );
    clear_env();
}

#[test]
fn test_documents_url() {
    assert_eq!(
        test_config(None).documents_url(),
        "https://firestore.googleapis.com/v1/projects/test-project/databases/(default)/documents"
    );
    assert_eq!(
        test_config(Some("http://127.0.0.1:9099/")).documents_url(),
        "http://127.0.0.1:9099/v1/projects/test-project/databases/(default)/documents"
    );
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[test]
fn test_error_from_http_status_retryable() {
    let err = FirestoreError::from_http_status(429, "rate limited");
    assert!(matches!(err, FirestoreError::RateLimited(_)));
    assert!(err.is_retryable());

    let err = FirestoreError::from_http_status(503, "service unavailable");
    assert!(matches!(err, FirestoreError::ServerError(503, _)));
    assert!(err.is_retryable());
}

#[test]
fn test_error_from_http_status_terminal() {
    let cases = [
        (400, "bad request"),
        (403, "denied"),
        (404, "not found"),
        (409, "conflict"),
    ];
    for (status, msg) in cases {
        let err = FirestoreError::from_http_status(status, msg);
        assert!(!err.is_retryable(), "{} should not retry", status);
        assert_eq!(err.http_status(), Some(status));
    }
}

#[test]
fn test_retry_after() {
    assert_eq!(FirestoreError::RateLimited(1500).retry_after_ms(), Some(1500));
    assert_eq!(FirestoreError::RateLimited(0).retry_after_ms(), None);
    assert_eq!(
        FirestoreError::ServerError(502, "bad gateway".into()).retry_after_ms(),
        None
    );
}
