//! Lookup client against a mock API.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use tx_reconciler::api::{QueryError, QueryStatus};

mod common;

#[tokio::test]
async fn test_token_transfer_amount_and_request_layout() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_backend = seen.clone();
    let api = common::start_programmable_backend(move |request_line| {
        seen_by_backend.lock().unwrap().push(request_line);
        async { (200, common::token_transfer_body("7", "123000", "3")) }
    })
    .await;

    let client = common::test_client(&api.endpoint(), 5);
    let result = client.query("0xabc").await.unwrap();

    assert_eq!(result.transaction_id, "0xabc");
    assert_eq!(result.normalized_amount, Decimal::from(123));
    assert_eq!(result.status, QueryStatus::Success);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], "GET /vipapi/tx/bsc/0xabc?apikey=test-key HTTP/1.1");
}

#[tokio::test]
async fn test_native_value_amount() {
    let api = common::start_programmable_backend(|_| async { (200, common::native_body("0.01234567")) }).await;

    let client = common::test_client(&api.endpoint(), 5);
    let result = client.query("0xnative").await.unwrap();

    assert_eq!(result.normalized_amount, Decimal::from_str("0.01234567").unwrap());
}

#[tokio::test]
async fn test_application_error_is_not_retried() {
    let api = common::start_programmable_backend(|_| async {
        (200, r#"{"code":0,"msg":"transaction not found","data":null}"#.to_string())
    })
    .await;

    let client = common::test_client(&api.endpoint(), 5);
    let err = client.query("0xmissing").await.unwrap_err();

    assert!(matches!(err, QueryError::Api { code: 0, .. }));
    assert_eq!(err.to_string(), "API returned error: code=0, msg=transaction not found");
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_http_status_error_is_not_retried() {
    let api = common::start_programmable_backend(|_| async { (500, "internal error".to_string()) }).await;

    let client = common::test_client(&api.endpoint(), 5);
    let err = client.query("0xabc").await.unwrap_err();

    match err {
        QueryError::HttpStatus { code, body } => {
            assert_eq!(code, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_decode_error_keeps_raw_body() {
    let api = common::start_programmable_backend(|_| async { (200, "<html>busy</html>".to_string()) }).await;

    let client = common::test_client(&api.endpoint(), 5);
    let err = client.query("0xabc").await.unwrap_err();

    match err {
        QueryError::Decode { body, .. } => assert_eq!(body, "<html>busy</html>"),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_malformed_amount_fails_cleanly() {
    let api = common::start_programmable_backend(|_| async { (200, common::token_transfer_body("0", "abc", "18")) }).await;

    let client = common::test_client(&api.endpoint(), 5);
    let err = client.query("0xabc").await.unwrap_err();

    assert!(matches!(err, QueryError::AmountParse(_)));
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_timeouts_are_retried_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let api = common::start_programmable_backend(move |_| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt < 2 {
                // Longer than the client's 1s timeout.
                tokio::time::sleep(Duration::from_millis(1500)).await;
            }
            (200, common::native_body("5"))
        }
    })
    .await;

    let client = common::test_client(&api.endpoint(), 1);
    let result = client.query("0xslow").await.unwrap();

    assert_eq!(result.normalized_amount, Decimal::from(5));
    assert_eq!(api.hits(), 3);
    assert_eq!(client.limiter().recorded(), 3);
}

#[tokio::test]
async fn test_timeouts_exhaust_three_attempts() {
    let api = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        (200, common::native_body("5"))
    })
    .await;

    let client = common::test_client(&api.endpoint(), 1);
    let err = client.query("0xslow").await.unwrap_err();

    assert!(matches!(err, QueryError::Network { transient: true, .. }));
    assert!(err.is_transient());
    assert_eq!(api.hits(), 3);
}

#[tokio::test]
async fn test_tls_handshake_failure_is_not_retried() {
    let api = common::start_programmable_backend(|_| async { (200, common::native_body("5")) }).await;

    // The mock speaks plain HTTP, so the TLS handshake cannot succeed.
    let endpoint = format!("https://{}/vipapi/tx", api.addr);
    let client = common::test_client(&endpoint, 5);
    let err = client.query("0xabc").await.unwrap_err();

    assert!(matches!(err, QueryError::Network { transient: false, .. }));
    assert!(!err.is_transient());
    assert_eq!(api.hits(), 1);
    assert_eq!(client.limiter().recorded(), 1);
}
