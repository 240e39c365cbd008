use super::*;
use crate::storage::{MemoryTokenStore, TokenStore};
use serde_json::{Value, json};

fn client_with_store(store: Arc<dyn TokenStore>) -> ApiClient {
    ApiClient::new("http://portal.test", store).unwrap()
}

// =============================================================================
// construction
// =============================================================================

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = ApiClient::new("http://portal.test/", Arc::new(MemoryTokenStore::new())).unwrap();
    assert_eq!(client.base_url(), "http://portal.test");
}

#[test]
fn base_url_without_slash_is_kept() {
    let client = client_with_store(Arc::new(MemoryTokenStore::new()));
    assert_eq!(client.base_url(), "http://portal.test");
}

// =============================================================================
// prepare: bearer interceptor
// =============================================================================

#[test]
fn prepare_attaches_bearer_header_when_token_stored() {
    let client = client_with_store(Arc::new(MemoryTokenStore::with_token("tok-9")));
    let request = client.prepare(Method::GET, "/auth/verify", None).build().unwrap();
    assert_eq!(
        request.headers().get("Authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer tok-9")
    );
}

#[test]
fn prepare_sends_unauthenticated_without_token() {
    let client = client_with_store(Arc::new(MemoryTokenStore::new()));
    let request = client.prepare(Method::GET, "/auth/verify", None).build().unwrap();
    assert!(request.headers().get("Authorization").is_none());
}

#[test]
fn prepare_reads_token_at_request_time() {
    let store = Arc::new(MemoryTokenStore::new());
    let client = client_with_store(store.clone());
    store.set("late-token");
    let request = client.prepare(Method::GET, "/auth/verify", None).build().unwrap();
    assert_eq!(
        request.headers().get("Authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer late-token")
    );
}

#[test]
fn prepare_joins_base_url_and_path() {
    let client = client_with_store(Arc::new(MemoryTokenStore::new()));
    let request = client
        .prepare(Method::POST, "/security/validate", Some(&json!({"code": "A"})))
        .build()
        .unwrap();
    assert_eq!(request.url().as_str(), "http://portal.test/security/validate");
    assert_eq!(request.method(), &Method::POST);
}

#[test]
fn prepare_sets_json_body() {
    let client = client_with_store(Arc::new(MemoryTokenStore::new()));
    let request = client
        .prepare(Method::POST, "/security/validate", Some(&json!({"code": "A"})))
        .build()
        .unwrap();
    assert_eq!(
        request.headers().get("Content-Type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

// =============================================================================
// normalize_response
// =============================================================================

#[test]
fn normalize_success_status_with_success_envelope() {
    let body = json!({"success": true, "data": {"id": "1"}}).to_string();
    let response = normalize_response::<Value>(StatusCode::OK, &body);
    assert_eq!(response, ApiResponse::Success(json!({"id": "1"})));
}

#[test]
fn normalize_passes_structured_failure_through_verbatim() {
    let body = json!({"success": false, "error": {"code": "BAD_CODE", "message": "Invalid code"}})
        .to_string();
    let response = normalize_response::<Value>(StatusCode::BAD_REQUEST, &body);
    assert_eq!(response, ApiResponse::failure("BAD_CODE", "Invalid code"));
}

#[test]
fn normalize_passes_failure_through_even_on_success_status() {
    let body = json!({"success": false, "error": {"code": "EXPIRED", "message": "Code expired"}})
        .to_string();
    let response = normalize_response::<Value>(StatusCode::OK, &body);
    assert_eq!(response, ApiResponse::failure("EXPIRED", "Code expired"));
}

#[test]
fn normalize_error_status_without_envelope_is_unknown() {
    let response = normalize_response::<Value>(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    match response {
        ApiResponse::Failure(error) => {
            assert_eq!(error.code, CODE_UNKNOWN_ERROR);
            assert!(error.message.contains("500"));
        }
        ApiResponse::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn normalize_success_status_with_garbage_body_is_unknown() {
    let response = normalize_response::<Value>(StatusCode::OK, "<html>not json</html>");
    match response {
        ApiResponse::Failure(error) => assert_eq!(error.code, CODE_UNKNOWN_ERROR),
        ApiResponse::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn normalize_success_envelope_on_error_status_is_unknown() {
    let body = json!({"success": true, "data": {"id": "1"}}).to_string();
    let response = normalize_response::<Value>(StatusCode::BAD_GATEWAY, &body);
    match response {
        ApiResponse::Failure(error) => assert_eq!(error.code, CODE_UNKNOWN_ERROR),
        ApiResponse::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn normalize_mismatched_data_shape_is_unknown() {
    #[derive(Debug, serde::Deserialize)]
    struct Strict {
        #[allow(dead_code)]
        count: u32,
    }
    let body = json!({"success": true, "data": {"count": "not-a-number"}}).to_string();
    let response = normalize_response::<Strict>(StatusCode::OK, &body);
    assert!(!response.is_success());
}

// =============================================================================
// transport failures
// =============================================================================

#[tokio::test]
async fn refused_connection_becomes_network_failure() {
    // Nothing listens on loopback port 1; the connect is refused outright.
    let client = ApiClient::new("http://127.0.0.1:1", Arc::new(MemoryTokenStore::new())).unwrap();

    let response: ApiResponse<Value> = client.get("/auth/verify").await.unwrap();

    match response {
        ApiResponse::Failure(error) => {
            assert_eq!(error.code, CODE_NETWORK_ERROR);
            assert!(!error.message.is_empty());
        }
        ApiResponse::Success(_) => panic!("expected failure"),
    }
}
