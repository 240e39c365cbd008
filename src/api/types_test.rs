use super::*;
use serde_json::json;

// =============================================================================
// Deserialize
// =============================================================================

#[test]
fn success_envelope_deserializes() {
    let body = json!({"success": true, "data": {"code": "X1", "message": "ok"}}).to_string();
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(&body).unwrap();
    match response {
        ApiResponse::Success(data) => assert_eq!(data["code"], "X1"),
        ApiResponse::Failure(_) => panic!("expected success"),
    }
}

#[test]
fn failure_envelope_deserializes() {
    let body = json!({"success": false, "error": {"code": "BAD_CODE", "message": "Invalid code"}})
        .to_string();
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(
        response,
        ApiResponse::Failure(ApiErrorBody::new("BAD_CODE", "Invalid code"))
    );
}

#[test]
fn failure_envelope_ignores_null_data() {
    let body = json!({"success": false, "data": null, "error": {"code": "E", "message": "m"}})
        .to_string();
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert!(!response.is_success());
}

#[test]
fn success_without_data_is_an_error() {
    let body = json!({"success": true}).to_string();
    let parsed = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body);
    assert!(parsed.is_err());
}

#[test]
fn failure_without_error_is_an_error() {
    let body = json!({"success": false}).to_string();
    let parsed = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body);
    assert!(parsed.is_err());
}

#[test]
fn missing_success_tag_is_an_error() {
    let body = json!({"data": {"ok": true}}).to_string();
    let parsed = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body);
    assert!(parsed.is_err());
}

// =============================================================================
// Serialize
// =============================================================================

#[test]
fn success_envelope_serializes_with_tag() {
    let response = ApiResponse::Success(json!({"n": 1}));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"success": true, "data": {"n": 1}}));
}

#[test]
fn failure_envelope_serializes_with_tag() {
    let response: ApiResponse<serde_json::Value> = ApiResponse::failure("E", "m");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value, json!({"success": false, "error": {"code": "E", "message": "m"}}));
}

// =============================================================================
// map
// =============================================================================

#[test]
fn map_transforms_success() {
    let response = ApiResponse::Success(2);
    assert_eq!(response.map(|n| n * 10), ApiResponse::Success(20));
}

#[test]
fn map_passes_failure_through() {
    let response: ApiResponse<i32> = ApiResponse::failure("E", "m");
    let mapped: ApiResponse<String> = response.map(|n| n.to_string());
    assert_eq!(mapped, ApiResponse::failure("E", "m"));
}
