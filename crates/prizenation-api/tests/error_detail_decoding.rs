// SPDX-License-Identifier: Apache-2.0

use prizenation_api::{decode_detail, ApiError};
use serde_json::json;

#[test]
fn string_detail_is_used_verbatim() {
    let err = ApiError::from_response_body(400, br#"{"detail":"Invalid coupon code"}"#);
    assert_eq!(err.status, Some(400));
    assert_eq!(err.user_message("fallback"), "Invalid coupon code");
    assert_eq!(err.to_string(), "HTTP 400: Invalid coupon code");
}

#[test]
fn pydantic_array_detail_is_joined_per_line() {
    let body = json!({
        "detail": [
            {"loc": ["body", "price"], "msg": "value is not a valid float", "type": "type_error.float"},
            {"loc": ["body", "instant_wins", 0, "qty"], "msg": "field required"}
        ]
    });
    let err = ApiError::from_response_body(422, body.to_string().as_bytes());
    assert_eq!(
        err.user_message("Failed to save competition"),
        "body.price: value is not a valid float\nbody.instant_wins.0.qty: field required"
    );
}

#[test]
fn object_detail_is_stringified() {
    let detail = json!({"reason": "sold out", "left": 0});
    assert_eq!(
        decode_detail(&detail).expect("message"),
        r#"{"left":0,"reason":"sold out"}"#
    );
}

#[test]
fn missing_detail_uses_fallback() {
    let err = ApiError::from_response_body(500, br#"{"error":"boom"}"#);
    assert_eq!(err.message, None);
    assert_eq!(err.user_message("Failed to save competition"), "Failed to save competition");
    assert_eq!(err.details["error"], "boom");
}
