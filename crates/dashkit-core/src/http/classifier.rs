//! Response classification
//!
//! Turns a raw response into an [`ApiResult`]. Two rules are independent of
//! each other:
//!
//! - `success` comes from the status code alone (200..=299).
//! - A JSON object body with a top-level `errors` field yields that field as
//!   `errors` and no body, whatever the status.
//!
//! A body that is empty or not JSON is treated as absent, never as an error.

use serde_json::Value;

use crate::http::result::ApiResult;
use crate::http::transport::RawResponse;

/// Name of the payload field that carries API-level errors
pub const ERRORS_FIELD: &str = "errors";

/// Status codes counted as success
pub fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Decode a body as JSON; anything undecodable is absent
pub fn decode_body(body: &[u8]) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

/// Classify a single response
pub fn classify(response: &RawResponse) -> ApiResult {
    let success = is_success(response.status);

    match decode_body(&response.body) {
        Some(Value::Object(mut map)) if map.contains_key(ERRORS_FIELD) => ApiResult {
            success,
            errors: map.remove(ERRORS_FIELD),
            body: None,
        },
        decoded => ApiResult {
            success,
            errors: None,
            body: decoded,
        },
    }
}
