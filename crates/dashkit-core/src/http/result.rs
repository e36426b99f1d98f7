//! The caller-facing result of a call

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one logical call, including all retries and pages.
///
/// `success` reflects the HTTP status range only. A successful call may
/// still carry `errors` (and then no `body`); callers should branch on
/// `success` before trusting either field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub success: bool,
    pub errors: Option<Value>,
    pub body: Option<Value>,
}

impl ApiResult {
    /// `{success: false, errors: None, body: None}`
    pub fn failure() -> Self {
        Self {
            success: false,
            errors: None,
            body: None,
        }
    }

    pub fn into_parts(self) -> (bool, Option<Value>, Option<Value>) {
        (self.success, self.errors, self.body)
    }
}

impl From<ApiResult> for (bool, Option<Value>, Option<Value>) {
    fn from(result: ApiResult) -> Self {
        result.into_parts()
    }
}
