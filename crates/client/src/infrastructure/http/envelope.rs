//! Response envelope used by every backend endpoint.

use serde::Deserialize;

/// The backend wraps every payload as
/// `{ code, message, data, timestamp }`; `code == 200` is success.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl<T> ApiEnvelope<T> {
    pub const SUCCESS: i32 = 200;

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }
}
