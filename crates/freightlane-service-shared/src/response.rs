//! Envelope for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Successful payload plus the metadata problem responses also carry.
///
/// The payload's fields are flattened into the top-level object.
///
/// ```
/// use freightlane_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct PortCount {
///     count: usize,
/// }
///
/// let response = ServiceResponse::new(PortCount { count: 23 }).with_request_id("req-1");
/// let json = serde_json::to_value(&response).unwrap();
/// assert_eq!(json["count"], 23);
/// assert_eq!(json["request_id"], "req-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,

    /// Correlation id, echoed so clients can quote it in bug reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
