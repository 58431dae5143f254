//! RFC 9457 Problem Details for HTTP APIs.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use freightlane_lib::Error as LibError;

/// Problem type URI for names no resolver could place.
pub const PROBLEM_LOCATION_NOT_FOUND: &str = "/problems/location-not-found";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for a service that is up but cannot plan yet.
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 Problem Details response body.
///
/// ```
/// use freightlane_service_shared::{ProblemDetails, PROBLEM_LOCATION_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_LOCATION_NOT_FOUND,
///     "Location Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Location 'Rotterdm' not found. Did you mean: 'Rotterdam'?")
/// .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request correlation id of the failing call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Location names the caller may have meant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            suggestions: Vec::new(),
            content_type: PROBLEM_CONTENT_TYPE.to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 Bad Request for malformed or out-of-range input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found for an unresolvable location, listing close catalog names.
    pub fn location_not_found(
        name: &str,
        suggestions: &[String],
        request_id: impl Into<String>,
    ) -> Self {
        let detail = if suggestions.is_empty() {
            format!("Location '{}' not found", name)
        } else {
            let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{}'", s)).collect();
            format!(
                "Location '{}' not found. Did you mean: {}?",
                name,
                quoted.join(", ")
            )
        };

        let mut problem = Self::new(
            PROBLEM_LOCATION_NOT_FOUND,
            "Location Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
        .with_request_id(request_id);
        problem.suggestions = suggestions.to_vec();
        problem
    }

    /// 500 Internal Server Error.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 503 Service Unavailable.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.title, detail),
            None => f.write_str(&self.title),
        }
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(&self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Map a planning error onto a problem response.
///
/// Provider unavailability never reaches this point in practice (the
/// assembler absorbs it), so it is reported as an internal error like any
/// other unexpected failure.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::LocationNotFound { name, suggestions } => {
            ProblemDetails::location_not_found(name, suggestions, request_id)
        }
        LibError::InvalidCoordinate { .. } | LibError::PortCatalog { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::EmptyPlan => {
            ProblemDetails::internal_error("Segmentation produced no legs", request_id)
        }
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
