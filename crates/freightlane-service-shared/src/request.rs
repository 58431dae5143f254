//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Longest location name forwarded to resolvers.
pub const MAX_LOCATION_NAME_LEN: usize = 200;

/// Validation performed before a request reaches the planner.
pub trait Validate {
    /// Returns a boxed `ProblemDetails` to keep `Result::Err` small.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/route` and `POST /api/v1/route/geojson`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRouteRequest {
    /// Origin port or place name.
    pub from: String,

    /// Destination port or place name.
    pub to: String,

    /// Cargo weight in kilograms; accepted and validated but not used in planning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_weight_kg: Option<f64>,
}

impl Validate for PlanRouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for (field, value) in [("from", &self.from), ("to", &self.to)] {
            if value.trim().is_empty() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{}' field is required and cannot be empty", field),
                    request_id,
                )));
            }
            if value.chars().count() > MAX_LOCATION_NAME_LEN {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!(
                        "The '{}' field cannot exceed {} characters",
                        field, MAX_LOCATION_NAME_LEN
                    ),
                    request_id,
                )));
            }
        }

        if let Some(weight) = self.cargo_weight_kg {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'cargo_weight_kg' field must be a positive number",
                    request_id,
                )));
            }
        }

        Ok(())
    }
}
