use thiserror::Error;

/// Convenient result alias for the Freightlane library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a location name could not be turned into coordinates.
    #[error("location not found: {name}{}", format_suggestions(.suggestions))]
    LocationNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when segmentation produced no legs to resolve.
    #[error("route plan was empty")]
    EmptyPlan,

    /// Raised by a segment provider that could not produce geometry for a leg.
    ///
    /// The route assembler absorbs this error and substitutes a straight-line
    /// segment; it never reaches callers of [`crate::FreightPlanner::plan_route`].
    #[error("routing provider {provider} unavailable: {reason}")]
    RoutingUnavailable { provider: String, reason: String },

    /// Raised when a coordinate is non-finite or its latitude is out of range.
    #[error("invalid coordinate (lat {lat}, lon {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Raised when a port catalog or gazetteer file fails validation.
    #[error("invalid port catalog: {message}")]
    PortCatalog { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Build a [`Error::RoutingUnavailable`] for the named provider.
    pub fn routing_unavailable(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::RoutingUnavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`Error::LocationNotFound`] without suggestions.
    pub fn location_not_found(name: impl Into<String>) -> Self {
        Error::LocationNotFound {
            name: name.into(),
            suggestions: Vec::new(),
        }
    }

    /// Whether the error aborts a planning request.
    ///
    /// Only provider unavailability is recoverable; it degrades a single
    /// segment to straight-line geometry.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::RoutingUnavailable { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
