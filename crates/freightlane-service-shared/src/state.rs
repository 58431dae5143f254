//! Application state shared by axum handlers.

use std::sync::Arc;

use freightlane_lib::{build_planner, FreightPlanner, PlannerConfig, ProviderSettings};
use freightlane_lib::Error as LibError;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The configured port catalog, gazetteer or adapter could not be set up.
    Configuration(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "failed to configure route planner: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::Configuration(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone. The planner holds no per-request state, so every request
/// plans against the same instance concurrently.
///
/// ```ignore
/// use axum::{extract::State, routing::get, Router};
/// use freightlane_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) -> String {
///     format!("{} ports", state.planner().catalog().len())
/// }
///
/// let state = AppState::from_env()?;
/// let app = Router::new().route("/ports", get(handler)).with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    planner: FreightPlanner,
}

impl AppState {
    /// Wire the planner from `FREIGHTLANE_*` environment variables.
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::from_settings(&ProviderSettings::from_env(), PlannerConfig::from_env())
    }

    pub fn from_settings(
        settings: &ProviderSettings,
        config: PlannerConfig,
    ) -> Result<Self, AppStateError> {
        tracing::info!(
            nominatim = settings.nominatim_url.is_some(),
            osrm = settings.osrm_url.is_some(),
            searoute = settings.searoute_dir.is_some(),
            "configuring route planner"
        );
        let planner = build_planner(settings, config)?;
        tracing::info!(ports = planner.catalog().len(), "route planner ready");
        Ok(Self::from_planner(planner))
    }

    /// Wrap an already-built planner, e.g. one over mock providers.
    pub fn from_planner(planner: FreightPlanner) -> Self {
        Self {
            inner: Arc::new(AppStateInner { planner }),
        }
    }

    pub fn planner(&self) -> &FreightPlanner {
        &self.inner.planner
    }

    pub fn port_count(&self) -> usize {
        self.inner.planner.catalog().len()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("port_count", &self.port_count())
            .finish()
    }
}
