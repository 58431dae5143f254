//! Output formatting for route rendering.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use freightlane_lib::{
    to_geojson, Route, RouteRenderMode, RouteSummary, ValidationReport,
};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary.
    #[default]
    Text,
    /// Markdown-flavoured summary.
    Rich,
    /// Compact manifest note.
    Note,
    /// Route and validation report as JSON.
    Json,
    /// Dateline-safe GeoJSON feature collection.
    Geojson,
}

impl OutputFormat {
    fn render_mode(self) -> Option<RouteRenderMode> {
        match self {
            OutputFormat::Text => Some(RouteRenderMode::PlainText),
            OutputFormat::Rich => Some(RouteRenderMode::RichText),
            OutputFormat::Note => Some(RouteRenderMode::Note),
            OutputFormat::Json | OutputFormat::Geojson => None,
        }
    }

    /// Whether the output is machine-readable JSON.
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Geojson)
    }
}

#[derive(Serialize)]
struct RouteDocument<'a> {
    route: &'a Route,
    validation: &'a ValidationReport,
}

/// Render a planned route and its report in the requested format.
pub fn render_route(route: &Route, report: &ValidationReport, format: OutputFormat) -> Result<String> {
    if let Some(mode) = format.render_mode() {
        let summary =
            RouteSummary::from_route(route, report).context("failed to summarise route")?;
        return Ok(summary.render(mode));
    }

    let json = match format {
        OutputFormat::Geojson => serde_json::to_string_pretty(&to_geojson(route)),
        _ => serde_json::to_string_pretty(&RouteDocument {
            route,
            validation: report,
        }),
    }
    .context("failed to serialise route")?;
    Ok(format!("{json}\n"))
}
