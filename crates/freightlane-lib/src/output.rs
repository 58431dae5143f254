use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::route::{Route, RouteKind, SegmentMode};
use crate::validate::ValidationReport;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    /// Compact multi-line note suitable for a shipping manifest.
    Note,
}

/// One segment line within a [`RouteSummary`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummarySegment {
    pub index: usize,
    pub mode: SegmentMode,
    pub description: String,
    pub distance_km: f64,
    pub waypoints: usize,
    pub fallback: bool,
}

/// Display-oriented view of a route and its validation report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub kind: RouteKind,
    pub description: String,
    pub total_distance_km: f64,
    pub total_waypoints: usize,
    pub segments: Vec<SummarySegment>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl RouteSummary {
    /// Combine a route with its validation report.
    pub fn from_route(route: &Route, report: &ValidationReport) -> Result<Self> {
        if route.segments.is_empty() {
            return Err(Error::EmptyPlan);
        }

        let segments = route
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| SummarySegment {
                index: index + 1,
                mode: segment.mode,
                description: segment.description.clone(),
                distance_km: segment.distance_km,
                waypoints: segment.waypoint_count(),
                fallback: segment.is_fallback(),
            })
            .collect();

        Ok(Self {
            kind: route.kind,
            description: route.description.clone(),
            total_distance_km: route.total_distance_km,
            total_waypoints: route.total_waypoints,
            segments,
            warnings: report.warnings.clone(),
            suggestions: report.suggestions.clone(),
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{} ({:.0} km, {} segments, {} waypoints)",
            self.description,
            self.total_distance_km,
            self.segments.len(),
            self.total_waypoints
        );
        for segment in &self.segments {
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({:.0} km, {} waypoints){}",
                segment.index,
                segment.description,
                segment.distance_km,
                segment.waypoints,
                if segment.fallback { " [straight line]" } else { "" }
            );
        }
        for warning in &self.warnings {
            let _ = writeln!(buffer, "warning: {warning}");
        }
        for suggestion in &self.suggestions {
            let _ = writeln!(buffer, "suggestion: {suggestion}");
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**{}**: _{}_ ({:.0} km)",
            self.kind.label(),
            self.description,
            self.total_distance_km
        );
        for segment in &self.segments {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** `{}` {:.0} km, {} waypoints{}",
                segment.index,
                segment.mode,
                segment.description,
                segment.distance_km,
                segment.waypoints,
                if segment.fallback { " _(straight line)_" } else { "" }
            );
        }
        if !self.warnings.is_empty() {
            let _ = writeln!(buffer, "\n**Warnings**");
            for warning in &self.warnings {
                let _ = writeln!(buffer, "* {warning}");
            }
        }
        if !self.suggestions.is_empty() {
            let _ = writeln!(buffer, "\n**Suggestions**");
            for suggestion in &self.suggestions {
                let _ = writeln!(buffer, "* {suggestion}");
            }
        }
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}:", self.kind.label());
        for segment in &self.segments {
            let _ = writeln!(buffer, "{} {:.0} km", segment.description, segment.distance_km);
        }
        let _ = writeln!(buffer, "Total {:.0} km", self.total_distance_km);
        buffer
    }
}
