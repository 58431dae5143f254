//! Port catalog listing.

use std::fmt::Write;

use anyhow::{Context, Result};

use freightlane_lib::PortCatalog;

use crate::output::OutputFormat;

/// Render the catalog as an aligned table, or as JSON for JSON formats.
pub fn handle_ports(catalog: &PortCatalog, format: OutputFormat) -> Result<String> {
    if format.is_json() {
        let json = serde_json::to_string_pretty(catalog.entries())
            .context("failed to serialise port catalog")?;
        return Ok(format!("{json}\n"));
    }

    let width = catalog
        .entries()
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{} ports", catalog.len());
    for entry in catalog.entries() {
        let _ = writeln!(
            buffer,
            "{:<width$}  {:>8.3} {:>9.3}  {}",
            entry.name,
            entry.coordinate.lat,
            entry.coordinate.lon,
            entry.country,
            width = width
        );
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_builtin_port() {
        let text = handle_ports(PortCatalog::builtin(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("23 ports\n"));
        assert_eq!(text.lines().count(), 24);
        assert!(text.contains("Buenaventura"));
    }

    #[test]
    fn json_lists_countries() {
        let text = handle_ports(PortCatalog::builtin(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["name"], "Rotterdam");
        assert_eq!(value[1]["country"], "Netherlands");
    }
}
