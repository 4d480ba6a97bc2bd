//! Grid configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! grid:
//!   window_start: "08:00"
//!   window_end: "18:00"
//!   hour_height_px: 60
//!   day_width_pct: 20
//! palette:
//!   - "rgb(252, 161, 241)"
//!   - "#5b96d2"
//! ```
//!
//! Every key is optional.  A missing `grid` entry falls back to
//! [`GridGeometry::default`] field by field, and a missing `palette` to
//! [`DEFAULT_PALETTE`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::color::{Color, DEFAULT_PALETTE};
use crate::layout::GridGeometry;
use crate::session::ClockTime;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
///
/// Kept private; callers work with [`GridConfig`].
#[derive(Debug, Default, Deserialize)]
struct GridConfigFile {
    #[serde(default)]
    grid: GridSection,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct GridSection {
    window_start: Option<String>,
    window_end: Option<String>,
    hour_height_px: Option<f64>,
    day_width_pct: Option<f64>,
}

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Grid dimensions and color palette for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub geometry: GridGeometry,
    /// Never empty after a successful load.
    pub palette: Vec<Color>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::default(),
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl GridConfig {
    /// Parse and validate the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// describes an unusable grid (see [`validate`](Self::validate)).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading grid configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid grid configuration: {}", path.display()))
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: GridConfigFile = if content.trim().is_empty() {
            GridConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = GridGeometry::default();
        let parse_time = |value: Option<String>, fallback: ClockTime, key: &str| -> Result<ClockTime> {
            match value {
                Some(s) => s
                    .parse::<ClockTime>()
                    .with_context(|| format!("grid.{key}")),
                None => Ok(fallback),
            }
        };

        let geometry = GridGeometry {
            window_start: parse_time(file.grid.window_start, defaults.window_start, "window_start")?,
            window_end: parse_time(file.grid.window_end, defaults.window_end, "window_end")?,
            hour_height_px: file.grid.hour_height_px.unwrap_or(defaults.hour_height_px),
            day_width_pct: file.grid.day_width_pct.unwrap_or(defaults.day_width_pct),
        };

        let palette = match file.palette {
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(i, s)| s.parse::<Color>().with_context(|| format!("palette[{i}]")))
                .collect::<Result<Vec<Color>>>()?,
            None => DEFAULT_PALETTE.to_vec(),
        };

        let config = Self { geometry, palette };
        config.validate()?;

        debug!(
            window_start = %config.geometry.window_start,
            window_end = %config.geometry.window_end,
            hour_height_px = config.geometry.hour_height_px,
            day_width_pct = config.geometry.day_width_pct,
            palette = config.palette.len(),
            "grid configuration"
        );
        Ok(config)
    }

    /// Check that the configuration can drive a layout.
    ///
    /// # Errors
    /// * window start is not before window end
    /// * hour height or day width is not a positive finite number
    /// * the palette is empty
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        if g.window_start >= g.window_end {
            bail!(
                "grid.window_start ({}) must be before grid.window_end ({})",
                g.window_start,
                g.window_end
            );
        }
        if !(g.hour_height_px.is_finite() && g.hour_height_px > 0.0) {
            bail!("grid.hour_height_px must be positive, got {}", g.hour_height_px);
        }
        if !(g.day_width_pct.is_finite() && g.day_width_pct > 0.0) {
            bail!("grid.day_width_pct must be positive, got {}", g.day_width_pct);
        }
        if self.palette.is_empty() {
            bail!("palette must contain at least one color");
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r##"
grid:
  window_start: "07:30"
  window_end: "21:00"
  hour_height_px: 48
  day_width_pct: 19.5
palette:
  - "rgb(252, 161, 241)"
  - "#5b96d2"
"##;
        let f = yaml_tempfile(yaml);
        let cfg = GridConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.geometry.window_start.to_string(), "07:30");
        assert_eq!(cfg.geometry.window_end.to_string(), "21:00");
        assert_eq!(cfg.geometry.hour_height_px, 48.0);
        assert_eq!(cfg.geometry.day_width_pct, 19.5);
        assert_eq!(
            cfg.palette,
            vec![Color::rgb(252, 161, 241), Color::rgb(91, 150, 210)]
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let f = yaml_tempfile("grid:\n  hour_height_px: 30\n");
        let cfg = GridConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.geometry.hour_height_px, 30.0);
        assert_eq!(cfg.geometry.window_start, GridGeometry::default().window_start);
        assert_eq!(cfg.geometry.day_width_pct, 20.0);
        assert_eq!(cfg.palette, DEFAULT_PALETTE.to_vec());
    }

    #[test]
    fn empty_file_is_the_default_config() {
        let f = yaml_tempfile("");
        let cfg = GridConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg, GridConfig::default());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = GridConfig::load_from_file(Path::new("/nonexistent/path/grid.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(GridConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn bad_time_is_rejected_with_key_in_message() {
        let err = GridConfig::from_yaml_str("grid:\n  window_end: \"25:00\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("grid.window_end"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let yaml = "grid:\n  window_start: \"18:00\"\n  window_end: \"08:00\"\n";
        assert!(GridConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        assert!(GridConfig::from_yaml_str("grid:\n  hour_height_px: 0\n").is_err());
        assert!(GridConfig::from_yaml_str("grid:\n  day_width_pct: -5\n").is_err());
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(GridConfig::from_yaml_str("palette: []\n").is_err());
    }

    #[test]
    fn bad_palette_entry_names_its_index() {
        let err = GridConfig::from_yaml_str("palette:\n  - \"#ffffff\"\n  - \"teal\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("palette[1]"));
    }
}
