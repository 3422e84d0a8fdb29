//! Settings management

use mosaic_core::{GridError, GridLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Mosaic settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridLayout,
    pub input: InputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Pixels per line for line-mode wheel deltas.
    pub line_height_px: f64,
    /// Largest single delta accepted per axis; larger values are clamped.
    pub max_delta_px: f64,
    /// A drag released this long after its last move does not glide.
    pub release_idle_ms: f64,
    pub momentum: MomentumSettings,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            line_height_px: 16.0,
            max_delta_px: 4_000.0,
            release_idle_ms: 100.0,
            momentum: MomentumSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumSettings {
    pub enabled: bool,
    /// Minimum `|dx * dy|` of an input delta before a glide starts.
    pub threshold: f64,
    /// Initial glide velocity as a fraction of the triggering delta.
    pub impulse_scale: f64,
    pub duration_ms: u64,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 50.0,
            impulse_scale: 0.5,
            duration_ms: 500,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.grid.validate()?;

        let input = &self.input;
        positive("input.line_height_px", input.line_height_px)?;
        positive("input.max_delta_px", input.max_delta_px)?;
        positive("input.release_idle_ms", input.release_idle_ms)?;

        let momentum = &input.momentum;
        if !momentum.threshold.is_finite() || momentum.threshold < 0.0 {
            return Err(SettingsError::Invalid {
                field: "input.momentum.threshold",
                reason: format!("expected a non-negative number, got {}", momentum.threshold),
            });
        }
        if !momentum.impulse_scale.is_finite() {
            return Err(SettingsError::Invalid {
                field: "input.momentum.impulse_scale",
                reason: format!("expected a finite number, got {}", momentum.impulse_scale),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.grid.tile_width, 200.0);
        assert_eq!(settings.grid.fixed_cols, 4);
        assert_eq!(settings.input.momentum.duration_ms, 500);
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json_str(
            r#"{"grid": {"tile_width": 320}, "input": {"momentum": {"enabled": false}}}"#,
        )
        .unwrap();
        assert_eq!(settings.grid.tile_width, 320.0);
        assert_eq!(settings.grid.tile_height, 200.0);
        assert!(!settings.input.momentum.enabled);
        assert_eq!(settings.input.momentum.threshold, 50.0);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let err = Settings::from_json_str(r#"{"grid": {"fixed_cols": 0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Grid(GridError::InvalidStride)));
    }

    #[test]
    fn test_fractional_tile_size_rejected() {
        let err = Settings::from_json_str(r#"{"grid": {"tile_width": 200.4}}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Grid(GridError::InvalidTileSize { axis: "width", .. })
        ));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let err = Settings::from_json_str(r#"{"input": {"line_height_px": 0}}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { field: "input.line_height_px", .. }
        ));
    }
}
