//! Analysis settings, loadable from TOML or JSON.
//!
//! ```toml
//! axis_mode = "skeleton"
//! highlight_scale = 20.0
//! angle_convention = "normal-to-axis"
//! component_policy = "reject"
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::angle::AngleConvention;
use crate::axis::{AxisMode, ComponentPolicy};
use crate::error::{AnalysisError, AnalysisResult};
use crate::selection::DEFAULT_HIGHLIGHT_SCALE;

/// Settings for one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Axis extraction strategy.
    pub axis_mode: AxisMode,
    /// Enlargement of the highlighted triangle about its centroid.
    pub highlight_scale: f64,
    /// Convention for the primary reported angle.
    pub angle_convention: AngleConvention,
    /// Handling of disconnected meshes in skeleton mode.
    pub component_policy: ComponentPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            axis_mode: AxisMode::default(),
            highlight_scale: DEFAULT_HIGHLIGHT_SCALE,
            angle_convention: AngleConvention::default(),
            component_policy: ComponentPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Check value ranges.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.highlight_scale.is_finite() || self.highlight_scale <= 0.0 {
            return Err(AnalysisError::InvalidConfig {
                details: format!(
                    "highlight_scale must be finite and positive, got {}",
                    self.highlight_scale
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate TOML.
    pub fn from_toml(s: &str) -> AnalysisResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| AnalysisError::ConfigParse {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json(s: &str) -> AnalysisResult<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| AnalysisError::ConfigParse {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    pub fn to_toml(&self) -> AnalysisResult<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::InvalidConfig {
            details: format!("cannot serialize as TOML: {}", e),
        })
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::InvalidConfig {
            details: format!("cannot serialize as JSON: {}", e),
        })
    }
}
