#![forbid(unsafe_code)]

//! Widget configuration as data.
//!
//! Every tunable the widgets use (hover delay, tooltip geometry, step size,
//! percent maximum, initial value, tooltip messages) lives in one
//! [`WidgetConfig`] that can be loaded from TOML or JSON at startup.
//!
//! ```toml
//! [tooltip]
//! delay_ms = 300
//!
//! [stepper]
//! initial_unit = "pixel"
//! initial_value = 24
//! ```
//!
//! Missing fields take their defaults, and `WidgetConfig::default()` matches
//! the built-in behavior exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::tooltip::{DEFAULT_DELAY, TOOLTIP_GAP, TOOLTIP_HEIGHT};
use crate::unit_value::{MAX_MESSAGE, MIN_MESSAGE, Unit};

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Tooltip timing and geometry.
    pub tooltip: TooltipConfig,
    /// Stepper behavior.
    pub stepper: StepperConfig,
}

/// Tooltip timing and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Hover delay before a tooltip appears.
    pub delay_ms: u64,
    /// Height reserved above the anchor when choosing a placement.
    pub height: f64,
    /// Distance between anchor and tooltip.
    pub gap: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            height: TOOLTIP_HEIGHT,
            gap: TOOLTIP_GAP,
        }
    }
}

impl TooltipConfig {
    /// Hover delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Stepper behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Amount added or removed per button press.
    pub step: f64,
    /// Upper bound while the unit is percent.
    pub percent_max: f64,
    /// Unit selected at mount.
    pub initial_unit: Unit,
    /// Value at mount.
    pub initial_value: f64,
    /// Tooltip on the disabled decrement button.
    pub min_message: String,
    /// Tooltip on the disabled increment button.
    pub max_message: String,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            percent_max: 100.0,
            initial_unit: Unit::Percent,
            initial_value: 1.0,
            min_message: MIN_MESSAGE.to_string(),
            max_message: MAX_MESSAGE.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk and validate it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)?.validated()
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)?.validated()
    }

    /// Load a `.json` file as JSON and anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(ConfigError::TomlSer)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let t = &self.tooltip;
        if !(t.height.is_finite() && t.height >= 0.0) {
            errors.push(format!("tooltip.height must be >= 0, got {}", t.height));
        }
        if !(t.gap.is_finite() && t.gap >= 0.0) {
            errors.push(format!("tooltip.gap must be >= 0, got {}", t.gap));
        }

        let s = &self.stepper;
        if !(s.step.is_finite() && s.step > 0.0) {
            errors.push(format!("stepper.step must be > 0, got {}", s.step));
        }
        if !(s.percent_max.is_finite() && s.percent_max > 0.0) {
            errors.push(format!(
                "stepper.percent_max must be > 0, got {}",
                s.percent_max
            ));
        }
        if !(s.initial_value.is_finite() && s.initial_value >= 0.0) {
            errors.push(format!(
                "stepper.initial_value must be >= 0, got {}",
                s.initial_value
            ));
        } else if s.initial_unit == Unit::Percent && s.initial_value > s.percent_max {
            errors.push(format!(
                "stepper.initial_value {} exceeds percent_max {}",
                s.initial_value, s.percent_max
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a widget configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSer(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
