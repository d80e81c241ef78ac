#![forbid(unsafe_code)]

//! Slider definitions as data.
//!
//! A [`SliderConfig`] captures everything needed to build a [`StepModel`]
//! with fixed sources: step count, source bounds, the optional linear head
//! segment and the engine options.
//!
//! # Loading
//!
//! ```toml
//! # price-slider.toml
//! steps = 1000
//!
//! [bounds]
//! min = 500.0
//! max = 125000.0
//!
//! [linear]
//! max_linear = 15000.0
//! linear_percent = 75.0
//!
//! [options]
//! watch_bounds = true
//! beautifier = "round"
//! ```
//!
//! ```rust,ignore
//! let config = SliderConfig::from_toml_file("price-slider.toml")?;
//! let step_model = config.builder(model.clone()).build()?;
//! ```
//!
//! Loading validates the result; a config that parses but fails
//! [`SliderConfig::validate`] is reported as [`ConfigError::Invalid`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use stepmodel_curve::{Bounds, LinearConfig};

use crate::error::ConfigError;
use crate::reactive::{Observable, Source};
use crate::step_model::{ModelBeautifier, StepModel, StepModelBuilder, StepModelOptions};

/// Named beautification policies available from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeautifierPreset {
    #[default]
    Identity,
    Round,
    Floor,
    Ceil,
    FloorMinCeilMax,
}

impl From<BeautifierPreset> for ModelBeautifier {
    fn from(preset: BeautifierPreset) -> Self {
        match preset {
            BeautifierPreset::Identity => Self::identity(),
            BeautifierPreset::Round => Self::round(),
            BeautifierPreset::Floor => Self::floor(),
            BeautifierPreset::Ceil => Self::ceil(),
            BeautifierPreset::FloorMinCeilMax => Self::floor_min_ceil_max(),
        }
    }
}

/// The `[options]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub watch_bounds: bool,
    pub fix_model_on_init: bool,
    pub beautifier: BeautifierPreset,
}

impl From<OptionsConfig> for StepModelOptions {
    fn from(options: OptionsConfig) -> Self {
        StepModelOptions::new()
            .watch_bounds(options.watch_bounds)
            .fix_model_on_init(options.fix_model_on_init)
            .model_beautifier(options.beautifier.into())
    }
}

/// A complete slider definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    /// Number of steps; the step range is `0..=steps`.
    pub steps: u32,
    /// Source bounds in model units.
    pub bounds: Bounds,
    /// Linear head segment. Absent means a pure curve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<LinearConfig>,
    #[serde(default)]
    pub options: OptionsConfig,
}

impl SliderConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// Check every parameter is within its accepted range.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.steps == 0 {
            errors.push("steps must be > 0".into());
        }

        if !self.bounds.is_valid() {
            errors.push(format!(
                "bounds must be finite with min <= max, got [{}, {}]",
                self.bounds.min, self.bounds.max
            ));
        }

        if let Some(linear) = &self.linear {
            if !(0.0..=100.0).contains(&linear.linear_percent) {
                errors.push(format!(
                    "linear.linear_percent must be in [0, 100], got {}",
                    linear.linear_percent
                ));
            }
            if linear.max_linear.is_nan() || linear.max_linear < 0.0 {
                errors.push(format!(
                    "linear.max_linear must be >= 0, got {}",
                    linear.max_linear
                ));
            }
        }

        errors
    }

    /// Builder for a step model over `model` with this config's fixed
    /// sources and options.
    pub fn builder(&self, model: Observable<Bounds>) -> StepModelBuilder {
        StepModel::builder(model, Source::fixed(self.steps), Source::fixed(self.bounds))
            .linear_config(self.linear)
            .options(self.options.into())
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
steps = 1000

[bounds]
min = 500.0
max = 125000.0

[linear]
max_linear = 15000.0
linear_percent = 75.0

[options]
watch_bounds = true
beautifier = "floor-min-ceil-max"
"#;

    #[test]
    fn parses_full_toml() {
        let config = SliderConfig::from_toml_str(TOML).expect("valid config");
        assert_eq!(config.steps, 1_000);
        assert_eq!(config.bounds, Bounds::new(500.0, 125_000.0));
        assert_eq!(config.linear, Some(LinearConfig::new(15_000.0, 75.0)));
        assert!(config.options.watch_bounds);
        assert!(!config.options.fix_model_on_init);
        assert_eq!(config.options.beautifier, BeautifierPreset::FloorMinCeilMax);
    }

    #[test]
    fn options_default_when_absent() {
        let config = SliderConfig::from_toml_str(
            "steps = 10\n[bounds]\nmin = 0.0\nmax = 1.0\n",
        )
        .expect("valid config");
        assert_eq!(config.linear, None);
        assert_eq!(config.options, OptionsConfig::default());
    }

    #[test]
    fn validate_collects_all_problems() {
        let config = SliderConfig {
            steps: 0,
            bounds: Bounds::new(10.0, 1.0),
            linear: Some(LinearConfig::new(-1.0, 150.0)),
            options: OptionsConfig::default(),
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors[0].starts_with("steps"));
        assert!(errors[1].starts_with("bounds must be finite with min <= max"));
        assert!(errors[2].starts_with("linear.linear_percent"));
        assert!(errors[3].starts_with("linear.max_linear"));
    }

    #[test]
    fn non_finite_bounds_rejected() {
        let config = SliderConfig {
            steps: 10,
            bounds: Bounds::new(0.0, f64::INFINITY),
            linear: None,
            options: OptionsConfig::default(),
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn inverted_bounds_report_once() {
        let config = SliderConfig {
            steps: 10,
            bounds: Bounds::new(f64::NAN, 1.0),
            linear: None,
            options: OptionsConfig::default(),
        };
        let errors = config.validate();
        assert_eq!(errors, ["bounds must be finite with min <= max, got [NaN, 1]"]);
    }

    #[test]
    fn linear_accepts_camel_case_keys() {
        let config = SliderConfig::from_json_str(
            r#"{"steps":1000,"bounds":{"min":500.0,"max":125000.0},
                "linear":{"maxLinear":15000.0,"linearPercent":75.0}}"#,
        )
        .expect("camelCase linear config");
        assert_eq!(config.linear, Some(LinearConfig::new(15_000.0, 75.0)));
    }

    #[test]
    fn invalid_config_fails_to_load() {
        let err = SliderConfig::from_json_str(r#"{"steps":0,"bounds":{"min":0.0,"max":1.0}}"#)
            .expect_err("steps = 0 is invalid");
        assert!(matches!(err, ConfigError::Invalid(ref e) if e.len() == 1));
        assert_eq!(err.to_string(), "invalid slider config: steps must be > 0");
    }

    #[test]
    fn unknown_beautifier_is_a_parse_error() {
        let err = SliderConfig::from_toml_str(
            "steps = 10\n[bounds]\nmin = 0.0\nmax = 1.0\n[options]\nbeautifier = \"banker\"\n",
        )
        .expect_err("unknown preset");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn presets_map_to_beautifiers() {
        let names: Vec<_> = [
            BeautifierPreset::Identity,
            BeautifierPreset::Round,
            BeautifierPreset::Floor,
            BeautifierPreset::Ceil,
            BeautifierPreset::FloorMinCeilMax,
        ]
        .into_iter()
        .map(|p| ModelBeautifier::from(p).name())
        .collect();
        assert_eq!(
            names,
            ["identity", "round", "floor", "ceil", "floor-min-ceil-max"]
        );
    }

    #[test]
    fn builds_step_model() {
        let config = SliderConfig::from_toml_str(TOML).expect("valid config");
        let model = Observable::new(Bounds::new(25_491.0, 125_000.0));
        let step_model = config.builder(model).build().expect("build");
        assert_eq!(step_model.get().min, 826);
    }
}
