use cadence_core::recurrence::ExpansionConfig;
use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Bounds for previews and materialization
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Occurrences shown when `-n` is not given
    pub default_count: usize,
    /// Occurrences generated when materializing a series
    pub materialize_count: usize,
    /// Hard ceiling for any request
    pub max_count: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        let defaults = ExpansionConfig::default();
        Self {
            default_count: defaults.preview_count,
            materialize_count: defaults.materialize_count,
            max_count: defaults.max_count,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for occurrence dates
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Whether every specifier in `date_format` is one chrono can render.
    pub fn has_valid_date_format(&self) -> bool {
        !StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
    }
}

impl Config {
    /// Loads `cadence.toml` from the working directory (or `path`), then
    /// `CADENCE_*` environment variables, e.g. `CADENCE_PREVIEW__DEFAULT_COUNT=5`.
    pub fn new(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("CADENCE_").split("__"))
            .extract()?;

        if !config.display.has_valid_date_format() {
            tracing::warn!(
                date_format = %config.display.date_format,
                "invalid display.date_format, using the default"
            );
            config.display = DisplayConfig::default();
        }
        Ok(config)
    }

    pub fn expansion(&self) -> ExpansionConfig {
        ExpansionConfig {
            preview_count: self.preview.default_count,
            materialize_count: self.preview.materialize_count,
            max_count: self.preview.max_count,
        }
    }
}
