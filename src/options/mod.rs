//! Centralized panel options with TOML preset support.
//!
//! Spawn defaults, slider bounds, button captions and page wiring (storage
//! keys, CSS classes, selectors) are consolidated here. Options serialize
//! to/from TOML so a page can ship its own preset.

mod labels;
mod objects;
mod page;
mod sliders;

use std::path::Path;

pub use labels::LabelOptions;
pub use objects::ObjectOptions;
pub use page::PageOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use sliders::SliderOptions;

use crate::error::PanelError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[labels]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Spawn defaults.
    pub objects: ObjectOptions,
    /// Slider bounds.
    pub sliders: SliderOptions,
    /// Button captions and notices.
    #[schemars(skip)]
    pub labels: LabelOptions,
    /// Storage keys, classes, selectors.
    #[schemars(skip)]
    pub page: PageOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults; slider
    /// ranges are validated.
    pub fn from_toml(content: &str) -> Result<Self, PanelError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| PanelError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check the ranges a preset can break.
    pub fn validate(&self) -> Result<(), PanelError> {
        self.sliders.validate()
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, PanelError> {
        let content = std::fs::read_to_string(path).map_err(PanelError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PanelError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PanelError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PanelError::Io)?;
        }
        std::fs::write(path, content).map_err(PanelError::Io)
    }
}
