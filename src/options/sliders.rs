use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PanelError;

/// Bounds enforced on slider-driven bulk transforms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Sliders", inline)]
#[serde(default)]
pub struct SliderOptions {
    /// Smallest accepted scale factor.
    pub scale_min: f32,
    /// Largest accepted scale factor.
    pub scale_max: f32,
    /// Smallest accepted yaw in degrees.
    pub rotation_min: f32,
    /// Largest accepted yaw in degrees.
    pub rotation_max: f32,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            scale_min: 0.1,
            scale_max: 5.0,
            rotation_min: 0.0,
            rotation_max: 360.0,
        }
    }
}

impl SliderOptions {
    /// Reject ranges with non-finite or inverted bounds.
    pub fn validate(&self) -> Result<(), PanelError> {
        check_range("scale", self.scale_min, self.scale_max)?;
        check_range("rotation", self.rotation_min, self.rotation_max)
    }

    /// Clamp a scale factor into range.
    #[must_use]
    pub fn clamp_scale(&self, value: f32) -> f32 {
        value.max(self.scale_min).min(self.scale_max)
    }

    /// Clamp a yaw into range.
    #[must_use]
    pub fn clamp_rotation(&self, degrees: f32) -> f32 {
        degrees.max(self.rotation_min).min(self.rotation_max)
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<(), PanelError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(PanelError::OptionsParse(format!(
            "sliders: {name} bounds must be finite ({min}..{max})"
        )));
    }
    if min > max {
        return Err(PanelError::OptionsParse(format!(
            "sliders: {name}_min {min} exceeds {name}_max {max}"
        )));
    }
    Ok(())
}
