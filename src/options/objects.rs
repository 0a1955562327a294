use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placement defaults for newly spawned objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Objects", inline)]
#[serde(default)]
pub struct ObjectOptions {
    /// Uniform scale the scale slider starts at.
    #[schemars(
        title = "Scale",
        range(min = 0.1, max = 5.0),
        extend("step" = 0.1)
    )]
    pub default_scale: f32,
    /// Yaw in degrees the rotation slider starts at.
    #[schemars(
        title = "Rotation",
        range(min = 0.0, max = 360.0),
        extend("step" = 1.0)
    )]
    pub default_rotation: f32,
    /// Z used when the depth field holds no number.
    #[schemars(
        title = "Spawn Depth",
        range(min = -20.0, max = 0.0),
        extend("step" = 0.5)
    )]
    pub spawn_depth: f32,
    /// Amount a ± button moves a position field.
    #[schemars(skip)]
    pub position_step: f32,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            default_rotation: 0.0,
            spawn_depth: -3.0,
            position_step: 0.1,
        }
    }
}
