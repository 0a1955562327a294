use glam::{DVec3, Vec3};

use super::{attribute, EntityId, SceneGraph, POSITION, ROTATION, SCALE, SRC};
use crate::error::PanelError;

// ---------------------------------------------------------------------------
// EntityTransform
// ---------------------------------------------------------------------------

/// Placement given to a panel-spawned entity: position, yaw and a uniform
/// scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTransform {
    /// World-space position.
    pub position: Vec3,
    /// Rotation about the Y axis in degrees.
    pub rotation_y: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Default for EntityTransform {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -3.0),
            rotation_y: 0.0,
            scale: 1.0,
        }
    }
}

impl EntityTransform {
    /// Write all three attributes onto `id`.
    pub fn write_to<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        id: EntityId,
    ) -> Result<(), PanelError> {
        scene.set_attribute(
            id,
            POSITION,
            &attribute::encode_vec3(self.position),
        )?;
        scene.set_attribute(
            id,
            ROTATION,
            &attribute::encode_y_rotation(self.rotation_y),
        )?;
        scene.set_attribute(
            id,
            SCALE,
            &attribute::encode_uniform_scale(self.scale),
        )
    }
}

// ---------------------------------------------------------------------------
// VideoSnapshot
// ---------------------------------------------------------------------------

/// Read-only snapshot of a video plane's placement, taken at export time.
/// Kept in f64 so the export reproduces the scene's numbers exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSnapshot {
    /// The plane's media source, used as the export key.
    pub source: String,
    /// World-space position.
    pub position: DVec3,
    /// Rotation about the Y axis in degrees.
    pub rotation_y: f64,
}

impl VideoSnapshot {
    /// Snapshot a video entity. An absent `src` exports under the empty key.
    pub fn read_from<S: SceneGraph + ?Sized>(
        scene: &S,
        id: EntityId,
    ) -> Result<Self, PanelError> {
        let source = scene.attribute(id, SRC).unwrap_or_default();
        let position = read_dvec3(scene, id, POSITION)?;
        let rotation = read_dvec3(scene, id, ROTATION)?;
        Ok(Self {
            source,
            position,
            rotation_y: rotation.y,
        })
    }
}

fn read_dvec3<S: SceneGraph + ?Sized>(
    scene: &S,
    id: EntityId,
    name: &str,
) -> Result<DVec3, PanelError> {
    scene
        .attribute(id, name)
        .map_or(Ok(DVec3::ZERO), |raw| attribute::parse_dvec3(name, &raw))
}
