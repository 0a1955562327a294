use glam::Vec3;

use super::CameraRig;

/// Camera reduced to what steering needs: where it stands and the point it
/// looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
}

impl Default for Camera {
    /// Standing eye height at the origin, looking down -Z.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.6, 0.0),
            target: Vec3::new(0.0, 1.6, -1.0),
        }
    }
}

impl CameraRig for Camera {
    fn position(&self) -> Vec3 {
        self.eye
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}
