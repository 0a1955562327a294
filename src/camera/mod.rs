//! Camera collaborator for gyroscope steering.
//!
//! The host framework owns the real camera; the panel only needs to know
//! where it stands and to aim it at a world-space point.

/// Core camera struct used by native hosts and tests.
pub mod core;

use glam::Vec3;

pub use self::core::Camera;

/// The consumed camera interface.
pub trait CameraRig {
    /// Current eye position in world space.
    fn position(&self) -> Vec3;

    /// Re-aim the camera so that it looks at `target` (world space).
    fn look_at(&mut self, target: Vec3);
}
