//! Device-orientation bridge: turns gyroscope samples into camera look
//! directions.
//!
//! The bridge owns the on/off state and the permission handshake. Actual
//! subscription goes through an [`OrientationSource`]; the camera write goes
//! through [`CameraRig`](crate::camera::CameraRig).

use glam::Vec3;

use crate::task::{TaskKind, TaskSlot, TaskToken};

/// The consumed device-orientation interface.
pub trait OrientationSource {
    /// Whether the platform requires an explicit user grant before samples
    /// are delivered.
    fn requires_permission(&self) -> bool;

    /// Start delivering samples to the controller.
    fn subscribe(&mut self);

    /// Stop delivering samples.
    fn unsubscribe(&mut self);
}

/// One device-orientation reading, in degrees. Any angle may be absent on
/// hardware without the corresponding sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSample {
    /// Rotation around the device Z axis (compass heading).
    pub alpha: Option<f64>,
    /// Rotation around the device X axis (front-back tilt).
    pub beta: Option<f64>,
    /// Rotation around the device Y axis (left-right tilt).
    pub gamma: Option<f64>,
}

impl OrientationSample {
    /// Sample with all three readings present.
    #[must_use]
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }

    /// Unit look direction for this sample, or `None` when any reading is
    /// missing.
    #[must_use]
    pub fn look_direction(&self) -> Option<Vec3> {
        let (alpha, beta, _gamma) = (self.alpha?, self.beta?, self.gamma?);
        Some(look_direction(alpha, beta))
    }
}

/// Spherical mapping from device angles to a unit direction:
/// polar = 90° − beta, azimuth = alpha.
#[must_use]
pub fn look_direction(alpha_deg: f64, beta_deg: f64) -> Vec3 {
    let polar = (90.0 - beta_deg).to_radians();
    let azimuth = alpha_deg.to_radians();
    Vec3::new(
        (polar.sin() * azimuth.cos()) as f32,
        polar.cos() as f32,
        (polar.sin() * azimuth.sin()) as f32,
    )
}

/// What the owner must do after [`OrientationBridge::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Start listening for samples now.
    Subscribe,
    /// Stop listening.
    Unsubscribe,
    /// Ask the user for permission; resume with
    /// [`OrientationBridge::resolve_permission`].
    RequestPermission(TaskToken),
}

/// On/off state for gyroscope steering.
#[derive(Debug)]
pub struct OrientationBridge {
    active: bool,
    permission: TaskSlot,
}

impl Default for OrientationBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationBridge {
    /// Inactive bridge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: false,
            permission: TaskSlot::new(TaskKind::OrientationPermission),
        }
    }

    /// Whether steering is switched on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip the active flag.
    ///
    /// Turning off cancels any outstanding permission prompt, so a late
    /// grant for a superseded toggle never subscribes.
    pub fn toggle(&mut self, requires_permission: bool) -> ToggleAction {
        self.active = !self.active;
        if !self.active {
            self.permission.cancel();
            return ToggleAction::Unsubscribe;
        }
        if requires_permission {
            ToggleAction::RequestPermission(self.permission.issue())
        } else {
            ToggleAction::Subscribe
        }
    }

    /// Resume after the permission prompt settles. Returns `true` when the
    /// owner should subscribe.
    ///
    /// A denial switches the bridge back off.
    pub fn resolve_permission(
        &mut self,
        token: TaskToken,
        granted: bool,
    ) -> bool {
        if !self.permission.resolve(token) {
            log::debug!("dropping stale orientation permission response");
            return false;
        }
        if !granted {
            log::warn!("device orientation permission denied");
            self.active = false;
        }
        granted
    }

    /// Look direction for a sample, if steering is on and the sample is
    /// complete.
    #[must_use]
    pub fn direction_for(&self, sample: &OrientationSample) -> Option<Vec3> {
        if !self.active {
            return None;
        }
        sample.look_direction()
    }

    /// Switch off and forget any outstanding prompt.
    pub fn reset(&mut self) {
        self.active = false;
        self.permission.cancel();
    }
}
