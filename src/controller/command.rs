//! The panel's complete interactive vocabulary.
//!
//! Every operation, whether it came from a button, a slider, a browser
//! callback or a settled promise, is a [`PanelCommand`]. Hosts translate raw
//! events (see [`UiEvent`](super::UiEvent)) and pass the commands to
//! [`SceneController::execute`](super::SceneController::execute).

use std::str::FromStr;

use crate::orientation::OrientationSample;
use crate::task::TaskToken;
use crate::ui::{Axis, StepDirection};

// ── Command payload types ────────────────────────────────────────────────

/// Entries of the object-type dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// Cube primitive.
    Cube,
    /// Sphere primitive.
    Sphere,
    /// glTF/GLB model from the URL field.
    Custom,
    /// FBX model (unsupported; produces a notice).
    Fbx,
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cube" => Ok(Self::Cube),
            "sphere" => Ok(Self::Sphere),
            "custom" => Ok(Self::Custom),
            "fbx" => Ok(Self::Fbx),
            other => Err(format!("unknown object type {other:?}")),
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────────

/// A discrete or parameterized operation the controller can perform.
///
/// ```ignore
/// controller.execute(PanelCommand::ClearObjects)?;
/// controller.execute(PanelCommand::SetScale(1.5))?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    // ── Panel ───────────────────────────────────────────────────────
    /// Collapse or expand the panel.
    TogglePanel,

    // ── Objects ─────────────────────────────────────────────────────
    /// Spawn the dropdown's object type using the current field values.
    AddObject,

    /// Remove every spawned object.
    ClearObjects,

    /// Show or hide the sky backdrop.
    ToggleBackground,

    /// Scale every spawned object uniformly.
    SetScale(f32),

    /// Set every spawned object's yaw, in degrees.
    SetRotation(f32),

    /// Text typed into a position field.
    EditPosition {
        /// Which field.
        axis: Axis,
        /// Raw field text.
        raw: String,
    },

    /// A position field lost focus.
    BlurPosition {
        /// Which field.
        axis: Axis,
    },

    /// A ± button beside a position field.
    StepPosition {
        /// Which field.
        axis: Axis,
        /// Up or down.
        direction: StepDirection,
    },

    // ── Model URL ───────────────────────────────────────────────────
    /// Fill the URL field from the clipboard.
    PasteModelUrl,

    /// The clipboard read settled.
    ClipboardResolved {
        /// Token from the matching clipboard request
        /// ([`Deferred`](super::Deferred)).
        token: TaskToken,
        /// Clipboard text, or the failure reason.
        result: Result<String, String>,
    },

    // ── Audio ───────────────────────────────────────────────────────
    /// The mute/play button.
    ToggleAudio,

    /// A `play()` promise settled.
    PlaybackResolved {
        /// Token from the matching play request
        /// ([`Deferred`](super::Deferred)).
        token: TaskToken,
        /// Success, or the rejection reason.
        result: Result<(), String>,
    },

    /// A click that reached the document (panel clicks never do).
    UserGesture,

    // ── Loading ─────────────────────────────────────────────────────
    /// A video texture finished loading.
    VideoReady {
        /// The video's media source.
        source: String,
    },

    /// A video texture failed to load.
    VideoError {
        /// The video's media source.
        source: String,
        /// Failure description.
        detail: String,
    },

    // ── Export ──────────────────────────────────────────────────────
    /// Download every video's placement as JSON.
    SaveVideoTransforms,

    // ── Gyroscope ───────────────────────────────────────────────────
    /// Switch gyroscope steering on or off.
    ToggleGyroscope,

    /// The orientation permission prompt settled.
    PermissionResolved {
        /// Token from the matching permission request
        /// ([`Deferred`](super::Deferred)).
        token: TaskToken,
        /// Whether the user granted access.
        granted: bool,
    },

    /// A device-orientation sample.
    Orientation(OrientationSample),

    // ── Session ─────────────────────────────────────────────────────
    /// The scene entered or left immersive mode.
    VrModeChanged {
        /// `true` on enter.
        entered: bool,
    },
}
