//! The scene controller: owns all panel state and turns
//! [`PanelCommand`]s into scene, UI and storage writes.
//!
//! Collaborators arrive through a [`Platform`] bundle at construction. The
//! controller is created once, wired with [`SceneController::init`], driven
//! by [`SceneController::execute`] and torn down with
//! [`SceneController::dispose`].

mod command;
mod event;
mod objects;
mod session;

pub use command::{ObjectType, PanelCommand};
pub use event::UiEvent;

use crate::audio::{AudioOutput, BackgroundAudio};
use crate::camera::CameraRig;
use crate::error::PanelError;
use crate::export::FileSink;
use crate::options::Options;
use crate::orientation::{OrientationBridge, OrientationSource};
use crate::progress::LoadProgressTracker;
use crate::scene::{EntityKind, SceneGraph};
use crate::storage::{self, KeyValueStore};
use crate::task::{TaskKind, TaskSlot, TaskToken};
use crate::ui::{ElementId, UiSurface};

/// Framework component the panel cannot run without.
pub const REQUIRED_COMPONENT: &str = "raycaster";

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Type bundle naming one implementation of every collaborator.
pub trait Platform {
    /// Scene graph.
    type Scene: SceneGraph;
    /// Panel DOM.
    type Ui: UiSurface;
    /// Client storage.
    type Store: KeyValueStore;
    /// Background audio element.
    type Audio: AudioOutput;
    /// Scene camera.
    type Camera: CameraRig;
    /// Device-orientation subscription.
    type Orientation: OrientationSource;
    /// File download.
    type Files: FileSink;
}

/// The collaborator instances handed to [`SceneController::new`].
pub struct Handles<P: Platform> {
    /// Scene graph.
    pub scene: P::Scene,
    /// Panel DOM.
    pub ui: P::Ui,
    /// Client storage.
    pub store: P::Store,
    /// Background audio element.
    pub audio: P::Audio,
    /// Scene camera.
    pub camera: P::Camera,
    /// Device-orientation subscription.
    pub orientation: P::Orientation,
    /// File download.
    pub files: P::Files,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Asynchronous work the host must perform for the controller.
///
/// When the work settles the host feeds the token back through the
/// matching resolution command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Prompt for device-orientation access; resume with
    /// [`PanelCommand::PermissionResolved`].
    RequestOrientationPermission(TaskToken),
    /// Read clipboard text; resume with
    /// [`PanelCommand::ClipboardResolved`].
    ReadClipboard(TaskToken),
    /// Call `play()` on the audio element; resume with
    /// [`PanelCommand::PlaybackResolved`].
    PlayAudio(TaskToken),
}

/// Snapshot of the panel's user-visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    /// Panel is collapsed.
    pub panel_collapsed: bool,
    /// Gyroscope steering is on.
    pub gyro_active: bool,
    /// Background audio is playing.
    pub audio_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Disposed,
}

// ---------------------------------------------------------------------------
// SceneController
// ---------------------------------------------------------------------------

/// Binds UI events to scene mutations and owns the loading and gyroscope
/// subsystems.
pub struct SceneController<P: Platform> {
    scene: P::Scene,
    ui: P::Ui,
    store: P::Store,
    audio_out: P::Audio,
    camera: P::Camera,
    orientation: P::Orientation,
    files: P::Files,

    options: Options,
    lifecycle: Lifecycle,
    progress: LoadProgressTracker,
    audio: BackgroundAudio,
    gyro: OrientationBridge,
    orientation_subscribed: bool,
    clipboard: TaskSlot,
}

// ── Construction ─────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Create an unwired controller. Nothing is touched until
    /// [`init`](Self::init).
    pub fn new(handles: Handles<P>, options: Options) -> Self {
        Self {
            scene: handles.scene,
            ui: handles.ui,
            store: handles.store,
            audio_out: handles.audio,
            camera: handles.camera,
            orientation: handles.orientation,
            files: handles.files,
            options,
            lifecycle: Lifecycle::Created,
            progress: LoadProgressTracker::new(0),
            audio: BackgroundAudio::new(),
            gyro: OrientationBridge::new(),
            orientation_subscribed: false,
            clipboard: TaskSlot::new(TaskKind::ClipboardRead),
        }
    }

    /// Wire the panel to the scene.
    ///
    /// Fails without side effects when the scene lacks the raycaster
    /// component. On success restores the persisted panel state, scopes the
    /// raycaster, and starts load tracking over the scene's videos. A scene
    /// without videos completes at once and returns the autoplay request.
    pub fn init(&mut self) -> Result<Option<Deferred>, PanelError> {
        if self.lifecycle != Lifecycle::Created {
            log::warn!("controller already initialized");
            return Ok(None);
        }
        if !self.scene.has_component(REQUIRED_COMPONENT) {
            log::error!("A-Frame or {REQUIRED_COMPONENT} component not loaded");
            return Err(PanelError::MissingComponent(
                REQUIRED_COMPONENT.to_owned(),
            ));
        }

        self.scene.scope_raycaster(&self.options.page.raycaster_selector)?;

        let collapsed =
            storage::load_flag(&self.store, &self.options.page.panel_state_key);
        self.apply_panel_collapsed(collapsed);

        let videos = self.scene.query(&[EntityKind::Video]).len();
        self.progress = LoadProgressTracker::new(videos);
        self.lifecycle = Lifecycle::Running;
        log::info!("scene controls ready ({videos} videos to load)");

        Ok(self.progress.start().map(|_| self.complete_loading()))
    }

    /// Release subscriptions and abandon pending work. Every later command
    /// is ignored.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        if self.orientation_subscribed {
            self.orientation.unsubscribe();
            self.orientation_subscribed = false;
        }
        self.gyro.reset();
        self.audio.reset();
        self.clipboard.cancel();
        self.lifecycle = Lifecycle::Disposed;
        log::debug!("scene controls disposed");
    }

    /// Whether [`init`](Self::init) succeeded and the controller has not
    /// been disposed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Execute one command. Returns follow-up asynchronous work, if any.
    pub fn execute(
        &mut self,
        cmd: PanelCommand,
    ) -> Result<Option<Deferred>, PanelError> {
        if !self.is_running() {
            log::debug!("ignoring {cmd:?}: controller not running");
            return Ok(None);
        }
        match cmd {
            PanelCommand::TogglePanel => self.toggle_panel().map(|_| None),
            PanelCommand::AddObject => {
                self.add_object_from_fields().map(|_| None)
            }
            PanelCommand::ClearObjects => {
                let _ = self.clear_objects();
                Ok(None)
            }
            PanelCommand::ToggleBackground => {
                self.toggle_background_visibility().map(|_| None)
            }
            PanelCommand::SetScale(value) => {
                self.set_scale(value).map(|()| None)
            }
            PanelCommand::SetRotation(degrees) => {
                self.set_rotation(degrees).map(|()| None)
            }
            PanelCommand::EditPosition { axis, raw } => {
                self.edit_position_field(axis, &raw).map(|()| None)
            }
            PanelCommand::BlurPosition { axis } => {
                self.blur_position_field(axis).map(|()| None)
            }
            PanelCommand::StepPosition { axis, direction } => {
                self.step_position(axis, direction).map(|()| None)
            }
            PanelCommand::PasteModelUrl => Ok(Some(self.paste_model_url())),
            PanelCommand::ClipboardResolved { token, result } => {
                self.finish_clipboard_read(token, result);
                Ok(None)
            }
            PanelCommand::ToggleAudio => Ok(self.toggle_audio()),
            PanelCommand::PlaybackResolved { token, result } => {
                self.finish_playback(token, result);
                Ok(None)
            }
            PanelCommand::UserGesture => {
                Ok(self.audio.on_gesture().map(Deferred::PlayAudio))
            }
            PanelCommand::VideoReady { source } => {
                Ok(self.on_video_ready(&source))
            }
            PanelCommand::VideoError { source, detail } => {
                self.progress.on_error(&source, &detail);
                Ok(None)
            }
            PanelCommand::SaveVideoTransforms => {
                self.export_video_transforms().map(|_| None)
            }
            PanelCommand::ToggleGyroscope => Ok(self.toggle_gyroscope()),
            PanelCommand::PermissionResolved { token, granted } => {
                self.finish_permission(token, granted);
                Ok(None)
            }
            PanelCommand::Orientation(sample) => {
                self.on_orientation(&sample);
                Ok(None)
            }
            PanelCommand::VrModeChanged { entered } => {
                if entered {
                    log::info!("Entered VR Mode");
                } else {
                    log::info!("Exited VR Mode");
                }
                Ok(None)
            }
        }
    }
}

// ── Accessors ────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Snapshot of the user-visible state.
    #[must_use]
    pub fn ui_state(&self) -> UiState {
        UiState {
            panel_collapsed: self.ui.has_class(
                ElementId::UiPanel,
                &self.options.page.collapsed_class,
            ),
            gyro_active: self.gyro.is_active(),
            audio_playing: !self.audio_out.is_paused(),
        }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Load progress over the scene's videos.
    #[must_use]
    pub fn progress(&self) -> &LoadProgressTracker {
        &self.progress
    }

    /// Background audio state machine.
    #[must_use]
    pub fn audio(&self) -> &BackgroundAudio {
        &self.audio
    }

    /// The scene collaborator.
    #[must_use]
    pub fn scene(&self) -> &P::Scene {
        &self.scene
    }

    /// The UI collaborator.
    #[must_use]
    pub fn ui(&self) -> &P::Ui {
        &self.ui
    }

    /// Mutable access to the UI, for hosts that prefill controls.
    pub fn ui_mut(&mut self) -> &mut P::Ui {
        &mut self.ui
    }

    /// The storage collaborator.
    #[must_use]
    pub fn store(&self) -> &P::Store {
        &self.store
    }

    /// The audio element.
    #[must_use]
    pub fn audio_output(&self) -> &P::Audio {
        &self.audio_out
    }

    /// Mutable access to the audio element, for hosts that settle
    /// playback themselves.
    pub fn audio_output_mut(&mut self) -> &mut P::Audio {
        &mut self.audio_out
    }

    /// The camera collaborator.
    #[must_use]
    pub fn camera(&self) -> &P::Camera {
        &self.camera
    }

    /// The orientation collaborator.
    #[must_use]
    pub fn orientation_source(&self) -> &P::Orientation {
        &self.orientation
    }

    /// The file sink.
    #[must_use]
    pub fn files(&self) -> &P::Files {
        &self.files
    }
}
