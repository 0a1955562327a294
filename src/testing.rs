//! In-memory collaborators for tests and headless hosts.
//!
//! [`TestPlatform`] wires [`MemoryScene`], [`MemoryUi`], [`MemoryStore`],
//! [`RecordingAudio`], the plain [`Camera`], [`RecordingOrientation`] and
//! [`MemorySink`] together so a [`SceneController`] can run without a
//! browser.

use rustc_hash::FxHashMap;

use crate::audio::AudioOutput;
use crate::camera::Camera;
use crate::controller::{Handles, Platform, SceneController};
use crate::error::PanelError;
use crate::export::FileSink;
use crate::options::Options;
use crate::orientation::OrientationSource;
use crate::scene::MemoryScene;
use crate::storage::MemoryStore;
use crate::ui::{ElementId, UiSurface};

// ---------------------------------------------------------------------------
// UI
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
struct ElementState {
    value: String,
    text: String,
    classes: Vec<String>,
    width: Option<u32>,
}

/// In-memory [`UiSurface`] that records every write.
#[derive(Debug, Default, Clone)]
pub struct MemoryUi {
    elements: FxHashMap<ElementId, ElementState>,
    class_additions: FxHashMap<(ElementId, String), usize>,
    notices: Vec<String>,
}

impl MemoryUi {
    /// Every element empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls holding the values the panel markup ships with.
    #[must_use]
    pub fn with_panel_defaults() -> Self {
        let mut ui = Self::new();
        for (id, value) in [
            (ElementId::ObjectType, "cube"),
            (ElementId::ScaleSlider, "1"),
            (ElementId::RotationSlider, "0"),
            (ElementId::PosX, "0"),
            (ElementId::PosY, "0"),
            (ElementId::PosZ, "-3"),
        ] {
            ui.set_value(id, value);
        }
        ui
    }

    /// Text content of an element (empty if never written).
    #[must_use]
    pub fn text(&self, id: ElementId) -> &str {
        self.elements.get(&id).map_or("", |e| e.text.as_str())
    }

    /// Inline width percentage, if one was set.
    #[must_use]
    pub fn width(&self, id: ElementId) -> Option<u32> {
        self.elements.get(&id).and_then(|e| e.width)
    }

    /// How many times `class` was added to an element while absent.
    #[must_use]
    pub fn class_additions(&self, id: ElementId, class: &str) -> usize {
        self.class_additions
            .get(&(id, class.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    /// Notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl UiSurface for MemoryUi {
    fn value(&self, id: ElementId) -> String {
        self.elements
            .get(&id)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        value.clone_into(&mut self.elements.entry(id).or_default().value);
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        text.clone_into(&mut self.elements.entry(id).or_default().text);
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) {
        let classes = &mut self.elements.entry(id).or_default().classes;
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_owned());
            *self
                .class_additions
                .entry((id, class.to_owned()))
                .or_default() += 1;
        } else if !on {
            classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn set_width_percent(&mut self, id: ElementId, percent: u32) {
        self.elements.entry(id).or_default().width = Some(percent);
    }

    fn notify(&mut self, message: &str) {
        log::info!("notice: {message}");
        self.notices.push(message.to_owned());
    }
}

// ---------------------------------------------------------------------------
// Audio, orientation, files
// ---------------------------------------------------------------------------

/// Audio element double. Starts paused; the host side of a play request is
/// simulated with [`RecordingAudio::play`].
#[derive(Debug, Clone)]
pub struct RecordingAudio {
    /// Whether playback is paused.
    pub paused: bool,
    /// Number of `pause()` calls.
    pub pause_calls: usize,
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self {
            paused: true,
            pause_calls: 0,
        }
    }
}

impl RecordingAudio {
    /// Mark playback as started.
    pub fn play(&mut self) {
        self.paused = false;
    }
}

impl AudioOutput for RecordingAudio {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn pause(&mut self) {
        self.paused = true;
        self.pause_calls += 1;
    }
}

/// Orientation source double that records its subscription.
#[derive(Debug, Default, Clone)]
pub struct RecordingOrientation {
    /// Whether the platform demands an explicit grant.
    pub requires_permission: bool,
    /// Whether a listener is currently installed.
    pub subscribed: bool,
    /// Number of `subscribe()` calls.
    pub subscribe_calls: usize,
}

impl OrientationSource for RecordingOrientation {
    fn requires_permission(&self) -> bool {
        self.requires_permission
    }

    fn subscribe(&mut self) {
        self.subscribed = true;
        self.subscribe_calls += 1;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}

/// One file handed to [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Download name.
    pub file_name: String,
    /// MIME type.
    pub mime: String,
    /// File body.
    pub contents: String,
}

/// File sink that keeps every download in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    saved: Vec<SavedFile>,
}

impl MemorySink {
    /// Files saved so far, oldest first.
    #[must_use]
    pub fn saved(&self) -> &[SavedFile] {
        &self.saved
    }
}

impl FileSink for MemorySink {
    fn save(
        &mut self,
        file_name: &str,
        mime: &str,
        contents: &str,
    ) -> Result<(), PanelError> {
        self.saved.push(SavedFile {
            file_name: file_name.to_owned(),
            mime: mime.to_owned(),
            contents: contents.to_owned(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Platform bundle of the in-memory doubles.
#[derive(Debug, Clone, Copy)]
pub struct TestPlatform;

impl Platform for TestPlatform {
    type Scene = MemoryScene;
    type Ui = MemoryUi;
    type Store = MemoryStore;
    type Audio = RecordingAudio;
    type Camera = Camera;
    type Orientation = RecordingOrientation;
    type Files = MemorySink;
}

/// Handles around `scene` with default doubles and panel-default controls.
#[must_use]
pub fn handles(scene: MemoryScene) -> Handles<TestPlatform> {
    Handles {
        scene,
        ui: MemoryUi::with_panel_defaults(),
        store: MemoryStore::new(),
        audio: RecordingAudio::default(),
        camera: Camera::default(),
        orientation: RecordingOrientation::default(),
        files: MemorySink::default(),
    }
}

/// Uninitialized controller over `scene` with default options.
#[must_use]
pub fn controller(scene: MemoryScene) -> SceneController<TestPlatform> {
    SceneController::new(handles(scene), Options::default())
}
