use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Button captions and user-facing strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Labels", inline)]
#[serde(default)]
pub struct LabelOptions {
    /// Panel toggle caption while collapsed.
    pub panel_collapsed: String,
    /// Panel toggle caption while expanded.
    pub panel_expanded: String,
    /// Backdrop button caption while the backdrop is visible.
    pub background_visible: String,
    /// Backdrop button caption while the backdrop is hidden.
    pub background_hidden: String,
    /// Gyroscope button caption while steering is on.
    pub gyroscope_on: String,
    /// Gyroscope button caption while steering is off.
    pub gyroscope_off: String,
    /// Audio button caption while playing.
    pub audio_playing: String,
    /// Audio button caption while paused.
    pub audio_paused: String,
    /// Loading text shown before the percentage.
    pub loading_prefix: String,
    /// Notice shown when FBX is selected.
    pub fbx_notice: String,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            panel_collapsed: "◀ Controls".to_owned(),
            panel_expanded: "▼ Controls".to_owned(),
            background_visible: "Hide Sphere".to_owned(),
            background_hidden: "Show Sphere".to_owned(),
            gyroscope_on: "Disable Gyroscope".to_owned(),
            gyroscope_off: "Enable Gyroscope".to_owned(),
            audio_playing: "Mute Audio".to_owned(),
            audio_paused: "Play Audio".to_owned(),
            loading_prefix: "Loading Experience...".to_owned(),
            fbx_notice: "FBX format is not natively supported in A-Frame. \
                         Consider converting to GLB."
                .to_owned(),
        }
    }
}

impl LabelOptions {
    /// Panel toggle caption for a collapsed state.
    #[must_use]
    pub fn panel(&self, collapsed: bool) -> &str {
        if collapsed {
            &self.panel_collapsed
        } else {
            &self.panel_expanded
        }
    }

    /// Backdrop button caption for a visibility state.
    #[must_use]
    pub fn background(&self, visible: bool) -> &str {
        if visible {
            &self.background_visible
        } else {
            &self.background_hidden
        }
    }

    /// Gyroscope button caption for an active state.
    #[must_use]
    pub fn gyroscope(&self, active: bool) -> &str {
        if active {
            &self.gyroscope_on
        } else {
            &self.gyroscope_off
        }
    }

    /// Audio button caption for a playing state.
    #[must_use]
    pub fn audio(&self, playing: bool) -> &str {
        if playing {
            &self.audio_playing
        } else {
            &self.audio_paused
        }
    }

    /// `"{prefix} {percent}%"`.
    #[must_use]
    pub fn loading(&self, percent: u32) -> String {
        format!("{} {percent}%", self.loading_prefix)
    }
}
