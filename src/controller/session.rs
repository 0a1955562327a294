//! Session operations: the panel toggle, clipboard paste, load progress,
//! background audio, the transform export and gyroscope steering.

use super::{Deferred, Platform, SceneController};
use crate::audio::AudioToggle;
use crate::camera::CameraRig;
use crate::error::PanelError;
use crate::export::{FileSink, VideoTransforms, EXPORT_MIME};
use crate::orientation::{OrientationSample, OrientationSource, ToggleAction};
use crate::scene::{EntityKind, SceneGraph, VideoSnapshot};
use crate::storage;
use crate::task::TaskToken;
use crate::ui::{ElementId, UiSurface};

// ── Panel ────────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Collapse or expand the panel and persist the new state. Returns
    /// whether the panel is now collapsed.
    pub fn toggle_panel(&mut self) -> Result<bool, PanelError> {
        let collapsed = !self
            .ui
            .has_class(ElementId::UiPanel, &self.options.page.collapsed_class);
        self.apply_panel_collapsed(collapsed);
        storage::store_flag(
            &mut self.store,
            &self.options.page.panel_state_key,
            collapsed,
        )?;
        Ok(collapsed)
    }

    pub(super) fn apply_panel_collapsed(&mut self, collapsed: bool) {
        let page = &self.options.page;
        self.ui
            .set_class(ElementId::UiPanel, &page.collapsed_class, collapsed);
        self.ui.set_text(
            ElementId::TogglePanel,
            self.options.labels.panel(collapsed),
        );
    }
}

// ── Clipboard ────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Start a clipboard read for the model URL field. A newer request
    /// supersedes any pending one.
    pub(super) fn paste_model_url(&mut self) -> Deferred {
        Deferred::ReadClipboard(self.clipboard.issue())
    }

    pub(super) fn finish_clipboard_read(
        &mut self,
        token: TaskToken,
        result: Result<String, String>,
    ) {
        if !self.clipboard.resolve(token) {
            log::debug!("dropping stale clipboard read");
            return;
        }
        match result {
            Ok(text) => self.ui.set_value(ElementId::ModelUrl, &text),
            Err(e) => log::error!("Failed to read clipboard: {e}"),
        }
    }
}

// ── Loading and audio ────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    pub(super) fn on_video_ready(&mut self, source: &str) -> Option<Deferred> {
        let update = self.progress.on_ready()?;
        log::debug!("video {source} ready ({}%)", update.percent);
        self.ui.set_text(
            ElementId::LoadingText,
            &self.options.labels.loading(update.percent),
        );
        self.ui.set_width_percent(ElementId::ProgressBar, update.percent);
        update.completed.then(|| self.complete_loading())
    }

    /// Hide the overlay and attempt autoplay. Runs once per controller.
    pub(super) fn complete_loading(&mut self) -> Deferred {
        self.ui.set_class(
            ElementId::LoadingScreen,
            &self.options.page.fade_out_class,
            true,
        );
        log::info!("all videos loaded");
        Deferred::PlayAudio(self.audio.autoplay())
    }

    /// The mute/play button. Inert until loading completes.
    pub(super) fn toggle_audio(&mut self) -> Option<Deferred> {
        let toggled = self.audio.toggle(&mut self.audio_out)?;
        let playing = matches!(toggled, AudioToggle::Play(_));
        self.ui.set_text(
            ElementId::ToggleAudio,
            self.options.labels.audio(playing),
        );
        match toggled {
            AudioToggle::Play(token) => Some(Deferred::PlayAudio(token)),
            AudioToggle::Paused => None,
        }
    }

    pub(super) fn finish_playback(
        &mut self,
        token: TaskToken,
        result: Result<(), String>,
    ) {
        let playing = result.is_ok();
        if self.audio.resolve(token, result) {
            self.ui.set_text(
                ElementId::ToggleAudio,
                self.options.labels.audio(playing),
            );
        }
    }
}

// ── Export ───────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    /// Snapshot every video's placement and hand the JSON document to the
    /// file sink. Returns the number of exported sources.
    pub fn export_video_transforms(&mut self) -> Result<usize, PanelError> {
        let snapshots = self
            .scene
            .query(&[EntityKind::Video])
            .into_iter()
            .map(|id| VideoSnapshot::read_from(&self.scene, id))
            .collect::<Result<Vec<_>, _>>()?;
        let transforms = VideoTransforms::from_snapshots(&snapshots);
        let json = transforms.to_json_pretty()?;
        self.files
            .save(&self.options.page.export_file_name, EXPORT_MIME, &json)?;
        log::info!(
            "exported {} video transforms to {}",
            transforms.len(),
            self.options.page.export_file_name
        );
        Ok(transforms.len())
    }
}

// ── Gyroscope ────────────────────────────────────────────────────────────

impl<P: Platform> SceneController<P> {
    pub(super) fn toggle_gyroscope(&mut self) -> Option<Deferred> {
        let action = self.gyro.toggle(self.orientation.requires_permission());
        self.ui.set_text(
            ElementId::ToggleGyroscope,
            self.options.labels.gyroscope(self.gyro.is_active()),
        );
        match action {
            ToggleAction::Subscribe => {
                self.subscribe_orientation();
                None
            }
            ToggleAction::Unsubscribe => {
                self.unsubscribe_orientation();
                None
            }
            ToggleAction::RequestPermission(token) => {
                Some(Deferred::RequestOrientationPermission(token))
            }
        }
    }

    pub(super) fn finish_permission(
        &mut self,
        token: TaskToken,
        granted: bool,
    ) {
        if self.gyro.resolve_permission(token, granted) {
            self.subscribe_orientation();
        }
        // Stale responses leave the flag as is; denials have cleared it.
        self.ui.set_text(
            ElementId::ToggleGyroscope,
            self.options.labels.gyroscope(self.gyro.is_active()),
        );
    }

    pub(super) fn on_orientation(&mut self, sample: &OrientationSample) {
        if !self.orientation_subscribed {
            return;
        }
        if let Some(direction) = self.gyro.direction_for(sample) {
            let eye = self.camera.position();
            self.camera.look_at(eye + direction);
        }
    }

    fn subscribe_orientation(&mut self) {
        if !self.orientation_subscribed {
            self.orientation.subscribe();
            self.orientation_subscribed = true;
        }
    }

    fn unsubscribe_orientation(&mut self) {
        if self.orientation_subscribed {
            self.orientation.unsubscribe();
            self.orientation_subscribed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::controller::{ObjectType, PanelCommand};
    use crate::scene::{EntityTransform, MemoryScene, POSITION, ROTATION, SRC};
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::testing::{self, TestPlatform};

    const PANEL_KEY: &str = "uiPanelCollapsed";
    const FADE: &str = "fade-out";

    fn with_videos(sources: &[&str]) -> MemoryScene {
        let mut scene = MemoryScene::new();
        for &source in sources {
            let _ = scene.spawn(EntityKind::Video, &[(SRC, source)]);
        }
        scene
    }

    fn running(scene: MemoryScene) -> SceneController<TestPlatform> {
        let mut controller = testing::controller(scene);
        let _ = controller.init().unwrap();
        controller
    }

    fn exec(
        controller: &mut SceneController<TestPlatform>,
        cmd: PanelCommand,
    ) -> Option<Deferred> {
        controller.execute(cmd).unwrap()
    }

    fn play_token(deferred: Option<Deferred>) -> TaskToken {
        match deferred {
            Some(Deferred::PlayAudio(token)) => token,
            other => panic!("expected a play request, got {other:?}"),
        }
    }

    // ── Init / dispose ───────────────────────────────────────────────

    #[test]
    fn missing_raycaster_aborts_init_without_side_effects() {
        let mut handles = testing::handles(MemoryScene::without_components());
        handles.store = MemoryStore::with_entries(&[(PANEL_KEY, "true")]);
        let mut controller = SceneController::new(handles, Default::default());

        let err = controller.init().unwrap_err();
        assert!(matches!(err, PanelError::MissingComponent(_)));
        assert!(!controller.is_running());
        assert!(!controller.ui_state().panel_collapsed);
        assert_eq!(controller.scene().raycaster_scope(), None);
        assert_eq!(
            controller.execute(PanelCommand::TogglePanel).unwrap(),
            None
        );
        assert_eq!(controller.store().get(PANEL_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn init_scopes_raycaster_and_restores_panel() {
        let mut handles = testing::handles(with_videos(&["a.mp4"]));
        handles.store = MemoryStore::with_entries(&[(PANEL_KEY, "true")]);
        let mut controller = SceneController::new(handles, Default::default());

        assert_eq!(controller.init().unwrap(), None);
        assert_eq!(
            controller.scene().raycaster_scope(),
            Some("[data-raycastable]")
        );
        assert!(controller.ui_state().panel_collapsed);
        assert_eq!(controller.ui().text(ElementId::TogglePanel), "◀ Controls");
        assert_eq!(controller.progress().total(), 1);
    }

    #[test]
    fn disposed_controller_ignores_commands() {
        let mut controller = running(MemoryScene::new());
        let _ = controller.execute(PanelCommand::ToggleGyroscope).unwrap();
        assert!(controller.orientation_source().subscribed);

        controller.dispose();
        assert!(!controller.orientation_source().subscribed);
        assert!(!controller.ui_state().gyro_active);
        assert_eq!(exec(&mut controller, PanelCommand::TogglePanel), None);
        assert!(!controller.ui_state().panel_collapsed);
    }

    // ── Panel ────────────────────────────────────────────────────────

    #[test]
    fn panel_toggled_twice_restores_flag_and_label() {
        let mut controller = running(MemoryScene::new());
        let original_label =
            controller.ui().text(ElementId::TogglePanel).to_owned();

        let _ = controller.execute(PanelCommand::TogglePanel).unwrap();
        assert_eq!(controller.store().get(PANEL_KEY).as_deref(), Some("true"));
        assert_eq!(controller.ui().text(ElementId::TogglePanel), "◀ Controls");
        assert!(controller.ui_state().panel_collapsed);

        let _ = controller.execute(PanelCommand::TogglePanel).unwrap();
        assert_eq!(controller.store().get(PANEL_KEY).as_deref(), Some("false"));
        assert_eq!(
            controller.ui().text(ElementId::TogglePanel),
            original_label
        );
        assert!(!controller.ui_state().panel_collapsed);
    }

    // ── Loading ──────────────────────────────────────────────────────

    #[test]
    fn overlay_hides_once_after_last_video() {
        let mut controller = running(with_videos(&["a.mp4", "b.mp4", "c.mp4"]));
        let ready = |source: &str| PanelCommand::VideoReady {
            source: source.to_owned(),
        };

        assert_eq!(controller.execute(ready("a.mp4")).unwrap(), None);
        assert_eq!(controller.execute(ready("b.mp4")).unwrap(), None);
        assert_eq!(controller.progress().percent(), 67);
        assert_eq!(
            controller.ui().text(ElementId::LoadingText),
            "Loading Experience... 67%"
        );
        assert_eq!(controller.ui().width(ElementId::ProgressBar), Some(67));
        assert!(!controller.ui().has_class(ElementId::LoadingScreen, FADE));

        let deferred = controller.execute(ready("c.mp4")).unwrap();
        let _ = play_token(deferred);
        assert_eq!(controller.ui().width(ElementId::ProgressBar), Some(100));
        assert_eq!(
            controller.ui().class_additions(ElementId::LoadingScreen, FADE),
            1
        );

        // Extra signals after completion change nothing.
        assert_eq!(controller.execute(ready("c.mp4")).unwrap(), None);
        assert_eq!(
            controller.ui().class_additions(ElementId::LoadingScreen, FADE),
            1
        );
    }

    #[test]
    fn video_errors_do_not_advance_progress() {
        let mut controller = running(with_videos(&["a.mp4", "b.mp4"]));
        let _ = controller
            .execute(PanelCommand::VideoError {
                source: "a.mp4".to_owned(),
                detail: "404".to_owned(),
            })
            .unwrap();
        assert_eq!(controller.progress().loaded(), 0);
        assert!(!controller.progress().is_complete());
    }

    #[test]
    fn empty_scene_completes_at_init() {
        let mut controller = testing::controller(MemoryScene::new());
        let _ = play_token(controller.init().unwrap());
        assert!(controller.ui().has_class(ElementId::LoadingScreen, FADE));
        assert!(controller.audio().is_unlocked());
    }

    // ── Audio ────────────────────────────────────────────────────────

    #[test]
    fn blocked_autoplay_retries_on_first_gesture() {
        let mut controller = testing::controller(MemoryScene::new());
        let token = play_token(controller.init().unwrap());
        let _ = controller
            .execute(PanelCommand::PlaybackResolved {
                token,
                result: Err("NotAllowedError".to_owned()),
            })
            .unwrap();
        assert!(controller.audio().fallback_armed());

        let retry =
            play_token(controller.execute(PanelCommand::UserGesture).unwrap());
        assert_eq!(
            controller.execute(PanelCommand::UserGesture).unwrap(),
            None
        );

        controller.audio_output_mut().play();
        let _ = controller
            .execute(PanelCommand::PlaybackResolved {
                token: retry,
                result: Ok(()),
            })
            .unwrap();
        assert!(controller.ui_state().audio_playing);
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "Mute Audio");
    }

    #[test]
    fn audio_button_during_gesture_retry_keeps_audio_on() {
        let mut controller = testing::controller(MemoryScene::new());
        let token = play_token(controller.init().unwrap());
        let _ = controller
            .execute(PanelCommand::PlaybackResolved {
                token,
                result: Err("NotAllowedError".to_owned()),
            })
            .unwrap();

        let retry =
            play_token(controller.execute(PanelCommand::UserGesture).unwrap());
        controller.audio_output_mut().play();

        let press =
            play_token(controller.execute(PanelCommand::ToggleAudio).unwrap());
        assert!(controller.ui_state().audio_playing);
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "Mute Audio");

        for token in [retry, press] {
            let _ = controller
                .execute(PanelCommand::PlaybackResolved {
                    token,
                    result: Ok(()),
                })
                .unwrap();
        }
        assert!(controller.ui_state().audio_playing);
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "Mute Audio");
        assert_eq!(controller.audio_output().pause_calls, 0);
    }

    #[test]
    fn audio_toggle_waits_for_loading() {
        let mut controller = running(with_videos(&["a.mp4"]));
        assert_eq!(exec(&mut controller, PanelCommand::ToggleAudio), None);
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "");
    }

    #[test]
    fn audio_toggle_pauses_and_resumes() {
        let mut controller = testing::controller(MemoryScene::new());
        let token = play_token(controller.init().unwrap());
        controller.audio_output_mut().play();
        let _ = controller
            .execute(PanelCommand::PlaybackResolved {
                token,
                result: Ok(()),
            })
            .unwrap();

        assert_eq!(exec(&mut controller, PanelCommand::ToggleAudio), None);
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "Play Audio");
        assert!(!controller.ui_state().audio_playing);

        let _ = play_token(exec(&mut controller, PanelCommand::ToggleAudio));
        assert_eq!(controller.ui().text(ElementId::ToggleAudio), "Mute Audio");
    }

    // ── Clipboard ────────────────────────────────────────────────────

    fn clipboard_token(deferred: Option<Deferred>) -> TaskToken {
        match deferred {
            Some(Deferred::ReadClipboard(token)) => token,
            other => panic!("expected a clipboard read, got {other:?}"),
        }
    }

    #[test]
    fn clipboard_text_fills_url_field() {
        let mut controller = running(MemoryScene::new());
        let token =
            clipboard_token(exec(&mut controller, PanelCommand::PasteModelUrl));
        let _ = controller
            .execute(PanelCommand::ClipboardResolved {
                token,
                result: Ok("https://example.com/a.glb".to_owned()),
            })
            .unwrap();
        assert_eq!(
            controller.ui().value(ElementId::ModelUrl),
            "https://example.com/a.glb"
        );
    }

    #[test]
    fn clipboard_failure_leaves_field_untouched() {
        let mut controller = running(MemoryScene::new());
        controller.ui_mut().set_value(ElementId::ModelUrl, "keep.glb");
        let token =
            clipboard_token(exec(&mut controller, PanelCommand::PasteModelUrl));
        let _ = controller
            .execute(PanelCommand::ClipboardResolved {
                token,
                result: Err("denied".to_owned()),
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::ModelUrl), "keep.glb");
    }

    #[test]
    fn superseded_clipboard_read_is_dropped() {
        let mut controller = running(MemoryScene::new());
        let first =
            clipboard_token(exec(&mut controller, PanelCommand::PasteModelUrl));
        let second =
            clipboard_token(exec(&mut controller, PanelCommand::PasteModelUrl));
        let _ = controller
            .execute(PanelCommand::ClipboardResolved {
                token: first,
                result: Ok("old.glb".to_owned()),
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::ModelUrl), "");
        let _ = controller
            .execute(PanelCommand::ClipboardResolved {
                token: second,
                result: Ok("new.glb".to_owned()),
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::ModelUrl), "new.glb");
    }

    // ── Export ───────────────────────────────────────────────────────

    #[test]
    fn export_writes_video_positions() {
        let mut scene = MemoryScene::new();
        let _ = scene.spawn(
            EntityKind::Video,
            &[(SRC, "a.mp4"), (POSITION, "1 2 3"), (ROTATION, "0 45 0")],
        );
        let _ = scene.spawn(EntityKind::Sky, &[]);
        let mut controller = running(scene);
        let _ = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap();

        let _ = controller.execute(PanelCommand::SaveVideoTransforms).unwrap();
        let saved = controller.files().saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].file_name, "video_positions.json");
        assert_eq!(saved[0].mime, "text/json");

        let parsed: serde_json::Value =
            serde_json::from_str(&saved[0].contents).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "a.mp4": {"x": 1, "y": 2, "z": 3, "rotationY": 45}
            })
        );
        assert!(saved[0].contents.contains("\"x\": 1,"));
    }

    #[test]
    fn export_keeps_scene_precision() {
        let mut scene = MemoryScene::new();
        let _ = scene.spawn(
            EntityKind::Video,
            &[
                (SRC, "b.mp4"),
                (POSITION, "1.23456789 1234.5678 0.3"),
                (ROTATION, "0 33.333333 0"),
            ],
        );
        let mut controller = running(scene);

        let _ = controller.execute(PanelCommand::SaveVideoTransforms).unwrap();
        let contents = &controller.files().saved()[0].contents;
        assert!(contents.contains("\"x\": 1.23456789,"));
        assert!(contents.contains("\"y\": 1234.5678,"));
        assert!(contents.contains("\"rotationY\": 33.333333"));
    }

    // ── Gyroscope ────────────────────────────────────────────────────

    fn permission_token(deferred: Option<Deferred>) -> TaskToken {
        match deferred {
            Some(Deferred::RequestOrientationPermission(token)) => token,
            other => panic!("expected a permission request, got {other:?}"),
        }
    }

    fn gated(scene: MemoryScene) -> SceneController<TestPlatform> {
        let mut handles = testing::handles(scene);
        handles.orientation.requires_permission = true;
        let mut controller = SceneController::new(handles, Default::default());
        let _ = controller.init().unwrap();
        controller
    }

    #[test]
    fn gyroscope_steers_camera_while_active() {
        let mut controller = running(MemoryScene::new());
        let _ = controller.execute(PanelCommand::ToggleGyroscope).unwrap();
        assert_eq!(
            controller.ui().text(ElementId::ToggleGyroscope),
            "Disable Gyroscope"
        );

        let eye = controller.camera().position();
        let _ = controller
            .execute(PanelCommand::Orientation(OrientationSample::new(
                0.0, 0.0, 0.0,
            )))
            .unwrap();
        assert!((controller.camera().target - (eye + Vec3::X)).length() < 1e-5);

        let _ = controller.execute(PanelCommand::ToggleGyroscope).unwrap();
        assert!(!controller.orientation_source().subscribed);
        assert_eq!(
            controller.ui().text(ElementId::ToggleGyroscope),
            "Enable Gyroscope"
        );
    }

    #[test]
    fn granted_permission_subscribes() {
        let mut controller = gated(MemoryScene::new());
        let toggled = exec(&mut controller, PanelCommand::ToggleGyroscope);
        let token = permission_token(toggled);
        assert!(!controller.orientation_source().subscribed);

        let _ = controller
            .execute(PanelCommand::PermissionResolved {
                token,
                granted: true,
            })
            .unwrap();
        assert!(controller.orientation_source().subscribed);
        assert!(controller.ui_state().gyro_active);
    }

    #[test]
    fn denied_permission_resets_label() {
        let mut controller = gated(MemoryScene::new());
        let toggled = exec(&mut controller, PanelCommand::ToggleGyroscope);
        let token = permission_token(toggled);
        let _ = controller
            .execute(PanelCommand::PermissionResolved {
                token,
                granted: false,
            })
            .unwrap();
        assert!(!controller.orientation_source().subscribed);
        assert!(!controller.ui_state().gyro_active);
        assert_eq!(
            controller.ui().text(ElementId::ToggleGyroscope),
            "Enable Gyroscope"
        );
    }

    #[test]
    fn late_grant_after_toggle_off_never_subscribes() {
        let mut controller = gated(MemoryScene::new());
        let toggled = exec(&mut controller, PanelCommand::ToggleGyroscope);
        let token = permission_token(toggled);
        let _ = controller.execute(PanelCommand::ToggleGyroscope).unwrap();
        let _ = controller
            .execute(PanelCommand::PermissionResolved {
                token,
                granted: true,
            })
            .unwrap();
        assert!(!controller.orientation_source().subscribed);
        assert_eq!(controller.orientation_source().subscribe_calls, 0);
        assert_eq!(
            controller.ui().text(ElementId::ToggleGyroscope),
            "Enable Gyroscope"
        );
    }

    #[test]
    fn samples_before_permission_are_ignored() {
        let mut controller = gated(MemoryScene::new());
        let _ = controller.execute(PanelCommand::ToggleGyroscope).unwrap();
        let before = controller.camera().target;
        let _ = controller
            .execute(PanelCommand::Orientation(OrientationSample::new(
                90.0, 0.0, 0.0,
            )))
            .unwrap();
        assert_eq!(controller.camera().target, before);
    }
}
