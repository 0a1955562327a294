//! Browser collaborators: `localStorage`, the background `<audio>`, the
//! device-orientation stream, data-URL downloads and the A-Frame camera.

use std::cell::RefCell;
use std::rc::Weak;

use glam::Vec3;
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    DeviceOrientationEvent, Document, Element, Event, HtmlAnchorElement,
    HtmlMediaElement, Storage, Window,
};

use super::dom::{DomScene, DomUi};
use super::{call_method, forward, js_error};
use crate::audio::AudioOutput;
use crate::camera::CameraRig;
use crate::controller::{Platform, SceneController, UiEvent};
use crate::error::PanelError;
use crate::export::FileSink;
use crate::orientation::{OrientationSample, OrientationSource};
use crate::storage::KeyValueStore;

/// Platform bundle over the live document.
pub struct WebPlatform;

impl Platform for WebPlatform {
    type Scene = DomScene;
    type Ui = DomUi;
    type Store = LocalStore;
    type Audio = MediaAudio;
    type Camera = SceneCamera;
    type Orientation = DeviceOrientation;
    type Files = DownloadSink;
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// `window.localStorage`, when the browser grants it.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// Open the window's local storage. Private browsing modes may deny it.
    #[must_use]
    pub fn open(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!(
                "localStorage unavailable; panel state will not persist"
            );
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PanelError> {
        let storage = self.storage.as_ref().ok_or_else(|| {
            PanelError::Storage("localStorage unavailable".to_owned())
        })?;
        storage
            .set_item(key, value)
            .map_err(|e| PanelError::Storage(super::describe(&e)))
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Selector of the background track.
const AUDIO_SELECTOR: &str = "#background-audio";

/// The background `<audio>` element.
pub struct MediaAudio {
    element: HtmlMediaElement,
}

impl MediaAudio {
    /// Find the background track.
    pub fn resolve(document: &Document) -> Result<Self, PanelError> {
        let element = document
            .query_selector(AUDIO_SELECTOR)
            .map_err(|e| js_error("querySelector", &e))?
            .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
            .ok_or_else(|| {
                PanelError::MissingElement(AUDIO_SELECTOR.to_owned())
            })?;
        Ok(Self { element })
    }

    /// The element, for hosts that start playback.
    #[must_use]
    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl AudioOutput for MediaAudio {
    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::warn!("{}", js_error("pause", &e));
        }
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// `deviceorientation` listener on the window that forwards samples to the
/// controller.
pub struct DeviceOrientation {
    window: Window,
    listener: Closure<dyn FnMut(Event)>,
}

impl DeviceOrientation {
    /// Listener that dispatches into `controller`. Holds a weak handle so
    /// the controller can own this source.
    #[must_use]
    pub fn new(
        window: Window,
        controller: Weak<RefCell<SceneController<WebPlatform>>>,
    ) -> Self {
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<DeviceOrientationEvent>() else {
                return;
            };
            let sample = OrientationSample {
                alpha: event.alpha(),
                beta: event.beta(),
                gamma: event.gamma(),
            };
            if let Some(shared) = controller.upgrade() {
                forward(&shared, UiEvent::Orientation(sample));
            }
        });
        Self { window, listener }
    }
}

impl OrientationSource for DeviceOrientation {
    fn requires_permission(&self) -> bool {
        Reflect::get(&self.window, &"DeviceOrientationEvent".into())
            .and_then(|ctor| Reflect::get(&ctor, &"requestPermission".into()))
            .is_ok_and(|request| request.is_function())
    }

    fn subscribe(&mut self) {
        if let Err(e) = self.window.add_event_listener_with_callback(
            "deviceorientation",
            self.listener.as_ref().unchecked_ref(),
        ) {
            log::error!("{}", js_error("addEventListener", &e));
        }
    }

    fn unsubscribe(&mut self) {
        if let Err(e) = self.window.remove_event_listener_with_callback(
            "deviceorientation",
            self.listener.as_ref().unchecked_ref(),
        ) {
            log::warn!("{}", js_error("removeEventListener", &e));
        }
    }
}

// ---------------------------------------------------------------------------
// Downloads
// ---------------------------------------------------------------------------

/// Saves files through a synthesized `<a download>` with a data URL.
pub struct DownloadSink {
    document: Document,
}

impl DownloadSink {
    /// Sink over `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl FileSink for DownloadSink {
    fn save(
        &mut self,
        file_name: &str,
        mime: &str,
        contents: &str,
    ) -> Result<(), PanelError> {
        let href = format!(
            "data:{mime};charset=utf-8,{}",
            String::from(js_sys::encode_uri_component(contents))
        );
        let anchor = self
            .document
            .create_element("a")
            .map_err(|e| js_error("createElement", &e))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| {
                PanelError::Platform("<a> is not an anchor".to_owned())
            })?;
        anchor.set_href(&href);
        anchor.set_download(file_name);

        let body = self
            .document
            .body()
            .ok_or_else(|| PanelError::MissingElement("body".to_owned()))?;
        let _ = body
            .append_child(&anchor)
            .map_err(|e| js_error("appendChild", &e))?;
        anchor.click();
        anchor.remove();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// The scene's active camera entity, looked up on every call since the
/// framework can swap cameras at runtime.
pub struct SceneCamera {
    scene: Element,
}

impl SceneCamera {
    /// Camera of the given `<a-scene>`.
    #[must_use]
    pub fn new(scene: Element) -> Self {
        Self { scene }
    }

    fn object3d(&self) -> Option<JsValue> {
        let camera = Reflect::get(&self.scene, &"camera".into()).ok()?;
        let entity = Reflect::get(&camera, &"el".into()).ok()?;
        Reflect::get(&entity, &"object3D".into())
            .ok()
            .filter(|object| object.is_object())
    }
}

impl CameraRig for SceneCamera {
    fn position(&self) -> Vec3 {
        let Some(object) = self.object3d() else {
            return Vec3::ZERO;
        };
        let Ok(position) = Reflect::get(&object, &"position".into()) else {
            return Vec3::ZERO;
        };
        let axis = |key: &str| {
            Reflect::get(&position, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32
        };
        Vec3::new(axis("x"), axis("y"), axis("z"))
    }

    fn look_at(&mut self, target: Vec3) {
        let Some(object) = self.object3d() else {
            log::debug!("scene camera not ready");
            return;
        };
        let args = [target.x, target.y, target.z]
            .map(|v| JsValue::from_f64(f64::from(v)));
        if let Err(e) = call_method(&object, "lookAt", &args) {
            log::warn!("{}", js_error("lookAt", &e));
        }
    }
}
