//! Browser binding: wires the live document to a [`SceneController`].
//!
//! The page calls the exported `start()` once the DOM is ready. All
//! listeners hold a weak handle to the controller and dispatch through
//! [`UiEvent`]s. Work the controller defers (audio playback, clipboard
//! reads, permission prompts) runs on `spawn_local` and resumes with the
//! task token it was issued, never holding a borrow across an await.

mod dom;
mod platform;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, KeyboardEvent, Node, Window,
};

pub use dom::{DomScene, DomUi};
pub use platform::{
    DeviceOrientation, DownloadSink, LocalStore, MediaAudio, SceneCamera,
    WebPlatform,
};

use crate::controller::{
    Deferred, Handles, PanelCommand, SceneController, UiEvent,
};
use crate::error::PanelError;
use crate::options::Options;
use crate::ui::{ElementId, PanelEventPolicy, UiSurface};

type Shared = Rc<RefCell<SceneController<WebPlatform>>>;

/// Inline TOML preset, e.g.
/// `<script type="application/toml" id="scene-controls-options">`.
const OPTIONS_SELECTOR: &str = "#scene-controls-options";

/// Buttons that translate straight into a click command.
const BUTTONS: [ElementId; 8] = [
    ElementId::TogglePanel,
    ElementId::AddObject,
    ElementId::ClearObjects,
    ElementId::ToggleBackground,
    ElementId::PasteUrl,
    ElementId::ToggleAudio,
    ElementId::SavePositions,
    ElementId::ToggleGyroscope,
];


/// Entry point: install logging, build the controller over the document and
/// wire every listener.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }

    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    mount(&window, &document).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn mount(window: &Window, document: &Document) -> Result<(), PanelError> {
    let options = load_options(document);
    let ui = DomUi::resolve(document)?;
    let scene = DomScene::resolve(document)?;
    let audio = MediaAudio::resolve(document)?;
    let store = LocalStore::open(window);
    let camera = SceneCamera::new(scene.element().clone());
    let files = DownloadSink::new(document.clone());
    let scene_element = scene.element().clone();

    let orientation_window = window.clone();
    let shared: Shared = Rc::new_cyclic(|weak: &Weak<RefCell<_>>| {
        let orientation =
            DeviceOrientation::new(orientation_window, weak.clone());
        RefCell::new(SceneController::new(
            Handles {
                scene,
                ui,
                store,
                audio,
                camera,
                orientation,
                files,
            },
            options,
        ))
    });

    let deferred = shared.borrow_mut().init()?;
    wire_panel(&shared)?;
    wire_scene(&shared, document, &scene_element)?;
    listen(document, "click", &shared, |shared, _| {
        forward(shared, UiEvent::DocumentClick);
    })?;

    if let Some(deferred) = deferred {
        run_deferred(&shared, deferred);
    }
    Ok(())
}

fn load_options(document: &Document) -> Options {
    let preset = document
        .query_selector(OPTIONS_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.text_content());
    let Some(preset) = preset else {
        return Options::default();
    };
    Options::from_toml(&preset).unwrap_or_else(|e| {
        log::warn!("ignoring invalid options preset: {e}");
        Options::default()
    })
}

// ── Wiring ───────────────────────────────────────────────────────────────

fn wire_panel(shared: &Shared) -> Result<(), PanelError> {
    let element = |id: ElementId| -> Result<EventTarget, PanelError> {
        shared
            .borrow()
            .ui()
            .element(id)
            .map(|el| el.clone().into())
            .ok_or_else(|| PanelError::MissingElement(id.selector().to_owned()))
    };

    let panel = element(ElementId::UiPanel)?;
    for name in PanelEventPolicy::EVENTS {
        let policy = PanelEventPolicy::for_event(name);
        listen(&panel, name, shared, move |_, event| {
            event.stop_propagation();
            if policy == PanelEventPolicy::SwallowAndBlock {
                event.prevent_default();
            }
        })?;
    }

    for id in BUTTONS {
        listen(&element(id)?, "click", shared, move |shared, event| {
            event.stop_propagation();
            forward(shared, UiEvent::Click(id));
        })?;
    }

    for id in [
        ElementId::ScaleSlider,
        ElementId::RotationSlider,
        ElementId::PosX,
        ElementId::PosY,
        ElementId::PosZ,
    ] {
        listen(&element(id)?, "input", shared, move |shared, event| {
            event.stop_propagation();
            let value = shared.borrow().ui().value(id);
            forward(shared, UiEvent::Input { target: id, value });
        })?;
    }

    for id in [ElementId::PosX, ElementId::PosY, ElementId::PosZ] {
        listen(&element(id)?, "blur", shared, move |shared, _| {
            forward(shared, UiEvent::Blur(id));
        })?;
    }

    listen(
        &element(ElementId::ModelUrl)?,
        "keydown",
        shared,
        |shared, event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let ui_event = UiEvent::KeyDown {
                target: ElementId::ModelUrl,
                key: key.key(),
                ctrl: key.ctrl_key(),
                meta: key.meta_key(),
            };
            if let Some(cmd) = ui_event.into_command() {
                event.prevent_default();
                dispatch(shared, cmd);
            }
        },
    )?;

    wire_step_buttons(shared)
}

fn wire_step_buttons(shared: &Shared) -> Result<(), PanelError> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let buttons = document
        .query_selector_all(".position-btn")
        .map_err(|e| js_error("querySelectorAll", &e))?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i).and_then(as_element) else {
            continue;
        };
        let field = button
            .get_attribute("data-input")
            .and_then(|id| ElementId::from_dom_id(&id));
        let Some(field) = field else {
            log::warn!("step button without a known data-input");
            continue;
        };
        let action = button.get_attribute("data-action").unwrap_or_default();
        listen(&button, "click", shared, move |shared, event| {
            event.stop_propagation();
            forward(
                shared,
                UiEvent::StepButton {
                    field,
                    action: action.clone(),
                },
            );
        })?;
    }
    Ok(())
}

fn wire_scene(
    shared: &Shared,
    document: &Document,
    scene: &Element,
) -> Result<(), PanelError> {
    let videos = scene
        .query_selector_all("a-video")
        .map_err(|e| js_error("querySelectorAll", &e))?;
    for i in 0..videos.length() {
        let Some(video) = videos.item(i).and_then(as_element) else {
            continue;
        };
        let source = video.get_attribute("src").unwrap_or_default();
        // `src="#asset"` points at a <video> in <a-assets>, which is what
        // actually emits media events.
        let target: EventTarget = source
            .strip_prefix('#')
            .and_then(|_| document.query_selector(&source).ok().flatten())
            .unwrap_or(video)
            .into();

        let ready_source = source.clone();
        listen(&target, "loadeddata", shared, move |shared, _| {
            forward(
                shared,
                UiEvent::VideoReady {
                    source: ready_source.clone(),
                },
            );
        })?;
        listen(&target, "error", shared, move |shared, event| {
            forward(
                shared,
                UiEvent::VideoError {
                    source: source.clone(),
                    detail: event.type_(),
                },
            );
        })?;
    }

    listen(scene, "enter-vr", shared, |shared, _| {
        forward(shared, UiEvent::VrModeChanged(true));
    })?;
    listen(scene, "exit-vr", shared, |shared, _| {
        forward(shared, UiEvent::VrModeChanged(false));
    })
}

/// Attach `handler` to `target`. The closure lives for the page's lifetime.
fn listen<F>(
    target: &EventTarget,
    name: &str,
    shared: &Shared,
    mut handler: F,
) -> Result<(), PanelError>
where
    F: FnMut(&Shared, &Event) + 'static,
{
    let weak = Rc::downgrade(shared);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(shared) = weak.upgrade() {
            handler(&shared, &event);
        }
    });
    target
        .add_event_listener_with_callback(
            name,
            closure.as_ref().unchecked_ref(),
        )
        .map_err(|e| js_error("addEventListener", &e))?;
    closure.forget();
    Ok(())
}

// ── Dispatch ─────────────────────────────────────────────────────────────

fn forward(shared: &Shared, event: UiEvent) {
    if let Some(cmd) = event.into_command() {
        dispatch(shared, cmd);
    }
}

/// Execute one command and start whatever it defers.
fn dispatch(shared: &Shared, cmd: PanelCommand) {
    let outcome = match shared.try_borrow_mut() {
        Ok(mut controller) => controller.execute(cmd),
        Err(_) => {
            log::warn!("dropping re-entrant {cmd:?}");
            return;
        }
    };
    match outcome {
        Ok(Some(deferred)) => run_deferred(shared, deferred),
        Ok(None) => {}
        Err(e) => log::error!("{e}"),
    }
}

fn run_deferred(shared: &Shared, deferred: Deferred) {
    let shared = Rc::clone(shared);
    match deferred {
        Deferred::PlayAudio(token) => {
            let element = shared.borrow().audio_output().element().clone();
            spawn_local(async move {
                let result = match element.play() {
                    Ok(promise) => JsFuture::from(promise)
                        .await
                        .map(|_| ())
                        .map_err(|e| describe(&e)),
                    Err(e) => Err(describe(&e)),
                };
                let cmd = PanelCommand::PlaybackResolved { token, result };
                dispatch(&shared, cmd);
            });
        }
        Deferred::ReadClipboard(token) => spawn_local(async move {
            let result = read_clipboard().await;
            let cmd = PanelCommand::ClipboardResolved { token, result };
            dispatch(&shared, cmd);
        }),
        Deferred::RequestOrientationPermission(token) => {
            spawn_local(async move {
                let granted = request_orientation_permission().await;
                let cmd = PanelCommand::PermissionResolved { token, granted };
                dispatch(&shared, cmd);
            });
        }
    }
}

async fn read_clipboard() -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
    let promise = Reflect::get(&window, &"navigator".into())
        .and_then(|navigator| Reflect::get(&navigator, &"clipboard".into()))
        .and_then(|clipboard| call_method(&clipboard, "readText", &[]))
        .and_then(|value| value.dyn_into::<Promise>())
        .map_err(|e| describe(&e))?;
    let text = JsFuture::from(promise).await.map_err(|e| describe(&e))?;
    text.as_string()
        .ok_or_else(|| "clipboard returned non-text data".to_owned())
}

async fn request_orientation_permission() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let request = Reflect::get(&window, &"DeviceOrientationEvent".into())
        .and_then(|ctor| call_method(&ctor, "requestPermission", &[]))
        .and_then(|value| value.dyn_into::<Promise>());
    let outcome = match request {
        Ok(promise) => JsFuture::from(promise).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(state) => state.as_string().as_deref() == Some("granted"),
        Err(e) => {
            log::error!("{}", js_error("requestPermission", &e));
            false
        }
    }
}

// ── JS helpers ───────────────────────────────────────────────────────────

/// Call `target[name](...args)`.
fn call_method(
    target: &JsValue,
    name: &str,
    args: &[JsValue],
) -> Result<JsValue, JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<js_sys::Function>()?;
    let args: js_sys::Array = args.iter().collect();
    method.apply(target, &args)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn as_element(node: Node) -> Option<Element> {
    node.dyn_into::<Element>().ok()
}

fn js_error(context: &str, value: &JsValue) -> PanelError {
    PanelError::Platform(format!("{context}: {}", describe(value)))
}
