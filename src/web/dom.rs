//! DOM-backed [`UiSurface`] and A-Frame-backed [`SceneGraph`].

use std::cell::{Cell, RefCell};

use js_sys::Reflect;
use rustc_hash::FxHashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement,
};

use super::{call_method, js_error};
use crate::error::PanelError;
use crate::scene::{EntityId, EntityKind, SceneGraph};
use crate::ui::{ElementId, UiSurface};

// ---------------------------------------------------------------------------
// UI
// ---------------------------------------------------------------------------

/// Panel elements resolved once from the document.
pub struct DomUi {
    elements: FxHashMap<ElementId, HtmlElement>,
}

impl DomUi {
    /// Resolve every [`ElementId`]. Fails on the first missing element.
    pub fn resolve(document: &Document) -> Result<Self, PanelError> {
        let mut elements = FxHashMap::default();
        for id in ElementId::ALL {
            let element = document
                .query_selector(id.selector())
                .map_err(|e| js_error("querySelector", &e))?
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .ok_or_else(|| {
                    PanelError::MissingElement(id.selector().to_owned())
                })?;
            let _ = elements.insert(id, element);
        }
        Ok(Self { elements })
    }

    /// The resolved element behind `id`.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&HtmlElement> {
        self.elements.get(&id)
    }
}

impl UiSurface for DomUi {
    fn value(&self, id: ElementId) -> String {
        let Some(el) = self.element(id) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        let Some(el) = self.element(id) else { return };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) {
        if let Some(el) = self.element(id) {
            if let Err(e) = el.class_list().toggle_with_force(class, on) {
                log::warn!("{}", js_error("classList.toggle", &e));
            }
        }
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_width_percent(&mut self, id: ElementId, percent: u32) {
        if let Some(el) = self.element(id) {
            let _ = el.style().set_property("width", &format!("{percent}%"));
        }
    }

    fn notify(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Attribute stamping a stable [`EntityId`] onto scene elements.
const ID_ATTRIBUTE: &str = "data-panel-entity";

/// The `<a-scene>` element and the entities seen through it.
///
/// Queries hand out ids lazily, so the table sits behind interior
/// mutability.
pub struct DomScene {
    document: Document,
    scene: Element,
    entities: RefCell<FxHashMap<EntityId, Element>>,
    next_entity_id: Cell<u32>,
}

impl DomScene {
    /// Find the document's `<a-scene>`.
    pub fn resolve(document: &Document) -> Result<Self, PanelError> {
        let scene = document
            .query_selector("a-scene")
            .map_err(|e| js_error("querySelector", &e))?
            .ok_or_else(|| PanelError::MissingElement("a-scene".to_owned()))?;
        Ok(Self {
            document: document.clone(),
            scene,
            entities: RefCell::new(FxHashMap::default()),
            next_entity_id: Cell::new(0),
        })
    }

    /// The `<a-scene>` element.
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.scene
    }

    fn track(&self, element: Element) -> EntityId {
        let known = element
            .get_attribute(ID_ATTRIBUTE)
            .and_then(|raw| raw.parse::<u32>().ok())
            .map(EntityId);
        if let Some(id) = known {
            if self.entities.borrow().contains_key(&id) {
                return id;
            }
        }
        let id = EntityId(self.next_entity_id.get());
        self.next_entity_id.set(id.0 + 1);
        let _ = element.set_attribute(ID_ATTRIBUTE, &id.0.to_string());
        let _ = self.entities.borrow_mut().insert(id, element);
        id
    }

    fn lookup(&self, id: EntityId) -> Result<Element, PanelError> {
        self.entities
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                PanelError::Scene(format!("unknown entity {}", id.0))
            })
    }
}

impl SceneGraph for DomScene {
    fn has_component(&self, name: &str) -> bool {
        Reflect::get(&self.scene, &"components".into())
            .and_then(|components| Reflect::get(&components, &name.into()))
            .is_ok_and(|component| {
                !component.is_undefined() && !component.is_null()
            })
    }

    fn create_entity(
        &mut self,
        kind: EntityKind,
    ) -> Result<EntityId, PanelError> {
        let element = self
            .document
            .create_element(kind.tag())
            .map_err(|e| js_error("createElement", &e))?;
        let _ = self
            .scene
            .append_child(&element)
            .map_err(|e| js_error("appendChild", &e))?;
        Ok(self.track(element))
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        match self.entities.borrow_mut().remove(&id) {
            Some(element) => {
                element.remove();
                true
            }
            None => false,
        }
    }

    fn query(&self, kinds: &[EntityKind]) -> Vec<EntityId> {
        let selector = kinds
            .iter()
            .map(|kind| kind.tag())
            .collect::<Vec<_>>()
            .join(", ");
        let Ok(nodes) = self.scene.query_selector_all(&selector) else {
            log::warn!("invalid entity selector {selector:?}");
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.track(element))
            .collect()
    }

    fn attribute(&self, id: EntityId, name: &str) -> Option<String> {
        let element = self.lookup(id).ok()?;
        read_attribute(&element, name)
    }

    fn set_attribute(
        &mut self,
        id: EntityId,
        name: &str,
        value: &str,
    ) -> Result<(), PanelError> {
        self.lookup(id)?
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", &e))
    }

    fn scope_raycaster(&mut self, selector: &str) -> Result<(), PanelError> {
        let _ = call_method(
            &self.scene,
            "setAttribute",
            &["raycaster".into(), "objects".into(), selector.into()],
        )
        .map_err(|e| js_error("setAttribute(raycaster)", &e))?;
        Ok(())
    }
}

/// Read an attribute through the framework's `getAttribute`, which returns
/// parsed component data. Vectors come back as `{x, y, z}` objects and are
/// re-encoded as `"x y z"`.
fn read_attribute(element: &Element, name: &str) -> Option<String> {
    let value = call_method(element, "getAttribute", &[name.into()]).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    if let Some(text) = value.as_string() {
        return Some(text);
    }
    if let Some(flag) = value.as_bool() {
        return Some(flag.to_string());
    }
    let axis = |key: &str| {
        Reflect::get(&value, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    let (x, y, z) = (axis("x")?, axis("y")?, axis("z")?);
    Some(format!("{x} {y} {z}"))
}
