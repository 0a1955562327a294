//! Scene-graph collaborator: entity kinds, the [`SceneGraph`] trait, and the
//! string attribute codec the host framework speaks.
//!
//! The controller never owns entities. It queries the scene by tag, writes
//! string-encoded attributes, and forgets the handles again.

pub mod attribute;
mod entity;
mod memory;

pub use entity::{EntityTransform, VideoSnapshot};
pub use memory::MemoryScene;

use crate::error::PanelError;

// ---------------------------------------------------------------------------
// Entity handles
// ---------------------------------------------------------------------------

/// Opaque handle to an entity living in the scene graph.
///
/// Handles are only valid until the entity is removed; the controller treats
/// them as transient query results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// The kinds of element the panel knows about, keyed by their scene tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Built-in cube primitive.
    Box,
    /// Built-in sphere primitive.
    Sphere,
    /// Model loaded from a glTF/GLB URL.
    GltfModel,
    /// Sky dome used as the scene backdrop.
    Sky,
    /// Video texture plane.
    Video,
    /// Light source.
    Light,
}

impl EntityKind {
    /// Kinds that the panel spawns and that bulk operations act on.
    pub const DYNAMIC: [Self; 3] = [Self::Box, Self::Sphere, Self::GltfModel];

    /// Scene tag used to create and query this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Box => "a-box",
            Self::Sphere => "a-sphere",
            Self::GltfModel => "a-gltf-model",
            Self::Sky => "a-sky",
            Self::Video => "a-video",
            Self::Light => "a-light",
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

/// `"x y z"` world position.
pub const POSITION: &str = "position";
/// `"x y z"` Euler rotation in degrees.
pub const ROTATION: &str = "rotation";
/// `"x y z"` scale factors.
pub const SCALE: &str = "scale";
/// `"true"` / `"false"` visibility flag.
pub const VISIBLE: &str = "visible";
/// Media source of a video plane or glTF model.
pub const SRC: &str = "src";

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// The consumed interface of the host scene framework.
///
/// Attribute values are strings, exactly as the framework stores them; use
/// [`attribute`] to encode and decode them.
pub trait SceneGraph {
    /// Whether the scene has the named framework component installed.
    fn has_component(&self, name: &str) -> bool;

    /// Create an entity of `kind` and append it to the scene.
    fn create_entity(
        &mut self,
        kind: EntityKind,
    ) -> Result<EntityId, PanelError>;

    /// Remove an entity. Returns `false` when it was already gone.
    fn remove_entity(&mut self, id: EntityId) -> bool;

    /// All entities whose tag matches one of `kinds`, in document order.
    fn query(&self, kinds: &[EntityKind]) -> Vec<EntityId>;

    /// Read a raw attribute value.
    fn attribute(&self, id: EntityId, name: &str) -> Option<String>;

    /// Write a raw attribute value.
    fn set_attribute(
        &mut self,
        id: EntityId,
        name: &str,
        value: &str,
    ) -> Result<(), PanelError>;

    /// Restrict the scene raycaster to elements matching `selector`.
    fn scope_raycaster(&mut self, selector: &str) -> Result<(), PanelError>;
}
