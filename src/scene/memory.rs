use rustc_hash::FxHashMap;

use super::{EntityId, EntityKind, SceneGraph};
use crate::error::PanelError;

/// Component name the panel requires before wiring itself up.
const RAYCASTER: &str = "raycaster";

struct MemoryEntity {
    kind: EntityKind,
    attributes: FxHashMap<String, String>,
}

/// In-memory [`SceneGraph`] used by tests and headless hosts.
///
/// Entities are kept in insertion order so queries return document order,
/// as the browser does.
pub struct MemoryScene {
    entities: FxHashMap<EntityId, MemoryEntity>,
    order: Vec<EntityId>,
    next_entity_id: u32,
    components: Vec<String>,
    raycaster_scope: Option<String>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    /// Empty scene with the raycaster component installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: FxHashMap::default(),
            order: Vec::new(),
            next_entity_id: 0,
            components: vec![RAYCASTER.to_owned()],
            raycaster_scope: None,
        }
    }

    /// Empty scene without any framework components (startup must fail).
    #[must_use]
    pub fn without_components() -> Self {
        Self {
            components: Vec::new(),
            ..Self::new()
        }
    }

    /// Insert an entity with preset attributes. Used to build fixtures
    /// (sky, videos, lights) the way markup would.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        attributes: &[(&str, &str)],
    ) -> EntityId {
        let id = self.insert(kind);
        if let Some(entity) = self.entities.get_mut(&id) {
            for (name, value) in attributes {
                let _ = entity
                    .attributes
                    .insert((*name).to_owned(), (*value).to_owned());
            }
        }
        id
    }

    /// Kind of a live entity.
    #[must_use]
    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).map(|e| e.kind)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selector the raycaster was restricted to, if any.
    #[must_use]
    pub fn raycaster_scope(&self) -> Option<&str> {
        self.raycaster_scope.as_deref()
    }

    fn insert(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        let _ = self.entities.insert(
            id,
            MemoryEntity {
                kind,
                attributes: FxHashMap::default(),
            },
        );
        self.order.push(id);
        id
    }
}

impl SceneGraph for MemoryScene {
    fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    fn create_entity(
        &mut self,
        kind: EntityKind,
    ) -> Result<EntityId, PanelError> {
        Ok(self.insert(kind))
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        if self.entities.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|&other| other != id);
        true
    }

    fn query(&self, kinds: &[EntityKind]) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.entities
                    .get(id)
                    .is_some_and(|e| kinds.contains(&e.kind))
            })
            .collect()
    }

    fn attribute(&self, id: EntityId, name: &str) -> Option<String> {
        self.entities.get(&id)?.attributes.get(name).cloned()
    }

    fn set_attribute(
        &mut self,
        id: EntityId,
        name: &str,
        value: &str,
    ) -> Result<(), PanelError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| PanelError::Scene(format!("no entity {}", id.0)))?;
        let _ = entity.attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn scope_raycaster(&mut self, selector: &str) -> Result<(), PanelError> {
        if !self.has_component(RAYCASTER) {
            return Err(PanelError::MissingComponent(RAYCASTER.to_owned()));
        }
        self.raycaster_scope = Some(selector.to_owned());
        Ok(())
    }
}
