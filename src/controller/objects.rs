//! Object operations: spawning, clearing, the backdrop toggle and the bulk
//! transforms driven by the sliders and position fields.

use glam::Vec3;

use super::{ObjectType, Platform, SceneController};
use crate::error::PanelError;
use crate::scene::{
    attribute, EntityId, EntityKind, EntityTransform, SceneGraph, POSITION,
    ROTATION, SCALE, SRC, VISIBLE,
};
use crate::ui::numeric::{self, FieldEdit};
use crate::ui::{Axis, ElementId, StepDirection, UiSurface};

impl<P: Platform> SceneController<P> {
    /// Spawn one object with the given placement.
    ///
    /// `url` is only consulted for [`ObjectType::Custom`]; an empty URL makes
    /// the call a silent no-op. [`ObjectType::Fbx`] shows a notice and
    /// leaves the scene untouched.
    pub fn add_object(
        &mut self,
        object: ObjectType,
        transform: EntityTransform,
        url: &str,
    ) -> Result<Option<EntityId>, PanelError> {
        let id = match object {
            ObjectType::Cube => self.scene.create_entity(EntityKind::Box)?,
            ObjectType::Sphere => self.scene.create_entity(EntityKind::Sphere)?,
            ObjectType::Custom => {
                let url = url.trim();
                if url.is_empty() {
                    return Ok(None);
                }
                let id = self.scene.create_entity(EntityKind::GltfModel)?;
                self.scene.set_attribute(id, SRC, url)?;
                id
            }
            ObjectType::Fbx => {
                self.ui.notify(&self.options.labels.fbx_notice);
                return Ok(None);
            }
        };
        transform.write_to(&mut self.scene, id)?;
        log::debug!("spawned {object:?} as {id:?} at {}", transform.position);
        Ok(Some(id))
    }

    /// Spawn whatever the panel's dropdown, fields and sliders describe.
    pub(super) fn add_object_from_fields(
        &mut self,
    ) -> Result<Option<EntityId>, PanelError> {
        let selected = self.ui.value(ElementId::ObjectType);
        let object = match selected.parse::<ObjectType>() {
            Ok(object) => object,
            Err(e) => {
                log::warn!("{e}");
                return Ok(None);
            }
        };

        let defaults = &self.options.objects;
        let sliders = &self.options.sliders;
        let scale = numeric::value_or(
            &self.ui.value(ElementId::ScaleSlider),
            defaults.default_scale,
        );
        let rotation = numeric::value_or(
            &self.ui.value(ElementId::RotationSlider),
            defaults.default_rotation,
        );
        let transform = EntityTransform {
            position: self.field_position(),
            rotation_y: sliders.clamp_rotation(rotation),
            scale: sliders.clamp_scale(scale),
        };

        let url = self.ui.value(ElementId::ModelUrl);
        self.add_object(object, transform, &url)
    }

    /// Remove every panel-spawned object. Returns how many were removed.
    pub fn clear_objects(&mut self) -> usize {
        let removed = self
            .scene
            .query(&EntityKind::DYNAMIC)
            .into_iter()
            .filter(|id| self.scene.remove_entity(*id))
            .count();
        log::debug!("cleared {removed} objects");
        removed
    }

    /// Flip the sky's visibility and relabel its button. Returns the new
    /// visibility, or `None` when the scene has no sky.
    pub fn toggle_background_visibility(
        &mut self,
    ) -> Result<Option<bool>, PanelError> {
        let Some(sky) = self.scene.query(&[EntityKind::Sky]).first().copied()
        else {
            log::debug!("no background to toggle");
            return Ok(None);
        };
        let visible = !self
            .scene
            .attribute(sky, VISIBLE)
            .is_none_or(|raw| attribute::parse_bool(&raw));
        self.scene
            .set_attribute(sky, VISIBLE, attribute::encode_bool(visible))?;
        self.ui.set_text(
            ElementId::ToggleBackground,
            self.options.labels.background(visible),
        );
        Ok(Some(visible))
    }

    /// Scale every spawned object uniformly and update the readout.
    pub fn set_scale(&mut self, value: f32) -> Result<(), PanelError> {
        if !value.is_finite() {
            log::debug!("ignoring non-finite scale {value}");
            return Ok(());
        }
        let value = self.options.sliders.clamp_scale(value);
        self.broadcast(SCALE, &attribute::encode_uniform_scale(value))?;
        self.ui.set_text(
            ElementId::ScaleValue,
            &numeric::format_one_decimal(value),
        );
        Ok(())
    }

    /// Set every spawned object's yaw and update the readout.
    pub fn set_rotation(&mut self, degrees: f32) -> Result<(), PanelError> {
        if !degrees.is_finite() {
            log::debug!("ignoring non-finite rotation {degrees}");
            return Ok(());
        }
        let degrees = self.options.sliders.clamp_rotation(degrees);
        self.broadcast(ROTATION, &attribute::encode_y_rotation(degrees))?;
        self.ui.set_text(
            ElementId::RotationValue,
            &format!("{}°", attribute::format_number(degrees)),
        );
        Ok(())
    }

    /// Move every spawned object to `position`.
    pub fn set_position(&mut self, position: Vec3) -> Result<(), PanelError> {
        self.broadcast(POSITION, &attribute::encode_vec3(position))
    }

    // ── Position fields ──────────────────────────────────────────────────

    pub(super) fn edit_position_field(
        &mut self,
        axis: Axis,
        raw: &str,
    ) -> Result<(), PanelError> {
        let field = ElementId::position_field(axis);
        match numeric::edit(raw) {
            FieldEdit::Provisional { display } => {
                self.ui.set_value(field, &display);
                Ok(())
            }
            FieldEdit::Committed { display, .. } => {
                self.ui.set_value(field, &display);
                self.apply_position_fields()
            }
        }
    }

    pub(super) fn blur_position_field(
        &mut self,
        axis: Axis,
    ) -> Result<(), PanelError> {
        let field = ElementId::position_field(axis);
        match numeric::blur(&self.ui.value(field)) {
            Some(reset) => {
                self.ui.set_value(field, &reset);
                self.apply_position_fields()
            }
            None => Ok(()),
        }
    }

    pub(super) fn step_position(
        &mut self,
        axis: Axis,
        direction: StepDirection,
    ) -> Result<(), PanelError> {
        let field = ElementId::position_field(axis);
        let step = self.options.objects.position_step;
        let delta = match direction {
            StepDirection::Increment => step,
            StepDirection::Decrement => -step,
        };
        let stepped = numeric::step(&self.ui.value(field), delta);
        self.ui.set_value(field, &stepped);
        self.apply_position_fields()
    }

    fn apply_position_fields(&mut self) -> Result<(), PanelError> {
        let position = self.field_position();
        self.set_position(position)
    }

    /// Position described by the three fields. Unparseable X/Y read as 0,
    /// an unparseable Z as the spawn depth.
    fn field_position(&self) -> Vec3 {
        Vec3::new(
            numeric::value_or(&self.ui.value(ElementId::PosX), 0.0),
            numeric::value_or(&self.ui.value(ElementId::PosY), 0.0),
            numeric::value_or(
                &self.ui.value(ElementId::PosZ),
                self.options.objects.spawn_depth,
            ),
        )
    }

    fn broadcast(&mut self, name: &str, value: &str) -> Result<(), PanelError> {
        for id in self.scene.query(&EntityKind::DYNAMIC) {
            self.scene.set_attribute(id, name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PanelCommand;
    use crate::scene::MemoryScene;
    use crate::testing::{self, TestPlatform};

    fn furnished_scene() -> MemoryScene {
        let mut scene = MemoryScene::new();
        let _ = scene.spawn(EntityKind::Sky, &[]);
        let _ = scene.spawn(
            EntityKind::Video,
            &[(SRC, "a.mp4"), (POSITION, "1 2 3"), (ROTATION, "0 45 0")],
        );
        let _ = scene.spawn(EntityKind::Light, &[]);
        scene
    }

    fn running(scene: MemoryScene) -> SceneController<TestPlatform> {
        let mut controller = testing::controller(scene);
        let _ = controller.init().unwrap();
        controller
    }

    fn dynamic(controller: &SceneController<TestPlatform>) -> Vec<EntityId> {
        controller.scene().query(&EntityKind::DYNAMIC)
    }

    #[test]
    fn add_then_clear_leaves_furniture() {
        let mut controller = running(furnished_scene());
        for object in [ObjectType::Cube, ObjectType::Sphere, ObjectType::Cube] {
            let _ = controller
                .add_object(object, EntityTransform::default(), "")
                .unwrap();
        }
        let _ = controller
            .add_object(
                ObjectType::Custom,
                EntityTransform::default(),
                "https://example.com/a.glb",
            )
            .unwrap();
        assert_eq!(dynamic(&controller).len(), 4);

        assert_eq!(controller.clear_objects(), 4);
        assert!(dynamic(&controller).is_empty());
        assert_eq!(controller.scene().len(), 3);
    }

    #[test]
    fn spawned_objects_receive_their_transform() {
        let mut controller = running(MemoryScene::new());
        let transform = EntityTransform {
            position: Vec3::new(1.0, 0.5, -2.0),
            rotation_y: 90.0,
            scale: 2.0,
        };
        let id = controller
            .add_object(ObjectType::Sphere, transform, "")
            .unwrap()
            .unwrap();
        let scene = controller.scene();
        assert_eq!(scene.attribute(id, POSITION).as_deref(), Some("1 0.5 -2"));
        assert_eq!(scene.attribute(id, ROTATION).as_deref(), Some("0 90 0"));
        assert_eq!(scene.attribute(id, SCALE).as_deref(), Some("2 2 2"));
    }

    #[test]
    fn custom_model_needs_a_url() {
        let mut controller = running(MemoryScene::new());
        let none = controller
            .add_object(ObjectType::Custom, EntityTransform::default(), "   ")
            .unwrap();
        assert_eq!(none, None);
        assert!(controller.scene().is_empty());

        let id = controller
            .add_object(
                ObjectType::Custom,
                EntityTransform::default(),
                " https://example.com/duck.glb ",
            )
            .unwrap()
            .unwrap();
        assert_eq!(controller.scene().kind(id), Some(EntityKind::GltfModel));
        assert_eq!(
            controller.scene().attribute(id, SRC).as_deref(),
            Some("https://example.com/duck.glb")
        );
    }

    #[test]
    fn fbx_notifies_without_touching_scene() {
        let mut controller = running(MemoryScene::new());
        let none = controller
            .add_object(ObjectType::Fbx, EntityTransform::default(), "x.fbx")
            .unwrap();
        assert_eq!(none, None);
        assert!(controller.scene().is_empty());
        assert_eq!(controller.ui().notices().len(), 1);
        assert!(controller.ui().notices()[0].contains("FBX"));
    }

    #[test]
    fn scale_broadcasts_to_every_dynamic_entity() {
        let mut controller = running(furnished_scene());
        for _ in 0..3 {
            let _ = controller
                .add_object(ObjectType::Cube, EntityTransform::default(), "")
                .unwrap();
        }
        let _ = controller.execute(PanelCommand::SetScale(1.5)).unwrap();

        for id in dynamic(&controller) {
            assert_eq!(
                controller.scene().attribute(id, SCALE).as_deref(),
                Some("1.5 1.5 1.5")
            );
        }
        assert_eq!(controller.ui().text(ElementId::ScaleValue), "1.5");
        let video = controller.scene().query(&[EntityKind::Video])[0];
        assert_eq!(controller.scene().attribute(video, SCALE), None);
    }

    #[test]
    fn rotation_readout_has_degree_sign() {
        let mut controller = running(MemoryScene::new());
        let id = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap()
            .unwrap();
        let _ = controller.execute(PanelCommand::SetRotation(45.0)).unwrap();
        assert_eq!(
            controller.scene().attribute(id, ROTATION).as_deref(),
            Some("0 45 0")
        );
        assert_eq!(controller.ui().text(ElementId::RotationValue), "45°");
    }

    #[test]
    fn slider_values_are_clamped() {
        let mut controller = running(MemoryScene::new());
        let id = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap()
            .unwrap();
        controller.set_scale(50.0).unwrap();
        assert_eq!(
            controller.scene().attribute(id, SCALE).as_deref(),
            Some("5 5 5")
        );
        controller.set_scale(f32::NAN).unwrap();
        assert_eq!(
            controller.scene().attribute(id, SCALE).as_deref(),
            Some("5 5 5")
        );
    }

    #[test]
    fn background_toggle_flips_and_relabels() {
        let mut controller = running(furnished_scene());
        let shown = controller.toggle_background_visibility().unwrap();
        assert_eq!(shown, Some(false));
        assert_eq!(
            controller.ui().text(ElementId::ToggleBackground),
            "Show Sphere"
        );
        let sky = controller.scene().query(&[EntityKind::Sky])[0];
        assert_eq!(
            controller.scene().attribute(sky, VISIBLE).as_deref(),
            Some("false")
        );

        let shown = controller.toggle_background_visibility().unwrap();
        assert_eq!(shown, Some(true));
        assert_eq!(
            controller.ui().text(ElementId::ToggleBackground),
            "Hide Sphere"
        );
    }

    #[test]
    fn background_toggle_without_sky_is_noop() {
        let mut controller = running(MemoryScene::new());
        assert_eq!(controller.toggle_background_visibility().unwrap(), None);
    }

    #[test]
    fn position_field_round_trip() {
        let mut controller = running(MemoryScene::new());
        let edit = |axis, raw: &str| PanelCommand::EditPosition {
            axis,
            raw: raw.to_owned(),
        };

        let _ = controller.execute(edit(Axis::X, "3")).unwrap();
        let _ = controller
            .execute(PanelCommand::BlurPosition { axis: Axis::X })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::PosX), "3.0");

        let _ = controller.execute(edit(Axis::Y, "")).unwrap();
        let _ = controller
            .execute(PanelCommand::BlurPosition { axis: Axis::Y })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::PosY), "0.0");

        let _ = controller.execute(edit(Axis::Z, "-")).unwrap();
        assert_eq!(controller.ui().value(ElementId::PosZ), "-");
        let _ = controller.execute(edit(Axis::Z, "-2")).unwrap();
        assert_eq!(controller.ui().value(ElementId::PosZ), "-2.0");
    }

    #[test]
    fn field_edits_move_all_objects() {
        let mut controller = running(MemoryScene::new());
        let id = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap()
            .unwrap();
        let _ = controller
            .execute(PanelCommand::EditPosition {
                axis: Axis::X,
                raw: "1a.5".to_owned(),
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::PosX), "1.5");
        assert_eq!(
            controller.scene().attribute(id, POSITION).as_deref(),
            Some("1.5 0 -3")
        );
    }

    #[test]
    fn provisional_edit_does_not_move_objects() {
        let mut controller = running(MemoryScene::new());
        let id = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap()
            .unwrap();
        let _ = controller
            .execute(PanelCommand::EditPosition {
                axis: Axis::Y,
                raw: "-".to_owned(),
            })
            .unwrap();
        assert_eq!(
            controller.scene().attribute(id, POSITION).as_deref(),
            Some("0 0 -3")
        );
    }

    #[test]
    fn step_buttons_nudge_and_apply() {
        let mut controller = running(MemoryScene::new());
        let id = controller
            .add_object(ObjectType::Cube, EntityTransform::default(), "")
            .unwrap()
            .unwrap();
        let _ = controller
            .execute(PanelCommand::StepPosition {
                axis: Axis::Y,
                direction: StepDirection::Increment,
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::PosY), "0.1");
        assert_eq!(
            controller.scene().attribute(id, POSITION).as_deref(),
            Some("0 0.1 -3")
        );

        let _ = controller
            .execute(PanelCommand::StepPosition {
                axis: Axis::Z,
                direction: StepDirection::Decrement,
            })
            .unwrap();
        assert_eq!(controller.ui().value(ElementId::PosZ), "-3.1");
    }

    #[test]
    fn add_from_fields_reads_the_panel() {
        let mut controller = running(MemoryScene::new());
        controller.ui_mut().set_value(ElementId::ObjectType, "sphere");
        controller.ui_mut().set_value(ElementId::ScaleSlider, "2");
        controller.ui_mut().set_value(ElementId::RotationSlider, "30");
        controller.ui_mut().set_value(ElementId::PosX, "1.0");
        controller.ui_mut().set_value(ElementId::PosY, "");
        controller.ui_mut().set_value(ElementId::PosZ, "abc");

        let _ = controller.execute(PanelCommand::AddObject).unwrap();
        let ids = dynamic(&controller);
        assert_eq!(ids.len(), 1);
        let scene = controller.scene();
        let attr = |name| scene.attribute(ids[0], name);
        assert_eq!(scene.kind(ids[0]), Some(EntityKind::Sphere));
        assert_eq!(attr(POSITION).as_deref(), Some("1 0 -3"));
        assert_eq!(attr(ROTATION).as_deref(), Some("0 30 0"));
        assert_eq!(attr(SCALE).as_deref(), Some("2 2 2"));
    }

    #[test]
    fn explicit_zero_depth_is_kept() {
        let mut controller = running(MemoryScene::new());
        controller.ui_mut().set_value(ElementId::ObjectType, "cube");
        controller.ui_mut().set_value(ElementId::PosZ, "0");
        let _ = controller.execute(PanelCommand::AddObject).unwrap();
        let id = dynamic(&controller)[0];
        assert_eq!(
            controller.scene().attribute(id, POSITION).as_deref(),
            Some("0 0 0")
        );
    }

    #[test]
    fn unknown_dropdown_value_spawns_nothing() {
        let mut controller = running(MemoryScene::new());
        controller.ui_mut().set_value(ElementId::ObjectType, "torus");
        let _ = controller.execute(PanelCommand::AddObject).unwrap();
        assert!(controller.scene().is_empty());
    }
}
