// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entities, groups, layers and visibility.

use alloc::string::String;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::camera::Camera;
use super::id::{EntityId, LayerId};
use crate::dirty;
use crate::error::{Result, StrataError};
use crate::transform::Transform3d;

/// One of the three independently toggleable shape groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Drawn first.
    Background,
    /// Drawn second.
    Middleground,
    /// Drawn last, on top of everything else.
    Foreground,
}

impl Group {
    /// All groups in back-to-front order.
    pub const BACK_TO_FRONT: [Self; 3] = [Self::Background, Self::Middleground, Self::Foreground];

    /// Position of this group in [`BACK_TO_FRONT`](Self::BACK_TO_FRONT).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Middleground => 1,
            Self::Foreground => 2,
        }
    }

    /// The two other groups, in back-to-front order.
    #[must_use]
    pub fn others(self) -> [Self; 2] {
        match self {
            Self::Background => [Self::Middleground, Self::Foreground],
            Self::Middleground => [Self::Background, Self::Foreground],
            Self::Foreground => [Self::Background, Self::Middleground],
        }
    }

    /// Lower-case name for logs and dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Middleground => "middleground",
            Self::Foreground => "foreground",
        }
    }
}

/// A layer tag bound to one group.
///
/// Layers are recursive: tagging a group applies to every entity in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layer {
    id: LayerId,
    group: Group,
    recursive: bool,
}

impl Layer {
    /// The layer's id, as referenced by layer filters.
    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// The group this layer tags.
    #[must_use]
    pub const fn group(&self) -> Group {
        self.group
    }

    /// Whether the tag applies to descendant entities.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }
}

/// Built-in mesh shapes. The mesh data itself belongs to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// A torus.
    Torus,
    /// A cone.
    Cone,
    /// A cylinder.
    Cylinder,
    /// A cuboid.
    Cuboid,
    /// A plane.
    Plane,
    /// A sphere.
    Sphere,
}

/// What an entity is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityKind {
    /// A drawable mesh.
    Shape(ShapeKind),
    /// A point light. Not drawable, but filtered like geometry.
    Light,
    /// The scene camera.
    Camera(Camera),
}

/// A node in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    group: Option<Group>,
    kind: EntityKind,
    visible: bool,
    transform: Transform3d,
}

impl Entity {
    /// The entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group the entity belongs to, if any.
    #[must_use]
    pub const fn group(&self) -> Option<Group> {
        self.group
    }

    /// What the entity is.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Whether the entity is currently enabled.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the entity produces draw calls.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        matches!(self.kind, EntityKind::Shape(_))
    }

    /// Local-to-world transform.
    #[must_use]
    pub const fn transform(&self) -> Transform3d {
        self.transform
    }
}

/// Visibility flips observed since the previous [`SceneModel::evaluate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Entities that became visible.
    pub shown: Vec<EntityId>,
    /// Entities that became hidden.
    pub hidden: Vec<EntityId>,
}

impl SceneChanges {
    /// Clears both lists.
    pub fn clear(&mut self) {
        self.shown.clear();
        self.hidden.clear();
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

/// The id of the entity stored at `slot`.
fn slot_id(slot: usize) -> Result<EntityId> {
    u32::try_from(slot)
        .map(EntityId)
        .map_err(|_| StrataError::EntityLimit)
}

/// Collects entities before the scene is frozen into a [`SceneModel`].
#[derive(Debug, Default)]
pub struct SceneBuilder {
    entities: Vec<Entity>,
}

impl SceneBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visible entity.
    ///
    /// Drawable entities must carry a group; lights and cameras may not
    /// (they are accepted with a group too, which scopes them to that group's
    /// sub-pass).
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: EntityKind,
        group: Option<Group>,
        transform: Transform3d,
    ) -> Result<EntityId> {
        let name = name.into();
        if matches!(kind, EntityKind::Shape(_)) && group.is_none() {
            return Err(StrataError::UngroupedDrawable(name));
        }
        let id = slot_id(self.entities.len())?;
        self.entities.push(Entity {
            id,
            name,
            group,
            kind,
            visible: true,
            transform,
        });
        Ok(id)
    }

    /// Adds a grouped shape.
    pub fn shape(
        &mut self,
        name: impl Into<String>,
        shape: ShapeKind,
        group: Group,
        transform: Transform3d,
    ) -> Result<EntityId> {
        self.add(name, EntityKind::Shape(shape), Some(group), transform)
    }

    /// Freezes the entity set and creates one recursive layer per group.
    #[must_use]
    pub fn build(self) -> SceneModel {
        let layers = Group::BACK_TO_FRONT.map(|group| Layer {
            id: LayerId(group as u32),
            group,
            recursive: true,
        });
        let reported_visible = self.entities.iter().map(|e| e.visible).collect();
        SceneModel {
            entities: self.entities,
            layers,
            reported_visible,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }
}

/// The scene: entities, their groups, and the three group layers.
#[derive(Debug)]
pub struct SceneModel {
    entities: Vec<Entity>,
    layers: [Layer; 3],
    // Visibility as of the last evaluate, so double flips within one frame
    // are not reported.
    reported_visible: Vec<bool>,
    dirty: DirtyTracker<u32>,
}

impl SceneModel {
    /// Builds the six-shape scene: torus and cone in the foreground,
    /// cylinder and cuboid in the middleground, plane and sphere in the
    /// background, plus an ungrouped point light at the camera and the
    /// camera itself.
    #[must_use]
    pub fn basic_shapes() -> Self {
        let camera = Camera::default();
        let [cx, cy, cz] = camera.position;
        let mut b = SceneBuilder::new();

        let shapes = [
            (
                "torus",
                ShapeKind::Torus,
                Group::Foreground,
                Transform3d::from_translation(5.0, 4.0, 0.0)
                    * Transform3d::from_rotation_x_degrees(25.0)
                    * Transform3d::from_uniform_scale(2.0),
            ),
            (
                "cone",
                ShapeKind::Cone,
                Group::Foreground,
                Transform3d::from_translation(0.0, 4.0, -1.5)
                    * Transform3d::from_rotation_x_degrees(45.0),
            ),
            (
                "cylinder",
                ShapeKind::Cylinder,
                Group::Middleground,
                Transform3d::from_translation(-5.0, 4.0, -1.5)
                    * Transform3d::from_rotation_x_degrees(45.0)
                    * Transform3d::from_uniform_scale(1.5),
            ),
            (
                "cuboid",
                ShapeKind::Cuboid,
                Group::Middleground,
                Transform3d::from_translation(5.0, -4.0, 0.0)
                    * Transform3d::from_uniform_scale(4.0),
            ),
            (
                "plane",
                ShapeKind::Plane,
                Group::Background,
                Transform3d::from_translation(0.0, -4.0, 0.0)
                    * Transform3d::from_rotation_x_degrees(45.0)
                    * Transform3d::from_uniform_scale(2.0),
            ),
            (
                "sphere",
                ShapeKind::Sphere,
                Group::Background,
                Transform3d::from_translation(-5.0, -4.0, 0.0)
                    * Transform3d::from_uniform_scale(1.3),
            ),
        ];
        // A handful of grouped shapes cannot hit either builder error.
        for (name, shape, group, transform) in shapes {
            let _ = b.shape(name, shape, group, transform);
        }
        // Ungrouped, so every group's sub-pass is lit.
        let _ = b.add(
            "light",
            EntityKind::Light,
            None,
            Transform3d::from_translation(cx, cy, cz),
        );
        let _ = b.add(
            "camera",
            EntityKind::Camera(camera),
            None,
            Transform3d::from_translation(cx, cy, cz),
        );
        b.build()
    }

    /// Returns the layer bound to `group`.
    #[inline]
    #[must_use]
    pub fn layer_for(&self, group: Group) -> Layer {
        self.layers[group.index()]
    }

    /// All three layers in back-to-front order.
    #[must_use]
    pub fn layers(&self) -> &[Layer; 3] {
        &self.layers
    }

    /// The layers an entity is tagged with: its group's recursive layer, or
    /// none for ungrouped entities.
    #[must_use]
    pub fn layers_of(&self, entity: &Entity) -> Option<LayerId> {
        entity.group.map(|g| self.layer_for(g).id)
    }

    /// Shows or hides every entity of `group`.
    ///
    /// Returns the number of entities whose flag actually flipped. Group tags
    /// are never touched.
    pub fn set_visible(&mut self, group: Group, on: bool) -> usize {
        let mut flipped = 0;
        for e in self.entities.iter_mut().filter(|e| e.group == Some(group)) {
            if e.visible != on {
                e.visible = on;
                self.dirty.mark(e.id.0, dirty::VISIBILITY);
                flipped += 1;
            }
        }
        flipped
    }

    /// Shows or hides one entity. Returns whether the flag flipped.
    pub fn set_entity_visible(&mut self, id: EntityId, on: bool) -> Result<bool> {
        let e = self
            .entities
            .get_mut(id.0 as usize)
            .ok_or(StrataError::UnknownEntity(id))?;
        if e.visible == on {
            return Ok(false);
        }
        e.visible = on;
        self.dirty.mark(id.0, dirty::VISIBILITY);
        Ok(true)
    }

    /// Returns `true` if every entity of `group` is visible.
    #[must_use]
    pub fn is_group_visible(&self, group: Group) -> bool {
        self.entities_in(group).all(Entity::is_visible)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// All entities in creation order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities belonging to `group`.
    pub fn entities_in(&self, group: Group) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |e| e.group == Some(group))
    }

    /// The first camera entity, if any.
    #[must_use]
    pub fn camera(&self) -> Option<(EntityId, &Camera)> {
        self.entities.iter().find_map(|e| match &e.kind {
            EntityKind::Camera(c) => Some((e.id, c)),
            _ => None,
        })
    }

    /// Reports visibility flips since the previous call.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();
        let mut flipped: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        flipped.sort_unstable();
        for idx in flipped {
            let Some(e) = self.entities.get(idx as usize) else {
                continue;
            };
            let was = &mut self.reported_visible[idx as usize];
            if *was == e.visible {
                continue;
            }
            *was = e.visible;
            if e.visible {
                changes.shown.push(e.id);
            } else {
                changes.hidden.push(e.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scene: &SceneModel, group: Group) -> Vec<&str> {
        scene.entities_in(group).map(Entity::name).collect()
    }

    #[test]
    fn basic_shapes_partition() {
        let scene = SceneModel::basic_shapes();
        assert_eq!(names(&scene, Group::Foreground), ["torus", "cone"]);
        assert_eq!(names(&scene, Group::Middleground), ["cylinder", "cuboid"]);
        assert_eq!(names(&scene, Group::Background), ["plane", "sphere"]);
        let drawable = scene.entities().iter().filter(|e| e.is_drawable()).count();
        assert_eq!(drawable, 6);
        assert!(scene.camera().is_some());
    }

    #[test]
    fn every_drawable_has_a_group() {
        let scene = SceneModel::basic_shapes();
        for e in scene.entities().iter().filter(|e| e.is_drawable()) {
            assert!(e.group().is_some(), "{} is ungrouped", e.name());
        }
    }

    #[test]
    fn ungrouped_drawable_is_rejected() {
        let mut b = SceneBuilder::new();
        let err = b
            .add(
                "stray",
                EntityKind::Shape(ShapeKind::Sphere),
                None,
                Transform3d::IDENTITY,
            )
            .unwrap_err();
        assert_eq!(err, StrataError::UngroupedDrawable("stray".into()));
    }

    #[test]
    fn entity_ids_stop_at_the_id_space() {
        assert_eq!(slot_id(0), Ok(EntityId(0)));
        assert_eq!(slot_id(u32::MAX as usize), Ok(EntityId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(slot_id(u32::MAX as usize + 1), Err(StrataError::EntityLimit));
    }

    #[test]
    fn one_recursive_layer_per_group() {
        let scene = SceneModel::basic_shapes();
        for group in Group::BACK_TO_FRONT {
            let layer = scene.layer_for(group);
            assert_eq!(layer.group(), group);
            assert!(layer.is_recursive());
        }
        let ids: Vec<_> = scene.layers().iter().map(Layer::id).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn set_visible_toggles_only_that_group() {
        let mut scene = SceneModel::basic_shapes();
        assert_eq!(scene.set_visible(Group::Foreground, false), 2);
        assert!(!scene.is_group_visible(Group::Foreground));
        assert!(scene.is_group_visible(Group::Middleground));
        assert!(scene.find("light").unwrap().is_visible());
        // Group tags are untouched.
        assert_eq!(scene.find("torus").unwrap().group(), Some(Group::Foreground));
        // Repeating the request flips nothing.
        assert_eq!(scene.set_visible(Group::Foreground, false), 0);
    }

    #[test]
    fn evaluate_reports_net_flips_once() {
        let mut scene = SceneModel::basic_shapes();
        let torus = scene.find("torus").unwrap().id();
        let cone = scene.find("cone").unwrap().id();

        scene.set_visible(Group::Foreground, false);
        let changes = scene.evaluate();
        assert_eq!(changes.hidden, [torus, cone]);
        assert!(changes.shown.is_empty());
        assert!(scene.evaluate().is_empty());

        // Off and on again within one frame is not a change.
        assert!(scene.set_entity_visible(torus, true).unwrap());
        assert!(scene.set_entity_visible(torus, false).unwrap());
        assert!(scene.evaluate().is_empty());

        scene.set_visible(Group::Foreground, true);
        assert_eq!(scene.evaluate().shown, [torus, cone]);
    }

    #[test]
    fn unknown_entity_is_reported() {
        let mut scene = SceneModel::basic_shapes();
        let bogus = EntityId(999);
        assert_eq!(
            scene.set_entity_visible(bogus, false),
            Err(StrataError::UnknownEntity(bogus))
        );
    }

    #[test]
    fn others_excludes_self() {
        for g in Group::BACK_TO_FRONT {
            assert!(!g.others().contains(&g));
        }
        assert_eq!(
            Group::Foreground.others(),
            [Group::Background, Group::Middleground]
        );
    }
}
