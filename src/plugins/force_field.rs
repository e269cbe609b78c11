// Radial force field component, its nested configuration values and plugin wiring.
//
// Systems live next to the concern they drive:
//  - field_force: fixed-step query -> filter -> impulse pipeline
//  - pulse: per-frame size oscillation
//  - field_outline: per-frame debug outline lifecycle + geometry
use bevy::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::plugins::field_force::{apply_field_forces, log_field_activity};
use crate::plugins::field_outline::{release_orphan_outlines, sync_field_outlines, OutlineMaterials};
use crate::plugins::pulse::{Pulse, update_field_pulse};

/// Query region of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FieldShape {
    #[default]
    Sphere,
    Capsule,
    Ray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TagFilterMode {
    #[default]
    Off,
    AllowListed,
    DenyListed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagFilter {
    pub mode: TagFilterMode,
    pub tags: BTreeSet<String>,
}

impl TagFilter {
    pub fn allow<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { mode: TagFilterMode::AllowListed, tags: tags.into_iter().map(Into::into).collect() }
    }

    pub fn deny<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { mode: TagFilterMode::DenyListed, tags: tags.into_iter().map(Into::into).collect() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum VolumeFilterMode {
    #[default]
    Off,
    AllowInside,
    DenyInside,
}

/// Volume filter. `volume` points at an entity carrying [`FieldVolume`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeFilter {
    pub mode: VolumeFilterMode,
    pub volume: Option<Entity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSettings {
    pub enabled: bool,
    pub thickness: f32,
    /// `None` draws with the shared unlit outline material.
    pub material: Option<Handle<StandardMaterial>>,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self { enabled: true, thickness: 0.05, material: None }
    }
}

/// Where an impulse emanates from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceOrigin {
    Point(Vec3),
    /// Follows the world position of another entity; resolved every step.
    Tracked(Entity),
}

/// A radial force field. Every field is public so tuning tools can mirror
/// their state into it (and back) once per frame.
#[derive(Component, Debug, Clone)]
pub struct ForceField {
    pub enabled: bool,
    pub shape: FieldShape,
    /// Empty: impulses come from the field's own position.
    pub origins: Vec<ForceOrigin>,
    /// Positive attracts, negative repels.
    pub magnitude: f32,
    pub size: f32,
    pub capsule_radius: f32,
    pub tag_filter: TagFilter,
    pub volume_filter: VolumeFilter,
    pub pulse: Pulse,
    pub outline: OutlineSettings,
}

impl Default for ForceField {
    fn default() -> Self {
        Self {
            enabled: true,
            shape: FieldShape::Sphere,
            origins: Vec::new(),
            magnitude: 10.0,
            size: 10.0,
            capsule_radius: 2.0,
            tag_filter: TagFilter::default(),
            volume_filter: VolumeFilter::default(),
            pulse: Pulse::default(),
            outline: OutlineSettings::default(),
        }
    }
}

impl ForceField {
    pub fn sphere(size: f32, magnitude: f32) -> Self {
        Self { size, magnitude, ..default() }
    }

    /// Size as consumed by query, falloff and outline (never negative).
    pub fn extent(&self) -> f32 {
        self.size.max(0.0)
    }
}

/// Gameplay tag of a body, matched by [`TagFilter`].
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyTag(pub String);

impl BodyTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

/// Box region referenced by volume filters. Centered on the entity's transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct FieldVolume {
    pub half_extents: Vec3,
}

impl FieldVolume {
    /// World-space axis-aligned bounds of the (possibly rotated) box.
    pub fn bounds(&self, transform: &GlobalTransform) -> BoundingVolume {
        let (scale, rotation, center) = transform.to_scale_rotation_translation();
        let half = self.half_extents * scale.abs();
        let m = Mat3::from_quat(rotation);
        let extent = Vec3::new(
            m.x_axis.x.abs() * half.x + m.y_axis.x.abs() * half.y + m.z_axis.x.abs() * half.z,
            m.x_axis.y.abs() * half.x + m.y_axis.y.abs() * half.y + m.z_axis.y.abs() * half.z,
            m.x_axis.z.abs() * half.x + m.y_axis.z.abs() * half.y + m.z_axis.z.abs() * half.z,
        );
        BoundingVolume::from_center_half_extents(center, extent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingVolume {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self { min: center - half_extents, max: center + half_extents }
    }

    /// Inclusive on every face.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Collaborator a field needed but could not find this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFault {
    MissingOrigin(Entity),
    MissingVolume(Entity),
    PhysicsUnavailable,
    MissingMaterial,
}

/// Last-step counters of a field plus the collaborators it is missing.
/// Inserted automatically.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct FieldActivity {
    pub candidates: usize,
    pub affected: usize,
    pub impulses: usize,
    pub fault: Option<FieldFault>,
    pub outline_fault: Option<FieldFault>,
}

impl FieldActivity {
    /// Records a force-step fault, logging only on change.
    pub fn report_fault(&mut self, entity: Entity, fault: Option<FieldFault>) {
        log_transition(&mut self.fault, entity, fault);
    }

    /// Nothing was applied this step.
    pub fn clear_counters(&mut self) {
        self.candidates = 0;
        self.affected = 0;
        self.impulses = 0;
    }

    pub fn report_outline_fault(&mut self, entity: Entity, fault: Option<FieldFault>) {
        log_transition(&mut self.outline_fault, entity, fault);
    }
}

fn log_transition(slot: &mut Option<FieldFault>, entity: Entity, fault: Option<FieldFault>) {
    if *slot == fault {
        return;
    }
    match fault {
        Some(f) => warn!("FIELD fault entity={:?} fault={:?} (skipping)", entity, f),
        None => info!("FIELD recovered entity={:?}", entity),
    }
    *slot = fault;
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSet {
    Init,
    Pulse,
    Outline,
}

pub struct ForceFieldPlugin;
impl Plugin for ForceFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OutlineMaterials>()
            .configure_sets(Update, (FieldSet::Init, FieldSet::Pulse, FieldSet::Outline).chain())
            .add_systems(Update, init_new_fields.in_set(FieldSet::Init))
            .add_systems(Update, update_field_pulse.in_set(FieldSet::Pulse))
            .add_systems(Update, (sync_field_outlines, release_orphan_outlines).in_set(FieldSet::Outline))
            .add_systems(
                FixedUpdate,
                // impulses must land before rapier reads them for this step
                (apply_field_forces, log_field_activity).chain().before(PhysicsSet::SyncBackend),
            );
    }
}

fn init_new_fields(
    mut commands: Commands,
    mut q: Query<(Entity, &mut ForceField, Option<&FieldActivity>), Added<ForceField>>,
) {
    for (entity, mut field, activity) in &mut q {
        if field.pulse.enabled {
            let (lo, _) = field.pulse.bounds();
            field.size = lo;
            field.pulse.restart();
        }
        if activity.is_none() {
            commands.entity(entity).insert(FieldActivity::default());
        }
        info!("FIELD spawn entity={:?} shape={:?} size={:.2} magnitude={:.2} origins={}",
            entity, field.shape, field.size, field.magnitude, field.origins.len());
    }
}
