// Candidate query: turns a field's shape into a probe and asks the physics world
// which dynamic bodies it touches.
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::collections::BTreeMap;

use crate::plugins::force_field::{BodyTag, FieldShape, ForceField};

/// World placement of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl FieldPose {
    pub fn at(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }

    pub fn from_global(transform: &GlobalTransform) -> Self {
        let (_, rotation, position) = transform.to_scale_rotation_translation();
        Self { position, rotation }
    }

    pub fn forward(&self) -> Vec3 { self.rotation * Vec3::NEG_Z }
    pub fn back(&self) -> Vec3 { self.rotation * Vec3::Z }
    pub fn up(&self) -> Vec3 { self.rotation * Vec3::Y }
    pub fn down(&self) -> Vec3 { self.rotation * Vec3::NEG_Y }
    pub fn left(&self) -> Vec3 { self.rotation * Vec3::NEG_X }
    pub fn right(&self) -> Vec3 { self.rotation * Vec3::X }
}

/// Resolved query geometry in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldProbe {
    Sphere { center: Vec3, radius: f32 },
    Capsule { start: Vec3, end: Vec3, radius: f32 },
    Ray { origin: Vec3, dir: Vec3, length: f32 },
}

impl FieldProbe {
    pub fn for_field(field: &ForceField, pose: &FieldPose) -> Self {
        let size = field.extent();
        match field.shape {
            FieldShape::Sphere => FieldProbe::Sphere { center: pose.position, radius: size },
            // Swept from the field along its forward axis, same segment the outline draws.
            FieldShape::Capsule => FieldProbe::Capsule {
                start: pose.position,
                end: pose.position + pose.forward() * size,
                radius: field.capsule_radius.max(0.0),
            },
            FieldShape::Ray => FieldProbe::Ray { origin: pose.position, dir: pose.forward(), length: size },
        }
    }

    /// True when the probe cannot touch anything.
    pub fn is_empty(&self) -> bool {
        match *self {
            FieldProbe::Sphere { radius, .. } => radius <= 0.0,
            FieldProbe::Capsule { start, end, radius } => radius <= 0.0 && start == end,
            FieldProbe::Ray { dir, length, .. } => length <= 0.0 || dir == Vec3::ZERO,
        }
    }
}

/// A body touched by a probe, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub body: Entity,
    pub position: Vec3,
    pub tag: Option<String>,
    pub dynamic: bool,
}

impl Candidate {
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Spatial overlap query supplied by the physics host.
pub trait CandidateSource {
    /// Bodies intersecting `probe`, excluding `exclude` (the field's own body).
    fn candidates(&self, probe: &FieldProbe, exclude: Entity) -> Vec<Candidate>;
}

/// Rapier-backed candidate source.
#[derive(SystemParam)]
pub struct RapierCandidates<'w, 's> {
    context: Option<Res<'w, RapierContext>>,
    bodies: Query<'w, 's, (&'static RigidBody, &'static GlobalTransform, Option<&'static BodyTag>)>,
}

impl RapierCandidates<'_, '_> {
    pub fn is_available(&self) -> bool {
        self.context.is_some()
    }
}

impl CandidateSource for RapierCandidates<'_, '_> {
    fn candidates(&self, probe: &FieldProbe, exclude: Entity) -> Vec<Candidate> {
        let Some(ctx) = self.context.as_deref() else { return Vec::new(); };
        if probe.is_empty() {
            return Vec::new();
        }
        let filter = QueryFilter::only_dynamic().exclude_rigid_body(exclude);
        let mut hits: Vec<Entity> = Vec::new();
        match *probe {
            FieldProbe::Sphere { center, radius } => {
                let shape = Collider::ball(radius);
                ctx.intersections_with_shape(center, Quat::IDENTITY, &shape, filter, |e| {
                    hits.push(e);
                    true
                });
            }
            FieldProbe::Capsule { start, end, radius } => {
                let shape = Collider::capsule(start, end, radius);
                ctx.intersections_with_shape(Vec3::ZERO, Quat::IDENTITY, &shape, filter, |e| {
                    hits.push(e);
                    true
                });
            }
            FieldProbe::Ray { origin, dir, length } => {
                ctx.intersections_with_ray(origin, dir.normalize(), length, true, filter, |e, _| {
                    hits.push(e);
                    true
                });
            }
        }

        // Colliders -> owning bodies, one entry per body, ordered by entity.
        let mut by_body: BTreeMap<Entity, Candidate> = BTreeMap::new();
        for collider in hits {
            let body = ctx.collider_parent(collider).unwrap_or(collider);
            if body == exclude || by_body.contains_key(&body) {
                continue;
            }
            let Ok((rb, transform, tag)) = self.bodies.get(body) else { continue; };
            by_body.insert(body, Candidate {
                body,
                position: transform.translation(),
                tag: tag.map(|t| t.0.clone()),
                dynamic: matches!(*rb, RigidBody::Dynamic),
            });
        }
        by_body.into_values().collect()
    }
}
