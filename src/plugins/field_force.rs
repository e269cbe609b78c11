// Fixed-step force pipeline: query -> tag filter -> volume filter -> one impulse per origin.
use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalImpulse;
use std::collections::BTreeMap;

use crate::plugins::core_sim::{SimState, FIXED_HZ};
use crate::plugins::field_filter::filter_candidates;
use crate::plugins::field_query::{Candidate, CandidateSource, FieldPose, FieldProbe, RapierCandidates};
use crate::plugins::force_field::{
    BoundingVolume, FieldActivity, FieldFault, FieldVolume, ForceField, ForceOrigin, VolumeFilterMode,
};

/// Impulse application supplied by the physics host. Fire-and-forget.
pub trait ImpulseSink {
    fn apply_explosion(&mut self, target: &Candidate, magnitude: f32, origin: Vec3, falloff_radius: f32);
}

/// Explosion-style force on a body at `target` from `origin`.
///
/// Linear falloff: full `magnitude` at the origin, zero at `falloff_radius` and
/// beyond. A non-positive radius disables the falloff. Positive magnitude pulls
/// the body toward the origin, negative pushes it away.
pub fn explosion_force(magnitude: f32, origin: Vec3, falloff_radius: f32, target: Vec3) -> Vec3 {
    let offset = origin - target;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return Vec3::ZERO;
    }
    let attenuation = if falloff_radius > 0.0 {
        if distance > falloff_radius {
            return Vec3::ZERO;
        }
        1.0 - distance / falloff_radius
    } else {
        1.0
    };
    offset / distance * magnitude * attenuation
}

/// Impulses accumulated for one fixed step, keyed by body.
#[derive(Debug, Default)]
pub struct ImpulseBatch {
    dt: f32,
    impulses: BTreeMap<Entity, Vec3>,
}

impl ImpulseBatch {
    pub fn new(dt: f32) -> Self {
        Self { dt, impulses: BTreeMap::new() }
    }

    pub fn impulse(&self, body: Entity) -> Option<Vec3> {
        self.impulses.get(&body).copied()
    }

    pub fn len(&self) -> usize {
        self.impulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impulses.is_empty()
    }

    pub fn into_impulses(self) -> impl Iterator<Item = (Entity, Vec3)> {
        self.impulses.into_iter()
    }
}

impl ImpulseSink for ImpulseBatch {
    fn apply_explosion(&mut self, target: &Candidate, magnitude: f32, origin: Vec3, falloff_radius: f32) {
        let impulse = explosion_force(magnitude, origin, falloff_radius, target.position) * self.dt;
        *self.impulses.entry(target.body).or_insert(Vec3::ZERO) += impulse;
    }
}

/// Everything a field step needs from the world, already resolved.
#[derive(Debug, Clone)]
pub struct FieldStep {
    pub entity: Entity,
    pub pose: FieldPose,
    /// World positions; empty means the field's own position.
    pub origins: Vec<Vec3>,
    pub bounds: Option<BoundingVolume>,
}

impl FieldStep {
    pub fn new(entity: Entity, pose: FieldPose) -> Self {
        Self { entity, pose, origins: Vec::new(), bounds: None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStepReport {
    pub candidates: usize,
    pub affected: usize,
    pub impulses: usize,
}

/// Query + filter stages. Dynamic bodies other than the field itself only.
pub fn select_targets<S: CandidateSource + ?Sized>(field: &ForceField, step: &FieldStep, source: &S) -> (usize, Vec<Candidate>) {
    if !field.enabled {
        return (0, Vec::new());
    }
    let probe = FieldProbe::for_field(field, &step.pose);
    let candidates: Vec<Candidate> = source
        .candidates(&probe, step.entity)
        .into_iter()
        .filter(|c| c.dynamic && c.body != step.entity)
        .collect();
    let targets = filter_candidates(&candidates, &field.tag_filter, &field.volume_filter, step.bounds.as_ref())
        .cloned()
        .collect();
    (candidates.len(), targets)
}

/// One fixed step of a field: every target receives one impulse per origin.
pub fn run_field_step<S, K>(field: &ForceField, step: &FieldStep, source: &S, sink: &mut K) -> FieldStepReport
where
    S: CandidateSource + ?Sized,
    K: ImpulseSink + ?Sized,
{
    let (candidates, targets) = select_targets(field, step, source);
    let falloff = field.extent();
    let mut report = FieldStepReport { candidates, affected: targets.len(), impulses: 0 };
    for target in &targets {
        if step.origins.is_empty() {
            sink.apply_explosion(target, field.magnitude, step.pose.position, falloff);
            report.impulses += 1;
        } else {
            for &origin in &step.origins {
                sink.apply_explosion(target, field.magnitude, origin, falloff);
                report.impulses += 1;
            }
        }
    }
    report
}

fn resolve_origins(field: &ForceField, q_points: &Query<&GlobalTransform>) -> Result<Vec<Vec3>, FieldFault> {
    field
        .origins
        .iter()
        .map(|origin| match *origin {
            ForceOrigin::Point(p) => Ok(p),
            ForceOrigin::Tracked(e) => q_points
                .get(e)
                .map(|t| t.translation())
                .map_err(|_| FieldFault::MissingOrigin(e)),
        })
        .collect()
}

fn resolve_bounds(
    field: &ForceField,
    q_volumes: &Query<(&GlobalTransform, &FieldVolume)>,
) -> Result<Option<BoundingVolume>, FieldFault> {
    if field.volume_filter.mode == VolumeFilterMode::Off {
        return Ok(None);
    }
    let Some(volume) = field.volume_filter.volume else { return Ok(None); };
    match q_volumes.get(volume) {
        Ok((t, v)) => Ok(Some(v.bounds(t))),
        Err(_) => Err(FieldFault::MissingVolume(volume)),
    }
}

pub fn apply_field_forces(
    mut commands: Commands,
    time: Res<Time>,
    source: RapierCandidates,
    mut q_fields: Query<(Entity, &ForceField, &GlobalTransform, Option<&mut FieldActivity>)>,
    q_points: Query<&GlobalTransform>,
    q_volumes: Query<(&GlobalTransform, &FieldVolume)>,
    mut q_ext: Query<&mut ExternalImpulse>,
) {
    let dt = time.delta_seconds();
    let mut batch = ImpulseBatch::new(dt);
    let physics = source.is_available();

    for (entity, field, transform, mut activity) in &mut q_fields {
        if !field.enabled {
            if let Some(a) = activity.as_deref_mut() {
                a.clear_counters();
            }
            continue;
        }
        let resolved = if physics {
            resolve_origins(field, &q_points)
                .and_then(|origins| resolve_bounds(field, &q_volumes).map(|bounds| (origins, bounds)))
        } else {
            Err(FieldFault::PhysicsUnavailable)
        };
        let (origins, bounds) = match resolved {
            Ok(r) => r,
            Err(fault) => {
                if let Some(a) = activity.as_deref_mut() {
                    a.report_fault(entity, Some(fault));
                    a.clear_counters();
                }
                continue;
            }
        };
        let step = FieldStep { entity, pose: FieldPose::from_global(transform), origins, bounds };
        let report = run_field_step(field, &step, &source, &mut batch);
        if let Some(a) = activity.as_deref_mut() {
            a.report_fault(entity, None);
            a.candidates = report.candidates;
            a.affected = report.affected;
            a.impulses = report.impulses;
        }
    }

    for (body, impulse) in batch.into_impulses() {
        if impulse == Vec3::ZERO {
            continue;
        }
        if let Ok(mut ext) = q_ext.get_mut(body) {
            ext.impulse += impulse;
        } else {
            commands.entity(body).insert(ExternalImpulse { impulse, torque_impulse: Vec3::ZERO });
        }
    }
}

pub fn log_field_activity(sim: Option<Res<SimState>>, q: Query<(Entity, &ForceField, &FieldActivity)>) {
    let Some(sim) = sim else { return; };
    let hz = FIXED_HZ as u64;
    if sim.tick == 0 || sim.tick % hz != 0 {
        return;
    }
    for (entity, field, activity) in &q {
        if !field.enabled {
            continue;
        }
        info!("T+{}s FIELD entity={:?} size={:.2} candidates={} affected={} impulses={}",
            sim.tick / hz, entity, field.size, activity.candidates, activity.affected, activity.impulses);
    }
}
