// Debug outline of a field's shape: geometry, line mesh, and the scoped child
// entity that carries it. The child only exists while the field is enabled and
// its outline is switched on.
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::plugins::field_query::FieldPose;
use crate::plugins::force_field::{FieldActivity, FieldFault, FieldShape, ForceField};

pub const OUTLINE_NAME: &str = "ForceFieldOutline";
pub const NEUTRAL_COLOR: Color = Color::WHITE;
pub const ATTRACT_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
pub const REPEL_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Marker on the outline child entity.
#[derive(Component)]
pub struct OutlineLine;

/// Outline resource held by a field while it is drawn.
#[derive(Component, Debug)]
pub struct FieldOutline {
    pub line: Entity,
    pub mesh: Handle<Mesh>,
}

/// Shared fallback material for outlines without one configured.
#[derive(Resource, Default)]
pub struct OutlineMaterials {
    fallback: Option<Handle<StandardMaterial>>,
}

impl OutlineMaterials {
    fn fallback(&mut self, materials: &mut Assets<StandardMaterial>) -> Handle<StandardMaterial> {
        self.fallback
            .get_or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: Color::WHITE,
                    unlit: true,
                    cull_mode: None,
                    ..default()
                })
            })
            .clone()
    }
}

pub fn outline_color(magnitude: f32) -> Color {
    if magnitude > 0.0 {
        ATTRACT_COLOR
    } else if magnitude < 0.0 {
        REPEL_COLOR
    } else {
        NEUTRAL_COLOR
    }
}

fn spokes(center: Vec3, dirs: &[Vec3], length: f32, out: &mut Vec<Vec3>) {
    for dir in dirs {
        out.push(center + *dir * length);
        out.push(center);
    }
}

/// World-space vertex strip for a field outline.
///
/// Sphere: six spokes (tip, center) = 12 vertices. Capsule: four spokes at the
/// start, the end point, four spokes at the end = 17 vertices. Ray: 2 vertices.
pub fn outline_vertices(shape: FieldShape, pose: &FieldPose, size: f32, capsule_radius: f32) -> Vec<Vec3> {
    let center = pose.position;
    match shape {
        FieldShape::Sphere => {
            let mut v = Vec::with_capacity(12);
            let dirs = [pose.up(), pose.down(), pose.left(), pose.right(), pose.forward(), pose.back()];
            spokes(center, &dirs, size, &mut v);
            v
        }
        FieldShape::Capsule => {
            let mut v = Vec::with_capacity(17);
            let dirs = [pose.up(), pose.down(), pose.left(), pose.right()];
            spokes(center, &dirs, capsule_radius, &mut v);
            let end = center + pose.forward() * size;
            v.push(end);
            spokes(end, &dirs, capsule_radius, &mut v);
            v
        }
        FieldShape::Ray => vec![center, center + pose.forward() * size],
    }
}

/// Builds a triangle mesh tracing `points` as a strip of square prisms
/// `thickness` wide. Zero-length segments are skipped.
pub fn line_strip_mesh(points: &[Vec3], thickness: f32, color: Color) -> Mesh {
    let half = thickness.max(0.0) * 0.5;
    let rgba = color.to_linear().to_f32_array();
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for seg in points.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let dir = b - a;
        if dir.length_squared() <= f32::EPSILON {
            continue;
        }
        let u = dir.normalize().any_orthonormal_vector();
        let v = dir.normalize().cross(u);
        let offsets = [u + v, v - u, -u - v, u - v];
        let base = positions.len() as u32;
        for end in [a, b] {
            for o in offsets {
                positions.push((end + o * half).to_array());
                normals.push(o.normalize().to_array());
            }
        }
        for k in 0..4u32 {
            let n = (k + 1) % 4;
            let (a0, a1, b0, b1) = (base + k, base + n, base + 4 + k, base + 4 + n);
            indices.extend_from_slice(&[a0, b0, b1, a0, b1, a1]);
        }
    }

    let colors = vec![rgba; positions.len()];
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

fn release_outline(commands: &mut Commands, field: Entity, outline: &FieldOutline, line_alive: bool, meshes: Option<&mut Assets<Mesh>>) {
    if line_alive {
        commands.entity(outline.line).despawn_recursive();
    }
    if let Some(meshes) = meshes {
        meshes.remove(&outline.mesh);
    }
    commands.entity(field).remove::<FieldOutline>();
}

pub fn sync_field_outlines(
    mut commands: Commands,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<StandardMaterial>>>,
    mut fallback: ResMut<OutlineMaterials>,
    mut q_fields: Query<(Entity, &ForceField, &GlobalTransform, Option<&FieldOutline>, Option<&mut FieldActivity>)>,
    mut q_lines: Query<&mut Handle<StandardMaterial>, With<OutlineLine>>,
    mut renderer_warned: Local<bool>,
) {
    for (entity, field, transform, outline, mut activity) in &mut q_fields {
        let wanted = field.enabled && field.outline.enabled;
        if !wanted {
            if let Some(outline) = outline {
                let alive = q_lines.contains(outline.line);
                release_outline(&mut commands, entity, outline, alive, meshes.as_deref_mut());
            }
            continue;
        }

        let (Some(meshes), Some(materials)) = (meshes.as_deref_mut(), materials.as_deref_mut()) else {
            if !*renderer_warned {
                warn!("OUTLINE skipped: mesh/material assets unavailable");
                *renderer_warned = true;
            }
            continue;
        };

        let material = match &field.outline.material {
            Some(handle) if materials.get(handle).is_none() => {
                if let Some(a) = activity.as_deref_mut() {
                    a.report_outline_fault(entity, Some(FieldFault::MissingMaterial));
                }
                continue;
            }
            Some(handle) => handle.clone(),
            None => fallback.fallback(materials),
        };
        if let Some(a) = activity.as_deref_mut() {
            a.report_outline_fault(entity, None);
        }

        let mesh_handle = match outline {
            Some(o) if q_lines.contains(o.line) => {
                if let Ok(mut current) = q_lines.get_mut(o.line) {
                    if *current != material {
                        *current = material;
                    }
                }
                o.mesh.clone()
            }
            _ => {
                if let Some(stale) = outline {
                    meshes.remove(&stale.mesh);
                }
                let mesh = meshes.add(line_strip_mesh(&[], 0.0, NEUTRAL_COLOR));
                let line = commands
                    .spawn((
                        PbrBundle { mesh: mesh.clone(), material, ..default() },
                        OutlineLine,
                        Name::new(OUTLINE_NAME),
                    ))
                    .set_parent(entity)
                    .id();
                commands.entity(entity).insert(FieldOutline { line, mesh: mesh.clone() });
                mesh
            }
        };

        let pose = FieldPose::from_global(transform);
        let to_local = transform.affine().inverse();
        let points: Vec<Vec3> = outline_vertices(field.shape, &pose, field.extent(), field.capsule_radius.max(0.0))
            .into_iter()
            .map(|p| to_local.transform_point3(p))
            .collect();
        meshes.insert(&mesh_handle, line_strip_mesh(&points, field.outline.thickness, outline_color(field.magnitude)));
    }
}

/// Outlines whose field component was removed.
pub fn release_orphan_outlines(
    mut commands: Commands,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    q: Query<(Entity, &FieldOutline), Without<ForceField>>,
    q_lines: Query<(), With<OutlineLine>>,
) {
    for (entity, outline) in &q {
        let alive = q_lines.contains(outline.line);
        release_outline(&mut commands, entity, outline, alive, meshes.as_deref_mut());
    }
}
