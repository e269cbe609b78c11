// Scene presets: fields, filter volumes, body clouds and gravity loaded from RON.
use bevy::prelude::*;
use bevy::math::EulerRot;
use bevy::math::primitives::{Cuboid, Sphere};
use bevy_rapier3d::prelude::*;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;

use crate::plugins::camera::OrbitCamera;
use crate::plugins::core_sim::SimContext;
use crate::plugins::force_field::{
    BodyTag, FieldShape, FieldVolume, ForceField, ForceOrigin, OutlineSettings, TagFilter, TagFilterMode,
    VolumeFilter, VolumeFilterMode,
};
use crate::plugins::pulse::Pulse;

pub const DEFAULT_PRESET_PATH: &str = "assets/fields/arena.ron";

// ----------------------- Preset Definition (RON) -----------------------

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Vec3Def { pub x: f32, pub y: f32, pub z: f32 }
impl Vec3Def { pub fn to_vec3(self) -> Vec3 { Vec3::new(self.x, self.y, self.z) } }

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TagFilterDef {
    pub mode: TagFilterMode,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct VolumeFilterDef {
    pub mode: VolumeFilterMode,
    /// Name of an entry in `volumes`.
    pub volume: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PulseDef {
    pub enabled: bool,
    pub speed: f32,
    pub min: f32,
    pub max: f32,
}
impl Default for PulseDef {
    fn default() -> Self {
        let p = Pulse::default();
        Self { enabled: p.enabled, speed: p.speed, min: p.min, max: p.max }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct OutlineDef {
    pub enabled: bool,
    pub thickness: f32,
}
impl Default for OutlineDef {
    fn default() -> Self {
        let o = OutlineSettings::default();
        Self { enabled: o.enabled, thickness: o.thickness }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FieldDef {
    pub name: String,
    pub position: Vec3Def,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub enabled: bool,
    pub shape: FieldShape,
    pub magnitude: f32,
    pub size: f32,
    pub capsule_radius: f32,
    pub origins: Vec<Vec3Def>,
    pub tag_filter: TagFilterDef,
    pub volume_filter: VolumeFilterDef,
    pub pulse: PulseDef,
    pub outline: OutlineDef,
}
impl Default for FieldDef {
    fn default() -> Self {
        let f = ForceField::default();
        Self {
            name: "field".into(),
            position: Vec3Def::default(),
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            enabled: f.enabled,
            shape: f.shape,
            magnitude: f.magnitude,
            size: f.size,
            capsule_radius: f.capsule_radius,
            origins: Vec::new(),
            tag_filter: TagFilterDef::default(),
            volume_filter: VolumeFilterDef::default(),
            pulse: PulseDef::default(),
            outline: OutlineDef::default(),
        }
    }
}

impl FieldDef {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw_deg.to_radians(), self.pitch_deg.to_radians(), 0.0);
        Transform::from_translation(self.position.to_vec3()).with_rotation(rotation)
    }

    /// Builds the component; volume names resolve through `volumes`.
    pub fn to_field(&self, volumes: &HashMap<String, Entity>) -> ForceField {
        let volume = self.volume_filter.volume.as_ref().and_then(|name| {
            let found = volumes.get(name).copied();
            if found.is_none() {
                warn!("PRESET field={} references unknown volume={}", self.name, name);
            }
            found
        });
        ForceField {
            enabled: self.enabled,
            shape: self.shape,
            origins: self.origins.iter().map(|o| ForceOrigin::Point(o.to_vec3())).collect(),
            magnitude: self.magnitude,
            size: self.size.max(0.0),
            capsule_radius: self.capsule_radius,
            tag_filter: TagFilter { mode: self.tag_filter.mode, tags: self.tag_filter.tags.iter().cloned().collect() },
            volume_filter: VolumeFilter { mode: self.volume_filter.mode, volume },
            pulse: Pulse {
                enabled: self.pulse.enabled,
                speed: self.pulse.speed,
                min: self.pulse.min,
                max: self.pulse.max,
                ..default()
            },
            outline: OutlineSettings { enabled: self.outline.enabled, thickness: self.outline.thickness, material: None },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VolumeDef {
    pub name: String,
    pub center: Vec3Def,
    pub half_extents: Vec3Def,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BodyCloudDef {
    pub count: u32,
    pub center: Vec3Def,
    pub spread: f32,
    pub radius: f32,
    pub tag: Option<String>,
}
impl Default for BodyCloudDef {
    fn default() -> Self {
        Self { count: 0, center: Vec3Def::default(), spread: 10.0, radius: 0.5, tag: None }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CameraDef {
    pub eye: Vec3Def,
    pub look_at: Vec3Def,
}
impl Default for CameraDef {
    fn default() -> Self {
        Self { eye: Vec3Def { x: 0.0, y: 18.0, z: 36.0 }, look_at: Vec3Def::default() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GroundDef {
    pub half_extent: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize, Resource, Clone, Default)]
#[serde(default)]
pub struct PresetDef {
    /// Replaces the simulation context's gravity when present.
    pub gravity: Option<Vec3Def>,
    pub camera: CameraDef,
    pub ground: Option<GroundDef>,
    pub volumes: Vec<VolumeDef>,
    pub fields: Vec<FieldDef>,
    pub bodies: Vec<BodyCloudDef>,
}

pub fn parse_preset(data: &str) -> Result<PresetDef, ron::error::SpannedError> {
    ron::from_str::<PresetDef>(data)
}

// ----------------------- Plugin -----------------------

/// Preset file to load at startup (native builds).
#[derive(Resource, Debug, Clone)]
pub struct PresetPath(pub String);
impl Default for PresetPath {
    fn default() -> Self { Self(DEFAULT_PRESET_PATH.into()) }
}

#[derive(Component)]
pub struct PresetBody;

pub struct PresetPlugin;
impl Plugin for PresetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PresetPath>()
            .add_systems(Startup, load_preset)
            .add_systems(Startup, spawn_preset.after(load_preset));
    }
}

// ----------------------- Systems -----------------------

fn install_preset(commands: &mut Commands, def: PresetDef) {
    if let Some(g) = def.gravity {
        commands.insert_resource(SimContext { gravity: g.to_vec3() });
    }
    info!("PRESET loaded fields={} volumes={} body_clouds={}", def.fields.len(), def.volumes.len(), def.bodies.len());
    commands.insert_resource(def);
}

fn load_preset(mut commands: Commands, path: Res<PresetPath>) {
    #[cfg(target_arch = "wasm32")]
    {
        // No filesystem in the browser; the default preset is embedded.
        let _ = &path;
        let data = include_str!("../../assets/fields/arena.ron");
        match parse_preset(data) {
            Ok(def) => install_preset(&mut commands, def),
            Err(e) => error!("Failed to parse embedded preset: {e}"),
        }
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = path.0.as_str();
        if let Ok(data) = fs::read_to_string(path) {
            match parse_preset(&data) {
                Ok(def) => install_preset(&mut commands, def),
                Err(e) => error!("Failed to parse {path}: {e}"),
            }
        } else {
            error!("Failed to read preset file {path}");
        }
    }
}

fn spawn_preset(
    mut commands: Commands,
    preset: Option<Res<PresetDef>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let Some(preset) = preset else { return; };

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(preset.camera.eye.to_vec3())
                .looking_at(preset.camera.look_at.to_vec3(), Vec3::Y),
            ..default()
        },
        OrbitCamera,
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(20.0, 40.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    if let Some(ground) = preset.ground {
        let h = ground.half_extent;
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(h * 2.0, 0.5, h * 2.0)),
                material: mats.add(Color::srgb(0.25, 0.27, 0.30)),
                transform: Transform::from_xyz(0.0, ground.height - 0.25, 0.0),
                ..default()
            },
            RigidBody::Fixed,
            Collider::cuboid(h, 0.25, h),
            Name::new("Ground"),
        ));
    }

    let volume_mat = mats.add(StandardMaterial {
        base_color: Color::srgba(0.3, 0.5, 1.0, 0.12),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let mut volumes: HashMap<String, Entity> = HashMap::new();
    for v in &preset.volumes {
        let half = v.half_extents.to_vec3().abs();
        let id = commands
            .spawn((
                PbrBundle {
                    mesh: meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0)),
                    material: volume_mat.clone(),
                    transform: Transform::from_translation(v.center.to_vec3()),
                    ..default()
                },
                FieldVolume { half_extents: half },
                Name::new(v.name.clone()),
            ))
            .id();
        volumes.insert(v.name.clone(), id);
    }

    for f in &preset.fields {
        commands.spawn((
            SpatialBundle::from_transform(f.transform()),
            f.to_field(&volumes),
            Name::new(f.name.clone()),
        ));
    }

    let mut rng = rand::thread_rng();
    for cloud in &preset.bodies {
        let radius = cloud.radius.max(0.05);
        let mesh = meshes.add(Sphere::new(radius));
        let material = mats.add(tag_color(cloud.tag.as_deref()));
        let center = cloud.center.to_vec3();
        for _ in 0..cloud.count {
            let offset = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            ) * cloud.spread;
            let mut body = commands.spawn((
                PbrBundle {
                    mesh: mesh.clone(),
                    material: material.clone(),
                    transform: Transform::from_translation(center + offset),
                    ..default()
                },
                RigidBody::Dynamic,
                Collider::ball(radius),
                Velocity::zero(),
                ExternalImpulse::default(),
                Damping { linear_damping: 0.3, angular_damping: 0.8 },
                PresetBody,
            ));
            if let Some(tag) = &cloud.tag {
                body.insert(BodyTag::new(tag.clone()));
            }
        }
    }
}

fn tag_color(tag: Option<&str>) -> Color {
    match tag {
        None => Color::srgb(0.8, 0.8, 0.8),
        Some(t) => {
            let hash = t.bytes().fold(17u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32));
            Color::hsl((hash % 360) as f32, 0.65, 0.55)
        }
    }
}
