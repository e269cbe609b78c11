use bevy::prelude::*;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::window::{PrimaryWindow, CursorGrabMode};

use crate::plugins::preset::PresetDef;

/// Marker component for the single orbit camera.
#[derive(Component)]
pub struct OrbitCamera;

/// Runtime mutable orbit state (user-controlled angles & zoom).
#[derive(Resource)]
pub struct OrbitCameraState {
    pub yaw: f32,    // radians
    pub pitch: f32,  // radians, positive looks down on the focus
    pub radius: f32, // world units
    pub focus: Vec3,
    pub seeded: bool,
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self { yaw: 0.0, pitch: 25f32.to_radians(), radius: 36.0, focus: Vec3::ZERO, seeded: false }
    }
}

/// Configuration constants for orbit behavior & constraints.
#[derive(Resource)]
pub struct OrbitCameraConfig {
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub zoom_speed: f32,
    pub sens_yaw: f32,
    pub sens_pitch: f32,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            pitch_min: (-10f32).to_radians(),
            pitch_max: 85f32.to_radians(),
            radius_min: 4.0,
            radius_max: 120.0,
            zoom_speed: 2.0,
            sens_yaw: 0.005,
            sens_pitch: 0.005,
        }
    }
}

/// Tracks whether the cursor is currently locked for orbit control.
#[derive(Resource, Default)]
pub struct OrbitCaptureState {
    pub captured: bool,
}

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(OrbitCameraConfig::default())
            .insert_resource(OrbitCameraState::default())
            .insert_resource(OrbitCaptureState::default())
            .add_systems(Update, (
                seed_orbit_from_camera,
                orbit_camera_capture,
                orbit_camera_input,
                orbit_camera_apply,
            ).chain());
    }
}

/// Derives the initial orbit from wherever the preset placed the camera.
fn seed_orbit_from_camera(
    mut state: ResMut<OrbitCameraState>,
    preset: Option<Res<PresetDef>>,
    q_cam: Query<&Transform, With<OrbitCamera>>,
) {
    if state.seeded { return; }
    let Ok(cam_t) = q_cam.get_single() else { return; };
    let focus = preset.map(|p| p.camera.look_at.to_vec3()).unwrap_or(Vec3::ZERO);
    let offset = cam_t.translation - focus;
    let radius = offset.length();
    if radius > f32::EPSILON {
        state.radius = radius;
        state.yaw = offset.x.atan2(offset.z);
        state.pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
    }
    state.focus = focus;
    state.seeded = true;
}

fn orbit_camera_capture(
    buttons: Res<ButtonInput<MouseButton>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut cap: ResMut<OrbitCaptureState>,
) {
    if let Ok(mut win) = windows.get_single_mut() {
        let want = buttons.pressed(MouseButton::Right);
        if want && !cap.captured {
            win.cursor.visible = false;
            win.cursor.grab_mode = CursorGrabMode::Locked;
            cap.captured = true;
        } else if !want && cap.captured {
            win.cursor.visible = true;
            win.cursor.grab_mode = CursorGrabMode::None;
            cap.captured = false;
        }
    }
}

/// Process mouse input to update orbit state (yaw, pitch, radius).
fn orbit_camera_input(
    mut state: ResMut<OrbitCameraState>,
    cfg: Res<OrbitCameraConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut ev_motion: EventReader<MouseMotion>,
    mut ev_wheel: EventReader<MouseWheel>,
) {
    // Scroll wheel zoom
    for w in ev_wheel.read() {
        let delta = w.y * cfg.zoom_speed;
        state.radius = (state.radius - delta).clamp(cfg.radius_min, cfg.radius_max);
    }

    // Right mouse drag to adjust yaw/pitch
    if buttons.pressed(MouseButton::Right) {
        for m in ev_motion.read() {
            state.yaw -= m.delta.x * cfg.sens_yaw;
            state.pitch += m.delta.y * cfg.sens_pitch;
        }
        state.pitch = state.pitch.clamp(cfg.pitch_min, cfg.pitch_max);
    } else {
        ev_motion.clear();
    }
}

fn orbit_camera_apply(
    state: Res<OrbitCameraState>,
    mut q_cam: Query<&mut Transform, With<OrbitCamera>>,
) {
    if !state.seeded || !state.is_changed() { return; }
    let Ok(mut cam_t) = q_cam.get_single_mut() else { return; };
    let rot = Quat::from_rotation_y(state.yaw) * Quat::from_rotation_x(-state.pitch);
    cam_t.translation = state.focus + rot * (Vec3::Z * state.radius);
    cam_t.look_at(state.focus, Vec3::Y);
}
