use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};

use radial_force::prelude::*;

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let args: Vec<String> = std::env::args().collect();
    let preset = arg_value(&args, "--preset").unwrap_or_else(|| DEFAULT_PRESET_PATH.to_string());
    let runtime = arg_value(&args, "--runtime").and_then(|s| s.parse::<f32>().ok());

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.06, 0.07, 0.09)))
        .insert_resource(Msaa::Sample4)
        .insert_resource(AmbientLight {
            color: Color::srgb(0.55, 0.55, 0.60),
            brightness: 400.0,
        })
        .insert_resource(PresetPath(preset))
        .insert_resource(RunConfig { run_duration_seconds: runtime })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window { title: "Radial Force".into(), ..default() }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(CoreSimPlugin)      // timing + simulation context
        .add_plugins(ForceFieldPlugin)   // field pipeline, pulse, outlines
        .add_plugins(PresetPlugin)       // world & entities from RON
        .add_plugins(CameraPlugin)       // orbit camera
        .add_plugins(HudPlugin)          // field readout
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(LogDiagnosticsPlugin::default())
        .run();
}
