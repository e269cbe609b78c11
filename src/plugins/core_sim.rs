use bevy::prelude::*;
use bevy::app::AppExit;
use bevy::time::Fixed;
use bevy_rapier3d::prelude::{RapierConfiguration, RigidBody, Velocity};

pub const FIXED_HZ: f64 = 60.0;
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

// Core simulation timing & shared simulation context.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / FIXED_HZ as f32;
    }
}

/// Simulation-wide physics parameters. Systems that need gravity read it from
/// here; Rapier's own gravity is switched off at startup.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    pub gravity: Vec3,
}
impl Default for SimContext {
    fn default() -> Self {
        Self { gravity: DEFAULT_GRAVITY }
    }
}
impl SimContext {
    pub fn zero_g() -> Self {
        Self { gravity: Vec3::ZERO }
    }
}

/// Optional auto-exit after a simulated duration (smoke runs).
#[derive(Resource, Default, Debug)]
pub struct RunConfig {
    pub run_duration_seconds: Option<f32>,
}

#[derive(Resource, Default)]
pub struct ExitState { pub triggered: bool }

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .init_resource::<SimContext>() // respect pre-inserted context (e.g. from a preset)
            .init_resource::<RunConfig>()
            .insert_resource(ExitState::default())
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .add_systems(Startup, disable_rapier_gravity)
            .add_systems(FixedUpdate, (tick_state, apply_context_gravity))
            .add_systems(Update, exit_after_runtime);
    }
}

fn tick_state(mut sim: ResMut<SimState>) {
    sim.advance_fixed();
}

fn disable_rapier_gravity(cfg: Option<ResMut<RapierConfiguration>>) {
    if let Some(mut cfg) = cfg {
        cfg.gravity = Vec3::ZERO;
    }
}

fn apply_context_gravity(
    time: Res<Time>,
    ctx: Res<SimContext>,
    mut q: Query<(&RigidBody, &mut Velocity)>,
) {
    if ctx.gravity == Vec3::ZERO { return; }
    let dv = ctx.gravity * time.delta_seconds();
    for (rb, mut vel) in q.iter_mut() {
        if matches!(*rb, RigidBody::Dynamic) {
            vel.linvel += dv;
        }
    }
}

fn exit_after_runtime(
    sim: Res<SimState>,
    run: Res<RunConfig>,
    mut exit_state: ResMut<ExitState>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if exit_state.triggered { return; }
    let Some(limit) = run.run_duration_seconds else { return; };
    if sim.elapsed_seconds >= limit {
        info!("EXIT runtime reached seconds={}", sim.elapsed_seconds);
        exit_state.triggered = true;
        ev_exit.send(AppExit::Success);
    }
}
