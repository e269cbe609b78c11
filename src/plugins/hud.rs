use bevy::prelude::*;

use crate::plugins::core_sim::{SimContext, SimState};
use crate::plugins::force_field::{FieldActivity, ForceField};
use crate::plugins::preset::PresetBody;

#[derive(Component)]
pub struct Hud;

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, update_hud);
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle { font_size: 18.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        Hud,
    ));
}

fn update_hud(
    sim: Res<SimState>,
    ctx: Res<SimContext>,
    q_fields: Query<(Option<&Name>, &ForceField, Option<&FieldActivity>)>,
    q_bodies: Query<(), With<PresetBody>>,
    mut q_text: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = q_text.get_single_mut() else { return; };
    let mut out = format!("Tick: {} (t={:.2}s) | bodies={} | g=({:.1},{:.1},{:.1})",
        sim.tick, sim.elapsed_seconds, q_bodies.iter().count(), ctx.gravity.x, ctx.gravity.y, ctx.gravity.z);
    for (name, field, activity) in &q_fields {
        let name = name.map(|n| n.as_str()).unwrap_or("field");
        let state = if field.enabled { "on" } else { "off" };
        match activity {
            Some(a) => out.push_str(&format!("\n{name} [{state}] {:?} size={:.2} power={:.1} hits={}/{} impulses={}",
                field.shape, field.size, field.magnitude, a.affected, a.candidates, a.impulses)),
            None => out.push_str(&format!("\n{name} [{state}] {:?} size={:.2} power={:.1}",
                field.shape, field.size, field.magnitude)),
        }
    }
    text.sections[0].value = out;
}
