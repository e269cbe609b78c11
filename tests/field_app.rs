use radial_force::prelude::*;
use bevy::prelude::*;
use bevy::hierarchy::HierarchyPlugin;
use bevy::transform::TransformPlugin;

// Minimal app: no renderer, no physics backend; mesh/material storage only.
fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, HierarchyPlugin))
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .add_plugins(CoreSimPlugin)
        .add_plugins(ForceFieldPlugin);
    app
}

fn spawn_field(app: &mut App, field: ForceField) -> Entity {
    app.world_mut()
        .spawn((SpatialBundle::from_transform(Transform::from_xyz(0.0, 1.0, 0.0)), field))
        .id()
}

fn outline_lines(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&OutlineLine>().iter(world).count()
}

#[test]
fn outline_created_when_enabled() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();

    assert_eq!(outline_lines(&mut app), 1);
    let outline = app.world().get::<FieldOutline>(field).expect("outline resource");
    let parent = app.world().get::<Parent>(outline.line).expect("outline is parented");
    assert_eq!(parent.get(), field);
    let meshes = app.world().resource::<Assets<Mesh>>();
    assert_eq!(meshes.get(&outline.mesh).map(|m| m.count_vertices()), Some(11 * 8));
}

#[test]
fn outline_destroyed_when_field_disabled() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();
    assert_eq!(outline_lines(&mut app), 1);

    app.world_mut().get_mut::<ForceField>(field).unwrap().enabled = false;
    app.update();
    assert_eq!(outline_lines(&mut app), 0);
    assert!(app.world().get::<FieldOutline>(field).is_none());

    app.world_mut().get_mut::<ForceField>(field).unwrap().enabled = true;
    app.update();
    assert_eq!(outline_lines(&mut app), 1);
}

#[test]
fn outline_destroyed_when_hidden() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();
    app.world_mut().get_mut::<ForceField>(field).unwrap().outline.enabled = false;
    app.update();
    assert_eq!(outline_lines(&mut app), 0);
}

#[test]
fn hidden_outline_is_never_created() {
    let mut app = build_app();
    let mut field = ForceField::sphere(5.0, 10.0);
    field.outline.enabled = false;
    spawn_field(&mut app, field);
    for _ in 0..3 { app.update(); }
    assert_eq!(outline_lines(&mut app), 0);
}

#[test]
fn missing_outline_is_recreated() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();
    let first = app.world().get::<FieldOutline>(field).unwrap().line;
    app.world_mut().entity_mut(first).despawn_recursive();
    app.update();

    assert_eq!(outline_lines(&mut app), 1);
    let second = app.world().get::<FieldOutline>(field).unwrap().line;
    assert_ne!(first, second);
}

#[test]
fn missing_material_skips_outline_and_records_fault() {
    let mut app = build_app();
    let mut field = ForceField::sphere(5.0, 10.0);
    field.outline.material = Some(Handle::weak_from_u128(0x5eed_f1e1d));
    let entity = spawn_field(&mut app, field);
    app.update();
    app.update();

    assert_eq!(outline_lines(&mut app), 0);
    let activity = app.world().get::<FieldActivity>(entity).unwrap();
    assert_eq!(activity.outline_fault, Some(FieldFault::MissingMaterial));
}

#[test]
fn despawning_field_takes_outline_with_it() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();
    app.world_mut().entity_mut(field).despawn_recursive();
    app.update();
    assert_eq!(outline_lines(&mut app), 0);
}

#[test]
fn removing_field_component_releases_outline() {
    let mut app = build_app();
    let field = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update();
    app.world_mut().entity_mut(field).remove::<ForceField>();
    app.update();
    assert_eq!(outline_lines(&mut app), 0);
    assert!(app.world().get::<FieldOutline>(field).is_none());
}

#[test]
fn pulsing_field_starts_at_min_and_stays_in_range() {
    let mut app = build_app();
    let field = ForceField { pulse: Pulse::new(3.0, 2.0, 4.0), ..ForceField::sphere(10.0, 1.0) };
    let entity = spawn_field(&mut app, field);
    app.update();
    for _ in 0..10 {
        app.update();
        let size = app.world().get::<ForceField>(entity).unwrap().size;
        assert!((2.0..=4.0).contains(&size), "size {size} outside pulse range");
    }
}

#[test]
fn force_step_without_physics_records_fault_and_applies_nothing() {
    let mut app = build_app();
    let entity = spawn_field(&mut app, ForceField::sphere(5.0, 10.0));
    app.update(); // inserts FieldActivity
    app.world_mut().run_schedule(FixedUpdate);

    let activity = app.world().get::<FieldActivity>(entity).unwrap();
    assert_eq!(activity.fault, Some(FieldFault::PhysicsUnavailable));
    assert_eq!(activity.impulses, 0);
}

#[test]
fn disabled_field_reports_no_activity_and_no_outline() {
    let mut app = build_app();
    let entity = spawn_field(&mut app, ForceField { enabled: false, ..ForceField::sphere(5.0, 10.0) });
    app.update();
    app.world_mut().run_schedule(FixedUpdate);

    let activity = app.world().get::<FieldActivity>(entity).unwrap();
    assert_eq!(activity.fault, None);
    assert_eq!((activity.candidates, activity.affected, activity.impulses), (0, 0, 0));
    assert_eq!(outline_lines(&mut app), 0);
}
