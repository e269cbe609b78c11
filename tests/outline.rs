use radial_force::prelude::*;
use bevy::prelude::*;

fn pose() -> FieldPose {
    FieldPose::at(Vec3::new(1.0, 2.0, 3.0))
}

#[test]
fn sphere_outline_is_six_spokes() {
    let p = pose();
    let v = outline_vertices(FieldShape::Sphere, &p, 4.0, 99.0);
    assert_eq!(v.len(), 12);
    // Every odd vertex returns to the center.
    assert!(v.iter().skip(1).step_by(2).all(|c| *c == p.position));
    assert_eq!(v[0], p.position + Vec3::Y * 4.0);
    assert_eq!(v[8], p.position + Vec3::NEG_Z * 4.0);
}

#[test]
fn capsule_outline_has_seventeen_vertices() {
    let p = pose();
    let v = outline_vertices(FieldShape::Capsule, &p, 10.0, 2.0);
    assert_eq!(v.len(), 17);
    let end = p.position + Vec3::NEG_Z * 10.0;
    assert_eq!(v[0], p.position + Vec3::Y * 2.0);
    assert_eq!(v[8], end);
    assert_eq!(v[9], end + Vec3::Y * 2.0);
    assert_eq!(v[16], end);
}

#[test]
fn ray_outline_is_one_segment() {
    let p = FieldPose { position: Vec3::ZERO, rotation: Quat::from_rotation_y(std::f32::consts::PI) };
    let v = outline_vertices(FieldShape::Ray, &p, 5.0, 0.0);
    assert_eq!(v.len(), 2);
    assert!((v[1] - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
}

#[test]
fn color_follows_magnitude_sign() {
    assert_eq!(outline_color(0.0), NEUTRAL_COLOR);
    assert_eq!(outline_color(3.0), ATTRACT_COLOR);
    assert_eq!(outline_color(-3.0), REPEL_COLOR);
}

#[test]
fn line_mesh_has_a_prism_per_segment() {
    let points = outline_vertices(FieldShape::Sphere, &pose(), 4.0, 0.0);
    let mesh = line_strip_mesh(&points, 0.05, ATTRACT_COLOR);
    assert_eq!(mesh.count_vertices(), 11 * 8);
    assert_eq!(mesh.indices().map(|i| i.len()), Some(11 * 24));
}

#[test]
fn degenerate_segments_are_skipped() {
    let points = [Vec3::ZERO, Vec3::ZERO, Vec3::X];
    let mesh = line_strip_mesh(&points, 0.1, NEUTRAL_COLOR);
    assert_eq!(mesh.count_vertices(), 8);
    let empty = line_strip_mesh(&[], 0.1, NEUTRAL_COLOR);
    assert_eq!(empty.count_vertices(), 0);
}
