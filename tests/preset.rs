use radial_force::prelude::*;
use radial_force::plugins::preset::FieldDef;
use bevy::prelude::*;
use std::collections::HashMap;

#[test]
fn shipped_preset_parses() {
    let data = include_str!("../assets/fields/arena.ron");
    let preset = parse_preset(data).expect("arena preset parses");
    assert_eq!(preset.gravity.map(|g| g.to_vec3()), Some(Vec3::ZERO));
    assert_eq!(preset.fields.len(), 4);
    assert!(preset.fields.iter().any(|f| f.shape == FieldShape::Capsule && f.origins.len() == 2));
    assert_eq!(preset.volumes[0].name, "calm_zone");
}

#[test]
fn omitted_entries_fall_back_to_component_defaults() {
    let preset = parse_preset("(fields: [(name: \"bare\")])").unwrap();
    let field = preset.fields[0].to_field(&HashMap::new());
    let defaults = ForceField::default();
    assert_eq!(field.shape, defaults.shape);
    assert_eq!(field.size, defaults.size);
    assert_eq!(field.magnitude, defaults.magnitude);
    assert_eq!(field.capsule_radius, defaults.capsule_radius);
    assert_eq!(field.pulse, defaults.pulse);
    assert_eq!(field.outline, defaults.outline);
    assert!(field.origins.is_empty());
    assert!(preset.gravity.is_none());
}

#[test]
fn volume_names_resolve_to_entities() {
    let def = FieldDef {
        volume_filter: radial_force::plugins::preset::VolumeFilterDef {
            mode: VolumeFilterMode::AllowInside,
            volume: Some("zone".into()),
        },
        ..FieldDef::default()
    };
    let zone = Entity::from_raw(7);
    let volumes = HashMap::from([("zone".to_string(), zone)]);
    assert_eq!(def.to_field(&volumes).volume_filter.volume, Some(zone));
    assert_eq!(def.to_field(&HashMap::new()).volume_filter.volume, None);
}

#[test]
fn malformed_preset_is_an_error() {
    assert!(parse_preset("(fields: [(shape: Cube)])").is_err());
}
