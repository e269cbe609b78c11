//! Convenience re-exports for frequently used types & plugins.
pub use crate::plugins::core_sim::{SimState, SimContext, RunConfig, CoreSimPlugin, FIXED_HZ, DEFAULT_GRAVITY};
pub use crate::plugins::force_field::{
    ForceField, ForceFieldPlugin, FieldShape, ForceOrigin, TagFilter, TagFilterMode, VolumeFilter,
    VolumeFilterMode, OutlineSettings, BodyTag, FieldVolume, BoundingVolume, FieldActivity, FieldFault, FieldSet,
};
pub use crate::plugins::field_query::{Candidate, CandidateSource, FieldPose, FieldProbe, RapierCandidates};
pub use crate::plugins::field_filter::filter_candidates;
pub use crate::plugins::field_force::{
    explosion_force, run_field_step, select_targets, FieldStep, FieldStepReport, ImpulseBatch, ImpulseSink,
};
pub use crate::plugins::field_outline::{
    outline_color, outline_vertices, line_strip_mesh, FieldOutline, OutlineLine, ATTRACT_COLOR, NEUTRAL_COLOR,
    REPEL_COLOR,
};
pub use crate::plugins::pulse::{Pulse, PulseDirection};
pub use crate::plugins::preset::{parse_preset, PresetDef, PresetPath, PresetPlugin, DEFAULT_PRESET_PATH};
pub use crate::plugins::camera::{CameraPlugin, OrbitCamera};
pub use crate::plugins::hud::{HudPlugin, Hud};
