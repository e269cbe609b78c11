//! Library entry for integration tests & external tooling.
//! Exposes plugin modules and a prelude for common types.

pub mod plugins {
    pub mod core_sim;
    pub mod force_field;
    pub mod field_query;
    pub mod field_filter;
    pub mod field_force;
    pub mod field_outline;
    pub mod pulse;
    pub mod preset;
    pub mod camera;
    pub mod hud;
}
pub mod prelude;
