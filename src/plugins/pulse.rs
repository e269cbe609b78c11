// Pulse: triangle-wave oscillation of a field's size between two bounds.
use bevy::prelude::*;

use crate::plugins::force_field::ForceField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulseDirection {
    #[default]
    Growing,
    Shrinking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub enabled: bool,
    pub speed: f32, // size units per second
    pub min: f32,
    pub max: f32,
    pub direction: PulseDirection,
}

impl Default for Pulse {
    fn default() -> Self {
        Self { enabled: false, speed: 50.0, min: 1.0, max: 5.0, direction: PulseDirection::Growing }
    }
}

impl Pulse {
    pub fn new(speed: f32, min: f32, max: f32) -> Self {
        Self { enabled: true, speed, min, max, direction: PulseDirection::Growing }
    }

    pub fn restart(&mut self) {
        self.direction = PulseDirection::Growing;
    }

    /// Ordered bounds; tolerates min/max being swapped by a tuning tool.
    pub fn bounds(&self) -> (f32, f32) {
        let lo = self.min.min(self.max).max(0.0);
        let hi = self.min.max(self.max).max(0.0);
        (lo, hi)
    }

    /// Advances `size` by one frame and returns the new size, flipping
    /// direction when a bound is reached. Result always lies within `bounds()`.
    pub fn advance(&mut self, size: f32, dt: f32) -> f32 {
        if !self.enabled {
            return size;
        }
        let (lo, hi) = self.bounds();
        let step = self.speed.abs() * dt;
        let size = size.clamp(lo, hi);
        match self.direction {
            PulseDirection::Growing => {
                let next = size + step;
                if next >= hi {
                    self.direction = PulseDirection::Shrinking;
                    hi
                } else {
                    next
                }
            }
            PulseDirection::Shrinking => {
                let next = size - step;
                if next <= lo {
                    self.direction = PulseDirection::Growing;
                    lo
                } else {
                    next
                }
            }
        }
    }
}

pub fn update_field_pulse(time: Res<Time>, mut q: Query<&mut ForceField>) {
    let dt = time.delta_seconds();
    for mut field in &mut q {
        if !field.enabled || !field.pulse.enabled {
            continue;
        }
        let size = field.size;
        let next = field.pulse.advance(size, dt);
        field.size = next;
    }
}
