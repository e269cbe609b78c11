// Candidate filtering: tag stage then volume stage. Pure functions, no side effects.
use bevy::prelude::*;

use crate::plugins::field_query::Candidate;
use crate::plugins::force_field::{BoundingVolume, TagFilter, TagFilterMode, VolumeFilter, VolumeFilterMode};

impl TagFilter {
    /// Untagged bodies never match the list.
    pub fn admits(&self, tag: Option<&str>) -> bool {
        let listed = tag.is_some_and(|t| self.tags.contains(t));
        match self.mode {
            TagFilterMode::Off => true,
            TagFilterMode::AllowListed => listed,
            TagFilterMode::DenyListed => !listed,
        }
    }
}

impl VolumeFilter {
    /// `bounds` is the resolved region; `None` counts as an empty region.
    pub fn admits(&self, bounds: Option<&BoundingVolume>, point: Vec3) -> bool {
        let inside = bounds.is_some_and(|b| b.contains(point));
        match self.mode {
            VolumeFilterMode::Off => true,
            VolumeFilterMode::AllowInside => inside,
            VolumeFilterMode::DenyInside => !inside,
        }
    }
}

pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    tags: &'a TagFilter,
    volume: &'a VolumeFilter,
    bounds: Option<&'a BoundingVolume>,
) -> impl Iterator<Item = &'a Candidate> + 'a {
    candidates
        .iter()
        .filter(move |c| tags.admits(c.tag()))
        .filter(move |c| volume.admits(bounds, c.position))
}
