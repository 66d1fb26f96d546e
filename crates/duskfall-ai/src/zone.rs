//! Protective zones — regions that suppress enemy aggression

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A spherical region enemies will not enter; called "safe zone" in game
/// content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProtectiveZone {
    pub center: Vec3,
    pub radius: f32,
}

impl ProtectiveZone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside the zone.
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance(point) <= self.radius
    }

    /// Whether `point` is inside the zone or within `margin` of its edge.
    pub fn within_margin(&self, point: Vec3, margin: f32) -> bool {
        self.center.distance(point) <= self.radius + margin
    }
}

/// Whether any zone protects `point`.
pub fn any_contains(zones: &[ProtectiveZone], point: Vec3) -> bool {
    zones.iter().any(|zone| zone.contains(point))
}

/// Whether `point` violates the exclusion margin of any zone.
pub fn any_within_margin(zones: &[ProtectiveZone], point: Vec3, margin: f32) -> bool {
    zones.iter().any(|zone| zone.within_margin(point, margin))
}
