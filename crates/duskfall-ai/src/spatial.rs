//! Collaborator seams — navigation queries, movement orders, player health
//!
//! The behavior controller never pathfinds or applies damage itself; the
//! engine-side layer implements these traits and the controller calls
//! through them.

use glam::Vec3;

use crate::zone::ProtectiveZone;

/// Unique identifier for a navigating agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentId(pub u64);

/// Navigation collaborator.
pub trait Navigator {
    /// Closest point on the pathing surface to `point`, searching within
    /// `radius`. `None` when the surface is unavailable there.
    fn nearest_reachable(&self, point: Vec3, radius: f32) -> Option<Vec3>;

    /// Whether a straight path from `from` to `to` passes through any of the
    /// given zones.
    fn path_crosses_zone(&self, from: Vec3, to: Vec3, zones: &[ProtectiveZone]) -> bool;

    /// Order `agent` to move toward `target` at `speed`.
    fn set_destination(&mut self, agent: AgentId, target: Vec3, speed: f32);

    /// Halt `agent`.
    fn stop(&mut self, agent: AgentId);
}

/// Player health collaborator, hit by the attack sub-protocol.
pub trait PlayerHealth {
    fn take_damage(&mut self, amount: f32);
}
