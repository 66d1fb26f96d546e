//! Duskfall AI - enemy behavior controllers
//!
//! Finite-state enemies that stalk the player in darkness, fear active
//! light sources, and keep clear of protective zones. Pathfinding, physics,
//! and damage stay behind the [`Navigator`] and [`PlayerHealth`] seams; the
//! controllers only consume positions and emit movement orders.

pub mod config;
pub mod controller;
pub mod pack;
pub mod spatial;
pub mod zone;

pub use config::EnemyConfig;
pub use controller::{EnemyController, EnemyState, Perception};
pub use pack::{PackAlert, PackRoster};
pub use spatial::{AgentId, Navigator, PlayerHealth};
pub use zone::ProtectiveZone;
