//! Duskfall Core - shared primitives for the Duskfall game core
//!
//! This crate provides the foundational pieces used by the other crates:
//! - Timing building blocks (countdown cooldowns, low-frequency decision clocks)
//! - Mathematical primitives (re-exported from glam)

pub mod time;

pub use glam::Vec3;
pub use time::{Cooldown, DecisionClock};
