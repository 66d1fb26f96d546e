//! Enemy tuning parameters

use serde::{Deserialize, Serialize};

/// All tunables for one enemy archetype. Distances are world units, times
/// are seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Seconds between state re-evaluations; behaviors still run every frame.
    pub decision_interval: f32,
    pub detection_range: f32,
    /// Range at which the enemy commits to a chase.
    pub attack_distance: f32,
    /// Range at which a chasing enemy can land a hit.
    pub attack_reach: f32,
    pub attack_cooldown: f32,
    pub attack_damage: f32,

    pub wander_speed: f32,
    pub stalk_speed: f32,
    pub approach_speed: f32,
    pub chase_speed: f32,
    pub retreat_speed: f32,
    /// Length of each retreat step along the repulsion direction.
    pub retreat_step: f32,

    pub wander_radius: f32,
    /// Pause between wander points, also the pause after arriving.
    pub wander_pause: f32,
    /// Wander points closer than this are rejected.
    pub min_travel_distance: f32,

    pub stalking_enabled: bool,
    /// Radius of the circle stalked around the player.
    pub stalk_radius: f32,
    /// After this long in Stalk the enemy is forced into Approach.
    pub stalk_duration: f32,
    /// Seconds between stalk point recomputations.
    pub stalk_update_interval: f32,

    /// Margin outside a zone edge the enemy keeps clear of.
    pub zone_exclusion: f32,
    /// Under threat light, retreat also pushes away from a player closer
    /// than this.
    pub safe_distance: f32,

    pub alert_cooldown: f32,
    /// How far a pack alert carries.
    pub comm_range: f32,
    /// Speed multiplier for agents answering an alert.
    pub alert_speed_boost: f32,
    /// Scatter radius around the alert origin for responders.
    pub alert_scatter: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            decision_interval: 0.2,
            detection_range: 35.0,
            attack_distance: 9.0,
            attack_reach: 2.0,
            attack_cooldown: 2.0,
            attack_damage: 10.0,
            wander_speed: 2.0,
            stalk_speed: 2.5,
            approach_speed: 3.0,
            chase_speed: 4.5,
            retreat_speed: 5.0,
            retreat_step: 4.0,
            wander_radius: 15.0,
            wander_pause: 4.0,
            min_travel_distance: 2.0,
            stalking_enabled: true,
            stalk_radius: 12.0,
            stalk_duration: 12.0,
            stalk_update_interval: 1.5,
            zone_exclusion: 6.0,
            safe_distance: 15.0,
            alert_cooldown: 8.0,
            comm_range: 40.0,
            alert_speed_boost: 1.25,
            alert_scatter: 4.0,
        }
    }
}
