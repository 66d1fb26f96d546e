//! Enemy behavior controller — the finite-state machine driving one agent
//!
//! State is re-evaluated on a low-frequency decision clock; the per-state
//! behavior runs every frame and only issues movement orders through the
//! [`Navigator`] seam. Chase is sticky: an active chase suppresses
//! light-triggered retreat, and only loss of detection range or a zone
//! violation breaks it.

use duskfall_core::{Cooldown, DecisionClock};
use glam::Vec3;
use rand::Rng;
use tracing::warn;

use crate::config::EnemyConfig;
use crate::pack::PackAlert;
use crate::spatial::{AgentId, Navigator, PlayerHealth};
use crate::zone::{self, ProtectiveZone};

/// Behavior states, in escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Wander,
    Stalk,
    Approach,
    Chase,
    Retreat,
}

/// What the controller can see this tick. Positions come from the spatial
/// layer; the threat light flag mirrors the player's active light source.
#[derive(Debug, Clone, Copy)]
pub struct Perception<'a> {
    pub position: Vec3,
    pub player: Option<Vec3>,
    pub threat_light: bool,
    pub zones: &'a [ProtectiveZone],
}

/// How close to a wander target counts as arrived.
const ARRIVE_EPS: f32 = 0.75;
/// Candidate points tried per wander/stalk recomputation.
const POINT_TRIES: usize = 10;
/// Stalk angle advances by a random increment in this range (radians).
const STALK_TURN_MIN: f32 = 0.35;
const STALK_TURN_MAX: f32 = 1.2;

/// Finite-state behavior controller for one enemy agent.
pub struct EnemyController {
    id: AgentId,
    config: EnemyConfig,
    state: EnemyState,
    last_position: Vec3,
    decision: DecisionClock,
    attack_cooldown: Cooldown,
    alert_cooldown: Cooldown,
    wander_pause: Cooldown,
    wander_target: Option<Vec3>,
    stalk_update: Cooldown,
    stalk_angle: f32,
    stalk_elapsed: f32,
}

impl EnemyController {
    pub fn new(id: AgentId, config: EnemyConfig) -> Self {
        let decision = DecisionClock::new(config.decision_interval);
        let attack_cooldown = Cooldown::new(config.attack_cooldown);
        let alert_cooldown = Cooldown::new(config.alert_cooldown);
        let wander_pause = Cooldown::new(config.wander_pause);
        let stalk_update = Cooldown::new(config.stalk_update_interval);
        Self {
            id,
            config,
            state: EnemyState::Idle,
            last_position: Vec3::ZERO,
            decision,
            attack_cooldown,
            alert_cooldown,
            wander_pause,
            wander_target: None,
            stalk_update,
            stalk_angle: 0.0,
            stalk_elapsed: 0.0,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    /// Position observed on the most recent tick; used for pack-alert range
    /// checks between ticks.
    pub fn position(&self) -> Vec3 {
        self.last_position
    }

    /// Advance the agent by one frame. Returns a pack alert when this tick
    /// escalated out of Wander.
    pub fn tick<R: Rng>(
        &mut self,
        delta: f32,
        perception: &Perception<'_>,
        nav: &mut dyn Navigator,
        player_health: &mut dyn PlayerHealth,
        rng: &mut R,
    ) -> Option<PackAlert> {
        self.last_position = perception.position;
        self.attack_cooldown.tick(delta);
        self.alert_cooldown.tick(delta);
        self.wander_pause.tick(delta);
        self.stalk_update.tick(delta);

        let Some(player) = perception.player else {
            // Fatal-soft: without a player reference the agent sits idle.
            warn!(agent = self.id.0, "player reference unavailable, enemy idles");
            nav.stop(self.id);
            return None;
        };

        let mut alert = None;
        if self.decision.tick(delta) {
            let next = self.decide(
                perception.position,
                player,
                perception.threat_light,
                perception.zones,
            );
            alert = self.transition(next, perception.position);
        }
        if self.state == EnemyState::Stalk {
            self.stalk_elapsed += delta;
        }

        match self.state {
            EnemyState::Idle => nav.stop(self.id),
            EnemyState::Wander => self.wander(perception, nav, rng),
            EnemyState::Stalk => self.stalk(perception, player, nav, rng),
            EnemyState::Approach => self.approach(perception, player, nav),
            EnemyState::Chase => self.chase(perception, player, nav, player_health),
            EnemyState::Retreat => self.retreat(perception, player, nav),
        }
        alert
    }

    /// Priority-ordered state selection.
    fn decide(
        &self,
        position: Vec3,
        player: Vec3,
        threat_light: bool,
        zones: &[ProtectiveZone],
    ) -> EnemyState {
        let cfg = &self.config;
        let dist = position.distance(player);
        let chasing = self.state == EnemyState::Chase;
        let player_protected = zone::any_contains(zones, player);
        let self_excluded = zone::any_within_margin(zones, position, cfg.zone_exclusion);

        // Light-triggered retreat; suppressed while committed to a chase.
        if threat_light && dist <= cfg.detection_range && !chasing {
            return EnemyState::Retreat;
        }
        // Drifted into a zone's exclusion margin.
        if self_excluded && !chasing {
            return EnemyState::Retreat;
        }
        if player_protected && dist <= cfg.detection_range {
            return if chasing {
                // Keep pressing at the zone edge unless already too close.
                if self_excluded {
                    EnemyState::Retreat
                } else {
                    EnemyState::Chase
                }
            } else {
                EnemyState::Wander
            };
        }
        // Sticky chase: only range loss drops it (zone cases handled above).
        if chasing {
            return if dist <= cfg.detection_range {
                EnemyState::Chase
            } else {
                EnemyState::Wander
            };
        }
        if dist <= cfg.attack_distance && !threat_light && !player_protected {
            return EnemyState::Chase;
        }
        if dist <= cfg.detection_range && !threat_light && !player_protected {
            let stalkable = cfg.stalking_enabled
                && dist > 1.5 * cfg.attack_distance
                && (self.state != EnemyState::Stalk || self.stalk_elapsed < cfg.stalk_duration);
            return if stalkable {
                EnemyState::Stalk
            } else {
                EnemyState::Approach
            };
        }
        EnemyState::Wander
    }

    fn transition(&mut self, next: EnemyState, position: Vec3) -> Option<PackAlert> {
        if next == self.state {
            return None;
        }
        let prev = self.state;
        self.state = next;
        match next {
            EnemyState::Stalk => self.stalk_elapsed = 0.0,
            EnemyState::Wander => self.wander_target = None,
            _ => {}
        }

        let escalated = matches!(
            next,
            EnemyState::Stalk | EnemyState::Approach | EnemyState::Chase
        );
        if prev == EnemyState::Wander && escalated && self.alert_cooldown.try_fire() {
            return Some(PackAlert {
                from: self.id,
                origin: position,
            });
        }
        None
    }

    fn wander<R: Rng>(
        &mut self,
        p: &Perception<'_>,
        nav: &mut dyn Navigator,
        rng: &mut R,
    ) {
        let cfg = &self.config;
        if let Some(target) = self.wander_target {
            if p.position.distance(target) > ARRIVE_EPS {
                return; // still walking, the order stands
            }
            self.wander_target = None;
            self.wander_pause.arm();
            nav.stop(self.id);
            return;
        }
        if !self.wander_pause.ready() {
            return;
        }
        for _ in 0..POINT_TRIES {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = rng.gen_range(cfg.min_travel_distance..cfg.wander_radius);
            let candidate =
                p.position + Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist);
            if zone::any_contains(p.zones, candidate) {
                continue;
            }
            let Some(point) = nav.nearest_reachable(candidate, cfg.wander_radius) else {
                continue;
            };
            if zone::any_contains(p.zones, point)
                || point.distance(p.position) < cfg.min_travel_distance
            {
                continue;
            }
            self.wander_target = Some(point);
            nav.set_destination(self.id, point, cfg.wander_speed);
            return;
        }
        nav.stop(self.id);
    }

    fn stalk<R: Rng>(
        &mut self,
        p: &Perception<'_>,
        player: Vec3,
        nav: &mut dyn Navigator,
        rng: &mut R,
    ) {
        let cfg = &self.config;
        if !self.stalk_update.ready() {
            return;
        }
        self.stalk_update.arm();
        for _ in 0..POINT_TRIES {
            // Randomized turn keeps the circling unpredictable.
            self.stalk_angle += rng.gen_range(STALK_TURN_MIN..STALK_TURN_MAX);
            let offset =
                Vec3::new(self.stalk_angle.cos(), 0.0, self.stalk_angle.sin()) * cfg.stalk_radius;
            let candidate = player + offset;
            if zone::any_contains(p.zones, candidate) {
                continue;
            }
            let Some(point) = nav.nearest_reachable(candidate, cfg.stalk_radius) else {
                continue;
            };
            if zone::any_contains(p.zones, point) {
                continue;
            }
            nav.set_destination(self.id, point, cfg.stalk_speed);
            return;
        }
        nav.stop(self.id);
    }

    fn approach(&mut self, p: &Perception<'_>, player: Vec3, nav: &mut dyn Navigator) {
        let cfg = &self.config;
        if zone::any_contains(p.zones, player) {
            nav.stop(self.id);
            return;
        }
        if p.position.distance(player) <= cfg.attack_reach {
            nav.stop(self.id);
            return;
        }
        if nav.path_crosses_zone(p.position, player, p.zones) {
            nav.stop(self.id);
            return;
        }
        nav.set_destination(self.id, player, cfg.approach_speed);
    }

    fn chase(
        &mut self,
        p: &Perception<'_>,
        player: Vec3,
        nav: &mut dyn Navigator,
        player_health: &mut dyn PlayerHealth,
    ) {
        let cfg = &self.config;
        if p.position.distance(player) <= cfg.attack_reach {
            nav.stop(self.id);
            self.try_attack(player_health);
            return;
        }
        if zone::any_within_margin(p.zones, p.position, cfg.zone_exclusion) {
            // Holds at the zone edge instead of pressing in.
            nav.stop(self.id);
            return;
        }
        nav.set_destination(self.id, player, cfg.chase_speed);
    }

    fn retreat(&mut self, p: &Perception<'_>, player: Vec3, nav: &mut dyn Navigator) {
        let cfg = &self.config;
        let mut repulsion = Vec3::ZERO;
        for zone in p.zones {
            if zone.within_margin(p.position, cfg.zone_exclusion) {
                repulsion += (p.position - zone.center).normalize_or_zero();
            }
        }
        if p.threat_light && p.position.distance(player) < cfg.safe_distance {
            repulsion += (p.position - player).normalize_or_zero();
        }
        let direction = repulsion.normalize_or_zero();
        if direction == Vec3::ZERO {
            nav.stop(self.id);
            return;
        }
        nav.set_destination(
            self.id,
            p.position + direction * cfg.retreat_step,
            cfg.retreat_speed,
        );
    }

    /// Cooldown-gated attack; only the first attempt per window lands.
    fn try_attack(&mut self, player_health: &mut dyn PlayerHealth) -> bool {
        if self.attack_cooldown.try_fire() {
            player_health.take_damage(self.config.attack_damage);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct FakeNav {
        destinations: Vec<(AgentId, Vec3, f32)>,
        stops: Vec<AgentId>,
        unreachable: bool,
    }

    impl Navigator for FakeNav {
        fn nearest_reachable(&self, point: Vec3, _radius: f32) -> Option<Vec3> {
            (!self.unreachable).then_some(point)
        }

        fn path_crosses_zone(&self, from: Vec3, to: Vec3, zones: &[ProtectiveZone]) -> bool {
            (0..=10).any(|i| {
                let t = i as f32 / 10.0;
                zone::any_contains(zones, from.lerp(to, t))
            })
        }

        fn set_destination(&mut self, agent: AgentId, target: Vec3, speed: f32) {
            self.destinations.push((agent, target, speed));
        }

        fn stop(&mut self, agent: AgentId) {
            self.stops.push(agent);
        }
    }

    #[derive(Default)]
    struct FakeHealth {
        hits: Vec<f32>,
    }

    impl PlayerHealth for FakeHealth {
        fn take_damage(&mut self, amount: f32) {
            self.hits.push(amount);
        }
    }

    fn test_config() -> EnemyConfig {
        EnemyConfig {
            detection_range: 100.0,
            attack_distance: 9.0,
            ..EnemyConfig::default()
        }
    }

    fn controller() -> EnemyController {
        EnemyController::new(AgentId(1), test_config())
    }

    struct Harness {
        agent: EnemyController,
        nav: FakeNav,
        health: FakeHealth,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                agent: controller(),
                nav: FakeNav::default(),
                health: FakeHealth::default(),
                rng: StdRng::seed_from_u64(7),
            }
        }

        /// One full decision interval in a single frame.
        fn step(
            &mut self,
            position: Vec3,
            player: Option<Vec3>,
            threat_light: bool,
            zones: &[ProtectiveZone],
        ) -> Option<PackAlert> {
            let p = Perception {
                position,
                player,
                threat_light,
                zones,
            };
            self.agent
                .tick(0.2, &p, &mut self.nav, &mut self.health, &mut self.rng)
        }
    }

    fn far_player() -> Option<Vec3> {
        Some(Vec3::new(500.0, 0.0, 0.0))
    }

    #[test]
    fn test_idle_becomes_wander_when_nothing_nearby() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, far_player(), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Wander);
    }

    #[test]
    fn test_wander_to_chase_inside_attack_distance() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, far_player(), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Wander);

        // Player at distance 5 with attack distance 9: straight to Chase.
        h.step(Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Chase);
    }

    #[test]
    fn test_detection_without_proximity_stalks_first() {
        let mut h = Harness::new();
        // Distance 40 is past 1.5x attack distance but inside detection.
        h.step(Vec3::ZERO, Some(Vec3::new(40.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Stalk);
    }

    #[test]
    fn test_close_detection_approaches() {
        let mut h = Harness::new();
        // Distance 12 is under 1.5 x 9 = 13.5, so stalking is skipped.
        h.step(Vec3::ZERO, Some(Vec3::new(12.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Approach);
        let (_, target, speed) = *h.nav.destinations.last().unwrap();
        assert_eq!(target, Vec3::new(12.0, 0.0, 0.0));
        assert_eq!(speed, h.agent.config().approach_speed);
    }

    #[test]
    fn test_stalk_times_out_into_approach() {
        let mut h = Harness::new();
        h.agent.config.stalk_duration = 0.3;
        let player = Some(Vec3::new(40.0, 0.0, 0.0));
        h.step(Vec3::ZERO, player, false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Stalk);
        h.step(Vec3::ZERO, player, false, &[]);
        h.step(Vec3::ZERO, player, false, &[]);
        h.step(Vec3::ZERO, player, false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Approach);
    }

    #[test]
    fn test_stalk_orbits_at_stalk_radius() {
        let mut h = Harness::new();
        let player = Vec3::new(40.0, 0.0, 0.0);
        h.step(Vec3::ZERO, Some(player), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Stalk);
        let (_, target, speed) = *h.nav.destinations.last().unwrap();
        let radius = h.agent.config().stalk_radius;
        assert!((target.distance(player) - radius).abs() < 1e-3);
        assert_eq!(speed, h.agent.config().stalk_speed);
    }

    #[test]
    fn test_light_forces_retreat_when_not_chasing() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, Some(Vec3::new(40.0, 0.0, 0.0)), true, &[]);
        assert_eq!(h.agent.state(), EnemyState::Retreat);
    }

    #[test]
    fn test_chase_is_sticky_against_light() {
        let mut h = Harness::new();
        let player = Some(Vec3::new(5.0, 0.0, 0.0));
        h.step(Vec3::ZERO, far_player(), false, &[]);
        h.step(Vec3::ZERO, player, false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Chase);

        // The light alone cannot interrupt an active chase.
        h.step(Vec3::ZERO, player, true, &[]);
        assert_eq!(h.agent.state(), EnemyState::Chase);
    }

    #[test]
    fn test_chase_drops_to_wander_past_detection_range() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, far_player(), false, &[]);
        h.step(Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Chase);

        h.step(Vec3::ZERO, Some(Vec3::new(150.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Wander);
    }

    #[test]
    fn test_protected_player_abandons_pursuit() {
        let mut h = Harness::new();
        let player = Vec3::new(20.0, 0.0, 0.0);
        let zones = [ProtectiveZone::new(player, 5.0)];
        h.step(Vec3::ZERO, Some(player), false, &zones);
        assert_eq!(h.agent.state(), EnemyState::Wander);
    }

    #[test]
    fn test_zone_margin_violation_retreats() {
        let mut h = Harness::new();
        // Zone edge at x=2, exclusion margin 6: position 0 violates it.
        let zones = [ProtectiveZone::new(Vec3::new(4.0, 0.0, 0.0), 2.0)];
        h.step(Vec3::ZERO, far_player(), false, &zones);
        assert_eq!(h.agent.state(), EnemyState::Retreat);
    }

    #[test]
    fn test_retreat_moves_away_from_zone_and_player() {
        let mut h = Harness::new();
        let zones = [ProtectiveZone::new(Vec3::new(4.0, 0.0, 0.0), 2.0)];
        let player = Some(Vec3::new(10.0, 0.0, 0.0));
        h.step(Vec3::ZERO, player, true, &zones);
        assert_eq!(h.agent.state(), EnemyState::Retreat);

        let (_, target, speed) = *h.nav.destinations.last().unwrap();
        assert!(target.x < 0.0, "repulsion should point away from both");
        assert_eq!(speed, h.agent.config().retreat_speed);
        let step = h.agent.config().retreat_step;
        assert!((target.length() - step).abs() < 1e-3);
    }

    #[test]
    fn test_retreat_with_no_repulsion_halts() {
        let mut h = Harness::new();
        // Light drives the retreat but the player is beyond safe distance
        // and no zone is near, so the repulsion sum is zero.
        h.step(Vec3::ZERO, Some(Vec3::new(30.0, 0.0, 0.0)), true, &[]);
        assert_eq!(h.agent.state(), EnemyState::Retreat);
        assert!(!h.nav.stops.is_empty());
        assert!(h.nav.destinations.is_empty());
    }

    #[test]
    fn test_attack_gated_by_cooldown() {
        let mut h = Harness::new();
        let player = Some(Vec3::new(1.0, 0.0, 0.0));
        h.step(Vec3::ZERO, far_player(), false, &[]);
        h.step(Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Chase);

        // In reach: first attempt lands, the rest wait out the cooldown.
        h.step(Vec3::ZERO, player, false, &[]);
        assert_eq!(h.health.hits.len(), 1);
        for _ in 0..8 {
            h.step(Vec3::ZERO, player, false, &[]);
        }
        assert_eq!(h.health.hits.len(), 1);
        // 10 x 0.2s ticks exceed the 2s window.
        h.step(Vec3::ZERO, player, false, &[]);
        h.step(Vec3::ZERO, player, false, &[]);
        assert_eq!(h.health.hits.len(), 2);
        assert_eq!(h.health.hits[0], h.agent.config().attack_damage);
    }

    #[test]
    fn test_approach_aborts_when_path_crosses_zone() {
        let mut h = Harness::new();
        let player = Vec3::new(12.0, 0.0, 0.0);
        // Zone sits between agent and player but outside the exclusion
        // margin and not covering either endpoint's decision checks.
        let zones = [ProtectiveZone::new(Vec3::new(8.0, 0.0, 30.0), 2.0)];
        h.step(Vec3::ZERO, Some(player), false, &zones);
        assert_eq!(h.agent.state(), EnemyState::Approach);
        assert!(!h.nav.destinations.is_empty());

        // Move the zone onto the path: the approach halts.
        h.nav.destinations.clear();
        h.nav.stops.clear();
        let blocking = [ProtectiveZone::new(Vec3::new(8.0, 0.0, 1.0), 1.5)];
        let before = h.agent.state();
        h.step(Vec3::ZERO, Some(player), false, &blocking);
        assert_eq!(before, EnemyState::Approach);
        assert!(h.nav.destinations.is_empty());
        assert!(!h.nav.stops.is_empty());
    }

    #[test]
    fn test_wander_rejects_zone_points_and_short_hops() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, far_player(), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Wander);
        let cfg = h.agent.config();
        let (min_travel, radius) = (cfg.min_travel_distance, cfg.wander_radius);
        for _ in 0..20 {
            h.step(Vec3::ZERO, far_player(), false, &[]);
        }
        for (_, target, speed) in &h.nav.destinations {
            let hop = target.length();
            assert!(hop >= min_travel && hop <= radius);
            assert_eq!(*speed, h.agent.config().wander_speed);
        }
    }

    #[test]
    fn test_wander_halts_without_pathing_surface() {
        let mut h = Harness::new();
        h.nav.unreachable = true;
        h.step(Vec3::ZERO, far_player(), false, &[]);
        assert!(h.nav.destinations.is_empty());
        assert!(!h.nav.stops.is_empty());
    }

    #[test]
    fn test_missing_player_idles_without_panic() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, None, false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Idle);
        assert!(!h.nav.stops.is_empty());
        assert!(h.nav.destinations.is_empty());
    }

    #[test]
    fn test_alert_fires_once_per_cooldown() {
        let mut h = Harness::new();
        h.step(Vec3::ZERO, far_player(), false, &[]);
        let alert = h.step(Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)), false, &[]);
        let alert = alert.expect("escalating out of Wander should alert");
        assert_eq!(alert.from, AgentId(1));
        assert_eq!(alert.origin, Vec3::ZERO);

        // Back to Wander and escalate again inside the cooldown: silent.
        h.step(Vec3::ZERO, far_player(), false, &[]);
        assert_eq!(h.agent.state(), EnemyState::Wander);
        let again = h.step(Vec3::ZERO, Some(Vec3::new(5.0, 0.0, 0.0)), false, &[]);
        assert!(again.is_none());
    }
}
