//! Pack alerts — aggression spreads to nearby wandering agents

use glam::Vec3;
use rand::Rng;

use crate::controller::{EnemyController, EnemyState};
use crate::spatial::{AgentId, Navigator};

/// Broadcast sent when an agent escalates out of Wander.
#[derive(Debug, Clone, Copy)]
pub struct PackAlert {
    pub from: AgentId,
    /// Where the alerting agent was when it escalated.
    pub origin: Vec3,
}

/// Roster of active agents. Membership changes only on spawn and despawn;
/// delivery iterates a snapshot so a broadcast never observes a
/// mid-iteration membership change.
#[derive(Debug, Default)]
pub struct PackRoster {
    members: Vec<AgentId>,
}

impl PackRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: AgentId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    pub fn unregister(&mut self, id: AgentId) {
        self.members.retain(|member| *member != id);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Deliver `alert` to every registered agent still in Wander or Idle and
    /// within its communication range of the origin. Receivers get a
    /// movement order toward a scattered point near the origin at boosted
    /// approach speed; their own state machines are left untouched.
    pub fn broadcast<R: Rng>(
        &self,
        alert: PackAlert,
        agents: &[EnemyController],
        nav: &mut dyn Navigator,
        rng: &mut R,
    ) {
        let snapshot: Vec<AgentId> = self.members.clone();
        for id in snapshot {
            if id == alert.from {
                continue;
            }
            let Some(agent) = agents.iter().find(|agent| agent.id() == id) else {
                continue;
            };
            if !matches!(agent.state(), EnemyState::Wander | EnemyState::Idle) {
                continue;
            }
            let cfg = agent.config();
            if agent.position().distance(alert.origin) > cfg.comm_range {
                continue;
            }
            let scatter = if cfg.alert_scatter > 0.0 {
                Vec3::new(
                    rng.gen_range(-cfg.alert_scatter..cfg.alert_scatter),
                    0.0,
                    rng.gen_range(-cfg.alert_scatter..cfg.alert_scatter),
                )
            } else {
                Vec3::ZERO
            };
            nav.set_destination(
                id,
                alert.origin + scatter,
                cfg.approach_speed * cfg.alert_speed_boost,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyConfig;
    use crate::controller::Perception;
    use crate::spatial::PlayerHealth;
    use crate::zone::ProtectiveZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct FakeNav {
        destinations: Vec<(AgentId, Vec3, f32)>,
    }

    impl Navigator for FakeNav {
        fn nearest_reachable(&self, point: Vec3, _radius: f32) -> Option<Vec3> {
            Some(point)
        }
        fn path_crosses_zone(
            &self,
            _from: Vec3,
            _to: Vec3,
            _zones: &[ProtectiveZone],
        ) -> bool {
            false
        }
        fn set_destination(&mut self, agent: AgentId, target: Vec3, speed: f32) {
            self.destinations.push((agent, target, speed));
        }
        fn stop(&mut self, _agent: AgentId) {}
    }

    struct NoHealth;
    impl PlayerHealth for NoHealth {
        fn take_damage(&mut self, _amount: f32) {}
    }

    /// Tick an agent once so it settles into Wander at `position`.
    fn wandering_agent(id: u64, position: Vec3) -> EnemyController {
        let mut agent = EnemyController::new(AgentId(id), EnemyConfig::default());
        let mut nav = FakeNav::default();
        let mut rng = StdRng::seed_from_u64(id);
        let p = Perception {
            position,
            player: Some(Vec3::new(999.0, 0.0, 0.0)),
            threat_light: false,
            zones: &[],
        };
        agent.tick(0.2, &p, &mut nav, &mut NoHealth, &mut rng);
        assert_eq!(agent.state(), EnemyState::Wander);
        agent
    }

    #[test]
    fn test_roster_membership() {
        let mut roster = PackRoster::new();
        roster.register(AgentId(1));
        roster.register(AgentId(1));
        roster.register(AgentId(2));
        assert_eq!(roster.len(), 2);
        roster.unregister(AgentId(1));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_broadcast_orders_nearby_wanderers() {
        let mut roster = PackRoster::new();
        for id in 1..=3 {
            roster.register(AgentId(id));
        }
        let agents = vec![
            wandering_agent(1, Vec3::ZERO),
            wandering_agent(2, Vec3::new(10.0, 0.0, 0.0)),
            // Out of communication range.
            wandering_agent(3, Vec3::new(200.0, 0.0, 0.0)),
        ];
        let alert = PackAlert {
            from: AgentId(1),
            origin: Vec3::ZERO,
        };

        let mut nav = FakeNav::default();
        let mut rng = StdRng::seed_from_u64(3);
        roster.broadcast(alert, &agents, &mut nav, &mut rng);

        // Only agent 2 responds: 1 sent the alert, 3 is too far.
        assert_eq!(nav.destinations.len(), 1);
        let (id, target, speed) = nav.destinations[0];
        assert_eq!(id, AgentId(2));
        let cfg = EnemyConfig::default();
        assert!(target.distance(alert.origin) <= cfg.alert_scatter * 2.0);
        assert_eq!(speed, cfg.approach_speed * cfg.alert_speed_boost);
    }

    #[test]
    fn test_broadcast_skips_committed_agents() {
        let mut roster = PackRoster::new();
        roster.register(AgentId(1));
        roster.register(AgentId(2));

        // Agent 2 is already chasing; the alert must not disturb it.
        let mut chasing = EnemyController::new(AgentId(2), EnemyConfig::default());
        let mut nav = FakeNav::default();
        let mut rng = StdRng::seed_from_u64(9);
        let p = Perception {
            position: Vec3::new(5.0, 0.0, 0.0),
            player: Some(Vec3::new(8.0, 0.0, 0.0)),
            threat_light: false,
            zones: &[],
        };
        chasing.tick(0.2, &p, &mut nav, &mut NoHealth, &mut rng);
        assert_eq!(chasing.state(), EnemyState::Chase);

        let agents = vec![wandering_agent(1, Vec3::ZERO), chasing];
        let alert = PackAlert {
            from: AgentId(1),
            origin: Vec3::ZERO,
        };
        let mut nav = FakeNav::default();
        roster.broadcast(alert, &agents, &mut nav, &mut rng);
        assert!(nav.destinations.is_empty());
    }
}
