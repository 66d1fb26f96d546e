//! Duskfall - headless driver for the survival game core
//!
//! Wires the inventory engine, recipe book, and a small pack of enemies
//! together over a flat test world, then runs a short fixed-timestep
//! simulation, logging inventory events and behavior state changes. The
//! engine and controllers are constructed and owned here; nothing in the
//! core is a global.

mod settings;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use duskfall_ai::{
    AgentId, EnemyController, EnemyState, Navigator, PackRoster, Perception, PlayerHealth,
    ProtectiveZone,
};
use duskfall_items::{
    InventoryEngine, InventoryEvent, ItemCatalog, ItemKindId, ItemStack, RecipeBook, SpawnRef,
    WorldSpawner,
};

use settings::GameSettings;

const WOOD: ItemKindId = ItemKindId(1);
const STONE: ItemKindId = ItemKindId(2);
const FIBER: ItemKindId = ItemKindId(3);

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let settings = GameSettings::load();

    let catalog = Arc::new(
        ItemCatalog::load_from_json(include_str!("../assets/items.json"))
            .context("loading item definitions")?,
    );
    let book = RecipeBook::load_from_json(include_str!("../assets/recipes.json"))
        .context("loading recipe definitions")?;
    info!(kinds = catalog.len(), recipes = book.len(), "content loaded");

    let mut engine = InventoryEngine::new(catalog);
    inventory_demo(&mut engine, &book, &settings);
    enemy_demo(&settings);
    Ok(())
}

/// Gather, craft, transfer, drop, and finally dump a chest.
fn inventory_demo(engine: &mut InventoryEngine, book: &RecipeBook, settings: &GameSettings) {
    let player = engine.create_inventory(settings.gameplay.inventory_capacity);
    let chest = engine.create_inventory(settings.gameplay.chest_capacity);
    let mut spawner = LogSpawner;

    for _ in 0..6 {
        engine.add_item(player, WOOD);
    }
    for _ in 0..2 {
        engine.add_item(player, STONE);
    }
    engine.add_item(player, FIBER);
    log_events(engine);

    // Torch from wood + fiber, axe from wood + stone.
    if !engine.try_craft(player, &[0, 2], 3, book) {
        warn!("torch recipe did not match");
    }
    if !engine.try_craft(player, &[0, 1], 4, book) {
        warn!("axe recipe did not match");
    }
    log_events(engine);

    // Stash the remaining wood in the chest, then drop the torch.
    engine.try_move_item(player, 0, chest, 0);
    engine.drop_item(player, 3, &mut spawner);
    log_events(engine);

    // The chest is destroyed and spills its contents.
    engine.dump_container(chest, &mut spawner);
    log_events(engine);
}

/// A pack of three enemies against a drifting player who eventually
/// raises a torch near a protective zone.
fn enemy_demo(settings: &GameSettings) {
    let mut nav = FlatNavigator::default();
    let mut player = SimPlayer { hp: 100.0 };
    let mut rng = StdRng::seed_from_u64(42);
    let zones = [ProtectiveZone::new(Vec3::new(-30.0, 0.0, 0.0), 8.0)];

    let mut agents = Vec::new();
    let mut roster = PackRoster::new();
    let starts = [
        Vec3::new(20.0, 0.0, 5.0),
        Vec3::new(28.0, 0.0, -10.0),
        Vec3::new(45.0, 0.0, 12.0),
    ];
    for (i, start) in starts.into_iter().enumerate() {
        let id = AgentId(i as u64 + 1);
        nav.spawn(id, start);
        roster.register(id);
        agents.push(EnemyController::new(id, settings.enemies.clone()));
    }

    let delta = 1.0 / settings.gameplay.tick_rate;
    let frames = (settings.gameplay.sim_seconds * settings.gameplay.tick_rate) as u32;
    let mut prev_states: Vec<EnemyState> = agents.iter().map(|a| a.state()).collect();

    for frame in 0..frames {
        let t = frame as f32 * delta;
        // The player drifts toward the protective zone and lights a torch
        // for the second half of the run.
        let player_pos = Vec3::new(15.0 - t * 1.5, 0.0, 0.0);
        let threat_light = t > settings.gameplay.sim_seconds * 0.5;

        let mut alerts = Vec::new();
        for agent in &mut agents {
            let perception = Perception {
                position: nav.position(agent.id()),
                player: Some(player_pos),
                threat_light,
                zones: &zones,
            };
            if let Some(alert) = agent.tick(delta, &perception, &mut nav, &mut player, &mut rng)
            {
                alerts.push(alert);
            }
        }
        for alert in alerts {
            info!(from = alert.from.0, "pack alert raised");
            roster.broadcast(alert, &agents, &mut nav, &mut rng);
        }
        nav.advance(delta);

        for (agent, prev) in agents.iter().zip(prev_states.iter_mut()) {
            if agent.state() != *prev {
                let (from, to) = (*prev, agent.state());
                info!(agent = agent.id().0, ?from, ?to, "state change");
                *prev = to;
            }
        }
    }
    info!(hp = player.hp, "simulation finished");
}

fn log_events(engine: &mut InventoryEngine) {
    for event in engine.drain_events() {
        match event {
            InventoryEvent::ItemAdded {
                inventory,
                kind,
                slot,
            } => info!(inventory = inventory.0, kind = kind.0, slot, "item added"),
            InventoryEvent::ItemRemoved {
                inventory,
                kind,
                slot,
            } => info!(inventory = inventory.0, kind = kind.0, slot, "item removed"),
            InventoryEvent::ItemMoved { from, to } => info!(
                from_inventory = from.0 .0,
                from_slot = from.1,
                to_inventory = to.0 .0,
                to_slot = to.1,
                "item moved"
            ),
            InventoryEvent::ItemSwapped { a, b } => info!(
                a_inventory = a.0 .0,
                a_slot = a.1,
                b_inventory = b.0 .0,
                b_slot = b.1,
                "item swapped"
            ),
        }
    }
}

/// World-spawn collaborator that just narrates what would appear.
struct LogSpawner;

impl WorldSpawner for LogSpawner {
    fn spawn_item(&mut self, spawn: &SpawnRef, stack: ItemStack) {
        info!(asset = %spawn.0, amount = stack.amount, "spawned dropped item");
    }

    fn spawn_chest(&mut self, contents: Vec<ItemStack>) {
        info!(stacks = contents.len(), "spawned loot chest");
    }
}

/// Player health collaborator for the headless run.
struct SimPlayer {
    hp: f32,
}

impl PlayerHealth for SimPlayer {
    fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
        info!(hp = self.hp, "player took {amount} damage");
    }
}

/// Flat test world: agents walk straight lines toward their ordered target.
#[derive(Default)]
struct FlatNavigator {
    bodies: HashMap<AgentId, Body>,
}

struct Body {
    position: Vec3,
    target: Option<Vec3>,
    speed: f32,
}

impl FlatNavigator {
    fn spawn(&mut self, id: AgentId, position: Vec3) {
        self.bodies.insert(
            id,
            Body {
                position,
                target: None,
                speed: 0.0,
            },
        );
    }

    fn position(&self, id: AgentId) -> Vec3 {
        self.bodies
            .get(&id)
            .map(|body| body.position)
            .unwrap_or(Vec3::ZERO)
    }

    /// Integrate all movement orders over `delta` seconds.
    fn advance(&mut self, delta: f32) {
        for body in self.bodies.values_mut() {
            let Some(target) = body.target else { continue };
            let to_target = target - body.position;
            let step = body.speed * delta;
            if to_target.length() <= step {
                body.position = target;
                body.target = None;
            } else {
                body.position += to_target.normalize_or_zero() * step;
            }
        }
    }
}

impl Navigator for FlatNavigator {
    fn nearest_reachable(&self, point: Vec3, _radius: f32) -> Option<Vec3> {
        // The whole plane is walkable at ground level.
        Some(Vec3::new(point.x, 0.0, point.z))
    }

    fn path_crosses_zone(&self, from: Vec3, to: Vec3, zones: &[ProtectiveZone]) -> bool {
        (0..=16).any(|i| {
            let t = i as f32 / 16.0;
            let point = from.lerp(to, t);
            zones.iter().any(|zone| zone.contains(point))
        })
    }

    fn set_destination(&mut self, agent: AgentId, target: Vec3, speed: f32) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.target = Some(target);
            body.speed = speed;
        }
    }

    fn stop(&mut self, agent: AgentId) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.target = None;
        }
    }
}
