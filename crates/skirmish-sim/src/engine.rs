//! Simulation engine: the per-frame scheduler of the skirmish.
//!
//! `SimulationEngine` owns the hecs world, the projectile pool and all match
//! state, applies queued commands at tick boundaries, runs every system in a
//! fixed order and produces `GameStateSnapshot`s. Completely headless.

use std::collections::{HashMap, VecDeque};

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use skirmish_core::commands::SimCommand;
use skirmish_core::components::{Base, Dying, Effects, PlayerState, StuckState};
use skirmish_core::constants::{BASE_SHIELD_COOLDOWN_SECS, BASE_SHIELD_DURATION_SECS, QUEUE_CANCEL_FADE_SECS};
use skirmish_core::defs::{base_def, structure_def, unit_def};
use skirmish_core::enums::{GamePhase, QueueMode, StructureKind, UnitKind, Winner};
use skirmish_core::events::SimEvent;
use skirmish_core::map::MapLayout;
use skirmish_core::orders::{CommandNode, CommandQueue};
use skirmish_core::state::{GameStateSnapshot, ImpactMarker};
use skirmish_core::types::{PlayerId, Position, SimTime, UnitId};
use skirmish_core::Vec2;

use crate::abilities::{self, AbilityRegistry};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::map::CollisionQuery;
use crate::projectile::ProjectileSet;
use crate::systems;
use crate::systems::command_queue::UnitsFrame;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    winner: Option<Winner>,
    config: SimConfig,
    map: MapLayout,
    players: Vec<PlayerState>,
    rng: ChaCha8Rng,
    registry: AbilityRegistry,
    projectiles: ProjectileSet,
    impacts: Vec<ImpactMarker>,
    events: Vec<SimEvent>,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<Entity>,
    next_unit_id: u32,
    units: HashMap<UnitId, Entity>,
}

impl SimulationEngine {
    /// Create an engine on the default map.
    pub fn new(config: SimConfig) -> Self {
        Self::with_map(config, MapLayout::default())
    }

    pub fn with_map(config: SimConfig, map: MapLayout) -> Self {
        let players = (0..config.player_count)
            .map(|i| PlayerState {
                id: PlayerId(i),
                photons: config.starting_photons,
                enabled_units: config.enabled_units.clone(),
            })
            .collect();
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            winner: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: AbilityRegistry::standard(),
            projectiles: ProjectileSet::new(config.projectile_pool_prewarm, config.projectile_pool_max),
            impacts: Vec::new(),
            events: Vec::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            next_unit_id: 0,
            units: HashMap::new(),
            players,
            map,
            config,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, advance one frame of `dt` seconds and return
    /// the resulting snapshot. Events emitted since the last tick are
    /// drained into it.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        self.process_commands();
        self.update_game(dt);
        self.snapshot()
    }

    /// Build a snapshot without advancing. Drains pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            self.time.elapsed_secs,
            SnapshotInputs {
                time: self.time,
                phase: self.phase,
                winner: self.winner,
                players: &self.players,
                projectiles: self.projectiles.active(),
                impacts: &self.impacts,
                events,
            },
        )
    }

    /// Run one frame of the simulation. Does nothing unless the match is
    /// active. The pass order is fixed: combat sees this frame's movement,
    /// and death handling sees this frame's damage.
    pub fn update_game(&mut self, dt: f64) {
        if self.phase != GamePhase::Active {
            return;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        let dt_f32 = dt as f32;

        // 1. Elapsed time
        self.time.advance(dt);
        let now = self.time.elapsed_secs;
        // 2. Income
        systems::economy::run(&self.world, &mut self.players, self.config.base_income_per_sec, dt);
        // 3. Command queues and steering
        let frame = UnitsFrame {
            now,
            dt: dt_f32,
            map: &self.map,
            promotion_enabled: self.config.promotion_enabled,
        };
        let casts = systems::command_queue::run(&mut self.world, &frame, &mut self.events);
        // 4. Abilities: casts from arrived nodes, then timed effects
        abilities::cast(
            &mut self.world,
            &self.registry,
            casts,
            now,
            &mut self.events,
            &mut self.impacts,
        );
        abilities::advance(
            &mut self.world,
            now,
            dt_f32,
            &mut self.projectiles,
            &mut self.events,
            &mut self.impacts,
        );
        // 5. Bases (shield expiry, repositioning, laser)
        systems::bases::run(&mut self.world, now, dt_f32, &self.map, &mut self.events);
        // 6. Structures
        systems::structures::run(&mut self.world, dt_f32, &mut self.projectiles, &mut self.events);
        // 7. Projectiles
        systems::projectiles::run(
            &mut self.world,
            now,
            dt_f32,
            &mut self.projectiles,
            &mut self.events,
            &mut self.impacts,
        );
        // 8. Combat
        systems::combat::run(
            &mut self.world,
            now,
            &mut self.projectiles,
            &mut self.events,
            &mut self.impacts,
        );
        // 9. Dead units (death effects fire once)
        systems::cleanup::remove_dead(&mut self.world, now, &mut self.events);
        // 10. Finished death animations
        systems::cleanup::despawn_finished(&mut self.world, now, &mut self.despawn_buffer);
        let world = &self.world;
        self.units.retain(|_, entity| world.contains(*entity));
        // 11. Effect timers
        systems::effects::run(&mut self.world, now, dt_f32, &mut self.impacts);
        // 12. Time limit
        if let Some(winner) = systems::victory::check_time_limit(&self.world, now, self.config.time_limit_secs) {
            self.end_match(winner);
            return;
        }
        // 13. Victory
        if let Some(winner) = systems::victory::check_victory(&self.world) {
            self.end_match(winner);
        }
    }

    // --- Requests ---

    /// Spawn a unit. Returns false, changing nothing, if the player cannot
    /// afford it or the kind is disabled.
    pub fn spawn_unit(&mut self, owner: PlayerId, kind: UnitKind, spawn_pos: Vec2, rally_pos: Vec2) -> bool {
        self.try_spawn_unit(owner, kind, spawn_pos, rally_pos).is_ok()
    }

    pub fn try_spawn_unit(
        &mut self,
        owner: PlayerId,
        kind: UnitKind,
        spawn_pos: Vec2,
        rally_pos: Vec2,
    ) -> Result<UnitId, SimError> {
        if self.phase == GamePhase::Ended {
            return Err(SimError::MatchNotActive);
        }
        if !spawn_pos.is_finite() || !rally_pos.is_finite() {
            return Err(SimError::InvalidCommand("non-finite spawn or rally point"));
        }
        let player = self
            .players
            .get(owner.index())
            .ok_or(SimError::UnknownPlayer(owner))?;
        if !player.enabled_units.contains(&kind) {
            return Err(SimError::UnitTypeDisabled(kind));
        }
        let cost = unit_def(kind).cost;
        if player.photons < cost {
            return Err(SimError::InsufficientPhotons {
                cost,
                available: player.photons,
            });
        }

        self.players[owner.index()].photons -= cost;
        let id = self.allocate_unit_id();
        let entity = world_setup::spawn_unit(
            &mut self.world,
            &mut self.rng,
            self.map.bounds,
            id,
            kind,
            owner,
            spawn_pos,
            rally_pos,
        );
        self.units.insert(id, entity);
        self.events.push(SimEvent::UnitSpawned { unit: id, kind, owner });
        debug!(unit = id.0, ?kind, owner = owner.0, "unit spawned");
        Ok(id)
    }

    /// Give a unit a command node. Returns false if the unit is unknown or
    /// dying, or the node has non-finite coordinates. Points are clamped
    /// into the map.
    pub fn issue_command(&mut self, unit: UnitId, node: CommandNode, mode: QueueMode) -> bool {
        self.try_issue_command(unit, node, mode).is_ok()
    }

    pub fn try_issue_command(&mut self, unit: UnitId, node: CommandNode, mode: QueueMode) -> Result<(), SimError> {
        let entity = self.live_unit(unit)?;
        if !node.is_finite() {
            return Err(SimError::InvalidCommand("non-finite coordinates"));
        }
        let node = node.clamped(self.map.bounds.min, self.map.bounds.max);

        let (pos, queue, stuck, effects) = self
            .world
            .query_one_mut::<(&Position, &mut CommandQueue, &mut StuckState, &mut Effects)>(entity)
            .map_err(|_| SimError::UnknownUnit(unit))?;
        // A player order supersedes the walk back from a sidestep.
        effects.avoidance = None;
        match mode {
            QueueMode::Replace => {
                queue.replace(node);
                stuck.anchor = pos.0;
                stuck.timer = 0.0;
                stuck.jittering = false;
            }
            QueueMode::Append => queue.push(node),
        }
        Ok(())
    }

    /// Start the timed fade of a unit's queue.
    pub fn cancel_queue(&mut self, unit: UnitId) -> bool {
        let Ok(entity) = self.live_unit(unit) else {
            return false;
        };
        let now = self.time.elapsed_secs;
        match self.world.get::<&mut CommandQueue>(entity) {
            Ok(mut queue) => {
                queue.begin_cancel(now, QUEUE_CANCEL_FADE_SECS);
                true
            }
            Err(_) => false,
        }
    }

    /// Build a structure. Returns false, changing nothing, if the player
    /// cannot afford it or the spot is blocked.
    pub fn build_structure(&mut self, owner: PlayerId, kind: StructureKind, position: Vec2) -> bool {
        self.try_build_structure(owner, kind, position).is_ok()
    }

    pub fn try_build_structure(&mut self, owner: PlayerId, kind: StructureKind, position: Vec2) -> Result<Entity, SimError> {
        if self.phase == GamePhase::Ended {
            return Err(SimError::MatchNotActive);
        }
        let player = self
            .players
            .get(owner.index())
            .ok_or(SimError::UnknownPlayer(owner))?;
        let def = structure_def(kind);
        if !position.is_finite() {
            return Err(SimError::InvalidCommand("non-finite build position"));
        }
        let position = self.map.bounds.clamp(position);
        if self.map.point_blocked(position, def.radius) {
            return Err(SimError::InvalidCommand("build position is blocked"));
        }
        if player.photons < def.cost {
            return Err(SimError::InsufficientPhotons {
                cost: def.cost,
                available: player.photons,
            });
        }

        self.players[owner.index()].photons -= def.cost;
        let entity = world_setup::spawn_structure(&mut self.world, owner, kind, position);
        self.events.push(SimEvent::StructureBuilt { owner, kind, position });
        debug!(?kind, owner = owner.0, "structure built");
        Ok(entity)
    }

    /// Raise the player's base shield if it is off cooldown.
    pub fn raise_base_shield(&mut self, owner: PlayerId) -> Result<(), SimError> {
        let now = self.time.elapsed_secs;
        let entity = self.base_entity(owner).ok_or(SimError::UnknownPlayer(owner))?;
        let mut base = self
            .world
            .get::<&mut Base>(entity)
            .map_err(|_| SimError::UnknownPlayer(owner))?;
        if base.hp <= 0.0 {
            return Err(SimError::InvalidCommand("base is destroyed"));
        }
        if now < base.shield_ready_at {
            return Err(SimError::InvalidCommand("base shield is on cooldown"));
        }
        base.shield_until = Some(now + BASE_SHIELD_DURATION_SECS);
        base.shield_ready_at = now + BASE_SHIELD_COOLDOWN_SECS;
        Ok(())
    }

    /// Send a mobile base toward a point.
    pub fn move_base(&mut self, owner: PlayerId, target: Vec2) -> Result<(), SimError> {
        if !target.is_finite() {
            return Err(SimError::InvalidCommand("non-finite base target"));
        }
        let target = systems::bases::clamp_move_target(&self.map, target);
        let entity = self.base_entity(owner).ok_or(SimError::UnknownPlayer(owner))?;
        let mut base = self
            .world
            .get::<&mut Base>(entity)
            .map_err(|_| SimError::UnknownPlayer(owner))?;
        if !base_def(base.kind).mobile {
            return Err(SimError::InvalidCommand("base is not mobile"));
        }
        base.move_target = Some(target);
        Ok(())
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn map(&self) -> &MapLayout {
        &self.map
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn photons(&self, owner: PlayerId) -> Option<f64> {
        self.players.get(owner.index()).map(|p| p.photons)
    }

    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    /// Entity of a spawned unit, including one that is still dying.
    pub fn unit_entity(&self, unit: UnitId) -> Option<Entity> {
        self.units.get(&unit).copied()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn base_entity(&self, owner: PlayerId) -> Option<Entity> {
        self.world
            .query::<&Base>()
            .iter()
            .find(|(_, base)| base.owner == owner)
            .map(|(entity, _)| entity)
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a unit exactly at `position` with a prepared queue, bypassing
    /// the economy.
    #[cfg(test)]
    pub fn spawn_unit_at(&mut self, kind: UnitKind, owner: PlayerId, position: Vec2, queue: CommandQueue) -> (UnitId, Entity) {
        let id = self.allocate_unit_id();
        let entity = world_setup::spawn_unit_at(&mut self.world, id, kind, owner, position, queue);
        self.units.insert(id, entity);
        (id, entity)
    }

    // --- Internals ---

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    fn live_unit(&self, unit: UnitId) -> Result<Entity, SimError> {
        self.units
            .get(&unit)
            .copied()
            .filter(|e| self.world.get::<&Dying>(*e).is_err())
            .ok_or(SimError::UnknownUnit(unit))
    }

    fn end_match(&mut self, winner: Winner) {
        self.phase = GamePhase::Ended;
        self.winner = Some(winner);
        self.events.push(SimEvent::MatchEnded { winner });
        info!(?winner, elapsed = self.time.elapsed_secs, "match ended");
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command. Rejected requests are dropped with a debug
    /// log; they never stop the frame.
    fn handle_command(&mut self, command: SimCommand) {
        let result = match command {
            SimCommand::StartMatch => {
                if self.phase == GamePhase::Setup {
                    world_setup::setup_match(&mut self.world, &self.map, self.config.player_count);
                    self.phase = GamePhase::Active;
                    self.events.push(SimEvent::MatchStarted);
                    info!(players = self.config.player_count, seed = self.config.seed, "match started");
                }
                Ok(())
            }
            SimCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
                Ok(())
            }
            SimCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
                Ok(())
            }
            SimCommand::Spawn {
                owner,
                kind,
                spawn_pos,
                rally_pos,
            } => self.try_spawn_unit(owner, kind, spawn_pos, rally_pos).map(|_| ()),
            SimCommand::Order { unit, node, mode } => self.try_issue_command(unit, node, mode),
            SimCommand::CancelQueue { unit } => {
                if self.cancel_queue(unit) {
                    Ok(())
                } else {
                    Err(SimError::UnknownUnit(unit))
                }
            }
            SimCommand::MoveBase { owner, target } => self.move_base(owner, target),
            SimCommand::RaiseBaseShield { owner } => self.raise_base_shield(owner),
            SimCommand::Build { owner, kind, position } => {
                self.try_build_structure(owner, kind, position).map(|_| ())
            }
        };
        if let Err(error) = result {
            debug!(%error, "command rejected");
        }
    }

    /// Reset a unit's ability cooldown, for scripted scenarios.
    #[cfg(test)]
    pub fn ready_ability(&mut self, unit: UnitId) {
        if let Some(entity) = self.unit_entity(unit) {
            if let Ok(mut combat) = self.world.get::<&mut skirmish_core::components::CombatState>(entity) {
                combat.ability_cooldown = 0.0;
            }
        }
    }
}
