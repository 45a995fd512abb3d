//! Cross-system tests for the engine, the command queue, combat and
//! abilities.

use hecs::World;

use skirmish_core::commands::SimCommand;
use skirmish_core::components::*;
use skirmish_core::defs::unit_def;
use skirmish_core::enums::*;
use skirmish_core::events::SimEvent;
use skirmish_core::map::{MapLayout, Obstacle, Shape};
use skirmish_core::orders::{CommandNode, CommandQueue};
use skirmish_core::state::GameStateSnapshot;
use skirmish_core::types::{PlayerId, Position, UnitId};
use skirmish_core::Vec2;

use crate::config::SimConfig;
use crate::damage;
use crate::engine::SimulationEngine;
use crate::error::SimError;
use crate::projectile::{Launch, ProjectileSet, TargetRef};
use crate::systems::projectiles;
use crate::world_setup;

const DT: f64 = 0.05;

fn started(config: SimConfig) -> SimulationEngine {
    started_on(config, MapLayout::default())
}

fn started_on(config: SimConfig, map: MapLayout) -> SimulationEngine {
    let mut engine = SimulationEngine::with_map(config, map);
    engine.queue_command(SimCommand::StartMatch);
    engine.tick(0.0);
    assert_eq!(engine.phase(), GamePhase::Active);
    engine
}

fn queue_of(node: CommandNode) -> CommandQueue {
    let mut queue = CommandQueue::new();
    queue.push(node);
    queue
}

fn position(engine: &SimulationEngine, unit: UnitId) -> Vec2 {
    let entity = engine.unit_entity(unit).expect("unit exists");
    engine.world().get::<&Position>(entity).expect("has position").0
}

fn queue(engine: &SimulationEngine, unit: UnitId) -> CommandQueue {
    let entity = engine.unit_entity(unit).expect("unit exists");
    (*engine.world().get::<&CommandQueue>(entity).expect("has queue")).clone()
}

fn effects(engine: &SimulationEngine, unit: UnitId) -> Effects {
    let entity = engine.unit_entity(unit).expect("unit exists");
    *engine.world().get::<&Effects>(entity).expect("has effects")
}

fn base_mut(engine: &mut SimulationEngine, owner: PlayerId) -> hecs::RefMut<'_, Base> {
    let entity = engine.base_entity(owner).expect("base exists");
    engine.world_mut().get::<&mut Base>(entity).expect("is a base")
}

// ---- Determinism ----

fn skirmish_commands() -> Vec<SimCommand> {
    vec![
        SimCommand::StartMatch,
        SimCommand::Spawn {
            owner: PlayerId(0),
            kind: UnitKind::Rifleman,
            spawn_pos: Vec2::new(200.0, 450.0),
            rally_pos: Vec2::new(700.0, 450.0),
        },
        SimCommand::Spawn {
            owner: PlayerId(0),
            kind: UnitKind::Grunt,
            spawn_pos: Vec2::new(200.0, 450.0),
            rally_pos: Vec2::new(700.0, 470.0),
        },
        SimCommand::Spawn {
            owner: PlayerId(1),
            kind: UnitKind::Grunt,
            spawn_pos: Vec2::new(1400.0, 450.0),
            rally_pos: Vec2::new(800.0, 450.0),
        },
        SimCommand::Spawn {
            owner: PlayerId(1),
            kind: UnitKind::Rifleman,
            spawn_pos: Vec2::new(1400.0, 450.0),
            rally_pos: Vec2::new(820.0, 430.0),
        },
    ]
}

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);
    engine_a.queue_commands(skirmish_commands());
    engine_b.queue_commands(skirmish_commands());

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_spawn_scatter_depends_on_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    engine_a.queue_commands(skirmish_commands());
    engine_b.queue_commands(skirmish_commands());

    let snap_a = engine_a.tick(DT);
    let snap_b = engine_b.tick(DT);
    assert_eq!(snap_a.units.len(), 4);
    let diverged = snap_a
        .units
        .iter()
        .zip(&snap_b.units)
        .any(|(a, b)| a.position != b.position);
    assert!(diverged, "Different seeds should scatter spawns differently");
}

// ---- Spawning and economy ----

#[test]
fn test_scenario_c_unaffordable_spawn_changes_nothing() {
    let mut engine = started(SimConfig {
        starting_photons: 40.0,
        base_income_per_sec: 0.0,
        ..Default::default()
    });
    assert_eq!(unit_def(UnitKind::Rifleman).cost, 50.0);

    let ok = engine.spawn_unit(PlayerId(0), UnitKind::Rifleman, Vec2::new(200.0, 450.0), Vec2::new(300.0, 450.0));
    assert!(!ok);
    assert_eq!(engine.photons(PlayerId(0)), Some(40.0));
    assert_eq!(engine.unit_count(), 0);

    let err = engine
        .try_spawn_unit(PlayerId(0), UnitKind::Rifleman, Vec2::new(200.0, 450.0), Vec2::new(300.0, 450.0))
        .unwrap_err();
    assert_eq!(
        err,
        SimError::InsufficientPhotons {
            cost: 50.0,
            available: 40.0
        }
    );
}

#[test]
fn test_spawn_rejects_disabled_kind_and_unknown_player() {
    let mut engine = started(SimConfig {
        enabled_units: vec![UnitKind::Grunt],
        ..Default::default()
    });
    let at = Vec2::new(200.0, 450.0);
    assert_eq!(
        engine.try_spawn_unit(PlayerId(0), UnitKind::Sniper, at, at),
        Err(SimError::UnitTypeDisabled(UnitKind::Sniper))
    );
    assert_eq!(
        engine.try_spawn_unit(PlayerId(5), UnitKind::Grunt, at, at),
        Err(SimError::UnknownPlayer(PlayerId(5)))
    );
    assert!(engine.spawn_unit(PlayerId(0), UnitKind::Grunt, at, at));
    assert_eq!(engine.unit_count(), 1);
}

#[test]
fn test_spawn_debits_and_clamps_rally_point() {
    let mut engine = started(SimConfig {
        base_income_per_sec: 0.0,
        ..Default::default()
    });
    let before = engine.photons(PlayerId(0)).unwrap();
    let id = engine
        .try_spawn_unit(PlayerId(0), UnitKind::Grunt, Vec2::new(200.0, 450.0), Vec2::new(-500.0, 5000.0))
        .unwrap();
    assert_eq!(engine.photons(PlayerId(0)), Some(before - unit_def(UnitKind::Grunt).cost));

    let bounds = engine.map().bounds;
    let target = queue(&engine, id).head().and_then(|n| n.destination()).unwrap();
    assert!(bounds.contains(target), "rally point {target} outside the map");
    assert!(bounds.contains(position(&engine, id)));
}

#[test]
fn test_income_includes_generator_bonus() {
    let mut engine = started(SimConfig {
        starting_photons: 200.0,
        base_income_per_sec: 10.0,
        ..Default::default()
    });
    assert!(engine.build_structure(PlayerId(0), StructureKind::Generator, Vec2::new(300.0, 300.0)));
    assert_eq!(engine.photons(PlayerId(0)), Some(80.0));

    for _ in 0..10 {
        engine.tick(0.1);
    }
    let p0 = engine.photons(PlayerId(0)).unwrap();
    let p1 = engine.photons(PlayerId(1)).unwrap();
    assert!((p0 - (80.0 + 14.0)).abs() < 1e-6, "got {p0}");
    assert!((p1 - 210.0).abs() < 1e-6, "got {p1}");
}

#[test]
fn test_build_on_obstacle_is_rejected() {
    let map = MapLayout {
        obstacles: vec![Obstacle {
            kind: ObstacleKind::Static,
            shape: Shape::Circle {
                center: Vec2::new(500.0, 500.0),
                radius: 30.0,
            },
        }],
        ..MapLayout::default()
    };
    let mut engine = started_on(SimConfig::default(), map);
    let before = engine.photons(PlayerId(0));
    assert!(!engine.build_structure(PlayerId(0), StructureKind::Turret, Vec2::new(505.0, 500.0)));
    assert_eq!(engine.photons(PlayerId(0)), before);
}

// ---- Command queue ----

#[test]
fn test_idle_units_do_not_drift() {
    let mut engine = started(SimConfig::default());
    let spots = [
        (UnitKind::Grunt, PlayerId(0), Vec2::new(600.0, 300.0)),
        (UnitKind::Rifleman, PlayerId(0), Vec2::new(606.0, 302.0)),
        (UnitKind::Guardian, PlayerId(0), Vec2::new(598.0, 310.0)),
        (UnitKind::Grunt, PlayerId(1), Vec2::new(1000.0, 700.0)),
    ];
    let ids: Vec<(UnitId, Vec2)> = spots
        .iter()
        .map(|&(kind, owner, at)| (engine.spawn_unit_at(kind, owner, at, CommandQueue::new()).0, at))
        .collect();

    for _ in 0..40 {
        engine.tick(DT);
    }
    for (id, at) in ids {
        assert_eq!(position(&engine, id), at, "idle unit {id:?} drifted");
    }
}

#[test]
fn test_passing_ally_sidesteps_idle_unit_through_its_queue() {
    let mut engine = started(SimConfig::default());
    let origin = Vec2::new(350.0, 300.0);
    let (idle, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), origin, CommandQueue::new());
    engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::Move {
            target: Vec2::new(420.0, 300.0),
        }),
    );

    let mut sidestepped = false;
    for _ in 0..200 {
        let was_idle = queue(&engine, idle).is_empty();
        let before = position(&engine, idle);
        engine.tick(DT);
        if was_idle {
            assert_eq!(position(&engine, idle), before, "unit with an empty queue moved");
        }
        sidestepped |= !queue(&engine, idle).is_empty();
    }
    assert!(sidestepped, "the idle unit was never asked to make way");
    assert!(queue(&engine, idle).is_empty());
    assert!(effects(&engine, idle).avoidance.is_none());
    assert!(position(&engine, idle).distance(origin) <= 4.0, "did not walk back");
}

#[test]
fn test_promotion_credit_weights_queued_moves() {
    let mut engine = started(SimConfig {
        promotion_enabled: true,
        ..Default::default()
    });
    let start = Vec2::new(300.0, 300.0);
    let mut orders = queue_of(CommandNode::Move {
        target: Vec2::new(500.0, 300.0),
    });
    orders.push(CommandNode::Move {
        target: Vec2::new(500.0, 500.0),
    });
    let (id, entity) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), start, orders);

    engine.tick(DT);
    let moved = position(&engine, id).distance(start);
    assert!(moved > 0.0);
    let combat = *engine.world().get::<&CombatState>(entity).unwrap();
    assert!((combat.promotion_credit - moved * 1.1).abs() < 1e-3, "credit {}", combat.promotion_credit);
    assert_eq!(combat.damage_multiplier, 1.0);

    engine.world_mut().get::<&mut CombatState>(entity).unwrap().promotion_credit = 1499.0;
    let before = position(&engine, id);
    engine.tick(DT);
    let moved = position(&engine, id).distance(before);
    let combat = *engine.world().get::<&CombatState>(entity).unwrap();
    assert!((combat.damage_multiplier - 1.1).abs() < 1e-5);
    assert!((combat.promotion_credit - (1499.0 + moved * 1.1 - 1500.0)).abs() < 1e-2);
}

#[test]
fn test_promotion_disabled_earns_nothing() {
    let mut engine = started(SimConfig::default());
    let (_, entity) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::Move {
            target: Vec2::new(500.0, 300.0),
        }),
    );
    for _ in 0..20 {
        engine.tick(DT);
    }
    let combat = *engine.world().get::<&CombatState>(entity).unwrap();
    assert_eq!(combat.promotion_credit, 0.0);
    assert_eq!(combat.damage_multiplier, 1.0);
}

#[test]
fn test_move_to_own_position_completes_in_one_tick() {
    let mut engine = started(SimConfig::default());
    let at = Vec2::new(300.0, 300.0);
    let (id, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), at, queue_of(CommandNode::Move { target: at }));

    engine.tick(DT);
    assert!(queue(&engine, id).is_empty());
    assert_eq!(position(&engine, id), at);
}

#[test]
fn test_move_reaches_target() {
    let mut engine = started(SimConfig::default());
    let target = Vec2::new(400.0, 300.0);
    let (id, _) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::Move { target }),
    );
    for _ in 0..60 {
        engine.tick(DT);
    }
    assert!(queue(&engine, id).is_empty());
    assert!(position(&engine, id).distance(target) <= 4.0);
}

#[test]
fn test_scenario_d_patrol_flips_direction() {
    let mut engine = started(SimConfig::default());
    let a = Vec2::new(340.0, 300.0);
    let b = Vec2::new(260.0, 300.0);
    let (id, _) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::Patrol { target: a, return_to: b }),
    );

    let flipped = CommandNode::Patrol { target: b, return_to: a };
    let mut reached = false;
    for _ in 0..100 {
        engine.tick(DT);
        if queue(&engine, id).head() == Some(&flipped) {
            reached = true;
            break;
        }
    }
    assert!(reached, "patrol never flipped");
    assert!(position(&engine, id).distance(a) <= 4.0);
    assert_eq!(queue(&engine, id).len(), 1);
}

#[test]
fn test_follow_path_completes() {
    let mut engine = started(SimConfig::default());
    let path = [
        Vec2::new(360.0, 300.0),
        Vec2::new(360.0, 360.0),
        Vec2::new(300.0, 360.0),
    ];
    let (id, _) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::FollowPath {
            path: path.iter().copied().collect(),
        }),
    );
    let mut done = false;
    for _ in 0..200 {
        engine.tick(DT);
        if queue(&engine, id).is_empty() {
            done = true;
            break;
        }
    }
    assert!(done, "path was never completed");
    let end = position(&engine, id);
    assert!(end.distance(path[2]) <= 4.0, "ended at {end}");
}

#[test]
fn test_append_keeps_fifo_order() {
    let mut engine = started(SimConfig::default());
    let (id, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), Vec2::new(300.0, 300.0), CommandQueue::new());
    let first = CommandNode::Move {
        target: Vec2::new(330.0, 300.0),
    };
    let second = CommandNode::Move {
        target: Vec2::new(330.0, 330.0),
    };
    assert!(engine.issue_command(id, first.clone(), QueueMode::Append));
    assert!(engine.issue_command(id, second.clone(), QueueMode::Append));
    assert_eq!(queue(&engine, id).head(), Some(&first));

    for _ in 0..30 {
        engine.tick(DT);
        if queue(&engine, id).len() == 1 {
            break;
        }
    }
    assert_eq!(queue(&engine, id).head(), Some(&second));
}

#[test]
fn test_non_finite_order_is_rejected() {
    let mut engine = started(SimConfig::default());
    let (id, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), Vec2::new(300.0, 300.0), CommandQueue::new());
    let err = engine
        .try_issue_command(
            id,
            CommandNode::Move {
                target: Vec2::new(f32::NAN, 1.0),
            },
            QueueMode::Replace,
        )
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidCommand(_)));
    assert!(queue(&engine, id).is_empty());
    assert_eq!(
        engine.try_issue_command(UnitId(999), CommandNode::Move { target: Vec2::ZERO }, QueueMode::Replace),
        Err(SimError::UnknownUnit(UnitId(999)))
    );
}

#[test]
fn test_scenario_e_stuck_unit_fades_queue_out() {
    let wall = |min: (f32, f32), max: (f32, f32)| Obstacle {
        kind: ObstacleKind::Static,
        shape: Shape::Rect {
            min: Vec2::new(min.0, min.1),
            max: Vec2::new(max.0, max.1),
        },
    };
    let map = MapLayout {
        obstacles: vec![
            wall((150.0, 170.0), (170.0, 230.0)),
            wall((190.0, 170.0), (210.0, 230.0)),
            wall((150.0, 170.0), (210.0, 190.0)),
            wall((150.0, 210.0), (210.0, 230.0)),
        ],
        ..MapLayout::default()
    };
    let mut engine = started_on(SimConfig::default(), map);
    let start = Vec2::new(180.0, 200.0);
    let (id, entity) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        start,
        queue_of(CommandNode::Move {
            target: Vec2::new(400.0, 200.0),
        }),
    );

    let mut cancelled_at_frame = None;
    for frame in 0..100 {
        let snap = engine.tick(DT);
        if snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::QueueCancelled { unit } if *unit == id))
        {
            cancelled_at_frame = Some(frame);
            break;
        }
    }
    let frame = cancelled_at_frame.expect("stuck unit was never cancelled");
    assert!(frame >= 55, "cancelled too early, frame {frame}");

    let stuck = *engine.world().get::<&StuckState>(entity).unwrap();
    assert_eq!(stuck.timer, 0.0);
    assert!(queue(&engine, id).is_cancelling(), "queue fades, it is not cleared at once");
    assert!(!queue(&engine, id).is_empty());

    for _ in 0..12 {
        engine.tick(DT);
    }
    assert!(queue(&engine, id).is_empty());
    assert!(position(&engine, id).distance(start) < 3.0);
}

#[test]
fn test_corrupt_unit_does_not_block_others() {
    let mut engine = started(SimConfig::default());
    let (bad, bad_entity) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 300.0),
        queue_of(CommandNode::Move {
            target: Vec2::new(350.0, 300.0),
        }),
    );
    let (sick, sick_entity) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 400.0),
        queue_of(CommandNode::Move {
            target: Vec2::new(350.0, 400.0),
        }),
    );
    let (good, _) = engine.spawn_unit_at(
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(300.0, 500.0),
        queue_of(CommandNode::Move {
            target: Vec2::new(350.0, 500.0),
        }),
    );
    engine.world_mut().get::<&mut Position>(bad_entity).unwrap().0 = Vec2::new(f32::NAN, 300.0);
    engine.world_mut().get::<&mut Health>(sick_entity).unwrap().current = f32::NAN;

    for _ in 0..10 {
        engine.tick(DT);
    }
    assert!(position(&engine, good).x > 310.0, "healthy unit must keep moving");
    assert!(!position(&engine, bad).is_finite());
    assert_eq!(queue(&engine, bad).len(), 1);
    assert_eq!(queue(&engine, sick).len(), 1);
}

// ---- Combat ----

#[test]
fn test_scenario_a_ranged_hit_on_armored_unit() {
    let mut world = World::new();
    let guardian = world_setup::spawn_unit_at(
        &mut world,
        UnitId(0),
        UnitKind::Guardian,
        PlayerId(1),
        Vec2::new(100.0, 100.0),
        CommandQueue::new(),
    );
    assert_eq!(unit_def(UnitKind::Guardian).hp, 100.0);
    assert_eq!(unit_def(UnitKind::Guardian).armor, 20.0);

    let mut events = Vec::new();
    damage::apply_hit(&mut world, TargetRef::Unit(guardian), 50.0, DamageKind::Ranged, 1.0, &mut events);
    let hp = world.get::<&Health>(guardian).unwrap().current;
    assert!((hp - 58.333).abs() < 0.01, "got {hp}");
}

#[test]
fn test_scenario_b_melee_on_base_under_dome() {
    let mut world = World::new();
    let base = world_setup::spawn_base(&mut world, PlayerId(0), BaseKind::Citadel, Vec2::new(100.0, 100.0));
    {
        let mut b = world.get::<&mut Base>(base).unwrap();
        b.hp = 500.0;
        b.max_hp = 500.0;
    }
    let ally = world_setup::spawn_unit_at(
        &mut world,
        UnitId(0),
        UnitKind::Guardian,
        PlayerId(0),
        Vec2::new(130.0, 100.0),
        CommandQueue::new(),
    );
    world.get::<&mut Effects>(ally).unwrap().shield_dome = Some(ShieldDome {
        radius: 60.0,
        ranged_multiplier: 0.5,
        melee_multiplier: 0.5,
        until: 100.0,
    });

    let mut events = Vec::new();
    for _ in 0..3 {
        damage::apply_hit(&mut world, TargetRef::Base(base), 40.0, DamageKind::Melee, 1.0, &mut events);
    }
    assert_eq!(world.get::<&Base>(base).unwrap().hp, 440.0);
}

#[test]
fn test_expired_dome_and_enemy_dome_do_not_protect() {
    let mut world = World::new();
    let target = world_setup::spawn_unit_at(
        &mut world,
        UnitId(0),
        UnitKind::Grunt,
        PlayerId(0),
        Vec2::new(100.0, 100.0),
        CommandQueue::new(),
    );
    let enemy = world_setup::spawn_unit_at(
        &mut world,
        UnitId(1),
        UnitKind::Guardian,
        PlayerId(1),
        Vec2::new(110.0, 100.0),
        CommandQueue::new(),
    );
    world.get::<&mut Effects>(target).unwrap().shield_dome = Some(ShieldDome {
        radius: 60.0,
        ranged_multiplier: 0.5,
        melee_multiplier: 0.5,
        until: 0.5,
    });
    world.get::<&mut Effects>(enemy).unwrap().shield_dome = Some(ShieldDome {
        radius: 60.0,
        ranged_multiplier: 0.1,
        melee_multiplier: 0.1,
        until: 100.0,
    });
    let mut events = Vec::new();
    let dealt = damage::apply_hit(&mut world, TargetRef::Unit(target), 10.0, DamageKind::Melee, 1.0, &mut events);
    assert_eq!(dealt, 10.0);
}

#[test]
fn test_base_shield_blocks_damage() {
    let mut engine = started(SimConfig::default());
    engine.raise_base_shield(PlayerId(0)).unwrap();
    assert!(engine.raise_base_shield(PlayerId(0)).is_err(), "shield is on cooldown");

    let base = engine.base_entity(PlayerId(0)).unwrap();
    let before = engine.world().get::<&Base>(base).unwrap().hp;
    let mut events = Vec::new();
    let dealt = damage::apply_hit(engine.world_mut(), TargetRef::Base(base), 100.0, DamageKind::Ranged, 0.0, &mut events);
    assert_eq!(dealt, 0.0);
    assert_eq!(engine.world().get::<&Base>(base).unwrap().hp, before);
    assert!(events.iter().any(|e| matches!(e, SimEvent::ShieldBlocked { .. })));
}

#[test]
fn test_projectile_falls_back_to_nearest_enemy() {
    let mut world = World::new();
    let victim = world_setup::spawn_unit_at(
        &mut world,
        UnitId(0),
        UnitKind::Grunt,
        PlayerId(1),
        Vec2::new(105.0, 100.0),
        CommandQueue::new(),
    );
    let mut set = ProjectileSet::new(2, 4);
    set.launch(Launch {
        from: Vec2::new(0.0, 100.0),
        target_pos: Vec2::new(100.0, 100.0),
        target: None,
        speed: 400.0,
        damage: 20.0,
        owner: PlayerId(0),
        kind: ProjectileKind::Standard,
    });
    let mut events = Vec::new();
    let mut impacts = Vec::new();
    for i in 1..=10 {
        projectiles::run(&mut world, i as f64 * 0.05, 0.05, &mut set, &mut events, &mut impacts);
    }
    assert!(set.active().is_empty());
    assert_eq!(set.pool().available(), 2);
    assert!(world.get::<&Health>(victim).unwrap().current < 90.0);
    assert!(events.iter().any(|e| matches!(e, SimEvent::ProjectileImpact { .. })));
}

#[test]
fn test_projectiles_reuse_pool_in_a_firefight() {
    let mut engine = started(SimConfig {
        projectile_pool_prewarm: 4,
        projectile_pool_max: 8,
        ..Default::default()
    });
    let (_, _) = engine.spawn_unit_at(UnitKind::Rifleman, PlayerId(0), Vec2::new(800.0, 400.0), CommandQueue::new());
    let (target, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(1), Vec2::new(800.0, 470.0), CommandQueue::new());

    let mut fired = 0;
    for _ in 0..400 {
        let snap = engine.tick(DT);
        fired += snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileFired { kind: ProjectileKind::Standard, .. }))
            .count();
    }
    assert!(fired >= 5, "only {fired} shots");
    assert_eq!(engine.projectiles().pool().constructed(), 4);
    assert!(engine.unit_entity(target).is_none(), "target should be dead and despawned");
}

#[test]
fn test_cloaked_units_are_not_auto_targeted() {
    let mut engine = started(SimConfig::default());
    let (shade, _) = engine.spawn_unit_at(UnitKind::Shade, PlayerId(1), Vec2::new(800.0, 470.0), CommandQueue::new());
    engine.spawn_unit_at(UnitKind::Rifleman, PlayerId(0), Vec2::new(800.0, 400.0), CommandQueue::new());
    assert!(effects(&engine, shade).cloaked);

    for _ in 0..40 {
        let snap = engine.tick(DT);
        assert!(!snap.events.iter().any(|e| matches!(e, SimEvent::ProjectileFired { .. })));
    }
}

#[test]
fn test_regular_attacks_ignore_flying_units() {
    let mut engine = started(SimConfig::default());
    let (drone, drone_entity) =
        engine.spawn_unit_at(UnitKind::Drone, PlayerId(1), Vec2::new(800.0, 460.0), CommandQueue::new());
    engine.spawn_unit_at(UnitKind::Rifleman, PlayerId(0), Vec2::new(800.0, 400.0), CommandQueue::new());

    for _ in 0..40 {
        let snap = engine.tick(DT);
        assert!(!snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::ProjectileFired { owner: PlayerId(0), .. })));
    }
    assert!(engine.unit_entity(drone).is_some());
    let hp = engine.world().get::<&Health>(drone_entity).unwrap().current;
    assert_eq!(hp, unit_def(UnitKind::Drone).hp);
}

#[test]
fn test_attack_move_fires_without_stopping() {
    let mut engine = started(SimConfig::default());
    let target = Vec2::new(900.0, 400.0);
    let order = CommandNode::AttackMove { target };
    let (rifleman, _) = engine.spawn_unit_at(UnitKind::Rifleman, PlayerId(0), Vec2::new(600.0, 400.0), queue_of(order.clone()));
    engine.spawn_unit_at(UnitKind::Grunt, PlayerId(1), Vec2::new(700.0, 470.0), CommandQueue::new());

    let mut shots = 0;
    let mut arrived = false;
    for _ in 0..200 {
        let before = position(&engine, rifleman);
        let snap = engine.tick(DT);
        let fired = snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileFired { owner: PlayerId(0), .. }))
            .count();
        let q = queue(&engine, rifleman);
        if q.is_empty() {
            arrived = true;
            break;
        }
        assert_eq!(q.head(), Some(&order), "attack-move was dropped early");
        if fired > 0 {
            shots += fired;
            assert!(position(&engine, rifleman).x > before.x, "stopped to fire");
        }
    }
    assert!(shots >= 1, "never fired while passing the enemy");
    assert!(arrived, "attack-move never completed");
    assert!(position(&engine, rifleman).distance(target) <= 4.0);
}

// ---- Death ----

#[test]
fn test_death_burst_fires_once_and_unit_despawns() {
    let mut engine = started(SimConfig::default());
    let (drone, drone_entity) = engine.spawn_unit_at(UnitKind::Drone, PlayerId(0), Vec2::new(800.0, 300.0), CommandQueue::new());
    let (grunt, _) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(1), Vec2::new(810.0, 300.0), CommandQueue::new());
    engine.world_mut().get::<&mut Health>(drone_entity).unwrap().current = 0.0;

    let mut deaths = 0;
    for _ in 0..30 {
        let snap = engine.tick(DT);
        deaths += snap
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::UnitDied { unit, .. } if *unit == drone))
            .count();
    }
    assert_eq!(deaths, 1);
    assert!(engine.unit_entity(drone).is_none());
    let entity = engine.unit_entity(grunt).unwrap();
    let hp = engine.world().get::<&Health>(entity).unwrap().current;
    assert!(hp <= 90.0 - 19.0, "burst should hurt the neighbor, hp {hp}");
}

#[test]
fn test_dying_unit_rejects_orders() {
    let mut engine = started(SimConfig::default());
    let (id, entity) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), Vec2::new(300.0, 300.0), CommandQueue::new());
    engine.world_mut().get::<&mut Health>(entity).unwrap().current = -5.0;
    engine.tick(DT);
    assert!(engine.world().get::<&Dying>(entity).is_ok());
    assert_eq!(
        engine.try_issue_command(id, CommandNode::Move { target: Vec2::ZERO }, QueueMode::Replace),
        Err(SimError::UnknownUnit(id))
    );
}

// ---- Abilities ----

fn combo_swings(snap: &GameStateSnapshot, id: UnitId) -> Vec<u8> {
    snap.events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ComboSwing { unit, swing } if *unit == id => Some(*swing),
            _ => None,
        })
        .collect()
}

fn casts(snap: &GameStateSnapshot, id: UnitId) -> usize {
    snap.events
        .iter()
        .filter(|e| matches!(e, SimEvent::AbilityCast { unit, .. } if *unit == id))
        .count()
}

#[test]
fn test_combo_swings_in_order_and_reset_gates_next_combo() {
    let mut engine = started(SimConfig::default());
    let at = Vec2::new(400.0, 300.0);
    let strike = CommandNode::Ability {
        position: at,
        direction: Some(Vec2::new(10.0, 0.0)),
    };
    let (id, _) = engine.spawn_unit_at(UnitKind::Swordsman, PlayerId(0), at, queue_of(strike.clone()));

    let mut swings = Vec::new();
    for _ in 0..30 {
        swings.extend(combo_swings(&engine.tick(DT), id));
    }
    assert_eq!(swings, vec![1, 2, 3]);

    // Still inside the post-combo reset pause.
    assert!(effects(&engine, id).sword_combo.is_some());
    engine.ready_ability(id);
    assert!(engine.issue_command(id, strike.clone(), QueueMode::Replace));
    let snap = engine.tick(DT);
    assert_eq!(casts(&snap, id), 0, "combo must not restart during reset");
    assert!(combo_swings(&snap, id).is_empty());
    assert!(queue(&engine, id).is_empty());

    for _ in 0..25 {
        engine.tick(DT);
    }
    assert!(effects(&engine, id).sword_combo.is_none());
    engine.ready_ability(id);
    assert!(engine.issue_command(id, strike, QueueMode::Replace));
    let snap = engine.tick(DT);
    assert_eq!(casts(&snap, id), 1);
    assert_eq!(combo_swings(&snap, id), vec![1]);
}

#[test]
fn test_stealth_strike_phases_are_inspectable() {
    let mut engine = started(SimConfig::default());
    let at = Vec2::new(400.0, 300.0);
    let (id, _) = engine.spawn_unit_at(
        UnitKind::Shade,
        PlayerId(0),
        at,
        queue_of(CommandNode::Ability {
            position: at,
            direction: Some(Vec2::new(60.0, 0.0)),
        }),
    );
    assert!(effects(&engine, id).cloaked);

    let snap = engine.tick(DT);
    assert_eq!(casts(&snap, id), 1);
    let fx = effects(&engine, id);
    assert!(!fx.cloaked, "cloak breaks on cast");
    assert!(fx.stealth_strike.is_some_and(|s| !s.knife_thrown));

    let mut knife_frame = None;
    for frame in 0..20 {
        let snap = engine.tick(DT);
        if snap.events.iter().any(|e| matches!(e, SimEvent::KnifeThrown { unit, .. } if *unit == id)) {
            knife_frame = Some(frame);
            assert!(snap
                .projectiles
                .iter()
                .any(|p| p.kind == ProjectileKind::Knife));
            break;
        }
    }
    assert!(knife_frame.is_some(), "knife never thrown");
    let fx = effects(&engine, id);
    assert!(!fx.cloaked);
    assert!(fx.stealth_strike.is_some_and(|s| s.knife_thrown));

    let mut recloaked = false;
    for _ in 0..30 {
        let snap = engine.tick(DT);
        if snap.events.iter().any(|e| matches!(e, SimEvent::Recloaked { unit } if *unit == id)) {
            recloaked = true;
            break;
        }
    }
    assert!(recloaked);
    let fx = effects(&engine, id);
    assert!(fx.cloaked);
    assert!(fx.stealth_strike.is_none());
}

#[test]
fn test_aimed_ability_without_direction_is_a_no_op() {
    let mut engine = started(SimConfig::default());
    let at = Vec2::new(400.0, 300.0);
    let (id, entity) = engine.spawn_unit_at(
        UnitKind::Rifleman,
        PlayerId(0),
        at,
        queue_of(CommandNode::Ability {
            position: at,
            direction: None,
        }),
    );
    let snap = engine.tick(DT);
    assert_eq!(casts(&snap, id), 0);
    assert!(queue(&engine, id).is_empty());
    let cooldown = engine.world().get::<&CombatState>(entity).unwrap().ability_cooldown;
    assert_eq!(cooldown, 0.0, "a no-op cast must not start the cooldown");
}

#[test]
fn test_heal_pulse_restores_allies_only() {
    let mut engine = started(SimConfig::default());
    let at = Vec2::new(400.0, 300.0);
    let (medic, _) = engine.spawn_unit_at(
        UnitKind::Medic,
        PlayerId(0),
        at,
        queue_of(CommandNode::Ability {
            position: at,
            direction: None,
        }),
    );
    let (_, ally) = engine.spawn_unit_at(UnitKind::Grunt, PlayerId(0), at + Vec2::new(20.0, 0.0), CommandQueue::new());
    engine.world_mut().get::<&mut Health>(ally).unwrap().current = 40.0;

    let snap = engine.tick(DT);
    assert_eq!(casts(&snap, medic), 1);
    let hp = engine.world().get::<&Health>(ally).unwrap().current;
    assert!(hp > 40.0 && hp <= 90.0, "got {hp}");
    assert!(effects(&engine, medic).heal_pulse.is_some());
}

// ---- Match lifecycle ----

#[test]
fn test_destroyed_base_ends_match() {
    let mut engine = started(SimConfig::default());
    base_mut(&mut engine, PlayerId(1)).hp = 0.0;
    let snap = engine.tick(DT);
    assert_eq!(engine.phase(), GamePhase::Ended);
    assert_eq!(engine.winner(), Some(Winner::Player(PlayerId(0))));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::MatchEnded { winner: Winner::Player(PlayerId(0)) })));

    let frozen = engine.time();
    engine.tick(DT);
    assert_eq!(engine.time().tick, frozen.tick, "ended matches do not advance");
}

#[test]
fn test_both_bases_falling_is_a_draw() {
    let mut engine = started(SimConfig::default());
    base_mut(&mut engine, PlayerId(0)).hp = 0.0;
    base_mut(&mut engine, PlayerId(1)).hp = 0.0;
    engine.tick(DT);
    assert_eq!(engine.winner(), Some(Winner::Draw));
}

#[test]
fn test_time_limit_picks_healthier_base() {
    let mut engine = started(SimConfig {
        time_limit_secs: 1.0,
        ..Default::default()
    });
    base_mut(&mut engine, PlayerId(0)).hp -= 100.0;
    for _ in 0..30 {
        engine.tick(DT);
    }
    assert_eq!(engine.phase(), GamePhase::Ended);
    assert_eq!(engine.winner(), Some(Winner::Player(PlayerId(1))));
}

#[test]
fn test_pause_freezes_time() {
    let mut engine = started(SimConfig::default());
    engine.tick(DT);
    engine.queue_command(SimCommand::Pause);
    let before = engine.time();
    for _ in 0..5 {
        engine.tick(DT);
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, before.tick);
    engine.queue_command(SimCommand::Resume);
    engine.tick(DT);
    assert_eq!(engine.time().tick, before.tick + 1);
}

#[test]
fn test_frame_delta_is_clamped() {
    let mut engine = started(SimConfig {
        max_frame_dt: 0.1,
        ..Default::default()
    });
    engine.tick(5.0);
    assert!((engine.time().elapsed_secs - 0.1).abs() < 1e-9);
    engine.tick(f64::NAN);
    assert!((engine.time().elapsed_secs - 0.1).abs() < 1e-9);
}

// ---- Snapshot ----

#[test]
fn test_snapshot_round_trips_and_drains_events() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands(skirmish_commands());
    let first = engine.tick(DT);
    assert!(first.events.iter().any(|e| matches!(e, SimEvent::MatchStarted)));
    assert_eq!(first.bases.len(), 2);
    assert_eq!(first.players.len(), 2);

    let mut ids: Vec<UnitId> = first.units.iter().map(|u| u.id).collect();
    let sorted = {
        let mut s = ids.clone();
        s.sort();
        s
    };
    assert_eq!(ids, sorted, "units are ordered by id");

    for _ in 0..20 {
        engine.tick(DT);
    }
    let snap = engine.tick(DT);
    assert!(!snap.events.iter().any(|e| matches!(e, SimEvent::MatchStarted)));

    let json = serde_json::to_string(&snap).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.units.len(), snap.units.len());
    ids = back.units.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 4);
}
