//! match-runner: headless scripted skirmish.
//!
//! Usage:
//!   match-runner --config sim.json --map map.json --frames 3600 --dt 0.016
//!
//! Both files are optional; missing fields fall back to defaults. Each
//! player sends a mixed wave toward the enemy base every few seconds while
//! they can afford it. The final summary is printed as JSON on stdout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use skirmish_core::commands::SimCommand;
use skirmish_core::enums::{GamePhase, QueueMode, UnitKind, Winner};
use skirmish_core::events::SimEvent;
use skirmish_core::map::MapLayout;
use skirmish_core::orders::CommandNode;
use skirmish_core::state::GameStateSnapshot;
use skirmish_core::types::PlayerId;
use skirmish_core::Vec2;
use skirmish_sim::{SimConfig, SimulationEngine};

const WAVE: [UnitKind; 4] = [UnitKind::Grunt, UnitKind::Rifleman, UnitKind::Swordsman, UnitKind::Medic];
const WAVE_INTERVAL_SECS: f64 = 5.0;

struct Args {
    config: Option<PathBuf>,
    map: Option<PathBuf>,
    frames: u64,
    dt: f64,
}

#[derive(Debug, Serialize)]
struct Summary {
    frames: u64,
    elapsed_secs: f64,
    phase: GamePhase,
    winner: Option<Winner>,
    photons: Vec<f64>,
    units_alive: Vec<usize>,
    base_hp: Vec<f32>,
    events: BTreeMap<&'static str, usize>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        print_usage();
        return;
    }
    let args = match parse_args(&args[1..]) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e:#}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "match-runner: headless skirmish simulation\n\
         \n\
           --config <path>  SimConfig JSON (optional)\n\
           --map <path>     MapLayout JSON (optional)\n\
           --frames <N>     Frames to simulate (default: 3600)\n\
           --dt <secs>      Frame delta in seconds (default: 0.016)\n\
         \n\
         Environment:\n\
         \n\
           RUST_LOG         Log filter (default: info)\n\
           LOG_FORMAT=json  Structured JSON logs\n"
    );
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args {
        config: None,
        map: None,
        frames: 3600,
        dt: 0.016,
    };
    let mut i = 0;
    while i < args.len() {
        let value = args
            .get(i + 1)
            .with_context(|| format!("missing value for {}", args[i]))?;
        match args[i].as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--map" => parsed.map = Some(PathBuf::from(value)),
            "--frames" => parsed.frames = value.parse().context("--frames must be an integer")?,
            "--dt" => parsed.dt = value.parse().context("--dt must be a number")?,
            other => bail!("unknown argument: {other}"),
        }
        i += 2;
    }
    if parsed.dt.is_nan() || parsed.dt <= 0.0 {
        bail!("--dt must be positive");
    }
    Ok(parsed)
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let config: SimConfig = load_json(args.config.as_deref())?;
    let map: MapLayout = load_json(args.map.as_deref())?;
    if map.bases.len() < config.player_count as usize {
        bail!(
            "map has {} base spawns but the config wants {} players",
            map.bases.len(),
            config.player_count
        );
    }
    let spawns: Vec<Vec2> = map.bases.iter().map(|b| b.position).collect();

    info!(seed = config.seed, frames = args.frames, dt = args.dt, "starting match");
    let mut engine = SimulationEngine::with_map(config, map);
    engine.queue_command(SimCommand::StartMatch);

    let mut events: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut next_wave = 0.0;
    let mut frames = 0;
    let mut last = GameStateSnapshot::default();

    while frames < args.frames {
        if engine.phase() == GamePhase::Active && engine.time().elapsed_secs >= next_wave {
            send_waves(&mut engine, &spawns);
            next_wave += WAVE_INTERVAL_SECS;
        }
        last = engine.tick(args.dt);
        frames += 1;
        for event in &last.events {
            *events.entry(event_name(event)).or_default() += 1;
        }
        if last.phase == GamePhase::Ended {
            break;
        }
    }

    let players = engine.players().len();
    let summary = Summary {
        frames,
        elapsed_secs: last.time.elapsed_secs,
        phase: last.phase,
        winner: last.winner,
        photons: last.players.iter().map(|p| p.photons).collect(),
        units_alive: (0..players)
            .map(|p| {
                last.units
                    .iter()
                    .filter(|u| u.owner.index() == p && !u.dying)
                    .count()
            })
            .collect(),
        base_hp: last.bases.iter().map(|b| b.hp).collect(),
        events,
    };
    info!(winner = ?summary.winner, elapsed = summary.elapsed_secs, "match finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Spawn one wave per player at its base and attack-move it toward the
/// next player's base.
fn send_waves(engine: &mut SimulationEngine, spawns: &[Vec2]) {
    let players = engine.players().len();
    for p in 0..players {
        let owner = PlayerId(p as u8);
        let home = spawns[p];
        let enemy = spawns[(p + 1) % players];
        let rally = home.lerp(enemy, 0.15);
        for kind in WAVE {
            match engine.try_spawn_unit(owner, kind, home, rally) {
                Ok(unit) => {
                    engine.issue_command(unit, CommandNode::AttackMove { target: enemy }, QueueMode::Append);
                }
                Err(e) => {
                    warn!(owner = owner.0, ?kind, error = %e, "wave spawn skipped");
                    break;
                }
            }
        }
    }
}

fn event_name(event: &SimEvent) -> &'static str {
    match event {
        SimEvent::MatchStarted => "match_started",
        SimEvent::UnitSpawned { .. } => "unit_spawned",
        SimEvent::UnitDied { .. } => "unit_died",
        SimEvent::QueueCancelled { .. } => "queue_cancelled",
        SimEvent::ProjectileFired { .. } => "projectile_fired",
        SimEvent::ProjectileImpact { .. } => "projectile_impact",
        SimEvent::AbilityCast { .. } => "ability_cast",
        SimEvent::ComboSwing { .. } => "combo_swing",
        SimEvent::KnifeThrown { .. } => "knife_thrown",
        SimEvent::Recloaked { .. } => "recloaked",
        SimEvent::ShieldBlocked { .. } => "shield_blocked",
        SimEvent::BaseDamaged { .. } => "base_damaged",
        SimEvent::StructureBuilt { .. } => "structure_built",
        SimEvent::StructureDestroyed { .. } => "structure_destroyed",
        SimEvent::MatchEnded { .. } => "match_ended",
    }
}
