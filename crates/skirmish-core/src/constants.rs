//! Simulation constants and tuning parameters.
//!
//! Distances are world units (pixels on the reference map), times are
//! seconds, speeds are units per second.

// --- Frame timing ---

/// Largest frame delta the scheduler will integrate in one call.
pub const MAX_FRAME_DT: f64 = 0.1;

// --- Players & economy ---

pub const PLAYER_COUNT: u8 = 2;

pub const STARTING_PHOTONS: f64 = 200.0;

/// Photons earned per second by every player.
pub const BASE_INCOME_PER_SEC: f64 = 10.0;

/// Extra photons per second for each alive Generator.
pub const GENERATOR_INCOME_PER_SEC: f64 = 4.0;

// --- Flocking ---

/// Radius within which same-owner units repel each other.
pub const SEPARATION_RADIUS: f32 = 28.0;

/// Inverse-cubic separation numerator.
pub const SEPARATION_STRENGTH: f32 = 2000.0;

/// Fraction of separation kept along the path direction while path-following.
pub const PATH_SEPARATION_ALONG_FACTOR: f32 = 0.3;

pub const MAX_SEPARATION_FORCE: f32 = 1.5;

pub const COHESION_RADIUS: f32 = 70.0;

/// Linear pull per unit of distance toward the centroid of moving allies.
pub const COHESION_STRENGTH: f32 = 0.01;

pub const MAX_COHESION_FORCE: f32 = 0.4;

pub const ALIGNMENT_RADIUS: f32 = 50.0;

pub const ALIGNMENT_STRENGTH: f32 = 0.3;

pub const MAX_ALIGNMENT_FORCE: f32 = 0.4;

pub const MAX_FLOCKING_FORCE: f32 = 1.5;

/// Blend factor toward the new flocking force each frame (0 = frozen, 1 = no smoothing).
pub const FLOCKING_SMOOTHING: f32 = 0.25;

/// Weight of the goal direction when blended with the flocking force.
pub const GOAL_DIRECTION_WEIGHT: f32 = 4.0;

// --- Obstacle probing ---

/// Length of the lookahead segment cast before committing to a heading.
pub const PROBE_LOOKAHEAD: f32 = 20.0;

/// Angular increment between fanned-out candidate headings (radians).
pub const PROBE_ANGLE_STEP: f32 = std::f32::consts::PI / 12.0;

/// Maximum number of alternate headings tried (both sides combined).
pub const PROBE_MAX_ATTEMPTS: u32 = 12;

// --- Stuck detection & jitter ---

/// Displacement that counts as progress and resets the stuck timer.
pub const STUCK_PROGRESS_DISTANCE: f32 = 3.0;

/// Time without progress before jitter recovery begins.
pub const STUCK_JITTER_AFTER_SECS: f32 = 0.6;

/// Time without progress before the command queue is cancelled.
pub const STUCK_TIMEOUT_SECS: f32 = 3.0;

/// Radius of the circular jitter search.
pub const JITTER_AMPLITUDE: f32 = 2.5;

/// Phase advance per jitter attempt (radians, golden angle).
pub const JITTER_PHASE_STEP: f32 = 2.399_963;

/// Duration of the queue fade started by a stuck cancellation.
pub const QUEUE_CANCEL_FADE_SECS: f64 = 0.5;

// --- Collision resolution ---

/// Fraction of overlap depth pushed out per frame.
pub const COLLISION_PUSH_FACTOR: f32 = 0.5;

/// Cap on the total soft push applied to a candidate position per frame.
pub const MAX_COLLISION_PUSH: f32 = 1.5;

/// Length of the sidestep an idle ally walks to let a teammate pass.
pub const AVOIDANCE_SHOVE_DISTANCE: f32 = 16.0;

/// Delay before a shoved unit walks back to where it stood.
pub const AVOIDANCE_RETURN_DELAY_SECS: f64 = 1.5;

// --- Arrival ---

/// Euclidean distance at which a unit counts as arrived.
pub const ARRIVAL_THRESHOLD: f32 = 4.0;

/// A friendly unit this close to a target point occupies it.
pub const OCCUPIED_TARGET_EPSILON: f32 = 1.0;

/// An occupied target only counts as reached from within this distance.
pub const OCCUPIED_ARRIVAL_RADIUS: f32 = 40.0;

// --- Path following ---

/// Distance ahead along the polyline that the unit steers toward.
pub const PATH_LOOKAHEAD: f32 = 30.0;

/// Waypoints closer than this are consumed.
pub const PATH_REACH_RADIUS: f32 = 12.0;

// --- Promotion ---

/// Credit needed for one promotion step.
pub const PROMOTION_CREDIT_THRESHOLD: f32 = 1500.0;

/// Extra credit multiplier per queued movement node.
pub const PROMOTION_QUEUE_BONUS: f32 = 0.1;

/// Damage multiplier gained per promotion step.
pub const PROMOTION_DAMAGE_STEP: f32 = 0.1;

pub const MAX_DAMAGE_MULTIPLIER: f32 = 2.0;

// --- Unit upkeep ---

/// Displayed hp moves toward actual hp by this fraction per second.
pub const HP_DISPLAY_BLEND_PER_SEC: f32 = 6.0;

/// Time a dead unit lingers before despawn (queue-undraw animation).
pub const DEATH_GRACE_SECS: f64 = 0.6;

/// Spawned units are placed at most this far from the requested point.
pub const SPAWN_SCATTER: f32 = 6.0;

// --- Combat ---

/// Armor constant in `1 - armor / (armor + ARMOR_CONSTANT)`.
pub const ARMOR_CONSTANT: f32 = 100.0;

/// Projectile hits once within this distance of its aim point.
pub const PROJECTILE_HIT_DISTANCE: f32 = 0.5;

/// Extra lifetime beyond the nominal flight time.
pub const PROJECTILE_LIFETIME_SLACK: f32 = 0.5;

/// Search radius for the area fallback when the locked target is gone.
pub const PROJECTILE_FALLBACK_RADIUS: f32 = 12.0;

/// How long a melee swing visual lasts.
pub const MELEE_VISUAL_SECS: f64 = 0.2;

/// How long a laser beam visual lasts.
pub const LASER_VISUAL_SECS: f64 = 0.15;

/// How long an impact marker lasts.
pub const IMPACT_MARKER_SECS: f32 = 0.4;

// --- Projectile pool ---

pub const PROJECTILE_POOL_PREWARM: usize = 64;

pub const PROJECTILE_POOL_MAX: usize = 256;

// --- Bases ---

pub const BASE_SHIELD_DURATION_SECS: f64 = 4.0;

pub const BASE_SHIELD_COOLDOWN_SECS: f64 = 20.0;

// --- Abilities ---

/// Delay between bombardment cast and first impact.
pub const BOMBARDMENT_DELAY_SECS: f64 = 1.5;

pub const BOMBARDMENT_DURATION_SECS: f64 = 2.0;

pub const BOMBARDMENT_RADIUS: f32 = 40.0;

pub const BOMBARDMENT_DPS: f32 = 30.0;

pub const ORBITAL_STRIKE_DELAY_SECS: f64 = 2.5;

/// Window after impact during which the strike resolves.
pub const ORBITAL_STRIKE_WINDOW_SECS: f64 = 0.25;

pub const ORBITAL_STRIKE_RADIUS: f32 = 55.0;

pub const ORBITAL_STRIKE_DAMAGE: f32 = 120.0;

/// Duration of swings 1, 2 and 3.
pub const SWING_DURATIONS_SECS: [f64; 3] = [0.25, 0.25, 0.4];

/// Pause between consecutive swings.
pub const SWING_PAUSE_SECS: f64 = 0.15;

/// Pause after the third swing before a new combo may start.
pub const COMBO_RESET_SECS: f64 = 1.2;

pub const SWING_RADIUS: f32 = 26.0;

pub const SWING_DAMAGE: [f32; 3] = [18.0, 18.0, 30.0];

/// Delay from reveal to knife throw.
pub const KNIFE_THROW_DELAY_SECS: f64 = 0.3;

/// Delay from knife throw to recloak.
pub const RECLOAK_DELAY_SECS: f64 = 1.0;

pub const KNIFE_DAMAGE: f32 = 45.0;

pub const KNIFE_SPEED: f32 = 320.0;

pub const KNIFE_RANGE: f32 = 140.0;

pub const SHIELD_DOME_RADIUS: f32 = 60.0;

pub const SHIELD_DOME_DURATION_SECS: f64 = 6.0;

pub const SHIELD_DOME_RANGED_MULTIPLIER: f32 = 0.5;

pub const SHIELD_DOME_MELEE_MULTIPLIER: f32 = 1.0;

pub const HEAL_PULSE_RADIUS: f32 = 70.0;

pub const HEAL_PULSE_AMOUNT: f32 = 35.0;

pub const HEAL_PULSE_VISUAL_SECS: f64 = 0.5;

pub const RALLY_RADIUS: f32 = 80.0;

pub const RALLY_DURATION_SECS: f64 = 5.0;

pub const RALLY_SPEED_MULTIPLIER: f32 = 1.3;

pub const RALLY_DAMAGE_MULTIPLIER: f32 = 1.2;

pub const GRENADE_RADIUS: f32 = 30.0;

pub const GRENADE_DAMAGE: f32 = 35.0;

pub const GRENADE_RANGE: f32 = 120.0;

pub const BARRAGE_VOLLEYS: u8 = 4;

pub const BARRAGE_INTERVAL_SECS: f64 = 0.25;

pub const BARRAGE_MISSILE_DAMAGE: f32 = 14.0;

pub const BARRAGE_MISSILE_SPEED: f32 = 260.0;

/// Lateral spread of barrage impacts around the aim point.
pub const BARRAGE_SPREAD: f32 = 14.0;

pub const BARRAGE_RANGE: f32 = 160.0;

pub const BOMBARDMENT_RANGE: f32 = 260.0;

pub const ORBITAL_STRIKE_RANGE: f32 = 300.0;

/// Radius of the area damage released when a Drone dies.
pub const DEATH_BURST_RADIUS: f32 = 24.0;
