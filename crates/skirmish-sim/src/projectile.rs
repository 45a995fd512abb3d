//! Pooled projectiles and combat target references.

use hecs::Entity;

use skirmish_core::constants::PROJECTILE_LIFETIME_SLACK;
use skirmish_core::enums::{DamageKind, ProjectileKind};
use skirmish_core::types::PlayerId;
use skirmish_core::Vec2;

use crate::pool::{ObjectPool, Poolable};

/// A combat target, resolved once at acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Unit(Entity),
    Base(Entity),
    Structure(Entity),
}

impl TargetRef {
    pub fn entity(self) -> Entity {
        match self {
            TargetRef::Unit(e) | TargetRef::Base(e) | TargetRef::Structure(e) => e,
        }
    }
}

/// A short-lived projectile in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub target_pos: Vec2,
    pub target: Option<TargetRef>,
    pub damage: f32,
    pub owner: PlayerId,
    /// Seconds left before the projectile expires where it is.
    pub lifetime: f32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn damage_kind(&self) -> DamageKind {
        match self.kind {
            ProjectileKind::Standard => DamageKind::Ranged,
            ProjectileKind::Knife | ProjectileKind::Missile => DamageKind::Ability,
        }
    }
}

impl Poolable for Projectile {
    fn reset(&mut self) {
        *self = Projectile::default();
    }
}

/// Everything needed to put a projectile in flight.
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub from: Vec2,
    pub target_pos: Vec2,
    pub target: Option<TargetRef>,
    pub speed: f32,
    pub damage: f32,
    pub owner: PlayerId,
    pub kind: ProjectileKind,
}

/// Projectiles in flight plus the pool they are recycled through.
#[derive(Debug)]
pub struct ProjectileSet {
    pool: ObjectPool<Projectile>,
    pub(crate) active: Vec<Projectile>,
}

impl ProjectileSet {
    pub fn new(prewarm: usize, max_retained: usize) -> Self {
        Self {
            pool: ObjectPool::with_prewarm(prewarm, max_retained),
            active: Vec::with_capacity(prewarm),
        }
    }

    /// Acquire a pooled projectile and aim it at `launch.target_pos`.
    pub fn launch(&mut self, launch: Launch) {
        let mut p = self.pool.acquire();
        let offset = launch.target_pos - launch.from;
        let distance = offset.length();
        let speed = launch.speed.max(1.0);
        p.position = launch.from;
        p.velocity = offset.normalize_or_zero() * speed;
        p.target_pos = launch.target_pos;
        p.target = launch.target;
        p.damage = launch.damage;
        p.owner = launch.owner;
        p.lifetime = distance / speed + PROJECTILE_LIFETIME_SLACK;
        p.kind = launch.kind;
        self.active.push(p);
    }

    pub fn active(&self) -> &[Projectile] {
        &self.active
    }

    pub fn pool(&self) -> &ObjectPool<Projectile> {
        &self.pool
    }

    pub(crate) fn release(&mut self, p: Projectile) {
        self.pool.release(p);
    }

    /// Return every in-flight projectile to the pool.
    pub fn clear(&mut self) {
        let drained: Vec<Projectile> = self.active.drain(..).collect();
        self.pool.release_all(drained);
    }
}
