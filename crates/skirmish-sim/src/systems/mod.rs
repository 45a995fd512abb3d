//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only
//! passes). They hold no state of their own; it all lives in components or
//! in the engine.

pub mod bases;
pub mod cleanup;
pub mod combat;
pub mod command_queue;
pub mod economy;
pub mod effects;
pub mod projectiles;
pub mod snapshot;
pub mod steering;
pub mod structures;
pub mod victory;
