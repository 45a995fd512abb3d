//! Core types and definitions for the skirmish simulation.
//!
//! This crate defines the vocabulary shared by the simulation and its
//! collaborators: components, unit definitions, command nodes, inbound
//! commands, outbound events, map data and state snapshots.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod defs;
pub mod enums;
pub mod events;
pub mod map;
pub mod orders;
pub mod state;
pub mod types;

pub use glam::Vec2;
