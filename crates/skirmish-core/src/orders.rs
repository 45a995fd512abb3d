//! Command nodes and the per-unit command queue.
//!
//! The queue is processed strictly FIFO; only the head node is active.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One queued instruction in a unit's behavior queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandNode {
    /// Travel to a point.
    Move { target: Vec2 },
    /// Travel to a point, firing at enemies in range on the way.
    AttackMove { target: Vec2 },
    /// Travel to `position`, then cast the unit's ability.
    ///
    /// `direction` is the aim offset from `position`. Aimed abilities do
    /// nothing without it; self-centered ones ignore it.
    Ability {
        position: Vec2,
        direction: Option<Vec2>,
    },
    /// Travel to `target`, then patrol back toward `return_to`.
    Patrol { target: Vec2, return_to: Vec2 },
    /// Walk an ordered polyline of waypoints.
    FollowPath { path: VecDeque<Vec2> },
}

impl CommandNode {
    /// Nodes that move the unit and count toward promotion credit.
    pub fn is_movement(&self) -> bool {
        !matches!(self, CommandNode::Ability { .. })
    }

    /// The point this node travels to, if it has one.
    pub fn destination(&self) -> Option<Vec2> {
        match self {
            CommandNode::Move { target }
            | CommandNode::AttackMove { target }
            | CommandNode::Patrol { target, .. } => Some(*target),
            CommandNode::Ability { position, .. } => Some(*position),
            CommandNode::FollowPath { path } => path.back().copied(),
        }
    }

    /// Clamp every point in the node into the rectangle `[min, max]`.
    pub fn clamped(self, min: Vec2, max: Vec2) -> Self {
        let clamp = |p: Vec2| p.clamp(min, max);
        match self {
            CommandNode::Move { target } => CommandNode::Move {
                target: clamp(target),
            },
            CommandNode::AttackMove { target } => CommandNode::AttackMove {
                target: clamp(target),
            },
            CommandNode::Ability {
                position,
                direction,
            } => CommandNode::Ability {
                position: clamp(position),
                direction,
            },
            CommandNode::Patrol { target, return_to } => CommandNode::Patrol {
                target: clamp(target),
                return_to: clamp(return_to),
            },
            CommandNode::FollowPath { path } => CommandNode::FollowPath {
                path: path.into_iter().map(clamp).collect(),
            },
        }
    }

    /// Whether every coordinate in the node is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            CommandNode::Move { target } | CommandNode::AttackMove { target } => {
                target.is_finite()
            }
            CommandNode::Ability {
                position,
                direction,
            } => position.is_finite() && direction.map_or(true, |d| d.is_finite()),
            CommandNode::Patrol { target, return_to } => {
                target.is_finite() && return_to.is_finite()
            }
            CommandNode::FollowPath { path } => {
                !path.is_empty() && path.iter().all(|p| p.is_finite())
            }
        }
    }
}

/// Ordered list of command nodes driving one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandQueue {
    nodes: VecDeque<CommandNode>,
    /// Set when the queue is fading out; nodes are dropped at this time.
    cancel_at: Option<f64>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Appending aborts a pending fade.
    pub fn push(&mut self, node: CommandNode) {
        self.cancel_at = None;
        self.nodes.push_back(node);
    }

    /// Replace the whole queue with a single node.
    pub fn replace(&mut self, node: CommandNode) {
        self.nodes.clear();
        self.push(node);
    }

    pub fn head(&self) -> Option<&CommandNode> {
        self.nodes.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut CommandNode> {
        self.nodes.front_mut()
    }

    pub fn pop(&mut self) -> Option<CommandNode> {
        self.nodes.pop_front()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cancel_at = None;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandNode> {
        self.nodes.iter()
    }

    /// Number of queued movement-type nodes, head included.
    pub fn movement_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_movement()).count()
    }

    /// Start a timed fade; the nodes are dropped once `now + fade_secs` passes.
    pub fn begin_cancel(&mut self, now: f64, fade_secs: f64) {
        if self.cancel_at.is_none() && !self.nodes.is_empty() {
            self.cancel_at = Some(now + fade_secs);
        }
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancel_at.is_some()
    }

    pub fn cancel_at(&self) -> Option<f64> {
        self.cancel_at
    }

    /// Drop the nodes if the fade has finished. Returns true if it did.
    pub fn finish_cancel(&mut self, now: f64) -> bool {
        match self.cancel_at {
            Some(at) if now >= at => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}
