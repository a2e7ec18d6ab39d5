//! Layout output types.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::topology::NodeId;

/// 2-D coordinate in animation space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Label and color shown for a node in the animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAnnotation {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

/// Ring and slot of a device around its site router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSlot {
    pub ring: usize,
    pub slot: usize,
}

/// Positions of every node, plus annotations for the infrastructure nodes.
///
/// Each node is placed exactly once; the maps are keyed by node id so the
/// output is ordered and reproducible.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    pub positions: BTreeMap<NodeId, Position>,
    pub annotations: BTreeMap<NodeId, NodeAnnotation>,
}

impl Layout {
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    pub fn annotation(&self, node: NodeId) -> Option<&NodeAnnotation> {
        self.annotations.get(&node)
    }
}
