//! Node placement for animation export.
//!
//! Layout has no effect on simulation behavior; it only feeds the
//! visualization output.

pub mod types;
pub mod engine;

pub use types::{Layout, NodeAnnotation, Position, Rgb, RingSlot};
pub use engine::{compute_layout, LayoutParams};
