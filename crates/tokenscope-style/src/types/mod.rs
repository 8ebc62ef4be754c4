//! Geometric value types shared by the style model and the inspector.

mod edges;

pub use edges::{Edges, Side};
