//! Wrap-aware box layout.
//!
//! A [`CombiLayout`] arranges an ordered list of child boxes in rows or
//! columns, wrapping onto new lines when the main axis runs out of room.
//! Each box declares min, preferred and flexible sizes per axis through a
//! [`SizeProvider`]; the container reports its own aggregate sizes the same
//! way, so containers nest.
//!
//! # Architecture
//!
//! 1. **Line building**: partition boxes into lines by their preferred size
//! 2. **Axis resolution**: grow or interpolate box sizes along each line
//! 3. **Cross alignment**: size, stack and anchor lines in the container
//! 4. **Trees**: [`LayoutTree`] drives nested containers to a fixed point
//!
//! # Example
//!
//! ```
//! use combi_layout::{BoxSet, BoxSpec, CombiConfig, CombiLayout};
//! use glam::DVec2;
//!
//! let mut boxes: BoxSet = (0..5).map(|_| BoxSpec::fixed(50.0, 30.0)).collect();
//! let mut layout = CombiLayout::new(CombiConfig::row().with_spacing(10.0))
//!     .with_container_size(DVec2::new(140.0, 200.0));
//!
//! layout.arrange(&mut boxes);
//!
//! assert_eq!(layout.line_partition(), vec![vec![0, 1], vec![2, 3], vec![4]]);
//! assert_eq!(boxes.bounds(2).y, 30.0);
//! ```

mod align;
mod boxes;
mod engine;
mod lines;
mod provider;
mod resolve;
mod text;
mod tree;

pub use align::{line_cross_size, start_offset, CrossAxisAligner};
pub use boxes::{BoxSet, BoxSpec};
pub use engine::{CombiLayout, LayoutPhase};
pub use lines::{build_lines, Line, LineBuilder};
pub use provider::{child_size, participating_children, LayoutChildren, SizeProvider};
pub use resolve::{resolve_main_sizes, LineTotals, MainAxisSizes, Regime, SizeBuffer};
pub use text::{measure_text, TextContent, TextMetrics, TextStyle};
pub use tree::{LayoutNode, LayoutTree, LeafContent, NodeKind, MAX_LAYOUT_CYCLES};

pub use combi_core::{
    Anchor, Axis, Bounds, CombiConfig, FlowAxis, LayoutError, LayoutNodeId, LayoutResult, Orientation, Padding,
    SizeMetrics, WrapBasis, LAYOUT_EPSILON,
};
