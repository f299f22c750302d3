//! Geometry and axis types for box layout.
//!
//! Coordinates are y-down: offsets along [`Axis::Vertical`] are measured from
//! the top edge of the container, matching how child rects are placed.

use glam::DVec2;

/// Tolerance used when comparing extents during layout.
pub const LAYOUT_EPSILON: f64 = 1e-3;

/// Compare two extents within [`LAYOUT_EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= LAYOUT_EPSILON
}

/// Clamp a length to a finite, non-negative value.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Unique identifier for a node in a layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutNodeId(pub u64);

impl std::fmt::Display for LayoutNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Physical axis of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// X, left to right
    Horizontal = 0,
    /// Y, top to bottom
    Vertical = 1,
}

impl Axis {
    /// Both axes in pass order.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Index into per-axis arrays and vectors.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Logical axis relative to the flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowAxis {
    /// Direction boxes flow in and wrap along
    Main,
    /// Direction lines stack in
    Cross,
}

/// Flow direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Main axis is X; lines are rows stacked downwards
    #[default]
    Row,
    /// Main axis is Y; lines are columns stacked rightwards
    Column,
}

impl Orientation {
    /// Physical axis of the main (flow) direction.
    pub fn main_axis(self) -> Axis {
        match self {
            Orientation::Row => Axis::Horizontal,
            Orientation::Column => Axis::Vertical,
        }
    }

    /// Physical axis lines stack along.
    pub fn cross_axis(self) -> Axis {
        self.main_axis().other()
    }

    /// Map a logical axis to its physical axis.
    pub fn axis(self, flow: FlowAxis) -> Axis {
        match flow {
            FlowAxis::Main => self.main_axis(),
            FlowAxis::Cross => self.cross_axis(),
        }
    }

    /// Map a physical axis to its logical role.
    pub fn flow_axis(self, axis: Axis) -> FlowAxis {
        if axis == self.main_axis() {
            FlowAxis::Main
        } else {
            FlowAxis::Cross
        }
    }
}

/// Anchor used to align lines in the container and boxes within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    #[default]
    UpperLeft = 0,
    UpperCenter = 1,
    UpperRight = 2,
    MiddleLeft = 3,
    MiddleCenter = 4,
    MiddleRight = 5,
    LowerLeft = 6,
    LowerCenter = 7,
    LowerRight = 8,
}

impl Anchor {
    /// Alignment factor on an axis: 0 = start, 0.5 = center, 1 = end.
    pub fn alignment_on_axis(self, axis: Axis) -> f64 {
        let index = self as usize;
        match axis {
            Axis::Horizontal => (index % 3) as f64 * 0.5,
            Axis::Vertical => (index / 3) as f64 * 0.5,
        }
    }
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    /// Create padding from each side.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }

    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric padding.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Total padding along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Inset at the start of an axis (left or top).
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Padding with every side clamped to a finite, non-negative value.
    pub fn sanitized(self) -> Self {
        Self::new(
            non_negative(self.left),
            non_negative(self.right),
            non_negative(self.top),
            non_negative(self.bottom),
        )
    }
}

/// Axis-aligned rect of a box, relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Get position as a vector.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Get size as a vector.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Offset along an axis.
    pub fn offset(&self, axis: Axis) -> f64 {
        self.position()[axis.index()]
    }

    /// Extent along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.size()[axis.index()]
    }

    /// Set offset and extent along one axis, leaving the other untouched.
    pub fn set_along_axis(&mut self, axis: Axis, offset: f64, size: f64) {
        match axis {
            Axis::Horizontal => {
                self.x = offset;
                self.width = size;
            }
            Axis::Vertical => {
                self.y = offset;
                self.height = size;
            }
        }
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Bounds moved by an offset.
    pub fn translated(&self, by: DVec2) -> Bounds {
        Bounds::from_vecs(self.position() + by, self.size())
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Compute union (bounding box) with another bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }
}

/// Layout metrics of a box on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeMetrics {
    /// Smallest size the box accepts
    pub min: f64,
    /// Size the box asks for
    pub preferred: f64,
    /// Share of leftover space (0 = don't grow)
    pub flexible: f64,
}

impl SizeMetrics {
    pub const ZERO: SizeMetrics = SizeMetrics { min: 0.0, preferred: 0.0, flexible: 0.0 };

    pub fn new(min: f64, preferred: f64, flexible: f64) -> Self {
        Self { min, preferred, flexible }
    }

    /// A rigid size: min and preferred equal, no growth.
    pub fn fixed(size: f64) -> Self {
        Self::new(size, size, 0.0)
    }

    /// Metrics with non-finite or negative values zeroed and `preferred >= min`.
    pub fn sanitized(self) -> Self {
        let min = non_negative(self.min);
        Self {
            min,
            preferred: non_negative(self.preferred).max(min),
            flexible: non_negative(self.flexible),
        }
    }
}
