//! Container configuration.

use crate::types::{non_negative, Anchor, Axis, Orientation, Padding};

/// Size a box contributes when deciding where a line wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapBasis {
    /// The box's declared preferred main size, even when the container does
    /// not control child size on the main axis.
    #[default]
    Preferred,
    /// The preferred size after the child-size rules are applied: the box's
    /// current size when the main axis is not controlled.
    Resolved,
}

/// Configuration of a wrapping box container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombiConfig {
    /// Flow direction
    pub orientation: Orientation,
    /// Whether overflow wraps into additional lines
    pub wrap: bool,
    /// Gap between boxes in a line (main axis)
    pub spacing: f64,
    /// Gap between lines (cross axis)
    pub line_spacing: f64,
    /// Padding inside the container
    pub padding: Padding,
    /// Anchor for lines within the container and boxes within a line
    pub child_alignment: Anchor,
    /// Per axis: whether the container sets child size from layout metrics
    pub control_child_size: [bool; 2],
    /// Per axis: whether every child gets at least a flexible weight of 1
    pub force_expand: [bool; 2],
    /// Size used for wrap decisions
    pub wrap_basis: WrapBasis,
}

impl Default for CombiConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Row,
            wrap: true,
            spacing: 0.0,
            line_spacing: 0.0,
            padding: Padding::default(),
            child_alignment: Anchor::UpperLeft,
            control_child_size: [true, true],
            force_expand: [false, false],
            wrap_basis: WrapBasis::Preferred,
        }
    }
}

impl CombiConfig {
    /// Create a row container configuration.
    pub fn row() -> Self {
        Self::default()
    }

    /// Create a column container configuration.
    pub fn column() -> Self {
        Self {
            orientation: Orientation::Column,
            ..Default::default()
        }
    }

    /// Enable or disable wrapping.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the gap between boxes in a line.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the gap between lines.
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Set the child anchor.
    pub fn with_child_alignment(mut self, anchor: Anchor) -> Self {
        self.child_alignment = anchor;
        self
    }

    /// Set whether child size is controlled on an axis.
    pub fn with_control_child_size(mut self, axis: Axis, control: bool) -> Self {
        self.control_child_size[axis.index()] = control;
        self
    }

    /// Set whether children are forced to expand on an axis.
    pub fn with_force_expand(mut self, axis: Axis, expand: bool) -> Self {
        self.force_expand[axis.index()] = expand;
        self
    }

    /// Set the wrap basis.
    pub fn with_wrap_basis(mut self, basis: WrapBasis) -> Self {
        self.wrap_basis = basis;
        self
    }

    /// Whether child size is controlled on an axis.
    pub fn controls_child_size(&self, axis: Axis) -> bool {
        self.control_child_size[axis.index()]
    }

    /// Whether children are forced to expand on an axis.
    pub fn forces_expand(&self, axis: Axis) -> bool {
        self.force_expand[axis.index()]
    }

    /// Copy with malformed lengths clamped to zero.
    pub fn sanitized(&self) -> Self {
        Self {
            spacing: non_negative(self.spacing),
            line_spacing: non_negative(self.line_spacing),
            padding: self.padding.sanitized(),
            ..self.clone()
        }
    }
}
