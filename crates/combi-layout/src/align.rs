//! Cross-axis sizing and alignment of lines.
//!
//! A line is as thick as its thickest box. Lines are stacked with
//! `line_spacing` between them, and the whole block of lines is anchored in
//! the container. Within a line every box is anchored with the same factor.

use combi_core::{Axis, Padding};

use crate::resolve::SizeBuffer;

/// Offset at which content of `required` extent starts on an axis.
///
/// `container_extent` is the full size of the container including padding.
/// Surplus (or overflow, when negative) is split by `alignment`, where
/// 0 packs at the start, 0.5 centers and 1 packs at the end.
pub fn start_offset(container_extent: f64, padding: &Padding, axis: Axis, required: f64, alignment: f64) -> f64 {
    let surplus = container_extent - (required + padding.along(axis));
    padding.start(axis) + surplus * alignment
}

/// Cross extent of a line: the largest box on it.
pub fn line_cross_size<I>(box_sizes: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    box_sizes.into_iter().fold(0.0_f64, f64::max)
}

/// Places lines and boxes along the cross axis.
#[derive(Debug, Clone, Copy)]
pub struct CrossAxisAligner {
    line_spacing: f64,
    alignment: f64,
    stretch: bool,
}

impl CrossAxisAligner {
    /// `stretch` makes every box as thick as its line.
    pub fn new(line_spacing: f64, alignment: f64, stretch: bool) -> Self {
        Self { line_spacing, alignment, stretch }
    }

    /// Extent of all lines stacked with spacing between them.
    pub fn total_extent(&self, line_sizes: &[f64]) -> f64 {
        let sum: f64 = line_sizes.iter().sum();
        sum + self.line_spacing * line_sizes.len().saturating_sub(1) as f64
    }

    /// Offset of each line when the block starts at `start`.
    pub fn line_offsets(&self, line_sizes: &[f64], start: f64) -> SizeBuffer {
        let mut offset = start;
        line_sizes
            .iter()
            .map(|&size| {
                let line_offset = offset;
                offset += size + self.line_spacing;
                line_offset
            })
            .collect()
    }

    /// Final cross size of a box on a line.
    pub fn box_size(&self, preferred: f64, line_size: f64) -> f64 {
        if self.stretch {
            line_size
        } else {
            preferred
        }
    }

    /// Offset of a box within its line.
    pub fn offset_in_line(&self, line_size: f64, box_size: f64) -> f64 {
        (line_size - box_size) * self.alignment
    }
}
