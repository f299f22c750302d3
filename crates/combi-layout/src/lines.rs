//! Line breaking along the main axis.
//!
//! Boxes are packed into lines in their original order. The size each box
//! contributes to a wrap decision is its flex-basis (preferred main size),
//! never a size adjusted by flexible growth, so wrapping stays stable while
//! lines grow.

use std::ops::Range;

use combi_core::LAYOUT_EPSILON;

/// A run of consecutive boxes laid out on one row or column.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// First box position (inclusive)
    pub start: usize,
    /// Last box position (exclusive)
    pub end: usize,
    /// Main extent used: box sizes plus spacing between them
    pub main_size: f64,
    /// Cross extent: the largest box on the line
    pub cross_size: f64,
}

impl Line {
    fn new(start: usize, end: usize, main_size: f64) -> Self {
        Self { start, end, main_size, cross_size: 0.0 }
    }

    /// Box positions on this line.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partitions boxes into lines for a given main extent.
#[derive(Debug, Clone, Copy)]
pub struct LineBuilder {
    available_main: f64,
    spacing: f64,
    wrap: bool,
}

impl LineBuilder {
    pub fn new(available_main: f64, spacing: f64, wrap: bool) -> Self {
        Self { available_main, spacing, wrap }
    }

    /// Whether this builder can produce more than one line.
    ///
    /// Without a known, positive, finite extent there is nothing to wrap
    /// against, so everything goes on a single line.
    pub fn wraps(&self) -> bool {
        self.wrap && self.available_main > 0.0 && self.available_main.is_finite()
    }

    /// Build lines from each box's wrap basis, in order.
    pub fn build(&self, basis: &[f64]) -> Vec<Line> {
        let mut lines = Vec::new();
        if basis.is_empty() {
            return lines;
        }

        let wraps = self.wraps();
        let mut start = 0;
        let mut used = 0.0;

        for (index, &size) in basis.iter().enumerate() {
            if index == start {
                used = size;
                continue;
            }

            let candidate = used + self.spacing + size;
            if wraps && candidate > self.available_main + LAYOUT_EPSILON {
                lines.push(Line::new(start, index, used));
                start = index;
                used = size;
            } else {
                used = candidate;
            }
        }

        lines.push(Line::new(start, basis.len(), used));
        lines
    }
}

/// Partition boxes into lines. See [`LineBuilder::build`].
pub fn build_lines(basis: &[f64], available_main: f64, spacing: f64, wrap: bool) -> Vec<Line> {
    LineBuilder::new(available_main, spacing, wrap).build(basis)
}
