//! The Combi container: wrap-aware box layout in two passes per axis.
//!
//! A layout cycle runs four steps, each once:
//!
//! 1. measure horizontal, then measure vertical: the aggregate
//!    min/preferred/flexible size of the container, reported to its parent;
//! 2. arrange horizontal, then arrange vertical: final child geometry.
//!
//! Which arrange step decides wrapping depends on the orientation. For
//! [`Orientation::Row`] lines are broken by width, so the horizontal step
//! builds lines and places X while the vertical step stacks those lines. For
//! [`Orientation::Column`] lines are broken by height: the horizontal step only
//! assigns widths (content such as wrapped text needs a width before it can
//! report a height), and the vertical step builds the columns and places both
//! axes. Drivers whose children report sizes that depend on assigned widths
//! call the steps interleaved (measure H, arrange H, measure V, arrange V), as
//! [`crate::LayoutTree`] does.

use glam::DVec2;
use smallvec::SmallVec;

use combi_core::{
    approx_eq, non_negative, Anchor, Axis, CombiConfig, Orientation, Padding, SizeMetrics,
    WrapBasis,
};

use crate::align::{line_cross_size, start_offset, CrossAxisAligner};
use crate::lines::{Line, LineBuilder};
use crate::provider::{child_size, participating_children, LayoutChildren, SizeProvider};
use crate::resolve::{resolve_main_sizes, LineTotals, SizeBuffer};

/// Where a container is in its layout cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// Geometry is up to date
    Clean,
    /// Configuration, boxes or extent changed since the last cycle
    Dirty,
    MeasuringHorizontal,
    MeasuringVertical,
    ArrangingHorizontal,
    ArrangingVertical,
}

impl LayoutPhase {
    /// Whether a cycle is in progress.
    pub fn in_cycle(self) -> bool {
        !matches!(self, LayoutPhase::Clean | LayoutPhase::Dirty)
    }

    fn measuring(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => LayoutPhase::MeasuringHorizontal,
            Axis::Vertical => LayoutPhase::MeasuringVertical,
        }
    }

    fn arranging(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => LayoutPhase::ArrangingHorizontal,
            Axis::Vertical => LayoutPhase::ArrangingVertical,
        }
    }
}

/// A wrapping box container.
#[derive(Debug, Clone)]
pub struct CombiLayout {
    config: CombiConfig,
    /// Full container size, padding included
    container_size: DVec2,
    phase: LayoutPhase,
    /// Set when invalidated while a cycle was running
    invalidated_in_cycle: bool,
    totals: [SizeMetrics; 2],
    /// Participating child indices the current lines refer to
    participants: Vec<usize>,
    lines: Vec<Line>,
}

impl Default for CombiLayout {
    fn default() -> Self {
        Self::new(CombiConfig::default())
    }
}

impl CombiLayout {
    /// Create a container. It starts dirty.
    pub fn new(config: CombiConfig) -> Self {
        Self {
            config: config.sanitized(),
            container_size: DVec2::ZERO,
            phase: LayoutPhase::Dirty,
            invalidated_in_cycle: false,
            totals: [SizeMetrics::ZERO; 2],
            participants: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Create a container with a known size.
    pub fn with_container_size(mut self, size: DVec2) -> Self {
        self.container_size = size;
        self
    }

    pub fn config(&self) -> &CombiConfig {
        &self.config
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn is_dirty(&self) -> bool {
        self.phase != LayoutPhase::Clean
    }

    pub fn container_size(&self) -> DVec2 {
        self.container_size
    }

    /// Lines from the most recent arrange step.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Child indices on a line.
    pub fn line_children(&self, line: &Line) -> &[usize] {
        &self.participants[line.range()]
    }

    /// Child indices of every line, in order.
    pub fn line_partition(&self) -> Vec<Vec<usize>> {
        self.lines
            .iter()
            .map(|line| self.line_children(line).to_vec())
            .collect()
    }

    /// Aggregate size from the most recent measure step, without running one.
    pub fn reported_size(&self, axis: Axis) -> SizeMetrics {
        self.totals[axis.index()]
    }

    /// Mark the layout as needing a new cycle.
    ///
    /// Called while a cycle is running, the request is held until the cycle
    /// ends; the container then finishes dirty instead of clean.
    pub fn invalidate(&mut self) {
        if self.phase.in_cycle() {
            self.invalidated_in_cycle = true;
        } else {
            self.phase = LayoutPhase::Dirty;
        }
    }

    /// Update the container size from its geometry source.
    pub fn set_container_size(&mut self, size: DVec2) {
        if !approx_eq(size.x, self.container_size.x) || !approx_eq(size.y, self.container_size.y) {
            self.container_size = size;
            self.invalidate();
        }
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: CombiConfig) {
        let config = config.sanitized();
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.config.orientation != orientation {
            self.config.orientation = orientation;
            self.invalidate();
        }
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        if self.config.wrap != wrap {
            self.config.wrap = wrap;
            self.invalidate();
        }
    }

    /// Set the main-axis gap. Negative values clamp to zero.
    pub fn set_spacing(&mut self, spacing: f64) {
        let spacing = non_negative(spacing);
        if !approx_eq(self.config.spacing, spacing) {
            self.config.spacing = spacing;
            self.invalidate();
        }
    }

    /// Set the cross-axis gap between lines. Negative values clamp to zero.
    pub fn set_line_spacing(&mut self, line_spacing: f64) {
        let line_spacing = non_negative(line_spacing);
        if !approx_eq(self.config.line_spacing, line_spacing) {
            self.config.line_spacing = line_spacing;
            self.invalidate();
        }
    }

    pub fn set_padding(&mut self, padding: Padding) {
        let padding = padding.sanitized();
        if self.config.padding != padding {
            self.config.padding = padding;
            self.invalidate();
        }
    }

    pub fn set_child_alignment(&mut self, anchor: Anchor) {
        if self.config.child_alignment != anchor {
            self.config.child_alignment = anchor;
            self.invalidate();
        }
    }

    pub fn set_control_child_size(&mut self, axis: Axis, control: bool) {
        if self.config.control_child_size[axis.index()] != control {
            self.config.control_child_size[axis.index()] = control;
            self.invalidate();
        }
    }

    pub fn set_force_expand(&mut self, axis: Axis, expand: bool) {
        if self.config.force_expand[axis.index()] != expand {
            self.config.force_expand[axis.index()] = expand;
            self.invalidate();
        }
    }

    pub fn set_wrap_basis(&mut self, basis: WrapBasis) {
        if self.config.wrap_basis != basis {
            self.config.wrap_basis = basis;
            self.invalidate();
        }
    }

    /// Aggregate size of the container on an axis.
    ///
    /// Runs a full cycle first if the layout is dirty or the set of
    /// participating children changed.
    pub fn measure<C>(&mut self, children: &mut C, axis: Axis) -> SizeMetrics
    where
        C: LayoutChildren + ?Sized,
    {
        self.refresh(children);
        self.totals[axis.index()]
    }

    /// Push final geometry to the children. A no-op when clean and the
    /// participating children are the ones last laid out.
    pub fn arrange<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        self.refresh(children);
    }

    fn refresh<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        if !self.is_dirty() && self.children_changed(&*children) {
            tracing::trace!("participating children changed");
            self.invalidate();
        }
        if self.is_dirty() {
            self.run_cycle(children);
        }
    }

    fn run_cycle<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        self.measure_axis(children, Axis::Horizontal);
        self.measure_axis(children, Axis::Vertical);
        self.arrange_axis(children, Axis::Horizontal);
        self.arrange_axis(children, Axis::Vertical);
    }

    /// Measure step: recompute the aggregate size from the children as they
    /// are now and report it for `axis`.
    ///
    /// The horizontal measure step opens a cycle.
    pub fn measure_axis<P>(&mut self, children: &P, axis: Axis) -> SizeMetrics
    where
        P: SizeProvider + ?Sized,
    {
        if axis == Axis::Horizontal && !self.phase.in_cycle() {
            self.invalidated_in_cycle = false;
        }
        self.phase = LayoutPhase::measuring(axis);
        self.totals = self.compute_totals(children);

        let reported = self.totals[axis.index()];
        tracing::trace!(
            ?axis,
            min = reported.min,
            preferred = reported.preferred,
            flexible = reported.flexible,
            "measured container"
        );
        reported
    }

    /// Arrange step: push geometry for `axis` to the children.
    ///
    /// The vertical arrange step closes the cycle.
    pub fn arrange_axis<C>(&mut self, children: &mut C, axis: Axis)
    where
        C: LayoutChildren + ?Sized,
    {
        self.phase = LayoutPhase::arranging(axis);

        match (self.config.orientation, axis) {
            (Orientation::Row, Axis::Horizontal) => {
                self.rebuild_lines(children);
                self.place_main(children);
            }
            (Orientation::Row, Axis::Vertical) => {
                if self.lines_stale(children) {
                    self.rebuild_lines(children);
                }
                self.place_cross(children);
            }
            (Orientation::Column, Axis::Horizontal) => self.assign_cross_sizes(children),
            (Orientation::Column, Axis::Vertical) => {
                self.rebuild_lines(children);
                self.place_main(children);
                self.place_cross(children);
            }
        }
        tracing::trace!(?axis, lines = self.lines.len(), "arranged container");

        if axis == Axis::Vertical {
            self.finish_cycle();
        }
    }

    fn finish_cycle(&mut self) {
        self.phase = if self.invalidated_in_cycle {
            LayoutPhase::Dirty
        } else {
            LayoutPhase::Clean
        };
        self.invalidated_in_cycle = false;
        tracing::debug!(
            orientation = ?self.config.orientation,
            children = self.participants.len(),
            lines = self.lines.len(),
            phase = ?self.phase,
            "layout cycle complete"
        );
    }

    /// Content extent on an axis: container size minus padding, never negative.
    fn inner_size(&self, axis: Axis) -> f64 {
        non_negative(self.container_size[axis.index()] - self.config.padding.along(axis))
    }

    fn metrics<P>(&self, children: &P, child: usize, axis: Axis) -> SizeMetrics
    where
        P: SizeProvider + ?Sized,
    {
        child_size(
            children,
            child,
            axis,
            self.config.controls_child_size(axis),
            self.config.forces_expand(axis),
        )
    }

    fn wrap_basis<P>(&self, children: &P, child: usize) -> f64
    where
        P: SizeProvider + ?Sized,
    {
        let main = self.config.orientation.main_axis();
        match self.config.wrap_basis {
            WrapBasis::Preferred => child_size(children, child, main, true, false).preferred,
            WrapBasis::Resolved => self.metrics(children, child, main).preferred,
        }
    }

    fn line_builder(&self) -> LineBuilder {
        let main = self.config.orientation.main_axis();
        LineBuilder::new(self.inner_size(main), self.config.spacing, self.config.wrap)
    }

    fn build_lines<P>(&self, children: &P, participants: &[usize]) -> Vec<Line>
    where
        P: SizeProvider + ?Sized,
    {
        let basis: SizeBuffer = participants
            .iter()
            .map(|&child| self.wrap_basis(children, child))
            .collect();
        self.line_builder().build(&basis)
    }

    fn rebuild_lines<P>(&mut self, children: &P)
    where
        P: SizeProvider + ?Sized,
    {
        let participants = participating_children(children);
        self.lines = self.build_lines(children, &participants);
        self.participants = participants;
    }

    /// Whether boxes were added, removed or excluded since the last arrange.
    fn children_changed<P>(&self, children: &P) -> bool
    where
        P: SizeProvider + ?Sized,
    {
        participating_children(children) != self.participants
    }

    fn lines_stale<P>(&self, children: &P) -> bool
    where
        P: SizeProvider + ?Sized,
    {
        self.children_changed(children) || (self.lines.is_empty() && !self.participants.is_empty())
    }

    fn compute_totals<P>(&self, children: &P) -> [SizeMetrics; 2]
    where
        P: SizeProvider + ?Sized,
    {
        let participants = participating_children(children);
        if participants.is_empty() {
            return [SizeMetrics::ZERO; 2];
        }

        let main = self.config.orientation.main_axis();
        let cross = main.other();
        let spacing = self.config.spacing;

        let main_metrics: Vec<SizeMetrics> = participants
            .iter()
            .map(|&child| self.metrics(children, child, main))
            .collect();
        let cross_metrics: Vec<SizeMetrics> = participants
            .iter()
            .map(|&child| self.metrics(children, child, cross))
            .collect();

        let builder = self.line_builder();
        let (main_total, cross_total) = if builder.wraps() {
            let lines = self.build_lines(children, &participants);
            let mut main_total = SizeMetrics::ZERO;
            let mut cross_total = SizeMetrics::ZERO;

            for line in &lines {
                let totals = LineTotals::of(&main_metrics[line.range()], spacing);
                main_total.min = main_total.min.max(totals.min_extent());
                main_total.preferred = main_total.preferred.max(totals.preferred_extent());

                let line_cross = &cross_metrics[line.range()];
                cross_total.min += line_cross_size(line_cross.iter().map(|m| m.min));
                cross_total.preferred += line_cross_size(line_cross.iter().map(|m| m.preferred));
            }

            let line_gaps = self.config.line_spacing * lines.len().saturating_sub(1) as f64;
            cross_total.min += line_gaps;
            cross_total.preferred += line_gaps;
            (main_total, cross_total)
        } else {
            let totals = LineTotals::of(&main_metrics, spacing);
            let main_total = SizeMetrics::new(totals.min_extent(), totals.preferred_extent(), totals.flexible);
            let cross_total = SizeMetrics::new(
                line_cross_size(cross_metrics.iter().map(|m| m.min)),
                line_cross_size(cross_metrics.iter().map(|m| m.preferred)),
                line_cross_size(cross_metrics.iter().map(|m| m.flexible)),
            );
            (main_total, cross_total)
        };

        let mut totals = [SizeMetrics::ZERO; 2];
        for (axis, total) in [(main, main_total), (cross, cross_total)] {
            let padding = self.config.padding.along(axis);
            totals[axis.index()] = SizeMetrics::new(total.min + padding, total.preferred + padding, total.flexible);
        }
        totals
    }

    /// Resolve main sizes line by line and place boxes along the main axis.
    fn place_main<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        let main = self.config.orientation.main_axis();
        let available = self.inner_size(main);
        let container_extent = self.container_size[main.index()];
        let alignment = self.config.child_alignment.alignment_on_axis(main);
        let spacing = self.config.spacing;

        for index in 0..self.lines.len() {
            let range = self.lines[index].range();
            let metrics: SmallVec<[SizeMetrics; 8]> = self.participants[range.clone()]
                .iter()
                .map(|&child| self.metrics(&*children, child, main))
                .collect();

            let resolved = resolve_main_sizes(&metrics, available, spacing);
            let used = resolved.total() + spacing * metrics.len().saturating_sub(1) as f64;
            self.lines[index].main_size = used;

            let mut position = start_offset(container_extent, &self.config.padding, main, used, alignment);
            for (&child, &size) in self.participants[range].iter().zip(resolved.sizes.iter()) {
                children.set_child_along_axis(child, main, position, size);
                position += size + spacing;
            }
        }
    }

    /// Size lines on the cross axis, stack them and align boxes within them.
    fn place_cross<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        let cross = self.config.orientation.cross_axis();
        let alignment = self.config.child_alignment.alignment_on_axis(cross);
        let stretch = self.config.controls_child_size(cross) && self.config.forces_expand(cross);
        let aligner = CrossAxisAligner::new(self.config.line_spacing, alignment, stretch);

        let box_sizes: SizeBuffer = self
            .participants
            .iter()
            .map(|&child| self.metrics(&*children, child, cross).preferred)
            .collect();

        let mut line_sizes = SizeBuffer::new();
        for line in &mut self.lines {
            line.cross_size = line_cross_size(box_sizes[line.range()].iter().copied());
            line_sizes.push(line.cross_size);
        }

        let total = aligner.total_extent(&line_sizes);
        let start = start_offset(
            self.container_size[cross.index()],
            &self.config.padding,
            cross,
            total,
            alignment,
        );
        let offsets = aligner.line_offsets(&line_sizes, start);

        for (line, &line_offset) in self.lines.iter().zip(offsets.iter()) {
            for position in line.range() {
                let child = self.participants[position];
                let size = aligner.box_size(box_sizes[position], line.cross_size);
                let offset = line_offset + aligner.offset_in_line(line.cross_size, size);
                children.set_child_along_axis(child, cross, offset, size);
            }
        }
    }

    /// Column orientation, horizontal step: give every box its width before
    /// columns are built. X is provisional until the vertical step.
    fn assign_cross_sizes<C>(&mut self, children: &mut C)
    where
        C: LayoutChildren + ?Sized,
    {
        let cross = self.config.orientation.cross_axis();
        let start = self.config.padding.start(cross);
        let participants = participating_children(&*children);

        for &child in &participants {
            let metrics = self.metrics(&*children, child, cross);
            children.set_child_along_axis(child, cross, start, metrics.preferred.max(metrics.min));
        }
        self.participants = participants;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{BoxSet, BoxSpec};
    use combi_core::Bounds;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    fn assert_bounds(actual: Bounds, x: f64, y: f64, width: f64, height: f64) {
        assert!(
            approx(actual.x, x) && approx(actual.y, y) && approx(actual.width, width) && approx(actual.height, height),
            "expected ({x}, {y}, {width}, {height}), got {actual:?}"
        );
    }

    fn row_boxes() -> BoxSet {
        (0..5)
            .map(|_| BoxSpec::new(SizeMetrics::new(20.0, 50.0, 0.0), SizeMetrics::fixed(30.0)))
            .collect()
    }

    #[test]
    fn test_row_wrap_layout() {
        let mut boxes = row_boxes();
        let config = CombiConfig::row().with_spacing(10.0).with_line_spacing(5.0);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(140.0, 200.0));

        layout.arrange(&mut boxes);

        assert_eq!(layout.line_partition(), vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert_bounds(boxes.bounds(0), 0.0, 0.0, 50.0, 30.0);
        assert_bounds(boxes.bounds(1), 60.0, 0.0, 50.0, 30.0);
        assert_bounds(boxes.bounds(2), 0.0, 35.0, 50.0, 30.0);
        assert_bounds(boxes.bounds(4), 0.0, 70.0, 50.0, 30.0);
        assert_eq!(layout.phase(), LayoutPhase::Clean);
    }

    #[test]
    fn test_row_wrap_measure() {
        let mut boxes = row_boxes();
        let config = CombiConfig::row().with_spacing(10.0).with_line_spacing(5.0);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(140.0, 200.0));

        let width = layout.measure(&mut boxes, Axis::Horizontal);
        let height = layout.measure(&mut boxes, Axis::Vertical);

        assert!(approx(width.min, 50.0));
        assert!(approx(width.preferred, 110.0));
        assert_eq!(width.flexible, 0.0);
        assert!(approx(height.min, 100.0));
        assert!(approx(height.preferred, 100.0));
    }

    #[test]
    fn test_unwrapped_measure_sums_main_axis() {
        let mut boxes = row_boxes();
        let config = CombiConfig::row()
            .with_wrap(false)
            .with_spacing(10.0)
            .with_padding(Padding::new(1.0, 2.0, 3.0, 4.0))
            .with_force_expand(Axis::Horizontal, true);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(140.0, 200.0));

        let width = layout.measure(&mut boxes, Axis::Horizontal);
        let height = layout.measure(&mut boxes, Axis::Vertical);

        assert!(approx(width.min, 100.0 + 40.0 + 3.0));
        assert!(approx(width.preferred, 250.0 + 40.0 + 3.0));
        assert!(approx(width.flexible, 5.0));
        assert!(approx(height.min, 30.0 + 7.0));
        assert!(approx(height.preferred, 30.0 + 7.0));
        assert_eq!(layout.lines().len(), 1);
    }

    #[test]
    fn test_column_wrap_layout() {
        let mut boxes: BoxSet = (0..3)
            .map(|_| BoxSpec::new(SizeMetrics::new(10.0, 40.0, 0.0), SizeMetrics::fixed(40.0)))
            .collect();
        let config = CombiConfig::column().with_line_spacing(10.0);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 100.0));

        layout.arrange(&mut boxes);

        assert_eq!(layout.line_partition(), vec![vec![0, 1], vec![2]]);
        assert_bounds(boxes.bounds(0), 0.0, 0.0, 40.0, 40.0);
        assert_bounds(boxes.bounds(1), 0.0, 40.0, 40.0, 40.0);
        assert_bounds(boxes.bounds(2), 50.0, 0.0, 40.0, 40.0);
    }

    #[test]
    fn test_child_alignment_centers_line_and_block() {
        let mut boxes: BoxSet = std::iter::once(BoxSpec::fixed(50.0, 20.0)).collect();
        let config = CombiConfig::row().with_child_alignment(Anchor::MiddleCenter);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(200.0, 100.0));

        layout.arrange(&mut boxes);

        assert_bounds(boxes.bounds(0), 75.0, 40.0, 50.0, 20.0);
    }

    #[test]
    fn test_lower_right_alignment_within_line() {
        let mut boxes: BoxSet = vec![BoxSpec::fixed(40.0, 10.0), BoxSpec::fixed(40.0, 30.0)]
            .into_iter()
            .collect();
        let config = CombiConfig::row().with_child_alignment(Anchor::LowerRight);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 50.0));

        layout.arrange(&mut boxes);

        // Line is 80 wide and 30 tall; surplus 20 horizontally and 20 vertically.
        assert_bounds(boxes.bounds(0), 20.0, 40.0, 40.0, 10.0);
        assert_bounds(boxes.bounds(1), 60.0, 20.0, 40.0, 30.0);
    }

    #[test]
    fn test_padding_offsets_children() {
        let mut boxes: BoxSet = std::iter::once(BoxSpec::fixed(20.0, 20.0)).collect();
        let config = CombiConfig::row().with_padding(Padding::new(10.0, 0.0, 5.0, 0.0));
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 100.0));

        layout.arrange(&mut boxes);

        assert_bounds(boxes.bounds(0), 10.0, 5.0, 20.0, 20.0);
    }

    #[test]
    fn test_force_expand_width_distributes_space() {
        let mut boxes: BoxSet = (0..2)
            .map(|_| BoxSpec::new(SizeMetrics::new(0.0, 20.0, 0.0), SizeMetrics::fixed(10.0)))
            .collect();
        let config = CombiConfig::row().with_force_expand(Axis::Horizontal, true);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 10.0));

        layout.arrange(&mut boxes);

        assert_bounds(boxes.bounds(0), 0.0, 0.0, 50.0, 10.0);
        assert_bounds(boxes.bounds(1), 50.0, 0.0, 50.0, 10.0);
    }

    #[test]
    fn test_force_expand_height_stretches_to_line() {
        let mut boxes: BoxSet = vec![BoxSpec::fixed(20.0, 10.0), BoxSpec::fixed(20.0, 30.0)]
            .into_iter()
            .collect();
        let config = CombiConfig::row()
            .with_force_expand(Axis::Vertical, true)
            .with_child_alignment(Anchor::LowerLeft);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 30.0));

        layout.arrange(&mut boxes);

        assert_bounds(boxes.bounds(0), 0.0, 0.0, 20.0, 30.0);
        assert_bounds(boxes.bounds(1), 20.0, 0.0, 20.0, 30.0);
    }

    #[test]
    fn test_uncontrolled_size_keeps_current() {
        let mut boxes: BoxSet = std::iter::once(
            BoxSpec::new(SizeMetrics::new(10.0, 80.0, 1.0), SizeMetrics::fixed(10.0)).with_current_size(33.0, 12.0),
        )
        .collect();
        let config = CombiConfig::row()
            .with_control_child_size(Axis::Horizontal, false)
            .with_control_child_size(Axis::Vertical, false);
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(200.0, 100.0));

        layout.arrange(&mut boxes);

        assert_bounds(boxes.bounds(0), 0.0, 0.0, 33.0, 12.0);
    }

    #[test]
    fn test_wrap_basis_when_uncontrolled() {
        // Declared preferred width 80, current width 30: two fit on a 70 line
        // only when wrapping by the current size.
        let make = || -> BoxSet {
            (0..2)
                .map(|_| {
                    BoxSpec::new(SizeMetrics::new(10.0, 80.0, 0.0), SizeMetrics::fixed(10.0)).with_current_size(30.0, 10.0)
                })
                .collect()
        };
        let config = CombiConfig::row().with_control_child_size(Axis::Horizontal, false);

        let mut boxes = make();
        let mut layout = CombiLayout::new(config.clone()).with_container_size(DVec2::new(70.0, 100.0));
        layout.arrange(&mut boxes);
        assert_eq!(layout.lines().len(), 2);

        let mut boxes = make();
        let mut layout = CombiLayout::new(config.with_wrap_basis(WrapBasis::Resolved))
            .with_container_size(DVec2::new(70.0, 100.0));
        layout.arrange(&mut boxes);
        assert_eq!(layout.lines().len(), 1);
        assert_bounds(boxes.bounds(1), 30.0, 0.0, 30.0, 10.0);
    }

    #[test]
    fn test_ignored_children_are_skipped() {
        let mut boxes: BoxSet = vec![
            BoxSpec::fixed(20.0, 20.0),
            BoxSpec::fixed(500.0, 500.0).ignored().with_bounds(Bounds::new(999.0, 999.0, 1.0, 1.0)),
            BoxSpec::fixed(20.0, 20.0),
        ]
        .into_iter()
        .collect();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(100.0, 100.0));

        let width = layout.measure(&mut boxes, Axis::Horizontal);

        assert!(approx(width.preferred, 40.0));
        assert_eq!(layout.line_partition(), vec![vec![0, 2]]);
        assert_bounds(boxes.bounds(1), 999.0, 999.0, 1.0, 1.0);
        assert_bounds(boxes.bounds(2), 20.0, 0.0, 20.0, 20.0);
    }

    #[test]
    fn test_zero_children() {
        let mut boxes = BoxSet::new();
        let config = CombiConfig::row().with_padding(Padding::uniform(8.0));
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 100.0));

        assert_eq!(layout.measure(&mut boxes, Axis::Horizontal), SizeMetrics::ZERO);
        assert_eq!(layout.measure(&mut boxes, Axis::Vertical), SizeMetrics::ZERO);
        assert!(layout.lines().is_empty());
        assert_eq!(layout.phase(), LayoutPhase::Clean);
    }

    #[test]
    fn test_clean_layout_is_memoized() {
        let mut boxes = row_boxes();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(140.0, 200.0));
        layout.arrange(&mut boxes);
        let arranged = boxes.clone();

        if let Some(spec) = boxes.get_mut(0) {
            spec.bounds = Bounds::new(-1.0, -1.0, 0.0, 0.0);
        }
        layout.arrange(&mut boxes);
        assert_bounds(boxes.bounds(0), -1.0, -1.0, 0.0, 0.0);

        layout.invalidate();
        layout.arrange(&mut boxes);
        assert_eq!(boxes, arranged);
    }

    #[test]
    fn test_setters_only_invalidate_on_change() {
        let mut boxes = row_boxes();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(140.0, 200.0));
        layout.arrange(&mut boxes);

        layout.set_spacing(0.0);
        layout.set_spacing(-3.0);
        layout.set_wrap(true);
        layout.set_container_size(DVec2::new(140.0005, 200.0));
        assert_eq!(layout.phase(), LayoutPhase::Clean);

        layout.set_spacing(4.0);
        assert_eq!(layout.phase(), LayoutPhase::Dirty);
        layout.arrange(&mut boxes);

        layout.set_container_size(DVec2::new(300.0, 200.0));
        assert!(layout.is_dirty());
        layout.arrange(&mut boxes);

        layout.set_force_expand(Axis::Vertical, true);
        assert!(layout.is_dirty());
    }

    #[test]
    fn test_pushed_box_is_laid_out() {
        let mut boxes: BoxSet = (0..2).map(|_| BoxSpec::fixed(30.0, 10.0)).collect();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(200.0, 100.0));
        layout.arrange(&mut boxes);
        assert_eq!(layout.phase(), LayoutPhase::Clean);

        boxes.push(BoxSpec::fixed(30.0, 10.0).with_bounds(Bounds::new(-5.0, -5.0, 30.0, 10.0)));
        layout.arrange(&mut boxes);

        assert_eq!(layout.line_partition(), vec![vec![0, 1, 2]]);
        assert_bounds(boxes.bounds(2), 60.0, 0.0, 30.0, 10.0);
        assert!(approx(layout.measure(&mut boxes, Axis::Horizontal).preferred, 90.0));
        assert_eq!(layout.phase(), LayoutPhase::Clean);
    }

    #[test]
    fn test_excluded_box_triggers_relayout() {
        let mut boxes: BoxSet = (0..3).map(|_| BoxSpec::fixed(30.0, 10.0)).collect();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(200.0, 100.0));
        assert!(approx(layout.measure(&mut boxes, Axis::Horizontal).preferred, 90.0));

        if let Some(spec) = boxes.get_mut(0) {
            spec.ignore_layout = true;
        }

        assert!(approx(layout.measure(&mut boxes, Axis::Horizontal).preferred, 60.0));
        assert_eq!(layout.line_partition(), vec![vec![1, 2]]);
        assert_bounds(boxes.bounds(1), 0.0, 0.0, 30.0, 10.0);
    }

    #[test]
    fn test_invalidation_during_cycle_is_deferred() {
        let mut boxes = row_boxes();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(140.0, 200.0));

        layout.measure_axis(&boxes, Axis::Horizontal);
        layout.arrange_axis(&mut boxes, Axis::Horizontal);
        layout.invalidate();
        assert_eq!(layout.phase(), LayoutPhase::ArrangingHorizontal);

        layout.measure_axis(&boxes, Axis::Vertical);
        layout.arrange_axis(&mut boxes, Axis::Vertical);
        assert_eq!(layout.phase(), LayoutPhase::Dirty);

        layout.arrange(&mut boxes);
        assert_eq!(layout.phase(), LayoutPhase::Clean);
    }

    #[test]
    fn test_orientation_change_relayouts() {
        let mut boxes: BoxSet = (0..3).map(|_| BoxSpec::fixed(30.0, 20.0)).collect();
        let mut layout = CombiLayout::new(CombiConfig::row()).with_container_size(DVec2::new(200.0, 200.0));
        layout.arrange(&mut boxes);
        assert_bounds(boxes.bounds(2), 60.0, 0.0, 30.0, 20.0);

        layout.set_orientation(Orientation::Column);
        layout.arrange(&mut boxes);
        assert_bounds(boxes.bounds(2), 0.0, 40.0, 30.0, 20.0);
    }

    #[test]
    fn test_negative_inner_extent_is_clamped() {
        let mut boxes: BoxSet = (0..3)
            .map(|_| BoxSpec::new(SizeMetrics::new(5.0, 30.0, 0.0), SizeMetrics::fixed(10.0)))
            .collect();
        let config = CombiConfig::row().with_padding(Padding::symmetric(60.0, 0.0));
        let mut layout = CombiLayout::new(config).with_container_size(DVec2::new(100.0, 100.0));

        layout.arrange(&mut boxes);

        // No room to wrap against: one line, everything at min.
        assert_eq!(layout.lines().len(), 1);
        assert!(approx(boxes.bounds(0).width, 5.0));
        assert!(approx(boxes.bounds(0).x, 60.0));
    }
}
