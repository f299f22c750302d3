//! Plain boxes owned by a container.

use combi_core::{Axis, Bounds, SizeMetrics};

use crate::provider::{LayoutChildren, SizeProvider};

/// A layout slot: declared metrics per axis plus the geometry it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpec {
    /// Declared metrics on the horizontal axis
    pub width: SizeMetrics,
    /// Declared metrics on the vertical axis
    pub height: SizeMetrics,
    /// Current geometry, relative to the container
    pub bounds: Bounds,
    /// Excluded from layout; geometry is left as is
    pub ignore_layout: bool,
}

impl BoxSpec {
    /// Create a box. Its current size starts at the preferred size.
    pub fn new(width: SizeMetrics, height: SizeMetrics) -> Self {
        Self {
            width,
            height,
            bounds: Bounds::new(0.0, 0.0, width.preferred, height.preferred),
            ignore_layout: false,
        }
    }

    /// A rigid box of the given size.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self::new(SizeMetrics::fixed(width), SizeMetrics::fixed(height))
    }

    pub fn with_width(mut self, width: SizeMetrics) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: SizeMetrics) -> Self {
        self.height = height;
        self
    }

    pub fn with_current_size(mut self, width: f64, height: f64) -> Self {
        self.bounds.width = width;
        self.bounds.height = height;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Exclude the box from layout.
    pub fn ignored(mut self) -> Self {
        self.ignore_layout = true;
        self
    }

    /// Declared metrics on an axis.
    pub fn metrics(&self, axis: Axis) -> SizeMetrics {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// An ordered list of boxes that a [`crate::CombiLayout`] can arrange.
///
/// The container notices boxes being added, removed or excluded on its next
/// `measure` or `arrange`. Changing a box's metrics does not notify it; call
/// [`crate::CombiLayout::invalidate`] afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxSet {
    boxes: Vec<BoxSpec>,
}

impl BoxSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spec: BoxSpec) {
        self.boxes.push(spec);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoxSpec> {
        self.boxes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BoxSpec> {
        self.boxes.get_mut(index)
    }

    /// Geometry of a box, or empty bounds for an unknown index.
    pub fn bounds(&self, index: usize) -> Bounds {
        self.boxes.get(index).map(|spec| spec.bounds).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxSpec> {
        self.boxes.iter()
    }
}

impl From<Vec<BoxSpec>> for BoxSet {
    fn from(boxes: Vec<BoxSpec>) -> Self {
        Self { boxes }
    }
}

impl FromIterator<BoxSpec> for BoxSet {
    fn from_iter<I: IntoIterator<Item = BoxSpec>>(iter: I) -> Self {
        Self { boxes: iter.into_iter().collect() }
    }
}

impl SizeProvider for BoxSet {
    fn child_count(&self) -> usize {
        self.boxes.len()
    }

    fn current_size(&self, child: usize, axis: Axis) -> f64 {
        self.bounds(child).extent(axis)
    }

    fn declared_size(&self, child: usize, axis: Axis) -> SizeMetrics {
        self.boxes
            .get(child)
            .map(|spec| spec.metrics(axis))
            .unwrap_or_default()
    }

    fn participates(&self, child: usize) -> bool {
        self.boxes.get(child).is_some_and(|spec| !spec.ignore_layout)
    }
}

impl LayoutChildren for BoxSet {
    fn set_child_along_axis(&mut self, child: usize, axis: Axis, offset: f64, size: f64) {
        if let Some(spec) = self.boxes.get_mut(child) {
            spec.bounds.set_along_axis(axis, offset, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_spec_defaults_to_preferred_size() {
        let spec = BoxSpec::new(SizeMetrics::new(5.0, 40.0, 1.0), SizeMetrics::new(2.0, 12.0, 0.0));
        assert_eq!(spec.bounds, Bounds::new(0.0, 0.0, 40.0, 12.0));
        assert!(!spec.ignore_layout);

        let spec = BoxSpec::fixed(1.0, 1.0).with_width(SizeMetrics::new(0.0, 8.0, 2.0));
        assert_eq!(spec.metrics(Axis::Horizontal), SizeMetrics::new(0.0, 8.0, 2.0));
        assert_eq!(spec.metrics(Axis::Vertical), SizeMetrics::fixed(1.0));
    }

    #[test]
    fn test_box_set_provider() {
        let mut boxes: BoxSet = vec![BoxSpec::fixed(10.0, 20.0), BoxSpec::fixed(30.0, 40.0).ignored()].into();

        assert_eq!(boxes.child_count(), 2);
        assert!(boxes.participates(0));
        assert!(!boxes.participates(1));
        assert!(!boxes.participates(5));
        assert_eq!(boxes.declared_size(1, Axis::Vertical), SizeMetrics::fixed(40.0));
        assert_eq!(boxes.declared_size(9, Axis::Vertical), SizeMetrics::ZERO);

        boxes.set_child_along_axis(0, Axis::Horizontal, 7.0, 11.0);
        assert_eq!(boxes.bounds(0), Bounds::new(7.0, 0.0, 11.0, 20.0));
        assert!((boxes.current_size(0, Axis::Horizontal) - 11.0).abs() < 0.001);
    }
}
