//! The contract between a container and the boxes it lays out.
//!
//! A container never looks at the content behind a box. It reads sizes
//! through [`SizeProvider`] and pushes final geometry back through
//! [`LayoutChildren`], so anything that can answer those questions (a list of
//! plain boxes, a subtree of nested containers) can be laid out.

use combi_core::{Axis, SizeMetrics};

/// Read access to the boxes of a container.
///
/// Implementations must be pure within one layout pass: the engine queries
/// the same box several times and relies on getting identical answers.
pub trait SizeProvider {
    /// Number of boxes, including ones that do not participate.
    fn child_count(&self) -> usize;

    /// Size the box currently has on an axis.
    fn current_size(&self, child: usize, axis: Axis) -> f64;

    /// Layout metrics the box declares on an axis.
    fn declared_size(&self, child: usize, axis: Axis) -> SizeMetrics;

    /// Whether the box takes part in layout at all.
    fn participates(&self, _child: usize) -> bool {
        true
    }
}

/// Write access for pushing arranged geometry back to the boxes.
pub trait LayoutChildren: SizeProvider {
    /// Set a box's offset and size along one axis, relative to the container.
    fn set_child_along_axis(&mut self, child: usize, axis: Axis, offset: f64, size: f64);
}

/// Metrics of a box on an axis under the container's child-size rules.
///
/// When the container does not control the size, the box is rigid at its
/// current size. `force_expand` lifts the flexible weight to at least 1.
pub fn child_size<P>(provider: &P, child: usize, axis: Axis, control: bool, force_expand: bool) -> SizeMetrics
where
    P: SizeProvider + ?Sized,
{
    let declared = if control {
        provider.declared_size(child, axis)
    } else {
        SizeMetrics::fixed(provider.current_size(child, axis))
    };

    let mut metrics = declared.sanitized();
    if force_expand {
        metrics.flexible = metrics.flexible.max(1.0);
    }
    metrics
}

/// Indices of the boxes that take part in layout, in order.
pub fn participating_children<P>(provider: &P) -> Vec<usize>
where
    P: SizeProvider + ?Sized,
{
    (0..provider.child_count())
        .filter(|&child| provider.participates(child))
        .collect()
}
