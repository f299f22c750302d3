//! Layout trees of nested containers.
//!
//! Containers inside a tree only talk to each other through the size
//! contract: a child container reports its aggregate size upwards, and its
//! parent pushes a final rect downwards. A cycle runs four global passes in
//! order:
//!
//! 1. measure horizontal, children before parents;
//! 2. arrange horizontal, parents before children;
//! 3. measure vertical, children before parents;
//! 4. arrange vertical, parents before children.
//!
//! Vertical measurement happens after widths are assigned, so content whose
//! height depends on its width (wrapped text, wrapping rows) reports the
//! right height. A container that is resized by its parent mid-cycle has
//! already been measured at its old size; it finishes the cycle dirty and the
//! tree runs another cycle until everything settles.

use glam::DVec2;
use indexmap::IndexMap;

use combi_core::{Axis, Bounds, CombiConfig, LayoutError, LayoutNodeId, LayoutResult, SizeMetrics};

use crate::engine::CombiLayout;
use crate::provider::{LayoutChildren, SizeProvider};
use crate::text::TextContent;

/// Cycles [`LayoutTree::layout`] runs before giving up on settling.
pub const MAX_LAYOUT_CYCLES: usize = 4;

/// What a leaf contains.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafContent {
    /// Declared metrics per axis
    Metrics { width: SizeMetrics, height: SizeMetrics },
    /// Text whose height depends on its width
    Text(TextContent),
}

impl LeafContent {
    fn size_metrics(&self, axis: Axis, bounds: &Bounds) -> SizeMetrics {
        match self {
            LeafContent::Metrics { width, height } => match axis {
                Axis::Horizontal => *width,
                Axis::Vertical => *height,
            },
            LeafContent::Text(text) => text.size_metrics(axis, bounds.width),
        }
    }
}

/// Leaf or container.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf(LeafContent),
    /// Arranges its children with a [`CombiLayout`] owned by the tree
    Container,
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// Unique ID for this node
    pub id: LayoutNodeId,
    /// Optional name for debugging
    pub name: Option<String>,
    /// Rect relative to the parent
    pub bounds: Bounds,
    /// Rect in tree coordinates
    pub absolute_bounds: Bounds,
    /// Parent node ID (None for roots)
    pub parent: Option<LayoutNodeId>,
    /// Child node IDs
    pub children: Vec<LayoutNodeId>,
    /// Excluded from its parent's layout
    pub ignore_layout: bool,
    pub kind: NodeKind,
    /// Aggregate size a container reported in its last measure pass
    reported: [SizeMetrics; 2],
}

impl LayoutNode {
    pub fn new(id: LayoutNodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            bounds: Bounds::default(),
            absolute_bounds: Bounds::default(),
            parent: None,
            children: Vec::new(),
            ignore_layout: false,
            kind,
            reported: [SizeMetrics::ZERO; 2],
        }
    }

    /// A leaf with declared metrics.
    pub fn leaf(id: LayoutNodeId, width: SizeMetrics, height: SizeMetrics) -> Self {
        Self::new(id, NodeKind::Leaf(LeafContent::Metrics { width, height }))
    }

    /// A text leaf.
    pub fn text(id: LayoutNodeId, content: TextContent) -> Self {
        Self::new(id, NodeKind::Leaf(LeafContent::Text(content)))
    }

    /// A container node.
    pub fn container(id: LayoutNodeId) -> Self {
        Self::new(id, NodeKind::Container)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Exclude the node from its parent's layout.
    pub fn ignored(mut self) -> Self {
        self.ignore_layout = true;
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }

    /// Layout metrics the node declares to its parent.
    fn declared_size(&self, axis: Axis) -> SizeMetrics {
        match &self.kind {
            NodeKind::Leaf(content) => content.size_metrics(axis, &self.bounds),
            NodeKind::Container => self.reported[axis.index()],
        }
    }
}

/// A forest of layout nodes.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    /// All nodes, in insertion order
    nodes: IndexMap<LayoutNodeId, LayoutNode>,
    /// Engines of container nodes
    layouts: IndexMap<LayoutNodeId, CombiLayout>,
    /// Root node IDs
    roots: Vec<LayoutNodeId>,
    /// Counter for generating unique IDs
    next_id: u64,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique node ID.
    pub fn next_id(&mut self) -> LayoutNodeId {
        let id = LayoutNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, node: LayoutNode) -> LayoutNodeId {
        let id = node.id;
        if node.is_container() {
            self.layouts.entry(id).or_default();
        }
        self.nodes.insert(id, node);
        id
    }

    /// Add a root node.
    pub fn add_root(&mut self, mut node: LayoutNode) -> LayoutNodeId {
        node.parent = None;
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Add a node as the last child of a container.
    pub fn add_child(&mut self, parent_id: LayoutNodeId, mut node: LayoutNode) -> LayoutResult<LayoutNodeId> {
        self.ensure_container(parent_id)?;
        node.parent = Some(parent_id);
        let id = self.insert(node);

        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(id);
        }
        self.invalidate_container(parent_id);
        Ok(id)
    }

    /// Add a container node with its configuration.
    pub fn add_container(&mut self, parent_id: Option<LayoutNodeId>, config: CombiConfig) -> LayoutResult<LayoutNodeId> {
        let id = self.next_id();
        let node = LayoutNode::container(id);
        match parent_id {
            Some(parent_id) => self.add_child(parent_id, node)?,
            None => self.add_root(node),
        };
        self.container_mut(id)?.set_config(config);
        Ok(id)
    }

    /// Move a node under another container, as its last child.
    pub fn reparent(&mut self, child_id: LayoutNodeId, new_parent_id: LayoutNodeId) -> LayoutResult<()> {
        self.node(child_id)?;
        self.ensure_container(new_parent_id)?;
        if self.is_ancestor_or_self(child_id, new_parent_id) {
            return Err(LayoutError::CycleDetected {
                parent: new_parent_id,
                child: child_id,
            });
        }

        match self.nodes.get(&child_id).and_then(|node| node.parent) {
            Some(old_parent_id) => {
                if let Some(old_parent) = self.nodes.get_mut(&old_parent_id) {
                    old_parent.children.retain(|&id| id != child_id);
                }
                self.invalidate_container(old_parent_id);
            }
            None => self.roots.retain(|&id| id != child_id),
        }

        if let Some(child) = self.nodes.get_mut(&child_id) {
            child.parent = Some(new_parent_id);
        }
        if let Some(parent) = self.nodes.get_mut(&new_parent_id) {
            parent.children.push(child_id);
        }
        self.invalidate_container(new_parent_id);
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: LayoutNodeId, mut id: LayoutNodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(&id).and_then(|node| node.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn node(&self, id: LayoutNodeId) -> LayoutResult<&LayoutNode> {
        self.nodes.get(&id).ok_or(LayoutError::UnknownNode { node: id })
    }

    fn ensure_container(&self, id: LayoutNodeId) -> LayoutResult<()> {
        if self.node(id)?.is_container() {
            Ok(())
        } else {
            Err(LayoutError::NotAContainer { node: id })
        }
    }

    fn invalidate_container(&mut self, id: LayoutNodeId) {
        if let Some(layout) = self.layouts.get_mut(&id) {
            layout.invalidate();
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    ///
    /// Changing what a node declares does not notify the containers around
    /// it; call [`LayoutTree::mark_dirty`] afterwards.
    pub fn get_mut(&mut self, id: LayoutNodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(&id)
    }

    /// The engine of a container node.
    pub fn container(&self, id: LayoutNodeId) -> LayoutResult<&CombiLayout> {
        self.ensure_container(id)?;
        self.layouts.get(&id).ok_or(LayoutError::NotAContainer { node: id })
    }

    /// The engine of a container node, for configuration.
    pub fn container_mut(&mut self, id: LayoutNodeId) -> LayoutResult<&mut CombiLayout> {
        self.ensure_container(id)?;
        self.layouts.get_mut(&id).ok_or(LayoutError::NotAContainer { node: id })
    }

    /// Note that a node's declared size changed: its container (and the node
    /// itself, if it is one) needs a new cycle.
    pub fn mark_dirty(&mut self, id: LayoutNodeId) -> LayoutResult<()> {
        let parent = self.node(id)?.parent;
        self.invalidate_container(id);
        if let Some(parent) = parent {
            self.invalidate_container(parent);
        }
        Ok(())
    }

    /// Get the root nodes.
    pub fn roots(&self) -> &[LayoutNodeId] {
        &self.roots
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values()
    }

    /// Get children of a node.
    pub fn children(&self, id: LayoutNodeId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child_id| self.nodes.get(child_id))
    }

    /// Size a root node. This is the viewport a root container lays out in.
    pub fn set_root_size(&mut self, id: LayoutNodeId, size: DVec2) -> LayoutResult<()> {
        let node = self.nodes.get_mut(&id).ok_or(LayoutError::UnknownNode { node: id })?;
        node.bounds.width = size.x;
        node.bounds.height = size.y;
        if let Some(layout) = self.layouts.get_mut(&id) {
            layout.set_container_size(size);
        }
        Ok(())
    }

    /// Lay out the subtree under `root` until every container in it is clean.
    ///
    /// Returns the number of cycles run; zero when nothing was dirty.
    #[tracing::instrument(skip(self))]
    pub fn layout(&mut self, root: LayoutNodeId) -> LayoutResult<usize> {
        self.node(root)?;

        let mut post_order = Vec::new();
        self.collect_containers(root, &mut post_order);

        let mut cycles = 0;
        loop {
            self.sync_container_sizes(&post_order);
            if !post_order.iter().any(|id| self.layouts.get(id).is_some_and(CombiLayout::is_dirty)) {
                break;
            }
            if cycles == MAX_LAYOUT_CYCLES {
                tracing::warn!(cycles, "layout did not settle; remaining work deferred to the next call");
                break;
            }
            self.run_cycle(&post_order);
            cycles += 1;
        }

        self.compute_absolute_bounds();
        tracing::debug!(cycles, containers = post_order.len(), "tree layout complete");
        Ok(cycles)
    }

    fn collect_containers(&self, id: LayoutNodeId, order: &mut Vec<LayoutNodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for &child_id in &node.children {
            self.collect_containers(child_id, order);
        }
        if self.layouts.contains_key(&id) {
            order.push(id);
        }
    }

    /// Feed each container its current rect size.
    fn sync_container_sizes(&mut self, containers: &[LayoutNodeId]) {
        for id in containers {
            if let (Some(node), Some(layout)) = (self.nodes.get(id), self.layouts.get_mut(id)) {
                layout.set_container_size(node.bounds.size());
            }
        }
    }

    fn run_cycle(&mut self, post_order: &[LayoutNodeId]) {
        for axis in Axis::ALL {
            for &id in post_order {
                self.measure_container(id, axis);
            }
            for &id in post_order.iter().rev() {
                self.arrange_container(id, axis);
            }
        }
    }

    fn measure_container(&mut self, id: LayoutNodeId, axis: Axis) {
        let Some(children) = self.nodes.get(&id).map(|node| node.children.clone()) else {
            return;
        };
        let Some(layout) = self.layouts.get_mut(&id) else {
            return;
        };

        let view = ChildView { nodes: &mut self.nodes, children: &children };
        let reported = layout.measure_axis(&view, axis);

        if let Some(node) = self.nodes.get_mut(&id) {
            node.reported[axis.index()] = reported;
        }
    }

    fn arrange_container(&mut self, id: LayoutNodeId, axis: Axis) {
        let Some(children) = self.nodes.get(&id).map(|node| node.children.clone()) else {
            return;
        };
        let Some(layout) = self.layouts.get_mut(&id) else {
            return;
        };

        let mut view = ChildView { nodes: &mut self.nodes, children: &children };
        layout.arrange_axis(&mut view, axis);

        // Child containers pick up their new size right away; if it changed
        // they are mid-cycle, so the invalidation lands after this cycle.
        self.sync_container_sizes(&children);
    }

    /// Compute absolute bounds for all nodes.
    pub fn compute_absolute_bounds(&mut self) {
        for root_id in self.roots.clone() {
            self.compute_absolute_bounds_recursive(root_id, DVec2::ZERO);
        }
    }

    fn compute_absolute_bounds_recursive(&mut self, id: LayoutNodeId, origin: DVec2) {
        let (absolute, children) = {
            let Some(node) = self.nodes.get_mut(&id) else {
                return;
            };
            node.absolute_bounds = node.bounds.translated(origin);
            (node.absolute_bounds.position(), node.children.clone())
        };

        for child_id in children {
            self.compute_absolute_bounds_recursive(child_id, absolute);
        }
    }
}

/// The children of one container, seen through the size contract.
struct ChildView<'a> {
    nodes: &'a mut IndexMap<LayoutNodeId, LayoutNode>,
    children: &'a [LayoutNodeId],
}

impl ChildView<'_> {
    fn child(&self, child: usize) -> Option<&LayoutNode> {
        self.children.get(child).and_then(|id| self.nodes.get(id))
    }
}

impl SizeProvider for ChildView<'_> {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn current_size(&self, child: usize, axis: Axis) -> f64 {
        self.child(child).map_or(0.0, |node| node.bounds.extent(axis))
    }

    fn declared_size(&self, child: usize, axis: Axis) -> SizeMetrics {
        self.child(child).map_or(SizeMetrics::ZERO, |node| node.declared_size(axis))
    }

    fn participates(&self, child: usize) -> bool {
        self.child(child).is_some_and(|node| !node.ignore_layout)
    }
}

impl LayoutChildren for ChildView<'_> {
    fn set_child_along_axis(&mut self, child: usize, axis: Axis, offset: f64, size: f64) {
        let Some(id) = self.children.get(child) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds.set_along_axis(axis, offset, size);
        }
    }
}
