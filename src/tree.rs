//! The view hierarchy: a flat arena of nodes addressed by index
//!
//! Views are stored in one `Vec`; parents, children, anchors, and constraints
//! all refer to each other through `ViewId` indices, never references. The
//! tree owns each view's constraint store and resolution cache, plus the
//! dirty flags the pass driver reads.

use crate::anchor::{Attribute, Slot};
use crate::constraint::{Constraint, ConstraintStore};
use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::resolver::ResolutionCache;

/// Index of a view in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(usize);

impl ViewId {
    /// Construct from a raw index. Only useful for tests and diagnostics;
    /// real ids come from `ViewTree::add_view`.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// How a constraint target relates to the constrained view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Target is the view's parent
    Superview,
    /// Target is one of the view's children
    Subview,
    /// Target shares the view's parent
    Sibling,
    /// Anything else; unsupported for constraints
    Unrelated,
}

#[derive(Debug, Clone)]
pub(crate) struct ViewNode {
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,
    pub(crate) constraints: ConstraintStore,
    pub(crate) frame: Rect,
    pub(crate) needs_layout: bool,
    pub(crate) needs_rebuild: bool,
    pub(crate) name: Option<String>,
}

impl ViewNode {
    fn new(parent: Option<ViewId>, name: Option<String>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            constraints: ConstraintStore::new(),
            frame: Rect::zero(),
            needs_layout: true,
            needs_rebuild: true,
            name,
        }
    }
}

/// A strictly tree-shaped view hierarchy with one root
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    root: ViewId,
    pub(crate) cache: ResolutionCache,
    /// Set whenever any view is marked dirty; cleared by the pass driver
    pub(crate) layout_needed: bool,
}

impl ViewTree {
    /// Create a tree whose root (the window-equivalent element) has the given
    /// frame. The root's four values are seeded from this frame each pass
    /// rather than derived from constraints.
    pub fn new(root_frame: Rect) -> Self {
        let mut root_node = ViewNode::new(None, None);
        root_node.frame = root_frame;
        Self {
            nodes: vec![root_node],
            root: ViewId(0),
            cache: ResolutionCache::with_capacity(1),
            layout_needed: true,
        }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every view id, root first, in creation order
    pub fn ids(&self) -> impl Iterator<Item = ViewId> {
        (0..self.nodes.len()).map(ViewId)
    }

    /// Append a child view under `parent`
    pub fn add_view(&mut self, parent: ViewId) -> Result<ViewId, LayoutError> {
        self.insert(parent, None)
    }

    /// Append a named child view; the name only appears in diagnostics
    pub fn add_view_named(
        &mut self,
        parent: ViewId,
        name: impl Into<String>,
    ) -> Result<ViewId, LayoutError> {
        self.insert(parent, Some(name.into()))
    }

    fn insert(&mut self, parent: ViewId, name: Option<String>) -> Result<ViewId, LayoutError> {
        self.check(parent)?;
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode::new(Some(parent), name));
        self.nodes[parent.0].children.push(id);
        self.cache.grow_to(self.nodes.len());
        self.layout_needed = true;
        Ok(id)
    }

    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(view.0).and_then(|node| node.parent)
    }

    pub fn children(&self, view: ViewId) -> &[ViewId] {
        self.nodes
            .get(view.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn name(&self, view: ViewId) -> Option<&str> {
        self.nodes.get(view.0).and_then(|node| node.name.as_deref())
    }

    /// Diagnostic label: the view's name if it has one, plus its index
    pub fn display_name(&self, view: ViewId) -> String {
        match self.name(view) {
            Some(name) => format!("{}(#{})", name, view.0),
            None => format!("view#{}", view.0),
        }
    }

    /// The view's resolved rectangle in its parent's coordinate space
    pub fn frame(&self, view: ViewId) -> Rect {
        self.nodes.get(view.0).map(|node| node.frame).unwrap_or_default()
    }

    /// The view's frame with a zero origin
    pub fn bounds(&self, view: ViewId) -> Rect {
        self.frame(view).bounds()
    }

    pub fn needs_layout(&self, view: ViewId) -> bool {
        self.nodes.get(view.0).is_some_and(|node| node.needs_layout)
    }

    /// Whether any view in the tree is waiting for a layout pass
    pub fn any_needs_layout(&self) -> bool {
        self.layout_needed
    }

    /// Resize the root (window) frame. Marks the tree dirty only when the
    /// frame actually changes, so repeated calls stay idempotent.
    pub fn set_root_frame(&mut self, frame: Rect) {
        let root = self.root;
        if self.nodes[root.0].frame != frame {
            self.nodes[root.0].frame = frame;
            self.set_needs_layout(root);
        }
    }

    /// How `target` relates to `view` for constraint purposes
    pub fn relationship(&self, view: ViewId, target: ViewId) -> Relationship {
        if self.parent(view) == Some(target) {
            Relationship::Superview
        } else if self.parent(target) == Some(view) {
            Relationship::Subview
        } else if self.parent(view).is_some() && self.parent(view) == self.parent(target) {
            Relationship::Sibling
        } else {
            Relationship::Unrelated
        }
    }

    /// Add a constraint to its source view's store.
    ///
    /// Rejects mismatched anchor pairs, self-targets, targets outside the
    /// superview/subview/sibling set, and subview targets on location
    /// constraints (a subview lives in a different coordinate space). On
    /// success the owner and, transitively, every view whose layout might
    /// depend on it are marked dirty.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), LayoutError> {
        let owner = constraint.source.view;
        self.check(owner)?;

        if let Some(target) = constraint.target {
            self.check(target.view)?;
            if target.view == owner {
                return Err(LayoutError::SelfTarget {
                    view: self.display_name(owner),
                });
            }
            let source_slot = constraint.source.slot();
            if source_slot != target.slot() {
                return Err(LayoutError::mismatched(source_slot, target.slot()));
            }
            match self.relationship(owner, target.view) {
                Relationship::Superview | Relationship::Sibling => {}
                Relationship::Subview => {
                    if source_slot.attribute == Attribute::Location {
                        return Err(LayoutError::SubviewLocationTarget {
                            view: self.display_name(owner),
                            target: self.display_name(target.view),
                        });
                    }
                }
                Relationship::Unrelated => {
                    return Err(LayoutError::UnsupportedTarget {
                        view: self.display_name(owner),
                        target: self.display_name(target.view),
                    });
                }
            }
        }

        self.nodes[owner.0].constraints.push(constraint);
        self.set_needs_layout(owner);
        Ok(())
    }

    /// Remove every constraint feeding one of `view`'s four slots
    pub fn remove_constraints(&mut self, view: ViewId, slot: Slot) -> Result<(), LayoutError> {
        self.check(view)?;
        self.nodes[view.0].constraints.remove_all(slot);
        self.set_needs_layout(view);
        Ok(())
    }

    /// Remove every constraint on `view`
    pub fn remove_all_constraints(&mut self, view: ViewId) -> Result<(), LayoutError> {
        self.check(view)?;
        self.nodes[view.0].constraints.clear();
        self.set_needs_layout(view);
        Ok(())
    }

    pub fn constraints(&self, view: ViewId, slot: Slot) -> &[Constraint] {
        self.nodes
            .get(view.0)
            .map(|node| node.constraints.list(slot))
            .unwrap_or(&[])
    }

    /// Mark `view` dirty and flood the mark through the constraint graph:
    /// every view it targets, and every view constrained to a newly dirtied
    /// view, so the whole dependency cluster re-resolves together. The
    /// already-dirty check bounds the recursion.
    pub fn set_needs_layout(&mut self, view: ViewId) {
        if view.0 >= self.nodes.len() || self.nodes[view.0].needs_layout {
            return;
        }
        self.nodes[view.0].needs_layout = true;
        self.layout_needed = true;

        let targets: Vec<ViewId> = self.nodes[view.0].constraints.targets().collect();
        for target in targets {
            self.set_needs_layout(target);
        }

        let dependents: Vec<ViewId> = self
            .ids()
            .filter(|&other| {
                self.nodes[other.0]
                    .constraints
                    .targets()
                    .any(|target| target == view)
            })
            .collect();
        for dependent in dependents {
            self.set_needs_layout(dependent);
        }
    }

    /// Request the lazy constraint-construction hook for this view on the
    /// next pass
    pub fn set_needs_rebuild(&mut self, view: ViewId) {
        if let Some(node) = self.nodes.get_mut(view.0) {
            node.needs_rebuild = true;
            self.set_needs_layout(view);
        }
    }

    fn check(&self, view: ViewId) -> Result<(), LayoutError> {
        if view.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(LayoutError::UnknownView(view))
        }
    }

    pub(crate) fn node(&self, view: ViewId) -> &ViewNode {
        &self.nodes[view.0]
    }

    pub(crate) fn node_mut(&mut self, view: ViewId) -> &mut ViewNode {
        &mut self.nodes[view.0]
    }

    /// Split into the node slice and the resolution cache so the resolver can
    /// read constraints while writing cache entries
    pub(crate) fn split_resolution(&mut self) -> (&[ViewNode], &mut ResolutionCache) {
        (&self.nodes, &mut self.cache)
    }
}
