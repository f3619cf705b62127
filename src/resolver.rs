//! Constraint resolution: memoized, cycle-tolerant value computation
//!
//! One dispatch function keyed by `(view, slot)` replaces the four mutually
//! recursive resolve-x/y/width/height functions of a hand-split design: the
//! location and size formulas are axis-symmetric, so each is written once.
//! A resolution either returns a cached value, computes one from the view's
//! constraints (recursing into targets and, for sizes, subviews), or reports
//! "not yet resolvable" with `None` so the pass driver can try again on the
//! next whole-tree walk.

use std::collections::HashSet;

use crate::anchor::{AnchorKind, Attribute, Axis, Edge, Slot};
use crate::error::LayoutError;
use crate::tree::{Relationship, ViewId, ViewNode};

/// Per-view, per-pass resolved values: a side table indexed by `ViewId` with
/// one optional float per slot. Entries persist across passes; the driver
/// resets only the views marked dirty, so clean views keep supplying their
/// previous values to dirty neighbors.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolutionCache {
    slots: Vec<[Option<f32>; 4]>,
}

impl ResolutionCache {
    pub(crate) fn with_capacity(views: usize) -> Self {
        Self {
            slots: vec![[None; 4]; views],
        }
    }

    pub(crate) fn grow_to(&mut self, views: usize) {
        if self.slots.len() < views {
            self.slots.resize(views, [None; 4]);
        }
    }

    pub(crate) fn reset(&mut self, view: ViewId) {
        self.slots[view.index()] = [None; 4];
    }

    pub(crate) fn get(&self, view: ViewId, slot: Slot) -> Option<f32> {
        self.slots[view.index()][slot.index()]
    }

    pub(crate) fn set(&mut self, view: ViewId, slot: Slot, value: f32) {
        self.slots[view.index()][slot.index()] = Some(value);
    }
}

/// Resolves slots against an immutable node slice, writing into the cache.
///
/// The cycle guard is the explicit `in_flight` set: a slot already on the
/// call stack answers `None` instead of recursing, which is what keeps
/// circular constraint references from exploding. The guard covers all four
/// slots uniformly.
pub(crate) struct Resolver<'a> {
    nodes: &'a [ViewNode],
    cache: &'a mut ResolutionCache,
    in_flight: HashSet<(ViewId, Slot)>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(nodes: &'a [ViewNode], cache: &'a mut ResolutionCache) -> Self {
        Self {
            nodes,
            cache,
            in_flight: HashSet::new(),
        }
    }

    /// Resolve one slot of one view.
    ///
    /// `Ok(None)` means "not yet resolvable this attempt": a dependency is
    /// missing or the slot is part of a cycle. `Err` is reserved for
    /// constraint-graph invariant violations (a target outside the
    /// superview/subview/sibling set).
    pub(crate) fn resolve(
        &mut self,
        view: ViewId,
        slot: Slot,
    ) -> Result<Option<f32>, LayoutError> {
        if let Some(value) = self.cache.get(view, slot) {
            return Ok(Some(value));
        }
        if !self.in_flight.insert((view, slot)) {
            return Ok(None);
        }

        let result = match slot.attribute {
            Attribute::Location => self.resolve_location(view, slot.axis),
            Attribute::Size => self.resolve_size(view, slot.axis),
        };

        self.in_flight.remove(&(view, slot));
        if let Ok(Some(value)) = result {
            self.cache.set(view, slot, value);
        }
        result
    }

    /// The view's leading/top coordinate along `axis`, in its parent's space
    fn resolve_location(&mut self, view: ViewId, axis: Axis) -> Result<Option<f32>, LayoutError> {
        let slot = Slot {
            axis,
            attribute: Attribute::Location,
        };

        for constraint in self.node(view).constraints.list(slot) {
            let Some(target) = constraint.target else {
                // Absolute: the location is the constant directly
                return Ok(Some(constraint.constant));
            };
            let AnchorKind::Location(target_edge) = target.kind else {
                continue;
            };
            let Some(point) = self.target_point(view, target.view, target_edge, axis)? else {
                continue;
            };

            let AnchorKind::Location(source_edge) = constraint.source.kind else {
                continue;
            };
            let value = match source_edge {
                Edge::Leading => point + constraint.constant,
                Edge::Center => {
                    // The center sits at the target point plus the constant;
                    // needs the view's own size, which may not be ready yet
                    let Some(own_size) = self.resolve(view, slot.size_slot())? else {
                        continue;
                    };
                    point + constraint.constant - own_size / 2.0
                }
                Edge::Trailing => {
                    // Trailing constants are insets: the edge sits `constant`
                    // inside the target point
                    let Some(own_size) = self.resolve(view, slot.size_slot())? else {
                        continue;
                    };
                    point - constraint.constant - own_size
                }
            };
            return Ok(Some(value));
        }

        Ok(None)
    }

    /// The view's extent along `axis`
    fn resolve_size(&mut self, view: ViewId, axis: Axis) -> Result<Option<f32>, LayoutError> {
        let slot = Slot {
            axis,
            attribute: Attribute::Size,
        };

        for constraint in self.node(view).constraints.list(slot) {
            let Some(target) = constraint.target else {
                return Ok(Some(constraint.constant));
            };
            if target.kind != AnchorKind::Size {
                continue;
            }
            let Some(target_size) = self.resolve(target.view, slot)? else {
                continue;
            };
            return Ok(Some(target_size * constraint.multiplier + constraint.constant));
        }

        if let Some(value) = self.size_from_trailing_edge(view, axis)? {
            return Ok(Some(value));
        }
        self.size_from_subviews(view, axis)
    }

    /// Size fallback (a): a resolved location plus a trailing-edge location
    /// constraint pin both ends of the view, so the extent is their
    /// difference.
    fn size_from_trailing_edge(
        &mut self,
        view: ViewId,
        axis: Axis,
    ) -> Result<Option<f32>, LayoutError> {
        let location_slot = Slot {
            axis,
            attribute: Attribute::Location,
        };
        let Some(own_location) = self.resolve(view, location_slot)? else {
            return Ok(None);
        };

        let trailing = self
            .node(view)
            .constraints
            .list(location_slot)
            .iter()
            .find(|constraint| {
                constraint.source.kind == AnchorKind::Location(Edge::Trailing)
                    && constraint.target.is_some()
            })
            .copied();
        let Some(constraint) = trailing else {
            return Ok(None);
        };
        let Some(target) = constraint.target else {
            return Ok(None);
        };

        let extent = match target.kind {
            AnchorKind::Location(Edge::Trailing) => {
                self.trailing_extent(view, target.view, axis)?
            }
            AnchorKind::Location(Edge::Leading) => self.leading_extent(view, target.view, axis)?,
            _ => None,
        };
        Ok(extent.map(|extent| extent - own_location - constraint.constant))
    }

    /// Size fallback (b): auto-size to content, the farthest resolved
    /// trailing/bottom edge among the subviews. Subviews that fail to resolve
    /// this attempt are skipped rather than blocking the rest.
    fn size_from_subviews(&mut self, view: ViewId, axis: Axis) -> Result<Option<f32>, LayoutError> {
        let mut farthest: Option<f32> = None;
        for index in 0..self.node(view).children.len() {
            let child = self.node(view).children[index];
            if let Some(extent) = self.trailing_extent(view, child, axis)? {
                farthest = Some(match farthest {
                    Some(current) if current >= extent => current,
                    _ => extent,
                });
            }
        }
        Ok(farthest)
    }

    /// Position of `target`'s coordinate origin plus the given edge offset,
    /// expressed in `view`'s parent coordinate space. Supports superview and
    /// sibling targets; anything else violates the constraint-graph
    /// invariant.
    fn target_point(
        &mut self,
        view: ViewId,
        target: ViewId,
        edge: Edge,
        axis: Axis,
    ) -> Result<Option<f32>, LayoutError> {
        let location_slot = Slot {
            axis,
            attribute: Attribute::Location,
        };
        let origin = match self.relationship(view, target) {
            // The parent's interior starts at this view's coordinate origin
            Relationship::Superview => Some(0.0),
            Relationship::Sibling => self.resolve(target, location_slot)?,
            Relationship::Subview | Relationship::Unrelated => {
                return Err(self.unsupported_target(view, target));
            }
        };
        let Some(origin) = origin else {
            return Ok(None);
        };

        let value = match edge {
            Edge::Leading => Some(origin),
            Edge::Center => self
                .resolve(target, location_slot.size_slot())?
                .map(|size| origin + size / 2.0),
            Edge::Trailing => self
                .resolve(target, location_slot.size_slot())?
                .map(|size| origin + size),
        };
        Ok(value)
    }

    /// `target`'s trailing/bottom extent in `view`'s own coordinate space:
    /// the superview's extent is its size, a subview's or sibling's is its
    /// location plus size.
    fn trailing_extent(
        &mut self,
        view: ViewId,
        target: ViewId,
        axis: Axis,
    ) -> Result<Option<f32>, LayoutError> {
        let size_slot = Slot {
            axis,
            attribute: Attribute::Size,
        };
        match self.relationship(view, target) {
            Relationship::Superview => self.resolve(target, size_slot),
            Relationship::Subview | Relationship::Sibling => {
                let Some(location) = self.resolve(target, size_slot.location_slot())? else {
                    return Ok(None);
                };
                let Some(size) = self.resolve(target, size_slot)? else {
                    return Ok(None);
                };
                Ok(Some(location + size))
            }
            Relationship::Unrelated => Err(self.unsupported_target(view, target)),
        }
    }

    /// `target`'s leading/top extent for the size fallback. A superview
    /// target reports its size here as well: a trailing constraint against
    /// the parent pins against the far side of the parent's interior.
    fn leading_extent(
        &mut self,
        view: ViewId,
        target: ViewId,
        axis: Axis,
    ) -> Result<Option<f32>, LayoutError> {
        let size_slot = Slot {
            axis,
            attribute: Attribute::Size,
        };
        match self.relationship(view, target) {
            Relationship::Superview => self.resolve(target, size_slot),
            Relationship::Subview | Relationship::Sibling => {
                self.resolve(target, size_slot.location_slot())
            }
            Relationship::Unrelated => Err(self.unsupported_target(view, target)),
        }
    }

    fn node(&self, view: ViewId) -> &'a ViewNode {
        &self.nodes[view.index()]
    }

    fn relationship(&self, view: ViewId, target: ViewId) -> Relationship {
        let parent = self.node(view).parent;
        if parent == Some(target) {
            Relationship::Superview
        } else if self.node(target).parent == Some(view) {
            Relationship::Subview
        } else if parent.is_some() && parent == self.node(target).parent {
            Relationship::Sibling
        } else {
            Relationship::Unrelated
        }
    }

    fn unsupported_target(&self, view: ViewId, target: ViewId) -> LayoutError {
        let describe = |id: ViewId| match &self.node(id).name {
            Some(name) => format!("{}(#{})", name, id.index()),
            None => format!("view#{}", id.index()),
        };
        LayoutError::UnsupportedTarget {
            view: describe(view),
            target: describe(target),
        }
    }
}
