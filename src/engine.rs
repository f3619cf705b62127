//! The pass driver: runs one full layout pass over a view tree
//!
//! A pass is reset → rebuild → seed → converge → finalize, synchronous on the
//! caller's thread. Because the resolver answers "not yet" instead of failing
//! when a dependency is missing, whole-tree walks are repeated until one
//! completes with every slot resolved, bounded by the configured iteration
//! cap. Unresolvable views are reported and logged (once per distinct
//! occurrence); the rest of the tree still finalizes.

use std::collections::HashSet;

use crate::anchor::Slot;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::resolver::Resolver;
use crate::tree::{ViewId, ViewTree};

/// Lazy constraint construction: invoked for every dirty view whose rebuild
/// flag is set, before any resolution happens. Implementations may freely add
/// and remove constraints on the tree they are handed.
pub trait ConstraintBuilder {
    fn rebuild(&mut self, tree: &mut ViewTree, view: ViewId);
}

/// No-op builder for trees whose constraints are fully built up front
impl ConstraintBuilder for () {
    fn rebuild(&mut self, _tree: &mut ViewTree, _view: ViewId) {}
}

/// Why a view's slot could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The slot's constraint list is empty: a configuration bug
    MissingConstraints,
    /// Constraints exist but the set never closes: a cycle or a dependency
    /// that itself never resolves
    Unclosed,
    /// A constraint target outside the superview/subview/sibling set reached
    /// the resolver (the tree changed after the constraint was added)
    InvalidTarget,
}

/// The first view/slot a pass gave up on
#[derive(Debug, Clone, PartialEq)]
pub struct PassFailure {
    pub view: ViewId,
    pub slot: Slot,
    pub kind: FailureKind,
}

/// Outcome of one `process` call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassReport {
    /// Whole-tree resolution walks performed; 0 when nothing was dirty
    pub iterations: u32,
    /// Dirty views whose frames were finalized
    pub views_laid_out: usize,
    /// Set when the iteration cap was hit or an invariant was violated
    pub failure: Option<PassFailure>,
    /// Views that finished the pass with an unresolved slot and kept their
    /// previous frame
    pub frame_errors: Vec<LayoutError>,
}

impl PassReport {
    /// Whether every dirty view resolved and finalized cleanly
    pub fn converged(&self) -> bool {
        self.failure.is_none() && self.frame_errors.is_empty()
    }
}

enum WalkOutcome {
    Complete,
    Unresolved(ViewId, Slot),
    Invalid(ViewId, Slot, LayoutError),
}

/// Runs layout passes. Owns the configuration and the log-deduplication set,
/// so each distinct failure is logged exactly once over the engine's lifetime
/// no matter how many frames re-encounter it.
#[derive(Debug, Default)]
pub struct Layout {
    config: LayoutConfig,
    reported: HashSet<String>,
}

impl Layout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            reported: HashSet::new(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run one layout pass with no rebuild hook
    pub fn process(&mut self, tree: &mut ViewTree) -> PassReport {
        self.process_with(tree, &mut ())
    }

    /// Run one layout pass. Idempotent: when nothing is dirty the call
    /// returns immediately with a zero-iteration report.
    pub fn process_with(
        &mut self,
        tree: &mut ViewTree,
        builder: &mut dyn ConstraintBuilder,
    ) -> PassReport {
        if !tree.any_needs_layout() {
            return PassReport::default();
        }

        Self::rebuild_constraints(tree, builder);
        Self::prepare(tree);
        Self::seed_root(tree);

        let order = post_order(tree);
        let (iterations, failure) = self.converge(tree, &order);
        let (views_laid_out, frame_errors) = self.finalize(tree, &order);
        tree.layout_needed = false;

        PassReport {
            iterations,
            views_laid_out,
            failure,
            frame_errors,
        }
    }

    /// Phase one of a pass: give every dirty view flagged for rebuild a
    /// chance to regenerate its constraints. Public so the rebuild and
    /// resolve phases can be exercised independently.
    pub fn rebuild_constraints(tree: &mut ViewTree, builder: &mut dyn ConstraintBuilder) {
        let pending: Vec<ViewId> = tree
            .ids()
            .filter(|&id| {
                let node = tree.node(id);
                node.needs_layout && node.needs_rebuild
            })
            .collect();
        for id in pending {
            tree.node_mut(id).needs_rebuild = false;
            builder.rebuild(tree, id);
        }
    }

    /// Drop cached values and sort constraint lists for every dirty view.
    /// Clean views keep last pass's values so their neighbors can still
    /// resolve against them.
    fn prepare(tree: &mut ViewTree) {
        for id in tree.ids().collect::<Vec<_>>() {
            if tree.node(id).needs_layout {
                tree.cache.reset(id);
                tree.node_mut(id).constraints.sort_if_needed();
            }
        }
    }

    /// Ground the root's four slots in the actual window size so the tree
    /// has something to recurse toward. The root is never derived from
    /// constraints.
    fn seed_root(tree: &mut ViewTree) {
        let root = tree.root();
        let bounds = tree.bounds(root);
        tree.cache.set(root, Slot::X, bounds.x);
        tree.cache.set(root, Slot::Y, bounds.y);
        tree.cache.set(root, Slot::WIDTH, bounds.width);
        tree.cache.set(root, Slot::HEIGHT, bounds.height);
    }

    /// Repeat whole-tree walks until one resolves everything or the cap is
    /// hit. Returns the walk count and the first still-unresolved slot, if
    /// any; failures are logged once per distinct occurrence.
    fn converge(&mut self, tree: &mut ViewTree, order: &[ViewId]) -> (u32, Option<PassFailure>) {
        let mut iterations = 0;
        loop {
            iterations += 1;
            let (nodes, cache) = tree.split_resolution();
            let mut resolver = Resolver::new(nodes, cache);

            let mut outcome = WalkOutcome::Complete;
            'walk: for &id in order {
                for slot in Slot::ALL {
                    match resolver.resolve(id, slot) {
                        Ok(Some(_)) => {}
                        Ok(None) => {
                            outcome = WalkOutcome::Unresolved(id, slot);
                            break 'walk;
                        }
                        Err(err) => {
                            outcome = WalkOutcome::Invalid(id, slot, err);
                            break 'walk;
                        }
                    }
                }
            }

            match outcome {
                WalkOutcome::Complete => return (iterations, None),
                WalkOutcome::Unresolved(view, slot) => {
                    if iterations >= self.config.max_iterations {
                        let name = tree.display_name(view);
                        let what = slot.describe();
                        let kind = if tree.constraints(view, slot).is_empty() {
                            self.error_once(format!(
                                "layout failed after {iterations} iterations: \
                                 {name} has 0 {what} constraints"
                            ));
                            FailureKind::MissingConstraints
                        } else {
                            self.error_once(format!(
                                "layout failed after {iterations} iterations: \
                                 {name} failed to resolve {what}"
                            ));
                            FailureKind::Unclosed
                        };
                        return (iterations, Some(PassFailure { view, slot, kind }));
                    }
                }
                WalkOutcome::Invalid(view, slot, err) => {
                    // Deterministic invariant violation: iterating won't help
                    self.error_once(format!("layout aborted: {err}"));
                    return (
                        iterations,
                        Some(PassFailure {
                            view,
                            slot,
                            kind: FailureKind::InvalidTarget,
                        }),
                    );
                }
            }
        }
    }

    /// Write each dirty view's snapped rectangle to its frame. A view with
    /// any unresolved slot keeps its previous frame rather than receiving
    /// partial data, and is reported.
    fn finalize(&mut self, tree: &mut ViewTree, order: &[ViewId]) -> (usize, Vec<LayoutError>) {
        let scale = self.config.interface_scale;
        let mut views_laid_out = 0;
        let mut frame_errors = Vec::new();

        let root = tree.root();
        for &id in order {
            if !tree.node(id).needs_layout {
                continue;
            }
            if id == root {
                // The root's frame is input, not output
                tree.node_mut(id).needs_layout = false;
                views_laid_out += 1;
                continue;
            }
            match Self::resolved_frame(tree, id) {
                Ok(frame) => {
                    tree.node_mut(id).frame = frame.snapped(scale);
                }
                Err(err) => {
                    self.error_once(err.to_string());
                    frame_errors.push(err);
                }
            }
            tree.node_mut(id).needs_layout = false;
            views_laid_out += 1;
        }

        (views_laid_out, frame_errors)
    }

    fn resolved_frame(tree: &ViewTree, view: ViewId) -> Result<Rect, LayoutError> {
        let component = |slot: Slot| {
            tree.cache
                .get(view, slot)
                .ok_or_else(|| LayoutError::UnresolvedFrame {
                    view: tree.display_name(view),
                    slot,
                })
        };
        Ok(Rect::new(
            component(Slot::X)?,
            component(Slot::Y)?,
            component(Slot::WIDTH)?,
            component(Slot::HEIGHT)?,
        ))
    }

    fn error_once(&mut self, message: String) {
        if self.reported.insert(message.clone()) {
            log::error!("{message}");
        }
    }
}

/// Children before parents; the resolver memoizes, so ordering is a
/// performance concern, not a correctness one
fn post_order(tree: &ViewTree) -> Vec<ViewId> {
    fn visit(tree: &ViewTree, view: ViewId, out: &mut Vec<ViewId>) {
        for &child in tree.children(view) {
            visit(tree, child, out);
        }
        out.push(view);
    }
    let mut order = Vec::with_capacity(tree.len());
    visit(tree, tree.root(), &mut order);
    order
}
