//! Error types for the layout engine

use thiserror::Error;

use crate::anchor::Slot;
use crate::tree::ViewId;

/// Errors that can occur while building constraints or finalizing frames.
///
/// Everything here is recoverable at the pass level: a failed operation is
/// rejected (or the offending view keeps its previous frame) and the rest of
/// the tree proceeds.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Source and target anchors name different (axis, attribute) pairs
    #[error("mismatched anchors: {source_anchor} cannot be constrained to {target}")]
    MismatchedAnchors {
        source_anchor: &'static str,
        target: &'static str,
    },

    /// A constraint targeting its own view can never resolve
    #[error("view {view} cannot be constrained to itself")]
    SelfTarget { view: String },

    /// Target is neither the superview, a subview, nor a sibling
    #[error(
        "view {view} cannot be constrained to {target}: \
         targets must be the superview, a subview, or a sibling"
    )]
    UnsupportedTarget { view: String, target: String },

    /// Location constraints only support superview and sibling targets;
    /// a subview lives in a different coordinate space
    #[error("location of {view} cannot be constrained to its subview {target}")]
    SubviewLocationTarget { view: String, target: String },

    /// A `ViewId` that does not belong to this tree
    #[error("unknown view id {0:?}")]
    UnknownView(ViewId),

    /// A view finished the pass with at least one slot unresolved, so its
    /// frame was left untouched
    #[error("view {view} failed to find {}", slot.describe())]
    UnresolvedFrame { view: String, slot: Slot },
}

impl LayoutError {
    pub(crate) fn mismatched(source: Slot, target: Slot) -> Self {
        Self::MismatchedAnchors {
            source_anchor: source.describe(),
            target: target.describe(),
        }
    }
}
