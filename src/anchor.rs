//! Anchor identities: typed handles naming one view's edge or dimension
//!
//! Anchors carry no values. They exist only so constraints can say which
//! slot of which view they relate; the resolver matches on them structurally.

use crate::tree::ViewId;

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// What kind of value a slot holds: a position or an extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Location,
    Size,
}

/// One of the four per-view resolution slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub axis: Axis,
    pub attribute: Attribute,
}

impl Slot {
    pub const X: Slot = Slot {
        axis: Axis::Horizontal,
        attribute: Attribute::Location,
    };
    pub const Y: Slot = Slot {
        axis: Axis::Vertical,
        attribute: Attribute::Location,
    };
    pub const WIDTH: Slot = Slot {
        axis: Axis::Horizontal,
        attribute: Attribute::Size,
    };
    pub const HEIGHT: Slot = Slot {
        axis: Axis::Vertical,
        attribute: Attribute::Size,
    };

    /// All four slots in resolution order (x, y, width, height)
    pub const ALL: [Slot; 4] = [Slot::X, Slot::Y, Slot::WIDTH, Slot::HEIGHT];

    /// Stable index into per-view slot arrays
    pub fn index(&self) -> usize {
        match (self.axis, self.attribute) {
            (Axis::Horizontal, Attribute::Location) => 0,
            (Axis::Vertical, Attribute::Location) => 1,
            (Axis::Horizontal, Attribute::Size) => 2,
            (Axis::Vertical, Attribute::Size) => 3,
        }
    }

    /// The companion size slot on the same axis
    pub fn size_slot(&self) -> Slot {
        Slot {
            axis: self.axis,
            attribute: Attribute::Size,
        }
    }

    /// The companion location slot on the same axis
    pub fn location_slot(&self) -> Slot {
        Slot {
            axis: self.axis,
            attribute: Attribute::Location,
        }
    }

    /// Human-readable name used in diagnostics ("horizontal location" etc.)
    pub fn describe(&self) -> &'static str {
        match (self.axis, self.attribute) {
            (Axis::Horizontal, Attribute::Location) => "horizontal location",
            (Axis::Vertical, Attribute::Location) => "vertical location",
            (Axis::Horizontal, Attribute::Size) => "horizontal size",
            (Axis::Vertical, Attribute::Size) => "vertical size",
        }
    }
}

/// Which edge a location anchor names, axis-agnostic.
///
/// `Leading` is the left edge horizontally and the top edge vertically;
/// `Trailing` is right/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Leading,
    Center,
    Trailing,
}

/// The attribute an anchor names within its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Location(Edge),
    Size,
}

impl AnchorKind {
    pub fn attribute(&self) -> Attribute {
        match self {
            AnchorKind::Location(_) => Attribute::Location,
            AnchorKind::Size => Attribute::Size,
        }
    }
}

/// An identity-only handle to one `(view, axis, attribute)` slot.
///
/// Compared structurally; two anchors are the same anchor exactly when they
/// name the same view, axis, and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub view: ViewId,
    pub axis: Axis,
    pub kind: AnchorKind,
}

impl Anchor {
    fn new(view: ViewId, axis: Axis, kind: AnchorKind) -> Self {
        Self { view, axis, kind }
    }

    /// Left edge
    pub fn leading(view: ViewId) -> Self {
        Self::new(view, Axis::Horizontal, AnchorKind::Location(Edge::Leading))
    }

    /// Horizontal center
    pub fn center_x(view: ViewId) -> Self {
        Self::new(view, Axis::Horizontal, AnchorKind::Location(Edge::Center))
    }

    /// Right edge
    pub fn trailing(view: ViewId) -> Self {
        Self::new(view, Axis::Horizontal, AnchorKind::Location(Edge::Trailing))
    }

    /// Top edge
    pub fn top(view: ViewId) -> Self {
        Self::new(view, Axis::Vertical, AnchorKind::Location(Edge::Leading))
    }

    /// Vertical center
    pub fn center_y(view: ViewId) -> Self {
        Self::new(view, Axis::Vertical, AnchorKind::Location(Edge::Center))
    }

    /// Bottom edge
    pub fn bottom(view: ViewId) -> Self {
        Self::new(view, Axis::Vertical, AnchorKind::Location(Edge::Trailing))
    }

    pub fn width(view: ViewId) -> Self {
        Self::new(view, Axis::Horizontal, AnchorKind::Size)
    }

    pub fn height(view: ViewId) -> Self {
        Self::new(view, Axis::Vertical, AnchorKind::Size)
    }

    /// The resolution slot this anchor belongs to
    pub fn slot(&self) -> Slot {
        Slot {
            axis: self.axis,
            attribute: self.kind.attribute(),
        }
    }
}
