//! Anchorframe - constraint-based layout for view hierarchies
//!
//! Views are positioned by anchors (edges, centers, sizes) related to their
//! superview or siblings through prioritized constraints. A layout pass
//! resolves every dirty view's four frame components by memoized recursion
//! over the constraint graph, then snaps the results onto the device pixel
//! grid.
//!
//! # Example
//!
//! ```rust
//! use anchorframe::{Anchor, Constraint, Layout, LayoutConfig, Rect, ViewTree};
//!
//! let mut tree = ViewTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! let panel = tree.add_view(tree.root()).unwrap();
//! tree.add_constraint(Constraint::equal(Anchor::leading(panel), Anchor::leading(tree.root()))).unwrap();
//! tree.add_constraint(Constraint::equal(Anchor::top(panel), Anchor::top(tree.root()))).unwrap();
//! tree.add_constraint(Constraint::fixed(Anchor::width(panel), 200.0)).unwrap();
//! tree.add_constraint(Constraint::equal(Anchor::height(panel), Anchor::height(tree.root()))).unwrap();
//!
//! let report = Layout::new(LayoutConfig::default()).process(&mut tree);
//! assert!(report.converged());
//! assert_eq!(tree.frame(panel), Rect::new(0.0, 0.0, 200.0, 600.0));
//! ```

pub mod anchor;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod geometry;
mod resolver;
pub mod scene;
pub mod tree;

pub use anchor::{Anchor, AnchorKind, Attribute, Axis, Edge, Slot};
pub use config::LayoutConfig;
pub use constraint::{Constraint, ConstraintStore, Priority};
pub use engine::{ConstraintBuilder, FailureKind, Layout, PassFailure, PassReport};
pub use error::LayoutError;
pub use geometry::Rect;
pub use scene::{Scene, SceneError};
pub use tree::{Relationship, ViewId, ViewTree};
