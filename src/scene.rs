//! Scene files: declarative TOML descriptions of a view tree
//!
//! A scene names a window size, a list of views (parents declared before
//! their children), and each view's constraints. `Scene::build` turns the
//! description into a ready-to-process `ViewTree`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::anchor::Anchor;
use crate::config::LayoutConfig;
use crate::constraint::{Constraint, Priority};
use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::tree::{ViewId, ViewTree};

/// Errors that can occur when loading or building a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("view {0:?} is declared more than once")]
    DuplicateView(String),
    #[error("view {view:?} references unknown view {reference:?}")]
    UnknownReference { view: String, reference: String },
    #[error("view {view:?} has an invalid anchor {anchor:?}")]
    UnknownAnchor { view: String, anchor: String },
    #[error("view {view:?} has an invalid priority {priority:?}")]
    UnknownPriority { view: String, priority: String },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A parsed scene description
#[derive(Debug, Clone)]
pub struct Scene {
    window: TomlWindow,
    config: LayoutConfig,
    views: Vec<TomlView>,
}

/// The name scene files use to target the root view
pub const WINDOW: &str = "window";

#[derive(Debug, Clone, Deserialize)]
struct TomlScene {
    window: TomlWindow,
    #[serde(default)]
    config: LayoutConfig,
    #[serde(default)]
    views: Vec<TomlView>,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlWindow {
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlView {
    name: String,
    /// Defaults to the window
    parent: Option<String>,
    #[serde(default)]
    constraints: Vec<TomlConstraint>,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlConstraint {
    anchor: String,
    /// `"view.anchor"`; absent means an absolute constraint
    target: Option<String>,
    #[serde(default)]
    constant: f32,
    #[serde(default = "default_multiplier")]
    multiplier: f32,
    priority: Option<String>,
}

fn default_multiplier() -> f32 {
    1.0
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let parsed: TomlScene = toml::from_str(content)?;
        Ok(Scene {
            window: parsed.window,
            config: parsed.config,
            views: parsed.views,
        })
    }

    /// The layout configuration the scene requested (defaults apply when the
    /// file has no `[config]` table)
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Build the view tree this scene describes
    pub fn build(&self) -> Result<ViewTree, SceneError> {
        let mut tree = ViewTree::new(Rect::new(0.0, 0.0, self.window.width, self.window.height));
        let mut ids: HashMap<&str, ViewId> = HashMap::new();
        ids.insert(WINDOW, tree.root());

        for view in &self.views {
            if ids.contains_key(view.name.as_str()) {
                return Err(SceneError::DuplicateView(view.name.clone()));
            }
            let parent = match &view.parent {
                Some(parent) => *ids.get(parent.as_str()).ok_or_else(|| {
                    SceneError::UnknownReference {
                        view: view.name.clone(),
                        reference: parent.clone(),
                    }
                })?,
                None => tree.root(),
            };
            let id = tree.add_view_named(parent, &view.name)?;
            ids.insert(&view.name, id);
        }

        for view in &self.views {
            let id = ids[view.name.as_str()];
            for entry in &view.constraints {
                let source = parse_anchor(id, &entry.anchor)
                    .ok_or_else(|| SceneError::UnknownAnchor {
                        view: view.name.clone(),
                        anchor: entry.anchor.clone(),
                    })?;

                let mut constraint = match &entry.target {
                    None => Constraint::fixed(source, entry.constant),
                    Some(reference) => {
                        let target = parse_target(&ids, reference).ok_or_else(|| {
                            SceneError::UnknownReference {
                                view: view.name.clone(),
                                reference: reference.clone(),
                            }
                        })?;
                        Constraint::scaled(source, target, entry.multiplier, entry.constant)
                    }
                };
                if let Some(priority) = &entry.priority {
                    constraint = constraint.with_priority(parse_priority(priority).ok_or_else(
                        || SceneError::UnknownPriority {
                            view: view.name.clone(),
                            priority: priority.clone(),
                        },
                    )?);
                }
                tree.add_constraint(constraint)?;
            }
        }

        Ok(tree)
    }
}

fn parse_anchor(view: ViewId, name: &str) -> Option<Anchor> {
    let anchor = match name {
        "leading" | "left" => Anchor::leading(view),
        "center-x" => Anchor::center_x(view),
        "trailing" | "right" => Anchor::trailing(view),
        "top" => Anchor::top(view),
        "center-y" => Anchor::center_y(view),
        "bottom" => Anchor::bottom(view),
        "width" => Anchor::width(view),
        "height" => Anchor::height(view),
        _ => return None,
    };
    Some(anchor)
}

/// Splits `"view.anchor"` and resolves both halves
fn parse_target(ids: &HashMap<&str, ViewId>, reference: &str) -> Option<Anchor> {
    let (view, anchor) = reference.rsplit_once('.')?;
    parse_anchor(*ids.get(view)?, anchor)
}

fn parse_priority(name: &str) -> Option<Priority> {
    let priority = match name {
        "trivial" => Priority::Trivial,
        "low" => Priority::Low,
        "default" => Priority::Default,
        "high" => Priority::High,
        "required" => Priority::Required,
        _ => return None,
    };
    Some(priority)
}
