//! Configuration for the layout engine

use serde::Deserialize;

/// Configuration options for layout passes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Device pixels per layout point; resolved frames are snapped onto the
    /// `1 / interface_scale` grid
    pub interface_scale: f32,

    /// Maximum whole-tree resolution walks before a pass gives up and
    /// reports its first unresolved view
    pub max_iterations: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            interface_scale: 1.0,
            max_iterations: 1000,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interface scale
    pub fn with_interface_scale(mut self, scale: f32) -> Self {
        self.interface_scale = scale;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }
}
