//! User-facing configuration: filtering, sizing, layout and table parsing.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Accepted range for `base_node_size`.
pub const BASE_NODE_SIZE_RANGE: (u32, u32) = (10, 30);
/// Accepted range for `size_multiplier`.
pub const SIZE_MULTIPLIER_RANGE: (u32, u32) = (1, 10);
/// Accepted range for `width_multiplier`.
pub const WIDTH_MULTIPLIER_RANGE: (f64, f64) = (0.5, 5.0);

/// Layout mode handed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Force-directed placement.
    #[default]
    Force,
    /// Layered, top-down placement.
    Hierarchy,
    /// Nodes placed on a circle.
    Circular,
}

/// Which module's nodes to keep. Serialized as `null` for every module or
/// the module name, so any module name can be selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ModuleFilter {
    /// Keep every node.
    #[default]
    All,
    /// Keep only nodes whose resolved module equals the name.
    Only(String),
}

impl ModuleFilter {
    /// Whether a node in `module` passes this filter.
    pub fn admits(&self, module: &str) -> bool {
        match self {
            ModuleFilter::All => true,
            ModuleFilter::Only(name) => name == module,
        }
    }
}

impl From<Option<String>> for ModuleFilter {
    fn from(value: Option<String>) -> Self {
        value.map_or(ModuleFilter::All, ModuleFilter::Only)
    }
}

impl From<&str> for ModuleFilter {
    fn from(value: &str) -> Self {
        ModuleFilter::Only(value.to_string())
    }
}

impl From<ModuleFilter> for Option<String> {
    fn from(value: ModuleFilter) -> Self {
        match value {
            ModuleFilter::All => None,
            ModuleFilter::Only(name) => Some(name),
        }
    }
}

impl fmt::Display for ModuleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleFilter::All => f.write_str("all modules"),
            ModuleFilter::Only(name) => write!(f, "module {name:?}"),
        }
    }
}

/// Per-render options chosen by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Layout mode for the rendering surface.
    pub layout: Layout,
    /// Node size before any weight contribution.
    pub base_node_size: u32,
    /// Show node labels; hidden labels render as empty strings.
    pub show_labels: bool,
    /// Grow nodes by `weight * size_multiplier`.
    pub size_by_weight: bool,
    pub size_multiplier: u32,
    /// Derive edge width from edge weight.
    pub width_by_weight: bool,
    pub width_multiplier: f64,
    pub module_filter: ModuleFilter,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Force,
            base_node_size: 20,
            show_labels: true,
            size_by_weight: false,
            size_multiplier: 3,
            width_by_weight: true,
            width_multiplier: 1.5,
            module_filter: ModuleFilter::All,
        }
    }
}

impl FilterConfig {
    /// Read a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: FilterConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values outside the documented option ranges.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = BASE_NODE_SIZE_RANGE;
        if !(lo..=hi).contains(&self.base_node_size) {
            return Err(GraphError::InvalidConfig(format!(
                "base_node_size {} not in [{lo}, {hi}]",
                self.base_node_size
            )));
        }
        let (lo, hi) = SIZE_MULTIPLIER_RANGE;
        if !(lo..=hi).contains(&self.size_multiplier) {
            return Err(GraphError::InvalidConfig(format!(
                "size_multiplier {} not in [{lo}, {hi}]",
                self.size_multiplier
            )));
        }
        let (lo, hi) = WIDTH_MULTIPLIER_RANGE;
        if !(lo..=hi).contains(&self.width_multiplier) {
            return Err(GraphError::InvalidConfig(format!(
                "width_multiplier {} not in [{lo}, {hi}]",
                self.width_multiplier
            )));
        }
        Ok(())
    }

    /// Rendering options that follow from this config.
    pub fn render_config(&self) -> RenderConfig {
        let hierarchical = self.layout == Layout::Hierarchy;
        RenderConfig {
            width: 1000,
            height: 700,
            directed: false,
            physics: true,
            hierarchical,
            stabilization_iterations: hierarchical.then_some(100),
            layout: self.layout,
        }
    }
}

/// Options consumed by the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    pub height: u32,
    /// Draw edges with arrow heads.
    pub directed: bool,
    pub physics: bool,
    /// Use a layered layout.
    pub hierarchical: bool,
    /// Physics stabilization iterations, when fixed.
    pub stabilization_iterations: Option<u32>,
    pub layout: Layout,
}

/// CSV parsing options shared by both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}
