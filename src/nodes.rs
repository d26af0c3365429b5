//! Node building: raw node rows to styled graph nodes plus an id lookup.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::{ModuleColorMap, DEFAULT_MODULE, DEFAULT_NODE_COLOR};
use crate::config::{FilterConfig, ModuleFilter};
use crate::loader::{NodeTable, RawNodeRecord};
use crate::numeric::parse_numeric_or_default;

/// Node glyph. Only dots are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    /// Filled circle.
    #[default]
    Dot,
}

/// A styled node ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    /// Label text; empty when labels are hidden.
    pub display_label: String,
    /// `base + weight * multiplier`; below the base only for negative weights.
    pub size: f64,
    pub color: String,
    pub module: String,
    pub shape: NodeShape,
}

/// Per-node details kept for edge coloring and the selection panel.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMeta {
    pub module: String,
    /// Resolved label, independent of label visibility.
    pub label: String,
    pub size: f64,
}

/// Id to metadata for every built node. Repeated ids keep the last row.
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    entries: HashMap<String, NodeMeta>,
}

impl NodeLookup {
    /// Whether `id` belongs to the built node set.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Metadata for `id`.
    pub fn get(&self, id: &str) -> Option<&NodeMeta> {
        self.entries.get(id)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no node was built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of [`build_nodes`].
#[derive(Debug, Clone, Default)]
pub struct BuiltNodes {
    /// One node per surviving row, in table order.
    pub nodes: Vec<GraphNode>,
    pub lookup: NodeLookup,
}

/// Build styled nodes from the node table. Rows outside the module filter
/// are skipped. The filter only applies when the table has a module column.
pub fn build_nodes(table: &NodeTable, colors: &ModuleColorMap, config: &FilterConfig) -> BuiltNodes {
    if !table.has_module && config.module_filter != ModuleFilter::All {
        warn!("filter on {} ignored: node table has no module column", config.module_filter);
    }

    let built: Vec<(GraphNode, NodeMeta)> = table
        .rows
        .par_iter()
        .filter_map(|row| build_node(row, table, colors, config))
        .collect();

    let mut lookup = NodeLookup { entries: HashMap::with_capacity(built.len()) };
    let mut nodes = Vec::with_capacity(built.len());
    for (node, meta) in built {
        lookup.entries.insert(node.id.clone(), meta);
        nodes.push(node);
    }

    debug!("built {} nodes from {} rows", nodes.len(), table.rows.len());
    BuiltNodes { nodes, lookup }
}

fn build_node(
    row: &RawNodeRecord,
    table: &NodeTable,
    colors: &ModuleColorMap,
    config: &FilterConfig,
) -> Option<(GraphNode, NodeMeta)> {
    let id = row.id.clone();
    let label = row.label.clone().unwrap_or_else(|| id.clone());
    let module = match (table.has_module, row.module.as_deref()) {
        (true, Some(m)) => m.to_string(),
        _ => DEFAULT_MODULE.to_string(),
    };

    if table.has_module && !config.module_filter.admits(&module) {
        return None;
    }

    let size = node_size(row.weight.as_deref(), table.has_weight, config);
    let color = if table.has_module {
        colors.get(&module).unwrap_or(DEFAULT_NODE_COLOR)
    } else {
        DEFAULT_NODE_COLOR
    };

    let node = GraphNode {
        id,
        display_label: if config.show_labels { label.clone() } else { String::new() },
        size,
        color: color.to_string(),
        module: module.clone(),
        shape: NodeShape::Dot,
    };
    Some((node, NodeMeta { module, label, size }))
}

/// Base size, plus `weight * size_multiplier` when sizing by weight and the
/// weight parses to a finite number.
pub fn node_size(weight: Option<&str>, has_weight: bool, config: &FilterConfig) -> f64 {
    let base = f64::from(config.base_node_size);
    if !(config.size_by_weight && has_weight) {
        return base;
    }
    let weight = parse_numeric_or_default(weight, 0.0);
    if !weight.is_finite() {
        return base;
    }
    base + weight * f64::from(config.size_multiplier)
}
