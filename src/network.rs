//! The full pipeline: tables -> module colors -> nodes -> edges -> stats.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::classify::{classify_modules, legend, LegendEntry, ModuleColorMap, PALETTE};
use crate::config::{FilterConfig, TableOptions};
use crate::edges::{build_edges, GraphEdge};
use crate::error::Result;
use crate::loader::{LoadedTables, TableCache};
use crate::nodes::{build_nodes, GraphNode, NodeLookup};
use crate::stats::NetworkStats;

/// Whether a built network has anything to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No node passed the filter.
    NoNodes,
    /// Nodes exist but no edge connects two of them.
    NoEdges,
    /// Nodes and edges are present.
    Ready,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoNodes => f.write_str("no nodes match the current filter"),
            Outcome::NoEdges => f.write_str("no edges match the current filter"),
            Outcome::Ready => f.write_str("ready"),
        }
    }
}

/// Details shown for a selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetail {
    pub id: String,
    pub label: String,
    /// Module, when the node table has a module column.
    pub module: Option<String>,
    pub size: f64,
    /// Built edges touching this node at either end.
    pub connections: usize,
}

/// A built, styled graph and everything the presentation layer needs.
#[derive(Debug, Clone)]
pub struct Network {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub lookup: NodeLookup,
    /// Module colors, for the legend.
    pub colors: ModuleColorMap,
    /// The node table had a module column.
    pub has_module: bool,
    pub stats: NetworkStats,
}

impl Network {
    /// Run every stage over already loaded tables.
    pub fn build(tables: &LoadedTables, config: &FilterConfig) -> Self {
        let colors = classify_modules(&tables.nodes, &PALETTE);
        debug!("classified {} modules", colors.len());

        let built = build_nodes(&tables.nodes, &colors, config);
        let edges = build_edges(&tables.edges, &built.lookup, &colors, tables.nodes.has_module, config);
        let stats = NetworkStats::compute(built.nodes.len(), edges.len());

        Self {
            nodes: built.nodes,
            edges,
            lookup: built.lookup,
            colors,
            has_module: tables.nodes.has_module,
            stats,
        }
    }

    /// Whether there is anything to draw.
    pub fn outcome(&self) -> Outcome {
        if self.nodes.is_empty() {
            Outcome::NoNodes
        } else if self.edges.is_empty() {
            Outcome::NoEdges
        } else {
            Outcome::Ready
        }
    }

    /// Detail panel contents for a node, or `None` for unknown ids.
    pub fn select(&self, id: &str) -> Option<NodeDetail> {
        let meta = self.lookup.get(id)?;
        let connections = self
            .edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .count();
        Some(NodeDetail {
            id: id.to_string(),
            label: meta.label.clone(),
            module: self.has_module.then(|| meta.module.clone()),
            size: meta.size,
            connections,
        })
    }

    /// Legend rows for `config`'s module filter.
    pub fn legend(&self, config: &FilterConfig) -> Vec<LegendEntry> {
        legend(&self.colors, &config.module_filter)
    }
}

/// Re-runs the pipeline per render, reusing parsed tables between renders.
#[derive(Debug, Default)]
pub struct Session {
    cache: TableCache,
}

impl Session {
    /// New session with its own table cache.
    pub fn new(options: TableOptions) -> Self {
        Self { cache: TableCache::new(options) }
    }

    /// Load (or reuse) the tables.
    pub fn tables(&mut self, nodes_path: &Path, edges_path: &Path) -> Result<Arc<LoadedTables>> {
        self.cache.load(nodes_path, edges_path)
    }

    /// Validate `config`, load the tables and build the network.
    pub fn render(&mut self, nodes_path: &Path, edges_path: &Path, config: &FilterConfig) -> Result<Network> {
        config.validate()?;
        let tables = self.tables(nodes_path, edges_path)?;
        Ok(Network::build(&tables, config))
    }
}
