//! Builds a styled relationship network from a node table and an edge table.
//!
//! Stages run in order: [`loader`] reads the CSV files, [`classify`] colors
//! modules, [`nodes`] and [`edges`] build the styled graph, and [`stats`]
//! summarizes it. [`network`] ties the stages together and [`render`] hands
//! the result to Graphviz.

pub mod classify;
pub mod config;
pub mod edges;
pub mod error;
pub mod loader;
pub mod network;
pub mod nodes;
pub mod numeric;
pub mod render;
pub mod sample;
pub mod stats;

pub use classify::{classify_modules, legend, LegendEntry, ModuleColorMap, PALETTE};
pub use config::{FilterConfig, Layout, ModuleFilter, RenderConfig, TableOptions};
pub use edges::{build_edges, GraphEdge};
pub use error::{GraphError, Result, TableKind};
pub use loader::{load_tables, LoadedTables, RawEdgeRecord, RawNodeRecord, TableCache};
pub use network::{Network, NodeDetail, Outcome, Session};
pub use nodes::{build_nodes, BuiltNodes, GraphNode, NodeLookup, NodeMeta, NodeShape};
pub use numeric::{parse_numeric, parse_numeric_or_default};
pub use render::{DotSurface, GraphSurface};
pub use stats::{Metric, NetworkStats};
