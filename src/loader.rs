//! Table loading: reads the node and edge CSV files into row structures.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TableOptions;
use crate::error::{GraphError, Result, TableKind};

/// One row of the node table. Empty cells read as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    /// Raw weight cell, parsed later with a fallback.
    #[serde(default)]
    pub weight: Option<String>,
}

/// One row of the edge table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub weight: Option<String>,
}

/// Parsed node table.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    /// Header row contains `module`.
    pub has_module: bool,
    pub has_weight: bool,
    pub rows: Vec<RawNodeRecord>,
}

/// Parsed edge table.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    pub has_weight: bool,
    pub rows: Vec<RawEdgeRecord>,
}

/// Both input tables, as read from disk.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub nodes: NodeTable,
    pub edges: EdgeTable,
}

impl LoadedTables {
    /// First `n` node rows, for the data-inspection view.
    pub fn node_preview(&self, n: usize) -> &[RawNodeRecord] {
        &self.nodes.rows[..n.min(self.nodes.rows.len())]
    }

    /// First `n` edge rows.
    pub fn edge_preview(&self, n: usize) -> &[RawEdgeRecord] {
        &self.edges.rows[..n.min(self.edges.rows.len())]
    }
}

const NODE_COLUMNS: &[&str] = &["id", "label"];
const EDGE_COLUMNS: &[&str] = &["source", "target"];

/// Load both tables. The node file is checked for existence first, then
/// the edge file, and only then is either parsed.
pub fn load_tables(
    nodes_path: impl AsRef<Path>,
    edges_path: impl AsRef<Path>,
    options: TableOptions,
) -> Result<LoadedTables> {
    let nodes_path = nodes_path.as_ref();
    let edges_path = edges_path.as_ref();

    ensure_exists(nodes_path, TableKind::Nodes)?;
    ensure_exists(edges_path, TableKind::Edges)?;

    let (headers, rows) =
        read_table::<RawNodeRecord>(nodes_path, TableKind::Nodes, NODE_COLUMNS, options)?;
    let nodes = NodeTable {
        has_module: has_column(&headers, "module"),
        has_weight: has_column(&headers, "weight"),
        rows,
    };
    info!("loaded node table: {} nodes from {}", nodes.rows.len(), nodes_path.display());

    let (headers, rows) =
        read_table::<RawEdgeRecord>(edges_path, TableKind::Edges, EDGE_COLUMNS, options)?;
    let edges = EdgeTable { has_weight: has_column(&headers, "weight"), rows };
    info!("loaded edge table: {} relations from {}", edges.rows.len(), edges_path.display());

    Ok(LoadedTables { nodes, edges })
}

fn ensure_exists(path: &Path, table: TableKind) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(GraphError::MissingFile { table, path: path.to_path_buf() })
    }
}

fn has_column(headers: &StringRecord, name: &str) -> bool {
    headers.iter().any(|h| h == name)
}

fn read_table<T: DeserializeOwned>(
    path: &Path,
    table: TableKind,
    required: &[&'static str],
    options: TableOptions,
) -> Result<(StringRecord, Vec<T>)> {
    let malformed = |source: csv::Error| GraphError::MalformedTable {
        table,
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_path(path)
        .map_err(malformed)?;

    let headers = reader.headers().map_err(malformed)?.clone();
    if let Some(column) = required.iter().copied().find(|c| !has_column(&headers, c)) {
        return Err(GraphError::MissingColumn { table, path: path.to_path_buf(), column });
    }

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(malformed)?;

    Ok((headers, rows))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self { modified: meta.modified().ok(), len: meta.len() })
    }
}

#[derive(Debug)]
struct CacheEntry {
    stamps: (FileStamp, FileStamp),
    tables: Arc<LoadedTables>,
}

/// Memoizes [`load_tables`] per pair of file locations. An entry is reused
/// until either file's modification time or length changes.
#[derive(Debug, Default)]
pub struct TableCache {
    options: TableOptions,
    entries: HashMap<(PathBuf, PathBuf), CacheEntry>,
}

impl TableCache {
    /// Empty cache with the given parsing options.
    pub fn new(options: TableOptions) -> Self {
        Self { options, entries: HashMap::new() }
    }

    /// Return the cached tables for this pair, reloading when stale.
    pub fn load(&mut self, nodes_path: &Path, edges_path: &Path) -> Result<Arc<LoadedTables>> {
        let key = (nodes_path.to_path_buf(), edges_path.to_path_buf());

        let stamps = match (FileStamp::of(nodes_path), FileStamp::of(edges_path)) {
            (Some(n), Some(e)) => (n, e),
            _ => {
                self.entries.remove(&key);
                // Produces the per-file MissingFile error.
                return load_tables(nodes_path, edges_path, self.options).map(Arc::new);
            }
        };

        if let Some(entry) = self.entries.get(&key) {
            if entry.stamps == stamps {
                debug!("table cache hit for {}", nodes_path.display());
                return Ok(Arc::clone(&entry.tables));
            }
            debug!("table cache entry for {} is stale", nodes_path.display());
        }

        let tables = Arc::new(load_tables(nodes_path, edges_path, self.options)?);
        self.entries.insert(key, CacheEntry { stamps, tables: Arc::clone(&tables) });
        Ok(tables)
    }

    /// Number of memoized table pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
