//! Rendering surface: hands the styled network to Graphviz via DOT.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use petgraph::dot::{Config, Dot};
use petgraph::graph::Graph;
use petgraph::{Directed, EdgeType, Undirected};
use tracing::info;

use crate::config::{Layout, RenderConfig};
use crate::edges::GraphEdge;
use crate::error::{GraphError, Result};
use crate::network::Network;
use crate::nodes::{GraphNode, NodeShape};

/// Something that can draw a network. Returns the id of a node the user
/// selected, if any.
pub trait GraphSurface {
    /// Draw `network` with `config`.
    fn draw(&self, network: &Network, config: &RenderConfig) -> Result<Option<String>>;
}

/// Writes a DOT file and optionally lays it out to a PNG with Graphviz.
#[derive(Debug, Clone)]
pub struct DotSurface {
    dot_path: PathBuf,
    image_path: Option<PathBuf>,
    open_image: bool,
    selection: Option<String>,
}

impl DotSurface {
    /// Surface writing DOT to `dot_path`.
    pub fn new(dot_path: impl Into<PathBuf>) -> Self {
        Self { dot_path: dot_path.into(), image_path: None, open_image: false, selection: None }
    }

    /// Also render an image with the layout's Graphviz engine.
    pub fn with_image(mut self, image_path: impl Into<PathBuf>, open: bool) -> Self {
        self.image_path = Some(image_path.into());
        self.open_image = open;
        self
    }

    /// Node to report as selected once drawn.
    pub fn with_selection(mut self, id: Option<String>) -> Self {
        self.selection = id;
        self
    }
}

impl GraphSurface for DotSurface {
    fn draw(&self, network: &Network, config: &RenderConfig) -> Result<Option<String>> {
        std::fs::write(&self.dot_path, to_dot(network, config))?;
        info!("wrote {}", self.dot_path.display());

        if let Some(image) = &self.image_path {
            render_image(&self.dot_path, image, config)?;
            info!("rendered {}", image.display());
            if self.open_image {
                open_image(image)?;
            }
        }

        Ok(self
            .selection
            .as_ref()
            .filter(|id| network.lookup.contains(id))
            .cloned())
    }
}

/// DOT text for the network. Directedness follows the render config.
pub fn to_dot(network: &Network, config: &RenderConfig) -> String {
    if config.directed {
        dot_text(&petgraph_of::<Directed>(network))
    } else {
        dot_text(&petgraph_of::<Undirected>(network))
    }
}

/// Copy the network into a petgraph graph. Repeated node ids all get a
/// vertex; edges attach to the last one.
pub fn petgraph_of<Ty: EdgeType>(network: &Network) -> Graph<GraphNode, GraphEdge, Ty> {
    let mut graph = Graph::with_capacity(network.nodes.len(), network.edges.len());
    let mut index = HashMap::with_capacity(network.nodes.len());

    for node in &network.nodes {
        let ix = graph.add_node(node.clone());
        index.insert(node.id.as_str(), ix);
    }
    for edge in &network.edges {
        if let (Some(&a), Some(&b)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
            graph.add_edge(a, b, edge.clone());
        }
    }
    graph
}

fn dot_text<Ty: EdgeType>(graph: &Graph<GraphNode, GraphEdge, Ty>) -> String {
    format!(
        "{:?}",
        Dot::with_attr_getters(
            graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, edge| edge_attributes(edge.weight()),
            &|_, (_, node)| node_attributes(node),
        )
    )
}

fn node_attributes(node: &GraphNode) -> String {
    let shape = match node.shape {
        NodeShape::Dot => "point",
    };
    // size is in canvas pixels; Graphviz wants inches
    format!(
        "shape={shape}, width={:.2}, color=\"{}\", xlabel=\"{}\", tooltip=\"{}\"",
        node.size / 72.0,
        node.color,
        escape(&node.display_label),
        escape(&node.id),
    )
}

fn edge_attributes(edge: &GraphEdge) -> String {
    format!("color=\"{}\", penwidth={}", edge.color, edge.width)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz layout engine for a layout mode.
pub fn graphviz_engine(layout: Layout) -> &'static str {
    match layout {
        Layout::Force => "fdp",
        Layout::Hierarchy => "dot",
        Layout::Circular => "circo",
    }
}

/// Lay out `dot_file` into a PNG at `output`.
pub fn render_image(dot_file: &Path, output: &Path, config: &RenderConfig) -> Result<()> {
    let engine = graphviz_engine(config.layout);
    let size = format!("-Gsize={},{}", f64::from(config.width) / 100.0, f64::from(config.height) / 100.0);

    let mut command = Command::new(engine);
    command.arg("-Tpng").arg(size);
    if config.hierarchical {
        command.arg("-Grankdir=TB");
    }
    let status = command
        .arg(dot_file)
        .arg("-o")
        .arg(output)
        .status()
        .map_err(|e| GraphError::Render(format!("failed to run {engine}: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(GraphError::Render(format!("{engine} exited with {status}")))
    }
}

/// Open a rendered image with the platform viewer.
pub fn open_image(path: &Path) -> Result<()> {
    let opener = match std::env::consts::OS {
        "windows" => "explorer",
        "macos" => "open",
        _ => "xdg-open",
    };

    Command::new(opener)
        .arg(path)
        .status()
        .map_err(|e| GraphError::Render(format!("failed to open {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::loader::{EdgeTable, LoadedTables, NodeTable, RawEdgeRecord, RawNodeRecord};

    fn network() -> Network {
        let tables = LoadedTables {
            nodes: NodeTable {
                has_module: true,
                has_weight: false,
                rows: vec![
                    RawNodeRecord { id: "1".into(), label: Some("Say \"hi\"".into()), module: Some("A".into()), weight: None },
                    RawNodeRecord { id: "2".into(), label: None, module: Some("B".into()), weight: None },
                ],
            },
            edges: EdgeTable {
                has_weight: true,
                rows: vec![RawEdgeRecord { source: "1".into(), target: "2".into(), weight: Some("3".into()) }],
            },
        };
        Network::build(&tables, &FilterConfig::default())
    }

    #[test]
    fn undirected_dot_output() {
        let network = network();
        let dot = to_dot(&network, &FilterConfig::default().render_config());
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("--"));
        assert!(dot.contains("penwidth=4.5"));
        assert!(dot.contains(r#"xlabel="Say \"hi\"""#));
        assert!(dot.contains("shape=point"));
    }

    #[test]
    fn directed_dot_output() {
        let mut config = FilterConfig::default().render_config();
        config.directed = true;
        let dot = to_dot(&network(), &config);
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn petgraph_copy_matches_counts() {
        let graph = petgraph_of::<Undirected>(&network());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn engines_per_layout() {
        assert_eq!(graphviz_engine(Layout::Force), "fdp");
        assert_eq!(graphviz_engine(Layout::Hierarchy), "dot");
        assert_eq!(graphviz_engine(Layout::Circular), "circo");
    }

    #[test]
    fn dot_surface_reports_known_selection_only() {
        let dir = tempfile::tempdir().unwrap();
        let network = network();
        let config = FilterConfig::default().render_config();

        let surface = DotSurface::new(dir.path().join("g.dot")).with_selection(Some("2".into()));
        assert_eq!(surface.draw(&network, &config).unwrap().as_deref(), Some("2"));
        assert!(dir.path().join("g.dot").exists());

        let surface = DotSurface::new(dir.path().join("g.dot")).with_selection(Some("9".into()));
        assert_eq!(surface.draw(&network, &config).unwrap(), None);
    }

    #[test]
    fn unwritable_dot_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DotSurface::new(dir.path().join("missing").join("g.dot"));
        let err = surface.draw(&network(), &FilterConfig::default().render_config()).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
