use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relation_graph::sample::{generate_tables, SampleSpec};
use relation_graph::{
    DotSurface, FilterConfig, GraphSurface, Layout, ModuleFilter, Network, Outcome, Session,
    TableOptions,
};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "relation-graph", about = "Relationship network builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the network from two CSV tables and draw it.
    Render {
        /// Node table (id, label, optional module, weight)
        #[arg(long, default_value = "nodes.csv")]
        nodes: PathBuf,
        /// Edge table (source, target, optional weight)
        #[arg(long, default_value = "edges.csv")]
        edges: PathBuf,
        /// JSON config file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Field delimiter for both tables
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        #[arg(long, value_enum)]
        layout: Option<Layout>,
        #[arg(long)]
        base_node_size: Option<u32>,
        #[arg(long)]
        hide_labels: bool,
        #[arg(long)]
        size_by_weight: bool,
        #[arg(long)]
        size_multiplier: Option<u32>,
        #[arg(long)]
        no_width_by_weight: bool,
        #[arg(long)]
        width_multiplier: Option<f64>,
        /// Keep only this module (every module when omitted)
        #[arg(long)]
        module: Option<String>,
        /// DOT output path
        #[arg(long, default_value = "graph.dot")]
        dot: PathBuf,
        /// PNG output path (needs Graphviz)
        #[arg(long)]
        image: Option<PathBuf>,
        /// Open the image after rendering
        #[arg(long)]
        open: bool,
        /// Node id to show details for
        #[arg(long)]
        select: Option<String>,
        /// Print the first N rows of each table
        #[arg(long)]
        inspect: Option<usize>,
    },

    /// Write random demo tables.
    Generate {
        #[arg(long, default_value = "nodes.csv")]
        nodes: PathBuf,
        #[arg(long, default_value = "edges.csv")]
        edges: PathBuf,
        #[arg(long, default_value_t = 140)]
        node_count: usize,
        #[arg(long, default_value_t = 500)]
        edge_count: usize,
        #[arg(long, default_value_t = 5)]
        modules: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Commands::Generate { nodes, edges, node_count, edge_count, modules, seed } => {
            generate_tables(&nodes, &edges, SampleSpec { node_count, edge_count, modules, seed })?;
            println!("Wrote {} and {}", nodes.display(), edges.display());
        }
        Commands::Render {
            nodes,
            edges,
            config,
            delimiter,
            layout,
            base_node_size,
            hide_labels,
            size_by_weight,
            size_multiplier,
            no_width_by_weight,
            width_multiplier,
            module,
            dot,
            image,
            open,
            select,
            inspect,
        } => {
            // 1. Resolve options
            let mut filter = match config {
                Some(path) => FilterConfig::from_json_file(path)?,
                None => FilterConfig::default(),
            };
            if let Some(layout) = layout {
                filter.layout = layout;
            }
            if let Some(size) = base_node_size {
                filter.base_node_size = size;
            }
            if let Some(mult) = size_multiplier {
                filter.size_multiplier = mult;
            }
            if let Some(mult) = width_multiplier {
                filter.width_multiplier = mult;
            }
            if let Some(module) = module {
                filter.module_filter = ModuleFilter::Only(module);
            }
            filter.show_labels &= !hide_labels;
            filter.size_by_weight |= size_by_weight;
            filter.width_by_weight &= !no_width_by_weight;

            let delimiter = u8::try_from(delimiter)
                .map_err(|_| anyhow::anyhow!("delimiter must be a single-byte character"))?;

            // 2. Build the network; load failures stop here
            let mut session = Session::new(TableOptions { delimiter });
            let network = session.render(&nodes, &edges, &filter)?;

            if let Some(n) = inspect {
                let tables = session.tables(&nodes, &edges)?;
                println!("Node rows:");
                for row in tables.node_preview(n) {
                    println!("  {row:?}");
                }
                println!("Edge rows:");
                for row in tables.edge_preview(n) {
                    println!("  {row:?}");
                }
            }

            // 3. Draw, show legend and selection
            let outcome = network.outcome();
            if outcome == Outcome::Ready {
                let mut surface = DotSurface::new(dot).with_selection(select);
                if let Some(image) = image {
                    surface = surface.with_image(image, open);
                }
                match surface.draw(&network, &filter.render_config()) {
                    Ok(Some(id)) => print_selection(&network, &id),
                    Ok(None) => {}
                    Err(e) => {
                        warn!("rendering failed: {e}");
                        println!("Rendering failed: {e} (is Graphviz installed?)");
                    }
                }
                print_legend(&network, &filter);
            } else {
                println!("Nothing to draw: {outcome}");
            }

            // 4. Statistics
            if outcome == Outcome::Ready {
                let stats = network.stats;
                println!("Nodes:          {}", stats.node_count);
                println!("Edges:          {}", stats.edge_count);
                println!("Density:        {}", stats.density.display(3));
                println!("Average degree: {}", stats.average_degree.display(2));
            }
        }
    }

    Ok(())
}

fn print_selection(network: &Network, id: &str) {
    let Some(detail) = network.select(id) else { return };
    println!("Selected node: {}", detail.id);
    println!("  label: {}", detail.label);
    if let Some(module) = &detail.module {
        println!("  module: {module}");
    }
    println!("  connections: {}", detail.connections);
}

fn print_legend(network: &Network, filter: &FilterConfig) {
    println!("Legend:");
    for entry in network.legend(filter) {
        match entry.module {
            Some(module) => println!("  {} {module}", entry.color),
            None => println!("  {} all nodes", entry.color),
        }
    }
    println!("  thicker edges carry more weight");
}
