//! Edge building: raw edge rows to styled edges between built nodes.

use rayon::prelude::*;
use tracing::debug;

use crate::classify::{ModuleColorMap, DEFAULT_EDGE_COLOR};
use crate::config::FilterConfig;
use crate::loader::{EdgeTable, RawEdgeRecord};
use crate::nodes::NodeLookup;
use crate::numeric::parse_numeric;

/// Width used when an edge is not sized by weight.
pub const DEFAULT_EDGE_WIDTH: f64 = 2.0;
/// Smallest weighted edge width.
pub const MIN_EDGE_WIDTH: f64 = 1.0;
/// Largest weighted edge width.
pub const MAX_EDGE_WIDTH: f64 = 5.0;

/// A styled edge whose endpoints are both built nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Stroke width in `[1, 5]`.
    pub width: f64,
    /// Stroke color, taken from the source node's module.
    pub color: String,
}

/// Build edges in table order, dropping rows whose endpoints were not built.
/// `has_module` tells whether the node table had a module column.
pub fn build_edges(
    table: &EdgeTable,
    lookup: &NodeLookup,
    colors: &ModuleColorMap,
    has_module: bool,
    config: &FilterConfig,
) -> Vec<GraphEdge> {
    let edges: Vec<GraphEdge> = table
        .rows
        .par_iter()
        .filter_map(|row| build_edge(row, table.has_weight, lookup, colors, has_module, config))
        .collect();

    debug!(
        "built {} edges from {} rows ({} dropped)",
        edges.len(),
        table.rows.len(),
        table.rows.len() - edges.len()
    );
    edges
}

fn build_edge(
    row: &RawEdgeRecord,
    has_weight: bool,
    lookup: &NodeLookup,
    colors: &ModuleColorMap,
    has_module: bool,
    config: &FilterConfig,
) -> Option<GraphEdge> {
    if !lookup.contains(&row.source) || !lookup.contains(&row.target) {
        return None;
    }

    let width = if config.width_by_weight && has_weight {
        edge_width(row.weight.as_deref(), config.width_multiplier)
    } else {
        DEFAULT_EDGE_WIDTH
    };

    let color = if has_module {
        lookup
            .get(&row.source)
            .and_then(|meta| colors.get(&meta.module))
            .unwrap_or(DEFAULT_EDGE_COLOR)
    } else {
        DEFAULT_EDGE_COLOR
    };

    Some(GraphEdge {
        source: row.source.clone(),
        target: row.target.clone(),
        width,
        color: color.to_string(),
    })
}

/// `clamp(weight * multiplier, 1, 5)`, or the default width when the weight
/// does not parse.
pub fn edge_width(weight: Option<&str>, multiplier: f64) -> f64 {
    parse_numeric(weight).map_or(DEFAULT_EDGE_WIDTH, |w| {
        (w * multiplier).clamp(MIN_EDGE_WIDTH, MAX_EDGE_WIDTH)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_modules, PALETTE};
    use crate::config::ModuleFilter;
    use crate::loader::{NodeTable, RawNodeRecord};
    use crate::nodes::build_nodes;

    fn nodes(config: &FilterConfig) -> (NodeLookup, ModuleColorMap) {
        let table = NodeTable {
            has_module: true,
            has_weight: false,
            rows: [("1", Some("A")), ("2", Some("B")), ("3", None)]
                .into_iter()
                .map(|(id, module)| RawNodeRecord {
                    id: id.into(),
                    label: None,
                    module: module.map(Into::into),
                    weight: None,
                })
                .collect(),
        };
        let colors = classify_modules(&table, &PALETTE);
        (build_nodes(&table, &colors, config).lookup, colors)
    }

    fn edge(source: &str, target: &str, weight: Option<&str>) -> RawEdgeRecord {
        RawEdgeRecord { source: source.into(), target: target.into(), weight: weight.map(Into::into) }
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(edge_width(Some("3"), 1.5), 4.5);
        assert_eq!(edge_width(Some("100"), 1.5), 5.0);
        assert_eq!(edge_width(Some("-4"), 1.5), 1.0);
        assert_eq!(edge_width(Some("0.1"), 0.5), 1.0);
        assert_eq!(edge_width(Some("1e300"), 5.0), 5.0);
        assert_eq!(edge_width(Some("1e400"), 1.5), 5.0);
        assert_eq!(edge_width(Some("-1e400"), 1.5), 1.0);
        assert_eq!(edge_width(Some("nan"), 1.5), DEFAULT_EDGE_WIDTH);
        assert_eq!(edge_width(Some("thick"), 1.5), DEFAULT_EDGE_WIDTH);
    }

    #[test]
    fn dangling_edges_are_dropped_in_order() {
        let config = FilterConfig::default();
        let (lookup, colors) = nodes(&config);
        let table = EdgeTable {
            has_weight: true,
            rows: vec![edge("1", "2", Some("3")), edge("1", "99", None), edge("2", "1", Some("1"))],
        };
        let edges = build_edges(&table, &lookup, &colors, true, &config);
        let pairs: Vec<_> = edges.iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
        assert_eq!(pairs, vec![("1", "2"), ("2", "1")]);
        assert_eq!(edges[0].width, 4.5);
        assert_eq!(edges[1].width, 1.5);
    }

    #[test]
    fn color_comes_from_source_module() {
        let config = FilterConfig::default();
        let (lookup, colors) = nodes(&config);
        let table = EdgeTable {
            has_weight: false,
            rows: vec![edge("2", "1", None), edge("3", "1", None)],
        };
        let edges = build_edges(&table, &lookup, &colors, true, &config);
        assert_eq!(edges[0].color, PALETTE[1]);
        assert_eq!(edges[0].width, DEFAULT_EDGE_WIDTH);
        // node 3 sits in the unclassified default module
        assert_eq!(edges[1].color, DEFAULT_EDGE_COLOR);

        let edges = build_edges(&table, &lookup, &colors, false, &config);
        assert!(edges.iter().all(|e| e.color == DEFAULT_EDGE_COLOR));
    }

    #[test]
    fn filtered_out_endpoint_drops_edge() {
        let config = FilterConfig { module_filter: ModuleFilter::Only("A".into()), ..Default::default() };
        let (lookup, colors) = nodes(&config);
        let table = EdgeTable { has_weight: false, rows: vec![edge("1", "2", None), edge("1", "1", None)] };
        let edges = build_edges(&table, &lookup, &colors, true, &config);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, "1");
    }

    #[test]
    fn width_sizing_disabled_uses_default() {
        let config = FilterConfig { width_by_weight: false, ..Default::default() };
        let (lookup, colors) = nodes(&config);
        let table = EdgeTable { has_weight: true, rows: vec![edge("1", "2", Some("3"))] };
        let edges = build_edges(&table, &lookup, &colors, true, &config);
        assert_eq!(edges[0].width, DEFAULT_EDGE_WIDTH);
    }
}
