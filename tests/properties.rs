use std::collections::HashSet;

use proptest::prelude::*;
use relation_graph::edges::{edge_width, DEFAULT_EDGE_WIDTH, MAX_EDGE_WIDTH, MIN_EDGE_WIDTH};
use relation_graph::loader::{EdgeTable, NodeTable};
use relation_graph::nodes::node_size;
use relation_graph::{
    classify_modules, FilterConfig, LoadedTables, ModuleFilter, Network, RawEdgeRecord,
    RawNodeRecord, PALETTE,
};

fn node_rows() -> impl Strategy<Value = Vec<RawNodeRecord>> {
    prop::collection::vec(
        (0u8..20, prop::option::of(prop::sample::select(vec!["A", "B", "C", "D"]))),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(id, module)| RawNodeRecord {
                id: id.to_string(),
                label: None,
                module: module.map(str::to_string),
                weight: None,
            })
            .collect()
    })
}

fn edge_rows() -> impl Strategy<Value = Vec<RawEdgeRecord>> {
    prop::collection::vec((0u8..25, 0u8..25), 0..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(s, t)| RawEdgeRecord { source: s.to_string(), target: t.to_string(), weight: None })
            .collect()
    })
}

proptest! {
    #[test]
    fn module_colors_are_deterministic(rows in node_rows()) {
        let table = NodeTable { has_module: true, has_weight: false, rows };
        let first = classify_modules(&table, &PALETTE);
        let second = classify_modules(&table, &PALETTE);
        prop_assert_eq!(&first, &second);

        // blanks count as one distinct value for slot assignment
        let mut seen: Vec<Option<&str>> = Vec::new();
        for row in &table.rows {
            let cell = row.module.as_deref();
            if !seen.contains(&cell) {
                seen.push(cell);
            }
        }
        for (slot, cell) in seen.iter().enumerate() {
            if let Some(module) = cell {
                prop_assert_eq!(first.get(module), Some(PALETTE[slot % PALETTE.len()]));
            }
        }
    }

    #[test]
    fn edges_survive_iff_both_endpoints_do(
        nodes in node_rows(),
        edges in edge_rows(),
        filter in prop::option::of(prop::sample::select(vec!["all", "A", "B", "Z"])),
    ) {
        let tables = LoadedTables {
            nodes: NodeTable { has_module: true, has_weight: false, rows: nodes },
            edges: EdgeTable { has_weight: false, rows: edges.clone() },
        };
        let config = FilterConfig { module_filter: ModuleFilter::from(filter.map(str::to_string)), ..Default::default() };
        let network = Network::build(&tables, &config);

        let kept: HashSet<&str> = network.nodes.iter().map(|n| n.id.as_str()).collect();
        let expected: Vec<(&str, &str)> = edges
            .iter()
            .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        let built: Vec<(&str, &str)> = network
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        prop_assert_eq!(built, expected);
    }

    #[test]
    fn node_size_is_monotone_in_weight(a in 0.0f64..1e6, b in 0.0f64..1e6, mult in 1u32..=10) {
        let config = FilterConfig { size_by_weight: true, size_multiplier: mult, ..Default::default() };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let small = node_size(Some(&lo.to_string()), true, &config);
        let large = node_size(Some(&hi.to_string()), true, &config);
        prop_assert!(small <= large);
        prop_assert!(small >= f64::from(config.base_node_size));
    }

    #[test]
    fn non_numeric_weight_gives_base_size(text in "[a-zA-Z ]{0,12}") {
        let config = FilterConfig { size_by_weight: true, ..Default::default() };
        prop_assume!(text.trim().parse::<f64>().map_or(true, |v| !v.is_finite()));
        prop_assert_eq!(node_size(Some(&text), true, &config), f64::from(config.base_node_size));
    }

    #[test]
    fn edge_width_stays_in_bounds(weight in any::<f64>(), mult in 0.5f64..=5.0) {
        let width = edge_width(Some(&weight.to_string()), mult);
        prop_assert!((MIN_EDGE_WIDTH..=MAX_EDGE_WIDTH).contains(&width));
        if weight.is_nan() {
            prop_assert_eq!(width, DEFAULT_EDGE_WIDTH);
        } else {
            prop_assert_eq!(width, (weight * mult).clamp(MIN_EDGE_WIDTH, MAX_EDGE_WIDTH));
        }
    }
}
