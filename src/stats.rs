//! Network statistics over the built node and edge sets.

use std::fmt;

/// A metric that may be undefined for small graphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    /// Not applicable for this graph size.
    NotApplicable,
}

impl Metric {
    /// The value, if defined.
    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::NotApplicable => None,
        }
    }

    /// Render with `precision` decimals, or `N/A`.
    pub fn display(self, precision: usize) -> String {
        match self {
            Metric::Value(v) => format!("{v:.precision$}"),
            Metric::NotApplicable => "N/A".to_string(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Metric::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// Summary of a built network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// `2E / (N (N - 1))`, undefined for `N <= 1`.
    pub density: Metric,
    /// `2E / N`, undefined for `N == 0`.
    pub average_degree: Metric,
}

impl NetworkStats {
    /// Compute statistics from the node and edge counts.
    pub fn compute(node_count: usize, edge_count: usize) -> Self {
        let n = node_count as f64;
        let e = edge_count as f64;

        let density = if node_count > 1 {
            Metric::Value(2.0 * e / (n * (n - 1.0)))
        } else {
            Metric::NotApplicable
        };
        let average_degree = if node_count > 0 {
            Metric::Value(2.0 * e / n)
        } else {
            Metric::NotApplicable
        };

        Self { node_count, edge_count, density, average_degree }
    }
}
