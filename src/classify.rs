//! Module classification: one palette color per distinct module value.

use std::collections::HashMap;

use crate::config::ModuleFilter;
use crate::loader::NodeTable;

/// Fixed color cycle for modules, in assignment order.
pub const PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A",
];

/// Node color when no module color applies.
pub const DEFAULT_NODE_COLOR: &str = "#1F77B4";
/// Edge color when the source node has no module color.
pub const DEFAULT_EDGE_COLOR: &str = "#666666";
/// Module assigned to nodes with no module value.
pub const DEFAULT_MODULE: &str = "default";

/// Module name to color, remembering first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleColorMap {
    order: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ModuleColorMap {
    /// Assign `palette[i % palette.len()]` to the i-th distinct module.
    /// Repeats after the first occurrence are ignored.
    pub fn from_modules<'a, I>(modules: I, palette: &[&str]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_cells(modules.into_iter().map(Some), palette)
    }

    /// Like [`Self::from_modules`], but over raw cells. The first missing
    /// cell consumes a palette slot without becoming an entry.
    pub fn from_cells<'a, I>(cells: I, palette: &[&str]) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut map = Self::default();
        let mut colors = palette.iter().cycle();
        let mut blank_seen = false;
        for cell in cells {
            match cell {
                Some(module) if !map.index.contains_key(module) => {
                    let Some(color) = colors.next() else { break };
                    map.index.insert(module.to_string(), map.order.len());
                    map.order.push((module.to_string(), color.to_string()));
                }
                None if !blank_seen => {
                    blank_seen = true;
                    if colors.next().is_none() {
                        break;
                    }
                }
                _ => {}
            }
        }
        map
    }

    /// Color for a module, if it was classified.
    pub fn get(&self, module: &str) -> Option<&str> {
        self.index.get(module).map(|&i| self.order[i].1.as_str())
    }

    /// `(module, color)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().map(|(m, c)| (m.as_str(), c.as_str()))
    }

    /// Module names in first-seen order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|(m, _)| m.as_str())
    }

    /// Number of classified modules.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no module was classified.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Build the color map for a node table. Tables without a module column
/// get an empty map. Missing module cells take a slot but get no entry.
pub fn classify_modules(table: &NodeTable, palette: &[&str]) -> ModuleColorMap {
    if !table.has_module {
        return ModuleColorMap::default();
    }
    ModuleColorMap::from_cells(table.rows.iter().map(|row| row.module.as_deref()), palette)
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Module name, or `None` for the single "all nodes" entry.
    pub module: Option<String>,
    pub color: String,
}

/// Legend rows for the current filter. Without classified modules the
/// legend is a single entry in the default node color.
pub fn legend(colors: &ModuleColorMap, filter: &ModuleFilter) -> Vec<LegendEntry> {
    if colors.is_empty() {
        return vec![LegendEntry { module: None, color: DEFAULT_NODE_COLOR.to_string() }];
    }
    colors
        .iter()
        .filter(|(module, _)| filter.admits(module))
        .map(|(module, color)| LegendEntry {
            module: Some(module.to_string()),
            color: color.to_string(),
        })
        .collect()
}
