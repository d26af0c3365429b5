//! Demo data: random node and edge tables in the expected CSV layout.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Builds unique display names like `Ada Moreau`, falling back to a
/// numbered name once the pairings run out.
pub struct LabelGenerator {
    given: &'static [&'static str],
    family: &'static [&'static str],
    used: HashSet<String>,
}

const GIVEN: &[&str] = &["Ada", "Boris", "Chen", "Dalia", "Emeka", "Freya", "Goran", "Hana"];
const FAMILY: &[&str] = &["Moreau", "Okafor", "Lindqvist", "Tanaka", "Ruiz", "Novak"];

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self { given: GIVEN, family: FAMILY, used: HashSet::new() }
    }

    /// Next name not handed out before.
    pub fn next_unique<R: Rng>(&mut self, rng: &mut R) -> String {
        let given = self.given.choose(rng).copied().unwrap_or("Node");
        let family = self.family.choose(rng).copied().unwrap_or("Unnamed");
        let base = format!("{given} {family}");
        let mut name = base.clone();
        let mut n = 2;
        while self.used.contains(&name) {
            name = format!("{base} {n}");
            n += 1;
        }
        self.used.insert(name.clone());
        name
    }
}

/// Shape of a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub node_count: usize,
    pub edge_count: usize,
    /// Distinct module values spread over the nodes.
    pub modules: usize,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self { node_count: 140, edge_count: 500, modules: 5, seed: None }
    }
}

#[derive(Serialize)]
struct NodeRow<'a> {
    id: usize,
    label: &'a str,
    module: &'a str,
    weight: u32,
}

#[derive(Serialize)]
struct EdgeRow {
    source: usize,
    target: usize,
    weight: u32,
}

/// Write a random node table and edge table. Edges only reference
/// generated node ids.
pub fn generate_tables(nodes_path: &Path, edges_path: &Path, spec: SampleSpec) -> Result<()> {
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let modules: Vec<String> = (1..=spec.modules.max(1)).map(|i| format!("group{i}")).collect();
    let mut labels = LabelGenerator::new();

    let mut writer = csv::Writer::from_path(nodes_path).map_err(io::Error::from)?;
    for id in 1..=spec.node_count {
        let label = labels.next_unique(&mut rng);
        let module = &modules[rng.gen_range(0..modules.len())];
        let weight = rng.gen_range(1..=10);
        writer
            .serialize(NodeRow { id, label: &label, module, weight })
            .map_err(io::Error::from)?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(edges_path).map_err(io::Error::from)?;
    if spec.node_count > 0 {
        for _ in 0..spec.edge_count {
            let source = rng.gen_range(1..=spec.node_count);
            let target = rng.gen_range(1..=spec.node_count);
            let weight = rng.gen_range(1..=5);
            writer
                .serialize(EdgeRow { source, target, weight })
                .map_err(io::Error::from)?;
        }
    }
    writer.flush()?;

    info!(
        "generated {} nodes in {} modules and {} edges",
        spec.node_count,
        modules.len(),
        if spec.node_count > 0 { spec.edge_count } else { 0 }
    );
    Ok(())
}
