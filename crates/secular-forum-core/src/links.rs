use std::collections::BTreeMap;

use crate::model::{NarrativeNode, RiverLink};

/// Connects each node to its continuation in the next year present in `nodes`.
///
/// A base node continues into the next base node. Any node without such a target
/// continues into the next year's first theme node carrying the same display name.
pub fn build_river_links(nodes: &[NarrativeNode]) -> Vec<RiverLink> {
    let mut by_year: BTreeMap<i64, Vec<&NarrativeNode>> = BTreeMap::new();
    for node in nodes {
        by_year.entry(node.year).or_default().push(node);
    }
    for year_nodes in by_year.values_mut() {
        year_nodes.sort_by_key(|node| node.rank);
    }

    let columns: Vec<&Vec<&NarrativeNode>> = by_year.values().collect();
    let mut links = Vec::new();

    for pair in columns.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        for source in current {
            let base_target = if source.is_base() {
                next.iter().find(|node| node.is_base())
            } else {
                None
            };
            let target = base_target.or_else(|| {
                next.iter()
                    .find(|node| !node.is_base() && node.name == source.name)
            });

            if let Some(target) = target {
                links.push(RiverLink {
                    id: format!("{}-{}", source.id, target.id),
                    source: source.id.clone(),
                    target: target.id.clone(),
                    theme_name: source.name.clone(),
                });
            }
        }
    }

    links
}
