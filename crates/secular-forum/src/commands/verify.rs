use anyhow::{Context, Result};
use comfy_table::Table;
use secular_forum_core::{build_narrative_river, DataConfig, NarrativeNode, OutlookLoader};
use tracing::info;

pub fn run(config: &DataConfig, year: i64) -> Result<()> {
    let loader = OutlookLoader::new(config.data_file.clone());
    let records = loader
        .load()
        .with_context(|| format!("loading {}", config.data_file.display()))?;
    let nodes = build_narrative_river(records);
    info!(records = records.len(), nodes = nodes.len(), "narrative river built");

    println!("Total nodes: {}", nodes.len());

    println!("\nBase case spine:");
    let mut spine = Table::new();
    spine.set_header(vec!["Year", "Name"]);
    for node in base_spine(&nodes) {
        spine.add_row(vec![node.year.to_string(), node.name.clone()]);
    }
    println!("{spine}");

    let themes = year_themes(&nodes, year);
    if themes.is_empty() {
        println!("\nNo theme nodes for {year}");
        return Ok(());
    }

    println!("\nTheme nodes for {year}:");
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Name", "Id"]);
    for node in themes {
        table.add_row(vec![node.rank.to_string(), node.name.clone(), node.id.clone()]);
    }
    println!("{table}");

    Ok(())
}

pub(crate) fn base_spine(nodes: &[NarrativeNode]) -> Vec<&NarrativeNode> {
    let mut spine: Vec<&NarrativeNode> = nodes.iter().filter(|node| node.is_base()).collect();
    spine.sort_by_key(|node| node.year);
    spine
}

pub(crate) fn year_themes(nodes: &[NarrativeNode], year: i64) -> Vec<&NarrativeNode> {
    nodes
        .iter()
        .filter(|node| node.year == year && !node.is_base())
        .collect()
}
