//! Groups outlook rows into the per-year nodes rendered by the narrative river.
//!
//! Each year yields at most one base-case node (rank 0) followed by up to
//! [`MAX_THEMES_PER_YEAR`] theme nodes ranked by first appearance in the file.

use std::collections::{BTreeMap, HashSet};

use crate::model::{NarrativeNode, NodeKind, OutlookRecord};

pub const MAX_THEMES_PER_YEAR: usize = 5;
/// Rank substituted for rows whose rank is missing.
pub const UNRANKED: i64 = 999;
pub const DEFAULT_BASE_NAME: &str = "Global Outlook";

const NO_THEME_KEY: &str = "NONE";
const BASE_CASE_MARKER: &str = "BASE CASE";
const MIN_THEME_KEY_CHARS: usize = 2;

struct KeyedRow<'a> {
    key: String,
    rank: i64,
    record: &'a OutlookRecord,
}

/// Trimmed, upper-cased theme. Absent and blank themes both map to `"NONE"`.
pub fn normalized_theme_key(theme: Option<&str>) -> String {
    match theme.map(str::trim).filter(|theme| !theme.is_empty()) {
        Some(theme) => theme.to_uppercase(),
        None => NO_THEME_KEY.to_string(),
    }
}

pub fn coerce_rank(rank: Option<i64>) -> i64 {
    rank.unwrap_or(UNRANKED)
}

/// Upper-cases the first letter of each word and lower-cases the rest.
///
/// Only whitespace starts a word: `AI-DRIVEN` becomes `Ai-driven`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn theme_slug(key: &str) -> String {
    key.to_lowercase().replace(' ', "-")
}

/// Builds the node sequence, years ascending. Rows without a year are ignored.
///
/// Pure: the same records always produce the same nodes.
pub fn build_narrative_river(records: &[OutlookRecord]) -> Vec<NarrativeNode> {
    let mut by_year: BTreeMap<i64, Vec<&OutlookRecord>> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year {
            by_year.entry(year).or_default().push(record);
        }
    }

    by_year
        .into_iter()
        .flat_map(|(year, rows)| year_nodes(year, &rows))
        .collect()
}

fn year_nodes(year: i64, rows: &[&OutlookRecord]) -> Vec<NarrativeNode> {
    let rows: Vec<KeyedRow<'_>> = rows
        .iter()
        .copied()
        .map(|record| KeyedRow {
            key: normalized_theme_key(record.theme.as_deref()),
            rank: coerce_rank(record.rank),
            record,
        })
        .filter(|row| row.key != NO_THEME_KEY)
        .collect();

    let base_index = rows
        .iter()
        .position(|row| row.key.contains(BASE_CASE_MARKER))
        .or_else(|| rows.iter().position(|row| row.rank == 1));

    let mut nodes = Vec::new();
    let mut used_ids = HashSet::new();

    if let Some(index) = base_index {
        let node = base_node(year, rows[index].record);
        used_ids.insert(node.id.clone());
        nodes.push(node);
    }

    let mut seen_keys: HashSet<&str> = HashSet::new();
    let mut next_rank: u32 = 1;

    for (index, row) in rows.iter().enumerate() {
        if seen_keys.len() == MAX_THEMES_PER_YEAR {
            break;
        }
        if Some(index) == base_index {
            continue;
        }
        if row.key.chars().count() < MIN_THEME_KEY_CHARS || !seen_keys.insert(row.key.as_str()) {
            continue;
        }

        let id = claim_id(format!("{year}-{}", theme_slug(&row.key)), &mut used_ids);
        nodes.push(NarrativeNode {
            id,
            year,
            name: title_case(&row.key),
            rank: next_rank,
            kind: NodeKind::Theme,
        });
        next_rank += 1;
    }

    nodes
}

fn base_node(year: i64, record: &OutlookRecord) -> NarrativeNode {
    let name = record
        .sub_theme
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BASE_NAME)
        .to_string();

    NarrativeNode {
        id: format!("{year}-base"),
        year,
        name,
        rank: 0,
        kind: NodeKind::Base,
    }
}

// Distinct keys can slug to the same id ("A B" and "A-B", or a theme named "BASE").
fn claim_id(candidate: String, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }
    let mut suffix = 2;
    loop {
        let id = format!("{candidate}-{suffix}");
        if used.insert(id.clone()) {
            return id;
        }
        suffix += 1;
    }
}
