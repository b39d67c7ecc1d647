use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reader::parse_integral;

/// Row identifier carried over from the spreadsheet's optional `id` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutlookId {
    Number(i64),
    Text(String),
}

/// Integer text, including the `"1.0"` form of exported numeric columns, stays numeric.
impl From<&str> for OutlookId {
    fn from(value: &str) -> Self {
        match parse_integral(value) {
            Ok(number) => OutlookId::Number(number),
            Err(_) => OutlookId::Text(value.to_string()),
        }
    }
}

impl fmt::Display for OutlookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlookId::Number(number) => write!(f, "{number}"),
            OutlookId::Text(text) => f.write_str(text),
        }
    }
}

/// One institution's call for a given year, as it appears in the spreadsheet.
///
/// Every field is optional; blank cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlookRecord {
    pub id: Option<OutlookId>,
    #[serde(rename = "Theme")]
    pub theme: Option<String>,
    #[serde(rename = "Rank")]
    pub rank: Option<i64>,
    #[serde(rename = "Institution")]
    pub institution: Option<String>,
    #[serde(rename = "Call_text")]
    pub call_text: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<i64>,
    #[serde(rename = "Sub_theme")]
    pub sub_theme: Option<String>,
    #[serde(rename = "Section_description")]
    pub section_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Base,
    Theme,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Base => "base",
            NodeKind::Theme => "theme",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeNode {
    pub id: String,
    pub year: i64,
    pub name: String,
    pub rank: u32,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

impl NarrativeNode {
    pub fn is_base(&self) -> bool {
        self.kind == NodeKind::Base
    }
}

/// Connection drawn between two nodes of consecutive years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiverLink {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "themeName")]
    pub theme_name: String,
}
