use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use crate::errors::{OutlookError, Result};
use crate::model::{OutlookId, OutlookRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlookColumn {
    Id,
    Theme,
    Rank,
    Institution,
    CallText,
    Year,
    SubTheme,
    SectionDescription,
}

impl OutlookColumn {
    pub const ALL: [OutlookColumn; 8] = [
        OutlookColumn::Id,
        OutlookColumn::Theme,
        OutlookColumn::Rank,
        OutlookColumn::Institution,
        OutlookColumn::CallText,
        OutlookColumn::Year,
        OutlookColumn::SubTheme,
        OutlookColumn::SectionDescription,
    ];

    pub fn header_name(&self) -> &'static str {
        match self {
            OutlookColumn::Id => "id",
            OutlookColumn::Theme => "Theme",
            OutlookColumn::Rank => "Rank",
            OutlookColumn::Institution => "Institution",
            OutlookColumn::CallText => "Call_text",
            OutlookColumn::Year => "Year",
            OutlookColumn::SubTheme => "Sub_theme",
            OutlookColumn::SectionDescription => "Section_description",
        }
    }

    /// Exact, case-sensitive header match.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim_start_matches('\u{feff}');
        Self::ALL
            .into_iter()
            .find(|column| column.header_name() == value)
    }
}

/// The parsed spreadsheet: header names in file order plus one record per data row.
#[derive(Debug, Clone, Default)]
pub struct OutlookSheet {
    pub columns: Vec<String>,
    pub records: Vec<OutlookRecord>,
}

impl OutlookSheet {
    pub fn recognized_columns(&self) -> Vec<OutlookColumn> {
        self.columns
            .iter()
            .filter_map(|name| OutlookColumn::from_header(name))
            .collect()
    }
}

pub fn read_outlook_sheet(path: &Path) -> Result<OutlookSheet> {
    if !path.exists() {
        return Err(OutlookError::MissingDataFile {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|err| OutlookError::Csv {
        path: path.to_path_buf(),
        source: err.into(),
    })?;
    parse_outlook_sheet(file, path)
}

/// Parses CSV content; `source` only labels errors and log lines.
pub fn parse_outlook_sheet<R: Read>(input: R, source: &Path) -> Result<OutlookSheet> {
    let csv_error = |err: csv::Error| OutlookError::Csv {
        path: source.to_path_buf(),
        source: err,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header = reader.headers().map_err(csv_error)?.clone();
    let columns: Vec<String> = header
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').to_string())
        .collect();
    let roles: Vec<Option<OutlookColumn>> = columns
        .iter()
        .map(|name| OutlookColumn::from_header(name))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        records.push(build_record(&roles, &row, source));
    }

    Ok(OutlookSheet { columns, records })
}

fn build_record(
    roles: &[Option<OutlookColumn>],
    row: &StringRecord,
    source: &Path,
) -> OutlookRecord {
    let line = row.position().map(|pos| pos.line()).unwrap_or_default();
    let mut record = OutlookRecord::default();

    for (index, role) in roles.iter().enumerate() {
        let Some(role) = role else {
            continue;
        };
        let Some(cell) = row.get(index).and_then(non_blank) else {
            continue;
        };

        match role {
            OutlookColumn::Id => record.id = Some(OutlookId::from(cell)),
            OutlookColumn::Theme => record.theme = Some(cell.to_string()),
            OutlookColumn::Rank => record.rank = lenient_int(cell, *role, line, source),
            OutlookColumn::Institution => record.institution = Some(cell.to_string()),
            OutlookColumn::CallText => record.call_text = Some(cell.to_string()),
            OutlookColumn::Year => record.year = lenient_int(cell, *role, line, source),
            OutlookColumn::SubTheme => record.sub_theme = Some(cell.to_string()),
            OutlookColumn::SectionDescription => {
                record.section_description = Some(cell.to_string())
            }
        }
    }

    record
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn lenient_int(value: &str, column: OutlookColumn, line: u64, source: &Path) -> Option<i64> {
    match parse_integral(value) {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            warn!(
                file = %source.display(),
                line,
                column = column.header_name(),
                "{message}; treating cell as empty"
            );
            None
        }
    }
}

/// Accepts `"3"` as well as the `"3.0"` form spreadsheet exports produce for
/// integer columns.
pub(crate) fn parse_integral(value: &str) -> std::result::Result<i64, String> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(parsed);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed)
            if parsed.is_finite()
                && parsed.fract() == 0.0
                && parsed >= i64::MIN as f64
                && parsed <= i64::MAX as f64 =>
        {
            Ok(parsed as i64)
        }
        Ok(_) => Err(format!("value '{trimmed}' is not a whole number")),
        Err(err) => Err(format!("failed to parse '{trimmed}' as integer: {err}")),
    }
}
