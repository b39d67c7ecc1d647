use anyhow::{Context, Result};
use comfy_table::Table;
use secular_forum_core::{read_outlook_sheet, DataConfig, OutlookColumn, OutlookRecord};

const PREVIEW_TEXT_CHARS: usize = 48;

pub fn run(config: &DataConfig, rows: usize) -> Result<()> {
    let sheet = read_outlook_sheet(&config.data_file)
        .with_context(|| format!("inspecting {}", config.data_file.display()))?;

    println!("File: {}", config.data_file.display());
    println!("Columns: {}", sheet.columns.join(", "));

    let recognized = sheet.recognized_columns();
    let missing: Vec<&str> = OutlookColumn::ALL
        .iter()
        .filter(|column| !recognized.contains(*column))
        .map(|column| column.header_name())
        .collect();
    if !missing.is_empty() {
        println!("Missing columns: {}", missing.join(", "));
    }

    println!("\nFirst {} rows:", rows.min(sheet.records.len()));
    println!("{}", preview_table(&sheet.records, rows));

    println!("\nFilled cells ({} rows):", sheet.records.len());
    let mut counts = Table::new();
    counts.set_header(vec!["Column", "Filled"]);
    for (column, filled) in fill_counts(&sheet.records) {
        counts.add_row(vec![column.header_name().to_string(), filled.to_string()]);
    }
    println!("{counts}");

    Ok(())
}

fn preview_table(records: &[OutlookRecord], rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        OutlookColumn::ALL
            .iter()
            .map(|column| column.header_name())
            .collect::<Vec<_>>(),
    );
    for record in records.iter().take(rows) {
        table.add_row(
            OutlookColumn::ALL
                .iter()
                .map(|column| truncate(&cell_text(record, *column).unwrap_or_default()))
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub(crate) fn cell_text(record: &OutlookRecord, column: OutlookColumn) -> Option<String> {
    match column {
        OutlookColumn::Id => record.id.as_ref().map(|id| id.to_string()),
        OutlookColumn::Theme => record.theme.clone(),
        OutlookColumn::Rank => record.rank.map(|rank| rank.to_string()),
        OutlookColumn::Institution => record.institution.clone(),
        OutlookColumn::CallText => record.call_text.clone(),
        OutlookColumn::Year => record.year.map(|year| year.to_string()),
        OutlookColumn::SubTheme => record.sub_theme.clone(),
        OutlookColumn::SectionDescription => record.section_description.clone(),
    }
}

pub(crate) fn fill_counts(records: &[OutlookRecord]) -> Vec<(OutlookColumn, usize)> {
    OutlookColumn::ALL
        .iter()
        .map(|column| {
            let filled = records
                .iter()
                .filter(|record| cell_text(record, *column).is_some())
                .count();
            (*column, filled)
        })
        .collect()
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= PREVIEW_TEXT_CHARS {
        return value.to_string();
    }
    let mut out: String = value.chars().take(PREVIEW_TEXT_CHARS - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use secular_forum_core::{OutlookId, OutlookRecord};

    use super::*;

    #[test]
    fn counts_only_present_cells() {
        let records = vec![
            OutlookRecord {
                id: Some(OutlookId::Number(1)),
                theme: Some("Rates".to_string()),
                year: Some(2024),
                ..OutlookRecord::default()
            },
            OutlookRecord {
                theme: Some("Credit".to_string()),
                ..OutlookRecord::default()
            },
        ];

        let counts = fill_counts(&records);
        assert_eq!(counts[0], (OutlookColumn::Id, 1));
        assert_eq!(counts[1], (OutlookColumn::Theme, 2));
        assert_eq!(counts[2], (OutlookColumn::Rank, 0));
        assert_eq!(counts[5], (OutlookColumn::Year, 1));
    }

    #[test]
    fn long_text_is_shortened_for_preview() {
        let long = "x".repeat(100);
        let shortened = truncate(&long);
        assert_eq!(shortened.chars().count(), PREVIEW_TEXT_CHARS);
        assert!(shortened.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
