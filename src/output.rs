use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table_rows(rows, max_rows) {
        Some(table_str) => println!("{}\n", table_str),
        None => println!("(no rows)\n"),
    }
}

/// Markdown preview for tables whose columns are only known at run time.
pub fn preview_matrix(header: &[String], rows: &[Vec<String>], max_rows: usize) {
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(header.iter().cloned());
    for row in rows.iter().take(max_rows) {
        builder.push_record(row.iter().cloned());
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TrendTableRow;

    #[test]
    fn renders_markdown_preview() {
        let rows = vec![
            TrendTableRow {
                series: "Mali".to_string(),
                period: "Mar-2024".to_string(),
                ph3_share: "12.3%".to_string(),
            },
            TrendTableRow {
                series: "Niger".to_string(),
                period: "Mar-2024".to_string(),
                ph3_share: "No data".to_string(),
            },
        ];
        let table = render_table_rows(&rows, 1).unwrap();
        assert!(table.contains("Ph3Share"));
        assert!(table.contains("Mali"));
        assert!(!table.contains("Niger"));
        assert!(render_table_rows::<TrendTableRow>(&[], 5).is_none());
    }
}
