//! Export category tables to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one `month` column plus one column per series identifier, blank
//! cells where a series has no value for that month.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::app::pipeline::Dataset;
use crate::data::CategoryTable;
use crate::error::AppError;

/// Write one category table to a CSV file.
pub fn write_table_csv(path: &Path, table: &CategoryTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["month".to_string()];
    header.extend(table.identifiers().map(str::to_string));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.month.to_string());
        record.extend(row.values.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write `<category>_data.csv` for every non-empty table into `dir`.
pub fn export_dataset(dir: &Path, dataset: &Dataset) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();
    for table in dataset.tables.iter().filter(|t| !t.is_empty()) {
        let path = dir.join(format!("{}.csv", table.category().file_stem()));
        write_table_csv(&path, table)?;
        written.push(path);
    }
    Ok(written)
}
