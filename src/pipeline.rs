//! End-to-end titles run: clear stale artifacts, clean each provider
//! export in memory, reconcile, and write the consolidated table.
//!
//! The run is atomic as a whole. Every error below the output write is
//! fatal and nothing has been written yet; the write itself goes through
//! tmp+rename. A half-applied merge would corrupt downstream joins, so
//! there is no per-record recovery.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::csvio;
use crate::dedupe;
use crate::error::{EtlError, Result};
use crate::model::title::TITLE_COLUMNS;
use crate::model::TitleRecord;
use crate::reconcile::{reconcile, ReconcileAudit};

pub const TITLES_OUTPUT: &str = "final_titles.csv";

/// Temp-file prefixes older pipeline revisions staged on disk; cleared at
/// the start of every run so leftovers from an interrupted run cannot be
/// picked up as input.
const STALE_PREFIXES: [&str; 4] = ["sanitized_", "titles_wo_space_", "provider_", "final_csv"];

/// Description column index in the fixed titles schema.
const DESCRIPTION_COL: usize = 3;

#[derive(Debug, Default, Clone, Serialize)]
pub struct TitlesSummary {
    pub files: usize,
    pub rows_read: usize,
    pub rows_after_dedup: usize,
    pub reconcile: ReconcileAudit,
    pub rows_written: usize,
}

/// Clean and reconcile every `*Titles.csv` export in `dir` into
/// `final_titles.csv`.
pub fn run_titles(dir: &Path) -> Result<TitlesSummary> {
    let mut summary = TitlesSummary::default();
    for prefix in STALE_PREFIXES {
        csvio::remove_files_with_prefix(dir, prefix)?;
    }
    csvio::remove_files_with_suffix(dir, ".tmp")?;

    let files = csvio::files_with_suffix(dir, "Titles.csv")?;
    summary.files = files.len();

    let mut records: Vec<TitleRecord> = Vec::new();
    for path in &files {
        let mut rows = csvio::read_rows(path, TITLE_COLUMNS.len())?;
        summary.rows_read += rows.len();
        dedupe::scrub_column(&mut rows, DESCRIPTION_COL);
        let rows = dedupe::dedup_exact(rows);
        summary.rows_after_dedup += rows.len();
        for (line, row) in rows {
            let record = TitleRecord::from_row(&csv::StringRecord::from(row))
                .map_err(|detail| EtlError::parse(path, line, detail))?;
            records.push(record);
        }
        info!(file = %path.display(), "cleaned titles export");
    }

    let outcome = reconcile(records);
    summary.reconcile = outcome.audit;
    summary.rows_written = csvio::write_rows(
        &dir.join(TITLES_OUTPUT),
        &TITLE_COLUMNS,
        outcome.titles.values().map(TitleRecord::to_row),
    )?;
    Ok(summary)
}
