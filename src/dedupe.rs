//! Row-level cleaning applied to every export before reconciliation:
//! embedded newlines in description cells are flattened (they break the
//! one-row-per-record contract downstream), and exact-duplicate rows are
//! dropped keeping the first occurrence.

use std::collections::HashSet;

/// Replace embedded line breaks in the given column with spaces.
pub fn scrub_column(rows: &mut [(u64, Vec<String>)], col: usize) {
    for (_, row) in rows.iter_mut() {
        if let Some(cell) = row.get_mut(col) {
            if cell.contains(['\n', '\r']) {
                *cell = cell.replace(['\n', '\r'], " ");
            }
        }
    }
}

/// Drop rows whose full field tuple has been seen before. First
/// occurrence wins; order is otherwise preserved.
pub fn dedup_exact(rows: Vec<(u64, Vec<String>)>) -> Vec<(u64, Vec<String>)> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    rows.into_iter()
        .filter(|(_, row)| seen.insert(row.clone()))
        .collect()
}
