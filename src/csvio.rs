//! Delimited-file plumbing: directory enumeration, positional-schema row
//! decode, atomic writes, and stale temp-file cleanup.
//!
//! Enumeration is sorted by file name so a run always folds providers in
//! the same order; row order within a file is preserved as read.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{EtlError, Result};

/// Files in `dir` whose name starts with `prefix`, sorted by name.
pub fn files_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    list_files(dir, |name| name.starts_with(prefix))
}

/// Files in `dir` whose name ends with `suffix`, sorted by name.
/// Case-sensitive: `final_titles.csv` does not match `Titles.csv`, which
/// keeps a rerun from re-ingesting its own consolidated output.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    list_files(dir, |name| name.ends_with(suffix))
}

/// Case-insensitive variant, for exports whose naming is inconsistent
/// across providers (`_credits.csv` vs `_Credits.csv`).
pub fn files_with_suffix_nocase(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let suffix = suffix.to_lowercase();
    list_files(dir, |name| name.to_lowercase().ends_with(&suffix))
}

fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| EtlError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| EtlError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if keep(name) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Delete files whose name starts with `prefix`. Used to clear artifacts
/// (`sanitized_*`, `provider_*`) left behind by interrupted historical
/// runs; a file that cannot be deleted is logged and skipped.
pub fn remove_files_with_prefix(dir: &Path, prefix: &str) -> Result<usize> {
    Ok(remove_files(files_with_prefix(dir, prefix)?))
}

/// Suffix variant of the stale cleanup. Clears the `.tmp` siblings a run
/// that died between write and rename would leave behind.
pub fn remove_files_with_suffix(dir: &Path, suffix: &str) -> Result<usize> {
    Ok(remove_files(files_with_suffix(dir, suffix)?))
}

fn remove_files(paths: Vec<PathBuf>) -> usize {
    let mut removed = 0;
    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(file = %path.display(), "deleted stale file");
                removed += 1;
            }
            Err(e) => warn!(file = %path.display(), error = %e, "could not delete stale file"),
        }
    }
    removed
}

/// Read every data row of a positional-schema file, skipping the header.
/// Returns `(line, fields)` pairs; a row with the wrong column count is a
/// fatal schema error.
pub fn read_rows(path: &Path, expected_cols: usize) -> Result<Vec<(u64, Vec<String>)>> {
    let file = fs::File::open(path).map_err(|e| EtlError::io(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| EtlError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != expected_cols {
            return Err(EtlError::Schema {
                file: path.to_path_buf(),
                line,
                expected: expected_cols,
                found: record.len(),
            });
        }
        rows.push((line, record.iter().map(str::to_string).collect()));
    }
    Ok(rows)
}

/// Write a header plus rows to `path` atomically: the data goes to a
/// `.tmp` sibling first and is renamed into place only after a successful
/// flush, so a failed run never leaves a partial output behind.
pub fn write_rows<I, R>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let tmp = path.with_extension("tmp");
    let mut written = 0;
    {
        let file = fs::File::create(&tmp).map_err(|e| EtlError::io(&tmp, e))?;
        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record(header).map_err(|e| EtlError::Csv {
            path: tmp.clone(),
            source: e,
        })?;
        for row in rows {
            wtr.write_record(row).map_err(|e| EtlError::Csv {
                path: tmp.clone(),
                source: e,
            })?;
            written += 1;
        }
        wtr.flush().map_err(|e| EtlError::io(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| EtlError::io(path, e))?;
    info!(file = %path.display(), rows = written, "wrote output");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn enumerates_by_prefix_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b_Titles.csv", "x");
        write_file(dir.path(), "a_Titles.csv", "x");
        write_file(dir.path(), "other.csv", "x");
        let found = files_with_prefix(dir.path(), "").unwrap();
        assert_eq!(found.len(), 3);
        let titles: Vec<_> = files_with_suffix(dir.path(), "Titles.csv")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["a_Titles.csv", "b_Titles.csv"]);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "final_titles.csv", "x");
        write_file(dir.path(), "Netflix_Titles.csv", "x");
        let found = files_with_suffix(dir.path(), "Titles.csv").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn nocase_suffix_matches_any_casing() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "netflix_credits.CSV", "x");
        write_file(dir.path(), "HBOMax_Credits.csv", "x");
        let found = files_with_suffix_nocase(dir.path(), "Credits.csv").unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn wrong_column_count_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.csv", "a,b,c\n1,2\n");
        let err = read_rows(&path, 3).unwrap_err();
        assert!(matches!(err, EtlError::Schema { found: 2, .. }));
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "ok.csv", "a,b\n1,2\n\n3,4\n");
        let rows = read_rows(&path, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, vec!["1", "2"]);
        assert_eq!(rows[1].1, vec!["3", "4"]);
    }

    #[test]
    fn write_is_atomic_and_readable_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![vec!["1".to_string(), "x".to_string()]];
        let written = write_rows(&path, &["id", "v"], rows).unwrap();
        assert_eq!(written, 1);
        assert!(!path.with_extension("tmp").exists());
        let back = read_rows(&path, 2).unwrap();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn removes_orphaned_tmp_files_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "final_titles.tmp", "partial");
        write_file(dir.path(), "keep.csv", "x");
        let removed = remove_files_with_suffix(dir.path(), ".tmp").unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("keep.csv").exists());
        assert!(!dir.path().join("final_titles.tmp").exists());
    }

    #[test]
    fn removes_only_matching_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "sanitized_a.csv", "x");
        write_file(dir.path(), "keep.csv", "x");
        let removed = remove_files_with_prefix(dir.path(), "sanitized_").unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("keep.csv").exists());
    }
}
