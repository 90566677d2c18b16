//! Provider-title mapping: which provider carries which title id.
//!
//! The provider table is static. Providers are independent of each other,
//! so a missing export is a per-provider skip, never a run abort; any
//! other I/O failure stays fatal.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::csvio;
use crate::error::{EtlError, Result};

/// One streaming service and the numeric id its mapping rows carry.
#[derive(Debug, Clone, Copy)]
pub struct Provider {
    pub export_file: &'static str,
    pub slug: &'static str,
    pub id: u32,
}

/// The services whose exports this pipeline understands, with their fixed
/// numeric ids. Downstream joins depend on these ids staying stable.
pub const PROVIDERS: [Provider; 7] = [
    Provider { export_file: "Amazon_Prime_Titles.csv", slug: "amazon_prime", id: 1 },
    Provider { export_file: "HBOMax_Titles.csv", slug: "hbo_max", id: 2 },
    Provider { export_file: "Disney_Plus_Titles.csv", slug: "disney_plus", id: 3 },
    Provider { export_file: "HuluTV_Titles.csv", slug: "hulutv", id: 4 },
    Provider { export_file: "Netflix_Titles.csv", slug: "netflix", id: 5 },
    Provider { export_file: "ParamountTV_Titles.csv", slug: "paramount_tv", id: 6 },
    Provider { export_file: "Rakuten_Viki_Titles.csv", slug: "rakuten_viki", id: 7 },
];

pub const PROVIDER_MAPPING_OUTPUT: &str = "final_provider_movie.csv";

#[derive(Debug, Default, Clone, Serialize)]
pub struct ProviderSummary {
    pub providers_mapped: usize,
    pub providers_skipped: usize,
    pub rows_written: usize,
}

/// Build `final_provider_movie.csv` from the provider exports in `dir`:
/// one row `({provider_id}_{title_id}, title_id, provider_id)` per
/// distinct title id per present provider.
pub fn run_provider_mapping(dir: &Path) -> Result<ProviderSummary> {
    let mut summary = ProviderSummary::default();
    csvio::remove_files_with_suffix(dir, ".tmp")?;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for provider in PROVIDERS {
        let path = dir.join(provider.export_file);
        let ids = match unique_title_ids(&path) {
            Ok(ids) => ids,
            Err(e) if e.is_not_found() => {
                warn!(
                    provider = provider.slug,
                    file = provider.export_file,
                    "export not present, skipping provider"
                );
                summary.providers_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        info!(provider = provider.slug, titles = ids.len(), "mapped provider titles");
        summary.providers_mapped += 1;
        rows.extend(ids.into_iter().map(|title_id| {
            vec![
                format!("{}_{}", provider.id, title_id),
                title_id,
                provider.id.to_string(),
            ]
        }));
    }

    summary.rows_written = csvio::write_rows(
        &dir.join(PROVIDER_MAPPING_OUTPUT),
        &["id", "title_id", "provider_id"],
        rows,
    )?;
    Ok(summary)
}

/// Distinct title ids (first column) of a raw provider export. Lenient on
/// row width: the raw files are read before any cleaning has happened.
fn unique_title_ids(path: &Path) -> Result<BTreeSet<String>> {
    let file = fs::File::open(path).map_err(|e| EtlError::io(path, e))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut ids = BTreeSet::new();
    for record in rdr.records() {
        let record = record.map_err(|e| EtlError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Some(id) = record.get(0) {
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
    }
    Ok(ids)
}
