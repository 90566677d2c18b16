//! The credits pipeline: provider credit exports in, three consolidated
//! person tables out.
//!
//! Steps: normalize name/character fields, deduplicate on the five-field
//! key, then derive person-title links (merging actor/director flags for
//! the same person on the same title), the persons table, and the
//! person-character links. All consolidated writes are atomic.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::csvio;
use crate::dedupe;
use crate::error::Result;
use crate::model::credit::CREDIT_COLUMNS;
use crate::model::{CreditRow, PersonCharacter, PersonTitle};
use crate::normalization::text::normalize_name;

pub const PERSON_TITLES_OUTPUT: &str = "person_titles.csv";
pub const PERSONS_OUTPUT: &str = "unique_persons.csv";
pub const PERSON_CHARACTERS_OUTPUT: &str = "person_characters.csv";

/// Character column index in the fixed credits schema.
const CHARACTER_COL: usize = 3;

#[derive(Debug, Default, Clone, Serialize)]
pub struct CreditsSummary {
    pub files: usize,
    pub rows_read: usize,
    pub rows_after_dedup: usize,
    pub person_titles: usize,
    pub persons: usize,
    pub person_characters: usize,
}

/// Run the credits pipeline over every `*Credits.csv` export in `dir`.
pub fn run_credits(dir: &Path) -> Result<CreditsSummary> {
    let mut summary = CreditsSummary::default();
    csvio::remove_files_with_suffix(dir, ".tmp")?;
    let files = csvio::files_with_suffix_nocase(dir, "Credits.csv")?;
    summary.files = files.len();

    let mut credits: Vec<CreditRow> = Vec::new();
    for path in &files {
        let mut rows = csvio::read_rows(path, CREDIT_COLUMNS.len())?;
        // Credit exports occasionally carry line breaks inside character
        // names; flatten them like the titles cleaner does descriptions.
        dedupe::scrub_column(&mut rows, CHARACTER_COL);
        summary.rows_read += rows.len();
        for (_, row) in rows {
            let mut credit = CreditRow::from_row(&csv::StringRecord::from(row));
            credit.name = normalize_name(&credit.name);
            credit.character = normalize_name(&credit.character);
            credits.push(credit);
        }
        info!(file = %path.display(), "read credits export");
    }

    // Dedup across all providers at once; first occurrence wins.
    let mut seen = HashSet::new();
    credits.retain(|c| seen.insert(c.dedup_key()));
    summary.rows_after_dedup = credits.len();

    let links = build_person_titles(&credits);
    let persons = build_persons(&credits);
    let characters = build_person_characters(&credits);

    summary.person_titles = csvio::write_rows(
        &dir.join(PERSON_TITLES_OUTPUT),
        &["id", "title_id", "person_id", "actor", "director"],
        links.values().map(|link| {
            vec![
                link.id.clone(),
                link.title_id.clone(),
                link.person_id.clone(),
                py_bool(link.actor),
                py_bool(link.director),
            ]
        }),
    )?;

    summary.persons = csvio::write_rows(
        &dir.join(PERSONS_OUTPUT),
        &["id", "name"],
        persons
            .iter()
            .map(|(id, name)| vec![id.clone(), name.clone()]),
    )?;

    summary.person_characters = csvio::write_rows(
        &dir.join(PERSON_CHARACTERS_OUTPUT),
        &["id", "person_title_id", "character"],
        characters.iter().map(|pc| {
            vec![
                pc.id.clone(),
                pc.person_title_id.clone(),
                pc.character.clone(),
            ]
        }),
    )?;

    Ok(summary)
}

/// One link per person-title pair; a person credited as both actor and
/// director on the same title collapses into one row with both flags.
fn build_person_titles(credits: &[CreditRow]) -> IndexMap<String, PersonTitle> {
    let mut links: IndexMap<String, PersonTitle> = IndexMap::new();
    for credit in credits {
        let link = PersonTitle::from_credit(credit);
        links
            .entry(link.id.clone())
            .and_modify(|existing| {
                existing.actor |= link.actor;
                existing.director |= link.director;
            })
            .or_insert(link);
    }
    links
}

/// person_id -> display name; a later export's spelling wins.
fn build_persons(credits: &[CreditRow]) -> IndexMap<String, String> {
    let mut persons = IndexMap::new();
    for credit in credits {
        persons.insert(credit.person_id.clone(), credit.name.clone());
    }
    persons
}

fn build_person_characters(credits: &[CreditRow]) -> Vec<PersonCharacter> {
    let mut seen = HashSet::new();
    credits
        .iter()
        .map(PersonCharacter::from_credit)
        .filter(|pc| seen.insert(pc.clone()))
        .collect()
}

/// Downstream joins consume `True`/`False` literals, not `true`/`false`.
fn py_bool(b: bool) -> String {
    if b { "True" } else { "False" }.to_string()
}
