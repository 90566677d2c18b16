//! The title record model and its positional-schema codec.
//!
//! All field typing happens here, at the ingestion boundary: downstream
//! logic (reconciliation in particular) only ever sees normalized values —
//! tag columns as sets, the certification label as a list, numerics as
//! options with absent meaning "not reported".

use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalization::literal::{parse_tag_set, render_tag_set};

/// Fixed positional column order shared by every provider titles export
/// and by the consolidated output.
pub const TITLE_COLUMNS: [&str; 15] = [
    "id",
    "title",
    "type",
    "description",
    "release_year",
    "age_certification",
    "runtime",
    "genres",
    "production_countries",
    "seasons",
    "imdb_id",
    "imdb_score",
    "imdb_votes",
    "tmdb_popularity",
    "tmdb_score",
];

/// One title as reported by one provider export, or the merged record
/// retained per id after reconciliation. `age_certification` holds at most
/// one label on ingest; a cross-production merge may accumulate several.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecord {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub description: String,
    pub release_year: Option<i32>,
    pub age_certification: Vec<String>,
    pub runtime: Option<u32>,
    pub genres: BTreeSet<String>,
    pub production_countries: BTreeSet<String>,
    pub seasons: Option<u32>,
    pub imdb_id: String,
    pub imdb_score: Option<f64>,
    pub imdb_votes: Option<u64>,
    pub tmdb_popularity: Option<f64>,
    pub tmdb_score: Option<f64>,
}

impl TitleRecord {
    /// Decode one row of the fixed schema. The caller has already checked
    /// the column count; errors here are field-level parse failures.
    pub fn from_row(row: &csv::StringRecord) -> Result<Self, String> {
        let cell = |i: usize| row.get(i).unwrap_or("").to_string();

        let age_certification = {
            let raw = row.get(5).unwrap_or("").trim();
            if raw.is_empty() {
                Vec::new()
            } else {
                // A merged record renders several labels comma-joined;
                // split so re-ingesting consolidated output round-trips.
                raw.split(',').map(|s| s.trim().to_string()).collect()
            }
        };

        Ok(Self {
            id: cell(0),
            title: cell(1),
            kind: cell(2),
            description: cell(3),
            release_year: parse_int(row.get(4).unwrap_or(""))
                .map_err(|e| format!("release_year: {e}"))?,
            age_certification,
            runtime: parse_count(row.get(6).unwrap_or(""))
                .map_err(|e| format!("runtime: {e}"))?
                .map(|v| v as u32),
            genres: parse_tag_set(row.get(7).unwrap_or("")).map_err(|e| format!("genres: {e}"))?,
            production_countries: parse_tag_set(row.get(8).unwrap_or(""))
                .map_err(|e| format!("production_countries: {e}"))?,
            seasons: parse_count(row.get(9).unwrap_or(""))
                .map_err(|e| format!("seasons: {e}"))?
                .map(|v| v as u32),
            imdb_id: cell(10),
            imdb_score: parse_float(row.get(11).unwrap_or(""))
                .map_err(|e| format!("imdb_score: {e}"))?,
            imdb_votes: parse_count(row.get(12).unwrap_or(""))
                .map_err(|e| format!("imdb_votes: {e}"))?,
            tmdb_popularity: parse_float(row.get(13).unwrap_or(""))
                .map_err(|e| format!("tmdb_popularity: {e}"))?,
            tmdb_score: parse_float(row.get(14).unwrap_or(""))
                .map_err(|e| format!("tmdb_score: {e}"))?,
        })
    }

    /// Encode back into the fixed column order. Empty tag sets render as
    /// empty cells; absent numerics render as empty cells.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.kind.clone(),
            self.description.clone(),
            self.release_year.map(|v| v.to_string()).unwrap_or_default(),
            self.age_certification.join(", "),
            self.runtime.map(|v| v.to_string()).unwrap_or_default(),
            render_tag_set(&self.genres),
            render_tag_set(&self.production_countries),
            self.seasons.map(|v| v.to_string()).unwrap_or_default(),
            self.imdb_id.clone(),
            self.imdb_score.map(|v| v.to_string()).unwrap_or_default(),
            self.imdb_votes.map(|v| v.to_string()).unwrap_or_default(),
            self.tmdb_popularity
                .map(|v| v.to_string())
                .unwrap_or_default(),
            self.tmdb_score.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }

    /// Season count with "absent" meaning a movie: compares as zero.
    pub fn seasons_or_zero(&self) -> u32 {
        self.seasons.unwrap_or(0)
    }

    pub fn release_year_or_zero(&self) -> i32 {
        self.release_year.unwrap_or(0)
    }

    pub fn imdb_votes_or_zero(&self) -> u64 {
        self.imdb_votes.unwrap_or(0)
    }
}

fn parse_int(raw: &str) -> Result<Option<i32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| format!("not an integer: {trimmed:?}"))
}

/// Non-negative count that some exports write as a float ("2.0" seasons,
/// "24007.0" votes). Accepts integers and zero-fraction floats only.
fn parse_count(raw: &str) -> Result<Option<u64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = trimmed.parse::<u64>() {
        return Ok(Some(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        _ => Err(format!("not a count: {trimmed:?}")),
    }
}

fn parse_float(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("not a number: {trimmed:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    fn sample_row() -> csv::StringRecord {
        row(&[
            "ts300399",
            "Five Came Back",
            "SHOW",
            "A look at World War II",
            "2017",
            "TV-MA",
            "51",
            "['documentation', 'history']",
            "['US']",
            "1.0",
            "tt6164502",
            "8.1",
            "3276.0",
            "2.873",
            "7.6",
        ])
    }

    #[test]
    fn decodes_typed_fields() {
        let rec = TitleRecord::from_row(&sample_row()).unwrap();
        assert_eq!(rec.release_year, Some(2017));
        assert_eq!(rec.seasons, Some(1));
        assert_eq!(rec.imdb_votes, Some(3276));
        assert_eq!(rec.age_certification, vec!["TV-MA".to_string()]);
        assert!(rec.genres.contains("documentation"));
        assert!(rec.production_countries.contains("US"));
    }

    #[test]
    fn absent_numerics_decode_as_none() {
        let mut fields: Vec<&str> = sample_row().iter().map(|_| "").collect();
        fields[0] = "tm1";
        let rec = TitleRecord::from_row(&row(&fields)).unwrap();
        assert_eq!(rec.seasons, None);
        assert_eq!(rec.seasons_or_zero(), 0);
        assert_eq!(rec.release_year, None);
        assert_eq!(rec.imdb_votes_or_zero(), 0);
    }

    #[test]
    fn malformed_tag_literal_is_an_error() {
        let mut fields: Vec<String> = sample_row().iter().map(|s| s.to_string()).collect();
        fields[7] = "drama".to_string();
        let rec = csv::StringRecord::from(fields);
        let err = TitleRecord::from_row(&rec).unwrap_err();
        assert!(err.contains("genres"), "{err}");
    }

    #[test]
    fn encode_round_trips() {
        let rec = TitleRecord::from_row(&sample_row()).unwrap();
        let encoded = rec.to_row();
        let again = TitleRecord::from_row(&csv::StringRecord::from(encoded)).unwrap();
        assert_eq!(rec, again);
    }

    #[test]
    fn multi_label_certification_round_trips() {
        let mut rec = TitleRecord::from_row(&sample_row()).unwrap();
        rec.age_certification = vec!["TV-MA".to_string(), "R".to_string()];
        let encoded = rec.to_row();
        assert_eq!(encoded[5], "TV-MA, R");
        let again = TitleRecord::from_row(&csv::StringRecord::from(encoded)).unwrap();
        assert_eq!(again.age_certification, rec.age_certification);
    }
}
