//! The title reconciler: folds provider records sharing an id into one
//! merged record per id.
//!
//! Identity rules, in order of trust:
//! - same `id` and same `imdb_id` is the same production, reported by
//!   providers at different points in time; the fresher report (more
//!   seasons, or a later release year) refreshes the mutable fields.
//! - same `id`, different `imdb_id`, same release year is an id collision
//!   between two distinct productions (a remake, typically); the one with
//!   strictly more IMDb votes becomes canonical, but never at the cost of
//!   demoting a record with more seasons.
//! - anything else leaves the accumulator untouched.
//!
//! The fold is explicit: records in, `IndexMap` out, first-seen order kept.
//! No entry is ever removed once inserted.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::model::TitleRecord;

/// Counters describing what a reconciliation run did. Emitted as the
/// run's audit summary; repeats that changed nothing are still counted.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileAudit {
    pub total_records: usize,
    pub distinct_ids: usize,
    pub folded: usize,
    pub refreshed_same_production: usize,
    pub promoted_same_year: usize,
    pub untouched_repeats: usize,
}

/// The merged mapping plus its audit counters. Values iterate in
/// first-seen order, which is the output row order.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub titles: IndexMap<String, TitleRecord>,
    pub audit: ReconcileAudit,
}

/// What folding one repeat record into its accumulator did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    RefreshedSameProduction,
    PromotedSameYear,
    Untouched,
}

/// Fold an ordered sequence of title records into one merged record per
/// id. The first record seen for an id becomes the accumulator; later
/// records for the same id are folded in input order.
pub fn reconcile(records: impl IntoIterator<Item = TitleRecord>) -> ReconcileOutcome {
    let mut titles: IndexMap<String, TitleRecord> = IndexMap::new();
    let mut audit = ReconcileAudit::default();

    for record in records {
        audit.total_records += 1;
        match titles.entry(record.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                audit.folded += 1;
                let id = slot.key().clone();
                match fold(slot.get_mut(), record) {
                    Fold::RefreshedSameProduction => {
                        debug!(%id, "refreshed from a fresher same-production record");
                        audit.refreshed_same_production += 1;
                    }
                    Fold::PromotedSameYear => {
                        debug!(%id, "promoted a colliding production with more votes");
                        audit.promoted_same_year += 1;
                    }
                    Fold::Untouched => audit.untouched_repeats += 1,
                }
            }
        }
    }

    audit.distinct_ids = titles.len();
    ReconcileOutcome { titles, audit }
}

fn fold(m: &mut TitleRecord, r: TitleRecord) -> Fold {
    if r.imdb_id == m.imdb_id {
        // Same production. More seasons or a later year marks `r` as the
        // fresher report; `imdb_score`/`imdb_votes` are deliberately left
        // alone here, the production did not change.
        if r.seasons_or_zero() > m.seasons_or_zero()
            || r.release_year_or_zero() > m.release_year_or_zero()
        {
            m.seasons = r.seasons;
            // The fresher report's certification supersedes outright: it
            // covers every season the older one did.
            m.age_certification = r.age_certification;
            m.genres.extend(r.genres);
            m.production_countries.extend(r.production_countries);
            m.description = r.description;
            m.runtime = r.runtime;
            m.tmdb_popularity = r.tmdb_popularity;
            m.tmdb_score = r.tmdb_score;
            m.release_year = r.release_year;
            return Fold::RefreshedSameProduction;
        }
        return Fold::Untouched;
    }

    // Distinct productions colliding on id. Only a same-year collision is
    // disambiguated; strictly more votes wins, and a tie or a lower season
    // count never demotes the incumbent. Keep this threshold exactly as
    // is: promoting on equal votes would make the outcome depend on
    // provider file order.
    if r.release_year == m.release_year
        && r.imdb_votes_or_zero() > m.imdb_votes_or_zero()
        && r.seasons_or_zero() >= m.seasons_or_zero()
    {
        m.imdb_votes = r.imdb_votes;
        m.imdb_id = r.imdb_id;
        m.imdb_score = r.imdb_score;
        m.seasons = r.seasons;
        m.age_certification = r.age_certification;
        m.genres.extend(r.genres);
        m.production_countries.extend(r.production_countries);
        m.description = r.description;
        m.runtime = r.runtime;
        m.tmdb_popularity = r.tmdb_popularity;
        m.tmdb_score = r.tmdb_score;
        m.release_year = r.release_year;
        return Fold::PromotedSameYear;
    }

    Fold::Untouched
}
