//! Credit record models: the raw export row and the link rows derived
//! from it for the consolidated person tables.

use serde::Serialize;

/// Fixed positional column order of a provider credits export.
pub const CREDIT_COLUMNS: [&str; 5] = ["person_id", "id", "name", "character", "role"];

/// One row of a provider credits export. `role` is `ACTOR` or `DIRECTOR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditRow {
    pub person_id: String,
    pub title_id: String,
    pub name: String,
    pub character: String,
    pub role: String,
}

impl CreditRow {
    /// Decode one row of the fixed schema; the caller has already checked
    /// the column count.
    pub fn from_row(row: &csv::StringRecord) -> Self {
        let cell = |i: usize| row.get(i).unwrap_or("").to_string();
        Self {
            person_id: cell(0),
            title_id: cell(1),
            name: cell(2),
            character: cell(3),
            role: cell(4),
        }
    }

    /// The key provider rows are deduplicated on.
    pub fn dedup_key(&self) -> (String, String, String, String, String) {
        (
            self.person_id.clone(),
            self.title_id.clone(),
            self.name.clone(),
            self.character.clone(),
            self.role.clone(),
        )
    }
}

/// A person-to-title link. Duplicate links for the same person and title
/// merge their role flags, so one row can be both actor and director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonTitle {
    pub id: String,
    pub title_id: String,
    pub person_id: String,
    pub actor: bool,
    pub director: bool,
}

impl PersonTitle {
    pub fn from_credit(credit: &CreditRow) -> Self {
        Self {
            id: format!("{}_{}", credit.person_id, credit.title_id),
            title_id: credit.title_id.clone(),
            person_id: credit.person_id.clone(),
            actor: credit.role == "ACTOR",
            director: credit.role == "DIRECTOR",
        }
    }
}

/// A person-to-character link row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonCharacter {
    pub id: String,
    pub person_title_id: String,
    pub character: String,
}

impl PersonCharacter {
    pub fn from_credit(credit: &CreditRow) -> Self {
        Self {
            id: format!("{}_{}", credit.person_id, credit.character),
            person_title_id: format!("{}_{}", credit.person_id, credit.title_id),
            character: credit.character.clone(),
        }
    }
}
