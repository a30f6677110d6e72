//! Musician records and plain-data descriptors.

use super::ModelValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned musician identifier.
pub type MusicianId = i64;

/// Persisted musician record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Musician {
    pub id: MusicianId,
    pub name: String,
    /// Image URI.
    pub image: String,
    pub description: String,
    pub birth_date: NaiveDate,
}

/// Musician values as supplied by a caller when replacing album performers.
///
/// Field values are taken as-is: the snapshot built from a descriptor does
/// not consult the store's current values for the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicianDescriptor {
    pub id: MusicianId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub birth_date: NaiveDate,
}

impl MusicianDescriptor {
    /// Copies every descriptor field into a new musician snapshot.
    pub fn to_snapshot(&self) -> Musician {
        Musician {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            birth_date: self.birth_date,
        }
    }
}

impl From<&Musician> for MusicianDescriptor {
    fn from(value: &Musician) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            image: value.image.clone(),
            description: value.description.clone(),
            birth_date: value.birth_date,
        }
    }
}

/// Insert draft for a musician whose id is not assigned yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMusician {
    pub name: String,
    pub image: String,
    pub description: String,
    pub birth_date: NaiveDate,
}

impl NewMusician {
    /// Creates a draft with empty image and description.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            image: String::new(),
            description: String::new(),
            birth_date,
        }
    }

    /// Rejects drafts the catalog must never store.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName { entity: "musician" });
        }
        Ok(())
    }
}
