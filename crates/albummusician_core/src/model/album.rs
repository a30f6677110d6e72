//! Album records and performer membership helpers.
//!
//! # Invariants
//! - `performers` order is the stored order; only membership is meaningful.
//! - Helpers never introduce a second entry for the same musician id.

use super::musician::{Musician, MusicianId};
use super::ModelValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned album identifier.
pub type AlbumId = i64;

/// Persisted album record with its linked musicians.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    /// Cover image URI.
    pub cover: String,
    pub release_date: NaiveDate,
    pub description: String,
    /// Linked musicians. Empty when the album was loaded without performers.
    pub performers: Vec<Musician>,
}

impl Album {
    /// Returns the linked musician with the given id, if any.
    pub fn find_performer(&self, musician_id: MusicianId) -> Option<&Musician> {
        self.performers
            .iter()
            .find(|performer| performer.id == musician_id)
    }

    pub fn has_performer(&self, musician_id: MusicianId) -> bool {
        self.find_performer(musician_id).is_some()
    }

    /// Removes every performer with the given id and returns how many were dropped.
    ///
    /// Remaining performers keep their relative order.
    pub fn remove_performer(&mut self, musician_id: MusicianId) -> usize {
        let before = self.performers.len();
        self.performers
            .retain(|performer| performer.id != musician_id);
        before - self.performers.len()
    }

    /// Performer ids in stored order.
    pub fn performer_ids(&self) -> Vec<MusicianId> {
        self.performers.iter().map(|performer| performer.id).collect()
    }
}

/// Insert draft for an album whose id is not assigned yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: String,
    pub cover: String,
    pub release_date: NaiveDate,
    pub description: String,
}

impl NewAlbum {
    /// Creates a draft with empty cover and description.
    pub fn new(name: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            cover: String::new(),
            release_date,
            description: String::new(),
        }
    }

    /// Rejects drafts the catalog must never store.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName { entity: "album" });
        }
        Ok(())
    }
}
