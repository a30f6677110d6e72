//! Album/musician association use-case service.
//!
//! # Responsibility
//! - Link, query, replace and unlink musicians on an album's `performers`.
//! - Translate missing records and missing links into business errors.
//!
//! # Invariants
//! - Every existence check runs before the single `save_album` write.
//! - A musician appears at most once in the saved performer list.
//! - `link_musician` replaces the whole performer list with one musician.
//! - The service keeps no state between calls; each call re-reads the store.

use crate::model::album::{Album, AlbumId};
use crate::model::musician::{Musician, MusicianDescriptor, MusicianId};
use crate::repo::catalog_repo::{CatalogRepository, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Business failure category surfaced to transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessErrorKind {
    /// A referenced album or musician does not exist.
    NotFound,
    /// Both records exist but are not linked.
    PreconditionFailed,
}

/// Errors from album/musician association operations.
#[derive(Debug)]
pub enum AlbumMusicianError {
    /// Referenced musician does not exist.
    MusicianNotFound(MusicianId),
    /// Referenced album does not exist.
    AlbumNotFound(AlbumId),
    /// Musician exists but is not one of the album's performers.
    MusicianNotAssociated {
        musician_id: MusicianId,
        album_id: AlbumId,
    },
    /// Repository-level failure, propagated unchanged.
    Repo(RepoError),
}

impl AlbumMusicianError {
    /// Returns the business category, or `None` for storage failures.
    pub fn kind(&self) -> Option<BusinessErrorKind> {
        match self {
            Self::MusicianNotFound(_) | Self::AlbumNotFound(_) => Some(BusinessErrorKind::NotFound),
            Self::MusicianNotAssociated { .. } => Some(BusinessErrorKind::PreconditionFailed),
            Self::Repo(_) => None,
        }
    }
}

impl Display for AlbumMusicianError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MusicianNotFound(_) => {
                write!(f, "The musician with the given id was not found")
            }
            Self::AlbumNotFound(_) => write!(f, "The album with the given id was not found"),
            Self::MusicianNotAssociated { .. } => write!(
                f,
                "The musician with the given id is not associated to the album"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AlbumMusicianError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AlbumMusicianError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::AlbumNotFound(id) => Self::AlbumNotFound(id),
            RepoError::MusicianNotFound(id) => Self::MusicianNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type AlbumMusicianResult<T> = Result<T, AlbumMusicianError>;

/// Association service facade over a catalog repository.
pub struct AlbumMusicianService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> AlbumMusicianService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Links one musician to an album, replacing every existing performer.
    ///
    /// # Contract
    /// - The album's performers become exactly `[musician]`.
    /// - Previously linked musicians are dropped from this album.
    pub fn link_musician(
        &mut self,
        musician_id: MusicianId,
        album_id: AlbumId,
    ) -> AlbumMusicianResult<Album> {
        let musician = self.require_musician(musician_id)?;
        let mut album = self.require_album(album_id)?;

        album.performers = vec![musician];
        let saved = self.repo.save_album(&album)?;
        debug!(
            "event=album_link module=service status=ok album_id={} musician_id={}",
            album_id, musician_id
        );
        Ok(saved)
    }

    /// Returns the linked performer with `musician_id`.
    ///
    /// Fails with `MusicianNotAssociated` when both records exist but are not linked.
    pub fn get_linked_musician(
        &self,
        musician_id: MusicianId,
        album_id: AlbumId,
    ) -> AlbumMusicianResult<Musician> {
        let musician = self.require_musician(musician_id)?;
        let album = self.require_album(album_id)?;

        album
            .performers
            .into_iter()
            .find(|performer| performer.id == musician.id)
            .ok_or(AlbumMusicianError::MusicianNotAssociated {
                musician_id,
                album_id,
            })
    }

    /// Replaces the album's performers with snapshots built from `descriptors`.
    ///
    /// # Contract
    /// - Every descriptor id must resolve to a stored musician; the first
    ///   missing id aborts before anything is written.
    /// - Snapshots copy descriptor values, which the save writes through.
    /// - Repeated ids collapse to their first occurrence.
    pub fn replace_musicians(
        &mut self,
        album_id: AlbumId,
        descriptors: &[MusicianDescriptor],
    ) -> AlbumMusicianResult<Album> {
        let mut album = self.require_album(album_id)?;

        let mut performers: Vec<Musician> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            self.require_musician(descriptor.id)?;
            if performers.iter().any(|existing| existing.id == descriptor.id) {
                warn!(
                    "event=album_replace_musicians module=service status=dedup album_id={} musician_id={}",
                    album_id, descriptor.id
                );
                continue;
            }
            performers.push(descriptor.to_snapshot());
        }

        album.performers = performers;
        let saved = self.repo.save_album(&album)?;
        debug!(
            "event=album_replace_musicians module=service status=ok album_id={} count={}",
            album_id,
            saved.performers.len()
        );
        Ok(saved)
    }

    /// Lists the album's performers in stored order.
    pub fn list_musicians(&self, album_id: AlbumId) -> AlbumMusicianResult<Vec<Musician>> {
        let album = self.require_album(album_id)?;
        Ok(album.performers)
    }

    /// Removes one musician from the album's performers.
    ///
    /// Removing a musician that is not linked is a no-op that still saves and
    /// returns the unchanged album.
    pub fn unlink_musician(
        &mut self,
        musician_id: MusicianId,
        album_id: AlbumId,
    ) -> AlbumMusicianResult<Album> {
        self.require_musician(musician_id)?;
        let mut album = self.require_album(album_id)?;

        let removed = album.remove_performer(musician_id);
        let saved = self.repo.save_album(&album)?;
        debug!(
            "event=album_unlink module=service status=ok album_id={} musician_id={} removed={}",
            album_id, musician_id, removed
        );
        Ok(saved)
    }

    fn require_musician(&self, musician_id: MusicianId) -> AlbumMusicianResult<Musician> {
        self.repo
            .find_musician(musician_id)?
            .ok_or(AlbumMusicianError::MusicianNotFound(musician_id))
    }

    fn require_album(&self, album_id: AlbumId) -> AlbumMusicianResult<Album> {
        self.repo
            .find_album(album_id, true)?
            .ok_or(AlbumMusicianError::AlbumNotFound(album_id))
    }
}
