//! Core domain logic for the album/musician catalog.
//! This crate owns the business rules of album performer membership.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::album::{Album, AlbumId, NewAlbum};
pub use model::musician::{Musician, MusicianDescriptor, MusicianId, NewMusician};
pub use model::ModelValidationError;
pub use repo::catalog_repo::{CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository};
pub use service::album_musician_service::{
    AlbumMusicianError, AlbumMusicianResult, AlbumMusicianService, BusinessErrorKind,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
