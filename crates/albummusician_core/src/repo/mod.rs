//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the entity-store contract consumed by the association service.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`AlbumNotFound`,
//!   `MusicianNotFound`) in addition to DB transport errors.
//! - `save_album` is the only write path for album membership.

pub mod catalog_repo;
