//! Catalog domain model for albums and the musicians performing on them.
//!
//! # Responsibility
//! - Define the records read and written by the association core.
//! - Keep the album/musician link as album-owned membership (`performers`).
//!
//! # Invariants
//! - Every record is identified by a store-assigned integer id.
//! - A musician appears at most once in an album's `performers`.

pub mod album;
pub mod musician;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures raised before a draft record is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Name is empty after trim.
    BlankName { entity: &'static str },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { entity } => write!(f, "{entity} name must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
