//! Use-case API consumed by transport layers (HTTP handlers, bridges).
//!
//! # Responsibility
//! - Expose the five album/musician operations with primitive arguments.
//! - Translate business failures into a typed response status.
//!
//! # Invariants
//! - Exported functions never panic and never return `Result`.
//! - Every call opens a migrated connection and keeps no state between calls.

use albummusician_core::db::open_db;
use albummusician_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Album, AlbumId, AlbumMusicianError, AlbumMusicianResult, AlbumMusicianService,
    BusinessErrorKind, Musician, MusicianDescriptor, MusicianId, SqliteCatalogRepository,
};
use log::{error, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_PATH_ENV: &str = "ALBUMMUSICIAN_DB_PATH";
const DB_FILE_NAME: &str = "albummusician.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Outcome category of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    NotFound,
    PreconditionFailed,
    /// Storage or bootstrap failure.
    Internal,
}

impl ResponseStatus {
    /// HTTP status code a web transport should answer with.
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::PreconditionFailed => 412,
            Self::Internal => 500,
        }
    }

    fn from_error(err: &AlbumMusicianError) -> Self {
        match err.kind() {
            Some(BusinessErrorKind::NotFound) => Self::NotFound,
            Some(BusinessErrorKind::PreconditionFailed) => Self::PreconditionFailed,
            None => Self::Internal,
        }
    }
}

/// Response envelope returned by every association call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub ok: bool,
    pub status: ResponseStatus,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// Payload, present only on success.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            ok: true,
            status: ResponseStatus::Ok,
            message: message.into(),
            data: Some(data),
        }
    }

    fn failure(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            message: message.into(),
            data: None,
        }
    }
}

/// Minimal health-check API.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Links one musician to an album, replacing the album's current performers.
pub fn album_link_musician(album_id: AlbumId, musician_id: MusicianId) -> ApiResponse<Album> {
    with_service("album_link_musician", "Musician linked to album.", |service| {
        service.link_musician(musician_id, album_id)
    })
}

/// Returns one musician linked to an album.
pub fn album_get_musician(album_id: AlbumId, musician_id: MusicianId) -> ApiResponse<Musician> {
    with_service("album_get_musician", "Musician found.", |service| {
        service.get_linked_musician(musician_id, album_id)
    })
}

/// Replaces every performer of an album with the given musicians.
pub fn album_replace_musicians(
    album_id: AlbumId,
    musicians: Vec<MusicianDescriptor>,
) -> ApiResponse<Album> {
    with_service(
        "album_replace_musicians",
        "Album musicians replaced.",
        |service| service.replace_musicians(album_id, &musicians),
    )
}

/// Lists the musicians linked to an album.
pub fn album_list_musicians(album_id: AlbumId) -> ApiResponse<Vec<Musician>> {
    with_service("album_list_musicians", "Album musicians listed.", |service| {
        service.list_musicians(album_id)
    })
}

/// Removes one musician from an album's performers.
pub fn album_unlink_musician(album_id: AlbumId, musician_id: MusicianId) -> ApiResponse<Album> {
    with_service(
        "album_unlink_musician",
        "Musician removed from album.",
        |service| service.unlink_musician(musician_id, album_id),
    )
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_service<T>(
    operation: &'static str,
    success_message: &'static str,
    f: impl FnOnce(
        &mut AlbumMusicianService<SqliteCatalogRepository<'_>>,
    ) -> AlbumMusicianResult<T>,
) -> ApiResponse<T> {
    let db_path = resolve_db_path();
    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=api_call module=api op={operation} status=error error_code=db_open_failed error={err}");
            return ApiResponse::failure(
                ResponseStatus::Internal,
                format!("{operation} failed: {err}"),
            );
        }
    };
    let repo = match SqliteCatalogRepository::try_new(&mut conn) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=api_call module=api op={operation} status=error error_code=repo_init_failed error={err}");
            return ApiResponse::failure(
                ResponseStatus::Internal,
                format!("{operation} failed: {err}"),
            );
        }
    };

    let mut service = AlbumMusicianService::new(repo);
    match f(&mut service) {
        Ok(data) => ApiResponse::success(success_message, data),
        Err(err) => {
            let status = ResponseStatus::from_error(&err);
            if status == ResponseStatus::Internal {
                error!("event=api_call module=api op={operation} status=error error={err}");
                ApiResponse::failure(status, format!("{operation} failed: {err}"))
            } else {
                warn!(
                    "event=api_call module=api op={operation} status=rejected http_code={}",
                    status.http_code()
                );
                ApiResponse::failure(status, err.to_string())
            }
        }
    }
}
