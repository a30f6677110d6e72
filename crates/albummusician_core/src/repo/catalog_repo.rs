//! Album/musician entity store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up musicians and albums by id, optionally joining album performers.
//! - Persist an album together with its full performer list atomically.
//!
//! # Invariants
//! - `save_album` replaces the whole link set in a single transaction.
//! - `save_album` writes performer field values through to `musicians`.
//! - Performers are returned in stored `position` order.

use crate::db::DbError;
use crate::model::album::{Album, AlbumId, NewAlbum};
use crate::model::musician::{Musician, MusicianId, NewMusician};
use crate::model::ModelValidationError;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MUSICIAN_SELECT_SQL: &str = "SELECT
    id,
    name,
    image,
    description,
    birth_date
FROM musicians";

const ALBUM_SELECT_SQL: &str = "SELECT
    id,
    name,
    cover,
    release_date,
    description
FROM albums";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("musicians", &["id", "name", "image", "description", "birth_date"]),
    ("albums", &["id", "name", "cover", "release_date", "description"]),
    ("album_performers", &["album_id", "musician_id", "position"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Album row does not exist.
    AlbumNotFound(AlbumId),
    /// Musician row does not exist.
    MusicianNotFound(MusicianId),
    /// Draft record rejected before insert.
    Validation(ModelValidationError),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlbumNotFound(id) => write!(f, "album not found: {id}"),
            Self::MusicianNotFound(id) => write!(f, "musician not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid catalog data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Entity store consumed by the album/musician association service.
pub trait CatalogRepository {
    /// Finds one musician by id.
    fn find_musician(&self, id: MusicianId) -> RepoResult<Option<Musician>>;
    /// Finds one album by id; `performers` stays empty unless requested.
    fn find_album(&self, id: AlbumId, include_performers: bool) -> RepoResult<Option<Album>>;
    /// Persists album fields and its full performer list, returning the stored album.
    fn save_album(&mut self, album: &Album) -> RepoResult<Album>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Inserts one musician and returns it with its assigned id.
    pub fn insert_musician(&self, draft: &NewMusician) -> RepoResult<Musician> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO musicians (name, image, description, birth_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.as_str(),
                draft.image.as_str(),
                draft.description.as_str(),
                draft.birth_date,
            ],
        )?;

        Ok(Musician {
            id: self.conn.last_insert_rowid(),
            name: draft.name.clone(),
            image: draft.image.clone(),
            description: draft.description.clone(),
            birth_date: draft.birth_date,
        })
    }

    /// Inserts one album without performers and returns it with its assigned id.
    pub fn insert_album(&self, draft: &NewAlbum) -> RepoResult<Album> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO albums (name, cover, release_date, description)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.as_str(),
                draft.cover.as_str(),
                draft.release_date,
                draft.description.as_str(),
            ],
        )?;

        Ok(Album {
            id: self.conn.last_insert_rowid(),
            name: draft.name.clone(),
            cover: draft.cover.clone(),
            release_date: draft.release_date,
            description: draft.description.clone(),
            performers: Vec::new(),
        })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn find_musician(&self, id: MusicianId) -> RepoResult<Option<Musician>> {
        let musician = self
            .conn
            .query_row(
                &format!("{MUSICIAN_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_musician_row,
            )
            .optional()?;
        Ok(musician)
    }

    fn find_album(&self, id: AlbumId, include_performers: bool) -> RepoResult<Option<Album>> {
        let album = self
            .conn
            .query_row(
                &format!("{ALBUM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_album_row,
            )
            .optional()?;

        let Some(mut album) = album else {
            return Ok(None);
        };
        if include_performers {
            album.performers = load_performers(self.conn, album.id)?;
        }
        Ok(Some(album))
    }

    fn save_album(&mut self, album: &Album) -> RepoResult<Album> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE albums
             SET
                name = ?2,
                cover = ?3,
                release_date = ?4,
                description = ?5
             WHERE id = ?1;",
            params![
                album.id,
                album.name.as_str(),
                album.cover.as_str(),
                album.release_date,
                album.description.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::AlbumNotFound(album.id));
        }

        for performer in &album.performers {
            let changed = tx.execute(
                "UPDATE musicians
                 SET
                    name = ?2,
                    image = ?3,
                    description = ?4,
                    birth_date = ?5
                 WHERE id = ?1;",
                params![
                    performer.id,
                    performer.name.as_str(),
                    performer.image.as_str(),
                    performer.description.as_str(),
                    performer.birth_date,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::MusicianNotFound(performer.id));
            }
        }

        tx.execute(
            "DELETE FROM album_performers WHERE album_id = ?1;",
            [album.id],
        )?;
        for (position, performer) in album.performers.iter().enumerate() {
            tx.execute(
                "INSERT INTO album_performers (album_id, musician_id, position)
                 VALUES (?1, ?2, ?3);",
                params![album.id, performer.id, position as i64],
            )?;
        }

        tx.commit()?;

        self.find_album(album.id, true)?
            .ok_or(RepoError::AlbumNotFound(album.id))
    }
}

fn parse_musician_row(row: &Row<'_>) -> rusqlite::Result<Musician> {
    Ok(Musician {
        id: row.get("id")?,
        name: row.get("name")?,
        image: row.get("image")?,
        description: row.get("description")?,
        birth_date: row.get("birth_date")?,
    })
}

fn parse_album_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get("id")?,
        name: row.get("name")?,
        cover: row.get("cover")?,
        release_date: row.get("release_date")?,
        description: row.get("description")?,
        performers: Vec::new(),
    })
}

fn load_performers(conn: &Connection, album_id: AlbumId) -> RepoResult<Vec<Musician>> {
    let mut stmt = conn.prepare(
        "SELECT
            m.id,
            m.name,
            m.image,
            m.description,
            m.birth_date
         FROM album_performers ap
         INNER JOIN musicians m ON m.id = ap.musician_id
         WHERE ap.album_id = ?1
         ORDER BY ap.position ASC, m.id ASC;",
    )?;
    let mut rows = stmt.query([album_id])?;
    let mut performers = Vec::new();
    while let Some(row) = rows.next()? {
        let performer = parse_musician_row(row)?;
        if performers
            .iter()
            .any(|existing: &Musician| existing.id == performer.id)
        {
            return Err(RepoError::InvalidData(format!(
                "musician {} linked twice to album {album_id}",
                performer.id
            )));
        }
        performers.push(performer);
    }
    Ok(performers)
}

fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
