//! Transport-facing API for album/musician association use-cases.

pub mod api;

pub use api::{
    album_get_musician, album_link_musician, album_list_musicians, album_replace_musicians,
    album_unlink_musician, core_version, init_logging, ping, ApiResponse, ResponseStatus,
};
