//! Persistence module split across logical submodules.

mod connection;
mod songs;

pub use connection::{apply_schema, ensure_schema};
pub use songs::{create_song, delete_song, fetch_songs, load_or_seed_songs, update_song};
