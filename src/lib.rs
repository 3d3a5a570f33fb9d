//! Core library surface for the Soundtrack Jukebox TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces.
pub mod db;
pub mod models;
pub mod playback;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to initialize the embedded SQLite store and
/// preload data.
pub use db::{ensure_schema, load_or_seed_songs};

/// The domain type that other layers manipulate.
pub use models::Song;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
