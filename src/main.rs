//! Binary entry point that glues the SQLite-backed song catalog to the TUI:
//! bring up the database, hydrate the initial app state, and drive the Ratatui
//! event loop until the user exits.
use soundtrack_jukebox::{ensure_schema, load_or_seed_songs, run_app, App};

/// Initialize persistence, load the catalog, and launch the Ratatui event
/// loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let songs = load_or_seed_songs(&conn)?;

    let mut app = App::new(conn, songs);
    run_app(&mut app)
}
