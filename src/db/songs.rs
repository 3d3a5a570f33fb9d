//! Queries around the `songs` table. Every function encapsulates one query so
//! the UI layer can stay focused on state management.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::Song;

/// Soundtrack listing inserted on first run, in `(title, artist, resource)`
/// form. Stands in for the song table the game would ship with its data
/// files; users edit the catalog in-app afterwards.
const DEFAULT_SONGS: &[(&str, &str, &str)] = &[
    ("Main Theme", "The Court Orchestra", "music/theme.ogg"),
    ("Tavern Reel", "The Court Orchestra", "music/tavern.ogg"),
    ("City Gates", "The Court Orchestra", "music/city.ogg"),
    ("Into the Wilds", "The Court Orchestra", "music/forest.ogg"),
    ("Battle at Dawn", "The Court Orchestra", "music/battle.ogg"),
    ("Lament for the Fallen", "The Court Orchestra", "music/lament.ogg"),
    ("Victory March", "The Court Orchestra", "music/victory.ogg"),
];

/// Fetch every song, ordered case-insensitively so mixed-case titles group
/// together in the jukebox list.
pub fn fetch_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, artist, resource
             FROM songs
             ORDER BY title COLLATE NOCASE, artist COLLATE NOCASE",
        )
        .context("failed to prepare song query")?;

    let songs = stmt
        .query_map([], |row| {
            Ok(Song {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                resource: row.get(3)?,
            })
        })
        .context("failed to iterate songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect songs")?;

    Ok(songs)
}

/// Return the stored songs, seeding the default soundtrack first if the table
/// is empty. `main` calls this once at startup.
pub fn load_or_seed_songs(conn: &Connection) -> Result<Vec<Song>> {
    let songs = fetch_songs(conn)?;
    if !songs.is_empty() {
        return Ok(songs);
    }

    for (title, artist, resource) in DEFAULT_SONGS {
        conn.execute(
            "INSERT INTO songs (title, artist, resource) VALUES (?1, ?2, ?3)",
            params![title, artist, resource],
        )
        .context("failed to seed default song")?;
    }

    fetch_songs(conn)
}

/// Insert a new song and return it with its assigned id.
pub fn create_song(conn: &Connection, title: &str, artist: &str, resource: &str) -> Result<Song> {
    conn.execute(
        "INSERT INTO songs (title, artist, resource) VALUES (?1, ?2, ?3)",
        params![title, artist, resource],
    )
    .context("failed to insert song")?;

    let id = conn.last_insert_rowid();
    Ok(Song {
        id,
        title: title.to_string(),
        artist: artist.to_string(),
        resource: resource.to_string(),
    })
}

/// Overwrite every editable field of an existing song.
pub fn update_song(
    conn: &Connection,
    id: i64,
    title: &str,
    artist: &str,
    resource: &str,
) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE songs SET title = ?1, artist = ?2, resource = ?3 WHERE id = ?4",
            params![title, artist, resource, id],
        )
        .context("failed to update song")?;

    if changed == 0 {
        anyhow::bail!("song no longer exists");
    }
    Ok(())
}

/// Remove a song from the catalog entirely.
pub fn delete_song(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM songs WHERE id = ?1", params![id])
        .context("failed to delete song")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        apply_schema(&conn).expect("schema");
        conn
    }

    #[test]
    fn seeding_runs_once() {
        let conn = test_conn();
        let first = load_or_seed_songs(&conn).expect("seed");
        assert_eq!(first.len(), DEFAULT_SONGS.len());

        let second = load_or_seed_songs(&conn).expect("reload");
        assert_eq!(second.len(), DEFAULT_SONGS.len());
    }

    #[test]
    fn fetch_orders_titles_case_insensitively() {
        let conn = test_conn();
        create_song(&conn, "zither Suite", "B", "z.ogg").expect("insert");
        create_song(&conn, "Anthem", "A", "a.ogg").expect("insert");
        create_song(&conn, "ballad", "C", "b.ogg").expect("insert");

        let titles: Vec<String> = fetch_songs(&conn)
            .expect("fetch")
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Anthem", "ballad", "zither Suite"]);
    }

    #[test]
    fn update_rewrites_all_fields() {
        let conn = test_conn();
        let song = create_song(&conn, "Draft", "Unknown", "").expect("insert");

        update_song(&conn, song.id, "Final", "The Court Orchestra", "final.ogg")
            .expect("update");

        let stored = fetch_songs(&conn).expect("fetch");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Final");
        assert_eq!(stored[0].artist, "The Court Orchestra");
        assert_eq!(stored[0].resource, "final.ogg");
    }

    #[test]
    fn update_of_missing_song_errors() {
        let conn = test_conn();
        let result = update_song(&conn, 999, "Ghost", "", "");
        assert!(result.is_err());
    }

    #[test]
    fn delete_removes_the_row() {
        let conn = test_conn();
        let song = create_song(&conn, "Ephemeral", "", "").expect("insert");
        delete_song(&conn, song.id).expect("delete");
        assert!(fetch_songs(&conn).expect("fetch").is_empty());
    }
}
