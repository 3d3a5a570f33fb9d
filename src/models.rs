//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic.

use std::fmt;

#[derive(Debug, Clone)]
/// In-memory representation of one soundtrack entry. The struct mirrors rows
/// in the `songs` table.
pub struct Song {
    /// Primary key from the SQLite store. We keep this around even when the UI
    /// only needs display information because edit/delete flows bubble the id
    /// back to the persistence layer.
    pub id: i64,
    /// Track title displayed in the jukebox list.
    pub title: String,
    /// Artist or composer, used both for display and filtering.
    pub artist: String,
    /// Playable resource: a file path or URL handed to the host OS when the
    /// user presses Play. Kept as raw text so any launcher-understood scheme
    /// works.
    pub resource: String,
}

impl Song {
    /// Compose a `Title - Artist` string that gracefully omits the hyphen if
    /// the artist is blank. The jukebox list and the details overlay both rely
    /// on this ready-to-use formatting.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

impl fmt::Display for Song {
    /// Write the display title to any formatter so the type plays nicely with
    /// Ratatui widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, artist: &str) -> Song {
        Song {
            id: 1,
            title: title.to_string(),
            artist: artist.to_string(),
            resource: String::new(),
        }
    }

    #[test]
    fn display_title_includes_artist() {
        assert_eq!(
            song("Main Theme", "The Court Orchestra").display_title(),
            "Main Theme - The Court Orchestra"
        );
    }

    #[test]
    fn display_title_omits_blank_artist() {
        assert_eq!(song("Main Theme", "   ").display_title(), "Main Theme");
    }
}
