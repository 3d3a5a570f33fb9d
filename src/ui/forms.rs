use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Song;

/// Form state for song creation/editing.
#[derive(Default, Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) resource: String,
    pub(crate) active: SongField,
    pub(crate) error: Option<String>,
}

/// Enumerates the fields within the song form to drive focus management.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SongField {
    Title,
    Artist,
    Resource,
}

impl Default for SongField {
    fn default() -> Self {
        SongField::Title
    }
}

impl SongForm {
    /// Populate the form from an existing song when entering edit mode.
    pub(crate) fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            resource: song.resource.clone(),
            active: SongField::Title,
            error: None,
        }
    }

    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            SongField::Title => SongField::Artist,
            SongField::Artist => SongField::Resource,
            SongField::Resource => SongField::Title,
        };
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SongField::Title => self.title.push(ch),
            SongField::Artist => self.artist.push(ch),
            SongField::Resource => self.resource.push(ch),
        }
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            SongField::Title => {
                self.title.pop();
            }
            SongField::Artist => {
                self.artist.pop();
            }
            SongField::Resource => {
                self.resource.pop();
            }
        }
    }

    /// Validate and normalize form inputs before they are written to the
    /// database. Only the title is mandatory; a song without a resource can be
    /// stored but not played.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Song title is required."));
        }
        Ok((
            title.to_string(),
            self.artist.trim().to_string(),
            self.resource.trim().to_string(),
        ))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: SongField) -> Line<'static> {
        let (value, required) = match field {
            SongField::Title => (&self.title, true),
            SongField::Artist => (&self.artist, false),
            SongField::Resource => (&self.resource, false),
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            if required {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }
}

/// Confirmation state shown before a song is removed from the catalog.
#[derive(Clone)]
pub(crate) struct ConfirmSongDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}

impl ConfirmSongDelete {
    pub(crate) fn from(song: &Song) -> Self {
        Self {
            id: song.id,
            title: song.display_title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inputs_requires_a_title() {
        let mut form = SongForm::default();
        form.artist = "Orchestra".to_string();
        assert!(form.parse_inputs().is_err());

        form.title = "  Main Theme  ".to_string();
        let (title, artist, resource) = form.parse_inputs().expect("valid form");
        assert_eq!(title, "Main Theme");
        assert_eq!(artist, "Orchestra");
        assert_eq!(resource, "");
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut form = SongForm::default();
        assert_eq!(form.active, SongField::Title);
        form.toggle_field();
        assert_eq!(form.active, SongField::Artist);
        form.toggle_field();
        assert_eq!(form.active, SongField::Resource);
        form.toggle_field();
        assert_eq!(form.active, SongField::Title);
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut form = SongForm::default();
        assert!(!form.push_char('\u{7}'));
        assert!(form.title.is_empty());
        assert!(form.push_char('A'));
        assert_eq!(form.title, "A");
    }
}
