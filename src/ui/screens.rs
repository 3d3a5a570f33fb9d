use crate::models::Song;

/// Entries offered on the start menu, in display order.
pub(crate) const START_ITEMS: &[&str] = &["Soundtrack", "Quit"];

/// Index of the "Soundtrack" entry in [`START_ITEMS`].
pub(crate) const START_SOUNDTRACK: usize = 0;
/// Index of the "Quit" entry in [`START_ITEMS`].
pub(crate) const START_QUIT: usize = 1;

/// Backing state for the start menu.
pub(crate) struct StartScreen {
    pub(crate) selected: usize,
}

impl StartScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = START_ITEMS.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }
}

/// Backing state for the jukebox song list: the full catalog, the filtered
/// view the user navigates, and the bound selection index.
pub(crate) struct JukeboxScreen {
    pub(crate) songs: Vec<Song>,
    pub(crate) filtered_songs: Vec<Song>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl JukeboxScreen {
    pub(crate) fn new(songs: Vec<Song>) -> Self {
        let mut screen = Self {
            filtered_songs: Vec::new(),
            songs,
            filter: None,
            selected: 0,
        };
        screen.apply_filter();
        screen
    }

    fn apply_filter(&mut self) {
        if let Some(q) = &self.filter {
            let ql = q.to_lowercase();
            if ql.trim().is_empty() {
                self.filtered_songs = self.songs.clone();
            } else {
                self.filtered_songs = self
                    .songs
                    .iter()
                    .filter(|s| {
                        s.title.to_lowercase().contains(&ql)
                            || s.artist.to_lowercase().contains(&ql)
                    })
                    .cloned()
                    .collect();
            }
        } else {
            self.filtered_songs = self.songs.clone();
        }

        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.apply_filter();
    }

    pub(crate) fn set_songs(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.apply_filter();
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.filtered_songs.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered_songs.is_empty() {
            return;
        }
        let len = self.filtered_songs.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.filtered_songs.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.filtered_songs.is_empty() {
            self.selected = self.filtered_songs.len() - 1;
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered_songs.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered_songs.len() {
            self.selected = self.filtered_songs.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64, title: &str, artist: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            resource: format!("music/{id}.ogg"),
        }
    }

    fn sample() -> Vec<Song> {
        vec![
            song(1, "Main Theme", "Orchestra"),
            song(2, "Tavern Reel", "Orchestra"),
            song(3, "Battle at Dawn", "Drummers"),
        ]
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut screen = JukeboxScreen::new(sample());
        screen.move_selection(-5);
        assert_eq!(screen.selected, 0);
        screen.move_selection(10);
        assert_eq!(screen.selected, 2);
    }

    #[test]
    fn filter_matches_title_and_artist() {
        let mut screen = JukeboxScreen::new(sample());
        screen.set_filter(Some("drum".to_string()));
        assert_eq!(screen.filtered_songs.len(), 1);
        assert_eq!(screen.filtered_songs[0].title, "Battle at Dawn");

        screen.set_filter(Some("tavern".to_string()));
        assert_eq!(screen.filtered_songs.len(), 1);
        assert_eq!(screen.filtered_songs[0].title, "Tavern Reel");
    }

    #[test]
    fn narrowing_filter_pulls_selection_back_in_bounds() {
        let mut screen = JukeboxScreen::new(sample());
        screen.select_last();
        screen.set_filter(Some("theme".to_string()));
        assert_eq!(screen.selected, 0);
        assert_eq!(screen.current_song().map(|s| s.id), Some(1));
    }

    #[test]
    fn clearing_filter_restores_the_catalog() {
        let mut screen = JukeboxScreen::new(sample());
        screen.set_filter(Some("no such track".to_string()));
        assert!(screen.filtered_songs.is_empty());
        assert!(screen.current_song().is_none());

        screen.set_filter(None);
        assert_eq!(screen.filtered_songs.len(), 3);
    }

    #[test]
    fn start_menu_selection_clamps() {
        let mut screen = StartScreen::new();
        screen.move_selection(-1);
        assert_eq!(screen.selected, START_SOUNDTRACK);
        screen.move_selection(5);
        assert_eq!(screen.selected, START_QUIT);
    }
}
