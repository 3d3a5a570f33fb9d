use std::cell::Cell;
use std::mem;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{create_song, delete_song, fetch_songs, update_song};
use crate::models::Song;
use crate::playback::play_resource;

use super::forms::{ConfirmSongDelete, SongField, SongForm};
use super::helpers::{centered_rect, surface_error};
use super::overlay::{OverlayClose, OverlayRequest, OverlayTracker, VisibilityClose};
use super::screens::{JukeboxScreen, StartScreen, START_ITEMS, START_QUIT, START_SOUNDTRACK};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Text shown in the credits overlay. The jukebox exists so players can enjoy
/// the soundtrack instead of sitting through these, but the names still
/// deserve a screen.
const CREDITS: &[&str] = &[
    "Soundtrack Jukebox",
    "",
    "Music composed and arranged by",
    "The Court Orchestra",
    "",
    "Recorded at the Grand Hall",
    "Mastered for the original release",
    "",
    "Thank you for listening.",
];

/// Key bindings shown in the help overlay, as `(key, action)` pairs.
const HELP_BINDINGS: &[(&str, &str)] = &[
    ("Enter / p", "Play the selected track"),
    ("Up / Down", "Move the selection"),
    ("PgUp / PgDn", "Move the selection by five"),
    ("Home / End", "Jump to the first or last track"),
    ("/", "Search titles and artists"),
    ("c", "Toggle the credits overlay"),
    ("i", "Toggle track details"),
    ("h", "Toggle this help"),
    ("+ / e / -", "Add, edit, or delete a track"),
    ("Esc", "Close the overlay, or go back"),
    ("q", "Quit"),
];

/// High-level navigation states. Keeping this explicit makes it easy to reason
/// about which rendering path runs and what keyboard shortcuts should do.
enum Screen {
    Start(StartScreen),
    Jukebox(JukeboxScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    AddingSong(SongForm),
    EditingSong { id: i64, form: SongForm },
    ConfirmSongDelete(ConfirmSongDelete),
    Searching(SearchState),
}

/// State for an active inline search over the jukebox list.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// The overlays that can float above the jukebox list. Exactly one may be
/// open at a time; the tracker enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverlayKind {
    Credits,
    Details,
    Help,
}

/// Per-overlay pairing of the visibility flag the renderer reads and the
/// close capability the tracker may invoke. The capability is created once so
/// repeated requests for the same overlay compare equal by identity.
struct OverlayHandle {
    visible: Rc<Cell<bool>>,
    close: Rc<dyn OverlayClose>,
}

impl OverlayHandle {
    fn new() -> Self {
        let visible = Rc::new(Cell::new(false));
        let close: Rc<dyn OverlayClose> = Rc::new(VisibilityClose::new(Rc::clone(&visible)));
        Self { visible, close }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    songs: Vec<Song>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    overlays: OverlayTracker,
    credits: OverlayHandle,
    details: OverlayHandle,
    help: OverlayHandle,
}

impl App {
    pub fn new(conn: Connection, songs: Vec<Song>) -> Self {
        Self {
            conn,
            songs,
            screen: Screen::Start(StartScreen::new()),
            mode: Mode::Normal,
            status: None,
            overlays: OverlayTracker::new(),
            credits: OverlayHandle::new(),
            details: OverlayHandle::new(),
            help: OverlayHandle::new(),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingSong(form) => self.handle_add_song(code, form)?,
            Mode::EditingSong { id, form } => self.handle_edit_song(code, id, form)?,
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Start(_) => self.handle_start_key(code, exit),
            Screen::Jukebox(_) => self.handle_jukebox_key(code, exit),
        }
    }

    fn handle_start_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => {
                if let Screen::Start(start) = &mut self.screen {
                    start.move_selection(-1);
                }
            }
            KeyCode::Down => {
                if let Screen::Start(start) = &mut self.screen {
                    start.move_selection(1);
                }
            }
            KeyCode::Enter => {
                let selected = match &self.screen {
                    Screen::Start(start) => start.selected,
                    _ => return Ok(Mode::Normal),
                };
                match selected {
                    START_SOUNDTRACK => self.open_jukebox()?,
                    START_QUIT => *exit = true,
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_jukebox_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                // Done: an open overlay swallows the first Esc, the next one
                // returns to the start menu.
                if !self.close_open_overlay() {
                    self.leave_jukebox();
                }
            }
            KeyCode::Up => self.move_jukebox_selection(-1),
            KeyCode::Down => self.move_jukebox_selection(1),
            KeyCode::PageUp => self.move_jukebox_selection(-5),
            KeyCode::PageDown => self.move_jukebox_selection(5),
            KeyCode::Home => {
                if let Screen::Jukebox(jukebox) = &mut self.screen {
                    jukebox.select_first();
                }
            }
            KeyCode::End => {
                if let Screen::Jukebox(jukebox) = &mut self.screen {
                    jukebox.select_last();
                }
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => self.play_selected(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.toggle_overlay(OverlayKind::Credits),
            KeyCode::Char('i') | KeyCode::Char('I') => self.toggle_overlay(OverlayKind::Details),
            KeyCode::Char('h') | KeyCode::Char('H') => self.toggle_overlay(OverlayKind::Help),
            KeyCode::Char('/') => {
                self.clear_status();
                let query = match &self.screen {
                    Screen::Jukebox(jukebox) => jukebox.filter.clone().unwrap_or_default(),
                    _ => String::new(),
                };
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingSong(SongForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(song) = self.current_song().cloned() {
                    self.clear_status();
                    return Ok(Mode::EditingSong {
                        id: song.id,
                        form: SongForm::from_song(&song),
                    });
                } else {
                    self.set_status("No track selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') => {
                if let Some(song) = self.current_song() {
                    let confirm = ConfirmSongDelete::from(song);
                    self.clear_status();
                    return Ok(Mode::ConfirmSongDelete(confirm));
                } else {
                    self.set_status("No track selected to delete.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_song(&mut self, code: KeyCode, mut form: SongForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add track cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_song(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingSong(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_song(&mut self, code: KeyCode, id: i64, mut form: SongForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_song(id, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingSong { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_song_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmSongDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match delete_song(&self.conn, confirm.id) {
                    Ok(_) => {
                        self.refresh_songs()?;
                        self.set_status("Track deleted.", StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmSongDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmSongDelete(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        let jukebox = match &mut self.screen {
            Screen::Jukebox(jukebox) => jukebox,
            _ => return Ok(Mode::Normal),
        };

        match code {
            KeyCode::Esc => {
                jukebox.set_filter(None);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                jukebox.move_selection(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                jukebox.move_selection(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Home => {
                jukebox.select_first();
                return Ok(Mode::Searching(state));
            }
            KeyCode::End => {
                jukebox.select_last();
                return Ok(Mode::Searching(state));
            }
            KeyCode::Enter => {
                // Keep the narrowed list and return to normal navigation.
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    state.query.push(ch);
                }
            }
            _ => return Ok(Mode::Searching(state)),
        }

        jukebox.set_filter(Some(state.query.clone()));
        Ok(Mode::Searching(state))
    }

    /// Enter the jukebox screen, reloading the catalog so the list reflects
    /// whatever is stored right now.
    fn open_jukebox(&mut self) -> Result<()> {
        self.refresh_catalog()?;
        self.clear_status();
        self.screen = Screen::Jukebox(JukeboxScreen::new(self.songs.clone()));
        Ok(())
    }

    /// Return to the start menu, dropping any per-screen state.
    fn leave_jukebox(&mut self) {
        self.clear_status();
        self.screen = Screen::Start(StartScreen::new());
    }

    /// Toggle one overlay through the tracker. `Opened` means any previously
    /// showing overlay has already been closed on our behalf; `Closed` means
    /// the requested overlay was the open one and we hide it ourselves.
    fn toggle_overlay(&mut self, kind: OverlayKind) {
        let handle = Rc::clone(&self.overlay_handle(kind).close);
        match self.overlays.request(Some(handle)) {
            OverlayRequest::Opened => self.overlay_handle(kind).visible.set(true),
            OverlayRequest::Closed => self.overlay_handle(kind).visible.set(false),
        }
    }

    /// Close whichever overlay is open, if any. Returns whether one was open.
    fn close_open_overlay(&mut self) -> bool {
        if !self.overlays.has_open() {
            return false;
        }
        if self.overlays.request(None) == OverlayRequest::Closed {
            // At most one flag is ever set, so clearing all three is the same
            // as hiding the one that was showing.
            for handle in [&self.credits, &self.details, &self.help] {
                handle.visible.set(false);
            }
        }
        true
    }

    fn overlay_handle(&self, kind: OverlayKind) -> &OverlayHandle {
        match kind {
            OverlayKind::Credits => &self.credits,
            OverlayKind::Details => &self.details,
            OverlayKind::Help => &self.help,
        }
    }

    fn visible_overlay(&self) -> Option<OverlayKind> {
        if self.credits.visible.get() {
            Some(OverlayKind::Credits)
        } else if self.details.visible.get() {
            Some(OverlayKind::Details)
        } else if self.help.visible.get() {
            Some(OverlayKind::Help)
        } else {
            None
        }
    }

    fn play_selected(&mut self) {
        let song = match self.current_song().cloned() {
            Some(song) => song,
            None => {
                self.set_status("No track selected to play.", StatusKind::Error);
                return;
            }
        };

        match play_resource(&song.resource) {
            Ok(_) => {
                self.set_status(format!("Playing {}.", song.display_title()), StatusKind::Info)
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    fn current_song(&self) -> Option<&Song> {
        match &self.screen {
            Screen::Jukebox(jukebox) => jukebox.current_song(),
            _ => None,
        }
    }

    fn move_jukebox_selection(&mut self, offset: isize) {
        if let Screen::Jukebox(jukebox) = &mut self.screen {
            jukebox.move_selection(offset);
        }
    }

    fn save_new_song(&mut self, form: &SongForm) -> Result<()> {
        let (title, artist, resource) = form.parse_inputs()?;
        create_song(&self.conn, &title, &artist, &resource)?;
        self.refresh_songs()?;
        self.set_status(format!("Added '{title}'."), StatusKind::Info);
        Ok(())
    }

    fn save_existing_song(&mut self, id: i64, form: &SongForm) -> Result<()> {
        let (title, artist, resource) = form.parse_inputs()?;
        update_song(&self.conn, id, &title, &artist, &resource)?;
        self.refresh_songs()?;
        self.set_status("Track updated.", StatusKind::Info);
        Ok(())
    }

    /// Re-read the catalog from storage into the app-level cache.
    fn refresh_catalog(&mut self) -> Result<()> {
        self.songs = fetch_songs(&self.conn)?;
        Ok(())
    }

    /// Re-read the catalog and push it into the jukebox screen, preserving the
    /// active filter and keeping the selection in bounds.
    fn refresh_songs(&mut self) -> Result<()> {
        self.refresh_catalog()?;
        if let Screen::Jukebox(jukebox) = &mut self.screen {
            jukebox.set_songs(self.songs.clone());
        }
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Start(start) => self.draw_start(frame, content_area, start),
            Screen::Jukebox(jukebox) => self.draw_jukebox(frame, content_area, jukebox),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match self.visible_overlay() {
            Some(OverlayKind::Credits) => self.draw_credits_overlay(frame, area),
            Some(OverlayKind::Details) => self.draw_details_overlay(frame, area),
            Some(OverlayKind::Help) => self.draw_help_overlay(frame, area),
            None => {}
        }

        match &self.mode {
            Mode::AddingSong(form) => self.draw_song_form(frame, area, "Add Track", form),
            Mode::EditingSong { form, .. } => self.draw_song_form(frame, area, "Edit Track", form),
            Mode::ConfirmSongDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_start(&self, frame: &mut Frame, area: Rect, start: &StartScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "Soundtrack Jukebox",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::raw("Listen to the songs of the game.")),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(banner, chunks[0]);

        let items: Vec<ListItem> = START_ITEMS
            .iter()
            .map(|item| ListItem::new(Line::from(*item)))
            .collect();
        let mut state = ListState::default();
        state.select(Some(start.selected));

        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(menu, chunks[1], &mut state);
    }

    fn draw_jukebox(&self, frame: &mut Frame, area: Rect, jukebox: &JukeboxScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let filtered = jukebox.filtered_songs.len();
        let total = jukebox.songs.len();
        let summary = if filtered == total {
            format!("{total} tracks")
        } else {
            format!("{filtered} of {total} tracks")
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Soundtrack", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  •  {summary}")),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        if jukebox.songs.is_empty() {
            let message = Paragraph::new("No tracks yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        if jukebox.filtered_songs.is_empty() {
            let message = Paragraph::new("No tracks match the current search.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = jukebox
            .filtered_songs
            .iter()
            .map(|song| ListItem::new(Line::from(song.display_title())))
            .collect();
        let mut state = ListState::default();
        state.select(Some(jukebox.selected));

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tracks"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("♪ ");
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match (&self.mode, &self.screen) {
            (Mode::Searching(_), _) => {
                "Type to search  •  Enter keep  •  Esc clear  •  Up/Down move"
            }
            (Mode::AddingSong(_) | Mode::EditingSong { .. }, _) => {
                "Tab next field  •  Enter save  •  Esc cancel"
            }
            (Mode::ConfirmSongDelete(_), _) => "y/Enter confirm  •  n/Esc cancel",
            (_, Screen::Start(_)) => "Up/Down move  •  Enter select  •  q quit",
            (_, Screen::Jukebox(_)) => {
                "Enter play  •  c credits  •  i details  •  h help  •  / search  •  Esc back"
            }
        };
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    }

    fn draw_credits_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let lines: Vec<Line> = CREDITS.iter().map(|line| Line::from(*line)).collect();
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Credits"));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_details_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let lines = match self.current_song() {
            Some(song) => {
                let resource = if song.resource.trim().is_empty() {
                    "<none>".to_string()
                } else {
                    song.resource.clone()
                };
                let artist = if song.artist.trim().is_empty() {
                    "<unknown>".to_string()
                } else {
                    song.artist.clone()
                };
                vec![
                    Line::from(vec![
                        Span::raw("Title: "),
                        Span::styled(
                            song.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(format!("Artist: {artist}")),
                    Line::from(format!("Resource: {resource}")),
                ]
            }
            None => vec![Line::from("No track selected.")],
        };

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Track Details"));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let lines: Vec<Line> = HELP_BINDINGS
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{key:<12}"), Style::default().fg(Color::Cyan)),
                    Span::raw(*action),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(60, 45, area);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![
            form.build_line("Title", SongField::Title),
            form.build_line("Artist", SongField::Artist),
            form.build_line("Resource", SongField::Resource),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Tab switches fields, Enter saves, Esc cancels.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' from the catalog?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "y/Enter confirm  •  n/Esc cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Delete Track"));
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{apply_schema, load_or_seed_songs};

    fn test_app() -> App {
        let conn = Connection::open_in_memory().expect("in-memory database");
        apply_schema(&conn).expect("schema");
        let songs = load_or_seed_songs(&conn).expect("seed");
        App::new(conn, songs)
    }

    fn enter_jukebox(app: &mut App) {
        // Start menu opens with "Soundtrack" selected.
        app.handle_key(KeyCode::Enter).expect("enter jukebox");
        assert!(matches!(app.screen, Screen::Jukebox(_)));
    }

    #[test]
    fn opening_a_second_overlay_closes_the_first() {
        let mut app = test_app();
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('c')).expect("credits");
        assert_eq!(app.visible_overlay(), Some(OverlayKind::Credits));

        app.handle_key(KeyCode::Char('h')).expect("help");
        assert_eq!(app.visible_overlay(), Some(OverlayKind::Help));
        assert!(!app.credits.visible.get());
    }

    #[test]
    fn pressing_the_same_overlay_key_toggles_it_off() {
        let mut app = test_app();
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('i')).expect("details");
        assert_eq!(app.visible_overlay(), Some(OverlayKind::Details));

        app.handle_key(KeyCode::Char('i')).expect("details again");
        assert_eq!(app.visible_overlay(), None);
        assert!(!app.overlays.has_open());
    }

    #[test]
    fn escape_closes_the_overlay_before_leaving_the_screen() {
        let mut app = test_app();
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('c')).expect("credits");
        app.handle_key(KeyCode::Esc).expect("first esc");
        assert_eq!(app.visible_overlay(), None);
        assert!(matches!(app.screen, Screen::Jukebox(_)));

        app.handle_key(KeyCode::Esc).expect("second esc");
        assert!(matches!(app.screen, Screen::Start(_)));
    }

    #[test]
    fn search_narrows_the_list_and_escape_clears_it() {
        let mut app = test_app();
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('/')).expect("search");
        for ch in "tavern".chars() {
            app.handle_key(KeyCode::Char(ch)).expect("type");
        }
        if let Screen::Jukebox(jukebox) = &app.screen {
            assert_eq!(jukebox.filtered_songs.len(), 1);
            assert_eq!(jukebox.filtered_songs[0].title, "Tavern Reel");
        } else {
            panic!("expected jukebox screen");
        }

        app.handle_key(KeyCode::Esc).expect("clear search");
        if let Screen::Jukebox(jukebox) = &app.screen {
            assert_eq!(jukebox.filtered_songs.len(), jukebox.songs.len());
        } else {
            panic!("expected jukebox screen");
        }
    }

    #[test]
    fn add_form_persists_a_track_and_refreshes_the_list() {
        let mut app = test_app();
        enter_jukebox(&mut app);
        let before = app.songs.len();

        app.handle_key(KeyCode::Char('+')).expect("open form");
        for ch in "Aria".chars() {
            app.handle_key(KeyCode::Char(ch)).expect("type title");
        }
        app.handle_key(KeyCode::Enter).expect("save");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.songs.len(), before + 1);
        if let Screen::Jukebox(jukebox) = &app.screen {
            assert!(jukebox.songs.iter().any(|s| s.title == "Aria"));
        } else {
            panic!("expected jukebox screen");
        }
    }

    #[test]
    fn empty_title_keeps_the_form_open_with_an_error() {
        let mut app = test_app();
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('+')).expect("open form");
        app.handle_key(KeyCode::Enter).expect("submit empty");
        match &app.mode {
            Mode::AddingSong(form) => assert!(form.error.is_some()),
            _ => panic!("expected the form to stay open"),
        }
    }

    #[test]
    fn delete_confirmation_removes_the_selected_track() {
        let mut app = test_app();
        enter_jukebox(&mut app);
        let before = app.songs.len();
        let selected = app.current_song().expect("selection").title.clone();

        app.handle_key(KeyCode::Char('-')).expect("confirm modal");
        app.handle_key(KeyCode::Char('y')).expect("confirm");

        assert_eq!(app.songs.len(), before - 1);
        assert!(app.songs.iter().all(|s| s.title != selected));
    }

    #[test]
    fn playing_without_a_resource_reports_an_error_status() {
        let conn = Connection::open_in_memory().expect("in-memory database");
        apply_schema(&conn).expect("schema");
        crate::db::create_song(&conn, "Silent", "", "").expect("insert");
        let songs = crate::db::fetch_songs(&conn).expect("fetch");
        let mut app = App::new(conn, songs);
        enter_jukebox(&mut app);

        app.handle_key(KeyCode::Char('p')).expect("play");
        match &app.status {
            Some(status) => assert!(matches!(status.kind, StatusKind::Error)),
            None => panic!("expected an error status"),
        }
    }
}
