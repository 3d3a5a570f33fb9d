//! Ratatui front-end for the Soundtrack Jukebox, split across focused
//! submodules: screen state, overlay tracking, modal forms, and the terminal
//! lifecycle around the central `App`.

mod app;
mod forms;
mod helpers;
mod overlay;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
