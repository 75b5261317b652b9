// Terminal UI implementation using ratatui
// The pretty face of RepoLens

pub mod app;
pub mod runner;
pub mod theme;
pub mod ui;

pub use app::{App, InputMode};
pub use runner::run_tui;
pub use theme::Palette;
