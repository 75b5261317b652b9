// TUI event loop and terminal management
use crate::{App, InputMode};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use repolens_core::{session::run_search, Config, RepoFetcher};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// How long to wait for a key event before checking for fetch results.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_tui(
    mut app: App,
    fetcher: Arc<dyn RepoFetcher>,
    mut config: Config,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Fetch results come back over this channel, tagged with their epoch,
    // so the loop never blocks on the network.
    let (tx, mut rx) = mpsc::unbounded_channel();

    // A username passed on the command line starts a search right away
    if !app.username_input.is_empty() {
        if let Some(ticket) = app.submit_username() {
            tokio::spawn(run_search(Arc::clone(&fetcher), ticket, tx.clone()));
        }
    }

    // Main loop
    loop {
        while let Ok(envelope) = rx.try_recv() {
            app.apply(envelope);
        }

        terminal.draw(|f| crate::ui::render(f, &mut app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match app.input_mode {
                    InputMode::EnteringUsername => match key.code {
                        KeyCode::Enter => {
                            if let Some(ticket) = app.submit_username() {
                                let fetcher = Arc::clone(&fetcher);
                                let tx = tx.clone();
                                tokio::spawn(run_search(fetcher, ticket, tx));
                            }
                        }
                        KeyCode::Char(c) => {
                            app.username_input.push(c);
                        }
                        KeyCode::Backspace => {
                            app.username_input.pop();
                        }
                        KeyCode::Esc => {
                            app.enter_normal_mode();
                        }
                        _ => {}
                    },
                    InputMode::EditingNameFilter => match key.code {
                        KeyCode::Enter | KeyCode::Esc => {
                            app.finish_filter_edit();
                        }
                        KeyCode::Char(c) => {
                            app.push_filter_char(c);
                        }
                        KeyCode::Backspace => {
                            app.pop_filter_char();
                        }
                        _ => {}
                    },
                    InputMode::PickingLanguage => match key.code {
                        KeyCode::Enter => {
                            app.apply_language_choice();
                        }
                        KeyCode::Esc => {
                            app.cancel_language_picker();
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            app.next_language();
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            app.previous_language();
                        }
                        _ => {}
                    },
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => {
                            app.quit();
                        }
                        KeyCode::Char('/') => {
                            app.username_input.clear();
                            app.enter_username_mode();
                        }
                        KeyCode::Char('f') => {
                            if app.session.profile().is_some() {
                                app.start_filter_edit();
                            }
                        }
                        KeyCode::Char('l') => {
                            if app.session.profile().is_some() {
                                app.open_language_picker();
                            }
                        }
                        KeyCode::Char('t') => {
                            config.ui.theme = app.toggle_theme();
                            if let Err(e) = config.save() {
                                warn!(%e, "failed to persist theme preference");
                            }
                        }
                        KeyCode::Right | KeyCode::Char('n') => {
                            app.next_page();
                        }
                        KeyCode::Left | KeyCode::Char('p') => {
                            app.previous_page();
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            app.next_result();
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            app.previous_result();
                        }
                        KeyCode::Char('o') => {
                            if let Some(profile) = app.session.profile() {
                                let url = profile.html_url.clone();
                                if let Err(e) = open::that(&url) {
                                    warn!(%e, url, "failed to open browser");
                                }
                            }
                        }
                        KeyCode::Enter => {
                            if let Some(repo) = app.selected_repository() {
                                let url = repo.url.clone();
                                if let Err(e) = open::that(&url) {
                                    warn!(%e, url, "failed to open browser");
                                }
                            }
                        }
                        _ => {}
                    },
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
