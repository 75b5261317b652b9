// TUI application state and event handling
use ratatui::widgets::ListState;
use repolens_core::models::Repository;
use repolens_core::{Envelope, SearchTicket, Session, ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing a username in the account search bar
    EnteringUsername,
    /// Navigating the repository list
    Normal,
    /// Typing in the repository name filter
    EditingNameFilter,
    /// Choosing a language from the derived set
    PickingLanguage,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub username_input: String,
    pub filter_input: String,
    /// Cursor into the language picker; 0 means "all languages"
    pub language_cursor: usize,
    pub theme: ThemeMode,
    pub session: Session,
    pub list_state: ListState,
}

impl App {
    pub fn new(theme: ThemeMode) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::EnteringUsername,
            username_input: String::new(),
            filter_input: String::new(),
            language_cursor: 0,
            theme,
            session: Session::new(),
            list_state: ListState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_username_mode(&mut self) {
        self.input_mode = InputMode::EnteringUsername;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Kick off a search for the typed username. Blank input is a no-op.
    pub fn submit_username(&mut self) -> Option<SearchTicket> {
        let ticket = self.session.begin_search(&self.username_input)?;
        self.filter_input.clear();
        self.language_cursor = 0;
        self.list_state.select(None);
        self.input_mode = InputMode::Normal;
        Some(ticket)
    }

    /// Route a fetch result into the session and keep the list cursor valid.
    pub fn apply(&mut self, envelope: Envelope) {
        self.session.apply(envelope);
        self.clamp_selection();
    }

    pub fn start_filter_edit(&mut self) {
        self.filter_input = self.session.browse().name_filter().to_string();
        self.input_mode = InputMode::EditingNameFilter;
    }

    /// Filtering is live, like typing in a search box.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_input.push(c);
        self.session.set_name_filter(self.filter_input.clone());
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_input.pop();
        self.session.set_name_filter(self.filter_input.clone());
        self.clamp_selection();
    }

    pub fn finish_filter_edit(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn open_language_picker(&mut self) {
        let current = self.session.browse().language_filter().to_string();
        self.language_cursor = self
            .session
            .browse()
            .languages()
            .iter()
            .position(|l| *l == current)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.input_mode = InputMode::PickingLanguage;
    }

    /// Picker entries: "(all)" followed by the derived language set.
    pub fn language_option_count(&self) -> usize {
        self.session.browse().languages().len() + 1
    }

    pub fn next_language(&mut self) {
        self.language_cursor = (self.language_cursor + 1).min(self.language_option_count() - 1);
    }

    pub fn previous_language(&mut self) {
        self.language_cursor = self.language_cursor.saturating_sub(1);
    }

    pub fn apply_language_choice(&mut self) {
        let filter = if self.language_cursor == 0 {
            String::new()
        } else {
            self.session.browse().languages()[self.language_cursor - 1].clone()
        };
        self.session.set_language_filter(filter);
        self.clamp_selection();
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_language_picker(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_page(&mut self) {
        self.session.change_page(1);
        self.list_state.select(None);
    }

    pub fn previous_page(&mut self) {
        self.session.change_page(-1);
        self.list_state.select(None);
    }

    pub fn next_result(&mut self) {
        let len = self.session.browse().displayed().len();
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn previous_result(&mut self) {
        if self.session.browse().displayed().is_empty() {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(prev));
    }

    pub fn selected_repository(&self) -> Option<&Repository> {
        self.session
            .browse()
            .displayed()
            .get(self.list_state.selected()?)
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    fn clamp_selection(&mut self) {
        let len = self.session.browse().displayed().len();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_core::FetchUpdate;

    fn repo(id: u64, name: &str, language: Option<&str>) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            description: None,
            language: language.map(String::from),
            url: format!("https://github.com/octocat/{name}"),
        }
    }

    fn app_with_repos(repos: Vec<Repository>) -> App {
        let mut app = App::new(ThemeMode::Dark);
        app.username_input = "octocat".to_string();
        let ticket = app.submit_username().unwrap();
        app.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::FullList(repos),
        });
        app
    }

    #[test]
    fn blank_username_is_not_submitted() {
        let mut app = App::new(ThemeMode::Dark);
        app.username_input = "   ".to_string();
        assert!(app.submit_username().is_none());
        assert_eq!(app.input_mode, InputMode::EnteringUsername);
    }

    #[test]
    fn submit_clears_filters_from_previous_search() {
        let mut app = app_with_repos(vec![repo(1, "hello", Some("Rust"))]);
        app.push_filter_char('h');
        assert_eq!(app.session.browse().name_filter(), "h");

        app.username_input = "torvalds".to_string();
        app.submit_username().unwrap();
        assert_eq!(app.filter_input, "");
        assert_eq!(app.session.browse().name_filter(), "");
    }

    #[test]
    fn filter_edit_applies_live() {
        let mut app = app_with_repos(vec![
            repo(1, "hello", Some("Rust")),
            repo(2, "world", Some("Go")),
        ]);

        app.start_filter_edit();
        app.push_filter_char('w');
        assert_eq!(app.session.browse().displayed().len(), 1);
        assert_eq!(app.session.browse().displayed()[0].name, "world");

        app.pop_filter_char();
        assert_eq!(app.session.browse().displayed().len(), 2);
    }

    #[test]
    fn language_picker_applies_and_clears() {
        let mut app = app_with_repos(vec![
            repo(1, "a", Some("Rust")),
            repo(2, "b", Some("Go")),
            repo(3, "c", None),
        ]);

        app.open_language_picker();
        assert_eq!(app.language_option_count(), 3);

        app.next_language();
        app.apply_language_choice();
        assert_eq!(app.session.browse().language_filter(), "Rust");
        assert_eq!(app.session.browse().displayed().len(), 1);

        app.open_language_picker();
        // cursor restored onto the active language
        assert_eq!(app.language_cursor, 1);
        app.previous_language();
        app.apply_language_choice();
        assert_eq!(app.session.browse().language_filter(), "");
        assert_eq!(app.session.browse().displayed().len(), 3);
    }

    #[test]
    fn selection_clamps_when_the_list_shrinks() {
        let repos: Vec<_> = (1..=10)
            .map(|i| repo(i, &format!("repo-{i}"), Some("Rust")))
            .collect();
        let mut app = app_with_repos(repos);

        for _ in 0..9 {
            app.next_result();
        }
        assert_eq!(app.list_state.selected(), Some(9));

        app.start_filter_edit();
        app.push_filter_char('1');
        // "repo-1" and "repo-10" survive
        assert_eq!(app.session.browse().displayed().len(), 2);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn theme_toggle_round_trips() {
        let mut app = App::new(ThemeMode::Dark);
        assert_eq!(app.toggle_theme(), ThemeMode::Light);
        assert_eq!(app.toggle_theme(), ThemeMode::Dark);
    }
}
