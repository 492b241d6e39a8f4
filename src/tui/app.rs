// app state for the tui

use crate::api::GenerateResponse;
use crate::core::{Exchange, Validation};
use crate::tui::theme::{Theme, ThemeKind, detect_theme};

pub const DEFAULT_USER_ID: &str = "abc123";

// oldest entries are dropped past this
pub const MAX_LOG_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Users,
    History,
    Form,
    Answer,
}

impl Panel {
    const ORDER: [Panel; 4] = [Panel::Form, Panel::Answer, Panel::Users, Panel::History];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Themes,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserId,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Ok,
    Warn,
    Error,
}

pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub panel: Panel,
    pub popup: Popup,
    pub theme_kind: ThemeKind,
    pub theme: Theme,
    pub api_url: String,

    // sidebar
    pub users: Vec<String>,
    pub user_index: usize,
    pub history: Vec<Exchange>,
    pub history_user: Option<String>,
    pub history_index: usize,

    // form
    pub field: Field,
    pub user_id: String,
    pub user_cursor: usize,
    pub query: String,
    pub query_cursor: usize,
    pub errors: Vec<String>,

    // last answer
    pub answer: Option<GenerateResponse>,
    pub error: Option<String>,
    pub latency_ms: Option<u64>,

    pub logs: Vec<LogEntry>,
    pub loading: bool,

    // scroll
    pub answer_scroll: u16,
    pub detail_scroll: u16,
    pub theme_scroll: usize,
}

impl App {
    pub fn new(api_url: &str) -> Self {
        Self::with_theme(api_url, detect_theme())
    }

    pub fn with_theme(api_url: &str, theme_kind: ThemeKind) -> Self {
        let mut app = Self {
            running: true,
            mode: Mode::Normal,
            panel: Panel::Form,
            popup: Popup::None,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
            api_url: api_url.to_string(),
            users: Vec::new(),
            user_index: 0,
            history: Vec::new(),
            history_user: None,
            history_index: 0,
            field: Field::Query,
            user_id: DEFAULT_USER_ID.to_string(),
            user_cursor: DEFAULT_USER_ID.len(),
            query: String::new(),
            query_cursor: 0,
            errors: Vec::new(),
            answer: None,
            error: None,
            latency_ms: None,
            logs: Vec::new(),
            loading: false,
            answer_scroll: 0,
            detail_scroll: 0,
            theme_scroll: theme_kind.index(),
        };

        app.log(LogLevel::Info, format!("gateway {api_url}"));
        app
    }

    pub fn log(&mut self, level: LogLevel, message: String) {
        self.logs.push(LogEntry { level, message });
        if self.logs.len() > MAX_LOG_ENTRIES {
            let excess = self.logs.len() - MAX_LOG_ENTRIES;
            self.logs.drain(..excess);
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // panels and modes

    pub fn cycle_panel(&mut self) {
        let idx = Panel::ORDER
            .iter()
            .position(|&p| p == self.panel)
            .unwrap_or(0);
        self.panel = Panel::ORDER[(idx + 1) % Panel::ORDER.len()];
    }

    pub fn enter_insert(&mut self) {
        self.panel = Panel::Form;
        self.mode = Mode::Insert;
    }

    pub fn exit_insert(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            Field::UserId => Field::Query,
            Field::Query => Field::UserId,
        };
    }

    // form editing, cursors count chars

    fn active(&mut self) -> (&mut String, &mut usize) {
        match self.field {
            Field::UserId => (&mut self.user_id, &mut self.user_cursor),
            Field::Query => (&mut self.query, &mut self.query_cursor),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let (text, cursor) = self.active();
        let at = byte_index(text, *cursor);
        text.insert(at, c);
        *cursor += 1;
    }

    pub fn delete_char(&mut self) {
        let (text, cursor) = self.active();
        if *cursor > 0 {
            *cursor -= 1;
            let at = byte_index(text, *cursor);
            text.remove(at);
        }
    }

    pub fn delete_char_forward(&mut self) {
        let (text, cursor) = self.active();
        if *cursor < text.chars().count() {
            let at = byte_index(text, *cursor);
            text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        let (_, cursor) = self.active();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let (text, cursor) = self.active();
        if *cursor < text.chars().count() {
            *cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        let (_, cursor) = self.active();
        *cursor = 0;
    }

    pub fn move_end(&mut self) {
        let (text, cursor) = self.active();
        *cursor = text.chars().count();
    }

    pub fn clear_field(&mut self) {
        let (text, cursor) = self.active();
        text.clear();
        *cursor = 0;
    }

    /// Validate the form. Returns `(user_id, query)` when it can be sent.
    pub fn submit(&mut self) -> Option<(String, String)> {
        let validation = Validation::check(&self.user_id, &self.query);
        if !validation.is_ok() {
            for e in &validation.errors {
                self.log(LogLevel::Warn, e.clone());
            }
            self.errors = validation.errors;
            return None;
        }

        self.errors.clear();
        self.error = None;
        self.loading = true;
        Some((self.user_id.trim().to_string(), self.query.clone()))
    }

    pub fn set_answer(&mut self, answer: GenerateResponse, elapsed_ms: u64) {
        self.loading = false;
        self.latency_ms = Some(elapsed_ms);
        self.answer_scroll = 0;
        self.log(
            LogLevel::Ok,
            format!("answered in {elapsed_ms}ms ({})", answer.id),
        );
        self.answer = Some(answer);
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.log(LogLevel::Error, error.clone());
        self.error = Some(error);
    }

    // users and history

    /// Replace the user list, keeping the form's user selected when listed.
    pub fn set_users(&mut self, users: Vec<String>) {
        let keep = self
            .selected_user()
            .map(str::to_string)
            .unwrap_or_else(|| self.user_id.clone());

        self.user_index = users.iter().position(|u| *u == keep).unwrap_or(0);
        self.log(LogLevel::Info, format!("{} users", users.len()));
        self.users = users;
    }

    pub fn select_user(&mut self, user_id: &str) {
        if let Some(idx) = self.users.iter().position(|u| u == user_id) {
            self.user_index = idx;
        }
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.users.get(self.user_index).map(String::as_str)
    }

    /// Move the selection; returns the newly selected user.
    pub fn user_down(&mut self) -> Option<String> {
        if self.user_index + 1 < self.users.len() {
            self.user_index += 1;
            return self.selected_user().map(str::to_string);
        }
        None
    }

    pub fn user_up(&mut self) -> Option<String> {
        if self.user_index > 0 {
            self.user_index -= 1;
            return self.selected_user().map(str::to_string);
        }
        None
    }

    pub fn set_history(&mut self, user_id: String, history: Vec<Exchange>) {
        if history.is_empty() {
            self.log(LogLevel::Info, format!("no history for {user_id}"));
        }
        self.history = history;
        self.history_index = 0;
        self.history_user = Some(user_id);
    }

    pub fn selected_record(&self) -> Option<&Exchange> {
        self.history.get(self.history_index)
    }

    pub fn history_down(&mut self) {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
        }
    }

    pub fn history_up(&mut self) {
        self.history_index = self.history_index.saturating_sub(1);
    }

    pub fn open_detail(&mut self) {
        if self.selected_record().is_some() {
            self.detail_scroll = 0;
            self.popup = Popup::Detail;
        }
    }

    // scrolling

    pub fn scroll_down(&mut self) {
        match self.popup {
            Popup::Detail => self.detail_scroll = self.detail_scroll.saturating_add(1),
            _ => self.answer_scroll = self.answer_scroll.saturating_add(1),
        }
    }

    pub fn scroll_up(&mut self) {
        match self.popup {
            Popup::Detail => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            _ => self.answer_scroll = self.answer_scroll.saturating_sub(1),
        }
    }

    // themes

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::from_kind(kind);
        self.theme_scroll = kind.index();
    }

    pub fn open_theme_popup(&mut self) {
        self.popup = Popup::Themes;
        self.theme_scroll = self.theme_kind.index();
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    pub fn theme_scroll_up(&mut self) {
        if self.theme_scroll > 0 {
            self.theme_scroll -= 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn theme_scroll_down(&mut self) {
        if self.theme_scroll < ThemeKind::ALL.len() - 1 {
            self.theme_scroll += 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn select_theme(&mut self) {
        self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        self.close_popup();
    }
}

fn byte_index(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
