// event handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::app::{App, Field, Mode, Panel, Popup};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit { user_id: String, query: String },
    LoadHistory(String),
    RefreshUsers,
}

pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        _ => Action::None,
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // no input while a request is in flight
    if app.loading {
        return Action::None;
    }

    match app.popup {
        Popup::Themes => return handle_theme_popup(app, key),
        Popup::Detail => return handle_detail_popup(app, key),
        Popup::None => {}
    }

    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::Insert => handle_insert_key(app, key),
    }
}

fn handle_theme_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        KeyCode::Char('j') | KeyCode::Down => app.theme_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.theme_scroll_up(),
        KeyCode::Enter => app.select_theme(),
        _ => {}
    }
    Action::None
}

fn handle_detail_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.close_popup(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        _ => {}
    }
    Action::None
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,

        KeyCode::Char('i') => {
            app.enter_insert();
            Action::None
        }
        KeyCode::Char('u') => {
            app.field = Field::UserId;
            app.enter_insert();
            Action::None
        }

        KeyCode::Tab => {
            app.cycle_panel();
            Action::None
        }

        KeyCode::Char('t') => {
            app.open_theme_popup();
            Action::None
        }

        KeyCode::Char('r') => Action::RefreshUsers,

        KeyCode::Char('j') | KeyCode::Down => match app.panel {
            Panel::Users => app.user_down().map_or(Action::None, Action::LoadHistory),
            Panel::History => {
                app.history_down();
                Action::None
            }
            Panel::Answer => {
                app.scroll_down();
                Action::None
            }
            Panel::Form => Action::None,
        },
        KeyCode::Char('k') | KeyCode::Up => match app.panel {
            Panel::Users => app.user_up().map_or(Action::None, Action::LoadHistory),
            Panel::History => {
                app.history_up();
                Action::None
            }
            Panel::Answer => {
                app.scroll_up();
                Action::None
            }
            Panel::Form => Action::None,
        },

        KeyCode::Enter => match app.panel {
            Panel::Users => app
                .selected_user()
                .map_or(Action::None, |u| Action::LoadHistory(u.to_string())),
            Panel::History => {
                app.open_detail();
                Action::None
            }
            Panel::Form => {
                app.enter_insert();
                Action::None
            }
            Panel::Answer => Action::None,
        },

        _ => Action::None,
    }
}

fn handle_insert_key(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('a') => app.move_start(),
            KeyCode::Char('e') => app.move_end(),
            KeyCode::Char('u') => app.clear_field(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => app.exit_insert(),
        KeyCode::Tab => app.next_field(),
        KeyCode::Enter => match app.field {
            Field::UserId => app.next_field(),
            Field::Query => {
                return match app.submit() {
                    Some((user_id, query)) => {
                        app.exit_insert();
                        Action::Submit { user_id, query }
                    }
                    None => Action::None,
                };
            }
        },
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_start(),
        KeyCode::End => app.move_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
    Action::None
}
