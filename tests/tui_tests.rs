// tests for tui state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use twintone::tui::{
    Action, App, DEFAULT_USER_ID, Field, LogLevel, MAX_LOG_ENTRIES, Mode, Panel, ThemeKind,
    handle_key,
};

fn app() -> App {
    App::with_theme("http://localhost:8000", ThemeKind::Dark)
}

fn press(app: &mut App, code: KeyCode) -> Action {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn test_submit_valid_query() {
    let mut app = app();
    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.mode, Mode::Insert);
    assert_eq!(app.field, Field::Query);

    type_text(&mut app, "Explain blockchain");
    let action = press(&mut app, KeyCode::Enter);

    assert_eq!(
        action,
        Action::Submit {
            user_id: DEFAULT_USER_ID.to_string(),
            query: "Explain blockchain".to_string(),
        }
    );
    assert!(app.loading);
    assert_eq!(app.mode, Mode::Normal);
}

#[test]
fn test_invalid_form_is_not_sent() {
    let mut app = app();
    press(&mut app, KeyCode::Char('i'));
    type_text(&mut app, "   ");

    assert_eq!(press(&mut app, KeyCode::Enter), Action::None);
    assert!(!app.errors.is_empty());
    assert!(!app.loading);
    assert_eq!(app.mode, Mode::Insert);
}

#[test]
fn test_edit_user_id_field() {
    let mut app = app();
    press(&mut app, KeyCode::Char('u'));
    assert_eq!(app.field, Field::UserId);

    handle_key(
        &mut app,
        KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
    );
    type_text(&mut app, "zoë");
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.user_id, "zë");

    // enter moves on to the query
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.field, Field::Query);
}

#[test]
fn test_user_selection_loads_history() {
    let mut app = app();
    app.set_users(vec!["alice".into(), "bob".into()]);
    app.panel = Panel::Users;

    assert_eq!(
        press(&mut app, KeyCode::Char('j')),
        Action::LoadHistory("bob".to_string())
    );
    // already at the bottom
    assert_eq!(press(&mut app, KeyCode::Down), Action::None);
    assert_eq!(
        press(&mut app, KeyCode::Enter),
        Action::LoadHistory("bob".to_string())
    );
}

#[test]
fn test_set_users_keeps_form_user_selected() {
    let mut app = app();
    app.set_users(vec!["a".into(), DEFAULT_USER_ID.into(), "z".into()]);
    assert_eq!(app.selected_user(), Some(DEFAULT_USER_ID));
}

#[test]
fn test_keys_ignored_while_loading() {
    let mut app = app();
    app.loading = true;
    assert_eq!(press(&mut app, KeyCode::Char('q')), Action::None);
    assert_eq!(
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ),
        Action::Quit
    );
}

#[test]
fn test_tab_cycles_panels() {
    let mut app = app();
    assert_eq!(app.panel, Panel::Form);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.panel, Panel::Answer);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.panel, Panel::Form);
}

#[test]
fn test_log_keeps_recent_entries() {
    let mut app = app();
    for i in 0..MAX_LOG_ENTRIES * 3 {
        app.log(LogLevel::Info, format!("entry {i}"));
    }

    assert_eq!(app.logs.len(), MAX_LOG_ENTRIES);
    let last = app.logs.last().unwrap();
    assert_eq!(last.message, format!("entry {}", MAX_LOG_ENTRIES * 3 - 1));
}
