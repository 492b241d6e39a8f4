// terminal ui - a client for the gateway

mod app;
mod ascii;
mod event;
mod theme;
mod ui;

pub use app::{App, DEFAULT_USER_ID, Field, LogLevel, MAX_LOG_ENTRIES, Mode, Panel, Popup};
pub use event::{Action, handle_key};
pub use theme::ThemeKind;

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crate::Error;
use crate::api::ApiClient;
use event::{handle_event, poll_event};

// same page size the web ui used
const HISTORY_LIMIT: i64 = 50;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(api: ApiClient) -> Result<(), Error> {
    // setup terminal
    enable_raw_mode().map_err(|e| Error::Server(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| Error::Server(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| Error::Server(e.to_string()))?;

    let result = run_app(&mut terminal, api).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn draw(terminal: &mut Term, app: &App) -> Result<(), Error> {
    terminal
        .draw(|frame| ui::render(frame, app))
        .map_err(|e| Error::Server(e.to_string()))?;
    Ok(())
}

async fn run_app(terminal: &mut Term, api: ApiClient) -> Result<(), Error> {
    let mut app = App::new(api.base_url());

    // initial load: users, then history for whoever is selected
    refresh_users(&mut app, &api).await;
    if let Some(user) = app.selected_user().map(str::to_string) {
        load_history(&mut app, &api, user).await;
    }

    let mut last_mode = app.mode;

    loop {
        if app.mode != last_mode {
            let cursor_style = match app.mode {
                Mode::Insert => SetCursorStyle::BlinkingBar,
                Mode::Normal => SetCursorStyle::BlinkingBlock,
            };
            execute!(terminal.backend_mut(), cursor_style).ok();
            last_mode = app.mode;
        }

        draw(terminal, &app)?;

        let Some(event) =
            poll_event(Duration::from_millis(100)).map_err(|e| Error::Server(e.to_string()))?
        else {
            continue;
        };

        match handle_event(&mut app, event) {
            Action::Quit => app.quit(),
            Action::Submit { user_id, query } => {
                // show the loading state before we block on the request
                draw(terminal, &app)?;

                let started = Instant::now();
                match api.generate(&user_id, &query).await {
                    Ok(answer) => {
                        app.set_answer(answer, started.elapsed().as_millis() as u64);
                        refresh_users(&mut app, &api).await;
                        app.select_user(&user_id);
                        load_history(&mut app, &api, user_id).await;
                    }
                    Err(e) => app.set_error(e.to_string()),
                }
            }
            Action::LoadHistory(user) => load_history(&mut app, &api, user).await,
            Action::RefreshUsers => refresh_users(&mut app, &api).await,
            Action::None => {}
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

async fn refresh_users(app: &mut App, api: &ApiClient) {
    match api.users().await {
        Ok(users) => app.set_users(users),
        Err(e) => app.log(LogLevel::Error, format!("failed to fetch user ids: {e}")),
    }
}

async fn load_history(app: &mut App, api: &ApiClient, user: String) {
    match api.history(&user, HISTORY_LIMIT, 0).await {
        Ok(history) => app.set_history(user, history),
        Err(e) => app.log(LogLevel::Error, format!("failed to fetch history: {e}")),
    }
}
