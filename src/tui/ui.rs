// ui rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::tui::app::{App, Field, LogLevel, Mode, Panel, Popup};
use crate::tui::ascii::LOGO;
use crate::tui::theme::ThemeKind;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;

    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    // header + content + footer
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_content(frame, app, main[1]);
    render_footer(frame, app, main[2]);

    match app.popup {
        Popup::Themes => render_theme_popup(frame, app),
        Popup::Detail => render_detail_popup(frame, app),
        Popup::None => {}
    }
}

fn panel_block<'a>(app: &App, panel: Panel, title: &'a str) -> Block<'a> {
    let theme = &app.theme;
    let border = if app.panel == panel {
        theme.active_border()
    } else {
        theme.border()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(format!(" {title} "), theme.title()))
        .style(theme.base())
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());
    frame.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .margin(1)
        .split(area);

    let logo: Vec<Line> = LOGO
        .iter()
        .map(|&line| Line::styled(line, theme.accent()))
        .collect();
    frame.render_widget(Paragraph::new(logo).style(theme.base()), inner[0]);

    let latency = app
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());

    let mode = match app.mode {
        Mode::Normal => "normal",
        Mode::Insert => "insert",
    };

    let info = vec![
        Line::from(vec![
            Span::styled("| ", theme.muted()),
            Span::styled("twintone", theme.accent()),
            Span::styled("  casual + formal answers", theme.muted()),
        ]),
        Line::from(vec![
            Span::styled("| API: ", theme.muted()),
            Span::styled(&app.api_url, theme.base()),
            Span::styled(" | ", theme.muted()),
            Span::styled(latency, theme.accent()),
        ]),
        Line::from(vec![
            Span::styled("| Mode: ", theme.muted()),
            Span::styled(mode, theme.accent()),
        ]),
        Line::from(vec![
            Span::styled("| ", theme.muted()),
            Span::styled("[i]", theme.accent()),
            Span::styled(" Ask  ", theme.muted()),
            Span::styled("[Tab]", theme.accent()),
            Span::styled(" Panels  ", theme.muted()),
            Span::styled("[r]", theme.accent()),
            Span::styled(" Refresh  ", theme.muted()),
            Span::styled("[t]", theme.accent()),
            Span::styled(" Themes  ", theme.muted()),
            Span::styled("[q]", theme.accent()),
            Span::styled(" Quit", theme.muted()),
        ]),
    ];
    frame.render_widget(Paragraph::new(info).style(theme.base()), inner[1]);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(cols[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(cols[1]);

    render_users(frame, app, sidebar[0]);
    render_history(frame, app, sidebar[1]);
    render_form(frame, app, main[0]);
    render_answer(frame, app, main[1]);
}

fn render_users(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(app, Panel::Users, "Users");

    if app.users.is_empty() {
        let empty = Paragraph::new("no users yet, ask something to create one")
            .style(theme.muted())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .users
        .iter()
        .map(|u| ListItem::new(u.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.user_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let title = match &app.history_user {
        Some(user) => format!("History: {user}"),
        None => "History".to_string(),
    };
    let block = panel_block(app, Panel::History, &title);

    if app.history.is_empty() {
        let empty = Paragraph::new("no history found for this user")
            .style(theme.muted())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|record| {
            ListItem::new(vec![
                Line::styled(record.query.clone(), theme.base()),
                Line::styled(
                    record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    theme.muted(),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.history_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(app, Panel::Form, "Ask");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let label = |field: Field, text: &'static str| {
        if app.mode == Mode::Insert && app.field == field {
            Span::styled(text, theme.title())
        } else {
            Span::styled(text, theme.muted())
        }
    };

    let user_line = Line::from(vec![
        label(Field::UserId, "user id: "),
        Span::styled(&app.user_id, theme.base()),
    ]);
    frame.render_widget(Paragraph::new(user_line), rows[0]);

    let query_text = if app.query.is_empty() && app.mode == Mode::Normal {
        Span::styled("e.g. Explain blockchain", theme.muted())
    } else {
        Span::styled(&app.query, theme.base())
    };
    let query = Paragraph::new(Line::from(vec![label(Field::Query, "query:   "), query_text]))
        .wrap(Wrap { trim: false });
    frame.render_widget(query, rows[1]);

    let status = if app.loading {
        Line::styled("generating responses...", theme.warning())
    } else if let Some(first) = app.errors.first() {
        Line::styled(first.as_str(), theme.error())
    } else {
        Line::styled(
            format!("{}/{} chars", app.query.chars().count(), crate::MAX_QUERY_CHARS),
            theme.muted(),
        )
    };
    frame.render_widget(Paragraph::new(status), rows[2]);

    // cursor only in insert mode
    if app.mode == Mode::Insert {
        let (row, prefix, cursor) = match app.field {
            Field::UserId => (rows[0], 9, app.user_cursor),
            Field::Query => (rows[1], 9, app.query_cursor),
        };
        frame.set_cursor_position(cursor_position(row, prefix + cursor));
    }
}

// wrap a char offset into the row, clamped to its last line
fn cursor_position(row: Rect, pos: usize) -> (u16, u16) {
    let width = row.width.max(1) as usize;
    let col = u16::try_from(pos % width).unwrap_or(u16::MAX);
    let line = u16::try_from(pos / width).unwrap_or(u16::MAX);
    let last = row.y.saturating_add(row.height.saturating_sub(1));
    (
        row.x.saturating_add(col),
        row.y.saturating_add(line).min(last),
    )
}

fn render_answer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(app, Panel::Answer, "Answer");

    if let Some(error) = &app.error {
        let p = Paragraph::new(error.as_str())
            .style(theme.error())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
        return;
    }

    let Some(answer) = &app.answer else {
        let p = Paragraph::new("submit a query to see both explanations")
            .style(theme.muted())
            .block(block);
        frame.render_widget(p, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_style_column(frame, app, cols[0], "Casual", &answer.casual_response, app.answer_scroll);
    render_style_column(frame, app, cols[1], "Formal", &answer.formal_response, app.answer_scroll);
}

fn render_style_column(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    text: &str,
    scroll: u16,
) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border())
        .title(Span::styled(title, theme.accent()));

    let body = if text.is_empty() { "no response" } else { text };
    let p = Paragraph::new(body)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(block);
    frame.render_widget(p, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = match app.logs.last() {
        Some(entry) => {
            let (tag, style): (&str, Style) = match entry.level {
                LogLevel::Info => ("info", theme.muted()),
                LogLevel::Ok => ("ok", theme.success()),
                LogLevel::Warn => ("warn", theme.warning()),
                LogLevel::Error => ("error", theme.error()),
            };
            Line::from(vec![
                Span::styled(format!(" [{tag}] "), style),
                Span::styled(entry.message.as_str(), theme.base()),
            ])
        }
        None => Line::default(),
    };

    frame.render_widget(Paragraph::new(line).style(theme.base()), area);
}

fn render_theme_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(30, ThemeKind::ALL.len() as u16 + 2, frame.area());

    let items: Vec<ListItem> = ThemeKind::ALL
        .iter()
        .map(|kind| ListItem::new(kind.name()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.active_border())
                .title(Span::styled(" Themes ", theme.title()))
                .style(theme.base()),
        )
        .highlight_style(theme.selected())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.theme_scroll));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail_popup(frame: &mut Frame, app: &App) {
    let Some(record) = app.selected_record() else {
        return;
    };
    let theme = &app.theme;

    let full = frame.area();
    let area = centered_rect(
        full.width.saturating_sub(8),
        full.height.saturating_sub(4),
        full,
    );

    let mut text = vec![
        Line::styled(format!("Query: {}", record.query), theme.title()),
        Line::styled(record.created_at.to_rfc3339(), theme.muted()),
    ];
    for (title, body) in [
        ("Casual Response", &record.casual_response),
        ("Formal Response", &record.formal_response),
    ] {
        text.push(Line::default());
        text.push(Line::styled(title, theme.accent()));
        text.extend(body.lines().map(|l| Line::styled(l, theme.base())));
    }

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.active_border())
                .title(Span::styled(" Exchange [Esc] close ", theme.title()))
                .style(theme.base()),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(p, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_within_row() {
        let row = Rect::new(2, 5, 10, 3);
        assert_eq!(cursor_position(row, 0), (2, 5));
        assert_eq!(cursor_position(row, 13), (5, 6));
    }

    #[test]
    fn cursor_clamps_on_narrow_rows() {
        let row = Rect::new(0, 10, 1, 2);
        assert_eq!(cursor_position(row, 1_000_000), (0, 11));

        let edge = Rect::new(u16::MAX - 1, u16::MAX - 1, 1, 1);
        assert_eq!(cursor_position(edge, 5), (u16::MAX - 1, u16::MAX - 1));
    }
}
