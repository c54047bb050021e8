use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph};

use crate::tui::app::App;
use crate::tui::theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 4 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Divider(1) + Rows(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    frame.render_widget(
        Paragraph::new("─".repeat(area.width as usize)).style(Style::default().fg(theme::MUTED)),
        chunks[1],
    );
    render_rows(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    // Only the very first poll gets an overlay; later ones spin in the status bar
    if app.is_loading && app.last_refresh.is_none() {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let color = theme::title_color(&app.menu.title);
    let title = Line::from(Span::styled(
        app.menu.title.clone(),
        Style::default().fg(color).bold(),
    ));
    frame.render_widget(Paragraph::new(title), area);
}

fn render_rows(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.menu.rows.is_empty() {
        let text = if app.menu.is_error() {
            "Will retry on the next poll"
        } else {
            "Nothing waiting for your review"
        };
        let empty_msg = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::MUTED));
        frame.render_widget(empty_msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .menu
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if idx % 2 == 1 {
                Style::default().bg(theme::ROW_ALT_BG)
            } else {
                Style::default()
            };
            let line = match row.url {
                Some(_) => Line::from(vec![Span::raw("🔀 "), Span::raw(row.label.clone())]),
                None => Line::from(Span::styled(
                    row.label.clone(),
                    Style::default().fg(theme::MUTED),
                )),
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(theme::ROW_SELECTED)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") {
            theme::FLASH_ERROR
        } else if msg.starts_with("Opened:") || msg.starts_with("Refreshing") {
            theme::FLASH_SUCCESS
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let refresh_text = if app.is_loading {
            format!("{} polling", SPINNER[app.spinner_frame % SPINNER.len()])
        } else {
            match app.last_refresh {
                Some(at) => format!("polled {}s ago", at.elapsed().as_secs()),
                None if app.polling_enabled => "waiting for first poll".to_string(),
                None => "polling disabled".to_string(),
            }
        };

        let hints = [
            ("j/k", ":nav "),
            ("Enter", ":open "),
            ("r", ":refresh "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(refresh_text, Style::default().fg(theme::MUTED)),
            Span::raw(format!(" every {}s  ", app.poll_interval.as_secs())),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme::STATUS_KEY_COLOR)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme::STATUS_BAR_BG)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    let loading_text = Paragraph::new(format!("{} Loading PRs...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(loading_text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 2);
        let rect = centered_rect_fixed(30, 3, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 2));

        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(30, 3, area);
        assert_eq!(rect, Rect::new(35, 18, 30, 3));
    }
}
