use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::{App, Focus};
use crate::core::catalog::{truncate_label, CATALOG_LABEL_BUDGET};
use crate::ui::scroll::ScrollCalculator;
use crate::ui::transcript::{build_transcript_lines, chip_labels, tab_labels, welcome_lines};

pub const MODEL_PANEL_WIDTH: u16 = 36;

pub fn ui(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(MODEL_PANEL_WIDTH)])
        .split(f.area());

    draw_chat_column(f, app, columns[0]);
    draw_model_panel(f, app, columns[1]);

    if app.settings_open {
        draw_settings_overlay(f, app);
    }
    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

fn draw_chat_column(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(0),    // transcript
            Constraint::Length(1), // selected-model chips
            Constraint::Length(3), // input
        ])
        .split(area);

    draw_tabs(f, app, chunks[0]);
    draw_transcript(f, app, chunks[1]);
    draw_chips(f, app, chunks[2]);
    draw_input(f, app, chunks[3]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (tab, label) in tab_labels(&app.workspace, &app.catalog) {
        let style = if &tab == app.active_tab() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_transcript(f: &mut Frame, app: &App, area: Rect) {
    let lines = if app.workspace.is_pristine() && app.pending_dispatch.is_none() {
        welcome_lines()
    } else {
        build_transcript_lines(&app.workspace, &app.catalog, app.pending_dispatch.is_some())
    };

    let available_height = area.height;
    let scroll_offset = if app.auto_scroll {
        ScrollCalculator::scroll_to_bottom(&lines, area.width, available_height)
    } else {
        let max_offset = ScrollCalculator::calculate_wrapped_line_count(&lines, area.width)
            .saturating_sub(available_height);
        app.scroll_offset.min(max_offset)
    };

    let title = format!("Askemall v{}", env!("CARGO_PKG_VERSION"));
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_chips(f: &mut Frame, app: &App, area: Rect) {
    let chips = chip_labels(&app.workspace, &app.catalog);
    let mut spans = vec![Span::styled(
        format!("{} selected ", chips.len()),
        Style::default().fg(Color::DarkGray),
    )];
    for chip in chips {
        spans.push(Span::styled(
            format!("[{chip}] "),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input && !app.settings_open;
    let input_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = if app.pending_dispatch.is_some() {
        "Waiting for replies… (Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, /help for help, Ctrl+C to quit)"
    };

    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);

    if focused {
        let x = area.x + 1 + app.input.width() as u16;
        f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
    }
}

fn draw_model_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let panel_focused = app.focus == Focus::Models && !app.settings_open;
    let filter_style = if panel_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let filter = Paragraph::new(app.filter.as_str())
        .style(filter_style)
        .block(Block::default().borders(Borders::ALL).title("Search models"));
    f.render_widget(filter, chunks[0]);

    let rows = app.filtered_models();
    let mut lines: Vec<Line> = Vec::new();
    if rows.is_empty() {
        let hint = if app.catalog.is_empty() {
            "Enter API key to load models"
        } else {
            "No models match your search"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (i, model) in rows.iter().enumerate() {
            let selected = app.workspace.is_selected(&model.id);
            let marker = if selected { "[x] " } else { "[ ] " };
            let label = truncate_label(&model.name, CATALOG_LABEL_BUDGET);
            let mut style = if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            if panel_focused && i == app.catalog_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(Span::styled(format!("{marker}{label}"), style)));
        }
    }

    // Keep the cursor row visible in tall catalogs.
    let visible = chunks[1].height.saturating_sub(2);
    let offset = if panel_focused && visible > 0 {
        (app.catalog_cursor as u16).saturating_sub(visible - 1)
    } else {
        0
    };

    let list = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Models"))
        .scroll((offset, 0));
    f.render_widget(list, chunks[1]);

    if panel_focused {
        let x = chunks[0].x + 1 + app.filter.width() as u16;
        f.set_cursor_position((
            x.min(chunks[0].x + chunks[0].width.saturating_sub(2)),
            chunks[0].y + 1,
        ));
    }
}

fn draw_settings_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 7, f.area());
    f.render_widget(Clear, area);

    let masked: String = "•".repeat(app.settings_input.chars().count());
    let status = app.settings_status.clone().unwrap_or_default();
    let status_style = if status.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let body = vec![
        Line::from("API key:"),
        Line::from(Span::styled(masked, Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(status, status_style)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Settings (Enter to load models, Esc to close)");
    f.render_widget(Paragraph::new(body).block(block), area);

    let x = area.x + 1 + app.settings_input.chars().count() as u16;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), area.y + 2));
}

fn draw_notice(f: &mut Frame, notice: &str) {
    let area = centered_rect(60, 5, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title("Notice (press any key)");
    let paragraph = Paragraph::new(notice)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
