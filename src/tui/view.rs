use super::state::{rows, Row, UiState};
use crate::model::{FieldId, MAX_IMAGES};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn marker(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("> ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    }
}

fn field_line(state: &UiState, field: FieldId, focused: bool) -> Line<'static> {
    let label = Span::styled(
        format!("{:<15}", field.label()),
        Style::default().fg(Color::Gray),
    );
    if field.is_checkbox() {
        let mark = if state.form.draft().is_checked(field) {
            "[x]"
        } else {
            "[ ]"
        };
        return Line::from(vec![
            marker(focused),
            Span::styled(mark, focus_style(focused)),
            Span::raw(" "),
            Span::styled(field.label().to_string(), focus_style(focused)),
        ]);
    }

    let mut value = state.buffer(field).to_string();
    if focused {
        value.push('_');
    }
    let invalid = state.input_errors.contains_key(&field);
    let value_style = if invalid {
        Style::default().fg(Color::Red)
    } else {
        focus_style(focused)
    };
    Line::from(vec![marker(focused), label, Span::styled(value, value_style)])
}

fn draw_fields(area: Rect, f: &mut Frame, state: &UiState) {
    let focused = state.focused();
    let mut lines: Vec<Line> = FieldId::ALL
        .iter()
        .map(|field| field_line(state, *field, focused == Row::Field(*field)))
        .collect();

    if !state.input_errors.is_empty() {
        lines.push(Line::from(""));
    }
    for e in state.pending_errors() {
        lines.push(Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Listing"));
    f.render_widget(p, area);
}

fn draw_images(area: Rect, f: &mut Frame, state: &UiState) {
    let focused = state.focused();
    let form = &state.form;
    let mut lines = Vec::new();

    lines.push(Line::from(format!(
        "Images: {}/{MAX_IMAGES}",
        form.draft().image_urls.len()
    )));

    let files_focused = focused == Row::Files;
    let mut files = state.files_input.clone();
    if files_focused {
        files.push('_');
    }
    let upload_label = if form.uploading() {
        "Uploading..."
    } else {
        "Upload"
    };
    lines.push(Line::from(vec![
        marker(files_focused),
        Span::styled("Files: ", Style::default().fg(Color::Gray)),
        Span::styled(files, focus_style(files_focused)),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("[{upload_label}]"),
            if form.can_upload() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
    ]));
    if let Some(e) = form.image_upload_error() {
        lines.push(Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    let images_focused = focused == Row::Images;
    lines.push(Line::from(vec![
        marker(images_focused),
        Span::styled("Uploaded", focus_style(images_focused)),
    ]));
    for (i, url) in form.draft().image_urls.iter().enumerate() {
        let selected = images_focused && i == state.image_selected;
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{}. {}", i + 1, url), style),
        ]));
    }

    lines.push(Line::from(""));
    let submit_focused = focused == Row::Submit;
    let submit_label = if form.loading() {
        "Creating..."
    } else {
        "Create Listing"
    };
    let submit_style = if !form.can_submit() {
        Style::default().fg(Color::DarkGray)
    } else if submit_focused {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    lines.push(Line::from(vec![
        marker(submit_focused),
        Span::styled(format!("[ {submit_label} ]"), submit_style),
    ]));
    if let Some(e) = form.error() {
        lines.push(Line::from(Span::styled(
            e.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Images"));
    f.render_widget(p, area);
}

fn draw_created(area: Rect, f: &mut Frame, state: &UiState) {
    let url = state.listing_url().unwrap_or_default();
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Listing created",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(url, Style::default().fg(Color::Cyan))),
        Line::from(""),
        Line::from("y: copy URL   enter/q: exit"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Done"));
    f.render_widget(p, area);
}

pub fn draw(area: Rect, f: &mut Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Create a Listing",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   as {}", state.user.id)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("create-listing"));
    f.render_widget(title, chunks[0]);

    if state.form.navigated().is_some() {
        draw_created(chunks[1], f, state);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        draw_fields(body[0], f, state);
        draw_images(body[1], f, state);
    }

    let status = if state.info.is_empty() {
        format!(
            "{}/{}  tab: next  space: toggle  enter: act  F1: help  esc: quit",
            state.focus + 1,
            rows().len()
        )
    } else {
        state.info.clone()
    };
    let footer = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);

    if state.show_help {
        super::help::draw_help(chunks[1], f);
    }
}
