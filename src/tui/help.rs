use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key(k: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(k, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key("Esc", 9, "Quit"),
        key("Ctrl-C", 6, "Quit"),
        key("tab/↓", 7, "Next field"),
        key("shift-tab/↑", 1, "Previous field"),
        key("space", 7, "Toggle checkbox"),
        key("enter", 7, "Upload files / Create listing / next field"),
        key("←/→", 9, "Select uploaded image"),
        key("d/del", 7, "Delete selected image"),
        key("F1", 10, "Show or hide this help"),
        Line::from(""),
        Line::from("Images:"),
        Line::from("  Type paths separated by commas, then press enter on the"),
        Line::from("  Files row. At most 6 images, 2 MB each."),
        Line::from(""),
        Line::from("After creating:"),
        key("y", 11, "Copy listing URL to clipboard"),
        key("enter/q", 5, "Exit"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}
