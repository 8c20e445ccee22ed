use chronotrack::{clock::Clock, store::KeyValueStore};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const PROMPT_WIDTH: u16 = 40;
const PROMPT_HEIGHT: u16 = 5;

/// Centered input box drawn over the stopwatch screen
pub fn render_goal_prompt<C: Clock, S: KeyValueStore>(app: &App<C, S>, f: &mut Frame) {
    let area = centered(f.area(), PROMPT_WIDTH, PROMPT_HEIGHT);
    if area.is_empty() {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Goal (seconds)")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::styled(
            app.goal_input.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(input, rows[0]);

    let hint = Paragraph::new(Span::styled(
        "enter to set, empty clears, esc cancels",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hint, rows[2]);

    let cursor_x = rows[0].x + 2 + app.goal_input.width() as u16;
    if cursor_x < rows[0].right() {
        f.set_cursor_position((cursor_x, rows[0].y));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
