//! # TUI Rendering Logic
//!
//! This module is responsible for drawing the entire user interface as a pure
//! function of the application state. Nothing here mutates the [`App`].

use ragq::{PanelState, QueryOutcome};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The main rendering function.
///
/// The layout is a vertical stack of four sections:
/// 1. The multi-line question input
/// 2. The controls row (retrieval count and the submit affordance)
/// 3. The result area (loading indicator, answer plus sources, or error)
/// 4. The status bar
pub fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_question_panel(frame, app, main_layout[0]);
    render_controls(frame, app, main_layout[1]);
    render_result(frame, app, main_layout[2]);
    render_status_bar(frame, app, main_layout[3]);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Renders the multi-line question input with the cursor when focused.
fn render_question_panel(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Question;
    let block = Block::default()
        .title("Question")
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = Paragraph::new(app.panel.question()).wrap(Wrap { trim: false });
    frame.render_widget(input, inner);

    if focused && inner.width > 0 && inner.height > 0 {
        // Place the cursor after the last character of the last line.
        let lines: Vec<&str> = app.panel.question().split('\n').collect();
        let row = (lines.len() as u16)
            .saturating_sub(1)
            .min(inner.height.saturating_sub(1));
        let col = lines
            .last()
            .map(|line| line.chars().count() as u16)
            .unwrap_or(0)
            .min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + col, inner.y + row));
    }
}

/// Renders the retrieval-count control and the submit affordance. The submit
/// label is dimmed whenever the panel would refuse a submit.
fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Length(11),
            Constraint::Min(0),
        ])
        .split(area);

    let count_focused = app.focus == Focus::Count;
    let count = Paragraph::new(app.panel.result_count().to_string())
        .style(focus_style(count_focused))
        .block(
            Block::default()
                .title("k (1-20)")
                .borders(Borders::ALL)
                .border_style(focus_style(count_focused)),
        );
    frame.render_widget(count, chunks[0]);

    let submit_style = if app.panel.can_submit() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let submit = Paragraph::new("[ Ask ]")
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(submit, chunks[1]);
}

/// Renders the result area for the current panel state.
fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("Result").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if app.panel.is_loading() {
        loading_text(app.spinner_frame)
    } else {
        result_text(&app.panel)
    };
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn loading_text(frame_index: usize) -> Text<'static> {
    let spinner = SPINNER_FRAMES[frame_index % SPINNER_FRAMES.len()];
    Text::from(Line::from(vec![
        Span::styled(spinner.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw(" Querying..."),
    ]))
}

/// Builds the result content as a pure function of panel state.
///
/// An answer renders with its line breaks preserved, followed by one block
/// per source: the metadata as `key: value` lines and the content capped at
/// the excerpt limit. An error renders in red. An unrecognized response
/// renders nothing extra.
pub fn result_text(panel: &PanelState) -> Text<'static> {
    let Some(outcome) = panel.last() else {
        return Text::default();
    };

    match outcome {
        QueryOutcome::Answer { text, sources } => {
            let mut lines: Vec<Line> = Vec::new();
            lines.push(Line::styled(
                "Answer",
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for answer_line in text.split('\n') {
                lines.push(Line::raw(answer_line.to_string()));
            }
            for (index, source) in sources.iter().enumerate() {
                lines.push(Line::default());
                lines.push(Line::styled(
                    format!("Source {}", index + 1),
                    Style::default().fg(Color::Cyan),
                ));
                for (key, value) in &source.metadata {
                    lines.push(Line::raw(format!("  {key}: {value}")));
                }
                for content_line in source.excerpt().split('\n') {
                    lines.push(Line::raw(format!("  {content_line}")));
                }
            }
            Text::from(lines)
        }
        QueryOutcome::Error { message } => Text::from(Line::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        QueryOutcome::Unrecognized => Text::default(),
    }
}

/// Renders the bottom status bar.
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(status, area);
}
