use std::ops::Range;
use std::rc::Rc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::app::App;
use crate::core::constants::{COACH_NAME, COACH_TAGLINE, RESET_CONFIRMATION, SAFETY_DISCLAIMER};
use crate::core::message::Message;
use crate::core::text_wrapping::wrap_ranges;
use crate::ui::emphasis::split_bold;

const ACCENT: Color = Color::Rgb(0xf9, 0x73, 0x16);
const STREAMING_CURSOR: &str = "▌";

/// Header, transcript, status line, input box, disclaimer.
fn main_layout(area: Rect, app: &App) -> Rc<[Rect]> {
    let input_height = app.ui.input_height() + 2;
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area)
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = main_layout(f.area(), app);

    render_header(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    render_status_line(f, app, chunks[2]);
    render_input(f, app, chunks[3]);

    f.render_widget(
        Paragraph::new(SAFETY_DISCLAIMER).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );

    if app.ui.reset_prompt_open {
        render_reset_prompt(f);
    } else if app.ui.settings.is_some() {
        render_settings(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!("{COACH_NAME} · {COACH_TAGLINE}"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", app.mode_label()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if app.logging.is_active() {
        spans.push(Span::styled(
            format!("  {}", app.logging.get_status_string()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Pre-wrapped transcript lines for `width` columns.
pub fn build_transcript_lines(messages: &[&Message], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for message in messages {
        let (label, label_style) = if message.is_user() {
            ("你", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        } else {
            (COACH_NAME, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        };
        lines.push(Line::from(Span::styled(label, label_style)));

        let (mut text, bold) = split_bold(&message.text);
        if message.is_streaming {
            if text.is_empty() {
                text.push_str("思考中…");
            }
            text.push_str(STREAMING_CURSOR);
        }
        for row in wrap_ranges(&text, width) {
            lines.push(styled_row(&text, row, &bold));
        }
        lines.push(Line::from(""));
    }

    lines
}

fn styled_row(text: &str, row: Range<usize>, bold: &[Range<usize>]) -> Line<'static> {
    let mut spans = Vec::new();
    let mut pos = row.start;
    for range in bold
        .iter()
        .filter(|range| range.start < row.end && range.end > row.start)
    {
        let start = range.start.max(row.start);
        let end = range.end.min(row.end);
        if pos < start {
            spans.push(Span::raw(text[pos..start].to_string()));
        }
        spans.push(Span::styled(
            text[start..end].to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        pos = end;
    }
    if pos < row.end || spans.is_empty() {
        spans.push(Span::raw(text[pos..row.end].to_string()));
    }
    Line::from(spans)
}

/// How far the transcript can scroll up in a frame of `area`.
pub fn max_scroll(app: &App, area: Rect) -> u16 {
    let transcript = main_layout(area, app)[1];
    let messages: Vec<&Message> = app.messages().iter().collect();
    let total = build_transcript_lines(&messages, transcript.width).len();
    u16::try_from(total.saturating_sub(usize::from(transcript.height))).unwrap_or(u16::MAX)
}

/// First visible row so that `scroll_from_bottom` rows are hidden below the view.
pub fn scroll_offset(total_lines: usize, view_height: u16, scroll_from_bottom: u16) -> u16 {
    let max_offset = total_lines.saturating_sub(usize::from(view_height));
    let offset = max_offset.saturating_sub(usize::from(scroll_from_bottom));
    u16::try_from(offset).unwrap_or(u16::MAX)
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<&Message> = app.messages().iter().collect();
    let lines = build_transcript_lines(&messages, area.width);
    let offset = scroll_offset(lines.len(), area.height, app.ui.scroll_from_bottom);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = app.error() {
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(status) = app.ui.status() {
        Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Green),
        ))
    } else if app.ui.scroll_from_bottom > 0 {
        Line::from(Span::styled(
            "↑ 正在瀏覽較早的訊息（PageDown 回到最新）",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, border_style) = if app.is_loading() {
        (
            "橘子老師回覆中… (Ctrl+C 離開)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            "Enter 送出 · Alt+Enter 換行 · Ctrl+R 重新開始 · Ctrl+S 設定 · Ctrl+C 離開",
            Style::default().fg(ACCENT),
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
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

fn render_reset_prompt(f: &mut Frame) {
    let area = centered_rect(52, 5, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title("重新開始");
    let text = vec![
        Line::from(RESET_CONFIRMATION),
        Line::from(""),
        Line::from(Span::styled(
            "y 確定 · n 取消",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_settings(f: &mut Frame, app: &App) {
    let Some(dialog) = app.ui.settings.as_ref() else {
        return;
    };
    let area = centered_rect(72, 9, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title("設定：後端 API Endpoint");
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("留空即使用示範模式。請勿在這裡貼上 API Key。")
            .style(Style::default().fg(Color::Gray)),
        rows[0],
    );
    f.render_widget(dialog.textarea(), rows[1]);
    if let Some(error) = &dialog.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            rows[2],
        );
    }
    f.render_widget(
        Paragraph::new("Enter 儲存 · Ctrl+D 示範模式 · Esc 關閉")
            .style(Style::default().fg(Color::DarkGray)),
        rows[4],
    );
}
