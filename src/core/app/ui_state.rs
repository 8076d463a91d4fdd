use std::time::{Duration, Instant};

use ratatui::style::Style;
use tui_textarea::TextArea;

use super::settings::SettingsDialog;
use crate::core::constants::INPUT_PLACEHOLDER;

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Presentation state that never reaches the session.
pub struct UiState {
    textarea: TextArea<'static>,
    /// Lines scrolled up from the bottom of the transcript. Zero follows new output.
    pub scroll_from_bottom: u16,
    pub reset_prompt_open: bool,
    pub settings: Option<SettingsDialog>,
    status: Option<(String, Instant)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            scroll_from_bottom: 0,
            reset_prompt_open: false,
            settings: None,
            status: None,
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        self.textarea = TextArea::from(text.split('\n').map(str::to_string));
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    /// Rows the input box needs, clamped so the transcript keeps most of the screen.
    pub fn input_height(&self) -> u16 {
        u16::try_from(self.textarea.lines().len())
            .unwrap_or(u16::MAX)
            .clamp(1, 5)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    /// Keep the scroll position within what the transcript can show.
    pub fn clamp_scroll(&mut self, max: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.min(max);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some((status.into(), Instant::now()));
    }

    pub fn status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, set_at)| set_at.elapsed() < STATUS_TTL)
            .map(|(text, _)| text.as_str())
    }
}
