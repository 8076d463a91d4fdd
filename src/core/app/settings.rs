use ratatui::style::Style;
use tui_textarea::TextArea;

use super::App;
use crate::utils::url::is_http_url;

/// The endpoint editor opened with Ctrl+S.
pub struct SettingsDialog {
    textarea: TextArea<'static>,
    pub error: Option<String>,
}

impl SettingsDialog {
    pub fn new(endpoint: &str) -> Self {
        let mut textarea = TextArea::from([endpoint.to_string()]);
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("例如：https://your-worker.example.com/chat");
        textarea.move_cursor(tui_textarea::CursorMove::End);
        Self {
            textarea,
            error: None,
        }
    }

    pub fn draft(&self) -> String {
        self.textarea.lines().join("").trim().to_string()
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }
}

pub struct SettingsController<'a> {
    app: &'a mut App,
}

impl<'a> SettingsController<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn open(&mut self) {
        let current = self.app.session.endpoint().get();
        self.app.ui.settings = Some(SettingsDialog::new(&current));
    }

    pub fn close(&mut self) {
        self.app.ui.settings = None;
    }

    /// Persist the draft. Anything the HTTP client could not send to keeps
    /// the dialog open with a hint instead.
    pub fn save(&mut self) {
        let Some(dialog) = self.app.ui.settings.as_mut() else {
            return;
        };
        let draft = dialog.draft();
        if !draft.is_empty() && !is_http_url(&draft) {
            dialog.error = Some("Endpoint 必須是有效的 http:// 或 https:// 網址".to_string());
            return;
        }

        self.app.session.endpoint().set(&draft);
        self.finish(if draft.is_empty() {
            "已切換為示範模式"
        } else {
            "已儲存後端 Endpoint"
        });
    }

    pub fn use_demo_mode(&mut self) {
        self.app.session.endpoint().clear();
        self.finish("已切換為示範模式");
    }

    fn finish(&mut self, status: &str) {
        self.close();
        self.app.refresh_mode_label();
        self.app.ui.set_status(status);
    }
}
