use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend URL that receives `{message, history}` POSTs.
    /// Unset or empty selects the local demo mode.
    pub backend_endpoint: Option<String>,
    /// Characters per simulated streaming fragment
    pub stream_chunk_size: Option<usize>,
    /// Pause before each simulated fragment, in milliseconds
    pub stream_delay_ms: Option<u64>,
}

impl Config {
    /// The configured endpoint, trimmed. Empty when demo mode is active.
    pub fn endpoint(&self) -> String {
        self.backend_endpoint
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        let trimmed = endpoint.trim();
        self.backend_endpoint = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/orange-coach/config.toml` → `~/.config/orange-coach/config.toml`
/// - Windows: paths are returned unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
