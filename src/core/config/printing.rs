use crate::core::config::data::{path_display, Config};
use crate::core::chat_stream::StreamPacing;
use std::path::Path;

impl Config {
    pub fn print_all(&self, path: &Path) {
        println!("Current configuration ({}):", path_display(path));
        let endpoint = self.endpoint();
        if endpoint.is_empty() {
            println!("  endpoint: (unset, demo mode)");
        } else {
            println!("  endpoint: {endpoint}");
        }

        let pacing = StreamPacing::from_config(self);
        match self.stream_chunk_size {
            Some(size) => println!("  chunk-size: {size}"),
            None => println!("  chunk-size: {} (default)", pacing.chunk_size),
        }
        match self.stream_delay_ms {
            Some(ms) => println!("  delay-ms: {ms}"),
            None => println!("  delay-ms: {} (default)", pacing.delay.as_millis()),
        }
    }
}
