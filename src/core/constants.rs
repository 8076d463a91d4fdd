//! Shared constants used across the application

use std::time::Duration;

pub const COACH_NAME: &str = "橘子老師";
pub const COACH_TAGLINE: &str = "AI 自行車教練";

/// Greeting shown as the first model message of every conversation.
pub const INITIAL_MESSAGE: &str = "嗨！我是橘子老師 🍊，你的 AI 自行車教練。\n\
不管是踩踏技巧、坐墊高度、訓練課表，還是騎完車哪裡痠痛，都可以跟我聊聊。\n\
請描述你的狀況，例如：「騎超過一小時膝蓋外側會痛」。";

/// The only error text users ever see for a failed reply.
pub const CONNECTION_ERROR_MESSAGE: &str = "連線發生錯誤，請稍後再試。";

pub const RESET_CONFIRMATION: &str = "確定要重新開始對話嗎？目前的記錄將會清除。";

pub const SAFETY_DISCLAIMER: &str =
    "橘子老師僅供運動諮詢，如有劇痛或身體不適請立即停止並就醫。";

pub const INPUT_PLACEHOLDER: &str = "描述你的狀況...";

pub const DEMO_MODE_PREFIX: &str = "（示範模式：未設定後端）";

/// Characters per simulated streaming fragment.
pub const DEFAULT_CHUNK_SIZE: usize = 24;

/// Pause before each simulated streaming fragment.
pub const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(15);
