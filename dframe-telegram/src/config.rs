//! 传输层配置：token、API URL、日志路径。
//! 与外部交互：从环境变量 BOT_TOKEN、TELEGRAM_API_URL（或 TELOXIDE_API_URL）、LOG_FILE 加载。

use anyhow::Result;
use std::env;

/// 未设置 LOG_FILE 时使用的日志文件。
pub const DEFAULT_LOG_FILE: &str = "logs/dframe.log";

/// Telegram connection settings; framework behaviour lives in `FrameworkSettings`.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: String,
}

impl TelegramConfig {
    /// BOT_TOKEN is required; the API URL and log path are optional.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// 同 [`TelegramConfig::from_env`]，但传入的 `token` 优先于 BOT_TOKEN。
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
