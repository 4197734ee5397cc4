//! REPL 运行：解析 bot 身份、启动框架并广播 `Ready`，之后每条更新在独立任务中交给 [`Framework::handle_event`]。
//! 与外部交互：调用 teloxide REPL、get_me、dframe_dispatch::Framework。

use crate::adapters::TelegramMessage;
use crate::config::TelegramConfig;
use crate::platform::TelegramPlatform;
use anyhow::Result;
use dframe_core::{ClientEvent, FrameworkSettings, HandlerCatalog};
use dframe_dispatch::Framework;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

/// teloxide Bot for `config`, pointed at a custom API server when one is configured.
pub fn build_bot(config: &TelegramConfig) -> teloxide::Bot {
    let bot = Bot::new(config.bot_token.clone());
    match config.telegram_api_url.as_deref() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// 在 Telegram 上运行框架，直到 REPL 退出。
/// 启动前调用 get_me() 缓存 bot 用户名，供 @mention 前缀匹配使用。
#[instrument(skip(config, settings, catalog))]
pub async fn run(config: TelegramConfig, settings: FrameworkSettings, catalog: HandlerCatalog) -> Result<()> {
    let bot = build_bot(&config);
    let platform = Arc::new(TelegramPlatform::new(bot.clone()));
    let me = platform.identify().await?;

    let framework = Arc::new(Framework::new(platform.clone(), settings, catalog));
    let report = framework.start();
    info!(
        loaded = report.loaded,
        failed = report.failed,
        bot_user = %me.id,
        "Bot started successfully"
    );
    framework.handle_event(ClientEvent::Ready(me)).await;

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let framework = Arc::clone(&framework);
        let platform = Arc::clone(&platform);

        async move {
            let Some(event) = TelegramMessage(&msg).to_event(platform.username().as_deref()) else {
                return Ok(());
            };
            info!(chat_id = msg.chat.id.0, event = %event.name(), "Received update");

            // 分发在独立任务中进行，不阻塞 REPL 接收下一条更新
            tokio::spawn(async move {
                if let Some(outcome) = framework.handle_event(event).await {
                    info!(?outcome, "step: update dispatched");
                }
            });
            Ok(())
        }
    })
    .await;

    Ok(())
}
