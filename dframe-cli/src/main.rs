//! dframe CLI：运行 Telegram bot 或检查组件目录。配置来自环境变量与可选命令行参数。

use anyhow::Result;
use clap::Parser;
use dframe_cli::{builtin, check_components, Cli, Commands};
use dframe_core::init_tracing;
use dframe_telegram::TelegramConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, framework } => {
            let config = TelegramConfig::load(token)?;
            init_tracing(&config.log_file)?;
            dframe_telegram::run(config, framework.settings(), builtin::catalog()).await
        }
        Commands::Check { framework } => {
            let settings = framework.settings();
            let summary = check_components(&settings, builtin::catalog());

            println!("Component root: {}", settings.root_dir.display());
            for (kind, ids) in [
                ("commands", &summary.commands),
                ("listeners", &summary.listeners),
                ("autocomplete", &summary.autocomplete),
            ] {
                println!("{} ({}): {}", kind, ids.len(), ids.join(", "));
            }
            println!(
                "Loaded: {}, Skipped: {}, Failed: {}",
                summary.report.loaded, summary.report.skipped, summary.report.failed
            );
            for error in &summary.errors {
                println!("  error: {}", error);
            }
            if !summary.is_ok() {
                anyhow::bail!("{} definition(s) failed to load", summary.errors.len());
            }
            Ok(())
        }
    }
}
