//! CLI parser and settings overrides.

use clap::{Parser, Subcommand};
use dframe_core::FrameworkSettings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dframe")]
#[command(about = "Command framework CLI: run the Telegram bot, check definition files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Telegram bot (config from env; flags override it).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        #[command(flatten)]
        framework: FrameworkArgs,
    },
    /// Load every definition under the component root and report what loads and what fails.
    Check {
        #[command(flatten)]
        framework: FrameworkArgs,
    },
}

/// Flags shared by every subcommand that builds framework settings.
#[derive(clap::Args, Debug, Default)]
pub struct FrameworkArgs {
    /// Directory holding commands/, listeners/ and autocomplete/ (overrides DFRAME_ROOT_DIR).
    #[arg(short, long)]
    pub root_dir: Option<PathBuf>,
    /// Message-command prefix (overrides DFRAME_PREFIX).
    #[arg(short, long)]
    pub prefix: Option<String>,
}

impl FrameworkArgs {
    /// Settings from the environment with these flags applied on top.
    pub fn settings(&self) -> FrameworkSettings {
        let mut settings = FrameworkSettings::from_env();
        if let Some(root_dir) = &self.root_dir {
            settings = settings.with_root_dir(root_dir);
        }
        if let Some(prefix) = &self.prefix {
            settings = settings.with_prefix(prefix);
        }
        settings
    }
}
