//! Framework settings: component root, message prefix, developers, start-up registration.
//! Loaded from env: DFRAME_ROOT_DIR, DFRAME_PREFIX, DFRAME_DEVELOPERS, DFRAME_REGISTER_ON_START, DFRAME_REGISTER_GUILDS.

use std::env;
use std::path::{Path, PathBuf};

/// Default message-command prefix.
pub const DEFAULT_PREFIX: &str = "!";

/// Settings shared by the registries, the dispatcher, and definition handlers.
#[derive(Debug, Clone)]
pub struct FrameworkSettings {
    /// Directory holding `commands/`, `listeners/`, and `autocomplete/`.
    pub root_dir: PathBuf,
    /// Textual prefix for message commands; matched case-insensitively.
    pub prefix: String,
    /// User ids allowed to run dev-only message commands.
    pub developers: Vec<String>,
    /// Publish guild-scoped application commands when the client becomes ready.
    pub register_on_start: bool,
    /// Guilds to publish to when `register_on_start` is set.
    pub guilds_to_register: Vec<String>,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            prefix: DEFAULT_PREFIX.to_string(),
            developers: Vec::new(),
            register_on_start: false,
            guilds_to_register: Vec::new(),
        }
    }
}

impl FrameworkSettings {
    /// Loads settings from the environment; unset variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root_dir: env::var("DFRAME_ROOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.root_dir),
            prefix: env::var("DFRAME_PREFIX").unwrap_or(defaults.prefix),
            developers: env::var("DFRAME_DEVELOPERS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
            register_on_start: env::var("DFRAME_REGISTER_ON_START")
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
            guilds_to_register: env::var("DFRAME_REGISTER_GUILDS")
                .map(|s| split_list(&s))
                .unwrap_or_default(),
        }
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_developers<I, S>(mut self, developers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.developers = developers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_registration<I, S>(mut self, guilds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_on_start = true;
        self.guilds_to_register = guilds.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_developer(&self, user_id: &str) -> bool {
        self.developers.iter().any(|d| d == user_id)
    }
}

/// `./src` when it exists, else the working directory.
pub fn default_root_dir() -> PathBuf {
    if Path::new("./src").exists() {
        PathBuf::from("./src")
    } else {
        PathBuf::from("./")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
