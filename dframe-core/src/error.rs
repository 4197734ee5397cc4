use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameworkError {
    #[error("No options object was provided.")]
    NoOptions,

    #[error("No \"{0}\" option was provided.")]
    InvalidOption(String),

    #[error("Expected \"{name}\" to be of type \"{expected}\", but got \"{actual}\".")]
    InvalidType {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Expected \"{name}\" to be any one of the listed values: {}", quoted(.expected))]
    InvalidValue { name: String, expected: Vec<String> },

    #[error("Expected \"{name}\" to contain only the listed values: {}", quoted(.expected))]
    InvalidValues { name: String, expected: Vec<String> },

    #[error("No {kind} handler is registered under the key \"{key}\".")]
    UnknownHandler { kind: &'static str, key: String },

    #[error("Encountered an error as there is no \"{kind}\" loaded with the id \"{id}\".")]
    UnknownComponent { kind: &'static str, id: String },

    #[error("Encountered an error while loading the \"{kind}\" at {}: {source}", .path.display())]
    ComponentLoadError {
        kind: &'static str,
        path: PathBuf,
        source: Box<FrameworkError>,
    },

    #[error("Encountered an error as a \"{kind}\" with the id \"{id}\" is already loaded.")]
    ComponentAlreadyLoaded { kind: &'static str, id: String },

    #[error("Encountered an error while registering commands{}: {source}", guild_suffix(.guild_id))]
    AppCommandRegister {
        guild_id: Option<String>,
        source: Box<FrameworkError>,
    },

    #[error("Invalid manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameworkError {
    pub(crate) fn invalid_type(name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidType {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn invalid_value(name: &str, expected: &[&str]) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            expected: expected.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub(crate) fn invalid_values(name: &str, expected: &[&str]) -> Self {
        Self::InvalidValues {
            name: name.to_string(),
            expected: expected.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn guild_suffix(guild_id: &Option<String>) -> String {
    match guild_id {
        Some(id) => format!(" to guild \"{}\"", id),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, FrameworkError>;
