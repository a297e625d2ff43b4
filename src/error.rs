use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Unknown map element kind '{kind}'{}", suggestion_hint(.suggestion))]
    UnknownKind {
        kind: String,
        suggestion: Option<String>,
    },

    #[error("Proxy is not connected: call connect() before requesting '{key}'")]
    NotConnected { key: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write demo output: {0}")]
    Output(#[from] io::Error),
}

impl DemoError {
    pub fn unknown_kind(kind: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UnknownKind {
            kind: kind.into(),
            suggestion,
        }
    }

    pub fn not_connected(key: impl Into<String>) -> Self {
        Self::NotConnected { key: key.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            format: "JSON",
            message: format!("line {}, column {}: {err}", err.line(), err.column()),
        }
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}
