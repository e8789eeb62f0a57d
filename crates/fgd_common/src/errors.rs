use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FgdError {
    #[error("I/O error on \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid json content for \"{path}\": {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a json object in \"{0}\"")]
    NotAnObject(PathBuf),

    #[error("File name of \"{0}\" is not valid UTF-8")]
    InvalidFileName(PathBuf),

    #[error("Invalid BaseClass \"{base}\" for class \"{class}\"")]
    UnresolvedBase { class: String, base: String },

    #[error("Circular BaseClass \"{base}\" for class \"{class}\"")]
    CircularBase { class: String, base: String },

    #[error("Class {class} has not a \"Class\" value defined. Assuming is a \"Base\"")]
    MissingClass { class: String },

    #[error("Unsupported \"Class\" \"{value}\" for {class}. Skipping")]
    UnsupportedClass { class: String, value: String },

    #[error("No sentence group named \"{key}\"")]
    MissingSentenceGroup { key: String },

    #[error("No sentence \"{language}\" on group named \"{key}\"")]
    MissingSentenceLanguage { key: String, language: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    IoBare(#[from] std::io::Error),
}

impl FgdError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FgdError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        FgdError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FgdError>;
