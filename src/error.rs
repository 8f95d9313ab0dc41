//! Error types
//!
//! Content-script failures are recovered locally by the caller; nothing in
//! here is fatal to a run.

use thiserror::Error;

/// A failed call into the content-scripting layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The script file does not exist or could not be read
    #[error("could not load {path}: {reason}")]
    NotFound { path: String, reason: String },

    /// The script loaded but does not define the requested function
    #[error("{script} does not define {function}()")]
    MissingFunction { script: String, function: String },

    /// The script raised an error while running
    #[error("error in {script}: {message}")]
    Runtime { script: String, message: String },

    /// The script returned something the core cannot use
    #[error("{script} returned an invalid value: {message}")]
    InvalidValue { script: String, message: String },
}

impl ScriptError {
    pub fn runtime(script: impl Into<String>, message: impl ToString) -> Self {
        Self::Runtime {
            script: script.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid(script: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidValue {
            script: script.into(),
            message: message.to_string(),
        }
    }

    /// True when the hook simply is not defined (often legitimate)
    pub fn is_missing_function(&self) -> bool {
        matches!(self, Self::MissingFunction { .. })
    }
}

/// Failure to read the RON configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// A malformed dice expression such as `"2x6"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("dice expression is empty")]
    Empty,

    #[error("expected 'd' separator in {0:?}")]
    MissingSeparator(String),

    #[error("die must have a positive number of faces in {0:?}")]
    BadFaces(String),

    #[error("expected '+' or '-' followed by digits in {0:?}")]
    BadModifier(String),
}
