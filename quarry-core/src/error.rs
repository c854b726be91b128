use std::fmt::{self, Display};

/// Failures surfaced to the caller.
///
/// Only connection and execution problems are reported as errors. Clause compilation
/// problems degrade to a neutral fragment (see [`CompileError`]) and cursor misuse
/// degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The native connection could not be established or was lost.
    #[error("Connection error: {0:#}")]
    Connection(anyhow::Error),
    /// The driver rejected the compiled SQL.
    #[error("{message}")]
    Execution {
        message: String,
        code: Option<i64>,
        sql: String,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn msg<M: Display + fmt::Debug + Send + Sync + 'static>(message: M) -> Self {
        Error::Other(anyhow::Error::msg(message))
    }
    pub fn connection<M: Display + fmt::Debug + Send + Sync + 'static>(message: M) -> Self {
        Error::Connection(anyhow::Error::msg(message))
    }
    pub fn execution(message: impl Into<String>, code: Option<i64>, sql: impl Into<String>) -> Self {
        Error::Execution {
            message: message.into(),
            code,
            sql: sql.into(),
        }
    }
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(..))
    }
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Snapshot of the most recent error reported by a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: Option<i64>,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(value: &Error) -> Self {
        match value {
            Error::Execution { message, code, .. } => ErrorInfo {
                code: *code,
                message: message.clone(),
            },
            other => ErrorInfo {
                code: None,
                message: format!("{:#}", other),
            },
        }
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A clause value the dialect cannot render.
///
/// Never reaches the caller: the clause falls back to [`CompiledClause::Neutral`].
///
/// [`CompiledClause::Neutral`]: crate::CompiledClause::Neutral
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot compile the {clause} clause: {reason}")]
pub struct CompileError {
    pub clause: &'static str,
    pub reason: String,
}

impl CompileError {
    pub fn new(clause: &'static str, reason: impl Into<String>) -> Self {
        Self {
            clause,
            reason: reason.into(),
        }
    }
}
