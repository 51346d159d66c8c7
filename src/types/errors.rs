use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The top-level archive could not be opened or read.
    #[error("Archive corrupt: {0}")]
    ArchiveCorrupt(String),
    /// Nested-archive expansion exceeded the hard recursion limit.
    #[error("Archive nesting exceeds {limit} levels")]
    ArchiveTooDeep { limit: usize },
    /// The template failed validation before any entry scanning began.
    #[error("Template invalid: {0}")]
    TemplateInvalid(String),
    /// Cooperative user abort during rebuild. Callers are expected to
    /// suppress error-style UI for this variant.
    #[error("Operation cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    Io(String),
    /// Failure reported by the remote workflow engine client.
    #[error("Workflow engine error: {0}")]
    Engine(String),
}

impl CoreError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Cancelled)
    }
}

impl From<std::io::Error> for CoreError {
    fn from(error: std::io::Error) -> Self {
        CoreError::Io(error.to_string())
    }
}

impl Serialize for CoreError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
