//! Error types for reconciliation

use crate::types::ExecuteSummary;
use std::fmt;
use thiserror::Error;

/// Remote operation that was being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Errors that can occur while expanding templates or applying plans
#[derive(Error, Debug)]
pub enum Error {
    /// Template document is malformed
    #[error("invalid template: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error while reading a template
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template names a communication profile the remote tenant does not have
    #[error("communication profile not found: {name}")]
    UnresolvedProfile { name: String },

    /// A resource scheduled for deletion has no remote id
    #[error("cannot delete {resource_type} {resource}: it has no remote id")]
    MissingRemoteId {
        resource_type: &'static str,
        resource: String,
    },

    /// The confirmation prompt could not be shown
    #[error("confirmation failed: {0}")]
    Confirmation(String),

    /// A remote mutation failed; earlier changes in the same run remain applied
    #[error("failed to {operation} {resource_type} {resource} ({summary} before failure): {message}")]
    ApplyFailed {
        operation: Operation,
        resource_type: &'static str,
        resource: String,
        summary: ExecuteSummary,
        message: String,
    },
}

impl Error {
    /// Progress made before a failed apply, if any
    pub fn partial_summary(&self) -> Option<&ExecuteSummary> {
        match self {
            Error::ApplyFailed { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;
