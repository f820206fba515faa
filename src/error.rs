//! Error types for fluxsim.
//!
//! Simulation stepping never fails: every stepper is total over its
//! reachable parameter range and numerical edge cases degrade to local
//! fallbacks. The only fallible operation in the crate is the
//! explanation-service call, and its failures collapse into one
//! deliberately generic error so UI layers display a single message
//! while the underlying cause goes to the log.

use std::fmt;

/// Failure of an explanation-service request.
///
/// A missing credential is not an error (the client degrades to a fixed
/// advisory string); this type only covers a request that was actually
/// attempted.
#[derive(Debug)]
pub enum ExplainError {
    /// The HTTP request could not be sent, timed out, or came back with
    /// an error status.
    Transport(reqwest::Error),
    /// The response arrived but did not contain generated text.
    Malformed(String),
}

impl fmt::Display for ExplainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // One generic surface message for every cause; the log carries detail.
        write!(f, "explanation service communication failed")
    }
}

impl std::error::Error for ExplainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExplainError::Transport(e) => Some(e),
            ExplainError::Malformed(_) => None,
        }
    }
}

impl From<reqwest::Error> for ExplainError {
    fn from(e: reqwest::Error) -> Self {
        ExplainError::Transport(e)
    }
}
