// Error taxonomy shared by the stores, the authenticator and the dispatcher.
//
// A failed login is not an error: `Authenticator::authenticate` answers
// `false`. Everything here is either an I/O failure, a rejected input, or
// the authorization guard refusing a command.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    /// A file could not be opened, read or written.
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid username: {0}")]
    InvalidUsername(&'static str),

    #[error("invalid task: {0}")]
    InvalidTask(&'static str),

    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Reading credentials from the terminal failed (e.g. no TTY attached).
    #[error("reading input: {0}")]
    Prompt(#[source] io::Error),

    #[error("Authentication required. Please log in.")]
    AuthenticationRequired,
}

impl TodoError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        TodoError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
