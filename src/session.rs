// Session flag persistence and the in-process session context.
//
// Each invocation is a fresh process, so "logged in" survives only as a
// `true`/`false` token in `auth_status.txt`. The flag carries no identity.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TodoError};

/// The persisted boolean behind the session.
#[derive(Debug, Clone)]
pub struct SessionFlag {
    path: PathBuf,
}

impl SessionFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionFlag { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the flag. A missing, empty, unreadable or unparseable file all
    /// mean "not authenticated".
    pub fn read(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(contents) => parse_token(&contents).unwrap_or(false),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "session flag unreadable");
                }
                false
            }
        }
    }

    /// Overwrite the file with the textual boolean.
    pub fn write(&self, value: bool) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TodoError::io("create", parent, e))?;
        }
        fs::write(&self.path, if value { "true" } else { "false" })
            .map_err(|e| TodoError::io("write", &self.path, e))?;
        debug!(path = %self.path.display(), value, "session flag written");
        Ok(())
    }
}

/// Parse a boolean the way Go's `%t` verb scans one: leading blanks are
/// skipped (a line break is not), then `0`/`1`, or `t`/`f` optionally
/// followed by the rest of `true`/`false` in any case. A spelled-out word
/// that stops halfway fails.
fn parse_token(contents: &str) -> Option<bool> {
    let token =
        contents.trim_start_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r');
    let mut chars = token.chars();
    let (value, tail) = match chars.next()? {
        '0' => return Some(false),
        '1' => return Some(true),
        't' | 'T' => (true, "rue"),
        'f' | 'F' => (false, "alse"),
        _ => return None,
    };

    let rest = chars.as_str();
    let starts_word = rest
        .chars()
        .next()
        .zip(tail.chars().next())
        .is_some_and(|(c, expected)| c.eq_ignore_ascii_case(&expected));
    if !starts_word {
        return Some(value);
    }
    match rest.get(..tail.len()) {
        Some(word) if word.eq_ignore_ascii_case(tail) => Some(value),
        _ => None,
    }
}

/// Session context handed to every command handler. Read once at startup.
#[derive(Debug)]
pub struct Session {
    flag: SessionFlag,
    authenticated: bool,
}

impl Session {
    pub fn load(flag: SessionFlag) -> Self {
        let authenticated = flag.read();
        debug!(authenticated, "session loaded");
        Session {
            flag,
            authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Mark the session authenticated and persist it. The in-memory state
    /// flips even when persisting fails.
    pub fn grant(&mut self) -> Result<()> {
        self.authenticated = true;
        self.flag.write(true)?;
        info!("session authenticated");
        Ok(())
    }
}
