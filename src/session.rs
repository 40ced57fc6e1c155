use crate::error::{AppError, SessionError};
use crate::http::CredentialSource;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Default location of the session file, relative to the working directory
pub const DEFAULT_SESSION_PATH: &str = ".fetchit/session.yaml";

/// Session-scoped settings shared by every request the CLI sends
///
/// ```yaml
/// token: abc123
/// base_url: https://api.example.com
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub base_url: Option<String>,
}

impl CredentialSource for Session {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

pub fn parse_session(content: &str) -> Result<Session, AppError> {
    if content.trim().is_empty() {
        return Ok(Session::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_session(path: &Path) -> Result<Session, AppError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SessionError::FileNotFound(path.display().to_string()),
        _ => SessionError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
    })?;
    parse_session(&content)
}

/// Resolve the session for this run
///
/// An explicit path must exist. Without one, the default file is used when
/// present and an empty session otherwise.
pub fn resolve_session(explicit: Option<&Path>) -> Result<Session, AppError> {
    match explicit {
        Some(path) => load_session(path),
        None => {
            let default = Path::new(DEFAULT_SESSION_PATH);
            if default.exists() {
                load_session(default)
            } else {
                tracing::debug!(
                    "no session file at {DEFAULT_SESSION_PATH}, continuing without one"
                );
                Ok(Session::default())
            }
        }
    }
}
