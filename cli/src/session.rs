//! The client session: which server to talk to and who we are.
//!
//! A [`Session`] is passed explicitly to every controller that needs it.
//! [`SessionStore`] persists it between CLI invocations.

use std::fs;
use std::path::{Path, PathBuf};

use recipi_core::{decode_unverified, Claims};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Base URL of the Recipi server.
    pub server: String,
    /// Bearer token, if signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The token, or [`ApiError::Unauthenticated`] when signed out.
    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.token().ok_or(ApiError::Unauthenticated)
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Claims read from the token without verifying it. Display only.
    pub fn claims(&self) -> Option<Claims> {
        self.token().and_then(|t| decode_unverified(t).ok())
    }

    pub fn username(&self) -> Option<String> {
        self.claims().map(|c| c.username)
    }

    /// True when a token is held but has expired or cannot be read. The user
    /// should sign in again.
    pub fn is_expired(&self) -> bool {
        match self.token() {
            Some(_) => self.claims().map_or(true, |c| c.is_expired()),
            None => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not determine home directory")]
    NoHome,

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

/// A session saved as JSON on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.recipi/session.json`
    pub fn default_location() -> Result<Self, SessionError> {
        let home = dirs::home_dir().ok_or(SessionError::NoHome)?;
        Ok(Self::new(home.join(".recipi").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved session, or `None` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
