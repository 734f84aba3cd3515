//! Viewing and managing a user profile.

use std::sync::Arc;

use recipi_core::{ProfilePatch, ProfileResponse};
use thiserror::Error;

use crate::api::{ApiError, RecipiApi};
use crate::navigation::Navigation;
use crate::session::Session;

const UPDATE_FAILED: &str = "There has been an error updating your account";
const LOAD_FAILED: &str = "Could not load profile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    Idle,
    Loading,
    Loaded(ProfileResponse),
    /// Shown inline in place of the profile.
    Failed(String),
}

#[derive(Error, Debug)]
pub enum ProfileUpdateError {
    #[error("Nothing to update")]
    EmptyPatch,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ProfileUpdateError {
    /// The message for the error toast.
    pub fn toast(&self) -> String {
        match self {
            ProfileUpdateError::EmptyPatch => self.to_string(),
            ProfileUpdateError::Api(e) => e.server_message().unwrap_or(UPDATE_FAILED).to_string(),
        }
    }
}

pub struct ProfileController {
    api: Arc<dyn RecipiApi>,
    session: Session,
    state: ProfileState,
}

impl ProfileController {
    pub fn new(api: Arc<dyn RecipiApi>, session: Session) -> Self {
        Self {
            api,
            session,
            state: ProfileState::Idle,
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn profile(&self) -> Option<&ProfileResponse> {
        match &self.state {
            ProfileState::Loaded(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hand the session back, e.g. to persist a replaced or cleared token.
    pub fn into_session(self) -> Session {
        self.session
    }

    pub async fn load_profile(&mut self, username: &str) -> &ProfileState {
        self.state = ProfileState::Loading;
        self.state = match self.api.get_profile(username).await {
            Ok(profile) => ProfileState::Loaded(profile),
            Err(e) => {
                tracing::warn!(error = %e, username, "failed to load profile");
                ProfileState::Failed(e.server_message().unwrap_or(LOAD_FAILED).to_string())
            }
        };
        &self.state
    }

    /// Whether the signed-in user is the one whose profile is loaded.
    ///
    /// Reads the token without verifying it, so this only decides what to
    /// display. The server checks every change itself.
    pub fn is_owner(&self) -> bool {
        match (self.session.username(), self.profile()) {
            (Some(me), Some(profile)) => me == profile.username,
            _ => false,
        }
    }

    /// Send the fields set in `patch`. On success the session takes the
    /// replacement token and the profile page is reopened under the
    /// (possibly new) username.
    pub async fn update_profile(
        &mut self,
        patch: ProfilePatch,
    ) -> Result<Navigation, ProfileUpdateError> {
        if patch.is_empty() {
            return Err(ProfileUpdateError::EmptyPatch);
        }
        let token = self.session.require_token()?.to_string();

        let response = self.api.update_profile(&token, patch).await?;
        self.session.set_token(response.user.token);

        Ok(Navigation::profile(&response.user.username))
    }

    /// Permanently delete the signed-in account and sign out.
    pub async fn delete_profile(&mut self) -> Result<Navigation, ApiError> {
        let token = self.session.require_token()?.to_string();

        self.api.delete_profile(&token).await?;
        self.session.clear_token();
        self.state = ProfileState::Idle;

        Ok(Navigation::Home)
    }
}
