//! Session container: identity and token lifecycle

use std::sync::Arc;

use tokio::sync::watch;
use validator::Validate;

use crate::api::LibraryApi;
use crate::error::{ApiError, RequestError};
use crate::models::user::{AuthResponse, Credentials, RegisterUser, User};
use crate::token::TokenStore;

use super::{AppState, RequestStatus};

/// Authenticated-identity portion of the snapshot.
///
/// `token` is present iff a successful login/registration has occurred
/// and logout has not since been invoked; `user` may lag behind the
/// token until the profile is fetched.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: RequestStatus,
    pub last_error: Option<RequestError>,
    /// Session epoch. Logout bumps it so fulfillments still in flight
    /// from the previous epoch are discarded instead of resurrecting
    /// identity.
    pub(crate) generation: u64,
}

impl SessionState {
    pub(crate) fn restored(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }
}

/// Issues the session operations and applies their transitions
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<dyn LibraryApi>,
    tokens: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<AppState>>,
}

impl SessionManager {
    pub(crate) fn new(
        api: Arc<dyn LibraryApi>,
        tokens: Arc<dyn TokenStore>,
        state: Arc<watch::Sender<AppState>>,
    ) -> Self {
        Self { api, tokens, state }
    }

    /// Register a new account. On success the issued token is persisted
    /// and the session holds the new identity.
    pub async fn register(&self, user: RegisterUser) {
        if let Err(errors) = user.validate() {
            self.reject(RequestError::precondition(errors.to_string()));
            return;
        }
        let generation = self.begin();
        match self.api.register(&user).await {
            Ok(auth) => self.fulfill_auth(auth, generation),
            Err(error) => self.reject_api(&error, "Registration failed. Try again."),
        }
    }

    /// Log in with existing credentials
    pub async fn login(&self, credentials: Credentials) {
        let generation = self.begin();
        match self.api.login(&credentials).await {
            Ok(auth) => self.fulfill_auth(auth, generation),
            Err(error) => self.reject_api(&error, "Invalid email or password."),
        }
    }

    /// Fetch the profile for the current token. Requires a token to be
    /// present in state; otherwise rejects without a network call.
    pub async fn fetch_current_user(&self) {
        let token = self.state.borrow().session.token.clone();
        let Some(token) = token else {
            self.reject(RequestError::precondition("No token found. Please log in."));
            return;
        };
        let generation = self.begin();
        match self.api.current_user(&token).await {
            Ok(user) => self.state.send_modify(|state| {
                state.session.status = RequestStatus::Idle;
                if state.session.generation == generation {
                    state.session.user = Some(user);
                } else {
                    tracing::debug!("discarding stale profile response");
                }
            }),
            Err(error) => self.reject_api(&error, "Failed to fetch user data."),
        }
    }

    /// Clear identity and the persisted token. Synchronous, never fails.
    pub fn logout(&self) {
        self.state.send_modify(|state| {
            state.session.user = None;
            state.session.token = None;
            state.session.generation += 1;
            self.tokens.clear();
        });
    }

    /// Pending transition; returns the generation the operation belongs to.
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.session.status = RequestStatus::Pending;
            state.session.last_error = None;
            generation = state.session.generation;
        });
        generation
    }

    fn fulfill_auth(&self, auth: AuthResponse, generation: u64) {
        self.state.send_modify(|state| {
            state.session.status = RequestStatus::Idle;
            if state.session.generation == generation {
                self.tokens.save(&auth.token);
                state.session.user = Some(auth.user);
                state.session.token = Some(auth.token);
            } else {
                tracing::debug!("discarding stale authentication response");
            }
        });
    }

    fn reject_api(&self, error: &ApiError, message: &str) {
        tracing::warn!(%error, "{message}");
        self.reject(RequestError::from_api(error, message));
    }

    fn reject(&self, error: RequestError) {
        self.state.send_modify(|state| {
            state.session.status = RequestStatus::Error;
            state.session.last_error = Some(error);
        });
    }
}
