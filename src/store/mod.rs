//! State containers and the root aggregator
//!
//! Every state transition is applied inside a single
//! [`watch::Sender::send_modify`] closure, so readers of the snapshot
//! never observe a partially-applied transition.

pub mod catalog;
pub mod session;

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::api::LibraryApi;
use crate::models::user::{Credentials, RegisterUser};
use crate::token::TokenStore;

pub use catalog::{CatalogManager, CatalogState};
pub use session::{SessionManager, SessionState};

/// Request lifecycle flag, one per container.
///
/// Concurrent operations within a container share the flag; the last
/// settlement wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Error,
}

impl RequestStatus {
    /// True while an operation of the container is in flight.
    pub fn is_loading(self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

/// Root snapshot composing both containers
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub catalog: CatalogState,
}

/// Named operation for dispatch-style callers
#[derive(Debug, Clone)]
pub enum Action {
    Register(RegisterUser),
    Login(Credentials),
    FetchCurrentUser,
    Logout,
    ListBooks,
    CheckOut(i32),
    Return(i32),
}

/// Root aggregator: composes the session and catalog managers over one
/// atomically-updated snapshot. Owns no transition logic of its own.
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<AppState>>,
    session: SessionManager,
    catalog: CatalogManager,
}

impl Store {
    /// Build the store, restoring any token surviving from a prior
    /// session out of the injected token store.
    pub fn new(api: Arc<dyn LibraryApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let initial = AppState {
            session: SessionState::restored(tokens.load()),
            catalog: CatalogState::default(),
        };
        let state = Arc::new(watch::channel(initial).0);
        Self {
            session: SessionManager::new(Arc::clone(&api), tokens, Arc::clone(&state)),
            catalog: CatalogManager::new(api, Arc::clone(&state)),
            state,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Watch handle for change notification
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// Snapshot change stream
    pub fn updates(&self) -> WatchStream<AppState> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogManager {
        &self.catalog
    }

    /// Route a named operation to its owning manager
    pub async fn dispatch(&self, action: Action) {
        match action {
            Action::Register(user) => self.session.register(user).await,
            Action::Login(credentials) => self.session.login(credentials).await,
            Action::FetchCurrentUser => self.session.fetch_current_user().await,
            Action::Logout => self.session.logout(),
            Action::ListBooks => self.catalog.list_books().await,
            Action::CheckOut(id) => self.catalog.check_out(id).await,
            Action::Return(id) => self.catalog.return_book(id).await,
        }
    }
}
