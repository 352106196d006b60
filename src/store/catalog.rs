//! Catalog container: book collection and availability updates

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::api::LibraryApi;
use crate::error::{ApiError, RequestError};
use crate::models::book::Book;

use super::{AppState, RequestStatus};

/// Book-collection portion of the snapshot.
///
/// The map preserves server order and holds at most one entry per id.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub books: IndexMap<i32, Book>,
    pub status: RequestStatus,
    pub last_error: Option<RequestError>,
}

/// Issues the catalog operations and applies their transitions.
///
/// Authenticated operations read the session token from the shared
/// snapshot at call time; the catalog never mutates it.
#[derive(Clone)]
pub struct CatalogManager {
    api: Arc<dyn LibraryApi>,
    state: Arc<watch::Sender<AppState>>,
}

impl CatalogManager {
    pub(crate) fn new(api: Arc<dyn LibraryApi>, state: Arc<watch::Sender<AppState>>) -> Self {
        Self { api, state }
    }

    /// Fetch the full catalog, replacing the local collection with the
    /// server's sequence.
    pub async fn list_books(&self) {
        self.begin();
        match self.api.list_books().await {
            Ok(books) => self.state.send_modify(|state| {
                state.catalog.status = RequestStatus::Idle;
                state.catalog.books = books.into_iter().map(|book| (book.id, book)).collect();
            }),
            Err(error) => self.reject_api(&error, "Failed to fetch books"),
        }
    }

    /// Mark a book unavailable. The local entry flips only after server
    /// confirmation; there is no optimistic update to roll back.
    pub async fn check_out(&self, book_id: i32) {
        self.set_availability(book_id, false, "Failed to check out book")
            .await;
    }

    /// Mark a book available again
    pub async fn return_book(&self, book_id: i32) {
        self.set_availability(book_id, true, "Failed to return book")
            .await;
    }

    async fn set_availability(&self, book_id: i32, available: bool, failure: &str) {
        let token = self.state.borrow().session.token.clone();
        let Some(token) = token else {
            self.reject(RequestError::precondition("No token available"));
            return;
        };
        self.begin();
        match self.api.set_availability(book_id, available, &token).await {
            Ok(book) => self.state.send_modify(|state| {
                state.catalog.status = RequestStatus::Idle;
                // The server is the source of truth for existence: an
                // update for an id not in the collection is dropped,
                // not inserted.
                if let Some(entry) = state.catalog.books.get_mut(&book.id) {
                    *entry = book;
                }
            }),
            Err(error) => self.reject_api(&error, failure),
        }
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.catalog.status = RequestStatus::Pending;
            state.catalog.last_error = None;
        });
    }

    fn reject_api(&self, error: &ApiError, message: &str) {
        tracing::warn!(%error, "{message}");
        self.reject(RequestError::from_api(error, message));
    }

    fn reject(&self, error: RequestError) {
        self.state.send_modify(|state| {
            state.catalog.status = RequestStatus::Error;
            state.catalog.last_error = Some(error);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockLibraryApi;
    use crate::error::FailureKind;
    use crate::store::Store;
    use crate::token::{MemoryTokenStore, TokenStore};

    fn book(id: i32, available: bool) -> Book {
        Book {
            id,
            title: Some(format!("Book {}", id)),
            author: None,
            available,
            extra: Default::default(),
        }
    }

    /// Store with a token in place and the given initial catalog.
    async fn store_with_catalog(mut api: MockLibraryApi, books: Vec<Book>) -> Store {
        api.expect_list_books().times(1).return_once(|| Ok(books));
        let tokens = Arc::new(MemoryTokenStore::new());
        tokens.save("T");
        let store = Store::new(Arc::new(api), tokens);
        store.catalog().list_books().await;
        store
    }

    #[tokio::test]
    async fn test_list_books_replaces_collection() {
        let store = store_with_catalog(MockLibraryApi::new(), vec![book(5, true), book(7, false)]).await;

        let catalog = store.snapshot().catalog;
        assert_eq!(catalog.books.keys().copied().collect::<Vec<_>>(), vec![5, 7]);
        assert_eq!(catalog.status, RequestStatus::Idle);
        assert!(catalog.last_error.is_none());
    }

    #[tokio::test]
    async fn test_list_books_failure_sets_error() {
        let mut api = MockLibraryApi::new();
        api.expect_list_books()
            .returning(|| Err(ApiError::Transport("connection refused".to_string())));
        let store = Store::new(Arc::new(api), Arc::new(MemoryTokenStore::new()));

        store.catalog().list_books().await;

        let catalog = store.snapshot().catalog;
        assert!(catalog.books.is_empty());
        assert_eq!(catalog.status, RequestStatus::Error);
        let error = catalog.last_error.unwrap();
        assert_eq!(error.message, "Failed to fetch books");
        assert_eq!(error.kind, FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_check_out_replaces_matching_entry_in_place() {
        let mut api = MockLibraryApi::new();
        api.expect_set_availability()
            .withf(|id, available, token| *id == 5 && !*available && token == "T")
            .returning(|id, available, _| Ok(book(id, available)));
        let store = store_with_catalog(api, vec![book(5, true), book(7, true)]).await;

        store.catalog().check_out(5).await;

        let catalog = store.snapshot().catalog;
        // Order preserved, other entries untouched.
        assert_eq!(catalog.books.keys().copied().collect::<Vec<_>>(), vec![5, 7]);
        assert!(!catalog.books[&5].available);
        assert!(catalog.books[&7].available);
        assert_eq!(catalog.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_return_book_marks_available() {
        let mut api = MockLibraryApi::new();
        api.expect_set_availability()
            .withf(|id, available, _| *id == 5 && *available)
            .returning(|id, available, _| Ok(book(id, available)));
        let store = store_with_catalog(api, vec![book(5, false)]).await;

        store.catalog().return_book(5).await;

        assert!(store.snapshot().catalog.books[&5].available);
    }

    #[tokio::test]
    async fn test_check_out_twice_is_idempotent() {
        let mut api = MockLibraryApi::new();
        api.expect_set_availability()
            .times(2)
            .returning(|id, available, _| Ok(book(id, available)));
        let store = store_with_catalog(api, vec![book(5, true)]).await;

        store.catalog().check_out(5).await;
        let once = store.snapshot().catalog;
        store.catalog().check_out(5).await;
        let twice = store.snapshot().catalog;

        assert_eq!(once.books, twice.books);
        assert!(!twice.books[&5].available);
    }

    #[tokio::test]
    async fn test_unknown_id_response_is_dropped() {
        let mut api = MockLibraryApi::new();
        api.expect_set_availability()
            .returning(|_, available, _| Ok(book(99, available)));
        let store = store_with_catalog(api, vec![book(5, true)]).await;

        store.catalog().check_out(99).await;

        let catalog = store.snapshot().catalog;
        // No insertion for an entry the local collection never had.
        assert_eq!(catalog.books.keys().copied().collect::<Vec<_>>(), vec![5]);
        assert!(catalog.books[&5].available);
        assert_eq!(catalog.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_check_out_without_token_skips_request() {
        // Only the list call is expected: a checkout request would
        // panic the test.
        let mut api = MockLibraryApi::new();
        api.expect_list_books().returning(|| Ok(vec![book(5, true)]));
        let store = Store::new(Arc::new(api), Arc::new(MemoryTokenStore::new()));
        store.catalog().list_books().await;

        store.catalog().check_out(5).await;

        let catalog = store.snapshot().catalog;
        let error = catalog.last_error.unwrap();
        assert_eq!(error.message, "No token available");
        assert_eq!(error.kind, FailureKind::Precondition);
        assert!(catalog.books[&5].available);
    }

    #[tokio::test]
    async fn test_check_out_failure_leaves_entry_unchanged() {
        let mut api = MockLibraryApi::new();
        api.expect_set_availability()
            .returning(|_, _, _| Err(ApiError::Status { status: 500 }));
        let store = store_with_catalog(api, vec![book(5, true)]).await;

        store.catalog().check_out(5).await;

        let catalog = store.snapshot().catalog;
        assert!(catalog.books[&5].available);
        assert_eq!(catalog.status, RequestStatus::Error);
        let error = catalog.last_error.unwrap();
        assert_eq!(error.message, "Failed to check out book");
        assert_eq!(error.kind, FailureKind::Status(500));
    }
}
