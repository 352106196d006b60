//! Remote API seam for the checkout server

pub mod client;

pub use client::ApiClient;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::book::Book;
use crate::models::user::{AuthResponse, Credentials, RegisterUser, User};

/// The server operations this layer consumes.
///
/// [`ApiClient`] is the reqwest-backed implementation; tests substitute a
/// mock to drive the state machinery without a server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// POST `/users/register`
    async fn register(&self, user: &RegisterUser) -> Result<AuthResponse, ApiError>;

    /// POST `/users/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// GET `/users/me`, authenticated with the bearer token
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;

    /// GET `/books`
    async fn list_books(&self) -> Result<Vec<Book>, ApiError>;

    /// PATCH `/books/{id}`, authenticated with the bearer token
    async fn set_availability(
        &self,
        id: i32,
        available: bool,
        token: &str,
    ) -> Result<Book, ApiError>;
}
