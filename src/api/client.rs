//! reqwest-backed implementation of the checkout server API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{ApiError, AppResult};
use crate::models::book::{books_from_body, AvailabilityUpdate, Book};
use crate::models::user::{AuthResponse, Credentials, RegisterUser, User};

use super::LibraryApi;

/// HTTP client for the checkout server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn expect_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
            })
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        Ok(Self::expect_success(response)?.json().await?)
    }
}

#[async_trait]
impl LibraryApi for ApiClient {
    async fn register(&self, user: &RegisterUser) -> Result<AuthResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/users/register"))
            .json(user)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/users/login"))
            .json(credentials)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/users/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        let response = self.http.get(self.endpoint("/books")).send().await?;
        let body: serde_json::Value = Self::expect_success(response)?.json().await?;
        books_from_body(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn set_availability(
        &self,
        id: i32,
        available: bool,
        token: &str,
    ) -> Result<Book, ApiError> {
        let response = self
            .http
            .patch(self.endpoint(&format!("/books/{}", id)))
            .bearer_auth(token)
            .json(&AvailabilityUpdate { available })
            .send()
            .await?;
        Self::read_json(response).await
    }
}
