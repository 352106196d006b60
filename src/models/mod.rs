//! Data models for the Biblio client

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{AvailabilityUpdate, Book};
pub use user::{AuthResponse, Credentials, RegisterUser, User};
