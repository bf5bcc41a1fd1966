//! Firestore REST API client.
//!
//! This crate provides:
//! - A REST client with service account or emulator authentication
//! - Retry with exponential backoff, tracing spans and metrics
//! - `ProjectRepository` for the `videoProjects` collection

pub mod client;
pub mod error;
pub mod metrics;
pub mod projects_repo;
pub mod retry;
pub mod token_cache;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use projects_repo::{ProjectRepository, PROJECTS_COLLECTION};
pub use retry::RetryConfig;
pub use types::{Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};
