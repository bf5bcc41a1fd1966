//! Gemini Veo image-to-video client.
//!
//! This crate provides:
//! - `VeoClient` for submitting `predictLongRunning` jobs and downloading results
//! - `JobPoller`, a fixed-interval wait on long-running operations
//! - Classification of API key failures

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod types;

pub use client::VeoClient;
pub use config::VeoConfig;
pub use error::{VeoError, VeoResult};
pub use poller::{JobPoller, OperationSource};
pub use types::{GeneratedVideo, Operation, VideoRequest};
