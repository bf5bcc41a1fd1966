//! Image-to-video studio.
//!
//! This crate provides:
//! - The generation orchestrator (validate, submit, poll, download)
//! - A session holding the current image, prompt, camera and clip
//! - Project save/browse through the `ProjectStore` and `AssetStore` ports
//! - The `mclip` command-line front-end

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod ports;
pub mod session;

pub use config::StudioConfig;
pub use error::{StudioError, StudioResult};
pub use logging::{GenerationLogger, RequestKind};
pub use orchestrator::{GenerationInput, GenerationOrchestrator, VideoHandle};
pub use ports::{AssetStore, ProjectStore, VideoGenerator};
pub use session::{CurrentVideo, ProjectScope, StudioSession};
