//! Tests against live Gemini, Firestore and blob storage.
//!
//! They are ignored by default and read credentials from the environment
//! or a `.env` file:
//!   cargo test -p mclip-studio --test integration -- --ignored

mod firestore_tests;
mod storage_tests;
mod veo_tests;
