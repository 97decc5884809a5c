//! # Unsplash Gallery
//!
//! A terminal image search gallery over the Unsplash photo search API.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (ImageRecord, PhotoQuery, ResultPage)
//! - [`sources`]: Remote image sources behind the [`ImageSource`] trait
//! - [`gallery`]: The incremental search and pagination state machine
//! - [`shell`]: Interactive line-oriented presentation shell
//! - [`ui`]: Terminal rendering helpers
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod gallery;
pub mod models;
pub mod shell;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use gallery::{Gallery, Phase, SearchState};
pub use models::ImageRecord;
pub use sources::{ImageSource, UnsplashSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
