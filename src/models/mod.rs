//! Core data models for photo records and search pages.

mod image;
mod page;

pub use image::{ImageRecord, SelectedImage};
pub use page::{PhotoQuery, ResultPage, DEFAULT_PER_PAGE};
