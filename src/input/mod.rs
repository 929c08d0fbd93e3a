//! Input processing module
//! Handles file detection, text extraction, and job description sources

pub mod file_detector;
pub mod text_extractor;
pub mod loader;

pub use loader::{DocumentLoader, JobSource, ResumeDocument};
