//! Model integration: client, prompt templates and analysis orchestration

pub mod client;
pub mod prompts;
pub mod analyzer;

pub use analyzer::{BatchOutcome, ResumeAnalyzer, SingleOutcome};
pub use client::{GeminiClient, ModelClient};
