//! talentmatch library
//!
//! Resume text goes in, a templated prompt goes to a hosted model, and the model's
//! free-form reply is turned back into a JSON object by [`extract::extract`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod extract;
pub mod input;
pub mod llm;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::{Result, TalentMatchError};
pub use extract::{extract, extract_with, ExtractionError, JsonObject, SpanMode};
pub use session::Session;
