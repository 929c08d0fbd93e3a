//! Document loading for resumes and job descriptions

use crate::error::{Result, TalentMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// A resume's extracted text plus the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub filename: String,
    pub text: String,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// Where the job description comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    File(PathBuf),
    Inline(String),
}

pub struct DocumentLoader {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract trimmed text from a PDF, plain text or markdown file.
    pub async fn load(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(TalentMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(TalentMatchError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };
        let text = text.trim().to_string();

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Load a resume, naming it after its file name.
    pub async fn load_resume(&mut self, path: &Path) -> Result<ResumeDocument> {
        validate_file_extension(path, RESUME_EXTENSIONS)
            .map_err(|e| TalentMatchError::InvalidInput(format!("Resume file: {}", e)))?;

        let text = self.load(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(ResumeDocument::new(filename, text))
    }

    /// Resolve a job description; blank descriptions are rejected.
    pub async fn load_job(&mut self, source: &JobSource) -> Result<String> {
        let text = match source {
            JobSource::File(path) => self.load(path).await?,
            JobSource::Inline(text) => text.trim().to_string(),
        };

        if text.is_empty() {
            return Err(TalentMatchError::InvalidInput(
                "Please provide Job Description".to_string(),
            ));
        }
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> std::result::Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

/// Truncate text to at most `max_graphemes` graphemes, cutting at a word boundary
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let truncated = graphemes[..max_graphemes].concat();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}...", truncated[..cut].trim_end())
}
