//! Integration tests for talentmatch

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use talentmatch::config::{Config, OutputFormat};
use talentmatch::input::{DocumentLoader, JobSource};
use talentmatch::llm::{ModelClient, ResumeAnalyzer};
use talentmatch::output::{Report, ReportGenerator};
use talentmatch::{extract, ExtractionError, Session, TalentMatchError};

/// Model stand-in that replays canned replies.
struct CannedModel {
    replies: Mutex<VecDeque<String>>,
}

impl CannedModel {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        }
    }
}

#[async_trait]
impl ModelClient for CannedModel {
    async fn generate(&self, _prompt: &str) -> talentmatch::Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TalentMatchError::EmptyResponse("no more replies".to_string()))
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut loader = DocumentLoader::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = loader.load(path).await.unwrap();
    assert!(text.starts_with("John Doe"));
    assert!(text.contains("React"));
    assert!(text.ends_with("Docker"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut loader = DocumentLoader::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = loader.load(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut loader = DocumentLoader::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = loader.load(path).await.unwrap();
    assert_eq!(loader.cache_size(), 1);

    let text2 = loader.load(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(loader.cache_size(), 1);

    loader.clear_cache();
    assert_eq!(loader.cache_size(), 0);

    let mut uncached = DocumentLoader::new().with_cache(false);
    uncached.load(path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut loader = DocumentLoader::new();
    let result = loader.load(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(TalentMatchError::UnsupportedFormat(_))));

    let result = loader.load_resume(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(TalentMatchError::InvalidInput(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut loader = DocumentLoader::new();
    let result = loader.load(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(TalentMatchError::InvalidInput(_))));
}

#[test]
fn test_saved_model_reply_needs_repair() {
    let raw = std::fs::read_to_string("tests/fixtures/model_reply.txt").unwrap();

    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_err());
    let parsed = extract(&raw).unwrap();
    assert_eq!(parsed["Strengths"], "Full stack delivery");
    assert_eq!(parsed["MissingKeywords"], serde_json::json!(["Kubernetes"]));
    assert_eq!(parsed.len(), 10);
}

#[test]
fn test_prose_without_object() {
    assert_eq!(extract("The model refused."), Err(ExtractionError::NoCandidateFound));
}

#[tokio::test]
async fn test_end_to_end_single_analysis() {
    let raw = std::fs::read_to_string("tests/fixtures/model_reply.txt").unwrap();
    let model = CannedModel::new(&[raw.as_str(), "React and Node.js are both covered."]);
    let analyzer = ResumeAnalyzer::new(model, &Config::default());

    let mut loader = DocumentLoader::new();
    let resume = loader
        .load_resume(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let jd = loader
        .load_job(&JobSource::File("tests/fixtures/job_description.txt".into()))
        .await
        .unwrap();

    let mut session = Session::new();
    let outcome = analyzer.analyze_single(&mut session, &resume, &jd).await.unwrap();

    assert_eq!(outcome.filename, "sample_resume.txt");
    assert_eq!(outcome.analysis.match_percentage(), Some(85.0));
    assert_eq!(outcome.contact.email.as_deref(), Some("john.doe@example.com"));
    assert_eq!(outcome.contact.phone.as_deref(), Some("+91 9876543210"));

    let reply = analyzer.ask(&mut session, "Front end coverage?").await.unwrap();
    assert_eq!(reply, "React and Node.js are both covered.");

    let generator = ReportGenerator::with_options(false, true, false, false);
    let console = generator
        .generate_report(&Report::single(&outcome, "canned"), &OutputFormat::Console)
        .unwrap();
    assert!(console.contains("❌ Missing Keywords: Kubernetes"));

    let transcript = generator
        .generate_report(&Report::transcript(&session, 50, "canned"), &OutputFormat::Markdown)
        .unwrap();
    assert!(transcript.contains("**You:** Front end coverage?"));
}

#[tokio::test]
async fn test_end_to_end_batch_with_unparseable_ranking() {
    let model = CannedModel::new(&[
        r#"{"Domain": "Software", "JD Match": "70%"}"#,
        r#"{"Domain": "Software", "JD Match": "80%"}"#,
        "I would pick the second one.",
    ]);
    let analyzer = ResumeAnalyzer::new(model, &Config::default());

    let mut loader = DocumentLoader::new();
    let resumes = vec![
        loader.load_resume(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap(),
        loader.load_resume(Path::new("tests/fixtures/sample_resume.md")).await.unwrap(),
    ];

    let mut session = Session::new();
    let result = analyzer.analyze_many(&mut session, &resumes, "Full stack engineer").await;

    assert!(matches!(result, Err(TalentMatchError::AnalysisFailed(_))));
    assert_eq!(session.multi_analyses.len(), 2);
    assert_eq!(session.multi_analyses[1].filename(), Some("sample_resume.md"));
    assert_eq!(session.last_raw_response.as_deref(), Some("I would pick the second one."));
}
