//! Report model shared by every output format

use crate::analysis::{Ranking, ResumeAnalysis};
use crate::contact::ContactInfo;
use crate::llm::{BatchOutcome, SingleOutcome};
use crate::session::{HistoryEntry, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub body: ReportBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub model: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Single {
        filename: String,
        analysis: ResumeAnalysis,
        contact: ContactInfo,
    },
    Batch {
        analyses: Vec<ResumeAnalysis>,
        best_resume: Ranking,
    },
    Transcript {
        entries: Vec<HistoryEntry>,
    },
}

impl ReportMetadata {
    pub fn new(model: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: model.to_string(),
            processing_time_ms,
        }
    }
}

impl Report {
    pub fn single(outcome: &SingleOutcome, model: &str) -> Self {
        Self {
            metadata: ReportMetadata::new(model, outcome.processing_time_ms),
            body: ReportBody::Single {
                filename: outcome.filename.clone(),
                analysis: outcome.analysis.clone(),
                contact: outcome.contact.clone(),
            },
        }
    }

    pub fn batch(outcome: &BatchOutcome, model: &str) -> Self {
        Self {
            metadata: ReportMetadata::new(model, outcome.processing_time_ms),
            body: ReportBody::Batch {
                analyses: outcome.analyses.clone(),
                best_resume: outcome.ranking.clone(),
            },
        }
    }

    /// Activity log, newest entry first, capped at `limit` entries.
    pub fn transcript(session: &Session, limit: usize, model: &str) -> Self {
        Self {
            metadata: ReportMetadata::new(model, 0),
            body: ReportBody::Transcript {
                entries: session.recent(limit).cloned().collect(),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self.body {
            ReportBody::Single { .. } => "TalentMatch-360 Resume Analysis",
            ReportBody::Batch { .. } => "TalentMatch-360 Multi-Resume Analysis",
            ReportBody::Transcript { .. } => "TalentMatch-360 Chat / Activity Log",
        }
    }
}

/// Label/value rows for one analysis, in display order.
pub fn analysis_rows(analysis: &ResumeAnalysis) -> Vec<(&'static str, String)> {
    use crate::analysis::join_or_none;

    vec![
        ("Domain", analysis.domain()),
        ("JD Match", analysis.jd_match()),
        ("Total Experience", analysis.total_experience()),
        ("Relevant Experience", analysis.relevant_experience()),
        ("Matching Skills", join_or_none(&analysis.matching_skills())),
        ("Missing Keywords", join_or_none(&analysis.missing_keywords())),
        ("Strengths", analysis.strengths()),
        ("Weaknesses", analysis.weaknesses()),
        ("Previous Companies", join_or_none(&analysis.previous_companies())),
        ("Profile Summary", analysis.profile_summary()),
    ]
}
