//! Caller-owned session state for one analysis conversation

use crate::analysis::{Ranking, ResumeAnalysis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Everything a follow-up question may refer back to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub history: Vec<HistoryEntry>,
    pub last_analysis: Option<ResumeAnalysis>,
    pub resume_text: String,
    pub multi_analyses: Vec<ResumeAnalysis>,
    pub multi_resume_texts: Vec<String>,
    pub best_resume: Option<Ranking>,
    /// Model output that could not be parsed, kept for inspection.
    pub last_raw_response: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(Role::Bot, text.into());
    }

    fn push(&mut self, role: Role, text: String) {
        self.history.push(HistoryEntry {
            role,
            text,
            at: Utc::now(),
        });
    }

    /// The latest `limit` history entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        let skip = self.history.len().saturating_sub(limit);
        self.history[skip..].iter().rev()
    }

    pub fn has_multi(&self) -> bool {
        !self.multi_analyses.is_empty()
    }

    pub fn has_context(&self) -> bool {
        self.has_multi() || self.last_analysis.is_some()
    }

    /// Resume text used as follow-up context: the batch if one exists, else the single resume.
    pub fn context_resume(&self) -> String {
        if self.multi_resume_texts.is_empty() {
            self.resume_text.clone()
        } else {
            self.multi_resume_texts.join("\n\n")
        }
    }

    /// Analysis used as follow-up context, with the same preference as [`Session::context_resume`].
    pub fn context_analysis(&self) -> serde_json::Value {
        if self.has_multi() {
            serde_json::Value::Array(
                self.multi_analyses
                    .iter()
                    .map(|a| serde_json::Value::Object(a.fields().clone()))
                    .collect(),
            )
        } else {
            match &self.last_analysis {
                Some(a) => serde_json::Value::Object(a.fields().clone()),
                None => serde_json::Value::Object(Default::default()),
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(value: serde_json::Value) -> ResumeAnalysis {
        match value {
            serde_json::Value::Object(map) => ResumeAnalysis::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let mut session = Session::new();
        for i in 0..60 {
            session.push_bot(format!("message {i}"));
        }

        let recent: Vec<&str> = session.recent(50).map(|e| e.text.as_str()).collect();
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0], "message 59");
        assert_eq!(recent[49], "message 10");
    }

    #[test]
    fn test_recent_with_short_history() {
        let mut session = Session::new();
        session.push_user("hi");
        assert_eq!(session.recent(50).count(), 1);
    }

    #[test]
    fn test_context_prefers_multi_analyses() {
        let mut session = Session::new();
        session.resume_text = "single".to_string();
        session.last_analysis = Some(analysis(json!({"Domain": "A"})));
        assert_eq!(session.context_resume(), "single");
        assert_eq!(session.context_analysis(), json!({"Domain": "A"}));

        session.multi_resume_texts = vec!["one".to_string(), "two".to_string()];
        session.multi_analyses = vec![analysis(json!({"Domain": "B"}))];
        assert_eq!(session.context_resume(), "one\n\ntwo");
        assert_eq!(session.context_analysis(), json!([{"Domain": "B"}]));
    }

    #[test]
    fn test_empty_context_is_empty_object() {
        let session = Session::new();
        assert!(!session.has_context());
        assert_eq!(session.context_analysis(), json!({}));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        session.push_user("question");
        session.last_raw_response = Some("garbage".to_string());
        session.clear();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_session_serializes_roles_lowercase() {
        let mut session = Session::new();
        session.push_user("q");
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["history"][0]["role"], json!("user"));
    }
}
