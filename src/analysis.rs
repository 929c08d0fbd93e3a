//! Read-only views over the JSON objects returned by the model
//!
//! The model is asked for a fixed set of keys but nothing guarantees it complies,
//! so accessors fall back to `N/A` / empty lists instead of failing.

use crate::contact::ContactInfo;
use crate::extract::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FILENAME_KEY: &str = "Filename";
const MISSING: &str = "N/A";

/// Structured result of one resume/job description comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeAnalysis {
    fields: JsonObject,
}

impl ResumeAnalysis {
    pub fn new(fields: JsonObject) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    pub fn domain(&self) -> String {
        self.text("Domain")
    }

    pub fn jd_match(&self) -> String {
        self.text("JD Match")
    }

    /// `JD Match` as a number, when the model produced something like `"85%"` or `85`.
    pub fn match_percentage(&self) -> Option<f32> {
        match self.fields.get("JD Match")? {
            Value::Number(n) => n.as_f64().map(|v| v as f32),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }

    pub fn total_experience(&self) -> String {
        self.text("TotalExperience")
    }

    pub fn relevant_experience(&self) -> String {
        self.text("RelevantExperience")
    }

    pub fn matching_skills(&self) -> Vec<String> {
        self.list("MatchingSkills")
    }

    pub fn missing_keywords(&self) -> Vec<String> {
        self.list("MissingKeywords")
    }

    pub fn strengths(&self) -> String {
        self.text("Strengths")
    }

    pub fn weaknesses(&self) -> String {
        self.text("Weaknesses")
    }

    pub fn profile_summary(&self) -> String {
        self.text("ProfileSummary")
    }

    pub fn previous_companies(&self) -> Vec<String> {
        self.list("PreviousCompanies")
    }

    pub fn filename(&self) -> Option<&str> {
        self.fields.get(FILENAME_KEY).and_then(Value::as_str)
    }

    pub fn set_filename(&mut self, filename: &str) {
        self.fields
            .insert(FILENAME_KEY.to_string(), Value::String(filename.to_string()));
    }

    /// The user-facing summary lines appended to the activity history.
    pub fn summary_lines(&self, contact: &ContactInfo) -> Vec<String> {
        vec![
            "✅ Resume received — starting TalentMatch-360 analysis...".to_string(),
            format!("📌 Domain: {} — ✅ JD Match: {}", self.domain(), self.jd_match()),
            format!(
                "🧾 Total Experience: {} — 🎯 Relevant: {}",
                self.total_experience(),
                self.relevant_experience()
            ),
            format!("💡 Matching Skills: {}", join_or_none(&self.matching_skills())),
            format!("❌ Missing Keywords: {}", join_or_none(&self.missing_keywords())),
            format!(
                "👍 Strengths: {} \n👎 Weaknesses: {}",
                self.strengths(),
                self.weaknesses()
            ),
            format!("🏢 Previous Companies: {}", join_or_none(&self.previous_companies())),
            format!("🧠 Profile Summary: {}", self.profile_summary()),
            contact.to_string(),
        ]
    }

    fn text(&self, key: &str) -> String {
        value_text(self.fields.get(key))
    }

    fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items.iter().map(|v| value_text(Some(v))).collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => {
                s.split(',').map(|part| part.trim().to_string()).filter(|p| !p.is_empty()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// The model's pick of the best resume in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    fields: JsonObject,
}

impl Ranking {
    pub fn new(fields: JsonObject) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    pub fn best_filename(&self) -> String {
        value_text(self.fields.get("BestResumeFilename"))
    }

    pub fn reason(&self) -> String {
        value_text(self.fields.get("Reason"))
    }
}

/// Join a list for display, `None` when empty.
pub fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
