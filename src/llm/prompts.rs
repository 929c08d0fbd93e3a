//! Prompt templates for analysis, ranking and follow-up questions

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            analysis: ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    /// Single resume against the job description, answered as one JSON object.
    pub fn render_analysis(&self, params: &PromptParams) -> String {
        substitute(
            &self.analysis,
            &[("{resume}", &params.resume_content), ("{job}", &params.job_content)],
        )
    }

    /// Ask for the single best resume given the per-resume analyses.
    pub fn render_ranking(&self, job: &str, analyses: &[serde_json::Value]) -> Result<String> {
        Ok(format!(
            "You are TalentMatch-360 ATS. Here is the job description:\n{}\n\n\
             Here are the analyses of multiple resumes:\n{}\n\n\
             From these, pick the SINGLE best resume (based ONLY on fit to JD, skills, and experience). \
             Return JSON with fields: {{ \"BestResumeFilename\": \"\", \"Reason\": \"\" }}",
            job,
            serde_json::to_string(analyses)?
        ))
    }

    /// Follow-up question answered from stored resume text and analysis.
    pub fn render_follow_up(
        &self,
        resume: &str,
        analysis: &serde_json::Value,
        question: &str,
    ) -> Result<String> {
        let context = json!({ "resume": resume, "analysis": analysis });
        Ok(format!(
            "You are TalentMatch-360 assistant. Use this resume text(s) and structured analysis as context:\n{}\n\n\
             User question: {}\nAnswer concisely.",
            serde_json::to_string(&context)?,
            question
        ))
    }
}

/// Replace each marker in one left-to-right pass; substituted text is never rescanned.
fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = vars
            .iter()
            .filter_map(|(marker, value)| rest.find(marker).map(|pos| (pos, *marker, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, marker, value)) => {
                output.push_str(&rest[..pos]);
                output.push_str(value);
                rest = &rest[pos + marker.len()..];
            }
            None => {
                output.push_str(rest);
                return output;
            }
        }
    }
}

const ANALYSIS_TEMPLATE: &str = r#"
You are TalentMatch-360 ATS. Compare RESUME to JOB DESCRIPTION and return ONLY valid JSON matching this schema:

{
  "Domain": "",
  "JD Match": "85%",
  "TotalExperience": "X years",
  "RelevantExperience": "Y years",
  "MatchingSkills": [],
  "MissingKeywords": [],
  "Strengths": "",
  "Weaknesses": "",
  "ProfileSummary": "",
  "PreviousCompanies": []
}

Resume:
{resume}

Job Description:
{job}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_rendering() {
        let templates = PromptTemplates::default();
        let params = PromptParams {
            resume_content: "Software Engineer with Python experience at Tech Corp.".to_string(),
            job_content: "Senior Software Engineer role requiring React and Python.".to_string(),
        };

        let prompt = templates.render_analysis(&params);

        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp"));
        assert!(prompt.contains("Senior Software Engineer role requiring React and Python"));
        assert!(prompt.contains("\"JD Match\": \"85%\""));
        assert!(prompt.contains("\"PreviousCompanies\": []"));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job}"));
    }

    #[test]
    fn test_resume_containing_placeholder_is_left_alone() {
        let templates = PromptTemplates::default();
        let params = PromptParams {
            resume_content: "I write templates like {job}".to_string(),
            job_content: "Templating engineer".to_string(),
        };

        let prompt = templates.render_analysis(&params);
        assert!(prompt.contains("I write templates like {job}"));
    }

    #[test]
    fn test_job_containing_placeholder_is_left_alone() {
        let templates = PromptTemplates::default();
        let params = PromptParams {
            resume_content: "SECRET RESUME BODY".to_string(),
            job_content: "Paste your {resume} here".to_string(),
        };

        let prompt = templates.render_analysis(&params);
        let job_section = prompt.split("Job Description:").nth(1).unwrap();
        assert_eq!(job_section, "\nPaste your {resume} here\n");
        assert_eq!(prompt.matches("SECRET RESUME BODY").count(), 1);
    }

    #[test]
    fn test_substitute_single_pass() {
        let out = substitute("{a}-{b}-{a}", &[("{a}", "{b}"), ("{b}", "x")]);
        assert_eq!(out, "{b}-x-{b}");
        assert_eq!(substitute("no markers", &[("{a}", "x")]), "no markers");
    }

    #[test]
    fn test_ranking_prompt_embeds_analyses() {
        let templates = PromptTemplates::default();
        let analyses = vec![json!({"Filename": "a.pdf", "JD Match": "70%"})];

        let prompt = templates.render_ranking("Rust engineer", &analyses).unwrap();
        assert!(prompt.contains("Rust engineer"));
        assert!(prompt.contains(r#"[{"Filename":"a.pdf","JD Match":"70%"}]"#));
        assert!(prompt.contains(r#"{ "BestResumeFilename": "", "Reason": "" }"#));
    }

    #[test]
    fn test_follow_up_prompt() {
        let templates = PromptTemplates::default();
        let prompt = templates
            .render_follow_up("resume text", &json!({"Domain": "Software"}), "Any Kafka?")
            .unwrap();

        assert!(prompt.contains(r#"{"resume":"resume text","analysis":{"Domain":"Software"}}"#));
        assert!(prompt.ends_with("User question: Any Kafka?\nAnswer concisely."));
    }
}
