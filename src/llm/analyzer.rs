//! Resume analysis driven by a hosted model

use crate::analysis::{Ranking, ResumeAnalysis};
use crate::config::Config;
use crate::contact::{ContactExtractor, ContactInfo};
use crate::error::{Result, TalentMatchError};
use crate::extract::extract;
use crate::input::ResumeDocument;
use crate::llm::client::ModelClient;
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Result of analysing one resume.
#[derive(Debug, Clone)]
pub struct SingleOutcome {
    pub filename: String,
    pub analysis: ResumeAnalysis,
    pub contact: ContactInfo,
    pub processing_time_ms: u64,
}

/// Result of analysing a batch of resumes and ranking them.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub analyses: Vec<ResumeAnalysis>,
    pub ranking: Ranking,
    pub processing_time_ms: u64,
}

pub struct ResumeAnalyzer<C: ModelClient> {
    client: C,
    prompt_templates: PromptTemplates,
    contacts: ContactExtractor,
    max_resumes: usize,
}

impl<C: ModelClient> ResumeAnalyzer<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            prompt_templates: PromptTemplates::default(),
            contacts: ContactExtractor::new(),
            max_resumes: config.analysis.max_resumes,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Analyse one resume against the job description.
    ///
    /// The resume text is stored in the session before the model is called so that
    /// follow-up questions can still refer to it if the analysis fails. An unparseable
    /// reply is kept in `last_raw_response`.
    pub async fn analyze_single(
        &self,
        session: &mut Session,
        resume: &ResumeDocument,
        job: &str,
    ) -> Result<SingleOutcome> {
        let start_time = Instant::now();
        require_job(job)?;

        session.resume_text = resume.text.clone();
        let contact = self.contacts.extract(&resume.text);

        let prompt = self.prompt_templates.render_analysis(&PromptParams {
            resume_content: resume.text.clone(),
            job_content: job.to_string(),
        });

        info!("Analysing {} with {}", resume.filename, self.client.model_name());
        let raw = self.client.generate(&prompt).await?;
        let analysis = ResumeAnalysis::new(self.parse_mapping(session, raw)?);

        session.last_analysis = Some(analysis.clone());
        for line in analysis.summary_lines(&contact) {
            session.push_bot(line);
        }

        Ok(SingleOutcome {
            filename: resume.filename.clone(),
            analysis,
            contact,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Analyse several resumes one by one, then ask the model to pick the best.
    ///
    /// The first failure aborts the batch and leaves the previous batch untouched.
    /// Once every resume is analysed the batch is stored, even if ranking then fails.
    pub async fn analyze_many(
        &self,
        session: &mut Session,
        resumes: &[ResumeDocument],
        job: &str,
    ) -> Result<BatchOutcome> {
        let start_time = Instant::now();
        require_job(job)?;

        if resumes.is_empty() {
            return Err(TalentMatchError::InvalidInput(
                "Please provide Job Description and upload resumes.".to_string(),
            ));
        }
        if resumes.len() > self.max_resumes {
            return Err(TalentMatchError::InvalidInput(format!(
                "You can upload a maximum of {} resumes at a time.",
                self.max_resumes
            )));
        }

        let mut analyses = Vec::with_capacity(resumes.len());
        for resume in resumes {
            let prompt = self.prompt_templates.render_analysis(&PromptParams {
                resume_content: resume.text.clone(),
                job_content: job.to_string(),
            });

            info!("Analysing {} ({}/{})", resume.filename, analyses.len() + 1, resumes.len());
            let raw = self.client.generate(&prompt).await.map_err(|e| {
                error!("Model call failed for {}: {}", resume.filename, e);
                e
            })?;
            let fields = self.parse_mapping(session, raw).map_err(|e| {
                error!("Could not parse JSON from {}. Stored raw in session.", resume.filename);
                e
            })?;

            let mut analysis = ResumeAnalysis::new(fields);
            analysis.set_filename(&resume.filename);
            analyses.push(analysis);
        }

        session.multi_analyses = analyses.clone();
        session.multi_resume_texts = resumes.iter().map(|r| r.text.clone()).collect();

        let ranking = self.rank(session, &analyses, job).await?;
        session.best_resume = Some(ranking.clone());
        session.push_bot(format!(
            "✅ Multi-resume analysis done. Best resume: {}",
            ranking.best_filename()
        ));

        Ok(BatchOutcome {
            analyses,
            ranking,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn rank(&self, session: &mut Session, analyses: &[ResumeAnalysis], job: &str) -> Result<Ranking> {
        let payload: Vec<serde_json::Value> = analyses
            .iter()
            .map(|a| serde_json::Value::Object(a.fields().clone()))
            .collect();
        let prompt = self.prompt_templates.render_ranking(job, &payload)?;

        let raw = match self.client.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error ranking resumes: {}", e);
                return Err(ranking_failed());
            }
        };

        match self.parse_mapping(session, raw) {
            Ok(fields) => Ok(Ranking::new(fields)),
            Err(_) => Err(ranking_failed()),
        }
    }

    /// Answer a follow-up question from the stored session context.
    ///
    /// Model failures are reported in-band as the bot's reply.
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TalentMatchError::InvalidInput("Type a question first.".to_string()));
        }
        if !session.has_context() {
            warn!("Follow-up question asked before any analysis");
        }

        session.push_user(question);
        let prompt = self.prompt_templates.render_follow_up(
            &session.context_resume(),
            &session.context_analysis(),
            question,
        )?;

        let reply = match self.client.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => format!("Error calling Gemini: {}", e),
        };
        session.push_bot(reply.clone());
        Ok(reply)
    }

    /// Like [`Self::parse_reply`], but an empty `{}` counts as a failed reply.
    fn parse_mapping(&self, session: &mut Session, raw: String) -> Result<crate::extract::JsonObject> {
        let fields = self.parse_reply(session, raw.clone())?;
        if fields.is_empty() {
            warn!("Model reply held an empty JSON object");
            session.last_raw_response = Some(raw);
            return Err(TalentMatchError::AnalysisFailed(
                "Could not parse JSON from model response: empty object".to_string(),
            ));
        }
        Ok(fields)
    }

    fn parse_reply(&self, session: &mut Session, raw: String) -> Result<crate::extract::JsonObject> {
        match extract(&raw) {
            Ok(fields) => {
                debug!("Extracted {} fields from model reply", fields.len());
                Ok(fields)
            }
            Err(source) => {
                warn!("{} while parsing model reply", source.kind());
                session.last_raw_response = Some(raw.clone());
                Err(TalentMatchError::Extraction { source, raw })
            }
        }
    }
}

fn require_job(job: &str) -> Result<()> {
    if job.trim().is_empty() {
        return Err(TalentMatchError::InvalidInput(
            "Please provide Job Description".to_string(),
        ));
    }
    Ok(())
}

fn ranking_failed() -> TalentMatchError {
    TalentMatchError::AnalysisFailed("Could not parse ranking from model.".to_string())
}
