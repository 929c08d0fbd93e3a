//! CLI interface for talentmatch

use crate::input::JobSource;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "talentmatch")]
#[command(about = "Match resumes against a job description with a hosted LLM")]
#[command(long_about = "Extract resume text, ask the model for a structured ATS-style comparison, recover its JSON reply, and answer follow-up questions about the result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Job description given either as a file or inline.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct JobArgs {
    /// Path to job description file (TXT, MD, PDF)
    #[arg(short, long)]
    pub jd: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub jd_text: Option<String>,
}

impl JobArgs {
    pub fn source(&self) -> JobSource {
        match (&self.jd, &self.jd_text) {
            (Some(path), _) => JobSource::File(path.clone()),
            (None, Some(text)) => JobSource::Inline(text.clone()),
            (None, None) => JobSource::Inline(String::new()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Analyze several resumes and pick the best one
    Compare {
        /// Paths to resume files (PDF, TXT, MD)
        #[arg(short, long, num_args = 1.., required = true)]
        resume: Vec<PathBuf>,

        #[command(flatten)]
        job: JobArgs,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Analyze, then ask follow-up questions interactively
    Chat {
        /// One or more resume files
        #[arg(short, long, num_args = 1.., required = true)]
        resume: Vec<PathBuf>,

        #[command(flatten)]
        job: JobArgs,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Recover a JSON object from a saved model response
    Extract {
        /// File holding the raw response (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Match braces by depth instead of first `{` to last `}`
        #[arg(long)]
        balanced: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("html"), Ok(OutputFormat::Html));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_compare_accepts_multiple_resumes() {
        let cli = Cli::parse_from([
            "talentmatch", "compare", "-r", "a.pdf", "b.pdf", "--jd-text", "Rust role",
        ]);
        match cli.command {
            Commands::Compare { resume, job, .. } => {
                assert_eq!(resume.len(), 2);
                assert_eq!(job.source(), JobSource::Inline("Rust role".to_string()));
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_job_description_is_required() {
        assert!(Cli::try_parse_from(["talentmatch", "analyze", "-r", "a.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "talentmatch", "analyze", "-r", "a.pdf", "--jd", "jd.txt", "--jd-text", "x",
        ])
        .is_err());
    }
}
