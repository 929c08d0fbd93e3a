//! talentmatch: resume to job description matching with a hosted LLM

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use talentmatch::cli::{self, Cli, Commands, ConfigAction, JobArgs};
use talentmatch::config::{Config, OutputFormat};
use talentmatch::input::loader::truncate_text;
use talentmatch::input::{DocumentLoader, ResumeDocument};
use talentmatch::llm::{GeminiClient, ModelClient, ResumeAnalyzer};
use talentmatch::output::{save_report_to_file, suggest_filename, Report, ReportGenerator};
use talentmatch::{extract_with, Result, Session, SpanMode, TalentMatchError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        if let Some(raw) = e.raw_response() {
            eprintln!("\n--- Raw model response ---\n{}\n--------------------------", raw);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            model,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let mut loader = DocumentLoader::new();

            println!("📄 Resume: {}", resume.display());
            let resume = loader.load_resume(&resume).await?;
            let jd = loader.load_job(&job.source()).await?;
            println!("📊 Resume text: {} characters | Job description: {} characters", resume.text.len(), jd.len());
            debug!("Resume preview: {}", truncate_text(&resume.text, 300));
            debug!("Job description preview: {}", truncate_text(&jd, 300));

            let analyzer = build_analyzer(&config, model)?;
            let mut session = Session::new();

            let spinner = spinner(&format!("Calling {} for analysis...", analyzer.client().model_name()));
            let outcome = analyzer.analyze_single(&mut session, &resume, &jd).await;
            spinner.finish_and_clear();
            let outcome = outcome?;

            let report = Report::single(&outcome, analyzer.client().model_name());
            emit_report(&report, &format, &config, save, &outcome.filename)?;
            println!("✅ Analysis complete.");
        }

        Commands::Compare {
            resume,
            job,
            model,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            if resume.len() > config.analysis.max_resumes {
                return Err(TalentMatchError::InvalidInput(format!(
                    "You can upload a maximum of {} resumes at a time.",
                    config.analysis.max_resumes
                )));
            }

            let (resumes, jd) = load_inputs(&resume, &job).await?;
            let analyzer = build_analyzer(&config, model)?;
            let mut session = Session::new();

            let spinner = spinner("Analyzing resumes (one by one)...");
            let outcome = analyzer.analyze_many(&mut session, &resumes, &jd).await;
            spinner.finish_and_clear();
            let outcome = outcome?;

            let report = Report::batch(&outcome, analyzer.client().model_name());
            emit_report(&report, &format, &config, save, "comparison")?;
            println!("✅ Multi-resume analysis complete. Best resume: {}", outcome.ranking.best_filename());
        }

        Commands::Chat { resume, job, model } => {
            let (resumes, jd) = load_inputs(&resume, &job).await?;
            let analyzer = build_analyzer(&config, model)?;
            let generator = report_generator(&config);
            let model_name = analyzer.client().model_name().to_string();
            let mut session = Session::new();

            let spinner = spinner(&format!("Calling {} for analysis...", model_name));
            let report = if resumes.len() == 1 {
                let outcome = analyzer.analyze_single(&mut session, &resumes[0], &jd).await;
                spinner.finish_and_clear();
                Report::single(&outcome?, &model_name)
            } else {
                let outcome = analyzer.analyze_many(&mut session, &resumes, &jd).await;
                spinner.finish_and_clear();
                Report::batch(&outcome?, &model_name)
            };
            print!("{}", generator.generate_report(&report, &OutputFormat::Console)?);

            chat_loop(&analyzer, &generator, &mut session, &config).await?;
        }

        Commands::Extract { input, balanced } => {
            let text = match &input {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let mut text = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut text)
                        .await
                        .context("Failed to read model response from stdin")?;
                    text
                }
            };

            let mode = if balanced { SpanMode::Balanced } else { SpanMode::Greedy };
            match extract_with(&text, mode) {
                Ok(object) => {
                    println!("{}", serde_json::to_string_pretty(&object)?);
                }
                Err(e) => {
                    eprintln!("❌ {}: {}", e.kind(), e);
                    return Err(e.into());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| TalentMatchError::Configuration(e.to_string()))?;
                println!("{}", content);
                let key_status = if config.api_key().is_ok() { "set" } else { "missing" };
                println!("API key ({}): {}", config.llm.api_key_env, key_status);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

async fn chat_loop<C: ModelClient>(
    analyzer: &ResumeAnalyzer<C>,
    generator: &ReportGenerator,
    session: &mut Session,
    config: &Config,
) -> Result<()> {
    println!("\n💬 Ask follow-up questions. Commands: /history, /clear, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                let report = Report::transcript(session, config.analysis.history_limit, analyzer.client().model_name());
                print!("{}", generator.generate_report(&report, &OutputFormat::Console)?);
            }
            "/clear" => {
                session.clear();
                println!("🧹 Session cleared.");
            }
            question => {
                let spinner = spinner("Querying model...");
                let reply = analyzer.ask(session, question).await;
                spinner.finish_and_clear();
                println!("Bot: {}", reply?);
            }
        }
    }

    info!("Chat ended after {} history entries", session.history.len());
    Ok(())
}

fn build_analyzer(config: &Config, model: Option<String>) -> Result<ResumeAnalyzer<GeminiClient>> {
    let api_key = config.api_key()?;
    let mut client = GeminiClient::new(&config.llm, api_key)?;
    if let Some(model) = model {
        client = client.with_model(model);
    }
    Ok(ResumeAnalyzer::new(client, config))
}

async fn load_inputs(paths: &[PathBuf], job: &JobArgs) -> Result<(Vec<ResumeDocument>, String)> {
    let mut loader = DocumentLoader::new();
    let jd = loader.load_job(&job.source()).await?;

    let mut resumes = Vec::with_capacity(paths.len());
    for path in paths {
        println!("📄 Processing resume: {}", path.display());
        resumes.push(loader.load_resume(path).await?);
    }
    Ok((resumes, jd))
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(TalentMatchError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn report_generator(config: &Config) -> ReportGenerator {
    ReportGenerator::with_options(config.output.color_output, config.output.pretty_json, true, true)
}

fn emit_report(
    report: &Report,
    format: &OutputFormat,
    config: &Config,
    save: Option<PathBuf>,
    stem: &str,
) -> Result<()> {
    let generator = report_generator(config);
    let rendered = generator.generate_report(report, format)?;

    match save {
        Some(path) => {
            // A directory target gets a generated file name
            let path = if path.is_dir() {
                path.join(suggest_filename(format, stem, true))
            } else {
                path
            };
            save_report_to_file(&rendered, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
