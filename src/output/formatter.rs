//! Output formatters: console, JSON, markdown and HTML

use crate::analysis::ResumeAnalysis;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{analysis_rows, Report, ReportBody};
use crate::session::Role;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and emoji labels
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing results
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with inline styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 0 auto; padding: 20px; color: #333; background: #f8f9fa; }
        .card { background: white; padding: 20px 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); margin-bottom: 20px; }
        h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 8px; }
        .badge { display: inline-block; padding: 4px 12px; border-radius: 12px; color: white; background: #17a2b8; margin-left: 8px; font-size: 0.8em; }
        th { text-align: left; padding-right: 16px; vertical-align: top; color: #495057; }
        .metadata { font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <h1>{{ title }}</h1>
    <p class="metadata">Generated: {{ generated_at }} | Model: {{ model }} | Processing time: {{ processing_time }}ms</p>
    {% for section in sections %}
    <div class="card">
        <h2>{{ section.heading }}{% if section.has_badge %}<span class="badge">{{ section.badge }}</span>{% endif %}</h2>
        <table>
        {% for row in section.rows %}
            <tr><th>{{ row.label }}</th><td>{{ row.value }}</td></tr>
        {% endfor %}
        </table>
    </div>
    {% endfor %}
    <p class="metadata">talentmatch v{{ version }}</p>
</body>
</html>"#
)]
struct HtmlTemplate {
    include_styles: bool,
    title: String,
    generated_at: String,
    model: String,
    processing_time: u64,
    version: String,
    sections: Vec<HtmlSection>,
}

struct HtmlSection {
    heading: String,
    badge: String,
    has_badge: bool,
    rows: Vec<HtmlRow>,
}

struct HtmlRow {
    label: String,
    value: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: Option<f32>) -> String {
        let Some(score) = score else {
            return String::new();
        };
        let (badge, color) = match score.round().clamp(0.0, 100.0) as i64 {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!(" [{}]", badge.color(color).bold())
        } else {
            format!(" [{}]", badge)
        }
    }

    fn format_analysis(&self, analysis: &ResumeAnalysis) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "📌 Domain: {}\n✅ JD Match: {}{}\n",
            self.colorize(&analysis.domain(), Color::Cyan),
            analysis.jd_match(),
            self.format_score_badge(analysis.match_percentage())
        ));
        output.push_str(&format!(
            "🧾 Total Experience: {} — 🎯 Relevant: {}\n",
            analysis.total_experience(),
            analysis.relevant_experience()
        ));
        output.push_str(&format!(
            "💡 Matching Skills: {}\n",
            self.colorize(&crate::analysis::join_or_none(&analysis.matching_skills()), Color::Green)
        ));
        output.push_str(&format!(
            "❌ Missing Keywords: {}\n",
            self.colorize(&crate::analysis::join_or_none(&analysis.missing_keywords()), Color::Red)
        ));
        output.push_str(&format!("👍 Strengths: {}\n", analysis.strengths()));
        output.push_str(&format!("👎 Weaknesses: {}\n", analysis.weaknesses()));
        output.push_str(&format!(
            "🏢 Previous Companies: {}\n",
            crate::analysis::join_or_none(&analysis.previous_companies())
        ));
        output.push_str(&format!("🧠 Profile Summary: {}\n", analysis.profile_summary()));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("📊 {}", report.title()), 1));
        output.push_str(&format!(
            "Generated: {} | Model: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.model,
            report.metadata.processing_time_ms
        ));

        match &report.body {
            ReportBody::Single { filename, analysis, contact } => {
                output.push_str(&self.format_header(filename, 2));
                output.push_str(&self.format_analysis(analysis));
                output.push_str(&format!("{}\n", contact));
            }
            ReportBody::Batch { analyses, best_resume } => {
                for analysis in analyses {
                    output.push_str(&self.format_header(analysis.filename().unwrap_or("Unknown"), 2));
                    output.push_str(&self.format_analysis(analysis));
                }
                output.push_str(&self.format_header("Best resume", 2));
                output.push_str(&format!(
                    "🏆 {}\n{}\n",
                    self.colorize(&best_resume.best_filename(), Color::Green),
                    best_resume.reason()
                ));
            }
            ReportBody::Transcript { entries } => {
                if entries.is_empty() {
                    output.push_str("No activity yet. Upload a resume and run analysis.\n");
                }
                for entry in entries {
                    let speaker = match entry.role {
                        Role::User => self.colorize("You:", Color::Cyan),
                        Role::Bot => self.colorize("Bot:", Color::Magenta),
                    };
                    output.push_str(&format!("{} {}\n", speaker, entry.text));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn analysis_table(analysis: &ResumeAnalysis) -> String {
        let mut output = String::from("| Field | Value |\n|---|---|\n");
        for (label, value) in analysis_rows(analysis) {
            output.push_str(&format!("| {} | {} |\n", label, escape_cell(&value)));
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_metadata {
            output.push_str(&format!(
                "_Generated: {} · Model: {} · Processing time: {}ms_\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.model,
                report.metadata.processing_time_ms
            ));
        }

        match &report.body {
            ReportBody::Single { filename, analysis, contact } => {
                output.push_str(&format!("## {}\n\n", filename));
                output.push_str(&Self::analysis_table(analysis));
                output.push_str(&format!(
                    "\n**Email:** {} · **Phone:** {}\n",
                    contact.email_or_default(),
                    contact.phone_or_default()
                ));
            }
            ReportBody::Batch { analyses, best_resume } => {
                for analysis in analyses {
                    output.push_str(&format!("## {}\n\n", analysis.filename().unwrap_or("Unknown")));
                    output.push_str(&Self::analysis_table(analysis));
                    output.push('\n');
                }
                output.push_str("## Best resume\n\n");
                output.push_str(&format!(
                    "**{}**: {}\n",
                    best_resume.best_filename(),
                    best_resume.reason()
                ));
            }
            ReportBody::Transcript { entries } => {
                for entry in entries {
                    let speaker = match entry.role {
                        Role::User => "You",
                        Role::Bot => "Bot",
                    };
                    output.push_str(&format!("**{}:** {}\n\n", speaker, entry.text));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn analysis_section(heading: &str, analysis: &ResumeAnalysis) -> HtmlSection {
        let badge = analysis.jd_match();
        HtmlSection {
            heading: heading.to_string(),
            has_badge: badge != "N/A",
            badge,
            rows: analysis_rows(analysis)
                .into_iter()
                .map(|(label, value)| HtmlRow {
                    label: label.to_string(),
                    value,
                })
                .collect(),
        }
    }

    fn create_template_data(&self, report: &Report) -> HtmlTemplate {
        let sections = match &report.body {
            ReportBody::Single { filename, analysis, contact } => {
                let mut section = Self::analysis_section(filename, analysis);
                section.rows.push(HtmlRow {
                    label: "Email".to_string(),
                    value: contact.email_or_default().to_string(),
                });
                section.rows.push(HtmlRow {
                    label: "Phone".to_string(),
                    value: contact.phone_or_default().to_string(),
                });
                vec![section]
            }
            ReportBody::Batch { analyses, best_resume } => {
                let mut sections: Vec<HtmlSection> = analyses
                    .iter()
                    .map(|a| Self::analysis_section(a.filename().unwrap_or("Unknown"), a))
                    .collect();
                sections.push(HtmlSection {
                    heading: "Best resume".to_string(),
                    badge: String::new(),
                    has_badge: false,
                    rows: vec![
                        HtmlRow {
                            label: "File".to_string(),
                            value: best_resume.best_filename(),
                        },
                        HtmlRow {
                            label: "Reason".to_string(),
                            value: best_resume.reason(),
                        },
                    ],
                });
                sections
            }
            ReportBody::Transcript { entries } => vec![HtmlSection {
                heading: "Activity".to_string(),
                badge: String::new(),
                has_badge: false,
                rows: entries
                    .iter()
                    .map(|entry| HtmlRow {
                        label: match entry.role {
                            Role::User => "You".to_string(),
                            Role::Bot => "Bot".to_string(),
                        },
                        value: entry.text.clone(),
                    })
                    .collect(),
            }],
        };

        HtmlTemplate {
            include_styles: self.include_styles,
            title: report.title().to_string(),
            generated_at: report
                .metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            model: report.metadata.model.clone(),
            processing_time: report.metadata.processing_time_ms,
            version: report.metadata.version.clone(),
            sections,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(self.create_template_data(report).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', "<br>")
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Ranking;
    use crate::contact::ContactInfo;
    use crate::output::report::ReportMetadata;
    use serde_json::{json, Value};

    fn object(value: Value) -> crate::extract::JsonObject {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn single_report() -> Report {
        Report {
            metadata: ReportMetadata::new("gemini-1.5-pro-latest", 42),
            body: ReportBody::Single {
                filename: "jane.pdf".to_string(),
                analysis: ResumeAnalysis::new(object(json!({
                    "Domain": "Software",
                    "JD Match": "85%",
                    "MatchingSkills": ["Python", "SQL"],
                    "Strengths": "APIs | tooling <fast>"
                }))),
                contact: ContactInfo {
                    email: Some("jane@example.com".to_string()),
                    phone: None,
                },
            },
        }
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&single_report()).unwrap();

        assert!(output.contains("📌 Domain: Software"));
        assert!(output.contains("✅ JD Match: 85% [VERY GOOD]"));
        assert!(output.contains("💡 Matching Skills: Python, SQL"));
        assert!(output.contains("❌ Missing Keywords: None"));
        assert!(output.contains("📧 Email: jane@example.com | 📱 Phone: Not found"));
    }

    #[test]
    fn test_score_badge_bounds() {
        let formatter = ConsoleFormatter::new(false);
        assert_eq!(formatter.format_score_badge(Some(120.0)), " [EXCELLENT]");
        assert_eq!(formatter.format_score_badge(Some(100.0)), " [EXCELLENT]");
        assert_eq!(formatter.format_score_badge(Some(59.6)), " [FAIR]");
        assert_eq!(formatter.format_score_badge(Some(-5.0)), " [POOR]");
        assert_eq!(formatter.format_score_badge(None), "");
    }

    #[test]
    fn test_json_round_trips_fields() {
        let output = JsonFormatter::new(false).format_report(&single_report()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["body"]["analysis"]["MatchingSkills"], json!(["Python", "SQL"]));
    }

    #[test]
    fn test_markdown_escapes_table_cells() {
        let output = MarkdownFormatter::new(false).format_report(&single_report()).unwrap();
        assert!(output.starts_with("# TalentMatch-360 Resume Analysis\n\n## jane.pdf"));
        assert!(output.contains("| Strengths | APIs \\| tooling <fast> |"));
        assert!(output.contains("**Phone:** Not found"));
    }

    #[test]
    fn test_html_is_escaped() {
        let output = HtmlFormatter::new(false).format_report(&single_report()).unwrap();
        assert!(output.contains("<title>TalentMatch-360 Resume Analysis</title>"));
        assert!(output.contains("tooling &#60;fast&#62;") || output.contains("tooling &lt;fast&gt;"));
        assert!(!output.contains("<style>"));
        assert!(output.contains("<span class=\"badge\">85%</span>"));
    }

    #[test]
    fn test_batch_markdown_names_best_resume() {
        let report = Report {
            metadata: ReportMetadata::new("m", 0),
            body: ReportBody::Batch {
                analyses: vec![ResumeAnalysis::new(object(json!({"Filename": "a.pdf"})))],
                best_resume: Ranking::new(object(json!({
                    "BestResumeFilename": "a.pdf",
                    "Reason": "Only one"
                }))),
            },
        };
        let output = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains("## a.pdf"));
        assert!(output.contains("**a.pdf**: Only one"));
    }

    #[test]
    fn test_empty_transcript_on_console() {
        let report = Report {
            metadata: ReportMetadata::new("m", 0),
            body: ReportBody::Transcript { entries: vec![] },
        };
        let output = ConsoleFormatter::new(false).format_report(&report).unwrap();
        assert!(output.contains("No activity yet."));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "cv/jane.pdf", false),
            "jane_analysis.md"
        );
        assert!(suggest_filename(&OutputFormat::Html, "jane.pdf", true).ends_with(".html"));
    }

    #[test]
    fn test_save_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
