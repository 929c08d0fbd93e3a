//! Report model and output formatters

pub mod report;
pub mod formatter;

pub use formatter::{save_report_to_file, suggest_filename, ReportGenerator};
pub use report::{Report, ReportBody};
