//! Contact details pulled from raw resume text

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const NOT_FOUND: &str = "Not found";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn email_or_default(&self) -> &str {
        self.email.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn phone_or_default(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_FOUND)
    }
}

impl fmt::Display for ContactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "📧 Email: {} | 📱 Phone: {}",
            self.email_or_default(),
            self.phone_or_default()
        )
    }
}

pub struct ContactExtractor {
    email_regex: Regex,
    phone_regex: Regex,
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactExtractor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("Invalid email regex");

        // Optional +91 country prefix followed by a ten digit number
        let phone_regex = Regex::new(r"(\+91[-\s]?)?\b\d{10}\b")
            .expect("Invalid phone regex");

        Self {
            email_regex,
            phone_regex,
        }
    }

    /// First email address and phone number found in `text`
    pub fn extract(&self, text: &str) -> ContactInfo {
        ContactInfo {
            email: self.email_regex.find(text).map(|m| m.as_str().to_string()),
            phone: self.phone_regex.find(text).map(|m| m.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_email_and_phone() {
        let extractor = ContactExtractor::new();
        let text = "Jane Roe\njane.roe+jobs@example.co.in\nMobile: 9876543210\nBangalore";

        let info = extractor.extract(text);
        assert_eq!(info.email.as_deref(), Some("jane.roe+jobs@example.co.in"));
        assert_eq!(info.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_phone_with_country_prefix() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Call +91-9876543210 anytime");
        assert_eq!(info.phone.as_deref(), Some("+91-9876543210"));

        let info = extractor.extract("Call +91 9876543210 anytime");
        assert_eq!(info.phone.as_deref(), Some("+91 9876543210"));
    }

    #[test]
    fn test_longer_digit_runs_are_not_phones() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("Order id 123456789012 and zip 560001");
        assert_eq!(info.phone, None);
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = ContactExtractor::new();
        let info = extractor.extract("a@b.io then c@d.io");
        assert_eq!(info.email.as_deref(), Some("a@b.io"));
    }

    #[test]
    fn test_missing_fields_display_not_found() {
        let info = ContactExtractor::new().extract("No contact details here");
        assert_eq!(info, ContactInfo::default());
        assert_eq!(info.to_string(), "📧 Email: Not found | 📱 Phone: Not found");
    }
}
