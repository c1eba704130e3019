//! Input checks applied before any store operation

use serde::{Deserialize, Serialize};

use super::Category;
use crate::error::{HelpdeskError, Result};

/// Length limits for submitted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub description_min_chars: usize,
    pub description_max_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            description_min_chars: 10,
            description_max_chars: 1000,
        }
    }
}

/// A ticket submission as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub category: Category,
    pub description: String,
    pub attachment_url: Option<String>,
}

impl NewTicket {
    #[must_use]
    pub fn new(category: Category, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
            attachment_url: None,
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }

    /// Validate and normalize the submission
    pub fn validate(mut self, rules: &ValidationRules) -> Result<Self> {
        validate_description(&self.description, rules)?;
        self.attachment_url = normalize_attachment(self.attachment_url)?;
        Ok(self)
    }
}

/// Check the description is present and within the configured length
pub fn validate_description(description: &str, rules: &ValidationRules) -> Result<()> {
    if description.trim().is_empty() {
        return Err(HelpdeskError::validation(
            "description",
            "Description is required",
        ));
    }
    let len = description.chars().count();
    if len < rules.description_min_chars {
        return Err(HelpdeskError::validation(
            "description",
            format!(
                "Description must be at least {} characters",
                rules.description_min_chars
            ),
        ));
    }
    if len > rules.description_max_chars {
        return Err(HelpdeskError::validation(
            "description",
            format!(
                "Description must be at most {} characters",
                rules.description_max_chars
            ),
        ));
    }
    Ok(())
}

/// Check a support answer is not blank
pub fn validate_response(response: &str) -> Result<()> {
    if response.trim().is_empty() {
        return Err(HelpdeskError::validation("response", "Response is required"));
    }
    Ok(())
}

/// Drop blank attachments and require an http(s) URL otherwise
pub fn normalize_attachment(url: Option<String>) -> Result<Option<String>> {
    match url.map(|u| u.trim().to_string()) {
        None => Ok(None),
        Some(u) if u.is_empty() => Ok(None),
        Some(u) if u.starts_with("https://") || u.starts_with("http://") => Ok(Some(u)),
        Some(u) => Err(HelpdeskError::validation(
            "attachment",
            format!("'{u}' is not an http(s) URL"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_bounds() {
        let rules = ValidationRules::default();
        assert!(validate_description("short", &rules).is_err());
        assert!(validate_description("exactly10!", &rules).is_ok());
        assert!(validate_description(&"x".repeat(1000), &rules).is_ok());
        assert!(validate_description(&"x".repeat(1001), &rules).is_err());
        assert!(validate_description("          ", &rules).is_err());
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        let rules = ValidationRules::default();
        // 10 characters, 30 bytes
        assert!(validate_description("日本語のチケット説明", &rules).is_ok());
    }

    #[test]
    fn test_attachment_normalization() {
        assert_eq!(normalize_attachment(None).unwrap(), None);
        assert_eq!(normalize_attachment(Some(String::new())).unwrap(), None);
        assert_eq!(
            normalize_attachment(Some(" https://cdn.example.com/a.png ".into())).unwrap(),
            Some("https://cdn.example.com/a.png".to_string())
        );
        assert!(normalize_attachment(Some("ftp://example.com/a".into())).is_err());
    }

    #[test]
    fn test_new_ticket_validation() {
        let rules = ValidationRules::default();
        let ok = NewTicket::new(
            Category::TechnicalSupport,
            "My login is broken and I cannot access my account",
        )
        .with_attachment("")
        .validate(&rules)
        .unwrap();
        assert!(ok.attachment_url.is_none());

        let err = NewTicket::new(Category::Other, "help!")
            .validate(&rules)
            .unwrap_err();
        assert!(matches!(err, HelpdeskError::Validation { field: "description", .. }));
    }
}
