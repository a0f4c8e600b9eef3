use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of personalized outreach emails generated per profile.
pub const EMAIL_SEQUENCE_LEN: usize = 7;

/// What was recovered from the most recent position on a profile page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Plain-text job description, `None` when the page carries no recognizable description.
    pub description: Option<String>,
    /// Skill tags read from the skills modal, empty when they could not be collected.
    pub technical_skills: Vec<String>,
}

impl ExtractionResult {
    /// The result reported when nothing could be recovered.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Bounded waits used while driving the skills modal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// How long to wait for the skills "see details" link to appear.
    pub see_details_timeout_ms: u64,
    /// How long to wait for the first skill label inside the modal.
    pub skills_timeout_ms: u64,
    /// How long to wait for the modal's dismiss button.
    pub dismiss_timeout_ms: u64,
    /// Pause after closing the modal so the page can settle.
    pub settle_delay_ms: u64,
}

impl Default for ExtractorConfig {
    /// Default configuration: 10s to find the link and the skills, 5s for the dismiss button, 500ms settle.
    fn default() -> Self {
        Self {
            see_details_timeout_ms: 10_000,
            skills_timeout_ms: 10_000,
            dismiss_timeout_ms: 5_000,
            settle_delay_ms: 500,
        }
    }
}

impl ExtractorConfig {
    /// Builds a configuration from the environment, loading a `.env` file first if present.
    ///
    /// Recognized variables:
    /// - `LINKEDIN_SEE_DETAILS_TIMEOUT_MS`
    /// - `LINKEDIN_SKILLS_TIMEOUT_MS`
    /// - `LINKEDIN_DISMISS_TIMEOUT_MS`
    /// - `LINKEDIN_SETTLE_DELAY_MS`
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> crate::error::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ExtractorConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> crate::error::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        use crate::error::ExtractError;

        let read = |key: &str, default: u64| -> crate::error::Result<u64> {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    ExtractError::ParsingError(format!("{} must be milliseconds, got {:?}", key, raw))
                }),
                None => Ok(default),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            see_details_timeout_ms: read(
                "LINKEDIN_SEE_DETAILS_TIMEOUT_MS",
                defaults.see_details_timeout_ms,
            )?,
            skills_timeout_ms: read("LINKEDIN_SKILLS_TIMEOUT_MS", defaults.skills_timeout_ms)?,
            dismiss_timeout_ms: read("LINKEDIN_DISMISS_TIMEOUT_MS", defaults.dismiss_timeout_ms)?,
            settle_delay_ms: read("LINKEDIN_SETTLE_DELAY_MS", defaults.settle_delay_ms)?,
        })
    }

    pub fn see_details_timeout(&self) -> Duration {
        Duration::from_millis(self.see_details_timeout_ms)
    }

    pub fn skills_timeout(&self) -> Duration {
        Duration::from_millis(self.skills_timeout_ms)
    }

    pub fn dismiss_timeout(&self) -> Duration {
        Duration::from_millis(self.dismiss_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// A prospect row as it arrives from the CSV export.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub company_name: String,
}

/// The document stored for each processed profile.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub company_name: String,
    /// The canonical profile URL, `None` when it could not be resolved.
    pub linkedin_url: Option<String>,
    /// Scraped (or later generated) description of the latest position.
    pub latest_job_description: Option<String>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    /// Outreach emails in sequence order, at most [`EMAIL_SEQUENCE_LEN`].
    #[serde(default)]
    pub generated_emails: Vec<String>,
    pub processed_at: DateTime<Utc>,
    /// Why the profile could not be processed, if it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileRecord {
    /// Builds the record for a profile that was scraped.
    pub fn from_extraction(contact: Contact, linkedin_url: &str, result: ExtractionResult) -> Self {
        Self {
            first_name: contact.first_name,
            last_name: contact.last_name,
            job_title: contact.job_title,
            company_name: contact.company_name,
            linkedin_url: Some(linkedin_url.to_string()),
            latest_job_description: result.description,
            technical_skills: result.technical_skills,
            generated_emails: Vec::new(),
            processed_at: Utc::now(),
            error: None,
        }
    }

    /// Builds an error record: no description, no skills, no emails.
    pub fn failed(contact: Contact, linkedin_url: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            first_name: contact.first_name,
            last_name: contact.last_name,
            job_title: contact.job_title,
            company_name: contact.company_name,
            linkedin_url: linkedin_url.map(str::to_string),
            latest_job_description: None,
            technical_skills: Vec::new(),
            generated_emails: Vec::new(),
            processed_at: Utc::now(),
            error: Some(reason.into()),
        }
    }

    /// True when the description has to be synthesized downstream.
    pub fn needs_generated_description(&self) -> bool {
        self.error.is_none()
            && self
                .latest_job_description
                .as_deref()
                .is_none_or(|d| d.trim().is_empty())
    }

    /// Stores the generated email sequence, keeping at most [`EMAIL_SEQUENCE_LEN`] entries.
    pub fn set_generated_emails<I>(&mut self, emails: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.generated_emails = emails.into_iter().take(EMAIL_SEQUENCE_LEN).collect();
    }

    /// Pairs each CSV column (`Email 1`..`Email 7`) with its email, blank when missing.
    pub fn email_columns(&self) -> Vec<(String, &str)> {
        (0..EMAIL_SEQUENCE_LEN)
            .map(|i| {
                let body = self.generated_emails.get(i).map(String::as_str).unwrap_or("");
                (format!("Email {}", i + 1), body)
            })
            .collect()
    }
}
