//! Keyword audits of stored profile records.
//!
//! Flags descriptions that do not look like tech/data positions, which usually
//! means the scrape picked up the wrong text or a generated description drifted.
//! Also flags generated emails that carry model errors or template leftovers,
//! and cleans duplicate or excluded records out of a batch.

use crate::models::ProfileRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::info;

/// Emails shorter than this, once trimmed, are flagged.
pub const MIN_EMAIL_CHARS: usize = 100;

/// Markers of a failed generation call.
pub const GENERATION_ERROR_KEYWORDS: &[&str] = &[
    "erreur de génération", "groq", "error generating", "api error", "non disponible",
    "indisponible", "génération échouée", "failed to generate", "timeout", "rate limit",
];

/// Markers of a templated or meta answer instead of an actual email.
pub const GENERIC_EMAIL_KEYWORDS: &[&str] = &[
    "voici l'email", "voici le mail", "email généré", "mail généré", "lorem ipsum", "example",
    "test", "todo", "placeholder", "[nom]", "[prénom]", "[entreprise]", "cher/chère",
    "bonjour [", "hello [", "undefined", "null", "nan",
];

/// Markers of the model refusing or apologizing.
pub const CONTENT_ERROR_KEYWORDS: &[&str] = &[
    "je ne peux pas", "je ne suis pas capable", "information non disponible",
    "données insuffisantes", "impossible de générer", "erreur dans", "problème avec",
    "cannot generate", "unable to create", "no data available", "je suis désolé",
    "malheureusement", "je ne trouve pas", "aucune information",
];

/// Companies whose prospects are dropped from a batch.
pub const EXCLUDED_COMPANIES: &[&str] = &["décathlon", "decathlon", "back market", "backmarket", "scaleway"];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{|\}|\[|\]|<<|>>").unwrap());

/// Keywords marking a tech or data position (French and English).
pub const TECH_DATA_KEYWORDS: &[&str] = &[
    // Data & analytics
    "data", "données", "analytics", "analyse", "statistique", "business intelligence", "bi",
    "tableau", "power bi", "data science", "data scientist", "data engineer", "data analyst",
    "big data", "machine learning", "ml", "ai", "intelligence artificielle", "algorithme",
    "modèle", "prédictif", "apprentissage automatique",
    // Databases
    "sql", "postgresql", "mysql", "mongodb", "base de données", "database", "datawarehouse",
    "datalake", "etl", "pipeline", "spark", "hadoop", "cassandra", "redis", "elasticsearch",
    // Programming
    "python", "r", "scala", "java", "javascript", "développement", "développeur",
    "programmation", "code", "github", "git", "api", "rest", "microservices", "docker",
    "kubernetes", "cloud", "aws", "azure", "gcp",
    // Tools
    "kafka", "airflow", "jenkins", "terraform", "ansible", "linux", "unix", "bash", "devops",
    "cybersécurité", "sécurité informatique", "réseau", "infrastructure", "système", "serveur",
    // Tech business
    "digital", "numérique", "transformation digitale", "innovation", "startup", "fintech",
    "edtech", "saas", "paas", "iaas", "cto", "cdo", "chief data officer",
    "chief technology officer",
    // Roles
    "product owner", "scrum master", "agile", "sprint", "jira", "confluence",
    "product manager tech", "architect", "software engineer", "full stack", "frontend",
    "backend", "mobile app", "web",
    // AI & ML
    "tensorflow", "pytorch", "keras", "scikit-learn", "pandas", "numpy", "jupyter", "notebook",
    "deep learning", "neural network", "nlp", "computer vision", "reinforcement learning",
];

/// Keywords marking a non-tech position.
pub const NON_TECH_KEYWORDS: &[&str] = &[
    "vente", "commercial", "marketing traditionnel", "comptabilité", "finance traditionnelle",
    "rh", "ressources humaines", "juridique", "legal", "communication", "relations publiques",
    "event", "événementiel", "immobilier", "construction", "btp", "agriculture",
    "agroalimentaire", "restauration", "hôtellerie", "tourisme", "transport routier",
    "logistique traditionnelle", "retail traditionnel",
];

/// Verdict for one description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionAudit {
    pub is_tech_data: bool,
    /// 0-100.
    pub confidence: u32,
    pub reason: String,
    /// Tech keywords found in the description.
    pub keywords: Vec<String>,
    pub non_tech_keywords: Vec<String>,
}

fn matching(haystack: &str, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|keyword| haystack.contains(**keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Scores a description (and the job title, which counts double) against the keyword lists.
pub fn classify_description(description: Option<&str>, job_title: Option<&str>) -> DescriptionAudit {
    let description = description.map(str::trim).unwrap_or("");
    if description.is_empty() {
        return DescriptionAudit {
            is_tech_data: false,
            confidence: 0,
            reason: "Empty description".to_string(),
            keywords: Vec::new(),
            non_tech_keywords: Vec::new(),
        };
    }

    let lowered = description.to_lowercase();
    let keywords = matching(&lowered, TECH_DATA_KEYWORDS);
    let non_tech_keywords = matching(&lowered, NON_TECH_KEYWORDS);
    let title_hits = job_title
        .map(|title| matching(&title.to_lowercase(), TECH_DATA_KEYWORDS).len())
        .unwrap_or(0);

    let tech_score = (keywords.len() + title_hits * 2) as u32;
    let non_tech_score = non_tech_keywords.len() as u32;

    let (is_tech_data, confidence, reason) = if tech_score >= 3 {
        (
            true,
            (50 + tech_score * 10).min(90),
            format!("{} tech/data keywords found", tech_score),
        )
    } else if tech_score >= 1 && non_tech_score == 0 {
        (
            true,
            30 + tech_score * 15,
            format!("{} tech/data keywords, no non-tech keyword", tech_score),
        )
    } else if non_tech_score > tech_score {
        (
            false,
            (40 + non_tech_score * 10).min(80),
            format!(
                "More non-tech keywords ({}) than tech keywords ({})",
                non_tech_score, tech_score
            ),
        )
    } else if tech_score == 0 {
        (false, 70, "No tech/data keyword found".to_string())
    } else {
        (
            false,
            40,
            format!("Few tech keywords ({}), ambiguous", tech_score),
        )
    };

    DescriptionAudit {
        is_tech_data,
        confidence,
        reason,
        keywords,
        non_tech_keywords,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EmailIssueKind {
    Empty,
    GenerationError,
    Generic,
    ContentError,
    TooShort,
    Placeholder,
    /// Addresses the reader as both monsieur and madame.
    CivilityConfusion,
}

/// One problem found in one generated email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailIssue {
    /// 1-based position in the email sequence.
    pub index: usize,
    pub kind: EmailIssueKind,
    pub detail: String,
}

impl EmailIssue {
    fn new(index: usize, kind: EmailIssueKind, detail: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            detail: detail.into(),
        }
    }
}

/// Checks one generated email. An empty email yields a single [`EmailIssueKind::Empty`] issue.
pub fn audit_email(content: &str, index: usize) -> Vec<EmailIssue> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return vec![EmailIssue::new(index, EmailIssueKind::Empty, "Empty email")];
    }

    let lowered = content.to_lowercase();
    let mut issues = Vec::new();

    for (keywords, kind) in [
        (GENERATION_ERROR_KEYWORDS, EmailIssueKind::GenerationError),
        (GENERIC_EMAIL_KEYWORDS, EmailIssueKind::Generic),
        (CONTENT_ERROR_KEYWORDS, EmailIssueKind::ContentError),
    ] {
        issues.extend(
            matching(&lowered, keywords)
                .into_iter()
                .map(|keyword| EmailIssue::new(index, kind, format!("keyword \"{}\"", keyword))),
        );
    }

    let length = trimmed.chars().count();
    if length < MIN_EMAIL_CHARS {
        issues.push(EmailIssue::new(
            index,
            EmailIssueKind::TooShort,
            format!("{} characters", length),
        ));
    }

    if PLACEHOLDER.is_match(content) {
        issues.push(EmailIssue::new(
            index,
            EmailIssueKind::Placeholder,
            "Unreplaced placeholder",
        ));
    }

    if lowered.contains("monsieur") && lowered.contains("madame") {
        issues.push(EmailIssue::new(
            index,
            EmailIssueKind::CivilityConfusion,
            "Mentions both monsieur and madame",
        ));
    }

    issues
}

/// Audits every non-empty email column of a record.
pub fn audit_record_emails(record: &ProfileRecord) -> Vec<EmailIssue> {
    record
        .email_columns()
        .into_iter()
        .enumerate()
        .filter(|(_, (_, body))| !body.trim().is_empty())
        .flat_map(|(i, (_, body))| audit_email(body, i + 1))
        .collect()
}

/// Keeps the most recently processed record per first and last name, then drops
/// records whose company matches `excluded_companies` (case-insensitive substring).
///
/// Survivors keep the position of the first record seen for their name.
pub fn clean_records(records: Vec<ProfileRecord>, excluded_companies: &[&str]) -> Vec<ProfileRecord> {
    let total = records.len();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<ProfileRecord> = Vec::with_capacity(total);

    for record in records {
        let key = (record.first_name.clone(), record.last_name.clone());
        match positions.get(&key).copied() {
            Some(i) => {
                if record.processed_at > kept[i].processed_at {
                    kept[i] = record;
                }
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(record);
            }
        }
    }
    let duplicates = total - kept.len();

    let excluded: Vec<String> = excluded_companies.iter().map(|c| c.to_lowercase()).collect();
    kept.retain(|record| {
        let company = record.company_name.to_lowercase();
        !excluded.iter().any(|name| company.contains(name.as_str()))
    });

    info!(
        "Cleaned {} records: {} duplicates, {} excluded companies, {} kept",
        total,
        duplicates,
        total - duplicates - kept.len(),
        kept.len()
    );
    kept
}
