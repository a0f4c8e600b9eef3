// tests/audit_test.rs

use chrono::TimeDelta;
use linkedin_experience::audit::EXCLUDED_COMPANIES;
use linkedin_experience::{
    Contact, EmailIssueKind, ExtractionResult, ProfileRecord, audit_email, audit_record_emails,
    clean_records,
};

const CLEAN_EMAIL: &str = "Bonjour Camille, votre travail sur la plateforme data chez Acme m'a marqué. Seriez-vous disponible pour un court échange la semaine prochaine ?";

fn record(first: &str, last: &str, company: &str) -> ProfileRecord {
    let contact = Contact {
        first_name: first.to_string(),
        last_name: last.to_string(),
        job_title: "Head of Data".to_string(),
        company_name: company.to_string(),
    };
    let url = format!("https://www.linkedin.com/in/{}-{}/", first, last).to_lowercase();
    ProfileRecord::from_extraction(contact, &url, ExtractionResult::empty())
}

fn kinds(content: &str) -> Vec<EmailIssueKind> {
    audit_email(content, 1).into_iter().map(|issue| issue.kind).collect()
}

#[test]
fn test_clean_email_has_no_issue() {
    assert!(audit_email(CLEAN_EMAIL, 1).is_empty());
}

#[test]
fn test_empty_email_reports_only_empty() {
    let issues = audit_email("   \n ", 4);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, EmailIssueKind::Empty);
    assert_eq!(issues[0].index, 4);
}

#[test]
fn test_short_email_flagged() {
    let issues = audit_email("Bonjour, un échange ?", 2);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, EmailIssueKind::TooShort);
    assert_eq!(issues[0].detail, "21 characters");
}

#[test]
fn test_generation_failure_and_refusal_keywords() {
    let body = format!("{} Erreur de génération : Rate limit atteint.", CLEAN_EMAIL);
    let found = kinds(&body);
    assert_eq!(
        found.iter().filter(|k| **k == EmailIssueKind::GenerationError).count(),
        2
    );

    let body = format!("Je suis désolé, je ne peux pas rédiger cet email. {}", CLEAN_EMAIL);
    assert_eq!(
        kinds(&body),
        vec![EmailIssueKind::ContentError, EmailIssueKind::ContentError]
    );
}

#[test]
fn test_unreplaced_placeholders() {
    let body = CLEAN_EMAIL.replace("Camille", "{{firstName}}");
    assert_eq!(kinds(&body), vec![EmailIssueKind::Placeholder]);

    let body = CLEAN_EMAIL.replace("Acme", "<<company>>");
    assert_eq!(kinds(&body), vec![EmailIssueKind::Placeholder]);

    let body = CLEAN_EMAIL.replace("Acme", "[Entreprise]");
    assert_eq!(
        kinds(&body),
        vec![EmailIssueKind::Generic, EmailIssueKind::Placeholder]
    );
}

#[test]
fn test_civility_confusion() {
    let body = CLEAN_EMAIL.replace("Bonjour Camille", "Bonjour Monsieur ou Madame Durand");

    assert_eq!(kinds(&body), vec![EmailIssueKind::CivilityConfusion]);
}

#[test]
fn test_record_emails_keep_their_column_index() {
    let mut profile = record("Camille", "Durand", "Acme");
    profile.set_generated_emails([
        CLEAN_EMAIL.to_string(),
        String::new(),
        "Trop court".to_string(),
    ]);

    let issues = audit_record_emails(&profile);

    assert_eq!(issues.len(), 1, "blank columns are not audited");
    assert_eq!(issues[0].index, 3);
    assert_eq!(issues[0].kind, EmailIssueKind::TooShort);
}

#[test]
fn test_clean_records_keeps_latest_duplicate() {
    let older = record("Camille", "Durand", "Acme");
    let mut newer = record("Camille", "Durand", "Acme");
    newer.processed_at = older.processed_at + TimeDelta::seconds(30);
    newer.latest_job_description = Some("Newer scrape".to_string());
    let other = record("Jean", "Dupont", "Globex");

    let cleaned = clean_records(vec![older, other, newer.clone()], &[]);

    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned[0], newer);
    assert_eq!(cleaned[1].first_name, "Jean");
}

#[test]
fn test_clean_records_drops_excluded_companies() {
    let records = vec![
        record("Camille", "Durand", "DÉCATHLON Digital"),
        record("Jean", "Dupont", "BackMarket"),
        record("Lea", "Martin", "Scaleway SAS"),
        record("Paul", "Bernard", "Acme"),
    ];

    let cleaned = clean_records(records, EXCLUDED_COMPANIES);

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].company_name, "Acme");
    println!("✅ Excluded companies dropped");
}
