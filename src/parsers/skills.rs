use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

pub const MODAL_CONTENT_SELECTOR: &str = "div.artdeco-modal__content";
pub const SKILL_LABEL_SELECTOR: &str = r#"div.artdeco-modal__content ul li .display-flex.align-items-center.mr1.t-bold span[aria-hidden="true"]"#;

static SKILL_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(SKILL_LABEL_SELECTOR).unwrap());

/// Reads the skill labels shown in the skills modal, in display order and without duplicates.
pub fn parse_skills(document: &Html) -> Vec<String> {
    dedup_labels(
        document
            .select(&SKILL_LABEL)
            .map(|span| span.text().collect::<String>()),
    )
}

/// Trims labels, drops empty ones and keeps the first occurrence of each.
pub fn dedup_labels<I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
