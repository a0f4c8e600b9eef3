//! Recovers the plain-text job description of a role entity.

use super::dom::{closest, select_within, text_content};
use super::experience::RoleEntity;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// Below this many characters a loose span is treated as a label, not a description.
const MIN_LOOSE_TEXT_CHARS: usize = 30;

static SUB_COMPONENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".pvs-entity__sub-components").unwrap());
static CHROME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"button, a, h1, h2, h3, h4, h5, h6, [role="button"], [data-test-id="position-entity-date-range"]"#,
    )
    .unwrap()
});
static BUTTON: LazyLock<Selector> = LazyLock::new(|| Selector::parse("button").unwrap());

static BR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());
static SEE_MORE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:…|\.\.\.)\s*(?:see more|voir plus)\s*$").unwrap());

/// How the matches of a strategy are screened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Only the first match is considered; it is rejected if it sits in UI chrome.
    Direct,
    /// The first match outside UI chrome that looks like running text wins.
    Loose,
}

/// One structural pattern that may hold the description.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionStrategy {
    pub selector: &'static str,
    /// Ignore spans nested in a button before picking the first match.
    pub skip_button_descendants: bool,
    pub kind: MatchKind,
}

impl DescriptionStrategy {
    const fn direct(selector: &'static str, skip_button_descendants: bool) -> Self {
        Self {
            selector,
            skip_button_descendants,
            kind: MatchKind::Direct,
        }
    }

    const fn loose(selector: &'static str, skip_button_descendants: bool) -> Self {
        Self {
            selector,
            skip_button_descendants,
            kind: MatchKind::Loose,
        }
    }

    /// Markup of the first acceptable match under `root`.
    pub fn find(&self, root: ElementRef<'_>) -> Option<String> {
        let selector = Selector::parse(self.selector).ok()?;
        let mut matches = select_within(root, &selector)
            .filter(|el| !self.skip_button_descendants || closest(*el, &BUTTON).is_none());

        let found = match self.kind {
            MatchKind::Direct => matches.next().filter(|el| !is_chrome(*el)),
            MatchKind::Loose => matches.find(|el| !is_chrome(*el) && looks_like_running_text(*el)),
        };
        found.map(|el| el.inner_html())
    }
}

/// Tried inside the sub-components region, away from the entry's date row.
pub const SCOPED_STRATEGIES: &[DescriptionStrategy] = &[
    DescriptionStrategy::direct("div.inline-show-more-text span.visually-hidden", false),
    DescriptionStrategy::direct(r#"div.inline-show-more-text span[aria-hidden="true"]"#, true),
];

/// Tried on the whole role entity when the scoped pass found nothing.
pub const BROAD_STRATEGIES: &[DescriptionStrategy] = &[
    DescriptionStrategy::direct("div.inline-show-more-text span.visually-hidden", false),
    DescriptionStrategy::direct(r#"div.inline-show-more-text span[aria-hidden="true"]"#, true),
    DescriptionStrategy::direct(r#"div[tabindex="-1"][dir="ltr"] span.visually-hidden"#, false),
    DescriptionStrategy::direct(r#"div[tabindex="-1"][dir="ltr"] span[aria-hidden="true"]"#, true),
    DescriptionStrategy::loose("span.visually-hidden", false),
    DescriptionStrategy::loose(r#"span[aria-hidden="true"]"#, true),
];

/// Raw markup of the role's description, before normalization.
pub fn find_description_markup(role: &RoleEntity<'_>) -> Option<String> {
    let entity = role.element();

    if let Some(sub_components) = select_within(entity, &SUB_COMPONENTS).next() {
        if let Some(markup) = first_match(sub_components, SCOPED_STRATEGIES) {
            debug!("Description found in sub-components");
            return Some(markup);
        }
    }

    let markup = first_match(entity, BROAD_STRATEGIES);
    if markup.is_some() {
        debug!("Description found with a fallback selector on the whole entry");
    }
    markup
}

/// The role's description as plain text, `None` when it has none.
pub fn extract_description(role: &RoleEntity<'_>) -> Option<String> {
    find_description_markup(role).and_then(|markup| normalize_description(&markup))
}

fn first_match(root: ElementRef<'_>, strategies: &[DescriptionStrategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy.find(root))
}

fn is_chrome(el: ElementRef<'_>) -> bool {
    closest(el, &CHROME).is_some()
}

fn looks_like_running_text(el: ElementRef<'_>) -> bool {
    text_content(el).trim().chars().count() > MIN_LOOSE_TEXT_CHARS || el.inner_html().contains("<br")
}

/// Turns description markup into plain text.
///
/// Line breaks become newlines, tags are stripped, common entities decoded,
/// runs of spaces collapsed and a trailing "…see more" expander label removed.
pub fn normalize_description(markup: &str) -> Option<String> {
    let text = BR_TAG.replace_all(markup, "\n");
    let text = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = text.replace("\n ", "\n");
    let text = SEE_MORE_SUFFIX.replace(&text, "");
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
