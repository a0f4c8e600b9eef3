//! Locates the single most recent position in a profile's experience section.
//!
//! Every stage is an ordered list of strategies tried until one yields a node.
//! Section order is trusted as recency order: the first entry is the latest
//! position, and inside a company block the first nested role is the latest.

use super::dom::{
    child_elements, closest, folded_text, is_inside, is_rendered, parent_element, select_within,
};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

const SECTION_LABELS: [&str; 2] = ["expérience", "experience"];

static ENTITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[data-view-name="profile-component-entity"]"#).unwrap());

static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static LABEL_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"span[aria-hidden="true"]"#).unwrap());
static HEADING_LIKE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"h2, [role="heading"][aria-level="2"]"#).unwrap());
static SECTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("section").unwrap());
static EXPERIENCE_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"div[id^="experience"], div[class*="experience"], section[id^="experience"], section[class*="experience"]"#,
    )
    .unwrap()
});
static SUB_LIST: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".pvs-entity__sub-components .pvs-list, .pvs-entity__sub-components ul, .pvs-entity__sub-components > div > ul",
    )
    .unwrap()
});

/// The DOM node describing exactly one job position.
#[derive(Debug, Clone, Copy)]
pub struct RoleEntity<'a> {
    element: ElementRef<'a>,
}

impl<'a> RoleEntity<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// Short preview of the entity's text, for logs.
    pub fn preview(&self) -> String {
        let text = self
            .element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        text.chars().take(70).collect()
    }
}

/// Finds the most recent position on the page, or `None` when the page has none.
pub fn locate(document: &Html) -> Option<RoleEntity<'_>> {
    let section = locate_section(document)?;
    debug!("Experience section found");
    locate_latest_entity(section)
}

/// Finds the container of the experience section.
pub fn locate_section(document: &Html) -> Option<ElementRef<'_>> {
    let header = find_labelled_header(document).or_else(|| find_visible_heading(document))?;
    resolve_container(header)
}

/// Narrows an experience section to the node of its most recent role.
pub fn locate_latest_entity(section: ElementRef<'_>) -> Option<RoleEntity<'_>> {
    let first_entry = top_level_entries(section).into_iter().next()?;
    let outer = unwrap_entity(first_entry)?;

    let element = match nested_roles(outer).into_iter().next() {
        Some(role) => {
            debug!("Company block found, using its first role");
            role
        }
        None => outer,
    };
    Some(RoleEntity { element })
}

fn is_section_label(text: &str) -> bool {
    SECTION_LABELS.contains(&text)
}

fn mentions_section(text: &str) -> bool {
    SECTION_LABELS.iter().any(|label| text.contains(label))
}

/// `h2` whose visible label is exactly the section name.
fn find_labelled_header(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&H2).find(|h2| {
        h2.select(&LABEL_SPAN)
            .next()
            .is_some_and(|span| is_section_label(&folded_text(span)))
    })
}

/// Any rendered level-2 heading mentioning the section name.
fn find_visible_heading(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&HEADING_LIKE)
        .find(|el| mentions_section(&folded_text(*el)) && is_rendered(*el))
}

fn resolve_container(header: ElementRef<'_>) -> Option<ElementRef<'_>> {
    closest(header, &SECTION)
        .or_else(|| closest(header, &EXPERIENCE_CONTAINER))
        .or_else(|| parent_element(header).and_then(parent_element))
}

/// Entries of the section in display order.
fn top_level_entries(section: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut entries = Vec::new();
    for child in child_elements(section) {
        match child.value().name() {
            "div" if ENTITY.matches(&child) => entries.push(child),
            "ul" => entries.extend(list_items(child)),
            _ => {}
        }
        if child.value().name() == "div" {
            for grandchild in child_elements(child).filter(|el| el.value().name() == "ul") {
                entries.extend(list_items(grandchild));
            }
        }
    }

    if entries.is_empty() {
        entries = child_elements(section)
            .filter(|el| el.value().name() == "div")
            .collect();
    }
    entries
}

fn list_items(list: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(list).filter(|el| el.value().name() == "li")
}

/// The profile-entity node of an entry: the entry itself or the first one inside it.
fn unwrap_entity(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if ENTITY.matches(&entry) {
        return Some(entry);
    }
    select_within(entry, &ENTITY).next()
}

/// Roles stacked under a company block, most recent first.
fn nested_roles(outer: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut roles = Vec::new();
    if let Some(list) = select_within(outer, &SUB_LIST).next() {
        for item in list_items(list) {
            roles.extend(select_within(item, &ENTITY));
        }
    }

    if roles.is_empty() {
        roles = select_within(outer, &ENTITY)
            .filter(|el| is_inside(*el, outer))
            .collect();
    }
    roles
}
