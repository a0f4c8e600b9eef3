use scraper::{ElementRef, Selector};

/// Element children of `el`, in document order.
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// The parent of `el` if it is an element (the document node is not).
pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// First of `el` and its ancestors matching `selector`, like the DOM's `closest`.
pub fn closest<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| selector.matches(candidate))
}

/// Descendants of `el` matching `selector`, never `el` itself.
pub fn select_within<'a, 'b>(
    el: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + use<'a, 'b> {
    let scope = el.id();
    el.select(selector).filter(move |found| found.id() != scope)
}

/// True when `ancestor` properly contains `el`.
pub fn is_inside(el: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    el.ancestors().any(|node| node.id() == ancestor.id())
}

/// Concatenated text content of `el`.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Trimmed, lower-cased text, used for heading comparisons.
pub fn folded_text(el: ElementRef<'_>) -> String {
    text_content(el).trim().to_lowercase()
}

/// Layout visibility as recorded by the snapshot script.
pub fn is_rendered(el: ElementRef<'_>) -> bool {
    let element = el.value();
    element.attr("hidden").is_none() && element.attr("data-rendered") != Some("false")
}
