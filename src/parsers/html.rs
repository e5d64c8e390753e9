use crate::error::PageError;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static WITH_ID: LazyLock<Selector> = LazyLock::new(|| selector("[id]"));
static LINK_SOURCES: LazyLock<[Selector; 3]> =
    LazyLock::new(|| [selector("a[href]"), selector("link[href]"), selector("[src]")]);

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector is valid")
}

/// Returns the document title with surrounding whitespace removed
pub fn extract_title(doc: &Html) -> Result<String, PageError> {
    let raw = doc
        .select(&TITLE)
        .flat_map(|n| n.text())
        .collect::<String>();

    let title = raw.trim();
    if title.is_empty() {
        return Err(PageError::NotFound("title"));
    }

    Ok(title.to_string())
}

/// Returns the text of every element whose id starts with `prefix`, in document order
pub fn extract_sections(doc: &Html, prefix: &str) -> Result<Vec<String>, PageError> {
    let sections = doc
        .select(&WITH_ID)
        .filter(|e| e.value().id().is_some_and(|id| id.starts_with(prefix)))
        .map(|e| e.text().collect::<String>())
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} sections", sections.len());
    if sections.is_empty() {
        return Err(PageError::NotFound("sections"));
    }

    Ok(sections)
}

/// Collects every `href` and `src` value reachable from anchors, link tags and
/// sourced elements, with exact duplicates collapsed.
///
/// Values are kept verbatim: relative paths stay relative and no scheme is
/// filtered out. An empty set is a valid result.
pub fn extract_links(doc: &Html) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    for sel in LINK_SOURCES.iter() {
        for element in doc.select(sel) {
            let value = element.value();
            links.extend(value.attr("href").map(str::to_string));
            links.extend(value.attr("src").map(str::to_string));
        }
    }

    ::log::debug!("HTML parser found {} distinct links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_selectors_parse() {
        LazyLock::force(&TITLE);
        LazyLock::force(&WITH_ID);
        assert_eq!(LazyLock::force(&LINK_SOURCES).len(), 3);
    }
}
