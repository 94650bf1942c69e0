//! Anchor extraction from a parsed HTML document.

use scraper::{ElementRef, Html};
use tracing::{debug, instrument};

/// Tag name of hyperlink elements.
const ANCHOR_TAG: &str = "a";

/// Attribute carrying the link target.
const HREF_ATTR: &str = "href";

/// Collects the `href` value of every `<a>` element whose value ends with `suffix`.
///
/// The document is walked depth-first in pre-order (an element before its
/// first child, a first child before its next sibling), so the result is in
/// document order. Matching is an exact, case-sensitive suffix comparison and
/// values are returned verbatim: relative, absolute or malformed alike.
///
/// Returns an empty vector when nothing matches.
#[must_use]
#[instrument(level = "debug", skip(document))]
pub fn extract_matching_links(document: &Html, suffix: &str) -> Vec<String> {
    let mut links = Vec::new();
    // Explicit stack: deeply nested markup can't overflow the call stack.
    let mut stack = vec![document.root_element()];

    while let Some(element) = stack.pop() {
        let node = element.value();
        if node.name() == ANCHOR_TAG
            && let Some(href) = node.attr(HREF_ATTR)
            && href.ends_with(suffix)
        {
            links.push(href.to_string());
        }

        // Reversed so the first child is popped next.
        stack.extend(element.children().rev().filter_map(ElementRef::wrap));
    }

    debug!(matched = links.len(), "extracted links");
    links
}
