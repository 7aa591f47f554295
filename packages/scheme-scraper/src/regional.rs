//! Regional scheme menu extractor.
//!
//! The state portal lists its schemes as a nested `<ul>` menu placed after a
//! heading containing [`MARKER_PHRASE`]. Each `<li>` with a link becomes a
//! [`RegionalScheme`]; a nested `<ul>` inside the item becomes its children.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::text::{normalized_text, stripped_text};
use crate::types::{RegionalScheme, PLACEHOLDER_LINK};

/// Text that identifies the heading above the scheme menu.
pub const MARKER_PHRASE: &str = "SERVICES AND SCHEMES";

/// Deepest menu level kept. Lists nested below it are dropped.
pub const MAX_DEPTH: usize = 32;

static HEADING: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector")
});
static LINKED_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul").expect("valid list selector"));

/// Extract the scheme tree from the regional portal page.
///
/// Returns an empty list when the marker heading or the list after it is
/// missing.
pub fn extract_regional_schemes(html: &str, base_url: &Url) -> Vec<RegionalScheme> {
    let document = Html::parse_document(html);

    let Some(heading) = find_marker_heading(&document) else {
        debug!(marker = MARKER_PHRASE, "Marker heading not found");
        return Vec::new();
    };

    let Some(list) = next_list_after(&document, heading) else {
        debug!("No list follows the marker heading");
        return Vec::new();
    };

    let schemes = walk_list(list, base_url, 1);
    debug!(
        top_level = schemes.len(),
        total = schemes.iter().map(RegionalScheme::node_count).sum::<usize>(),
        depth = schemes.iter().map(RegionalScheme::depth).max().unwrap_or(0),
        "Extracted regional schemes"
    );
    schemes
}

/// First heading, in document order, whose text contains the marker phrase.
fn find_marker_heading(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&HEADING)
        .find(|heading| normalized_text(heading).to_uppercase().contains(MARKER_PHRASE))
}

/// First `<ul>` that starts after `heading` in document order.
///
/// The search is not limited to the heading's section; any later list in
/// the document qualifies.
fn next_list_after<'a>(document: &'a Html, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != heading.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "ul")
}

/// Build one node per direct `<li>` child of `list`. `depth` is the level of
/// those nodes, starting at 1 for the top of the menu.
fn walk_list(list: ElementRef<'_>, base_url: &Url, depth: usize) -> Vec<RegionalScheme> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .filter_map(|item| scheme_from_item(item, base_url, depth))
        .collect()
}

fn scheme_from_item(
    item: ElementRef<'_>,
    base_url: &Url,
    depth: usize,
) -> Option<RegionalScheme> {
    let anchor = item.select(&LINKED_ANCHOR).next()?;
    let href = anchor.value().attr("href")?;

    let title = stripped_text(&anchor, " ");
    if title.is_empty() {
        return None;
    }

    let nested = item.select(&LIST).next();
    let children = match nested {
        Some(_) if depth >= MAX_DEPTH => {
            warn!(
                title = %title,
                max_depth = MAX_DEPTH,
                "Scheme menu nested too deep, dropping sublists"
            );
            Vec::new()
        }
        Some(nested) => walk_list(nested, base_url, depth + 1),
        None => Vec::new(),
    };

    Some(RegionalScheme {
        title,
        link: resolve_link(base_url, href),
        children,
    })
}

fn resolve_link(base_url: &Url, href: &str) -> String {
    match base_url.join(href) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!(href = %href, error = %e, "Unresolvable scheme link");
            PLACEHOLDER_LINK.to_string()
        }
    }
}
