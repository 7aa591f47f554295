//! Central scheme table extractor.
//!
//! The national listing is a single table. The first row is a header; each
//! following row carries the serial number, title, date and a details link in
//! columns 0-3.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::text::stripped_text;
use crate::types::{CentralScheme, PLACEHOLDER_LINK};

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid cell selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid anchor selector"));

const MIN_CELLS: usize = 4;
const TITLE_COLUMN: usize = 1;
const DATE_COLUMN: usize = 2;
const LINK_COLUMN: usize = 3;

/// Extract scheme rows from the first table of `html`.
///
/// Links are built by appending the href to `base_url` as-is. A document
/// without a table yields an empty list.
pub fn extract_central_schemes(html: &str, base_url: &str) -> Vec<CentralScheme> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&TABLE).next() else {
        debug!("No table found in central listing");
        return Vec::new();
    };

    let mut skipped = 0usize;
    let schemes: Vec<CentralScheme> = table
        .select(&ROW)
        .skip(1)
        .filter_map(|row| {
            let scheme = scheme_from_row(row, base_url);
            if scheme.is_none() {
                skipped += 1;
            }
            scheme
        })
        .collect();

    debug!(
        schemes = schemes.len(),
        skipped_rows = skipped,
        "Extracted central schemes"
    );
    schemes
}

fn scheme_from_row(row: ElementRef<'_>, base_url: &str) -> Option<CentralScheme> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let link = cells[LINK_COLUMN]
        .select(&ANCHOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| format!("{base_url}{href}"))
        .unwrap_or_else(|| PLACEHOLDER_LINK.to_string());

    Some(CentralScheme {
        title: stripped_text(&cells[TITLE_COLUMN], ""),
        date: stripped_text(&cells[DATE_COLUMN], ""),
        link,
    })
}
