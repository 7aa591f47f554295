use scraper::ElementRef;

/// Text content of `element` with every fragment trimmed, empty fragments
/// dropped and the rest joined by `separator`.
pub(crate) fn stripped_text(element: &ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Text content of `element` with all whitespace runs collapsed to a single
/// space.
pub(crate) fn normalized_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
