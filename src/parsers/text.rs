use scraper::ElementRef;

/// Collapses every run of whitespace to a single space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins all text fragments below an element with spaces, then normalizes
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text held directly by the element, ignoring its child elements
pub fn own_text(element: ElementRef<'_>) -> String {
    let fragments = element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect::<Vec<_>>();
    normalize_whitespace(&fragments.join(" "))
}

/// Removes a literal marker such as `Q:` from the front of the text
pub fn strip_marker(text: &str, marker: &str) -> String {
    let text = text.trim();
    text.strip_prefix(marker).unwrap_or(text).trim().to_string()
}

/// Normalized text, or `None` if nothing but whitespace is left
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
