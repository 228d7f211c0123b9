use reqwest::Url;
use scraper::ElementRef;

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>()
}

/// Collapses whitespace runs to single spaces. `None` if nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

pub fn extract_clean_text(node: ElementRef) -> Option<String> {
    normalize_text(&extract_text(node))
}

pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}
