use crate::parsers::text;
use scraper::{Html, Selector};

#[cfg(test)]
mod basic_tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> scraper::ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(text::normalize_whitespace(""), "");
        assert_eq!(text::normalize_whitespace("   \n\t  "), "");
        assert_eq!(
            text::normalize_whitespace("  Hello    world!\n\n This  is\ta test.  "),
            "Hello world! This is a test."
        );
    }

    #[test]
    fn test_element_text_joins_fragments_with_spaces() {
        let doc = Html::parse_fragment("<h1>CAT<span>2025</span>  Exam</h1>");
        assert_eq!(text::element_text(first(&doc, "h1")), "CAT 2025 Exam");
    }

    #[test]
    fn test_own_text_ignores_children() {
        let doc = Html::parse_fragment("<div>Outer <span>Inner Updated</span> text</div>");
        assert_eq!(text::own_text(first(&doc, "div")), "Outer text");
        assert_eq!(text::own_text(first(&doc, "span")), "Inner Updated");
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(text::strip_marker("Q: What is the fee?", "Q:"), "What is the fee?");
        assert_eq!(text::strip_marker("  A:2000 rupees ", "A:"), "2000 rupees");
        assert_eq!(text::strip_marker("No marker here", "Q:"), "No marker here");
        // Only the leading marker is removed
        assert_eq!(text::strip_marker("Q: Is Q: allowed?", "Q:"), "Is Q: allowed?");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(text::non_empty(String::new()), None);
        assert_eq!(text::non_empty("x".to_string()), Some("x".to_string()));
    }
}
