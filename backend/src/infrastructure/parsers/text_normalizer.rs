/// Cleanup of raw text extracted from PDFs
use regex::Regex;
use std::sync::OnceLock;

/// Normalizes PDF text layout artifacts while keeping paragraph breaks
#[derive(Debug)]
pub struct TextNormalizer {
    control_regex: Regex,
    hyphenation_regex: Regex,
    horizontal_space_regex: Regex,
    line_edge_space_regex: Regex,
    blank_lines_regex: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        TextNormalizer {
            // Control characters other than tab and newline (form feeds mark page breaks)
            control_regex: Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").expect("control regex is valid"),
            // A word broken across lines with a hyphen: "exam-\nple"
            hyphenation_regex: Regex::new(r"(\w)-\n(\w)").expect("hyphenation regex is valid"),
            horizontal_space_regex: Regex::new(r"[ \t\u{00A0}]+").expect("space regex is valid"),
            line_edge_space_regex: Regex::new(r" ?\n ?").expect("line edge regex is valid"),
            blank_lines_regex: Regex::new(r"\n{3,}").expect("blank lines regex is valid"),
        }
    }

    /// Get a singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<TextNormalizer> = OnceLock::new();
        INSTANCE.get_or_init(TextNormalizer::new)
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\x0C', "\n\n");
        let text = self.control_regex.replace_all(&text, "");
        let text = self.hyphenation_regex.replace_all(&text, "$1$2");
        let text = self.horizontal_space_regex.replace_all(&text, " ");
        let text = self.line_edge_space_regex.replace_all(&text, "\n");
        let text = self.blank_lines_regex.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("Rust   is\t\tfast"), "Rust is fast");
    }

    #[test]
    fn test_rejoins_hyphenated_words() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("an exam-\nple of hyphen-\nation"),
            "an example of hyphenation"
        );
    }

    #[test]
    fn test_keeps_real_hyphens() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("state-of-the-art"), "state-of-the-art");
    }

    #[test]
    fn test_collapses_blank_lines_to_paragraph_break() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("First paragraph.  \n\n\n\n  Second paragraph."),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_page_breaks_and_control_characters() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("Page one\x0CPage\x07 two\r\n"),
            "Page one\n\nPage two"
        );
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(TextNormalizer::instance().normalize(" \n\t\x0C \n"), "");
    }
}
