//! Markup normalization for assistant replies
//!
//! Gemini answers in lightweight Markdown. The chat transcript shows plain
//! text, so emphasis markers are stripped and asterisk bullets become bullet
//! glyphs. Numbered-list lines pass through unchanged.

use regex::Regex;
use std::sync::OnceLock;

/// Glyph that replaces a leading `* ` bullet
pub const BULLET: &str = "• ";

fn numbered_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s").expect("valid numbered-list regex"))
}

fn asterisk_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\*[\s*]*$").expect("valid asterisk-rule regex"))
}

fn bullet_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)\*\s+(.*)$").expect("valid bullet regex"))
}

/// Normalize assistant markup line by line
///
/// # Examples
///
/// ```
/// use careerchat::chat::normalize_markup;
///
/// let raw = "**Next steps**\n* Learn *SQL*\n1. **Keep** this";
/// assert_eq!(
///     normalize_markup(raw),
///     "Next steps\n• Learn SQL\n1. **Keep** this"
/// );
/// ```
pub fn normalize_markup(text: &str) -> String {
    text.split('\n')
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str) -> String {
    if numbered_line().is_match(line) {
        return line.to_string();
    }

    if asterisk_rule().is_match(line) {
        return String::new();
    }

    if let Some(caps) = bullet_line().captures(line) {
        let indent = caps.get(1).map_or("", |m| m.as_str());
        let rest = caps.get(2).map_or("", |m| m.as_str());
        return format!("{}{}{}", indent, BULLET, strip_emphasis(rest));
    }

    strip_emphasis(line)
}

fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(normalize_markup("hi there"), "hi there");
    }

    #[test]
    fn test_strips_bold_and_italic() {
        assert_eq!(
            normalize_markup("This is **bold** and *italic*"),
            "This is bold and italic"
        );
    }

    #[test]
    fn test_nested_asterisks_are_removed() {
        assert_eq!(normalize_markup("***very*** important"), "very important");
    }

    #[test]
    fn test_pure_asterisk_line_becomes_empty() {
        assert_eq!(normalize_markup("above\n***\nbelow"), "above\n\nbelow");
        assert_eq!(normalize_markup("  * *  "), "");
    }

    #[test]
    fn test_bullets_keep_indentation() {
        assert_eq!(
            normalize_markup("* Top\n    * Nested **item**"),
            "• Top\n    • Nested item"
        );
    }

    #[test]
    fn test_numbered_lines_untouched_between_bullets() {
        let raw = "1. **Learn Python**\n* Practice daily\n2. Build *projects*";
        assert_eq!(
            normalize_markup(raw),
            "1. **Learn Python**\n• Practice daily\n2. Build *projects*"
        );
    }

    #[test]
    fn test_decimal_number_is_not_a_list() {
        assert_eq!(normalize_markup("2.5 *million* jobs"), "2.5 million jobs");
    }

    #[test]
    fn test_trailing_newline_preserved() {
        assert_eq!(normalize_markup("* a\n"), "• a\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_markup(""), "");
    }
}
