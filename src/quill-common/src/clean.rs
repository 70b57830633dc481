//! Assistant-response post-processing.
//!
//! Some models interleave internal reasoning wrapped in `<think>` tags with
//! the answer text. Everything inside a tag pair is dropped, stray unmatched
//! tags are stripped, and runs of blank lines are collapsed before the text
//! is displayed or stored.

use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// Strip reasoning markup and collapse excess blank lines.
///
/// Idempotent: applying it twice gives the same result as applying it once.
pub fn clean_response(text: &str) -> String {
    let without_blocks = REASONING_BLOCK.replace_all(text, "");

    // Unmatched leftovers (a lone opening or closing tag) are stripped
    // without touching the text around them.
    let without_tags = without_blocks
        .replace("<think>", "")
        .replace("</think>", "");

    let trimmed = without_tags.trim();

    // Three or more consecutive newlines collapse down to exactly two.
    EXCESS_NEWLINES.replace_all(trimmed, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_reasoning_block_and_collapses_newlines() {
        let input = "<think>ignore</think>Hello\n\n\n\nWorld";
        assert_eq!(clean_response(input), "Hello\n\nWorld");
    }

    #[test]
    fn test_strips_multiline_reasoning_block() {
        let input = "<think>first\nsecond\nthird</think>answer";
        assert_eq!(clean_response(input), "answer");
    }

    #[test]
    fn test_strips_unmatched_tags() {
        assert_eq!(clean_response("<think>no close here"), "no close here");
        assert_eq!(clean_response("stray close</think> tag"), "stray close tag");
    }

    #[test]
    fn test_nested_tags_leave_no_markup_behind() {
        let input = "<think>a<think>b</think>c</think>done";
        let cleaned = clean_response(input);
        assert!(!cleaned.contains("<think>"));
        assert!(!cleaned.contains("</think>"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(clean_response("  \n hi \n "), "hi");
    }

    #[test]
    fn test_blank_lines_with_spaces_collapse() {
        assert_eq!(clean_response("a\n \n \nb"), "a\n\nb");
    }

    #[test]
    fn test_two_newlines_preserved() {
        assert_eq!(clean_response("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "<think>ignore</think>Hello\n\n\n\nWorld",
            "<think>a<think>b</think>c</think>done",
            "plain text",
            "\n\n\n\n\n",
            "left<think>middle",
            "a\n\n\nb\n\n\n\nc",
        ];
        for input in inputs {
            let once = clean_response(input);
            let twice = clean_response(&once);
            assert_eq!(once, twice, "clean_response not idempotent for {input:?}");
        }
    }
}
