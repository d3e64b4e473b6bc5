//! Mention extraction.
//!
//! Pulls `@username` tokens out of free text for the notification pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// `@` followed by one or more ASCII letters, digits or underscores.
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("mention regex is valid"));

/// Extract mentioned usernames from `text`, without the `@`.
///
/// Order follows position in the text. Case is preserved and repeats are
/// kept, so `"@bob @bob"` yields two entries.
///
/// ```
/// use domains::mentions::extract_mentions;
///
/// let names = extract_mentions("hello @bob and @Bob_2 twice @bob");
/// assert_eq!(names, vec!["bob", "Bob_2", "bob"]);
/// ```
pub fn extract_mentions(text: &str) -> Vec<String> {
    MENTION_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_case_and_duplicates() {
        let mentions = extract_mentions("hello @bob and @Bob_2 twice @bob");
        assert_eq!(mentions, vec!["bob", "Bob_2", "bob"]);
    }

    #[test]
    fn no_mentions() {
        assert!(extract_mentions("plain text, an email-ish a@").is_empty());
        assert!(extract_mentions("").is_empty());
    }

    #[test]
    fn stops_at_non_word_characters() {
        let mentions = extract_mentions("ping @carol! and @dave.");
        assert_eq!(mentions, vec!["carol", "dave"]);
    }

    #[test]
    fn unicode_is_not_part_of_a_username() {
        let mentions = extract_mentions("你好 @alice 欢迎 @josé");
        assert_eq!(mentions, vec!["alice", "jos"]);
    }

    #[test]
    fn adjacent_mentions_split_on_at_sign() {
        let mentions = extract_mentions("@a@b");
        assert_eq!(mentions, vec!["a", "b"]);
    }

    #[test]
    fn no_length_limit() {
        let long = "x".repeat(300);
        let mentions = extract_mentions(&format!("@{long}"));
        assert_eq!(mentions, vec![long]);
    }

    #[test]
    fn same_input_same_output() {
        let text = "@one @two";
        assert_eq!(extract_mentions(text), extract_mentions(text));
    }
}
