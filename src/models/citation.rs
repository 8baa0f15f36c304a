use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<.*?>").expect("tag pattern is valid"));

/// Ordinal words for the numbered books (1 Corinthians, 2 Kings, ...)
const ORDINALS: [(char, &str); 4] = [
    ('1', "First "),
    ('2', "Second "),
    ('3', "Third "),
    ('4', "Fourth "),
];

/// Turn a citation into a filename-safe key: spaces become underscores,
/// colons become periods.
pub fn to_key(citation: &str) -> String {
    citation.replace(' ', "_").replace(':', ".")
}

/// Turn a citation into the form read aloud: a leading book number 1-4 is
/// replaced by its ordinal word and the chapter/verse colon becomes ", ".
pub fn to_display_name(citation: &str) -> String {
    let mut chars = citation.chars();
    let expanded = match chars.next() {
        Some(first) => match ORDINALS.iter().find(|(digit, _)| *digit == first) {
            Some((_, word)) => format!("{}{}", word, chars.as_str()),
            None => citation.to_string(),
        },
        None => String::new(),
    };
    expanded.replace(':', ", ")
}

/// Remove anything shaped like `<...>` on a single line. Not an HTML parser:
/// an unclosed `<` is left in place.
pub fn strip_tags(raw: &str) -> String {
    TAG_PATTERN.replace_all(raw, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_key() {
        assert_eq!(to_key("1 Corinthians 13:4"), "1_Corinthians_13.4");
        assert_eq!(to_key("Romans 8:28"), "Romans_8.28");
    }

    #[test]
    fn test_to_key_idempotent() {
        let once = to_key("Song of Solomon 2:4");
        assert_eq!(to_key(&once), once);
    }

    #[test]
    fn test_to_key_preserves_case() {
        assert_ne!(to_key("John 1:1"), to_key("john 1:1"));
    }

    #[test]
    fn test_to_display_name_ordinals() {
        assert_eq!(
            to_display_name("1 Corinthians 13:4"),
            "First  Corinthians 13, 4"
        );
        assert_eq!(to_display_name("2 Timothy 1:7"), "Second  Timothy 1, 7");
        assert_eq!(to_display_name("3 John 1:2"), "Third  John 1, 2");
        assert_eq!(to_display_name("4 Kings 1:1"), "Fourth  Kings 1, 1");
    }

    #[test]
    fn test_to_display_name_pass_through() {
        assert_eq!(to_display_name("Romans 8:28"), "Romans 8, 28");
        assert_eq!(to_display_name("5 Esdras 1:1"), "5 Esdras 1, 1");
        assert_eq!(to_display_name(""), "");
    }

    #[test]
    fn test_only_first_char_is_checked() {
        assert_eq!(to_display_name("Psalm 1:1"), "Psalm 1, 1");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags(r#"<span class="v1">Love is <b>patient</b></span>"#),
            "Love is patient"
        );
    }

    #[test]
    fn test_strip_tags_malformed() {
        assert_eq!(strip_tags("x <b>y</b> <"), "x y <");
        assert_eq!(strip_tags("a < b and <i>c"), "a c");
        assert_eq!(strip_tags("unclosed <tag"), "unclosed <tag");
        assert_eq!(strip_tags(""), "");
    }
}
