use crate::models::Verse;

/// System role for commentary requests
pub const SYSTEM_PROMPT: &str =
    "You are a priest who provides brief commentary about how bible verses apply to our lives.";

/// Build the user message for one verse
pub fn build_commentary_prompt(verse: &Verse) -> String {
    format!(
        "Describe this bible verse using two sentences in the context of the holy bible: {}, {}",
        verse.display_name, verse.text
    )
}

/// Cut commentary down to at most `max_chars` characters, preferring the
/// last sentence end inside the budget.
pub fn truncate_commentary(commentary: &str, max_chars: usize) -> String {
    if commentary.chars().count() <= max_chars {
        return commentary.to_string();
    }

    let cut = commentary
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(commentary.len());
    let head = &commentary[..cut];

    match head.rfind(&['.', '!', '?'][..]) {
        Some(end) => head[..=end].to_string(),
        None => head.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commentary_prompt() {
        let verse = Verse::new("Romans_8.28", "Romans 8, 28", "And we know");
        let prompt = build_commentary_prompt(&verse);
        assert!(prompt.ends_with("Romans 8, 28, And we know"));
    }

    #[test]
    fn test_truncate_within_budget() {
        assert_eq!(truncate_commentary("Short.", 100), "Short.");
    }

    #[test]
    fn test_truncate_at_sentence_end() {
        let text = "First sentence. Second sentence runs long.";
        assert_eq!(truncate_commentary(text, 25), "First sentence.");
    }

    #[test]
    fn test_truncate_without_sentence_end() {
        assert_eq!(truncate_commentary("no punctuation here", 8), "no punct");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_commentary("ééééé", 3), "ééé");
    }
}
