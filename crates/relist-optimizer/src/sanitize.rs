//! Post-processing of model output.
//!
//! Models wrap answers in code fences or quotes regardless of
//! instructions, and denylisted words survive prompt-level bans often
//! enough that the denylist is enforced mechanically here as well.

use regex::RegexBuilder;

/// Full response cleanup: strip a Markdown code-fence wrapper, strip one
/// layer of surrounding quotes, then remove every denylisted word.
#[must_use]
pub fn clean_response(raw: &str, negative_words: &[String]) -> String {
    let text = strip_code_fences(raw.trim());
    let text = strip_wrapping_quotes(text.trim());
    strip_negative_words(text, negative_words)
}

/// Removes a Markdown code-fence wrapper (```lang ... ```), if present.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, body)) if !first_line.contains(' ') => body.trim_matches('\n'),
        _ => inner.trim_matches('\n'),
    }
}

/// Removes exactly one layer of matching surrounding quote characters.
fn strip_wrapping_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}'), ('\u{2018}', '\u{2019}')];
    for (open, close) in PAIRS {
        if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
            let mut chars = text.chars();
            chars.next();
            chars.next_back();
            return chars.as_str();
        }
    }
    text
}

/// Removes every denylisted word, case-insensitively and whole-word
/// only, collapsing the doubled spaces the removal leaves behind.
///
/// Whole-word matching means a denylist entry of `"drop"` does not
/// touch `"dropshipping"`.
#[must_use]
pub fn strip_negative_words(text: &str, words: &[String]) -> String {
    let mut result = text.to_string();

    for word in words {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            continue;
        }
        let pattern = format!(r"\b{}\b", regex::escape(trimmed));
        let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
            // regex::escape produces valid patterns; this arm is unreachable
            // for any denylist entry, but a denylist must never panic a run.
            continue;
        };
        result = re.replace_all(&result, "").into_owned();
    }

    collapse_spaces(&result)
}

/// Collapses runs of spaces/tabs left by word removal and trims each line.
fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_was_space = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !previous_was_space {
                out.push(' ');
            }
            previous_was_space = true;
        } else {
            previous_was_space = false;
            out.push(ch);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn strips_code_fence_with_language_tag() {
        let cleaned = clean_response("```html\n<p>Hello</p>\n```", &[]);
        assert_eq!(cleaned, "<p>Hello</p>");
    }

    #[test]
    fn strips_bare_code_fence() {
        let cleaned = clean_response("```\nNew Title\n```", &[]);
        assert_eq!(cleaned, "New Title");
    }

    #[test]
    fn strips_one_layer_of_quotes() {
        assert_eq!(clean_response("\"New Title\"", &[]), "New Title");
        assert_eq!(clean_response("'New Title'", &[]), "New Title");
    }

    #[test]
    fn strips_only_one_quote_layer() {
        assert_eq!(clean_response("\"\"Nested\"\"", &[]), "\"Nested\"");
    }

    #[test]
    fn unwrapped_text_passes_through() {
        assert_eq!(clean_response("Plain title", &[]), "Plain title");
    }

    #[test]
    fn partial_word_match_is_not_stripped() {
        let cleaned = strip_negative_words("Dropshipping is great", &words(&["drop"]));
        assert_eq!(cleaned, "Dropshipping is great");
    }

    #[test]
    fn whole_word_match_is_stripped_case_insensitively() {
        let cleaned = strip_negative_words("Dropshipping is great", &words(&["dropshipping"]));
        assert_eq!(cleaned, "is great");
    }

    #[test]
    fn removal_in_the_middle_collapses_to_single_space() {
        let cleaned = strip_negative_words("great cheap product", &words(&["cheap"]));
        assert_eq!(cleaned, "great product");
    }

    #[test]
    fn multiple_words_are_all_stripped() {
        let cleaned = strip_negative_words(
            "A cheap knockoff of a premium item",
            &words(&["cheap", "knockoff"]),
        );
        assert_eq!(cleaned, "A of a premium item");
    }

    #[test]
    fn empty_denylist_leaves_text_alone() {
        assert_eq!(strip_negative_words("anything goes", &[]), "anything goes");
    }

    #[test]
    fn blank_denylist_entries_are_ignored() {
        let cleaned = strip_negative_words("keep all of this", &words(&["", "  "]));
        assert_eq!(cleaned, "keep all of this");
    }

    #[test]
    fn fence_quote_and_denylist_compose() {
        let cleaned = clean_response("```\n\"A cheap shirt\"\n```", &words(&["cheap"]));
        assert_eq!(cleaned, "A shirt");
    }
}
