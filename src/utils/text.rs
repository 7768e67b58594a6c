//! Text measurement helpers shared by scoring, analysis, and validation

/// Number of whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Length in characters (not bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Sentences split on runs of `.`, `!`, `?`, ignoring empty fragments.
pub fn sentence_count(s: &str) -> usize {
    s.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

/// Paragraphs separated by a blank line, ignoring empty ones.
pub fn paragraph_count(s: &str) -> usize {
    s.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}

/// The first `n` words, lowercased and joined by single spaces.
pub fn first_words(s: &str, n: usize) -> String {
    s.split_whitespace()
        .take(n)
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ratio of distinct lowercased words to total words; 1.0 for empty input.
pub fn unique_word_ratio(s: &str) -> f64 {
    let words: Vec<String> = s.split_whitespace().map(|w| w.to_lowercase()).collect();
    if words.is_empty() {
        return 1.0;
    }
    let unique: std::collections::HashSet<&str> = words.iter().map(String::as_str).collect();
    unique.len() as f64 / words.len() as f64
}

/// Indefinite article for a noun phrase.
pub fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Uppercase the first character when it is a lowercase letter.
///
/// Returns the new text and whether anything changed.
pub fn capitalize_first(s: &str) -> (String, bool) {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(chars.as_str());
            (out, true)
        }
        _ => (s.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  write   blog \n"), 2);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count("No terminator"), 1);
        assert_eq!(sentence_count("..."), 0);
    }

    #[test]
    fn test_paragraph_count() {
        assert_eq!(paragraph_count("a\n\nb\n\n\n\nc"), 3);
        assert_eq!(paragraph_count("single line"), 1);
    }

    #[test]
    fn test_first_words_lowercases() {
        assert_eq!(first_words("Write A Short Blog Post About Rust", 5), "write a short blog post");
        assert_eq!(first_words("two words", 5), "two words");
    }

    #[test]
    fn test_unique_word_ratio() {
        assert!((unique_word_ratio("a a a a") - 0.25).abs() < f64::EPSILON);
        assert!((unique_word_ratio("") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_article() {
        assert_eq!(article("expert"), "an");
        assert_eq!(article("technical"), "a");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("use it"), ("Use it".to_string(), true));
        assert_eq!(capitalize_first("Use it"), ("Use it".to_string(), false));
        assert_eq!(capitalize_first("<tag>"), ("<tag>".to_string(), false));
        assert_eq!(capitalize_first(""), (String::new(), false));
    }
}
