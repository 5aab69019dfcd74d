//! Text statistics over a received payload.
//!
//! Separators are the ASCII whitespace characters space, tab, newline,
//! form feed and carriage return. Everything else, including vertical tab
//! and Unicode spaces such as U+00A0, is an ordinary character. Counts are
//! in characters (code points), not bytes.

use std::collections::BTreeMap;

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split(is_separator).filter(|word| !word.is_empty()).count()
}

/// Number of non-whitespace characters.
pub fn char_count(text: &str) -> usize {
    text.chars().filter(|&c| !is_separator(c)).count()
}

/// Occurrences of each non-whitespace character, lower-cased.
///
/// The values always sum to `char_count(text)`.
pub fn char_frequencies(text: &str) -> BTreeMap<char, usize> {
    let mut freqs = BTreeMap::new();
    for c in text.chars().filter(|&c| !is_separator(c)) {
        *freqs.entry(fold_case(c)).or_insert(0) += 1;
    }
    freqs
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

/// Single-character lower-case mapping. Characters whose lower case form
/// expands to several characters ('İ') are counted as themselves.
fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words() {
        assert_eq!(word_count("  a   b\tc\n"), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("single"), 1);
        assert_eq!(word_count("line one\r\nline two"), 4);
    }

    #[test]
    fn chars() {
        assert_eq!(char_count("a b c"), 3);
        assert_eq!(char_count(""), 0);
        assert_eq!(char_count(" \t\n"), 0);
        assert_eq!(char_count("héllo wörld"), 10);
    }

    #[test]
    fn only_ascii_whitespace_separates() {
        assert_eq!(word_count("a\u{a0}b"), 1);
        assert_eq!(char_count("a\u{a0}b"), 3);
        assert_eq!(word_count("a\x0bb"), 1);
        assert_eq!(char_count("a\x0bb"), 3);
        assert_eq!(word_count("a\u{2028}b c"), 2);
        assert_eq!(word_count("a\x0cb"), 2);

        let freqs = char_frequencies("A\u{a0}a");
        assert_eq!(freqs[&'a'], 2);
        assert_eq!(freqs[&'\u{a0}'], 1);
    }

    #[test]
    fn frequencies_are_lower_cased() {
        let freqs = char_frequencies("AaBb");
        assert_eq!(freqs.len(), 2);
        assert_eq!(freqs[&'a'], 2);
        assert_eq!(freqs[&'b'], 2);
    }

    #[test]
    fn frequencies_sum_to_char_count() {
        for text in ["hello world hello", "Mixed CASE\ttext\n", "İstanbul ẞtraße", ""] {
            let total: usize = char_frequencies(text).values().sum();
            assert_eq!(total, char_count(text), "{text:?}");
        }
    }

    #[test]
    fn multi_char_lowercase_kept() {
        let freqs = char_frequencies("İi");
        assert_eq!(freqs[&'İ'], 1);
        assert_eq!(freqs[&'i'], 1);
    }
}
