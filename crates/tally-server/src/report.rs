use std::collections::BTreeMap;
use std::fmt;

use crate::stats::{char_count, char_frequencies, word_count};

/// Statistics sent back to the client.
///
/// ```text
/// Word Count: 3 | Char Count: 15
/// Character Frequencies
/// d: 1/15
/// e: 2/15
/// ...
/// ```
///
/// Frequency lines are ordered by character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub words: usize,
    pub chars: usize,
    pub frequencies: BTreeMap<char, usize>,
}

impl Report {
    pub fn from_text(text: &str) -> Self {
        Self {
            words: word_count(text),
            chars: char_count(text),
            frequencies: char_frequencies(text),
        }
    }

    /// Invalid UTF-8 sequences count as U+FFFD.
    pub fn from_payload(payload: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(payload))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Word Count: {} | Char Count: {}", self.words, self.chars)?;
        writeln!(f, "Character Frequencies")?;
        for (c, count) in &self.frequencies {
            writeln!(f, "{}: {}/{}", c, count, self.chars)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_report() {
        let report = Report::from_text("hello world hello\n");
        assert_eq!(report.words, 3);
        assert_eq!(report.chars, 15);

        let expected = "Word Count: 3 | Char Count: 15\n\
                        Character Frequencies\n\
                        d: 1/15\n\
                        e: 2/15\n\
                        h: 2/15\n\
                        l: 5/15\n\
                        o: 3/15\n\
                        r: 1/15\n\
                        w: 1/15\n";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn whitespace_only_report() {
        let report = Report::from_text(" \n\t ");
        assert_eq!(
            report.to_string(),
            "Word Count: 0 | Char Count: 0\nCharacter Frequencies\n"
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let report = Report::from_payload(b"ab\xFFcd");
        assert_eq!(report.words, 1);
        assert_eq!(report.chars, 5);
        assert_eq!(report.frequencies[&char::REPLACEMENT_CHARACTER], 1);
    }
}
