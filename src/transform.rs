//! Tokenizing transformer
//!
//! Rewrites one buffer (carried remainder + fresh block) into output text,
//! upper-casing dictionary words and counting newlines. Processing stops right
//! after a sentence terminator once the line threshold is reached, handing the
//! unconsumed tail back to the caller.

use crate::dictionary::Dictionary;
use crate::error::{HandlerError, Result};

use regex::Regex;
use std::ops::Range;

/// Characters after which an output file may be cut
pub const SENTENCE_TERMINATORS: [char; 3] = ['?', '!', '.'];

/// Maximal runs between word boundaries
const WORD_PATTERN: &str = r"\b\S*\b";

#[inline]
pub fn is_sentence_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

/// Result of one transformer pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    /// Newlines written to the current output file so far
    pub lines: usize,
    /// A rotation point was reached
    pub rotate: bool,
    /// Unconsumed tail, to be prefixed onto the next block
    pub remainder: String,
    /// Word tokens written during this pass
    pub words: u64,
    /// Tokens written upper-cased
    pub upcased: u64,
}

/// Start of the trailing whitespace-free run, which may continue in the next block
fn open_tail_start(buffer: &str) -> usize {
    buffer
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Upper-cases dictionary words and detects rotation points
pub struct Transformer<'d> {
    dictionary: &'d Dictionary,
    words: Regex,
    max_lines: usize,
}

impl<'d> Transformer<'d> {
    pub fn new(dictionary: &'d Dictionary, max_lines: usize) -> Result<Self> {
        if max_lines == 0 {
            return Err(HandlerError::Configuration(
                "Maximum line count must be at least 1".to_string(),
            ));
        }

        let words = Regex::new(WORD_PATTERN).map_err(|e| {
            HandlerError::Configuration(format!("Invalid word pattern '{}': {}", WORD_PATTERN, e))
        })?;

        Ok(Self {
            dictionary,
            words,
            max_lines,
        })
    }

    /// Token spans for the whole buffer, computed once per pass
    fn token_spans(&self, buffer: &str) -> Vec<Range<usize>> {
        self.words
            .find_iter(buffer)
            .filter(|m| !m.is_empty())
            .map(|m| m.range())
            .collect()
    }

    /// Rotation is allowed once `threshold - 1` newlines are written, so a cut
    /// file holds at most `threshold` lines with the last one unterminated.
    #[inline]
    fn at_rotation_point(&self, lines: usize, written: char) -> bool {
        lines >= self.max_lines - 1 && is_sentence_terminator(written)
    }

    /// Transform `buffer` into `out`, starting from `lines` newlines already in
    /// the current output file.
    ///
    /// With `more_input` set, a trailing run without whitespace is left in the
    /// remainder unwritten, since the next block may extend it.
    pub fn transform(
        &self,
        buffer: &str,
        mut lines: usize,
        more_input: bool,
        out: &mut String,
    ) -> Pass {
        let end = if more_input {
            open_tail_start(buffer)
        } else {
            buffer.len()
        };
        let spans = self.token_spans(buffer);
        let mut next_span = 0;
        let mut words = 0;
        let mut upcased = 0;
        let mut pos = 0;
        let mut rotate = false;

        while pos < end {
            while next_span < spans.len() && spans[next_span].end <= pos {
                next_span += 1;
            }

            if let Some(span) = spans.get(next_span).filter(|s| s.start == pos) {
                let token = &buffer[span.clone()];
                words += 1;
                if self.dictionary.contains(token) {
                    out.push_str(&token.to_uppercase());
                    upcased += 1;
                } else {
                    out.push_str(token);
                }
                pos = span.end;
                next_span += 1;
                continue;
            }

            let Some(c) = buffer[pos..].chars().next() else {
                break;
            };
            out.push(c);
            pos += c.len_utf8();

            if c == '\n' {
                lines += 1;
            }

            if self.at_rotation_point(lines, c) {
                rotate = true;
                break;
            }
        }

        Pass {
            lines,
            rotate,
            remainder: buffer[pos..].to_string(),
            words,
            upcased,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(dict: &Dictionary, max_lines: usize, buffer: &str, lines: usize) -> (String, Pass) {
        let transformer = Transformer::new(dict, max_lines).unwrap();
        let mut out = String::new();
        let pass = transformer.transform(buffer, lines, false, &mut out);
        (out, pass)
    }

    #[test]
    fn test_dictionary_words_upcased() {
        let dict = Dictionary::from_words(["go"]);
        let (out, pass) = run(&dict, 500, "I go. You Go home.", 0);

        assert_eq!(out, "I GO. You GO home.");
        assert!(!pass.rotate);
        assert!(pass.remainder.is_empty());
        assert_eq!(pass.words, 5);
        assert_eq!(pass.upcased, 2);
    }

    #[test]
    fn test_words_outside_dictionary_untouched() {
        let dict = Dictionary::from_words(["go"]);
        let (out, _) = run(&dict, 500, "gone Going ago GO-KART", 0);

        assert_eq!(out, "gone Going ago GO-KART");
    }

    #[test]
    fn test_already_upcased_is_stable() {
        let dict = Dictionary::from_words(["home"]);
        let (first, _) = run(&dict, 500, "Home, HOME, home!", 0);
        let (second, _) = run(&dict, 500, &first, 0);

        assert_eq!(first, "HOME, HOME, HOME!");
        assert_eq!(second, first);
    }

    #[test]
    fn test_cyrillic_words() {
        let dict = Dictionary::from_words(["мир"]);
        let (out, _) = run(&dict, 500, "Миру мир! Мир.", 0);

        assert_eq!(out, "Миру МИР! МИР.");
    }

    #[test]
    fn test_leading_digits_written_once() {
        let dict = Dictionary::from_words(["3rd"]);
        let (out, _) = run(&dict, 500, "the 3rd and 4th", 0);

        assert_eq!(out, "the 3RD and 4th");
    }

    #[test]
    fn test_newlines_counted() {
        let dict = Dictionary::from_words(["x"]);
        let (_, pass) = run(&dict, 500, "a\nb\n\nc", 2);

        assert_eq!(pass.lines, 5);
    }

    #[test]
    fn test_rotation_after_terminator_at_threshold() {
        let dict = Dictionary::from_words(["x"]);
        // threshold 3: rotation needs two newlines, then a terminator
        let (out, pass) = run(&dict, 3, "one.\ntwo.\nthree. four.\nfive.", 0);

        assert_eq!(out, "one.\ntwo.\nthree.");
        assert_eq!(pass.lines, 2);
        assert!(pass.rotate);
        assert_eq!(pass.remainder, " four.\nfive.");
    }

    #[test]
    fn test_threshold_uses_carried_line_count() {
        let dict = Dictionary::from_words(["x"]);
        let (out, pass) = run(&dict, 3, "a! b?", 2);

        assert_eq!(out, "a!");
        assert!(pass.rotate);
        assert_eq!(pass.remainder, " b?");
    }

    #[test]
    fn test_no_rotation_without_terminator() {
        let dict = Dictionary::from_words(["x"]);
        let (out, pass) = run(&dict, 2, "a\nb\nc\nd", 0);

        assert_eq!(out, "a\nb\nc\nd");
        assert!(!pass.rotate);
        assert_eq!(pass.lines, 3);
    }

    #[test]
    fn test_terminator_inside_token_is_not_a_cut_point() {
        let dict = Dictionary::from_words(["x"]);
        let (out, pass) = run(&dict, 1, "e.g something", 0);

        assert_eq!(out, "e.g something");
        assert!(!pass.rotate);
    }

    #[test]
    fn test_empty_remainder_when_terminator_is_last() {
        let dict = Dictionary::from_words(["x"]);
        let (_, pass) = run(&dict, 1, "Done.", 0);

        assert!(pass.rotate);
        assert!(pass.remainder.is_empty());
    }

    #[test]
    fn test_open_tail_held_back_while_input_continues() {
        let dict = Dictionary::from_words(["boundary"]);
        let transformer = Transformer::new(&dict, 500).unwrap();
        let mut out = String::new();

        let first = transformer.transform("a boun", 0, true, &mut out);
        assert_eq!(out, "a ");
        assert!(!first.rotate);
        assert_eq!(first.remainder, "boun");

        let buffer = first.remainder + "dary case";
        let second = transformer.transform(&buffer, first.lines, false, &mut out);
        assert_eq!(out, "a BOUNDARY case");
        assert!(second.remainder.is_empty());
    }

    #[test]
    fn test_buffer_without_whitespace_is_fully_held_back() {
        let dict = Dictionary::from_words(["x"]);
        let transformer = Transformer::new(&dict, 1).unwrap();
        let mut out = String::new();

        let pass = transformer.transform("abc.def", 0, true, &mut out);
        assert!(out.is_empty());
        assert!(!pass.rotate);
        assert_eq!(pass.remainder, "abc.def");
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let dict = Dictionary::from_words(["x"]);
        assert!(matches!(
            Transformer::new(&dict, 0),
            Err(HandlerError::Configuration(_))
        ));
    }
}
