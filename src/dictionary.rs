//! Word dictionary
//!
//! A set of lowercase words loaded once per run from a word-list file
//! (one word per line) and read-only afterwards.

use crate::encoding;
use crate::error::{FileKind, HandlerError, Result};

use ahash::RandomState;
use encoding_rs::Encoding;
use hashbrown::HashSet;
use std::fmt;
use std::path::Path;

/// Set of words that get upper-cased in the output
#[derive(Clone)]
pub struct Dictionary {
    words: HashSet<String, RandomState>,
}

impl Dictionary {
    /// Load a word list, lowercasing every entry.
    ///
    /// Fails if the file cannot be read, is larger than `max_bytes`, or holds
    /// no words at all.
    pub fn load(path: &Path, encoding: &'static Encoding, max_bytes: u64) -> Result<Self> {
        let content = encoding::read_to_string(path, encoding, max_bytes, FileKind::Dictionary)?;
        let dictionary = Self::from_words(content.lines());

        if dictionary.is_empty() {
            return Err(HandlerError::DictionaryEmpty {
                path: path.to_path_buf(),
            });
        }

        log::info!("Loaded {} dictionary words from {:?}", dictionary.len(), path);
        Ok(dictionary)
    }

    /// Build from an iterator of words; blank entries are skipped
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self { words }
    }

    /// Case-insensitive membership test
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().all(|c| !c.is_uppercase()) {
            return self.words.contains(word);
        }
        self.words.contains(word.to_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &self.words.len())
            .finish()
    }
}
