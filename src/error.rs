//! Error types for dictionary upper-casing runs
//!
//! Every variant is fatal to the current run; nothing is retried.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which input file tripped a size ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Dictionary,
    Text,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Dictionary => f.write_str("Dictionary"),
            FileKind::Text => f.write_str("Text"),
        }
    }
}

/// The error type for every handler operation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A path or setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The dictionary file yielded no words.
    #[error("Dictionary {path:?} contains no words, processing aborted")]
    DictionaryEmpty { path: PathBuf },

    /// An input file is larger than the configured ceiling.
    #[error("{kind} file {path:?} is {size} bytes, exceeding the maximum of {limit} bytes")]
    InputTooLarge {
        kind: FileKind,
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    /// Reading an input failed, as opposed to reaching end of file.
    #[error("Failed to read {path:?}")]
    InputReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating, writing or flushing an output file failed.
    #[error("Failed to write output file {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Processing stopped after partial output; the in-progress file was removed.
    #[error("Processing aborted{}", removed_suffix(.removed))]
    AbortedProcessing {
        removed: Option<PathBuf>,
        #[source]
        source: Box<HandlerError>,
    },
}

fn removed_suffix(removed: &Option<PathBuf>) -> String {
    match removed {
        Some(path) => format!(", removed partial output {:?}", path),
        None => String::new(),
    }
}

/// A convenience `Result` alias using [`HandlerError`].
pub type Result<T> = std::result::Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_aborted_message_names_removed_file() {
        let err = HandlerError::AbortedProcessing {
            removed: Some(PathBuf::from("result3.txt")),
            source: Box::new(HandlerError::InputReadFailure {
                path: PathBuf::from("text.txt"),
                source: io::Error::new(io::ErrorKind::Other, "disk gone"),
            }),
        };

        assert_eq!(
            err.to_string(),
            "Processing aborted, removed partial output \"result3.txt\""
        );
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "Failed to read \"text.txt\"");
    }

    #[test]
    fn test_too_large_message() {
        let err = HandlerError::InputTooLarge {
            kind: FileKind::Text,
            path: PathBuf::from("big.txt"),
            size: 10,
            limit: 5,
        };
        assert_eq!(
            err.to_string(),
            "Text file \"big.txt\" is 10 bytes, exceeding the maximum of 5 bytes"
        );
    }
}
