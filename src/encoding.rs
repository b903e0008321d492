//! Encoding detection, decoding and block reading
//!
//! Text is read in a legacy single-byte encoding (windows-1251 by default),
//! decoded to UTF-8 for processing and encoded back on output.

use crate::error::{FileKind, HandlerError, Result};

use chardetng::EncodingDetector;
use encoding_rs::{CoderResult, Decoder, Encoding};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Label of the encoding used when none is configured
pub const DEFAULT_ENCODING_LABEL: &str = "windows-1251";

/// Label that asks for detection from the input file
pub const AUTO_ENCODING_LABEL: &str = "auto";

/// Bytes sampled for encoding detection
const DETECTION_SAMPLE: usize = 64 * 1024;

/// Resolve an encoding label, detecting from `sample` when the label is `auto`
pub fn resolve_encoding(label: &str, sample: &Path) -> Result<&'static Encoding> {
    if label.eq_ignore_ascii_case(AUTO_ENCODING_LABEL) {
        return detect_encoding(sample);
    }

    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| HandlerError::Configuration(format!("Unknown encoding '{}'", label)))
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> Result<&'static Encoding> {
    let read_failure = |source| HandlerError::InputReadFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_failure)?;
    let mut sample = Vec::with_capacity(DETECTION_SAMPLE);
    file.take(DETECTION_SAMPLE as u64)
        .read_to_end(&mut sample)
        .map_err(read_failure)?;

    if let Some((encoding, _)) = Encoding::for_bom(&sample) {
        return Ok(encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    let encoding = detector.guess(None, true);
    log::debug!("Detected encoding {} for {:?}", encoding.name(), path);

    Ok(encoding)
}

/// Fail with `InputTooLarge` when the file exceeds `limit` bytes
pub fn check_size(path: &Path, limit: u64, kind: FileKind) -> Result<u64> {
    let size = fs::metadata(path)
        .map_err(|source| HandlerError::InputReadFailure {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if size > limit {
        return Err(HandlerError::InputTooLarge {
            kind,
            path: path.to_path_buf(),
            size,
            limit,
        });
    }

    Ok(size)
}

/// Read and decode a whole file after checking it against the size ceiling
pub fn read_to_string(
    path: &Path,
    encoding: &'static Encoding,
    limit: u64,
    kind: FileKind,
) -> Result<String> {
    check_size(path, limit, kind)?;

    let bytes = fs::read(path).map_err(|source| HandlerError::InputReadFailure {
        path: path.to_path_buf(),
        source,
    })?;

    let (decoded, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        log::warn!(
            "Encoding errors in {:?} ({}), using lossy conversion",
            path,
            used.name()
        );
    }

    Ok(decoded.into_owned())
}

/// One decoded chunk of the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Decoded text
    pub text: String,
    /// Raw bytes consumed from the input
    pub bytes: usize,
}

/// Single-pass reader producing fixed-size decoded blocks.
///
/// Each block is decoded from `block_size` raw bytes, which is exactly
/// `block_size` characters for single-byte encodings. The final block may be
/// shorter. A read failure is yielded once as `InputReadFailure`, after which
/// the source is fused.
pub struct BlockSource<R: Read = BufReader<File>> {
    reader: R,
    path: PathBuf,
    decoder: Decoder,
    raw: Vec<u8>,
    text_capacity: usize,
    finished: bool,
}

impl BlockSource {
    /// Open `path`, enforcing the size ceiling before any block is produced
    pub fn open(
        path: &Path,
        encoding: &'static Encoding,
        block_size: usize,
        max_bytes: u64,
    ) -> Result<Self> {
        check_size(path, max_bytes, FileKind::Text)?;

        let file = File::open(path).map_err(|source| HandlerError::InputReadFailure {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file), path, encoding, block_size)
    }
}

impl<R: Read> BlockSource<R> {
    /// Wrap an arbitrary reader; `path` only labels errors
    pub fn from_reader(
        reader: R,
        path: &Path,
        encoding: &'static Encoding,
        block_size: usize,
    ) -> Result<Self> {
        if block_size == 0 {
            return Err(HandlerError::Configuration(
                "Block size must be at least 1".to_string(),
            ));
        }

        let decoder = encoding.new_decoder();
        let text_capacity = decoder.max_utf8_buffer_length(block_size).ok_or_else(|| {
            HandlerError::Configuration(format!("Block size {} is too large", block_size))
        })?;

        Ok(Self {
            reader,
            path: path.to_path_buf(),
            decoder,
            raw: vec![0u8; block_size],
            text_capacity,
            finished: false,
        })
    }

    /// Fill the raw buffer, stopping short only at end of file
    fn fill(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < self.raw.len() {
            match self.reader.read(&mut self.raw[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for BlockSource<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let filled = match self.fill() {
            Ok(n) => n,
            Err(source) => {
                self.finished = true;
                return Some(Err(HandlerError::InputReadFailure {
                    path: self.path.clone(),
                    source,
                }));
            }
        };

        let last = filled < self.raw.len();
        if last {
            self.finished = true;
        }

        // the bound can change once the decoder has sniffed a BOM
        let capacity = self
            .decoder
            .max_utf8_buffer_length(filled)
            .unwrap_or(self.text_capacity);
        let mut text = String::with_capacity(capacity);
        let (result, read, had_errors) = self
            .decoder
            .decode_to_string(&self.raw[..filled], &mut text, last);
        debug_assert_eq!(result, CoderResult::InputEmpty);
        debug_assert_eq!(read, filled);
        if had_errors {
            log::warn!("Encoding errors in {:?}, using lossy conversion", self.path);
        }

        if text.is_empty() && last {
            return None;
        }

        Some(Ok(Block {
            text,
            bytes: filled,
        }))
    }
}

/// Encode text for output, logging characters the encoding cannot represent
pub fn encode<'a>(encoding: &'static Encoding, text: &'a str) -> std::borrow::Cow<'a, [u8]> {
    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        log::warn!(
            "Characters not representable in {}, written as character references",
            encoding.name()
        );
    }
    bytes
}
