//! Output management module
//!
//! Writes transformed text into sequentially numbered files
//! (`<base><N><ext>`, N from 1), rotating to the next file at the sentence
//! boundaries reported by the transformer.

use crate::encoding::{self, Block};
use crate::error::{HandlerError, Result};
use crate::progress::RunStats;
use crate::transform::Transformer;

use encoding_rs::Encoding;
use indicatif::ProgressBar;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for file writing
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Build `<base><sequence><extension>`
pub fn output_file_name(base: &Path, sequence: usize, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(sequence.to_string());
    if !extension.is_empty() {
        if !extension.starts_with('.') {
            name.push(".");
        }
        name.push(extension);
    }
    PathBuf::from(name)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path).map_err(|source| HandlerError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Buffered output file that encodes text on the way out
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    encoding: &'static Encoding,
    bytes_written: u64,
}

impl OutputWriter {
    /// Create (or truncate) the output file
    pub fn create(path: PathBuf, encoding: &'static Encoding) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| HandlerError::OutputWrite {
                path: path.clone(),
                source,
            })?;

        log::debug!("Opened output file {:?}", path);

        Ok(Self {
            writer: BufWriter::with_capacity(WRITE_BUFFER_SIZE, file),
            path,
            encoding,
            bytes_written: 0,
        })
    }

    pub fn write(&mut self, text: &str) -> Result<()> {
        let bytes = encoding::encode(self.encoding, text);
        self.writer
            .write_all(&bytes)
            .map_err(|source| HandlerError::OutputWrite {
                path: self.path.clone(),
                source,
            })?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Flush and close, returning the finished file's path
    pub fn finish(self) -> Result<PathBuf> {
        let OutputWriter { writer, path, .. } = self;

        let file = writer.into_inner().map_err(|e| HandlerError::OutputWrite {
            path: path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all().map_err(|source| HandlerError::OutputWrite {
            path: path.clone(),
            source,
        })?;

        log::debug!("Closed output file {:?}", path);
        Ok(path)
    }

    /// Close and delete a partially written file
    pub fn discard(self) -> PathBuf {
        let OutputWriter { writer, path, .. } = self;
        drop(writer);

        match fs::remove_file(&path) {
            Ok(()) => log::info!("Removed partial output {:?}", path),
            Err(e) => log::error!("Could not remove partial output {:?}: {}", path, e),
        }
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Drives the transformer over a block sequence, one output file at a time.
///
/// Files are opened lazily, so empty input produces no file and a rotation at
/// the very end of the input leaves no empty trailing file. When the block
/// source fails mid-stream the open file is deleted and the run fails with
/// `AbortedProcessing`; files finished earlier stay on disk.
pub struct OutputRotator<'a> {
    base: PathBuf,
    extension: String,
    encoding: &'static Encoding,
    transformer: &'a Transformer<'a>,
    progress: ProgressBar,
}

impl<'a> OutputRotator<'a> {
    pub fn new(
        base: PathBuf,
        extension: &str,
        encoding: &'static Encoding,
        transformer: &'a Transformer<'a>,
    ) -> Self {
        Self {
            base,
            extension: extension.to_string(),
            encoding,
            transformer,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance `progress` by the raw bytes of every block consumed
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    fn open_next(&self, sequence: &mut usize) -> Result<OutputWriter> {
        *sequence += 1;
        OutputWriter::create(
            output_file_name(&self.base, *sequence, &self.extension),
            self.encoding,
        )
    }

    fn close(writer: OutputWriter, stats: &mut RunStats) -> Result<()> {
        let bytes = writer.bytes_written();
        let path = writer.path().to_path_buf();

        match writer.finish() {
            Ok(path) => {
                stats.bytes_written += bytes;
                stats.output_files.push(path);
                Ok(())
            }
            Err(e) => {
                log::error!("Processing aborted: {}", e);
                if let Err(rm) = fs::remove_file(&path) {
                    log::error!("Could not remove partial output {:?}: {}", path, rm);
                }
                Err(HandlerError::AbortedProcessing {
                    removed: Some(path),
                    source: Box::new(e),
                })
            }
        }
    }

    fn abort(current: Option<OutputWriter>, cause: HandlerError) -> HandlerError {
        log::error!("Processing aborted: {}", cause);
        HandlerError::AbortedProcessing {
            removed: current.map(OutputWriter::discard),
            source: Box::new(cause),
        }
    }

    /// Consume `blocks`, writing every output file in turn.
    ///
    /// The progress bar is finished whichever way the run ends.
    pub fn run<I>(&self, blocks: I) -> Result<RunStats>
    where
        I: IntoIterator<Item = Result<Block>>,
    {
        let result = self.drive(blocks.into_iter());
        self.progress.finish_and_clear();
        result
    }

    fn drive<I>(&self, mut blocks: I) -> Result<RunStats>
    where
        I: Iterator<Item = Result<Block>>,
    {
        let mut stats = RunStats::default();
        let mut current: Option<OutputWriter> = None;
        let mut sequence = 0;
        let mut lines = 0;
        let mut remainder = String::new();
        let mut exhausted = false;
        // set after a rotation: the remainder is transformed alone before the
        // next block is pulled, keeping the buffer within one block plus the tail
        let mut draining: Option<bool> = None;
        let mut out = String::new();

        loop {
            let (buffer, more_input) = if let Some(more_input) = draining.take() {
                (std::mem::take(&mut remainder), more_input)
            } else if exhausted {
                // the final buffer is the remainder alone, once blocks run out
                if remainder.is_empty() {
                    break;
                }
                (std::mem::take(&mut remainder), false)
            } else {
                match blocks.next() {
                    None => {
                        exhausted = true;
                        continue;
                    }
                    Some(Err(e)) => return Err(Self::abort(current, e)),
                    Some(Ok(block)) => {
                        stats.bytes_read += block.bytes as u64;
                        self.progress.inc(block.bytes as u64);
                        let mut buffer = std::mem::take(&mut remainder);
                        buffer.push_str(&block.text);
                        (buffer, true)
                    }
                }
            };

            if buffer.is_empty() {
                continue;
            }
            stats.peak_buffer = stats.peak_buffer.max(buffer.len());

            let mut writer = match current.take() {
                Some(writer) => writer,
                None => self.open_next(&mut sequence)?,
            };

            out.clear();
            let pass = self.transformer.transform(&buffer, lines, more_input, &mut out);
            stats.words_seen += pass.words;
            stats.words_upcased += pass.upcased;

            if let Err(e) = writer.write(&out) {
                return Err(Self::abort(Some(writer), e));
            }

            remainder = pass.remainder;
            if pass.rotate {
                log::info!("Rotating {:?} after {} lines", writer.path(), pass.lines);
                stats.lines_written += pass.lines as u64;
                Self::close(writer, &mut stats)?;
                lines = 0;
                if !remainder.is_empty() {
                    draining = Some(more_input);
                }
            } else {
                lines = pass.lines;
                current = Some(writer);
            }
        }

        if let Some(writer) = current.take() {
            stats.lines_written += lines as u64;
            Self::close(writer, &mut stats)?;
        }

        Ok(stats)
    }
}
