//! Core processing engine
//!
//! Wires the dictionary, block source, transformer and output rotator into a
//! single run: load dictionary, open the input, rotate output until the input
//! is exhausted.

use crate::cli::Args;
use crate::dictionary::Dictionary;
use crate::encoding::{self, BlockSource};
use crate::error::{HandlerError, Result};
use crate::output::{ensure_output_dir, OutputRotator};
use crate::progress::{create_bytes_progress_bar, RunStats};
use crate::registry::TextHandler;
use crate::transform::Transformer;

use encoding_rs::Encoding;
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Characters per input block
pub const DEFAULT_BLOCK_SIZE: usize = 500;

/// Line threshold per output file
pub const DEFAULT_MAX_LINES: usize = 500;

/// Size ceiling for the dictionary and input files (2 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 2 * 1024 * 1024;

/// Extension appended to every output file
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Handler configuration
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub block_size: usize,
    pub max_lines: usize,
    pub max_input_bytes: u64,
    pub encoding: &'static Encoding,
    pub extension: String,
    pub quiet: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_lines: DEFAULT_MAX_LINES,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            encoding: encoding_rs::WINDOWS_1251,
            extension: DEFAULT_EXTENSION.to_string(),
            quiet: true,
        }
    }
}

impl HandlerConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        // `auto` samples the input, so a missing file must be caught first
        require_file(&args.input, "Input")?;

        let config = Self {
            block_size: args.block_size,
            max_lines: args.max_lines,
            max_input_bytes: args.parse_max_size()?,
            encoding: encoding::resolve_encoding(&args.encoding, &args.input)?,
            extension: args.extension.clone(),
            quiet: args.quiet,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(HandlerError::Configuration(
                "Block size must be at least 1".to_string(),
            ));
        }
        if self.max_lines == 0 {
            return Err(HandlerError::Configuration(
                "Maximum line count must be at least 1".to_string(),
            ));
        }
        if self.max_input_bytes == 0 {
            return Err(HandlerError::Configuration(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Upper-cases dictionary words and splits the result into numbered files
pub struct UppercaseHandler {
    config: HandlerConfig,
}

impl UppercaseHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }

    /// Run one transformation
    pub fn process(&self, dictionary: &Path, input: &Path, output_base: &Path) -> Result<RunStats> {
        let started = Instant::now();
        self.config.validate()?;
        require_file(dictionary, "Dictionary")?;
        require_file(input, "Input")?;
        if output_base.file_name().is_none() {
            return Err(HandlerError::Configuration(format!(
                "Output base {:?} does not name a file",
                output_base
            )));
        }

        let dictionary =
            Dictionary::load(dictionary, self.config.encoding, self.config.max_input_bytes)?;

        let blocks = BlockSource::open(
            input,
            self.config.encoding,
            self.config.block_size,
            self.config.max_input_bytes,
        )?;

        if let Some(parent) = output_base.parent() {
            ensure_output_dir(parent)?;
        }

        let transformer = Transformer::new(&dictionary, self.config.max_lines)?;
        let rotator = OutputRotator::new(
            output_base.to_path_buf(),
            &self.config.extension,
            self.config.encoding,
            &transformer,
        )
        .with_progress(self.progress_bar(input));

        log::info!(
            "Processing {:?} into {:?}* ({} lines per file, {})",
            input,
            output_base,
            self.config.max_lines,
            self.config.encoding.name()
        );

        let mut stats = rotator.run(blocks)?;
        stats.elapsed = started.elapsed();

        log::info!(
            "Wrote {} output file(s), {} words upper-cased",
            stats.output_files.len(),
            stats.words_upcased
        );
        Ok(stats)
    }

    fn progress_bar(&self, input: &Path) -> ProgressBar {
        if self.config.quiet {
            return ProgressBar::hidden();
        }
        let total = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        create_bytes_progress_bar(total, "Processing...")
    }
}

impl TextHandler for UppercaseHandler {
    fn name(&self) -> &'static str {
        crate::registry::UPPERCASE_HANDLER
    }

    fn run(&self, dictionary: &Path, input: &Path, output_base: &Path) -> Result<RunStats> {
        self.process(dictionary, input, output_base)
    }
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(HandlerError::Configuration(format!("{} path is empty", what)));
    }
    if !path.is_file() {
        return Err(HandlerError::Configuration(format!(
            "{} file not found: {:?}",
            what, path
        )));
    }
    Ok(())
}

/// Run with the reference settings (windows-1251, 500-character blocks,
/// 500 lines per file, 2 MiB ceiling, `.txt` outputs)
pub fn run(dictionary: &Path, input: &Path, output_base: &Path) -> Result<RunStats> {
    UppercaseHandler::new(HandlerConfig::default()).process(dictionary, input, output_base)
}
