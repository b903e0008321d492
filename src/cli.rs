//! Command-line interface definition for dict-upcase
//!
//! Provides argument parsing and validation for the transformation tool.

use clap::Parser;
use std::path::PathBuf;

use crate::encoding::DEFAULT_ENCODING_LABEL;
use crate::registry::UPPERCASE_HANDLER;

/// Upper-case dictionary words in a text and split the result into files
///
/// Every word of the input found in the dictionary (case-insensitive) is
/// written in upper case; all other characters pass through unchanged.
/// Output goes to `<output><N><extension>`, a new file being started at the
/// first sentence end once the line limit is reached.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dict-upcase",
    version,
    about = "Upper-case dictionary words and split output into line-bounded files",
    long_about = r#"
Reads a dictionary (one word per line) and a text file, both in a legacy
single-byte encoding (windows-1251 by default). Every dictionary word in the
text is written in upper case. The result is split into numbered files
(result1.txt, result2.txt, ...); a file is closed at the first '.', '!' or '?'
once it holds the maximum number of lines.

EXAMPLES:
    # Reference settings: 500 lines per file, 2MB input limit
    dict-upcase -d dictionary.txt -i text.txt -o out/result

    # UTF-8 text, 100 lines per file, no extension
    dict-upcase -d words.txt -i book.txt -o book_part --encoding utf-8 --max-lines 100 --extension ""

    # Let the input decide its encoding
    dict-upcase -d words.txt -i book.txt -o part --encoding auto
"#
)]
pub struct Args {
    /// Dictionary file, one word per line
    #[arg(short, long, value_name = "PATH")]
    pub dictionary: PathBuf,

    /// Input text file
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output base name; files are written as <OUTPUT><N><EXTENSION>
    #[arg(short, long, value_name = "BASE")]
    pub output: PathBuf,

    /// Extension of the output files
    #[arg(long, value_name = "EXT", default_value = "txt")]
    pub extension: String,

    /// Lines per output file before rotating at the next sentence end
    #[arg(long, value_name = "NUM", default_value_t = 500)]
    pub max_lines: usize,

    /// Characters read from the input per block
    #[arg(long, value_name = "NUM", default_value_t = 500)]
    pub block_size: usize,

    /// Size ceiling for the dictionary and input files (e.g. "2MB", "512KB")
    #[arg(long, value_name = "SIZE", default_value = "2MB")]
    pub max_size: String,

    /// Text encoding label, or "auto" to detect from the input
    #[arg(short, long, value_name = "LABEL", default_value = DEFAULT_ENCODING_LABEL)]
    pub encoding: String,

    /// Handler to run
    #[arg(long, value_name = "NAME", default_value = UPPERCASE_HANDLER)]
    pub handler: String,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse the size ceiling to bytes
    pub fn parse_max_size(&self) -> anyhow::Result<u64> {
        parse_size(&self.max_size)
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<u64> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    Ok(num * multiplier)
}
