//! # Dict Upcase
//!
//! Streaming text transformer: every word present in a dictionary is
//! rewritten in upper case, everything else passes through unchanged, and the
//! result is split across numbered output files bounded by a line count.
//!
//! ## Features
//!
//! - **Streaming**: input is read in fixed-size blocks, never loaded whole
//! - **Boundary safe**: words split between blocks are still recognized
//! - **Sentence-aware rotation**: output files are only cut after `.`, `!` or `?`
//! - **Legacy encodings**: windows-1251 by default, any `encoding_rs` label, or detection
//!
//! ## Usage
//!
//! ```bash
//! # Writes out/result1.txt, out/result2.txt, ...
//! dict-upcase -d dictionary.txt -i text.txt -o out/result
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use dict_upcase::processor::{HandlerConfig, UppercaseHandler};
//! use std::path::Path;
//!
//! let handler = UppercaseHandler::new(HandlerConfig {
//!     max_lines: 100,
//!     encoding: encoding_rs::UTF_8,
//!     ..HandlerConfig::default()
//! });
//!
//! let stats = handler
//!     .process(Path::new("dict.txt"), Path::new("text.txt"), Path::new("out/result"))
//!     .unwrap();
//! println!("{} files written", stats.output_files.len());
//! ```

pub mod cli;
pub mod dictionary;
pub mod encoding;
pub mod error;
pub mod output;
pub mod processor;
pub mod progress;
pub mod registry;
pub mod transform;

pub use cli::Args;
pub use error::{HandlerError, Result};
pub use processor::{run, HandlerConfig, UppercaseHandler};
pub use registry::{HandlerRegistry, TextHandler};
