//! Progress display module
//!
//! Styled console output, the input progress bar and the run summary.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║   DICT-UPCASE  ·  dictionary words to upper case             ║
║   streaming · line-bounded output files · legacy encodings   ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
        .map(|s| s.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Statistics of one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Output files in sequence order
    pub output_files: Vec<PathBuf>,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Newlines written across all output files
    pub lines_written: u64,
    pub words_seen: u64,
    pub words_upcased: u64,
    /// Longest buffer handed to the transformer, in bytes
    pub peak_buffer: usize,
    pub elapsed: Duration,
}

impl RunStats {
    /// Print final statistics
    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    PROCESSING COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!("  {} {}", "Output files:   ".green(), self.output_files.len());
        for path in &self.output_files {
            print_bullet(&format!("{:?}", path));
        }
        println!();

        println!("  {} {}", "Data read:      ".green(), ByteSize(self.bytes_read));
        println!("  {} {}", "Data written:   ".green(), ByteSize(self.bytes_written));
        println!("  {} {}", "Lines written:  ".green(), format_number(self.lines_written));
        println!("  {} {}", "Words seen:     ".green(), format_number(self.words_seen));
        println!(
            "  {} {}",
            "Upper-cased:    ".green().bold(),
            format_number(self.words_upcased).green().bold()
        );

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed));
        println!("{}", "═".repeat(60).green());
    }
}

/// Format a number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
