//! Dict Upcase - upper-case dictionary words and split text into files
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use dict_upcase::cli::Args;
use dict_upcase::processor::HandlerConfig;
use dict_upcase::progress::{
    print_banner, print_error, print_header, print_info, print_success, print_warning,
};
use dict_upcase::registry::HandlerRegistry;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let config = HandlerConfig::from_args(&args)?;

    if !args.quiet && args.verbose {
        print_config(&args, &config);
    }

    let registry = HandlerRegistry::with_builtins();
    let handler = registry.create(&args.handler, &config)?;

    if !args.quiet {
        print_header(&format!("Running {}...", handler.name()));
    }

    let stats = handler.run(&args.dictionary, &args.input, &args.output)?;

    if !args.quiet {
        if stats.output_files.is_empty() {
            print_warning("Input was empty, no output files written");
        } else {
            print_success(&format!("{} output file(s) written", stats.output_files.len()));
        }
        stats.print_summary();
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, config: &HandlerConfig) {
    print_header("Configuration");

    print_info(&format!("Dictionary:   {:?}", args.dictionary));
    print_info(&format!("Input:        {:?}", args.input));
    print_info(&format!("Output base:  {:?}", args.output));
    print_info(&format!("Extension:    {:?}", config.extension));
    print_info(&format!("Max lines:    {}", config.max_lines));
    print_info(&format!("Block size:   {}", config.block_size));
    print_info(&format!("Max size:     {} bytes", config.max_input_bytes));
    print_info(&format!("Encoding:     {}", config.encoding.name()));
}
