//! Main entry point for the nestunzip CLI application.
//!
//! Problems with the input (missing flags, a bad archive, an unsafe entry)
//! are reported on standard output and the process still exits normally.

use anyhow::Result;
use clap::CommandFactory;
use log::LevelFilter;
use std::path::Path;
use tokio::fs;

use nestunzip::{Cli, ExtractOptions, Unzipper, plan};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args(std::env::args_os());
    init_logging(cli.verbose);

    let Some(src) = cli.src.as_deref() else {
        println!("Source zip file must be specified");
        print_usage()?;
        return Ok(());
    };

    let Some(dest) = cli.dest.as_deref() else {
        println!("Destination directory must be specified");
        print_usage()?;
        return Ok(());
    };

    let options = cli.extract_options();

    if cli.list {
        if let Err(err) = list_entries(src, dest, &options).await {
            println!("Error: {err:#}");
        }
        return Ok(());
    }

    if let Err(err) = fs::create_dir_all(dest).await {
        println!("Error creating destination directory: {err}");
        return Ok(());
    }

    match Unzipper::new(options).extract(src, dest).await {
        Ok(summary) => {
            log::info!(
                "{} files, {} written, {} nested archives expanded",
                summary.files_extracted,
                format_size(summary.bytes_written),
                summary.archives_expanded
            );
            if !cli.quiet {
                println!("Successfully unzipped to {}", dest.display());
            }
        }
        Err(err) => println!("Error: {err:#}"),
    }

    Ok(())
}

/// `RUST_LOG` wins over `-verbose`; the default only shows warnings.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Print the entries `options` would extract from the top-level archive.
async fn list_entries(src: &Path, dest: &Path, options: &ExtractOptions) -> Result<()> {
    let planned = plan(src, dest, options).await?;

    println!(
        "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
        "Length", "Size", "Cmpr", "Date", "Time"
    );
    println!("{}", "-".repeat(70));

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for (entry, _) in &planned {
        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            ratio(entry.compressed_size, entry.uncompressed_size),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        total_uncompressed += entry.uncompressed_size;
        total_compressed += entry.compressed_size;
    }

    println!("{}", "-".repeat(70));
    println!(
        "{:>10}  {:>10}  {}  {:>21}  {} files",
        total_uncompressed,
        total_compressed,
        ratio(total_compressed, total_uncompressed),
        "",
        planned.len()
    );

    Ok(())
}

/// Space saved by compression, as a right-aligned percentage.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
