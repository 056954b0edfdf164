//! # nestunzip
//!
//! Extract the entries of a zip archive whose names contain a substring,
//! unpacking any zip archives found among them along the way.
//!
//! ## Features
//!
//! - Substring filtering on entry names (an empty pattern matches everything)
//! - Recursive extraction of nested `.zip` entries, which are removed once
//!   unpacked, with a configurable depth limit
//! - Zip-slip protection: entries can never be written outside the
//!   destination directory
//! - Flattened output by default, or the archive's own layout on request
//! - STORED and DEFLATE entries, ZIP64 archives
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = nestunzip::unzip(Path::new("logs.zip"), Path::new("out"), ".log").await?;
//!     println!("{} files extracted", summary.files_extracted);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod path;
pub mod unzip;
pub mod zip;

pub use cli::Cli;
pub use error::UnzipError;
pub use io::{LocalFileReader, ReadAt};
pub use path::{PathLayout, clean_path, resolve_destination};
pub use unzip::{DEFAULT_MAX_DEPTH, ExtractOptions, ExtractionSummary, Unzipper, plan, unzip};
pub use zip::{EntryReader, ZipExtractor, ZipFileEntry};
