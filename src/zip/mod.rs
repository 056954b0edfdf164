//! ZIP archive parsing and entry decoding.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: Entry listing and content streams
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE compression methods
//! - Unix permission bits from the external attributes
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No CRC-32 verification

mod extractor;
mod parser;
mod structures;

pub use extractor::{EntryReader, ZipExtractor};
pub use parser::ZipParser;
pub use structures::*;
