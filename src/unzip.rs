//! Recursive pattern-filtered extraction.
//!
//! Every entry whose name contains the pattern is written below the
//! destination directory. Entries ending in the nested suffix (`.zip` by
//! default) are extracted in turn into the same directory and then removed.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::UnzipError;
use crate::io::LocalFileReader;
use crate::path::{PathLayout, resolve_destination};
use crate::zip::{EntryReader, ZipExtractor, ZipFileEntry};

/// Default limit on how many archives deep extraction may go.
pub const DEFAULT_MAX_DEPTH: usize = 32;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Extraction settings.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Literal substring an entry name must contain; empty matches all.
    pub pattern: String,
    /// Deepest nested archive allowed; the source archive is depth 0.
    pub max_depth: usize,
    pub layout: PathLayout,
    /// Entry names ending with this are treated as nested archives.
    pub nested_suffix: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            layout: PathLayout::Flatten,
            nested_suffix: ".zip".to_string(),
        }
    }
}

impl ExtractOptions {
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry_name: &str) -> bool {
        entry_name.contains(&self.pattern)
    }
}

/// Totals accumulated over a whole extraction, nested archives included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Files written, nested archives included.
    pub files_extracted: usize,
    pub bytes_written: u64,
    /// Nested archives recursed into and removed.
    pub archives_expanded: usize,
}

/// Recursive extractor.
pub struct Unzipper {
    options: ExtractOptions,
}

impl Unzipper {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Extract `src` into `dest`, which must already exist.
    ///
    /// The first failure aborts the whole run, including every enclosing
    /// nested archive. Files written before the failure are left in place.
    pub async fn extract(&self, src: &Path, dest: &Path) -> Result<ExtractionSummary> {
        let mut summary = ExtractionSummary::default();
        self.extract_archive(src, dest, 0, &mut summary).await?;
        Ok(summary)
    }

    fn extract_archive<'a>(
        &'a self,
        src: &'a Path,
        dest: &'a Path,
        depth: usize,
        summary: &'a mut ExtractionSummary,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let archive = ZipExtractor::new(Arc::new(LocalFileReader::new(src)?));
            let entries = archive
                .list_files()
                .await
                .with_context(|| format!("failed to read archive {}", src.display()))?;
            debug!(
                "{}: {} entries at depth {}",
                src.display(),
                entries.len(),
                depth
            );

            for entry in &entries {
                if !self.options.matches(&entry.file_name) {
                    continue;
                }

                let target = resolve_destination(dest, &entry.file_name, self.options.layout)?;

                if entry.is_directory {
                    if self.options.layout == PathLayout::Preserve {
                        fs::create_dir_all(&target).await.with_context(|| {
                            format!("failed to create directory {}", target.display())
                        })?;
                    }
                    continue;
                }

                let written = self.extract_entry(&archive, entry, &target).await?;
                summary.files_extracted += 1;
                summary.bytes_written += written;
                info!("extracted {} ({} bytes)", entry.file_name, written);

                if entry.file_name.ends_with(&self.options.nested_suffix) {
                    self.expand_nested(&target, dest, depth + 1, summary).await?;
                }
            }

            Ok(())
        })
    }

    /// Write one entry to `target`, truncating anything already there.
    async fn extract_entry(
        &self,
        archive: &ZipExtractor<LocalFileReader>,
        entry: &ZipFileEntry,
        target: &Path,
    ) -> Result<u64> {
        if self.options.layout == PathLayout::Preserve {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }

        let mut out = open_destination(target, entry.unix_mode())
            .await
            .with_context(|| format!("failed to create {}", target.display()))?;
        let mut reader = archive.open_entry(entry).await?;

        let copied = copy_entry(&mut reader, &mut out).await;
        // Both handles are closed before the next entry, whatever the outcome
        drop(out);
        drop(reader);

        copied.with_context(|| format!("failed to extract {}", entry.file_name))
    }

    async fn expand_nested(
        &self,
        archive_path: &Path,
        dest: &Path,
        depth: usize,
        summary: &mut ExtractionSummary,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(UnzipError::DepthExceeded {
                path: archive_path.to_path_buf(),
                max: self.options.max_depth,
            }
            .into());
        }

        debug!("expanding nested archive {}", archive_path.display());
        self.extract_archive(archive_path, dest, depth, summary)
            .await
            .with_context(|| format!("failed to extract nested archive {}", archive_path.display()))?;
        summary.archives_expanded += 1;

        if let Err(err) = fs::remove_file(archive_path).await {
            warn!(
                "could not remove nested archive {}: {}",
                archive_path.display(),
                err
            );
        }
        Ok(())
    }
}

async fn open_destination(path: &Path, mode: u32) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path).await
}

async fn copy_entry(reader: &mut EntryReader, out: &mut fs::File) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).await?;
        total += n as u64;
    }
    // tokio finishes writes in the background; settle them before the file
    // is reopened as a nested archive
    out.flush().await?;
    Ok(total)
}

/// Extract entries of `src` containing `pattern` into `dest` with default
/// options.
pub async fn unzip(src: &Path, dest: &Path, pattern: &str) -> Result<ExtractionSummary> {
    Unzipper::new(ExtractOptions::with_pattern(pattern))
        .extract(src, dest)
        .await
}

/// Paths of the entries of `src` that `options` would extract, without
/// writing anything. Nested archives are not opened.
pub async fn plan(
    src: &Path,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<Vec<(ZipFileEntry, PathBuf)>> {
    let archive = ZipExtractor::new(Arc::new(LocalFileReader::new(src)?));
    let entries = archive
        .list_files()
        .await
        .with_context(|| format!("failed to read archive {}", src.display()))?;

    let mut planned = Vec::new();
    for entry in entries {
        if !options.matches(&entry.file_name) {
            continue;
        }
        let target = resolve_destination(dest, &entry.file_name, options.layout)?;
        if !entry.is_directory {
            planned.push((entry, target));
        }
    }
    Ok(planned)
}
