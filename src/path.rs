//! Destination path resolution and zip-slip validation.

use std::path::{Component, Path, PathBuf};

use crate::error::UnzipError;

/// How entry names map onto the destination directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathLayout {
    /// Only the base name is kept; archive directories are flattened away.
    #[default]
    Flatten,
    /// The entry's relative path is kept below the destination.
    Preserve,
}

/// Lexically normalise a path: drop `.` components and fold `..` onto a
/// preceding normal component. The filesystem is never consulted.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Compute where `entry_name` lands inside `dest`.
///
/// The entry name is untrusted: absolute names, drive prefixes and `..`
/// components are rejected outright, and the resolved path must still lie
/// strictly below the cleaned destination.
pub fn resolve_destination(
    dest: &Path,
    entry_name: &str,
    layout: PathLayout,
) -> Result<PathBuf, UnzipError> {
    let illegal = || UnzipError::IllegalPath {
        path: PathBuf::from(entry_name),
    };

    let mut relative = PathBuf::new();
    for component in Path::new(entry_name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(illegal());
            }
        }
    }

    let chosen = match layout {
        PathLayout::Flatten => PathBuf::from(relative.file_name().ok_or_else(illegal)?),
        PathLayout::Preserve => relative,
    };

    let base = clean_path(dest);
    let candidate = clean_path(&dest.join(&chosen));
    // A cleaned "." loses its prefix: `./a.txt` becomes `a.txt`
    let inside = if base == Path::new(".") {
        candidate != base
            && !matches!(
                candidate.components().next(),
                Some(Component::ParentDir | Component::RootDir | Component::Prefix(_))
            )
    } else {
        candidate != base && candidate.starts_with(&base)
    };
    if !inside {
        return Err(UnzipError::IllegalPath { path: candidate });
    }

    Ok(candidate)
}
