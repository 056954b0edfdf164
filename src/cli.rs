use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::path::PathLayout;
use crate::unzip::{DEFAULT_MAX_DEPTH, ExtractOptions};

#[derive(Parser, Debug)]
#[command(name = "nestunzip")]
#[command(version)]
#[command(about = "Extract matching files from a zip archive, unpacking nested zip archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  nestunzip -src data.zip -dest out                  extract everything into out/\n  \
  nestunzip -src data.zip -dest out -pattern .log    extract entries whose name contains .log\n  \
  nestunzip -src data.zip -dest out -list            show what would be extracted")]
pub struct Cli {
    /// Source zip file
    #[arg(long = "src", value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// Destination directory (created if missing)
    #[arg(long = "dest", value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Only extract entries whose name contains this substring
    #[arg(long = "pattern", value_name = "TEXT", default_value = "", allow_hyphen_values = true)]
    pub pattern: String,

    /// Maximum nesting depth of zip archives inside zip archives
    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Keep the archive's directory structure instead of flattening it
    #[arg(long = "preserve-paths")]
    pub preserve_paths: bool,

    /// List the matching entries instead of extracting them
    #[arg(long = "list")]
    pub list: bool,

    /// Do not print the completion message
    #[arg(long = "quiet")]
    pub quiet: bool,

    /// Log every extracted entry
    #[arg(long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Parse Go-style arguments, where long flags may use a single dash.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            pattern: self.pattern.clone(),
            max_depth: self.max_depth,
            layout: if self.preserve_paths {
                PathLayout::Preserve
            } else {
                PathLayout::Flatten
            },
            ..ExtractOptions::default()
        }
    }
}

/// Flags that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["src", "dest", "pattern", "max-depth"];

/// Rewrite `-name` and `-name=value` to `--name` forms.
///
/// Single-character flags such as `-h` and `-V` are left alone, as are flag
/// values and everything after a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut expect_value = false;
    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("--") => {
                passthrough = true;
                out.push(arg);
            }
            Some(s) if is_single_dash_long(s) || s.starts_with("--") => {
                let name = s.trim_start_matches('-');
                expect_value = VALUE_FLAGS.contains(&name);
                if s.starts_with("--") {
                    out.push(arg);
                } else {
                    out.push(format!("-{s}").into());
                }
            }
            _ => out.push(arg),
        }
    }
    out
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = rest.split('=').next().unwrap_or_default();
    !rest.starts_with('-')
        && name.len() > 1
        && name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
