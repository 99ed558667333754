//! Input path expansion for multi-file conversion.
//!
//! Command-line inputs may be literal paths or glob patterns such as
//! `exports/*.parquet` or `data/**/*.arrow`. Matches are files only, sorted
//! lexicographically so runs are deterministic.

use anyhow::{Context, Result, bail};
use glob::glob;
use std::path::PathBuf;

/// Characters that make an argument a glob pattern rather than a literal path.
const GLOB_META: &[char] = &['*', '?', '['];

/// Expand a glob pattern into a sorted list of matching files.
///
/// Zero matches yields an empty vector.
///
/// # Errors
/// Returns an error if the pattern is invalid or a matched entry cannot be read.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob(pattern).with_context(|| format!("bad glob pattern {pattern:?}"))?;
    let mut files = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(Ok(path)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("expand {pattern:?}"))?;
    files.sort();
    Ok(files)
}

/// Resolve command-line inputs into concrete file paths, keeping argument order.
///
/// Literal paths are passed through untouched, even when they do not exist,
/// so opening them later reports a per-file error. Patterns that match
/// nothing are an error.
///
/// # Errors
/// Returns an error for an invalid pattern or a pattern without matches.
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.contains(GLOB_META) {
            let matched = expand_glob(input)?;
            if matched.is_empty() {
                bail!("no files found matching pattern: {input}");
            }
            out.extend(matched);
        } else {
            out.push(PathBuf::from(input));
        }
    }
    Ok(out)
}
