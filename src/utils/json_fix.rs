//! Repair of the sidecar JSON files shipped with the combinational circuit
//! dataset, which carry a trailing comma before the closing brace.

use crate::utils::error::Result;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*)\}").expect("trailing comma pattern is valid"))
}

/// Drops every comma that directly precedes a `}` (whitespace in between is kept).
pub fn fix_trailing_commas(text: &str) -> Cow<'_, str> {
    trailing_comma_re().replace_all(text, "$1}")
}

/// Repairs every `<root>/*/*/*.json` in place and returns the files that
/// needed it. With `dry_run` nothing is written.
pub fn fix_dataset_json(root: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*/*/*.json", glob::Pattern::escape(&root.to_string_lossy()));
    let mut fixed = Vec::new();

    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let text = std::fs::read_to_string(&path)?;
        if let Cow::Owned(repaired) = fix_trailing_commas(&text) {
            tracing::debug!("repairing {}", path.display());
            if !dry_run {
                std::fs::write(&path, repaired)?;
            }
            fixed.push(path);
        }
    }

    Ok(fixed)
}
