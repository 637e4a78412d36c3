//! Locate the HTML documents a command-line run should process.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use regex::Regex;

/// Expand `pattern` into files below `base`, returned relative to `base` and sorted.
///
/// Supports `*`, `?` and `**`. Hidden entries are skipped and directories never match. A
/// pattern without wildcards that names an existing file is returned as given.
pub fn find_matching_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = pattern.trim();
    if !has_wildcards(pattern) {
        let literal = PathBuf::from(pattern);
        let candidate = if literal.is_absolute() {
            literal.clone()
        } else {
            base.join(&literal)
        };
        return Ok(if candidate.is_file() {
            vec![literal]
        } else {
            Vec::new()
        });
    }

    let matcher = glob_to_regex(pattern)?;
    let mut matches = Vec::new();
    collect_matches(base, Path::new(""), &matcher, &mut matches)?;
    matches.sort();
    Ok(matches)
}

/// Same as [`find_matching_files`] but treats an empty result as an error.
pub fn require_matching_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matches = find_matching_files(base, pattern)?;
    if matches.is_empty() {
        return Err(anyhow!(
            "No files could be found that match given glob: '{}'\nDirectory searched for matches: {}",
            pattern,
            base.display()
        ));
    }
    Ok(matches)
}

fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Translate a glob into an anchored regular expression over `/`-separated paths.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let normalised = pattern.replace('\\', "/");
    let normalised = normalised.trim_start_matches("./");

    let mut expression = String::from("^");
    let mut chars = normalised.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    expression.push_str("(?:.*/)?");
                } else {
                    expression.push_str(".*");
                }
            }
            '*' => expression.push_str("[^/]*"),
            '?' => expression.push_str("[^/]"),
            other => expression.push_str(&regex::escape(&other.to_string())),
        }
    }
    expression.push('$');

    Regex::new(&expression).with_context(|| format!("invalid glob pattern '{pattern}'"))
}

fn collect_matches(
    base: &Path,
    relative: &Path,
    matcher: &Regex,
    matches: &mut Vec<PathBuf>,
) -> Result<()> {
    let dir = base.join(relative);
    let entries =
        fs::read_dir(&dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let child_relative = relative.join(&file_name);
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_matches(base, &child_relative, matcher, matches)?;
        } else if file_type.is_file() {
            let normalised = child_relative.to_string_lossy().replace('\\', "/");
            if matcher.is_match(&normalised) {
                matches.push(child_relative);
            }
        }
    }

    Ok(())
}
