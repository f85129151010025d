//! Indentation-scoped block extraction from CLI configuration text.
//!
//! EOS configuration is hierarchical by indentation. A section is a parent
//! line plus every following line that begins with whitespace (or is
//! empty), up to but excluding the next line that starts in column 0.

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Compile a parent-line pattern with `^`/`$` matching at line boundaries.
pub fn compile_parent(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).multi_line(true).build()?)
}

/// Return the block under the first line matching `parent`.
///
/// The parent line is included and the trailing newline is preserved.
/// Returns [`Error::NotFound`] when no line matches.
pub fn section(config: &str, parent: &str) -> Result<String> {
    let regex = compile_parent(parent)?;
    section_with(config, &regex)
        .map(str::to_string)
        .ok_or_else(|| Error::NotFound {
            pattern: parent.to_string(),
        })
}

/// Borrowing variant of [`section`] for a precompiled multi-line regex.
pub fn section_with<'a>(config: &'a str, parent: &Regex) -> Option<&'a str> {
    let m = parent.find(config)?;
    let start = line_start(config, m.start());
    Some(&config[start..block_end(config, m.end())])
}

/// Every block whose parent line matches `parent`, in config order.
///
/// Walks the config once. Each item carries the parent match's captures
/// and the block text, parent line included.
pub fn blocks<'r, 'a>(
    config: &'a str,
    parent: &'r Regex,
) -> impl Iterator<Item = (Captures<'a>, &'a str)> {
    parent.captures_iter(config).filter_map(move |caps| {
        let m = caps.get(0)?;
        let start = line_start(config, m.start());
        let end = block_end(config, m.end());
        Some((caps, &config[start..end]))
    })
}

/// End offset of the block whose parent line contains `pos`.
fn block_end(config: &str, pos: usize) -> usize {
    // Skip past the parent line itself.
    let mut end = match config[pos..].find('\n') {
        Some(offset) => pos + offset + 1,
        None => return config.len(),
    };

    while end < config.len() {
        let rest = &config[end..];
        let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let child = matches!(rest.chars().next(), Some(c) if c.is_whitespace());
        if !child {
            break;
        }
        end += line_len;
    }
    end
}

/// Byte offset of the start of the line containing `pos`.
fn line_start(config: &str, pos: usize) -> usize {
    config[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Split a section into its parent line and its child lines, trimmed.
pub fn children(block: &str) -> impl Iterator<Item = &str> {
    block.lines().skip(1).map(str::trim).filter(|l| !l.is_empty())
}
