//! Config file syntax errors rendered as miette diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A config file that is not valid YAML (or has a value of the wrong type)
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid config file {filename}: {message}")]
#[diagnostic(code(cript_ingest::config::syntax))]
pub struct ConfigSyntaxError {
    filename: String,

    message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,
}

impl ConfigSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| line_col_to_offset(source, loc.line(), loc.column()))
            .unwrap_or(0);
        let message = err.to_string();

        Self {
            filename: filename.to_string(),
            help: suggest(&message),
            message,
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
        }
    }
}

/// Byte offset of a 1-based line/column position, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .unwrap_or("");

    let column_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());

    (line_start + column_offset).min(source.len())
}

const HINTS: &[(&str, &str)] = &[
    (
        "tab",
        "YAML indentation must use spaces, not tabs.",
    ),
    (
        "duplicate",
        "Each setting may appear only once.",
    ),
    (
        "mapping values are not allowed",
        "Quote values containing ':' (for example host: \"http://localhost:8000\").",
    ),
    (
        "invalid type",
        "Settings are plain values; `public` is true/false or y/n.",
    ),
];

fn suggest(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    HINTS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, hint)| hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "host: a\ntoken: b\npath: c";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 8);
        assert_eq!(line_col_to_offset(source, 3, 3), 19);
        assert_eq!(line_col_to_offset(source, 9, 9), source.len());
    }

    #[test]
    fn test_suggest() {
        assert!(suggest("found a tab character").is_some());
        assert!(suggest("invalid type: sequence, expected a string").is_some());
        assert!(suggest("something else entirely").is_none());
    }
}
