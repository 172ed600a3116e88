//! Finds Solidity function declarations for the per-function "Debug" action
//!
//! This is a line-oriented regex heuristic, not a Solidity parser:
//!
//! - one declaration per physical line (the first match wins)
//! - parameter lists must not contain nested parentheses
//! - commas inside tuple types or array literals are counted as separators
//!
//! A real parser would find a strict superset of what this finds.

use crate::host::AnnotationProvider;
use crate::launch::DEBUG_FUNCTION_COMMAND;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::LazyLock;

static FUNCTION_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+([A-Za-z0-9_]+)\s*\(([^)]*)\)").unwrap());

/// Zero-based line/character span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    pub argument_count: usize,
    pub source_range: SourceRange,
}

impl FunctionDeclaration {
    fn from_line(line_number: usize, line: &str) -> Option<Self> {
        let captures = FUNCTION_DECLARATION.captures(line)?;
        let whole = captures.get(0)?;
        let params = captures.get(2).map_or("", |m| m.as_str());

        Some(Self {
            name: captures[1].to_string(),
            argument_count: count_arguments(params),
            source_range: SourceRange {
                start_line: line_number,
                start_column: line[..whole.start()].chars().count(),
                end_line: line_number,
                end_column: line[..whole.end()].chars().count(),
            },
        })
    }
}

fn count_arguments(params: &str) -> usize {
    if params.trim().is_empty() {
        0
    } else {
        params.matches(',').count() + 1
    }
}

/// Scan a whole document, splitting it with `str::lines`
pub fn scan(source: &str) -> impl Iterator<Item = FunctionDeclaration> + '_ {
    scan_lines(source.lines())
}

/// Scan pre-split lines; each item is one line without its terminator
pub fn scan_lines<'a, I>(lines: I) -> impl Iterator<Item = FunctionDeclaration> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(number, line)| FunctionDeclaration::from_line(number, line))
}

/// Command invocation attached to an annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRef {
    pub title: String,
    pub command: String,
    pub arguments: Vec<Value>,
}

/// A clickable "Debug" marker over a declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub range: SourceRange,
    pub command: CommandRef,
}

impl From<FunctionDeclaration> for Annotation {
    fn from(declaration: FunctionDeclaration) -> Self {
        Self {
            range: declaration.source_range,
            command: CommandRef {
                title: "Debug".to_string(),
                command: DEBUG_FUNCTION_COMMAND.to_string(),
                arguments: vec![
                    json!(declaration.name),
                    json!(declaration.argument_count),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugAnnotationProvider;

impl AnnotationProvider for DebugAnnotationProvider {
    fn provide_annotations(&self, text: &str) -> Vec<Annotation> {
        scan(text).map(Annotation::from).collect()
    }
}
