// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Line-oriented dump rewriting
//!
//! The [`Rewriter`] drives the tuple parser and remapper over a dump, one
//! line at a time. Tuple lines are parsed, remapped and reserialized with
//! their terminator; an optional [`HeaderRewrite`] replaces the matching
//! `INSERT INTO ... VALUES` header line; everything else passes through
//! untouched. Failures are per line and never abort the batch unless the
//! caller opts into [`ErrorPolicy::Fail`].

use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::remap::{RemapError, Remapper};
use crate::scanner::ParseError;
use crate::tuple::Tuple;

/// Replacement for a multi-row `INSERT INTO <table> (<columns>) VALUES`
/// header line.
#[derive(Debug, Clone)]
pub struct HeaderRewrite {
    table: String,
    new_table: String,
    columns: Vec<String>,
}

impl HeaderRewrite {
    pub fn new(table: &str, new_table: &str, columns: &[&str]) -> HeaderRewrite {
        HeaderRewrite {
            table: table.to_string(),
            new_table: new_table.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
        }
    }

    fn matches(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let prefix = match trimmed.get(..12) {
            Some(prefix) => prefix,
            None => return false,
        };
        if !prefix.eq_ignore_ascii_case("insert into ") {
            return false;
        }
        let rest = trimmed[12..].trim_start();
        if !rest.starts_with(&self.table) {
            return false;
        }
        // The table name must end at a word break, not inside a longer one.
        match rest[self.table.len()..].chars().next() {
            None | Some(' ') | Some('\t') | Some('(') => true,
            _ => false,
        }
    }

    fn render(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES",
            self.new_table,
            self.columns.join(", ")
        )
    }
}

/// Per-line failure handling for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log a warning naming the line and pass it through unmodified.
    PassThrough,
    /// Stop and surface the error to the caller.
    Fail,
}

/// Counters reported by [`Rewriter::rewrite`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub lines: usize,
    pub headers_rewritten: usize,
    pub tuples_rewritten: usize,
    /// Lines passed through unmodified under [`ErrorPolicy::PassThrough`].
    pub failures: usize,
}

/// Rewrite error
#[derive(Debug)]
pub enum RewriteError {
    Parse { line: usize, error: ParseError },
    Remap { line: usize, error: RemapError },
    Io(io::Error),
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RewriteError::Parse { line, error } => write!(f, "line {}: {}", line, error),
            RewriteError::Remap { line, error } => write!(f, "line {}: {}", line, error),
            RewriteError::Io(error) => write!(f, "io error: {}", error),
        }
    }
}

impl Error for RewriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RewriteError::Parse { error, .. } => Some(error),
            RewriteError::Remap { error, .. } => Some(error),
            RewriteError::Io(error) => Some(error),
        }
    }
}

impl From<io::Error> for RewriteError {
    fn from(error: io::Error) -> RewriteError {
        RewriteError::Io(error)
    }
}

enum LineAction {
    Header(String),
    Tuple(String),
    Unchanged(String),
}

/// Rewrites a dump line by line.
pub struct Rewriter {
    remapper: Remapper,
    header: Option<HeaderRewrite>,
    source_arity: usize,
    policy: ErrorPolicy,
}

impl Rewriter {
    pub fn new(remapper: Remapper) -> Rewriter {
        let source_arity = remapper.min_arity();
        Rewriter {
            remapper,
            header: None,
            source_arity,
            policy: ErrorPolicy::PassThrough,
        }
    }

    pub fn with_header(mut self, header: HeaderRewrite) -> Rewriter {
        self.header = Some(header);
        self
    }

    /// Tuples with fewer fields than this pass through untouched. Defaults
    /// to the rule set's [`min_arity`](Remapper::min_arity), so rows from
    /// an unrelated shorter table are left alone rather than failing.
    pub fn source_arity(mut self, arity: usize) -> Rewriter {
        self.source_arity = arity;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Rewriter {
        self.policy = policy;
        self
    }

    /// Rewrite a single line. Lines that are neither a matching header nor
    /// a tuple literal are returned unchanged.
    pub fn rewrite_line(&self, line: &str) -> Result<String, RewriteError> {
        self.apply_line(line, 0).map(|action| match action {
            LineAction::Header(text) | LineAction::Tuple(text) | LineAction::Unchanged(text) => {
                text
            }
        })
    }

    fn apply_line(&self, line: &str, line_no: usize) -> Result<LineAction, RewriteError> {
        let trimmed = line.trim();

        if let Some(header) = &self.header {
            if header.matches(trimmed) {
                return Ok(LineAction::Header(header.render()));
            }
        }

        if !looks_like_tuple(trimmed) {
            return Ok(LineAction::Unchanged(line.to_string()));
        }

        let (tuple, terminator) = Tuple::parse(trimmed)
            .map_err(|error| RewriteError::Parse { line: line_no, error })?;

        if tuple.len() < self.source_arity {
            debug!(
                "line {}: {} fields where {} are expected, passing through",
                line_no,
                tuple.len(),
                self.source_arity
            );
            return Ok(LineAction::Unchanged(line.to_string()));
        }

        let rewritten = self
            .remapper
            .apply(&tuple)
            .map_err(|error| RewriteError::Remap { line: line_no, error })?;
        Ok(LineAction::Tuple(rewritten.serialize(terminator)))
    }

    /// Rewrite a whole dump, reading lines from `input` and writing the
    /// transformed lines to `output`.
    pub fn rewrite<R: BufRead, W: Write>(
        &self,
        input: R,
        output: &mut W,
    ) -> Result<RewriteStats, RewriteError> {
        let mut stats = RewriteStats::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            stats.lines += 1;
            let text = match self.apply_line(&line, line_no) {
                Ok(LineAction::Header(text)) => {
                    stats.headers_rewritten += 1;
                    text
                }
                Ok(LineAction::Tuple(text)) => {
                    stats.tuples_rewritten += 1;
                    text
                }
                Ok(LineAction::Unchanged(text)) => text,
                Err(error) => match self.policy {
                    ErrorPolicy::Fail => return Err(error),
                    ErrorPolicy::PassThrough => {
                        warn!("{}, passing line through unmodified", error);
                        stats.failures += 1;
                        line
                    }
                },
            };
            writeln!(output, "{}", text)?;
        }
        Ok(stats)
    }
}

/// The heuristic the batch loop uses to spot value rows: a line whose
/// first character opens a tuple and that contains at least a separator
/// or a closing paren.
fn looks_like_tuple(trimmed: &str) -> bool {
    trimmed.starts_with('(') && (trimmed.contains(',') || trimmed.contains(')'))
}
