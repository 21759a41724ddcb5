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

//! Tuple field scanner
//!
//! The scanner walks the body of one `(...)` tuple literal character by
//! character and yields the text of each top-level field. Two pieces of
//! state are tracked: whether the cursor is inside a single-quoted string,
//! and the parenthesis nesting depth relative to the tuple itself. A comma
//! splits fields only when both say the cursor is at tuple level, so commas
//! inside `'a, b'` or `NOW() - INTERVAL '2 hours'` never split.

use std::error::Error;
use std::fmt;
use std::str::CharIndices;

/// Tuple scan error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with a `(` tuple literal.
    NotATuple,
    /// A quote or parenthesis was still open when the input ended.
    UnbalancedDelimiters,
    /// Something other than a `,` or `;` terminator followed the closing
    /// parenthesis.
    TrailingCharacters(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::NotATuple => f.write_str("not a tuple literal"),
            ParseError::UnbalancedDelimiters => f.write_str("unbalanced delimiters"),
            ParseError::TrailingCharacters(rest) => {
                write!(f, "unexpected characters after tuple: {}", rest)
            }
        }
    }
}

impl Error for ParseError {}

/// Scans the body of a tuple literal, one field per `next()` call.
///
/// The input must start right after the opening parenthesis. Once the
/// matching `)` is consumed the scanner is exhausted and whatever followed
/// it is available through [`rest`](FieldScanner::rest). The scan is a
/// flat token stream: nested parentheses only adjust the depth counter,
/// they never recurse.
pub(crate) struct FieldScanner<'a> {
    src: &'a str,
    chars: CharIndices<'a>,
    in_string: bool,
    depth: usize,
    prev: Option<char>,
    rest_at: Option<usize>,
    failed: bool,
    saw_comma: bool,
}

impl<'a> FieldScanner<'a> {
    pub(crate) fn new(body: &'a str) -> Self {
        FieldScanner {
            src: body,
            chars: body.char_indices(),
            in_string: false,
            depth: 0,
            prev: None,
            rest_at: None,
            failed: false,
            saw_comma: false,
        }
    }

    /// The text after the tuple's closing parenthesis, or `None` if the
    /// scan never reached it.
    pub(crate) fn rest(&self) -> Option<&'a str> {
        self.rest_at.map(|at| &self.src[at..])
    }
}

impl<'a> Iterator for FieldScanner<'a> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest_at.is_some() {
            return None;
        }

        let mut buf = String::new();
        loop {
            let (at, ch) = match self.chars.next() {
                Some(next) => next,
                None => {
                    self.failed = true;
                    return Some(Err(ParseError::UnbalancedDelimiters));
                }
            };

            if self.in_string {
                // A quote closes the string unless it was escaped.
                if ch == '\'' && self.prev != Some('\\') {
                    self.in_string = false;
                }
                buf.push(ch);
            } else {
                match ch {
                    '\'' => {
                        self.in_string = true;
                        buf.push(ch);
                    }
                    '(' => {
                        self.depth += 1;
                        buf.push(ch);
                    }
                    ')' if self.depth == 0 => {
                        self.rest_at = Some(at + 1);
                        self.prev = Some(ch);
                        let field = buf.trim().to_string();
                        // `(1,)` keeps its dangling empty field; `()` has none.
                        if self.saw_comma || !field.is_empty() {
                            return Some(Ok(field));
                        }
                        return None;
                    }
                    ')' => {
                        self.depth -= 1;
                        buf.push(ch);
                    }
                    ',' if self.depth == 0 => {
                        self.saw_comma = true;
                        self.prev = Some(ch);
                        return Some(Ok(buf.trim().to_string()));
                    }
                    other => buf.push(other),
                }
            }
            self.prev = Some(ch);
        }
    }
}
