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

//! Tuple literal model
//!
//! A [`Tuple`] is the parsed form of one `(...)` value list: an ordered
//! sequence of opaque [`Field`]s plus the statement punctuation that
//! followed the closing parenthesis, kept aside as a [`Terminator`] so it
//! can be reattached after rewriting.

use std::fmt;

use crate::scanner::{FieldScanner, ParseError};

/// A single tuple field, kept as opaque literal text.
///
/// A field is a quoted string, a numeric literal, a bare expression such as
/// `NOW() - INTERVAL '2 hours'`, or `NULL`. It is never evaluated; a remap
/// only relocates it verbatim or replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field(String);

impl Field {
    /// A field holding `text` exactly as given: `42`, `NULL`, `NOW()`.
    pub fn raw(text: &str) -> Field {
        Field(text.to_string())
    }

    /// A single-quoted string literal. Embedded quotes are doubled.
    pub fn quoted(value: &str) -> Field {
        let mut text = String::with_capacity(value.len() + 2);
        text.push('\'');
        for ch in value.chars() {
            if ch == '\'' {
                text.push('\'');
            }
            text.push(ch);
        }
        text.push('\'');
        Field(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Field {
        Field::raw(text)
    }
}

impl From<String> for Field {
    fn from(text: String) -> Field {
        Field(text)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statement punctuation found after the closing parenthesis.
///
/// In a multi-row `INSERT`, every row but the last ends with `,` and the
/// last row ends with `;`. [`Tuple::parse`] detaches it and
/// [`Tuple::serialize`] appends it back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    None,
    Comma,
    Semicolon,
}

impl Terminator {
    pub fn as_str(self) -> &'static str {
        match self {
            Terminator::None => "",
            Terminator::Comma => ",",
            Terminator::Semicolon => ";",
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered sequence of fields parsed from one `(...)` literal.
///
/// Field count and order correspond exactly to the source column list at
/// parse time. A tuple is built fresh per input line, transformed once,
/// serialized once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    fields: Vec<Field>,
}

impl Tuple {
    pub fn new(fields: Vec<Field>) -> Tuple {
        Tuple { fields }
    }

    /// Parse one line holding a single `(...)` tuple literal.
    ///
    /// Surrounding whitespace of every field is trimmed; the field text
    /// itself is never altered. The trailing `,` or `;`, if any, is
    /// returned separately. Fails with
    /// [`ParseError::UnbalancedDelimiters`] when a quote or parenthesis is
    /// left open at end of line.
    pub fn parse(line: &str) -> Result<(Tuple, Terminator), ParseError> {
        let trimmed = line.trim();
        let body = match trimmed.strip_prefix('(') {
            Some(body) => body,
            None => return Err(ParseError::NotATuple),
        };

        let mut scanner = FieldScanner::new(body);
        let mut fields = Vec::new();
        for field in scanner.by_ref() {
            fields.push(Field::from(field?));
        }

        let rest = match scanner.rest() {
            Some(rest) => rest.trim(),
            None => return Err(ParseError::UnbalancedDelimiters),
        };
        let terminator = match rest {
            "" => Terminator::None,
            "," => Terminator::Comma,
            ";" => Terminator::Semicolon,
            other => return Err(ParseError::TrailingCharacters(other.to_string())),
        };

        Ok((Tuple { fields }, terminator))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render `(f1, f2, ...)` and append the terminator.
    ///
    /// Fields are joined with `", "` regardless of the spacing in the
    /// source line; this normalization is the one place output may differ
    /// byte-wise from input.
    pub fn serialize(&self, terminator: Terminator) -> String {
        format!("{}{}", self, terminator)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("(")?;
        let mut delim = "";
        for field in &self.fields {
            write!(f, "{}{}", delim, field)?;
            delim = ", ";
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;

    fn texts(tuple: &Tuple) -> Vec<&str> {
        tuple.fields().iter().map(Field::as_str).collect()
    }

    #[test]
    fn parse_keeps_string_and_call_fields_whole() {
        let (tuple, terminator) =
            Tuple::parse("(1, 'a, b', NOW() - INTERVAL '2 days')").unwrap();
        assert_eq!(texts(&tuple), vec!["1", "'a, b'", "NOW() - INTERVAL '2 days'"]);
        assert_eq!(terminator, Terminator::None);
    }

    #[test]
    fn parse_trims_whitespace_to_nothing() {
        let (tuple, _) = Tuple::parse("(1,2,NOW())").unwrap();
        assert_eq!(texts(&tuple), vec!["1", "2", "NOW()"]);
    }

    #[test]
    fn parse_detaches_terminator() {
        let (tuple, terminator) = Tuple::parse("  (1, 2), ").unwrap();
        assert_eq!(tuple.len(), 2);
        assert_eq!(terminator, Terminator::Comma);

        let (_, terminator) = Tuple::parse("(1, 2);").unwrap();
        assert_eq!(terminator, Terminator::Semicolon);
    }

    #[test]
    fn parse_keeps_dangling_empty_field() {
        let (tuple, _) = Tuple::parse("(1, 2, )").unwrap();
        assert_eq!(texts(&tuple), vec!["1", "2", ""]);
    }

    #[test]
    fn parse_rejects_unterminated_string() {
        assert_matches!(
            Tuple::parse("(1, 'unterminated"),
            Err(ParseError::UnbalancedDelimiters)
        );
    }

    #[test]
    fn parse_rejects_trailing_junk() {
        assert_matches!(
            Tuple::parse("(1, 2) DROP TABLE"),
            Err(ParseError::TrailingCharacters(_))
        );
    }

    #[test]
    fn parse_rejects_non_tuple_lines() {
        assert_matches!(Tuple::parse("UNLOCK TABLES;"), Err(ParseError::NotATuple));
    }

    #[test]
    fn serialize_round_trips_fields() {
        let source = "(5,  'a, b' ,NOW() - INTERVAL '2 hours'),";
        let (tuple, terminator) = Tuple::parse(source).unwrap();
        let serialized = tuple.serialize(terminator);
        assert_eq!(serialized, "(5, 'a, b', NOW() - INTERVAL '2 hours'),");

        let (reparsed, reparsed_terminator) = Tuple::parse(&serialized).unwrap();
        assert_eq!(reparsed, tuple);
        assert_eq!(reparsed_terminator, terminator);
    }

    #[test]
    fn quoted_field_doubles_embedded_quotes() {
        assert_eq!(Field::quoted("it's").as_str(), "'it''s'");
        assert_eq!(Field::quoted("plain").as_str(), "'plain'");
    }
}
