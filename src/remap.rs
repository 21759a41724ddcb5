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

//! Positional field remapping
//!
//! A [`Remapper`] holds an ordered rule list, one rule per output column.
//! Applying it to a parsed tuple produces a new tuple whose field at
//! position *i* is the verbatim copy of a source field, a fixed literal,
//! or a lookup-table replacement keyed by a source field's text. The input
//! tuple is never modified.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use log::warn;

use crate::tuple::{Field, Tuple};

/// One output column of a remap, in output order.
#[derive(Debug, Clone, PartialEq)]
pub enum RemapRule {
    /// Copy the source field at this index verbatim.
    Copy(usize),
    /// Insert a fixed literal.
    Constant(Field),
    /// Replace the source field at `source` with its entry in the named
    /// lookup table, using the field's text as the key.
    Lookup { source: usize, table: String },
}

/// What to do when a lookup key has no table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail the row with [`RemapError::MissingKey`].
    Fail,
    /// Log a warning and substitute the table's placeholder prefix
    /// followed by the key, as a quoted literal.
    Placeholder,
}

/// Key-to-replacement table for [`RemapRule::Lookup`].
///
/// Values are plain text and are emitted as quoted string literals.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, String>,
    placeholder_prefix: String,
}

impl LookupTable {
    pub fn new(placeholder_prefix: &str) -> LookupTable {
        LookupTable {
            entries: HashMap::new(),
            placeholder_prefix: placeholder_prefix.to_string(),
        }
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn resolve(&self, name: &str, key: &str, policy: MissingPolicy) -> Result<Field, RemapError> {
        match self.entries.get(key) {
            Some(value) => Ok(Field::quoted(value)),
            None => match policy {
                MissingPolicy::Placeholder => {
                    warn!(
                        "no entry for key {} in lookup table {}, substituting placeholder",
                        key, name
                    );
                    Ok(Field::quoted(&format!("{}{}", self.placeholder_prefix, key)))
                }
                MissingPolicy::Fail => Err(RemapError::MissingKey {
                    table: name.to_string(),
                    key: key.to_string(),
                }),
            },
        }
    }
}

/// Remap error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemapError {
    /// A copy or lookup rule referenced a position past the input arity.
    SourceIndexOutOfRange { index: usize, arity: usize },
    /// A lookup rule named a table that was never registered.
    UnknownTable(String),
    /// A lookup key had no entry and the policy is [`MissingPolicy::Fail`].
    MissingKey { table: String, key: String },
}

impl fmt::Display for RemapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RemapError::SourceIndexOutOfRange { index, arity } => write!(
                f,
                "source index {} out of range for a {}-field tuple",
                index, arity
            ),
            RemapError::UnknownTable(name) => write!(f, "unknown lookup table {}", name),
            RemapError::MissingKey { table, key } => {
                write!(f, "no entry for key {} in lookup table {}", key, table)
            }
        }
    }
}

impl Error for RemapError {}

/// Applies an ordered rule set to tuples.
pub struct Remapper {
    rules: Vec<RemapRule>,
    tables: HashMap<String, LookupTable>,
    missing: MissingPolicy,
}

impl Remapper {
    pub fn new(rules: Vec<RemapRule>) -> Remapper {
        Remapper {
            rules,
            tables: HashMap::new(),
            missing: MissingPolicy::Placeholder,
        }
    }

    /// Copy every field through unchanged, for an `arity`-column source.
    pub fn identity(arity: usize) -> Remapper {
        Remapper::new((0..arity).map(RemapRule::Copy).collect())
    }

    /// Register a lookup table under the name [`RemapRule::Lookup`] uses.
    pub fn with_table(mut self, name: &str, table: LookupTable) -> Remapper {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn missing_policy(mut self, policy: MissingPolicy) -> Remapper {
        self.missing = policy;
        self
    }

    /// The smallest source arity the rule set can be applied to: one past
    /// the highest source index any copy or lookup rule references.
    pub fn min_arity(&self) -> usize {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                RemapRule::Copy(index) | RemapRule::Lookup { source: index, .. } => {
                    Some(index + 1)
                }
                RemapRule::Constant(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Produce the output tuple, one field per rule in rule order.
    pub fn apply(&self, tuple: &Tuple) -> Result<Tuple, RemapError> {
        let input = tuple.fields();
        let mut fields = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let field = match rule {
                RemapRule::Copy(index) => input
                    .get(*index)
                    .cloned()
                    .ok_or(RemapError::SourceIndexOutOfRange {
                        index: *index,
                        arity: input.len(),
                    })?,
                RemapRule::Constant(constant) => constant.clone(),
                RemapRule::Lookup { source, table } => {
                    let key = input
                        .get(*source)
                        .ok_or(RemapError::SourceIndexOutOfRange {
                            index: *source,
                            arity: input.len(),
                        })?;
                    let entries = self
                        .tables
                        .get(table)
                        .ok_or_else(|| RemapError::UnknownTable(table.clone()))?;
                    entries.resolve(table, key.as_str(), self.missing)?
                }
            };
            fields.push(field);
        }
        Ok(Tuple::new(fields))
    }
}
