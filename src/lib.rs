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

//! SQL INSERT tuple stream rewriter in Rust
//!
//! This crate parses the `VALUES (...)` tuples of a SQL dump line by line
//! and reshapes them on the fly: fields can be reordered, dropped,
//! duplicated, filled with constants, or replaced from a lookup table.
//! Its intended usage is to migrate mock-data dumps to a changed table
//! schema without re-exporting them.
//!
//! ```rust
//! use sqltuple_rewriter::{Field, HeaderRewrite, RemapRule, Remapper, Rewriter};
//! use std::io::BufReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dump = "INSERT INTO board (user_id, title) VALUES\n\
//!             (5, 'hello, world'),\n\
//!             (7, 'second post');\n";
//!
//! // One rule per output column: keep user_id, insert a status column,
//! // keep the title.
//! let remapper = Remapper::new(vec![
//!     RemapRule::Copy(0),
//!     RemapRule::Constant(Field::quoted("PUBLIC")),
//!     RemapRule::Copy(1),
//! ]);
//! let rewriter = Rewriter::new(remapper).with_header(HeaderRewrite::new(
//!     "board",
//!     "boards",
//!     &["user_id", "status", "title"],
//! ));
//!
//! let mut output = Vec::new();
//! let stats = rewriter.rewrite(BufReader::new(dump.as_bytes()), &mut output)?;
//! assert_eq!(stats.tuples_rewritten, 2);
//! assert_eq!(
//!     String::from_utf8(output)?,
//!     "INSERT INTO boards (user_id, status, title) VALUES\n\
//!      (5, 'PUBLIC', 'hello, world'),\n\
//!      (7, 'PUBLIC', 'second post');\n"
//! );
//! # Ok(())
//! # }
//! ```
//!

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod dialect;
mod remap;
mod rewriter;
mod scanner;
mod tuple;

pub use dialect::mysql_to_postgres;
pub use remap::{LookupTable, MissingPolicy, RemapError, RemapRule, Remapper};
pub use rewriter::{ErrorPolicy, HeaderRewrite, RewriteError, RewriteStats, Rewriter};
pub use scanner::ParseError;
pub use tuple::{Field, Terminator, Tuple};
