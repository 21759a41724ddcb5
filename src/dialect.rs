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

//! MySQL to PostgreSQL dump conversion
//!
//! A fixed sequence of textual rewrites covering what mysqldump emits for
//! an ordinary InnoDB schema: conditional comments, `AUTO_INCREMENT`
//! columns, backtick quoting, the common column types, table options,
//! inline index definitions and session `SET` statements. Anything outside
//! these patterns passes through untouched; this is not a general dialect
//! translator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Convert a mysqldump export to PostgreSQL-compatible SQL.
///
/// Pure text-to-text; the input is never executed or validated. The order
/// of the passes matters: `AUTO_INCREMENT` columns are rewritten while
/// identifiers are still backtick-quoted, and the inline `KEY` strips run
/// after quoting has been converted.
pub fn mysql_to_postgres(dump: &str) -> String {
    static CONDITIONAL_COMMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"/\*!40\d{3}[^\n]*?\*/;?").unwrap());
    static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"--[^\n]*\n").unwrap());
    static BIGSERIAL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"`(\w+)` bigint\(20\) NOT NULL AUTO_INCREMENT").unwrap());
    static SERIAL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"`(\w+)` int\(11\) NOT NULL AUTO_INCREMENT").unwrap());
    static AUTO_INCREMENT_OPTION: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"AUTO_INCREMENT=\d+").unwrap());
    static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"tinyint\(1\)").unwrap());
    static SMALLINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"tinyint\(\d+\)").unwrap());
    static BIGINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"bigint\(\d+\)").unwrap());
    static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bint\(\d+\)").unwrap());
    static DOUBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdouble\b").unwrap());
    static DATETIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdatetime\b").unwrap());
    static LONG_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:long|medium)text\b").unwrap());
    static ENGINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"ENGINE=\w+").unwrap());
    static CHARSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"DEFAULT CHARSET=\w+").unwrap());
    static COLLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"COLLATE=\w+").unwrap());
    static CHARACTER_SET: Lazy<Regex> = Lazy::new(|| Regex::new(r"CHARACTER SET \w+").unwrap());
    static KEY_DEF: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#",\s*KEY "[^"]*"[^\n]*\n"#).unwrap());
    static UNIQUE_KEY_DEF: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#",\s*UNIQUE KEY "[^"]*"[^\n]*\n"#).unwrap());
    static INDEX_DEF: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#",\s*INDEX "[^"]*"[^\n]*\n"#).unwrap());
    static PRIMARY_KEY_DEF: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#",\s*PRIMARY KEY \("[^"]*"\)"#).unwrap());
    static LOCK_TABLES: Lazy<Regex> = Lazy::new(|| Regex::new(r"LOCK TABLES[^\n]*?;").unwrap());
    static SET_STATEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^SET [^\n]*?;").unwrap());
    static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

    let converted = CONDITIONAL_COMMENT.replace_all(dump, "");
    let converted = LINE_COMMENT.replace_all(&converted, "\n");

    // Identity columns, while backticks are still in place.
    let converted = BIGSERIAL.replace_all(&converted, "\"${1}\" BIGSERIAL PRIMARY KEY");
    let converted = SERIAL.replace_all(&converted, "\"${1}\" SERIAL PRIMARY KEY");
    let converted = AUTO_INCREMENT_OPTION.replace_all(&converted, "");

    let converted = converted.replace('`', "\"");

    // Column types. bigint before the word-bounded int so `bigint(20)`
    // never degrades into `biginteger`.
    let converted = BOOLEAN.replace_all(&converted, "boolean");
    let converted = SMALLINT.replace_all(&converted, "smallint");
    let converted = BIGINT.replace_all(&converted, "bigint");
    let converted = INTEGER.replace_all(&converted, "integer");
    let converted = DOUBLE.replace_all(&converted, "double precision");
    let converted = DATETIME.replace_all(&converted, "timestamp");
    let converted = LONG_TEXT.replace_all(&converted, "text");

    let converted = ENGINE.replace_all(&converted, "");
    let converted = CHARSET.replace_all(&converted, "");
    let converted = COLLATE.replace_all(&converted, "");
    let converted = CHARACTER_SET.replace_all(&converted, "");

    // Inline index definitions; PostgreSQL indexes are created separately.
    let converted = KEY_DEF.replace_all(&converted, "\n");
    let converted = UNIQUE_KEY_DEF.replace_all(&converted, "\n");
    let converted = INDEX_DEF.replace_all(&converted, "\n");
    // The id column already carries PRIMARY KEY after the SERIAL rewrite.
    let converted = PRIMARY_KEY_DEF.replace_all(&converted, "");

    let converted = LOCK_TABLES.replace_all(&converted, "");
    let converted = converted.replace("UNLOCK TABLES;", "");

    let converted = converted.replace("'0000-00-00 00:00:00'", "NULL");
    let converted = converted.replace("'0000-00-00'", "NULL");

    let converted = SET_STATEMENT.replace_all(&converted, "");
    let converted = BLANK_LINES.replace_all(&converted, "\n\n");

    converted.into_owned()
}
