//! Glob-style file selectors.
//!
//! Exclusions and override keys are written as simple expressions:
//!
//! ```text
//! *.png          any png, at any depth
//! textures/?.png single-character names directly under textures/
//! bin/           everything below bin/
//! ```
//!
//! An expression is compiled into an anchored regex. Every character
//! other than `*` and `?` is escaped, so `.` or `+` in a user expression
//! never acts as a regex metacharacter.

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// A compiled file selector.
#[derive(Debug, Clone)]
pub struct Pattern {
    expression: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `expression` into a whole-path predicate.
    ///
    /// A trailing `/` selects a directory and everything below it.
    pub fn compile(expression: &str) -> Result<Self> {
        let normalized = expression.replace('\\', "/");

        let mut source = String::with_capacity(normalized.len() + 8);
        source.push('^');
        for c in normalized.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        if normalized.ends_with('/') {
            source.push_str(".*");
        }
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            expression: expression.to_string(),
            regex,
        })
    }

    /// Test a forward-slash relative path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The expression this pattern was compiled from.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Compile a list of expressions, failing on the first invalid one.
pub fn compile_all<S: AsRef<str>>(expressions: &[S]) -> Result<Vec<Pattern>> {
    expressions
        .iter()
        .map(|e| Pattern::compile(e.as_ref()))
        .collect()
}
