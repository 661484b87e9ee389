//! Error types returned by the pattern compiler.

/// Everything that can go wrong while tokenizing or parsing a pattern.
///
/// An embedded content-regex or attribute value-regex that fails to compile
/// is folded into [`ParseError::RegexCompile`] rather than surfaced as a
/// separate error type, matching the reference implementation's behavior of
/// treating a bad regex as a parse-time failure.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The tokenizer could not produce a token at the given offset (an
    /// unterminated string, a lone `-` not part of `->`, or an empty symbol
    /// where one was required).
    #[error("Tokenizing error at byte {offset}")]
    Tokenizing {
        /// Byte offset into the pattern text where tokenizing failed.
        offset: usize,
    },
    /// A parenthesized group was opened but never closed.
    #[error("Expected ')' at byte {offset}")]
    ExpectedCloseParen {
        /// Byte offset of the token found in place of `)`.
        offset: usize,
    },
    /// A factor was expected but the next token was none of `symbol`, `~`,
    /// or `(`.
    #[error("Expected symbol or '~' or '(' at byte {offset}")]
    ExpectedFactor {
        /// Byte offset of the unexpected token.
        offset: usize,
    },
    /// A `"`-delimited string was required (after `:` or `=`) but not found.
    #[error("Expecting a \"-delimited string at byte {offset}")]
    ExpectedString {
        /// Byte offset of the unexpected token.
        offset: usize,
    },
    /// An attribute list was opened with `<` but its contents did not parse.
    #[error("Expecting attribute list at byte {offset}")]
    ExpectedAttrs {
        /// Byte offset of the unexpected token.
        offset: usize,
    },
    /// A content-regex or attribute-value regex failed to compile.
    #[error("Error parsing regular expression at byte {offset}: {source}")]
    RegexCompile {
        /// Byte offset of the opening quote of the offending string.
        offset: usize,
        /// Underlying compile error from the flat-regex engine.
        #[source]
        source: regex::Error,
    },
}

impl ParseError {
    /// The byte offset into the original pattern text where this error was
    /// detected.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Tokenizing { offset }
            | ParseError::ExpectedCloseParen { offset }
            | ParseError::ExpectedFactor { offset }
            | ParseError::ExpectedString { offset }
            | ParseError::ExpectedAttrs { offset }
            | ParseError::RegexCompile { offset, .. } => *offset,
        }
    }
}
