//! The configuration module of the tree-regex engine.
use serde::{Deserialize, Serialize};

/// Behavior knobs that the reference implementation left unspecified.
///
/// Both fields pin down an "Open Question" from the design notes rather
/// than guessing at intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// If `true`, [`crate::parse_pattern`] rejects patterns with unconsumed
    /// trailing text after a valid expression. Default: `false` (tolerate
    /// residue), matching the reference implementation's observed behavior,
    /// which parses a prefix of the input and silently ignores the rest.
    pub reject_trailing_residue: bool,
    /// Capacity hint for the number of matches a single
    /// [`crate::document_process`] call is expected to produce; used only to
    /// pre-size the result `Vec` and has no effect on correctness.
    pub expected_match_count_hint: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reject_trailing_residue: false,
            expected_match_count_hint: 16,
        }
    }
}
