//! Output templating: the optional back-reference expansion helper.
//!
//! This is an external concern documented for completeness — a consumer is
//! free to walk [`crate::document::Match::captures`] itself instead.
use crate::document::{document_process, Node, RegexMatch};
use crate::machine::Machine;

/// Expands `\1`…`\9` back-references in `template` against `captures`.
///
/// Each back-reference `\k` is replaced by the byte range of the k-th
/// capture (1-indexed) in document order. An out-of-range or `\0`
/// back-reference passes through unchanged, grounded in the reference
/// `SearchDocument` helper's behavior of leaving unresolvable back-
/// references untouched rather than treating them as an error. Non-ASCII
/// bytes pass through unchanged; offsets are bytewise, not codepoint-wise.
pub fn render_template(template: &str, captures: &[RegexMatch]) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
            let digit = bytes[i + 1] - b'0';
            if digit >= 1 {
                if let Some(cap) = captures.get(digit as usize - 1) {
                    out.push_str(cap.as_str());
                    i += 2;
                    continue;
                }
            }
            // `\0`, or `\k` beyond the capture list: copy through literally.
            out.push('\\');
            out.push(bytes[i + 1] as char);
            i += 2;
            continue;
        }
        let ch = template[i..]
            .chars()
            .next()
            .expect("i is a valid char boundary");
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Convenience wrapper supplementing the core interface: runs `machine`
/// over every node of `document`, then renders `template` against each
/// match's captures, one output string per match — mirroring the
/// reference `SearchDocument` entry point's `document_process` +
/// `render_template` composition.
pub fn render_all<N: Node>(machine: &Machine, document: &N, template: &str) -> Vec<String> {
    document_process(machine, document)
        .iter()
        .map(|m| render_template(template, &m.captures))
        .collect()
}
