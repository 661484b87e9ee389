//! Restriction evaluators run during simulation: content-regex matching and
//! the two-pass attribute-list evaluator.
use crate::machine::{Attribute, CaptureRanges, Trans, RESUBR};

/// Builds the per-group capture ranges for one regex match.
///
/// Groups 1..=9 (the parenthesized subexpressions) are staged at their own
/// index, matching the reference engine's `match[1..RESUBR)` convention.
/// When the pattern has no explicit capture group at all, the whole match
/// stands in as the sole capture (staged at index 0) — otherwise a
/// group-less pattern such as `text:"ab*c"` would never produce the
/// capture its own match text represents.
fn capture_ranges(captures: &regex::Captures<'_>) -> CaptureRanges {
    let mut ranges: CaptureRanges = [None; RESUBR];
    if captures.len() <= 1 {
        if let Some(m) = captures.get(0) {
            ranges[0] = Some((m.start(), m.end()));
        }
        return ranges;
    }
    for (i, slot) in ranges.iter_mut().enumerate().skip(1) {
        if let Some(m) = captures.get(i) {
            *slot = Some((m.start(), m.end()));
        }
    }
    ranges
}

/// Evaluates `trans.content_re` (if present) against `content`, staging the
/// captures on success.
pub(crate) fn match_content(trans: &Trans, content: Option<&str>) -> bool {
    let Some(re) = &trans.content_re else {
        return true;
    };
    let Some(content) = content else {
        return false;
    };
    match re.captures(content) {
        Some(caps) => {
            let ranges = capture_ranges(&caps);
            *trans.captures.borrow_mut() = crate::machine::CaptureSlot {
                text: Some(content.into()),
                ranges,
            };
            true
        }
        None => false,
    }
}

/// Looks up the first node attribute matching `attr` by case-insensitive
/// name, and checks whether it satisfies the restriction, without staging
/// anything.
fn check_attr(attr: &Attribute, node_attrs: &[(String, Option<String>)]) -> bool {
    let Some(found) = node_attrs
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&attr.name))
    else {
        return false;
    };
    match (&attr.value_re, &found.1) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(re), Some(value)) => re.is_match(value),
        (Some(_), None) => false,
    }
}

/// Two-pass verify-then-commit evaluation of `trans.attrs` against a node's
/// attribute list. Pass 1 verifies every restriction is satisfiable without
/// committing captures; pass 2 re-runs and commits, now guaranteed to all
/// succeed. This prevents a later restriction's failure from leaving a
/// stale capture committed from an earlier restriction in the same list.
pub(crate) fn match_attrs(trans: &Trans, node_attrs: &[(String, Option<String>)]) -> bool {
    for attr in &trans.attrs {
        if !check_attr(attr, node_attrs) {
            return false;
        }
    }
    for attr in &trans.attrs {
        let found = node_attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&attr.name))
            .expect("pass 1 already verified this attribute exists");
        let ranges = match (&attr.value_re, &found.1) {
            (None, _) => [None; RESUBR],
            (Some(re), Some(value)) => {
                let caps = re
                    .captures(value)
                    .expect("pass 1 already verified the regex matches");
                capture_ranges(&caps)
            }
            (Some(_), None) => unreachable!("pass 1 already rejected this case"),
        };
        // a value-less restriction (`<bar>`, no `=regex`) never stages a
        // capture, matching the reference's `attr->str == NULL` skip.
        let text = found.1.clone().unwrap_or_default();
        *attr.captures.borrow_mut() = crate::machine::CaptureSlot {
            text: Some(text.into()),
            ranges,
        };
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{StateId, SymbolName};

    fn re(pattern: &str) -> regex::Regex {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap()
    }

    fn trans_with_attrs(attrs: Vec<Attribute>) -> Trans {
        let mut trans = Trans::new(SymbolName::Literal("a".into()), StateId(0));
        trans.attrs = attrs;
        trans
    }

    #[test]
    fn content_regex_stages_whole_match_when_no_groups() {
        let mut trans = Trans::new(SymbolName::Literal("p".into()), StateId(0));
        trans.content_re = Some(re("ab*c"));
        assert!(match_content(&trans, Some("abbbbbc")));
        let slot = trans.captures.borrow();
        assert_eq!(slot.text.as_deref(), Some("abbbbbc"));
        assert_eq!(slot.ranges[0], Some((0, 7)));
        assert!(slot.ranges[1..].iter().all(Option::is_none));
    }

    #[test]
    fn content_regex_stages_only_explicit_groups() {
        let mut trans = Trans::new(SymbolName::Literal("p".into()), StateId(0));
        trans.content_re = Some(re("x([0-9]+)y"));
        assert!(match_content(&trans, Some("x42y")));
        let slot = trans.captures.borrow();
        assert_eq!(slot.ranges[0], None);
        assert_eq!(slot.ranges[1], Some((1, 3)));
    }

    #[test]
    fn content_regex_rejects_missing_content() {
        let mut trans = Trans::new(SymbolName::Literal("p".into()), StateId(0));
        trans.content_re = Some(re("x"));
        assert!(!match_content(&trans, None));
    }

    #[test]
    fn match_attrs_accepts_valueless_restriction_only_without_value() {
        let trans = trans_with_attrs(vec![Attribute::new("disabled".into(), None)]);
        assert!(match_attrs(&trans, &[("disabled".to_string(), None)]));
        assert!(!match_attrs(
            &trans,
            &[("disabled".to_string(), Some("true".to_string()))]
        ));
    }

    #[test]
    fn match_attrs_is_case_insensitive_on_name() {
        let trans = trans_with_attrs(vec![Attribute::new("Id".into(), None)]);
        assert!(match_attrs(&trans, &[("ID".to_string(), None)]));
    }

    #[test]
    fn two_pass_verify_then_commit_no_partial_commit_on_failure() {
        // first restriction is satisfiable, second is not: pass 1 must
        // reject before pass 2 commits anything, including the first
        // restriction's own capture.
        let trans = trans_with_attrs(vec![
            Attribute::new("a".into(), Some(re("x"))),
            Attribute::new("b".into(), Some(re("y"))),
        ]);
        let node_attrs = [
            ("a".to_string(), Some("xx".to_string())),
            ("b".to_string(), Some("zz".to_string())),
        ];
        assert!(!match_attrs(&trans, &node_attrs));
        assert!(trans.attrs[0].captures.borrow().text.is_none());
        assert!(trans.attrs[1].captures.borrow().text.is_none());
    }

    #[test]
    fn two_pass_verify_then_commit_commits_all_on_success() {
        let trans = trans_with_attrs(vec![
            Attribute::new("a".into(), Some(re("(x+)"))),
            Attribute::new("b".into(), Some(re("(y+)"))),
        ]);
        let node_attrs = [
            ("a".to_string(), Some("xx".to_string())),
            ("b".to_string(), Some("yyy".to_string())),
        ];
        assert!(match_attrs(&trans, &node_attrs));
        let a_slot = trans.attrs[0].captures.borrow();
        assert_eq!(a_slot.text.as_deref(), Some("xx"));
        assert_eq!(a_slot.ranges[1], Some((0, 2)));
        let b_slot = trans.attrs[1].captures.borrow();
        assert_eq!(b_slot.text.as_deref(), Some("yyy"));
        assert_eq!(b_slot.ranges[1], Some((0, 3)));
    }
}
