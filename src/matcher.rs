//! The recursive tree matcher: runs the simulator at each sibling list,
//! descends into children, and collects [`Match`] records.
use std::rc::Rc;

use crate::document::{Match, Node, RegexMatch, SiblingIter};
use crate::machine::Machine;
use crate::sim;

/// Finds every match of `machine` anywhere in the tree rooted at `first`'s
/// sibling list (and their descendants).
pub(crate) fn find_matches<N: Node>(
    machine: &Machine,
    first: Option<N>,
    capacity_hint: usize,
) -> Vec<Match<N>> {
    let mut out = Vec::with_capacity(capacity_hint);
    recurse(machine, first, &mut out);
    out
}

fn recurse<N: Node>(machine: &Machine, first: Option<N>, out: &mut Vec<Match<N>>) {
    for node in SiblingIter::new(first) {
        // Isolate a single node for the match attempt: `std::iter::once`
        // presents a one-element view without touching the tree, unlike
        // the reference implementation's temporary severing of
        // `next_sibling`.
        if sim::simulate(machine, std::iter::once(node.clone())) {
            let captures = captures::collect(machine);
            out.push(Match {
                node: node.clone(),
                captures,
            });
        }
        recurse(machine, node.children(), out);
    }
}

/// Walks the machine's state arena in construction order after a successful
/// simulation, harvesting whatever captures the simulator staged.
pub(crate) mod captures {
    use super::*;

    pub(crate) fn collect(machine: &Machine) -> Vec<RegexMatch> {
        let mut out = Vec::new();
        for state in &machine.states {
            let Some(trans) = &state.trans else {
                continue;
            };
            // the `->` binding comes after `<attrs>` in the grammar, but is
            // searched first, matching the reference's lookup order.
            if let Some(child) = &trans.child {
                out.extend(collect(child));
            }
            let content_slot = trans.captures.borrow();
            if let Some(text) = &content_slot.text {
                let text: Rc<str> = Rc::from(text.as_ref());
                for range in content_slot.ranges.iter().flatten() {
                    out.push(RegexMatch {
                        text: text.clone(),
                        start: range.0,
                        end: range.1,
                    });
                }
            }
            drop(content_slot);
            for attr in &trans.attrs {
                let slot = attr.captures.borrow();
                let Some(text) = &slot.text else {
                    continue;
                };
                let text: Rc<str> = Rc::from(text.as_ref());
                for range in slot.ranges.iter().flatten() {
                    out.push(RegexMatch {
                        text: text.clone(),
                        start: range.0,
                        end: range.1,
                    });
                }
            }
        }
        out
    }
}
