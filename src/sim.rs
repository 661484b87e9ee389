//! The sibling-sequence NFA simulator: epsilon-closure computation and the
//! bitset-based stepping loop.
use fixedbitset_stack::FixedBitSet;
use log::trace;

use crate::document::Node;
use crate::machine::Machine;
use crate::restrict;

/// Cached per-`Machine` simulation state: the epsilon-closure table and two
/// reusable bitsets, sized once the state count is known and reused across
/// every call to [`simulate`].
pub(crate) struct SimCache {
    closure: Vec<FixedBitSet>,
    cur: FixedBitSet,
    next: FixedBitSet,
}

fn build_closure(machine: &Machine) -> Vec<FixedBitSet> {
    let n = machine.state_count();
    let mut closure: Vec<FixedBitSet> = (0..n).map(|_| FixedBitSet::with_capacity(n)).collect();
    for (s, bits) in closure.iter_mut().enumerate() {
        bits.insert(s);
    }
    // Worklist-free fixpoint: a state's closure is the union of its direct
    // epsilon targets' closures, relaxed until nothing changes. Bounded by
    // the epsilon graph's diameter, which is at most `n`.
    let mut changed = true;
    while changed {
        changed = false;
        for s in 0..n {
            let direct: Vec<usize> = machine.states[s]
                .epsilons
                .iter()
                .map(|id| id.index())
                .collect();
            for t in direct {
                let before = closure[s].count_ones(..);
                let addition = closure[t].clone();
                closure[s].union_with(&addition);
                if closure[s].count_ones(..) != before {
                    changed = true;
                }
            }
        }
    }
    closure
}

fn ensure_cache(machine: &Machine) {
    let mut cache = machine.sim_cache.borrow_mut();
    if cache.is_none() {
        let n = machine.state_count();
        let closure = build_closure(machine);
        let cur = FixedBitSet::with_capacity(n);
        let next = FixedBitSet::with_capacity(n);
        *cache = Some(SimCache { closure, cur, next });
    }
}

/// Runs `machine` over `nodes`, one sibling per input symbol.
///
/// `nodes` is a plain iterator rather than a linked "current + next"
/// traversal: isolating a single node for a match attempt (§4.6) is simply
/// `std::iter::once(node)`, and the full sibling list is
/// [`crate::document::SiblingIter`] — neither requires mutating the tree.
pub(crate) fn simulate<N: Node>(machine: &Machine, nodes: impl Iterator<Item = N>) -> bool {
    ensure_cache(machine);
    let mut cache_ref = machine.sim_cache.borrow_mut();
    let cache = cache_ref.as_mut().expect("cache just populated");

    cache.cur.clear();
    cache.cur.union_with(&cache.closure[machine.start.index()]);
    cache.next.clear();

    for node in nodes {
        if cache.cur.count_ones(..) == 0 {
            break;
        }
        let active: Vec<usize> = cache.cur.ones().collect();
        for s in active {
            let Some(trans) = &machine.states[s].trans else {
                continue;
            };
            if !trans.name.matches(node.name()) {
                continue;
            }
            if !restrict::match_attrs(trans, node.attributes()) {
                continue;
            }
            if let Some(child) = &trans.child {
                let child_nodes = crate::document::SiblingIter::new(node.children());
                if !simulate(child, child_nodes) {
                    continue;
                }
            }
            if trans.content_re.is_some() && !restrict::match_content(trans, node.content()) {
                continue;
            }
            trace!("trans at state {s} accepted node {:?}", node.name());
            cache.next.union_with(&cache.closure[trans.target.index()]);
        }
        std::mem::swap(&mut cache.cur, &mut cache.next);
        cache.next.clear();
    }

    cache.cur.contains(machine.finish.index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::{element, TreeNode};
    use crate::machine::SymbolName;

    #[test]
    fn build_closure_follows_transitive_epsilons() {
        let m = Machine::epsilon()
            .concat(Machine::epsilon())
            .concat(Machine::epsilon());
        let closure = build_closure(&m);
        assert!(closure[m.start.index()].contains(m.finish.index()));
    }

    #[test]
    fn build_closure_is_reflexive() {
        let m = Machine::symbol(SymbolName::Literal("a".into()));
        let closure = build_closure(&m);
        for s in 0..m.state_count() {
            assert!(closure[s].contains(s));
        }
    }

    #[test]
    fn simulate_epsilon_machine_accepts_only_empty_list() {
        let m = Machine::epsilon();
        assert!(simulate(&m, std::iter::empty::<TreeNode>()));
        let node = element("a", &[], vec![]);
        assert!(!simulate(&m, std::iter::once(node)));
    }

    #[test]
    fn simulate_symbol_machine_matches_exactly_one_matching_node() {
        let m = Machine::symbol(SymbolName::Literal("a".into()));
        let a = element("a", &[], vec![]);
        let b = element("b", &[], vec![]);
        assert!(simulate(&m, std::iter::once(a.clone())));
        assert!(!simulate(&m, std::iter::once(b)));
        assert!(!simulate(&m, vec![a.clone(), a].into_iter()));
    }

    #[test]
    fn simulate_closure_machine_accepts_any_run_length() {
        let m = Machine::symbol(SymbolName::Literal("a".into())).closure();
        assert!(simulate(&m, std::iter::empty::<TreeNode>()));
        for n in [1usize, 3] {
            let run: Vec<_> = (0..n).map(|_| element("a", &[], vec![])).collect();
            assert!(simulate(&m, run.into_iter()), "n = {n}");
        }
        let mismatched = vec![element("a", &[], vec![]), element("b", &[], vec![])];
        assert!(!simulate(&m, mismatched.into_iter()));
    }
}
