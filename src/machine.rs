//! The compiled-pattern data model and the Thompson-construction NFA
//! builder primitives/combinators.
use std::cell::RefCell;
use std::fmt;

use crate::sim::SimCache;

/// Maximum number of capture groups in a single embedded flat regex.
pub const RESUBR: usize = 10;

/// A borrowed/owned byte-offset range for one capture group, or `None` if
/// that group did not participate in the match.
pub type CaptureRanges = [Option<(usize, usize)>; RESUBR];

/// The captured text and per-group ranges staged on a [`Trans`] or
/// [`Attribute`] during simulation. `None` until something has matched.
#[derive(Debug, Clone, Default)]
pub struct CaptureSlot {
    pub(crate) text: Option<Box<str>>,
    pub(crate) ranges: CaptureRanges,
}

/// Index of a [`State`] inside its owning [`Machine`]'s arena.
///
/// `#[repr(transparent)]` newtype over `u32`, following the same
/// index-over-pointer convention used throughout the crate's arenas.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) u32);

impl StateId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The name a [`Trans`] matches against a node's tag name.
#[derive(Debug, Clone, displaydoc::Display)]
pub enum SymbolName {
    /// .
    Wildcard,
    /// {0}
    Literal(Box<str>),
}

impl SymbolName {
    pub(crate) fn matches(&self, name: Option<&str>) -> bool {
        match (self, name) {
            (SymbolName::Wildcard, Some(_)) => true,
            (SymbolName::Wildcard, None) => false,
            (SymbolName::Literal(want), Some(got)) => want.eq_ignore_ascii_case(got),
            (SymbolName::Literal(_), None) => false,
        }
    }
}


/// An attribute-value restriction: `name` or `name="regex"`.
#[derive(Debug)]
pub struct Attribute {
    pub(crate) name: Box<str>,
    pub(crate) value_re: Option<regex::Regex>,
    pub(crate) captures: RefCell<CaptureSlot>,
}

impl Attribute {
    pub(crate) fn new(name: Box<str>, value_re: Option<regex::Regex>) -> Self {
        Attribute {
            name,
            value_re,
            captures: RefCell::new(CaptureSlot::default()),
        }
    }
}

/// The single non-epsilon outgoing edge a [`State`] may carry.
pub struct Trans {
    pub(crate) name: SymbolName,
    pub(crate) child: Option<Box<Machine>>,
    pub(crate) content_re: Option<regex::Regex>,
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) target: StateId,
    pub(crate) captures: RefCell<CaptureSlot>,
}

impl fmt::Debug for Trans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trans")
            .field("name", &self.name.to_string())
            .field("has_child", &self.child.is_some())
            .field("has_content_re", &self.content_re.is_some())
            .field("attrs", &self.attrs.len())
            .field("target", &self.target)
            .finish()
    }
}

impl Trans {
    pub(crate) fn new(name: SymbolName, target: StateId) -> Self {
        Trans {
            name,
            child: None,
            content_re: None,
            attrs: Vec::new(),
            target,
            captures: RefCell::new(CaptureSlot::default()),
        }
    }
}

/// One arena-indexed NFA state: at most one [`Trans`], any number of
/// epsilon targets.
#[derive(Debug, Default)]
pub struct State {
    pub(crate) trans: Option<Trans>,
    pub(crate) epsilons: Vec<StateId>,
}

/// A compiled pattern: an arena of [`State`]s plus a start/finish pair.
///
/// Simulating a machine lazily builds and caches an epsilon-closure table
/// and two reusable bitsets (see [`crate::sim`]); the cache lives behind a
/// `RefCell` so `simulate` can take `&Machine` rather than `&mut Machine`,
/// which lets a child machine be simulated from inside the outer
/// simulation's loop without borrow conflicts.
pub struct Machine {
    pub(crate) states: Vec<State>,
    pub(crate) start: StateId,
    pub(crate) finish: StateId,
    pub(crate) sim_cache: RefCell<Option<SimCache>>,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("states", &self.states.len())
            .field("start", &self.start)
            .field("finish", &self.finish)
            .finish()
    }
}

impl Machine {
    fn empty_arena() -> Self {
        Machine {
            states: Vec::new(),
            start: StateId(0),
            finish: StateId(0),
            sim_cache: RefCell::new(None),
        }
    }

    fn push_state(&mut self, state: State) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(state);
        id
    }

    /// `start → finish` via a single `Trans` matching `name`.
    pub(crate) fn symbol(name: SymbolName) -> Machine {
        let mut m = Machine::empty_arena();
        let start = m.push_state(State::default());
        let finish = m.push_state(State::default());
        m.states[start.index()].trans = Some(Trans::new(name, finish));
        m.start = start;
        m.finish = finish;
        m
    }

    /// `start → finish` via a single epsilon edge; accepts the empty
    /// sibling list.
    pub(crate) fn epsilon() -> Machine {
        let mut m = Machine::empty_arena();
        let start = m.push_state(State::default());
        let finish = m.push_state(State::default());
        m.states[start.index()].epsilons.push(finish);
        m.start = start;
        m.finish = finish;
        m
    }

    /// `start` and unreachable `finish`, no edges. Used as a placeholder
    /// for completeness (e.g. an empty alternation arm).
    #[allow(dead_code)]
    pub(crate) fn null() -> Machine {
        let mut m = Machine::empty_arena();
        let start = m.push_state(State::default());
        let finish = m.push_state(State::default());
        m.start = start;
        m.finish = finish;
        m
    }

    /// Relocates `other`'s arena into `self`'s, shifting every `StateId`
    /// `other` contains by `self`'s prior length. Returns the merged
    /// machine together with `other`'s (now-relocated) start and finish.
    fn merge(mut self, mut other: Machine) -> (Machine, StateId, StateId) {
        let offset = self.states.len() as u32;
        for state in &mut other.states {
            for e in &mut state.epsilons {
                e.0 += offset;
            }
            if let Some(t) = &mut state.trans {
                t.target.0 += offset;
            }
        }
        let other_start = StateId(other.start.0 + offset);
        let other_finish = StateId(other.finish.0 + offset);
        self.states.append(&mut other.states);
        (self, other_start, other_finish)
    }

    /// `A.finish --ε--> B.start`; result spans `A.start..B.finish`.
    pub(crate) fn concat(self, other: Machine) -> Machine {
        let self_start = self.start;
        let self_finish = self.finish;
        let (mut merged, other_start, other_finish) = self.merge(other);
        merged.states[self_finish.index()].epsilons.push(other_start);
        merged.start = self_start;
        merged.finish = other_finish;
        merged
    }

    /// New start with epsilons to both operand starts; new finish reached
    /// by epsilons from both operand finals.
    pub(crate) fn alternate(self, other: Machine) -> Machine {
        let self_start = self.start;
        let self_finish = self.finish;
        let (mut merged, other_start, other_finish) = self.merge(other);
        let new_start = merged.push_state(State::default());
        let new_finish = merged.push_state(State::default());
        merged.states[new_start.index()].epsilons.push(self_start);
        merged.states[new_start.index()].epsilons.push(other_start);
        merged.states[self_finish.index()].epsilons.push(new_finish);
        merged.states[other_finish.index()].epsilons.push(new_finish);
        merged.start = new_start;
        merged.finish = new_finish;
        merged
    }

    /// Kleene star: zero or more repetitions of `self`.
    pub(crate) fn closure(mut self) -> Machine {
        let a_start = self.start;
        let a_finish = self.finish;
        let new_start = self.push_state(State::default());
        let new_finish = self.push_state(State::default());
        self.states[new_start.index()].epsilons.push(new_finish);
        self.states[new_start.index()].epsilons.push(a_start);
        self.states[a_finish.index()].epsilons.push(a_start);
        self.states[a_finish.index()].epsilons.push(new_finish);
        self.start = new_start;
        self.finish = new_finish;
        self
    }

    /// Number of states in the arena, a.k.a. `N` in the epsilon-closure
    /// table's dimensions.
    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The `Trans` on a freshly built `symbol(name)` machine, for the
    /// parser to attach a child machine, content regex, or attribute list
    /// to. Panics if called on anything but such a machine.
    pub(crate) fn trans_mut(&mut self) -> &mut Trans {
        self.states[self.start.index()]
            .trans
            .as_mut()
            .expect("trans_mut called on a machine whose start state has no Trans")
    }
}
