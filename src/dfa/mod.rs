//! # Deterministic finite automata
//!
//! The DFA module includes the [Dfa] struct: a deterministic transition
//! table over an explicit byte alphabet, produced by
//! [subset construction](crate::nfa::Nfa::to_dfa) from an NFA (usually one
//! [compiled from a regex](crate::regex::Regex::compile)) or loaded from its
//! [JSON form](Dfa::from_json).
//!
//! The transition function is *partial*: a missing entry denotes an implicit
//! non-accepting trap, so evaluation rejects as soon as no transition
//! applies. Two indexes are kept in sync: a flat transition list for
//! enumeration and serialization, and a keyed table for O(1) stepping.
//!
//! ## Example
//! ```
//! use motif::regex::Regex;
//!
//! let dfa = Regex::compile("a(b|c)*d").unwrap();
//! assert!(dfa.accepts(b"abcbd"));
//! assert!(dfa.accepts(b"ad"));
//! assert!(!dfa.accepts(b"abc"));
//!
//! // Compilation already minimized the DFA: one state for "expecting a",
//! // one for the b/c loop, one accepting state.
//! assert_eq!(dfa.states().len(), 3);
//! ```
//!
//! ## Execution
//! [Dfa::accepts] runs the table over a whole input. [Dfa::trace] records
//! every step taken, stopping early when the trap is entered.
//! [Dfa::find_all] scans a text for accepted substrings, reporting
//! non-overlapping `(start, end)` spans: for each start offset the longest
//! accepted span wins (leftmost-longest), the scan resumes past its end,
//! and zero-length spans are never reported. A [DfaEvaluator] exposes the
//! raw stepping if you need to drive the automaton yourself.
//!
//! ```
//! use motif::regex::Regex;
//!
//! let dfa = Regex::compile("AT?G").unwrap();
//! assert_eq!(dfa.find_all(b"ATGAG"), vec![(0, 3), (3, 5)]);
//! ```
//!
//! ## Minimization
//! [Dfa::minimize] first removes unreachable states, then runs Hopcroft's
//! partition refinement (on the trap-completed table, keeping the classic
//! smaller-half worklist rule) and rebuilds the automaton with one
//! representative per equivalence class. Equivalence classes are ordered by
//! their smallest member, so minimizing equal automata yields equal results,
//! and minimizing twice is the identity on the second pass. States merged
//! with the trap are dropped entirely, keeping the table partial.
//!
//! [Dfa::equivalent_to] decides language equality of two DFAs directly by
//! walking reachable state pairs, without constructing a product automaton.

use crate::nfa::{Nfa, NfaState, NfaTransition};
use crate::symbol::Symbol;
pub use eval::DfaEvaluator;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

pub mod eval;

/// A deterministic finite automaton with a partial transition function. See
/// the [module-level documentation](crate::dfa) for more info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Vec<u8>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) transitions: Vec<DfaTransition>,
    pub(crate) table: HashMap<(usize, u8), usize>,
    pub(crate) start: usize,
}

/// A state in a DFA: an optional label and an accepting flag. The state's id
/// is its index in the automaton's state table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) label: Option<Rc<str>>,
    pub(crate) accepting: bool,
}

/// A single entry of a DFA's transition function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfaTransition {
    pub from: usize,
    pub to: usize,
    pub symbol: u8,
}

/// One step of a [Dfa::trace] run: the transition taken and whether it
/// landed in an accepting state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceStep {
    pub from: usize,
    pub symbol: u8,
    pub to: usize,
    pub accepting: bool,
}

impl DfaState {
    /// Gets the label of this state, if it has one
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub(crate) fn numbered(id: usize, accepting: bool) -> Self {
        DfaState {
            label: Some(Rc::from(id.to_string())),
            accepting,
        }
    }
}

impl From<Dfa> for Nfa {
    fn from(value: Dfa) -> Self {
        value.to_nfa()
    }
}

impl Dfa {
    /// Builds a DFA from its parts, sorting the flat transition list by
    /// `(from, symbol)` and deriving the keyed step table from it
    pub(crate) fn from_parts(
        alphabet: Vec<u8>,
        states: Vec<DfaState>,
        mut transitions: Vec<DfaTransition>,
        start: usize,
    ) -> Self {
        transitions.sort_unstable_by_key(|t| (t.from, t.symbol, t.to));
        let table: HashMap<(usize, u8), usize> = transitions
            .iter()
            .map(|t| ((t.from, t.symbol), t.to))
            .collect();
        debug_assert_eq!(table.len(), transitions.len(), "duplicate (state, symbol) pair");
        debug_assert!(start < states.len());
        Dfa {
            alphabet,
            states,
            transitions,
            table,
            start,
        }
    }

    /// Gets the alphabet of this DFA, sorted ascending
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the transitions of this DFA, sorted by `(from, symbol)`
    pub fn transitions(&self) -> &[DfaTransition] {
        self.transitions.as_slice()
    }

    /// Gets the id of the start state
    pub fn start(&self) -> usize {
        self.start
    }

    /// Looks up the successor of `state` on `symbol`, or `None` if the
    /// transition leads into the implicit trap
    pub fn step(&self, state: usize, symbol: u8) -> Option<usize> {
        self.table.get(&(state, symbol)).copied()
    }

    /// Checks if this automaton accepts the given input. Runs in time linear
    /// in the input length.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut eval = self.evaluator();
        eval.step_multiple(input);
        eval.is_accepting()
    }

    /// Checks if this automaton accepts the bytes of the given string
    pub fn accepts_str(&self, input: &str) -> bool {
        self.accepts(input.as_bytes())
    }

    /// Gets an evaluator, which tracks the current state during evaluation
    /// of an input
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Runs the automaton over `input`, recording each transition taken.
    /// The trace stops at the first missing transition, so it is shorter
    /// than the input iff the run fell into the trap. The input is accepted
    /// iff the trace covers all of it and its last step (or, for empty
    /// input, the start state) is accepting.
    pub fn trace(&self, input: &[u8]) -> Vec<TraceStep> {
        let mut steps = Vec::with_capacity(input.len());
        let mut current = self.start;
        for &symbol in input {
            match self.step(current, symbol) {
                Some(next) => {
                    steps.push(TraceStep {
                        from: current,
                        symbol,
                        to: next,
                        accepting: self.states[next].accepting,
                    });
                    current = next;
                }
                None => break,
            }
        }
        steps
    }

    /// Scans `text` for substrings accepted by this automaton, returning
    /// non-overlapping `(start, end)` spans in ascending order. For each
    /// start offset the longest accepted span is reported and the scan
    /// resumes at its end; zero-length spans are suppressed.
    pub fn find_all(&self, text: &[u8]) -> Vec<(usize, usize)> {
        let mut matches = Vec::new();
        let mut start = 0;
        while start < text.len() {
            let mut current = self.start;
            let mut best = None;
            for (offset, &symbol) in text[start..].iter().enumerate() {
                match self.step(current, symbol) {
                    Some(next) => {
                        current = next;
                        if self.states[current].accepting {
                            best = Some(start + offset + 1);
                        }
                    }
                    None => break,
                }
            }
            match best {
                Some(end) => {
                    matches.push((start, end));
                    start = end;
                }
                None => start += 1,
            }
        }
        matches
    }

    /// Minimizes this DFA: removes unreachable states, then merges
    /// non-distinguishable ones using Hopcroft's partition refinement. The
    /// result is the unique minimal DFA for the language, with equivalence
    /// classes numbered by their smallest representative and the
    /// representative's label preserved, so minimization is idempotent and
    /// deterministic. States indistinguishable from the trap are dropped.
    ///
    /// ```
    /// use motif::regex::Regex;
    ///
    /// let mut dfa = Regex::parse("(aa)*(aa)*").unwrap()
    ///     .to_nfa().unwrap()
    ///     .to_dfa().unwrap();
    /// dfa.minimize();
    /// // Even number of a:s: one state for even, one for odd
    /// assert_eq!(dfa.states().len(), 2);
    /// assert!(dfa.accepts(b"aaaa"));
    /// assert!(!dfa.accepts(b"aaa"));
    /// ```
    pub fn minimize(&mut self) {
        self.remove_unreachable_states();
        let n = self.states.len();
        let trap = n;
        let columns = self.alphabet.len();

        // Complete the transition table with an explicit trap row so that
        // refinement works over a total function
        let mut delta = vec![vec![trap; columns]; n + 1];
        for t in &self.transitions {
            delta[t.from][self.symbol_index(t.symbol)] = t.to;
        }

        let (finals, nonfinals): (BTreeSet<usize>, BTreeSet<usize>) =
            (0..=n).partition(|&q| q < n && self.states[q].accepting);
        let mut partition: Vec<BTreeSet<usize>> = [finals, nonfinals]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        let mut worklist = partition.clone();

        while let Some(splitter) = worklist.pop() {
            for column in 0..columns {
                let x: BTreeSet<usize> =
                    (0..=n).filter(|&q| splitter.contains(&delta[q][column])).collect();
                if x.is_empty() {
                    continue;
                }
                let mut refined = Vec::with_capacity(partition.len());
                for block in std::mem::take(&mut partition) {
                    let intersection: BTreeSet<usize> = block.intersection(&x).copied().collect();
                    if intersection.is_empty() || intersection.len() == block.len() {
                        refined.push(block);
                        continue;
                    }
                    let difference: BTreeSet<usize> = block.difference(&x).copied().collect();
                    if let Some(idx) = worklist.iter().position(|b| *b == block) {
                        worklist.swap_remove(idx);
                        worklist.push(intersection.clone());
                        worklist.push(difference.clone());
                    } else if intersection.len() <= difference.len() {
                        // the smaller half keeps the worklist logarithmic
                        worklist.push(intersection.clone());
                    } else {
                        worklist.push(difference.clone());
                    }
                    refined.push(intersection);
                    refined.push(difference);
                }
                partition = refined;
            }
        }

        // Stable output numbering: classes ordered by smallest member
        partition.sort_by_key(|block| block.first().copied());
        let mut class_of = vec![0usize; n + 1];
        for (class, block) in partition.iter().enumerate() {
            for &q in block {
                class_of[q] = class;
            }
        }
        let trap_class = class_of[trap];
        let start_class = class_of[self.start];

        // Number every class except the trap's; if the start state itself is
        // indistinguishable from the trap (empty language), its class is
        // kept as the lone start state.
        let mut new_id = vec![None; partition.len()];
        let mut count = 0;
        for class in 0..partition.len() {
            if class == trap_class && class != start_class {
                continue;
            }
            new_id[class] = Some(count);
            count += 1;
        }

        let mut states = Vec::with_capacity(count);
        let mut transitions = Vec::new();
        for (class, block) in partition.iter().enumerate() {
            let Some(from) = new_id[class] else { continue };
            // trap is the largest id, so any class holding a real state has
            // a real representative
            let representative = block.first().copied().expect("partition blocks are non-empty");
            states.push(self.states[representative].clone());
            for (column, &symbol) in self.alphabet.iter().enumerate() {
                let target_class = class_of[delta[representative][column]];
                if target_class == trap_class {
                    continue;
                }
                let to = new_id[target_class].expect("non-trap classes are numbered");
                transitions.push(DfaTransition { from, to, symbol });
            }
        }
        let start = new_id[start_class].expect("the start class is always numbered");
        let alphabet = std::mem::take(&mut self.alphabet);
        *self = Dfa::from_parts(alphabet, states, transitions, start);
    }

    fn symbol_index(&self, symbol: u8) -> usize {
        self.alphabet
            .binary_search(&symbol)
            .expect("the alphabet is closed over all transition symbols")
    }

    /// Removes all states that cannot be reached from the start state by any
    /// input, renumbering the remaining states in ascending id order
    pub fn remove_unreachable_states(&mut self) {
        let mut reachable = BTreeSet::from([self.start]);
        let mut work = vec![self.start];
        while let Some(q) = work.pop() {
            for &symbol in &self.alphabet {
                if let Some(next) = self.step(q, symbol) {
                    if reachable.insert(next) {
                        work.push(next);
                    }
                }
            }
        }
        if reachable.len() == self.states.len() {
            return;
        }
        let remap: HashMap<usize, usize> = reachable
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();
        let states = reachable.iter().map(|&old| self.states[old].clone()).collect();
        let transitions = self
            .transitions
            .iter()
            .filter(|t| remap.contains_key(&t.from))
            .map(|t| DfaTransition {
                from: remap[&t.from],
                to: remap[&t.to],
                symbol: t.symbol,
            })
            .collect();
        let start = remap[&self.start];
        let alphabet = std::mem::take(&mut self.alphabet);
        *self = Dfa::from_parts(alphabet, states, transitions, start);
    }

    /// Checks if this DFA is equivalent to another DFA, that is, if they
    /// have the same alphabet and accept the same language. State counts,
    /// numbering and labels don't matter. The check walks reachable state
    /// pairs (with the implicit traps paired like ordinary states) and never
    /// constructs a product automaton.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        if self.alphabet != other.alphabet {
            return false;
        }

        let initial = (Some(self.start), Some(other.start));
        let mut explored = HashSet::from([initial]);
        let mut to_explore = vec![initial];

        while let Some((s1, s2)) = to_explore.pop() {
            let a1 = s1.map_or(false, |q| self.states[q].accepting);
            let a2 = s2.map_or(false, |q| other.states[q].accepting);
            if a1 != a2 {
                return false;
            }
            for &symbol in &self.alphabet {
                let pair = (
                    s1.and_then(|q| self.step(q, symbol)),
                    s2.and_then(|q| other.step(q, symbol)),
                );
                if explored.insert(pair) {
                    to_explore.push(pair);
                }
            }
        }
        true
    }

    /// Converts this DFA to an NFA by reinterpreting every transition as a
    /// singleton transition set. All labels are kept; the conversion is
    /// cheap and never fails.
    pub fn to_nfa(self) -> Nfa {
        let Dfa {
            states,
            transitions,
            start,
            ..
        } = self;
        Nfa {
            states: states
                .into_iter()
                .map(|s| NfaState {
                    label: s.label,
                    accepting: s.accepting,
                })
                .collect(),
            transitions: transitions
                .into_iter()
                .map(|t| NfaTransition {
                    from: t.from,
                    to: t.to,
                    symbol: Symbol::Byte(t.symbol),
                })
                .collect(),
            start: Some(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn trace_stops_at_the_trap() {
        let dfa = Regex::compile("ab").unwrap();
        let full = dfa.trace(b"ab");
        assert_eq!(full.len(), 2);
        assert!(full[1].accepting);
        assert!(!full[0].accepting);

        let cut = dfa.trace(b"ax");
        assert_eq!(cut.len(), 1);
    }

    #[test]
    fn find_all_is_leftmost_longest() {
        let dfa = Regex::compile("ab*").unwrap();
        assert_eq!(dfa.find_all(b"abbaab"), vec![(0, 3), (3, 4), (4, 6)]);
        // No zero-length spans even though a* accepts the empty string
        let star = Regex::compile("a*").unwrap();
        assert_eq!(star.find_all(b"bab"), vec![(1, 2)]);
        assert_eq!(star.find_all(b"bbb"), vec![]);
    }

    #[test]
    fn minimization_is_idempotent() {
        let mut dfa = Regex::parse("a(b|c)*d|ad")
            .unwrap()
            .to_nfa()
            .unwrap()
            .to_dfa()
            .unwrap();
        dfa.minimize();
        let once = dfa.clone();
        dfa.minimize();
        assert_eq!(dfa, once);
    }

    #[test]
    fn minimization_of_the_empty_language() {
        // ∅: no accepting state survives minimization except the start
        let nfa = crate::nfa::Nfa::literal(b'a').concat(crate::nfa::Nfa::literal(b'b'));
        let mut dfa = nfa.to_dfa().unwrap();
        // make it empty by demoting everything
        let mut no_accept = dfa.clone();
        for state in &mut no_accept.states {
            state.accepting = false;
        }
        no_accept.minimize();
        assert_eq!(no_accept.states().len(), 1);
        assert!(no_accept.transitions().is_empty());
        assert!(!no_accept.accepts(b""));
        assert!(!no_accept.accepts(b"ab"));

        dfa.minimize();
        assert!(dfa.accepts(b"ab"));
    }

    #[test]
    fn equivalence_ignores_numbering() {
        let first = Regex::compile("(a|b)*abb").unwrap();
        let unminimized = Regex::parse("(a|b)*abb")
            .unwrap()
            .to_nfa()
            .unwrap()
            .to_dfa()
            .unwrap();
        assert!(first.equivalent_to(&unminimized));
        assert!(unminimized.equivalent_to(&first));
        let other = Regex::compile("(a|b)*aba").unwrap();
        assert!(!first.equivalent_to(&other));
    }
}
