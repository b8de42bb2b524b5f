use crate::nfa::Nfa;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Tracks the set of states an [Nfa] can be in while reading an input, byte
/// by byte. The set always includes its own ε-closure, starts as the closure
/// of the start state, and is kept in a [BTreeSet] so that iteration order
/// (and anything keyed on the set, like subset construction) is
/// deterministic.
#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    adjacency: Rc<Adjacency>,
    current: BTreeSet<usize>,
}

/// Per-state successor lists, built once per evaluator so that stepping does
/// not rescan the flat transition list
#[derive(Debug)]
struct Adjacency {
    epsilon: Vec<Vec<usize>>,
    by_symbol: Vec<HashMap<u8, Vec<usize>>>,
}

impl<'a> NfaEvaluator<'a> {
    /// Checks if any state in the current set is accepting
    pub fn is_accepting(&self) -> bool {
        self.current.iter().any(|&id| self.nfa.states[id].accepting)
    }

    /// Gets the current set of states, ordered by id
    pub fn current_states(&self) -> &BTreeSet<usize> {
        &self.current
    }

    /// Reads one byte, moving to the ε-closure of the successors of the
    /// current set. Bytes outside the alphabet empty the set.
    pub fn step(&mut self, symbol: u8) {
        let adjacency = self.adjacency.clone();
        self.current = self
            .current
            .iter()
            .filter_map(|&id| adjacency.by_symbol[id].get(&symbol))
            .flatten()
            .copied()
            .collect();
        self.include_closure();
    }

    /// Reads a sequence of bytes
    pub fn step_multiple(&mut self, input: &[u8]) {
        for &symbol in input {
            self.step(symbol);
        }
    }

    fn include_closure(&mut self) {
        let mut work: Vec<usize> = self.current.iter().copied().collect();
        while let Some(id) = work.pop() {
            for &target in &self.adjacency.epsilon[id] {
                if self.current.insert(target) {
                    work.push(target);
                }
            }
        }
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(value: &'a Nfa) -> Self {
        let mut epsilon = vec![Vec::new(); value.states.len()];
        let mut by_symbol: Vec<HashMap<u8, Vec<usize>>> = vec![HashMap::new(); value.states.len()];
        for t in &value.transitions {
            match t.symbol {
                Symbol::Epsilon => epsilon[t.from].push(t.to),
                Symbol::Byte(b) => by_symbol[t.from].entry(b).or_default().push(t.to),
            }
        }
        let mut evaluator = Self {
            nfa: value,
            adjacency: Rc::new(Adjacency { epsilon, by_symbol }),
            current: value.start.into_iter().collect(),
        };
        evaluator.include_closure();
        evaluator
    }
}
