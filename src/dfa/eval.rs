use crate::dfa::{Dfa, DfaState};

/// Tracks the current state of a [Dfa] during evaluation. The current state
/// is `None` once the automaton has fallen into the implicit trap; the trap
/// absorbs all further input.
#[derive(Clone, Debug)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    current: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    /// Checks if the current state is accepting. The trap never is.
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    /// Gets the current state, or `None` for the trap
    pub fn current_state(&self) -> Option<&'a DfaState> {
        self.current.map(|id| &self.dfa.states[id])
    }

    /// Gets the id of the current state, or `None` for the trap
    pub fn current_state_index(&self) -> Option<usize> {
        self.current
    }

    /// Reads one byte and returns the id of the state entered, falling into
    /// the trap if no transition is defined
    pub fn step(&mut self, symbol: u8) -> Option<usize> {
        self.current = self.current.and_then(|id| self.dfa.step(id, symbol));
        self.current
    }

    /// Reads a sequence of bytes and returns the id of the final state, if
    /// the run stayed out of the trap
    pub fn step_multiple(&mut self, input: &[u8]) -> Option<usize> {
        for &symbol in input {
            if self.step(symbol).is_none() {
                break;
            }
        }
        self.current
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(value: &'a Dfa) -> Self {
        Self {
            dfa: value,
            current: Some(value.start),
        }
    }
}
