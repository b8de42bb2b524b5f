//! # Pushdown automata
//!
//! The PDA module includes the [Pda] struct, a nondeterministic stack
//! machine. A transition `(from, to, input, pop, push)` applies when the
//! machine is in `from`, the next input byte equals `input` (or `input` is
//! ε) and the stack top equals `pop` (or `pop` is ε); taking it consumes the
//! matched input byte and popped symbol and pushes `push` onto the stack.
//! Push strings are stored bottom-first: the last byte of `push` ends up on
//! top.
//!
//! A machine starts in its start state with exactly the initial stack
//! symbol on the stack. Two acceptance criteria are supported, selected per
//! call: by final state (input consumed, state accepting) and by empty
//! stack (input consumed, stack empty). The [simulator](Pda::simulate)
//! explores configurations breadth-first and can return the shortest
//! accepting run as a witness; see [crate::pda::sim].
//!
//! ## Example
//! ```
//! use motif::pda::Pda;
//!
//! let parens = Pda::balanced_parens();
//! assert!(parens.accepts_final(b"(())()"));
//! assert!(parens.accepts_empty(b"(())()"));
//! assert!(!parens.accepts_final(b"(()"));
//! assert!(!parens.accepts_final(b")("));
//! ```
//!
//! Besides [Pda::balanced_parens], pre-built machines are provided for
//! `aⁿbⁿ` ([Pda::a_n_b_n]), even-length palindromes over `{a, b}`
//! ([Pda::even_palindrome]) and RNA stem-loops ([Pda::rna_stem_loop]). PDAs
//! for arbitrary context-free languages come from
//! [Cfg::to_pda](crate::cfg::Cfg::to_pda).

use crate::nfa::InvalidState;
use std::rc::Rc;

pub mod sim;
pub use sim::{Acceptance, Config, Simulation, WitnessStep};

/// A nondeterministic pushdown automaton. See the
/// [module-level documentation](crate::pda) for more info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pda {
    pub(crate) states: Vec<PdaState>,
    pub(crate) transitions: Vec<PdaTransition>,
    pub(crate) start: Option<usize>,
    pub(crate) initial_stack: u8,
}

/// A state in a PDA: an optional label and an accepting flag. The state's
/// id is its index in the automaton's state table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdaState {
    pub(crate) label: Option<Rc<str>>,
    pub(crate) accepting: bool,
}

/// A transition of a [Pda]. `input` and `pop` use `None` for ε. `push` is
/// bottom-first: its last byte becomes the new stack top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdaTransition {
    pub from: usize,
    pub to: usize,
    pub input: Option<u8>,
    pub pop: Option<u8>,
    pub push: Vec<u8>,
}

impl PdaState {
    /// Gets the label of this state, if it has one
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

impl Pda {
    /// Creates an empty PDA whose runs start with `initial_stack` as the
    /// only stack symbol
    pub fn new(initial_stack: u8) -> Self {
        Pda {
            states: Vec::new(),
            transitions: Vec::new(),
            start: None,
            initial_stack,
        }
    }

    /// Allocates a fresh state and returns its id
    pub fn add_state(&mut self, label: Option<&str>, accepting: bool) -> usize {
        self.states.push(PdaState {
            label: label.map(Rc::from),
            accepting,
        });
        self.states.len() - 1
    }

    /// Marks `id` as the start state, replacing any previous start state
    pub fn set_start(&mut self, id: usize) -> Result<(), InvalidState> {
        self.check(id)?;
        self.start = Some(id);
        Ok(())
    }

    /// Sets the accepting flag of `id`
    pub fn set_accepting(&mut self, id: usize, accepting: bool) -> Result<(), InvalidState> {
        self.check(id)?;
        self.states[id].accepting = accepting;
        Ok(())
    }

    /// Adds a transition. `input` and `pop` are ε when `None`; `push` is
    /// bottom-first.
    pub fn add_transition(
        &mut self,
        from: usize,
        to: usize,
        input: Option<u8>,
        pop: Option<u8>,
        push: &[u8],
    ) -> Result<(), InvalidState> {
        self.check(from)?;
        self.check(to)?;
        self.rule(from, to, input, pop, push);
        Ok(())
    }

    fn check(&self, id: usize) -> Result<(), InvalidState> {
        if id < self.states.len() {
            Ok(())
        } else {
            Err(InvalidState(id))
        }
    }

    /// Appends a transition whose endpoints are known to exist
    pub(crate) fn rule(&mut self, from: usize, to: usize, input: Option<u8>, pop: Option<u8>, push: &[u8]) {
        debug_assert!(from < self.states.len() && to < self.states.len());
        self.transitions.push(PdaTransition {
            from,
            to,
            input,
            pop,
            push: push.to_vec(),
        });
    }

    /// Gets the states of this PDA
    pub fn states(&self) -> &[PdaState] {
        self.states.as_slice()
    }

    /// Gets the transitions of this PDA, in insertion order
    pub fn transitions(&self) -> &[PdaTransition] {
        self.transitions.as_slice()
    }

    /// Gets the id of the start state, if one has been set
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// Gets the initial stack symbol
    pub fn initial_stack(&self) -> u8 {
        self.initial_stack
    }

    /// Balanced parentheses over `(` and `)`. One state pushes and pops; an
    /// ε-transition popping the bottom marker enters the accepting state, so
    /// acceptance by final state and by empty stack coincide.
    pub fn balanced_parens() -> Self {
        let mut pda = Pda::new(b'Z');
        let q = pda.add_state(Some("q"), false);
        let f = pda.add_state(Some("f"), true);
        pda.rule(q, q, Some(b'('), None, b"(");
        pda.rule(q, q, Some(b')'), Some(b'('), b"");
        pda.rule(q, f, None, Some(b'Z'), b"");
        pda.start = Some(q);
        pda
    }

    /// The language `aⁿbⁿ` (n ≥ 0): a push phase on `a`, a nondeterministic
    /// switch, and a pop phase on `b`
    pub fn a_n_b_n() -> Self {
        let mut pda = Pda::new(b'Z');
        let p = pda.add_state(Some("push"), false);
        let q = pda.add_state(Some("pop"), false);
        let f = pda.add_state(Some("f"), true);
        pda.rule(p, p, Some(b'a'), None, b"a");
        pda.rule(p, q, None, None, b"");
        pda.rule(q, q, Some(b'b'), Some(b'a'), b"");
        pda.rule(q, f, None, Some(b'Z'), b"");
        pda.start = Some(p);
        pda
    }

    /// Even-length palindromes `w·wᴿ` over `{a, b}`: the first half is
    /// pushed, the middle is guessed by an ε-transition, and the second half
    /// must pop its own mirror image
    pub fn even_palindrome() -> Self {
        let mut pda = Pda::new(b'Z');
        let s = pda.add_state(Some("push"), false);
        let t = pda.add_state(Some("pop"), false);
        let f = pda.add_state(Some("f"), true);
        for b in *b"ab" {
            pda.rule(s, s, Some(b), None, &[b]);
        }
        pda.rule(s, t, None, None, b"");
        for b in *b"ab" {
            pda.rule(t, t, Some(b), Some(b), b"");
        }
        pda.rule(t, f, None, Some(b'Z'), b"");
        pda.start = Some(s);
        pda
    }

    /// RNA stem-loops with a blunt loop: bases are pushed on the way up,
    /// an ε-transition guesses the turn, and the way down must pair each
    /// base with its Watson-Crick complement (A–U, G–C) on the stack
    pub fn rna_stem_loop() -> Self {
        let mut pda = Pda::new(b'Z');
        let s = pda.add_state(Some("ascend"), false);
        let t = pda.add_state(Some("descend"), false);
        let f = pda.add_state(Some("f"), true);
        for base in *b"ACGU" {
            pda.rule(s, s, Some(base), None, &[base]);
        }
        pda.rule(s, t, None, None, b"");
        for (base, pair) in [(b'U', b'A'), (b'A', b'U'), (b'C', b'G'), (b'G', b'C')] {
            pda.rule(t, t, Some(base), Some(pair), b"");
        }
        pda.rule(t, f, None, Some(b'Z'), b"");
        pda.start = Some(s);
        pda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_unknown_states() {
        let mut pda = Pda::new(b'Z');
        let q = pda.add_state(None, false);
        assert_eq!(pda.set_start(1), Err(InvalidState(1)));
        assert_eq!(pda.add_transition(q, 5, None, None, b""), Err(InvalidState(5)));
    }

    #[test]
    fn a_n_b_n_language() {
        let pda = Pda::a_n_b_n();
        assert!(pda.accepts_empty(b""));
        assert!(pda.accepts_final(b"ab"));
        assert!(pda.accepts_final(b"aaabbb"));
        assert!(!pda.accepts_final(b"aabbb"));
        assert!(!pda.accepts_final(b"aaabb"));
        assert!(!pda.accepts_final(b"ba"));
    }

    #[test]
    fn even_palindromes() {
        let pda = Pda::even_palindrome();
        assert!(pda.accepts_final(b"abba"));
        assert!(pda.accepts_final(b"aa"));
        assert!(pda.accepts_final(b""));
        assert!(!pda.accepts_final(b"abab"));
        assert!(!pda.accepts_final(b"aba"));
    }

    #[test]
    fn stem_loops_pair_complements() {
        let pda = Pda::rna_stem_loop();
        assert!(pda.accepts_final(b"GCAUGC")); // GCA / UGC pair up
        assert!(pda.accepts_final(b"AU"));
        assert!(!pda.accepts_final(b"AA"));
        assert!(!pda.accepts_final(b"GCAUGG"));
    }
}
