//!# motif
//!
//! `motif` is an automata-theoretic pattern engine. It compiles regular
//! expressions into NFAs by Thompson's construction, determinizes them by
//! subset construction, minimizes the result with Hopcroft's algorithm and
//! executes it in linear time; it extends the same machinery to approximate
//! matching with Levenshtein automata (including both-strand scanning for
//! DNA); and it simulates nondeterministic pushdown automata, pre-built or
//! translated from context-free grammars.
//!
//! ## Usage
//!
//! ```rust
//! use motif::approx::{EditKinds, Matcher};
//! use motif::pda::Pda;
//! use motif::regex::Regex;
//!
//! fn main() {
//!     // Exact matching: pattern → minimized DFA → scan
//!     let dfa = Regex::compile("AT[GC]").unwrap();
//!     assert!(dfa.accepts(b"ATG"));
//!     assert_eq!(dfa.find_all(b"ATGxATC"), vec![(0, 3), (4, 7)]);
//!
//!     // Approximate matching: up to one edit of any kind
//!     let matcher = Matcher::new(b"ATG", 1, EditKinds::all());
//!     assert!(matcher.find(b"xxATCxx").iter().any(|m| m.distance == 1));
//!
//!     // Context-free input: a nondeterministic stack machine
//!     let parens = Pda::balanced_parens();
//!     assert!(parens.accepts_final(b"(())()"));
//!     assert!(!parens.accepts_final(b"(()"));
//! }
//! ```
//!
//! ## Pipelines
//!
//! The exact pipeline is `pattern → AST → NFA → DFA → minimized DFA`:
//! parsing lives in [parser], lowering in [regex], the automata in [nfa] and
//! [dfa]. The approximate pipeline builds a Levenshtein automaton instead of
//! a Thompson one, see [approx]. The context-free pipeline is orthogonal:
//! grammars ([cfg], parsed by [parser::grammar]) translate into pushdown
//! automata simulated by BFS over configurations ([pda]).
//!
//! All automata have canonical, round-trippable [JSON forms](json).
//!
//! ## Determinism and bounds
//!
//! For the same inputs the engine produces bit-identical outputs: state sets
//! are kept ordered by id, subset construction numbers states in discovery
//! order, minimization orders equivalence classes by smallest
//! representative, and serialization sorts at the boundary. The exponential
//! corners (subset construction, PDA ε-loops, counted repetitions) are
//! capped by the bounds in [limits] and report structured
//! [ResourceLimit](limits::ResourceLimit) values instead of diverging.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing regular expressions](parser::regex) with classes, counted
//!   repetitions and indexed parse errors
//! * [Lowering a regex to an NFA](regex::Regex::to_nfa) and
//!   [compiling straight to a minimized DFA](regex::Regex::compile)
//! * [Building NFAs by hand](nfa::Nfa::add_state), querying
//!   [ε-closures](nfa::Nfa::epsilon_closure) and the
//!   [extended transition function](nfa::Nfa::extended_delta)
//! * [Subset construction](nfa::Nfa::to_dfa) and
//!   [Hopcroft minimization](dfa::Dfa::minimize)
//! * Linear-time [acceptance](dfa::Dfa::accepts), [tracing](dfa::Dfa::trace)
//!   and [leftmost-longest scanning](dfa::Dfa::find_all)
//! * [Checking two DFAs for language equality](dfa::Dfa::equivalent_to)
//! * [Approximate matching](approx::Matcher) within a bounded edit distance,
//!   on [one](approx::Matcher::find) or
//!   [both](approx::Matcher::find_both_strands) DNA strands
//! * [Simulating PDAs](pda::Pda::simulate) by final state or empty stack,
//!   with [shortest accepting runs](pda::Pda::witness) as witnesses
//! * [Translating CFGs to PDAs](cfg::Cfg::to_pda)
//! * [Canonical JSON serialization](json) of NFAs, DFAs and PDAs

pub mod approx;
pub mod cfg;
pub mod dfa;
pub mod json;
pub mod limits;
pub mod nfa;
pub mod parser;
pub mod pda;
pub mod regex;
pub mod symbol;

#[cfg(test)]
mod tests;
