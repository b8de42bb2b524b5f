//! # Regular expressions
//!
//! A [Regex] is the parsed AST of a pattern. The syntax is described in the
//! [parser module](crate::parser); the operations here are lowering the AST
//! to an [Nfa] by Thompson's construction ([Regex::to_nfa]) and the full
//! [Regex::compile] pipeline, which takes a pattern all the way to a
//! minimized [Dfa]:
//!
//! ```text
//! pattern → AST → NFA → DFA → minimized DFA
//! ```
//!
//! ## Example
//! ```
//! use motif::regex::Regex;
//!
//! let dfa = Regex::compile("0*1(0|1)*").unwrap();
//! assert!(dfa.accepts(b"1"));
//! assert!(dfa.accepts(b"0001"));
//! assert!(dfa.accepts(b"00110"));
//! assert!(!dfa.accepts(b"000"));
//! ```
//!
//! Counted repetitions are desugared during lowering — `a{m}` into `m`
//! concatenated copies, `a{m,}` into `m` copies and a star, `a{m,n}` into
//! `m` copies and `n − m` options — so each AST node still lowers through
//! exactly one Thompson constructor:
//!
//! ```
//! use motif::regex::Regex;
//!
//! let dfa = Regex::compile("a{2,3}").unwrap();
//! assert!(!dfa.accepts(b"a"));
//! assert!(dfa.accepts(b"aa"));
//! assert!(dfa.accepts(b"aaa"));
//! assert!(!dfa.accepts(b"aaaa"));
//! ```
//!
//! Repetition counts above
//! [MAX_COUNTED_REPEAT](crate::limits::MAX_COUNTED_REPEAT) would blow up the
//! NFA and are rejected with a [ResourceLimit], as is a pattern whose subset
//! construction exceeds the DFA state cap.

use crate::dfa::Dfa;
use crate::limits::{LimitKind, ResourceLimit, MAX_COUNTED_REPEAT};
use crate::nfa::Nfa;
pub use crate::parser::{ParseError, ParseErrorKind};
use thiserror::Error;

/// A parsed regular expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub ast: Ast,
}

/// The AST of a regular expression. `Repeat` keeps its counts; everything
/// else maps one-to-one onto a Thompson constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Literal(u8),
    Dot,
    Class(Vec<u8>),
    Concat(Vec<Ast>),
    Alternate(Vec<Ast>),
    Star(Box<Ast>),
    Plus(Box<Ast>),
    Optional(Box<Ast>),
    Repeat {
        node: Box<Ast>,
        min: u32,
        max: Option<u32>,
    },
    /// `^` or `$`; acceptance is whole-string, so anchors lower to ε
    Anchor,
}

/// Error from [Regex::compile]: either the pattern didn't parse, or
/// compiling it exceeded a resource bound
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Limit(#[from] ResourceLimit),
}

impl Regex {
    /// Parses a pattern. Equivalent to [crate::parser::regex].
    pub fn parse(pattern: &str) -> Result<Self, ParseError> {
        crate::parser::regex(pattern)
    }

    /// Compiles a pattern into a minimized DFA: parse, lower to an NFA,
    /// determinize, minimize.
    pub fn compile(pattern: &str) -> Result<Dfa, CompileError> {
        let regex = Self::parse(pattern)?;
        let nfa = regex.to_nfa()?;
        let mut dfa = nfa.to_dfa()?;
        dfa.minimize();
        Ok(dfa)
    }

    /// Lowers this regular expression to an NFA by Thompson's construction,
    /// composing one fragment per AST node bottom-up
    pub fn to_nfa(&self) -> Result<Nfa, ResourceLimit> {
        lower(&self.ast)
    }
}

fn printable_ascii() -> Vec<u8> {
    (0x20..=0x7e).collect()
}

fn lower(ast: &Ast) -> Result<Nfa, ResourceLimit> {
    Ok(match ast {
        Ast::Literal(symbol) => Nfa::literal(*symbol),
        Ast::Dot => Nfa::one_of(&printable_ascii()),
        Ast::Class(symbols) => Nfa::one_of(symbols),
        Ast::Anchor => Nfa::epsilon(),
        Ast::Concat(items) => lower_all(items)?
            .into_iter()
            .reduce(Nfa::concat)
            .expect("the parser emits non-empty sequences"),
        Ast::Alternate(branches) => lower_all(branches)?
            .into_iter()
            .reduce(Nfa::union)
            .expect("the parser emits non-empty alternations"),
        Ast::Star(node) => lower(node)?.star(),
        Ast::Plus(node) => lower(node)?.plus(),
        Ast::Optional(node) => lower(node)?.optional(),
        Ast::Repeat { node, min, max } => lower_repeat(node, *min, *max)?,
    })
}

fn lower_all(nodes: &[Ast]) -> Result<Vec<Nfa>, ResourceLimit> {
    nodes.iter().map(lower).collect()
}

fn lower_repeat(node: &Ast, min: u32, max: Option<u32>) -> Result<Nfa, ResourceLimit> {
    if min > MAX_COUNTED_REPEAT || max.map_or(false, |m| m > MAX_COUNTED_REPEAT) {
        return Err(ResourceLimit {
            kind: LimitKind::CountedRepeat,
            limit: MAX_COUNTED_REPEAT as usize,
        });
    }
    let mut parts = Vec::new();
    for _ in 0..min {
        parts.push(lower(node)?);
    }
    match max {
        None => parts.push(lower(node)?.star()),
        Some(max) => {
            for _ in min..max {
                parts.push(lower(node)?.optional());
            }
        }
    }
    Ok(parts.into_iter().reduce(Nfa::concat).unwrap_or_else(Nfa::epsilon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cap_is_enforced() {
        let err = Regex::parse("a{2000}").unwrap().to_nfa().unwrap_err();
        assert_eq!(err.kind, LimitKind::CountedRepeat);
        assert!(Regex::parse("a{2,1000}").unwrap().to_nfa().is_ok());
    }

    #[test]
    fn zero_repeats_accept_only_the_empty_string() {
        let dfa = Regex::compile("a{0}").unwrap();
        assert!(dfa.accepts(b""));
        assert!(!dfa.accepts(b"a"));
    }

    #[test]
    fn dot_matches_any_printable_byte() {
        let dfa = Regex::compile(".").unwrap();
        assert!(dfa.accepts(b"x"));
        assert!(dfa.accepts(b" "));
        assert!(dfa.accepts(b"~"));
        assert!(!dfa.accepts(b"\n"));
        assert!(!dfa.accepts(b"xy"));
    }

    #[test]
    fn anchors_lower_to_epsilon() {
        let dfa = Regex::compile("^ab$").unwrap();
        assert!(dfa.accepts(b"ab"));
        assert!(!dfa.accepts(b"aab"));
    }

    #[test]
    fn nfa_and_dfa_agree() {
        let regex = Regex::parse("(ab|a)*b?").unwrap();
        let nfa = regex.to_nfa().unwrap();
        let dfa = nfa.to_dfa().unwrap();
        for input in [&b""[..], b"ab", b"aab", b"abab", b"b", b"ba"] {
            assert_eq!(nfa.accepts(input), dfa.accepts(input), "{input:?}");
        }
    }
}
