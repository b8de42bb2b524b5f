//! # Context-free grammars
//!
//! The CFG module includes the [Cfg] struct, a validated context-free
//! grammar `(V, T, P, S)`, and its translation to a [Pda]. Grammars are
//! written in the line-oriented text format described in the
//! [parser module](crate::parser) and validated in a second step with
//! [TryInto], the same two-phase scheme the regex pipeline uses:
//!
//! ```
//! use motif::cfg::Cfg;
//! use motif::parser;
//!
//! // a^n b^n
//! let cfg: Cfg = parser::grammar("S -> a S b | ε").unwrap().try_into().unwrap();
//! let pda = cfg.to_pda();
//! assert!(pda.accepts_empty(b"aaabbb"));
//! assert!(pda.accepts_final(b"aaabbb"));
//! assert!(!pda.accepts_empty(b"aabbb"));
//! ```
//!
//! Nonterminals are single uppercase ASCII letters, terminals are all other
//! printable ASCII characters, and the start symbol is the head of the
//! first rule.

use crate::parser::ParsedCfg;
use crate::pda::Pda;
use std::collections::BTreeSet;
use thiserror::Error;

/// The reasons a [ParsedCfg](crate::parser::ParsedCfg) can fail validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CfgParseError<'a> {
    #[error("production head '{0}' is not an uppercase ASCII nonterminal")]
    HeadNotNonterminal(&'a str),
    #[error("nonterminal '{0}' has no production")]
    UndefinedNonterminal(char),
    #[error("symbol '{0}' is not printable ASCII")]
    UnsupportedSymbol(char),
}

/// One symbol of a production body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgSymbol {
    Nonterminal(u8),
    Terminal(u8),
}

impl CfgSymbol {
    /// Gets the byte of this symbol, which doubles as its PDA stack symbol
    pub fn byte(self) -> u8 {
        match self {
            CfgSymbol::Nonterminal(b) | CfgSymbol::Terminal(b) => b,
        }
    }
}

/// A production `A → α`; an empty body is an ε-production
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: u8,
    pub body: Vec<CfgSymbol>,
}

/// A validated context-free grammar. Nonterminals and terminals are
/// disjoint by construction (uppercase ASCII versus the rest of printable
/// ASCII). Obtained by converting a [ParsedCfg] with [TryInto].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cfg {
    pub(crate) nonterminals: Vec<u8>,
    pub(crate) terminals: Vec<u8>,
    pub(crate) productions: Vec<Production>,
    pub(crate) start: u8,
}

fn is_nonterminal(byte: u8) -> bool {
    byte.is_ascii_uppercase()
}

impl<'a> TryFrom<ParsedCfg<'a>> for Cfg {
    type Error = CfgParseError<'a>;

    fn try_from(value: ParsedCfg<'a>) -> Result<Self, Self::Error> {
        use CfgParseError::*;

        let mut nonterminals: Vec<u8> = Vec::new();
        for rule in &value.rules {
            let mut chars = rule.head.chars();
            let head = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() && is_nonterminal(c as u8) => c as u8,
                _ => return Err(HeadNotNonterminal(rule.head)),
            };
            if !nonterminals.contains(&head) {
                nonterminals.push(head);
            }
        }

        let mut terminals = BTreeSet::new();
        let mut productions = Vec::new();
        for rule in &value.rules {
            let head = rule.head.as_bytes()[0];
            for alternative in &rule.alternatives {
                let mut body = Vec::new();
                for token in alternative {
                    for c in token.chars() {
                        if !c.is_ascii() || !(' '..='~').contains(&c) {
                            return Err(UnsupportedSymbol(c));
                        }
                        let byte = c as u8;
                        if is_nonterminal(byte) {
                            if !nonterminals.contains(&byte) {
                                return Err(UndefinedNonterminal(c));
                            }
                            body.push(CfgSymbol::Nonterminal(byte));
                        } else {
                            terminals.insert(byte);
                            body.push(CfgSymbol::Terminal(byte));
                        }
                    }
                }
                productions.push(Production { head, body });
            }
        }

        let start = value
            .rules
            .first()
            .map(|rule| rule.head.as_bytes()[0])
            .expect("the grammar parser requires at least one rule");

        Ok(Cfg {
            nonterminals,
            terminals: terminals.into_iter().collect(),
            productions,
            start,
        })
    }
}

impl Cfg {
    /// Gets the start symbol
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Gets the nonterminals, in order of first appearance as a rule head
    pub fn nonterminals(&self) -> &[u8] {
        &self.nonterminals
    }

    /// Gets the terminals, sorted ascending
    pub fn terminals(&self) -> &[u8] {
        &self.terminals
    }

    /// Gets the productions, in source order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Translates this grammar into a PDA by the standard three-state
    /// construction, simulating a leftmost derivation on the stack:
    ///
    /// 1. an ε-move replaces the bottom marker with the start symbol on top
    ///    of it,
    /// 2. a production `A → α` pops `A` and pushes `α` *reversed* — push
    ///    strings are bottom-first, so the leftmost symbol of `α` must be
    ///    pushed last to end up on top,
    /// 3. every terminal matches and pops itself,
    /// 4. an ε-move popping the bottom marker enters the accepting state.
    ///
    /// The final move makes acceptance by final state and by empty stack
    /// coincide. The bottom marker is `Z`, or the first byte the grammar
    /// does not use.
    pub fn to_pda(&self) -> Pda {
        let bottom = self.stack_bottom();
        let mut pda = Pda::new(bottom);
        let q0 = pda.add_state(Some("q0"), false);
        let q1 = pda.add_state(Some("q1"), false);
        let q2 = pda.add_state(Some("q2"), true);
        pda.start = Some(q0);

        pda.rule(q0, q1, None, Some(bottom), &[bottom, self.start]);
        for production in &self.productions {
            let push: Vec<u8> = production.body.iter().rev().map(|s| s.byte()).collect();
            pda.rule(q1, q1, None, Some(production.head), &push);
        }
        for &terminal in &self.terminals {
            pda.rule(q1, q1, Some(terminal), Some(terminal), b"");
        }
        pda.rule(q1, q2, None, Some(bottom), b"");
        pda
    }

    fn stack_bottom(&self) -> u8 {
        let used: BTreeSet<u8> = self
            .nonterminals
            .iter()
            .chain(self.terminals.iter())
            .copied()
            .collect();
        if !used.contains(&b'Z') {
            return b'Z';
        }
        (0u8..=255)
            .find(|b| !used.contains(b))
            .expect("a grammar cannot use all 256 byte values")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn cfg(source: &str) -> Cfg {
        parser::grammar(source).unwrap().try_into().unwrap()
    }

    #[test]
    fn validation_errors() {
        let parsed = parser::grammar("s -> a").unwrap();
        assert_eq!(Cfg::try_from(parsed), Err(CfgParseError::HeadNotNonterminal("s")));

        let parsed = parser::grammar("S -> a B").unwrap();
        assert_eq!(Cfg::try_from(parsed), Err(CfgParseError::UndefinedNonterminal('B')));
    }

    #[test]
    fn symbol_classification() {
        let grammar = cfg("S -> a S b | T\nT -> c");
        assert_eq!(grammar.start(), b'S');
        assert_eq!(grammar.nonterminals(), b"ST");
        assert_eq!(grammar.terminals(), b"abc");
        assert_eq!(grammar.productions().len(), 3);
    }

    #[test]
    fn production_push_is_reversed() {
        let pda = cfg("S -> a S b | ε").to_pda();
        // the S-expansion must push "bSa" so that 'a' ends on top
        assert!(pda
            .transitions()
            .iter()
            .any(|t| t.pop == Some(b'S') && t.push == b"bSa".to_vec()));
    }

    #[test]
    fn bottom_marker_avoids_grammar_symbols() {
        let grammar = cfg("Z -> a Z b | ε");
        let pda = grammar.to_pda();
        assert_ne!(pda.initial_stack(), b'Z');
        assert!(pda.accepts_empty(b"aabb"));
    }

    #[test]
    fn brackets_grammar() {
        let pda = cfg("S -> (S)S | ε").to_pda();
        assert!(pda.accepts_empty(b""));
        assert!(pda.accepts_empty(b"(())()"));
        assert!(!pda.accepts_empty(b"(()"));
        assert!(!pda.accepts_empty(b")("));
    }
}
