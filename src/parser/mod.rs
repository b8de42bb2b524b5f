//! # motif parser
//! This module contains the parsers for the two text formats of the crate:
//! regular expression patterns and context-free grammars.
//!
//! ## Format for regular expressions
//! Patterns follow the usual precedence `union < concatenation < repetition`:
//!
//! - literal bytes match themselves; `\` escapes the metacharacters
//!   `( ) [ ] { } | * + ? . ^ $ \` (and `\n`, `\t`, `\r`, `\0` denote control
//!   characters)
//! - `.` matches any printable ASCII byte
//! - `[abc]` and `[a-z0-9]` are character classes built from single bytes
//!   and inclusive ranges
//! - `(...)` groups, `|` alternates
//! - `*`, `+`, `?` repeat zero-or-more, one-or-more, zero-or-one times
//! - `{m}`, `{m,}` and `{m,n}` are counted repetitions
//! - `^` and `$` are accepted as atoms; acceptance is whole-string, so both
//!   match the empty string
//!
//! Parsing is a single left-to-right pass with no backtracking. Errors carry
//! the byte index they were detected at, see
//! [ParseError](crate::parser::ParseError). Backreferences, lookaround,
//! Unicode classes and class negation are rejected as
//! [unsupported](crate::parser::ParseErrorKind::Unsupported) rather than
//! misparsed.
//!
//! ## Format for grammars
//! A grammar is a UTF-8 text with one rule per line:
//!
//! ```text
//! # a^n b^n
//! S -> a S b | ε
//! ```
//!
//! The head of a rule is a single uppercase ASCII letter (a nonterminal),
//! followed by `->` (or `→`) and one or more alternatives separated by `|`.
//! An alternative is a sequence of symbols: uppercase letters are
//! nonterminals, all other printable ASCII characters are terminals.
//! Whitespace between symbols is optional (`a S b` and `aSb` are the same
//! alternative), but the head must be separated from the arrow by
//! whitespace. `ε` (or `eps`) denotes the empty alternative. `#` starts a
//! comment, and blank lines are ignored. The start symbol is the head of the
//! first rule.
//!
//! Parsing is done in two steps: [grammar] parses the text into a
//! [ParsedCfg], and converting it into a [Cfg](crate::cfg::Cfg) with
//! [TryInto] checks that heads are nonterminals, that every nonterminal used
//! in a body has a production, and that all symbols are printable ASCII.

mod cfg;
mod regex;

use crate::regex::Regex;
use nom::{combinator::all_consuming, error::Error, Finish};
pub use regex::{ParseError, ParseErrorKind};

/// A grammar as written in the text format, before any validation. Convert
/// into a [Cfg](crate::cfg::Cfg) with [TryInto] to check the invariants.
#[derive(Debug)]
pub struct ParsedCfg<'a> {
    pub rules: Vec<ParsedRule<'a>>,
}

/// A single rule line of a grammar: a head and its `|`-separated
/// alternatives, each a list of symbol tokens (an empty list is an
/// ε-alternative)
#[derive(Debug)]
pub struct ParsedRule<'a> {
    pub head: &'a str,
    pub alternatives: Vec<Vec<&'a str>>,
}

/// Parses a regular expression according to the format above. All regexes
/// that are successfully parsed by this function are guaranteed to be
/// lowerable to an NFA (counted repetitions may still exceed the repetition
/// cap at lowering time).
pub fn regex(input: &str) -> Result<Regex, ParseError> {
    regex::parse(input)
}

/// Parses a context-free grammar according to the format above. The whole
/// string must be parsable, otherwise this function errors. Note that the
/// result is a [ParsedCfg], which is not guaranteed to be a valid
/// [Cfg](crate::cfg::Cfg). Use [TryInto::try_into] to convert it.
pub fn grammar(input: &str) -> Result<ParsedCfg, Error<&str>> {
    all_consuming(cfg::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
