//! Canonical JSON forms of the automata.
//!
//! Every automaton round-trips through a JSON document listing its states
//! (`{id, label, accepting}`), its transitions (`{from, to, symbol}` for
//! finite automata, `{from, to, input, pop, push}` for PDAs), its start
//! state, and — where the automaton carries them — the explicit alphabet
//! and the initial stack symbol. ε is written as the literal `"ε"`; on
//! input, both `"ε"` and the empty string are accepted. Bytes are encoded
//! as single characters (Latin-1 for the non-ASCII range).
//!
//! Serialization is canonical: states are emitted in id order and
//! transitions are sorted, so equal automata produce bit-identical
//! documents. Deserialization accepts sparse state ids and remaps them
//! densely, validating the result the same way the text-format parsers do.
//!
//! ```
//! use motif::dfa::Dfa;
//! use motif::regex::Regex;
//!
//! let dfa = Regex::compile("ab*").unwrap();
//! let restored = Dfa::from_json(&dfa.to_json()).unwrap();
//! assert_eq!(restored, dfa);
//! ```

use crate::dfa::{Dfa, DfaState, DfaTransition};
use crate::nfa::{Nfa, NfaState, NfaTransition};
use crate::pda::{Pda, PdaState, PdaTransition};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

const EPSILON: &str = "ε";

/// The ways a JSON document can fail to decode into an automaton
#[derive(Debug, Error)]
pub enum JsonError {
    #[error(transparent)]
    Syntax(#[from] serde_json::Error),
    #[error("state id {0} defined twice")]
    DuplicateStateId(usize),
    #[error("state id {0} does not exist")]
    UnknownStateId(usize),
    #[error("'{0}' is not a single-byte symbol")]
    BadSymbol(String),
    #[error("ε is not allowed here")]
    UnexpectedEpsilon,
    #[error("symbol '{0}' is not in the alphabet")]
    SymbolNotInAlphabet(char),
    #[error("conflicting transitions from state {0}")]
    ConflictingTransition(usize),
}

#[derive(Serialize, Deserialize)]
struct JsonState {
    id: usize,
    label: Option<String>,
    accepting: bool,
}

#[derive(Serialize, Deserialize)]
struct JsonMove {
    from: usize,
    to: usize,
    symbol: String,
}

#[derive(Serialize, Deserialize)]
struct JsonNfa {
    states: Vec<JsonState>,
    transitions: Vec<JsonMove>,
    start: Option<usize>,
}

#[derive(Serialize, Deserialize)]
struct JsonDfa {
    alphabet: Vec<String>,
    states: Vec<JsonState>,
    transitions: Vec<JsonMove>,
    start: usize,
}

#[derive(Serialize, Deserialize)]
struct JsonPdaMove {
    from: usize,
    to: usize,
    input: String,
    pop: String,
    push: String,
}

#[derive(Serialize, Deserialize)]
struct JsonPda {
    states: Vec<JsonState>,
    transitions: Vec<JsonPdaMove>,
    start: Option<usize>,
    initial_stack: String,
}

fn encode_byte(byte: u8) -> String {
    char::from(byte).to_string()
}

fn encode_symbol(symbol: Symbol) -> String {
    match symbol {
        Symbol::Epsilon => EPSILON.to_string(),
        Symbol::Byte(byte) => encode_byte(byte),
    }
}

fn encode_optional(byte: Option<u8>) -> String {
    byte.map_or_else(|| EPSILON.to_string(), encode_byte)
}

fn decode_byte(text: &str) -> Result<u8, JsonError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if (c as u32) < 256 => Ok(c as u8),
        _ => Err(JsonError::BadSymbol(text.to_string())),
    }
}

fn decode_symbol(text: &str) -> Result<Symbol, JsonError> {
    if text == EPSILON || text.is_empty() {
        Ok(Symbol::Epsilon)
    } else {
        Ok(Symbol::Byte(decode_byte(text)?))
    }
}

fn decode_optional(text: &str) -> Result<Option<u8>, JsonError> {
    Ok(decode_symbol(text)?.byte())
}

fn decode_push(text: &str) -> Result<Vec<u8>, JsonError> {
    text.chars()
        .map(|c| {
            if (c as u32) < 256 {
                Ok(c as u8)
            } else {
                Err(JsonError::BadSymbol(c.to_string()))
            }
        })
        .collect()
}

fn encode_states<'a>(
    states: impl Iterator<Item = (Option<&'a str>, bool)>,
) -> Vec<JsonState> {
    states
        .enumerate()
        .map(|(id, (label, accepting))| JsonState {
            id,
            label: label.map(str::to_string),
            accepting,
        })
        .collect()
}

/// Sorts states by id, checks uniqueness and returns the dense
/// `(label, accepting)` table together with the id remapping
fn decode_states(
    mut states: Vec<JsonState>,
) -> Result<(Vec<(Option<Rc<str>>, bool)>, HashMap<usize, usize>), JsonError> {
    states.sort_by_key(|s| s.id);
    let mut map = HashMap::with_capacity(states.len());
    let mut table = Vec::with_capacity(states.len());
    for state in states {
        if map.insert(state.id, table.len()).is_some() {
            return Err(JsonError::DuplicateStateId(state.id));
        }
        table.push((state.label.map(Rc::from), state.accepting));
    }
    Ok((table, map))
}

fn resolve(map: &HashMap<usize, usize>, id: usize) -> Result<usize, JsonError> {
    map.get(&id).copied().ok_or(JsonError::UnknownStateId(id))
}

impl Nfa {
    /// Serializes this NFA to its canonical JSON form
    pub fn to_json(&self) -> String {
        let states = encode_states(self.states.iter().map(|s| (s.label(), s.accepting)));
        let mut sorted: Vec<&NfaTransition> = self.transitions.iter().collect();
        sorted.sort_by_key(|t| (t.from, t.symbol, t.to));
        let transitions = sorted
            .into_iter()
            .map(|t| JsonMove {
                from: t.from,
                to: t.to,
                symbol: encode_symbol(t.symbol),
            })
            .collect();
        let document = JsonNfa {
            states,
            transitions,
            start: self.start,
        };
        serde_json::to_string(&document).expect("serializing an automaton cannot fail")
    }

    /// Deserializes an NFA from its JSON form, remapping sparse state ids
    /// densely in ascending order
    pub fn from_json(text: &str) -> Result<Self, JsonError> {
        let document: JsonNfa = serde_json::from_str(text)?;
        let (table, map) = decode_states(document.states)?;
        let mut nfa = Nfa::new();
        for (label, accepting) in table {
            nfa.states.push(NfaState { label, accepting });
        }
        for m in document.transitions {
            let from = resolve(&map, m.from)?;
            let to = resolve(&map, m.to)?;
            nfa.push_transition(from, to, decode_symbol(&m.symbol)?);
        }
        nfa.start = match document.start {
            Some(id) => Some(resolve(&map, id)?),
            None => None,
        };
        Ok(nfa)
    }
}

impl Dfa {
    /// Serializes this DFA to its canonical JSON form, including the
    /// explicit alphabet
    pub fn to_json(&self) -> String {
        let document = JsonDfa {
            alphabet: self.alphabet.iter().map(|&b| encode_byte(b)).collect(),
            states: encode_states(self.states.iter().map(|s| (s.label(), s.accepting))),
            // the flat list is already sorted by (from, symbol)
            transitions: self
                .transitions
                .iter()
                .map(|t| JsonMove {
                    from: t.from,
                    to: t.to,
                    symbol: encode_byte(t.symbol),
                })
                .collect(),
            start: self.start,
        };
        serde_json::to_string(&document).expect("serializing an automaton cannot fail")
    }

    /// Deserializes a DFA from its JSON form. The alphabet must be
    /// ε-free and closed over all transition symbols, and no two
    /// transitions may share `(from, symbol)`.
    pub fn from_json(text: &str) -> Result<Self, JsonError> {
        let document: JsonDfa = serde_json::from_str(text)?;
        let mut alphabet = Vec::with_capacity(document.alphabet.len());
        for entry in &document.alphabet {
            if entry == EPSILON || entry.is_empty() {
                return Err(JsonError::UnexpectedEpsilon);
            }
            alphabet.push(decode_byte(entry)?);
        }
        alphabet.sort_unstable();
        alphabet.dedup();

        let (table, map) = decode_states(document.states)?;
        let states = table
            .into_iter()
            .map(|(label, accepting)| DfaState { label, accepting })
            .collect();

        let mut transitions = Vec::with_capacity(document.transitions.len());
        let mut seen = HashSet::with_capacity(document.transitions.len());
        for m in document.transitions {
            let symbol = match decode_symbol(&m.symbol)? {
                Symbol::Byte(byte) => byte,
                Symbol::Epsilon => return Err(JsonError::UnexpectedEpsilon),
            };
            if alphabet.binary_search(&symbol).is_err() {
                return Err(JsonError::SymbolNotInAlphabet(char::from(symbol)));
            }
            let from = resolve(&map, m.from)?;
            let to = resolve(&map, m.to)?;
            if !seen.insert((from, symbol)) {
                return Err(JsonError::ConflictingTransition(m.from));
            }
            transitions.push(DfaTransition { from, to, symbol });
        }
        let start = resolve(&map, document.start)?;
        Ok(Dfa::from_parts(alphabet, states, transitions, start))
    }
}

impl Pda {
    /// Serializes this PDA to its canonical JSON form, including the
    /// initial stack symbol
    pub fn to_json(&self) -> String {
        let mut sorted: Vec<&PdaTransition> = self.transitions.iter().collect();
        sorted.sort_by(|a, b| {
            (a.from, a.input, a.pop, &a.push, a.to).cmp(&(b.from, b.input, b.pop, &b.push, b.to))
        });
        let document = JsonPda {
            states: encode_states(self.states.iter().map(|s| (s.label(), s.accepting))),
            transitions: sorted
                .into_iter()
                .map(|t| JsonPdaMove {
                    from: t.from,
                    to: t.to,
                    input: encode_optional(t.input),
                    pop: encode_optional(t.pop),
                    push: t.push.iter().map(|&b| char::from(b)).collect(),
                })
                .collect(),
            start: self.start,
            initial_stack: encode_byte(self.initial_stack),
        };
        serde_json::to_string(&document).expect("serializing an automaton cannot fail")
    }

    /// Deserializes a PDA from its JSON form. `input` and `pop` accept
    /// `"ε"` or `""` for ε; `push` is a bottom-first string of stack
    /// symbols.
    pub fn from_json(text: &str) -> Result<Self, JsonError> {
        let document: JsonPda = serde_json::from_str(text)?;
        let (table, map) = decode_states(document.states)?;
        let mut pda = Pda::new(decode_byte(&document.initial_stack)?);
        for (label, accepting) in table {
            pda.states.push(PdaState { label, accepting });
        }
        for m in document.transitions {
            let from = resolve(&map, m.from)?;
            let to = resolve(&map, m.to)?;
            let input = decode_optional(&m.input)?;
            let pop = decode_optional(&m.pop)?;
            let push = decode_push(&m.push)?;
            pda.rule(from, to, input, pop, &push);
        }
        pda.start = match document.start {
            Some(id) => Some(resolve(&map, id)?),
            None => None,
        };
        Ok(pda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::Regex;

    #[test]
    fn nfa_json_is_canonical() {
        let nfa = Regex::parse("a(b|c)*").unwrap().to_nfa().unwrap();
        let json = nfa.to_json();
        let restored = Nfa::from_json(&json).unwrap();
        // a decode/encode round trip is the identity on canonical documents
        assert_eq!(restored.to_json(), json);
        for input in [&b"a"[..], b"abc", b"b", b""] {
            assert_eq!(restored.accepts(input), nfa.accepts(input));
        }
    }

    #[test]
    fn dfa_round_trips_exactly() {
        let dfa = Regex::compile("AT?G").unwrap();
        assert_eq!(Dfa::from_json(&dfa.to_json()).unwrap(), dfa);
    }

    #[test]
    fn pda_round_trips_behavior() {
        let pda = Pda::balanced_parens();
        let restored = Pda::from_json(&pda.to_json()).unwrap();
        assert_eq!(restored.initial_stack(), b'Z');
        assert!(restored.accepts_final(b"(())"));
        assert!(!restored.accepts_final(b"(()"));
        assert_eq!(restored.to_json(), pda.to_json());
    }

    #[test]
    fn epsilon_reads_as_empty_string_too() {
        let text = r#"{
            "states": [
                {"id": 0, "label": null, "accepting": false},
                {"id": 1, "label": null, "accepting": true}
            ],
            "transitions": [{"from": 0, "to": 1, "symbol": ""}],
            "start": 0
        }"#;
        let nfa = Nfa::from_json(text).unwrap();
        assert!(nfa.accepts(b""));
        // and it serializes back as the literal ε
        assert!(nfa.to_json().contains("ε"));
    }

    #[test]
    fn sparse_state_ids_are_remapped() {
        let text = r#"{
            "states": [
                {"id": 10, "label": "ten", "accepting": false},
                {"id": 7, "label": "seven", "accepting": true}
            ],
            "transitions": [{"from": 10, "to": 7, "symbol": "x"}],
            "start": 10
        }"#;
        let nfa = Nfa::from_json(text).unwrap();
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.states()[0].label(), Some("seven"));
        assert!(nfa.accepts(b"x"));
    }

    #[test]
    fn decode_errors() {
        let unknown = r#"{
            "states": [{"id": 0, "label": null, "accepting": false}],
            "transitions": [{"from": 0, "to": 3, "symbol": "a"}],
            "start": 0
        }"#;
        assert!(matches!(
            Nfa::from_json(unknown),
            Err(JsonError::UnknownStateId(3))
        ));

        let duplicate = r#"{
            "states": [
                {"id": 0, "label": null, "accepting": false},
                {"id": 0, "label": null, "accepting": true}
            ],
            "transitions": [],
            "start": 0
        }"#;
        assert!(matches!(
            Nfa::from_json(duplicate),
            Err(JsonError::DuplicateStateId(0))
        ));

        let conflicting = r#"{
            "alphabet": ["a"],
            "states": [{"id": 0, "label": null, "accepting": true}],
            "transitions": [
                {"from": 0, "to": 0, "symbol": "a"},
                {"from": 0, "to": 0, "symbol": "a"}
            ],
            "start": 0
        }"#;
        assert!(matches!(
            Dfa::from_json(conflicting),
            Err(JsonError::ConflictingTransition(0))
        ));

        let unclosed = r#"{
            "alphabet": ["a"],
            "states": [{"id": 0, "label": null, "accepting": true}],
            "transitions": [{"from": 0, "to": 0, "symbol": "b"}],
            "start": 0
        }"#;
        assert!(matches!(
            Dfa::from_json(unclosed),
            Err(JsonError::SymbolNotInAlphabet('b'))
        ));

        assert!(matches!(
            Nfa::from_json("not json"),
            Err(JsonError::Syntax(_))
        ));
    }
}
