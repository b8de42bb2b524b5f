//! # Approximate matching with Levenshtein automata
//!
//! A [Matcher] finds occurrences of a pattern within at most `K` edits
//! (substitutions, deletions from the pattern, insertions into the pattern —
//! individually selectable through [EditKinds]). Conceptually the matcher is
//! a grid-shaped NFA over states `(i, k)`, "matched `i` pattern bytes using
//! `k` edits": plain matches advance `i`, substitutions and insertions
//! consume input while spending an edit, and deletions advance `i` by ε.
//! Every state `(m, k)` is accepting.
//!
//! [Matcher::to_nfa] materializes that grid over an explicit alphabet, ready
//! for [determinization](crate::nfa::Nfa::to_dfa). [Matcher::find] executes
//! the same grid directly, keeping one minimum-edit counter per pattern
//! position (positions worse than an already-known edit count are dominated
//! and dropped), seeded freshly at every start offset of the text.
//!
//! ## Example
//! ```
//! use motif::approx::{EditKinds, Matcher};
//!
//! let matcher = Matcher::new(b"ATG", 1, EditKinds::all());
//! let matches = matcher.find(b"ATCCGATAGG");
//! // "ATC" is one substitution away from ATG...
//! assert!(matches.iter().any(|m| (m.start, m.end, m.distance) == (0, 3, 1)));
//! // ...and "ATAG" is ATG with one inserted A
//! assert!(matches.iter().any(|m| (m.start, m.end, m.distance) == (5, 9, 1)));
//! assert!(matches.iter().all(|m| m.distance <= 1));
//! ```
//!
//! For DNA, [Matcher::find_both_strands] scans the sequence and its reverse
//! complement and maps hits on the reverse strand back into forward
//! coordinates.

use crate::nfa::Nfa;
use crate::symbol::Symbol;
use bitflags::bitflags;

bitflags! {
    /// The edit operations available to the approximate matcher. Plain
    /// character matches are always enabled; `K = 0` therefore means exact
    /// matching no matter which kinds are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EditKinds: u8 {
        /// Replace one pattern byte with one input byte
        const SUBSTITUTION = 1 << 0;
        /// Skip one pattern byte without consuming input
        const DELETION = 1 << 1;
        /// Consume one input byte without advancing the pattern
        const INSERTION = 1 << 2;
    }
}

impl Default for EditKinds {
    fn default() -> Self {
        EditKinds::all()
    }
}

/// The DNA alphabet used for both-strand scanning
pub const DNA_ALPHABET: [u8; 4] = *b"ACGT";

/// The strand of a DNA duplex a match was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

/// A single approximate occurrence: `text[start..end]` is within `distance`
/// edits of the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproxMatch {
    pub start: usize,
    pub end: usize,
    pub distance: u8,
}

/// An [ApproxMatch] tagged with the strand it was found on. Coordinates are
/// always in forward-strand orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrandMatch {
    pub start: usize,
    pub end: usize,
    pub distance: u8,
    pub strand: Strand,
}

/// Edit counter for a pattern position that is not reachable
const UNREACHED: u8 = u8::MAX;

/// An approximate pattern matcher allowing up to a fixed number of edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    pattern: Vec<u8>,
    max_edits: u8,
    kinds: EditKinds,
}

impl Matcher {
    /// Creates a matcher for `pattern` allowing up to `max_edits` edits of
    /// the given kinds
    pub fn new(pattern: &[u8], max_edits: u8, kinds: EditKinds) -> Self {
        Matcher {
            pattern: pattern.to_vec(),
            max_edits,
            kinds,
        }
    }

    /// Gets the pattern being matched
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Gets the maximum number of edits
    pub fn max_edits(&self) -> u8 {
        self.max_edits
    }

    /// Gets the enabled edit kinds
    pub fn kinds(&self) -> EditKinds {
        self.kinds
    }

    /// Materializes the Levenshtein NFA of this matcher over `alphabet`
    /// (extended with the pattern's own bytes). State `(i, k)` gets id
    /// `i·(K+1) + k` and the label `"i,k"`; the start state is `(0, 0)` and
    /// every state `(m, k)` is accepting. The result accepts exactly the
    /// strings within `max_edits` of the whole pattern and can be fed to
    /// [Nfa::to_dfa].
    pub fn to_nfa(&self, alphabet: &[u8]) -> Nfa {
        let m = self.pattern.len();
        let k = usize::from(self.max_edits);
        let rows = k + 1;
        let mut alphabet: Vec<u8> = alphabet.iter().chain(self.pattern.iter()).copied().collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        let mut nfa = Nfa::new();
        for i in 0..=m {
            for e in 0..=k {
                let id = nfa.add_state(Some(&format!("{i},{e}")), i == m);
                debug_assert_eq!(id, i * rows + e);
            }
        }
        nfa.set_start(0).expect("the grid always has a state (0,0)");

        let pack = |i: usize, e: usize| i * rows + e;
        for i in 0..=m {
            for e in 0..=k {
                let from = pack(i, e);
                if i < m {
                    nfa.push_transition(from, pack(i + 1, e), Symbol::Byte(self.pattern[i]));
                    if e < k {
                        if self.kinds.contains(EditKinds::SUBSTITUTION) {
                            for &b in alphabet.iter().filter(|&&b| b != self.pattern[i]) {
                                nfa.push_transition(from, pack(i + 1, e + 1), Symbol::Byte(b));
                            }
                        }
                        if self.kinds.contains(EditKinds::DELETION) {
                            nfa.push_transition(from, pack(i + 1, e + 1), Symbol::Epsilon);
                        }
                    }
                }
                if e < k && self.kinds.contains(EditKinds::INSERTION) {
                    for &b in &alphabet {
                        nfa.push_transition(from, pack(i, e + 1), Symbol::Byte(b));
                    }
                }
            }
        }
        nfa
    }

    /// Scans `text` for approximate occurrences of the pattern. For every
    /// start offset whose scan reaches an accepting state, one match is
    /// reported: the minimum edit distance seen for that offset, with the
    /// longest end achieving it (leftmost-longest). Matches from different
    /// start offsets may overlap.
    pub fn find(&self, text: &[u8]) -> Vec<ApproxMatch> {
        (0..=text.len()).filter_map(|start| self.scan_at(text, start)).collect()
    }

    /// Scans both strands of `dna`: the sequence itself and its reverse
    /// complement. Matches on the reverse strand are reported in forward
    /// coordinates (`start` and `end` index into `dna`), and the combined
    /// list is sorted by position.
    pub fn find_both_strands(&self, dna: &[u8]) -> Vec<StrandMatch> {
        let n = dna.len();
        let mut matches: Vec<StrandMatch> = self
            .find(dna)
            .into_iter()
            .map(|m| StrandMatch {
                start: m.start,
                end: m.end,
                distance: m.distance,
                strand: Strand::Forward,
            })
            .collect();
        let reverse = reverse_complement(dna);
        matches.extend(self.find(&reverse).into_iter().map(|m| StrandMatch {
            start: n - m.end,
            end: n - m.start,
            distance: m.distance,
            strand: Strand::Reverse,
        }));
        matches.sort_by_key(|m| (m.start, m.end, m.strand));
        matches
    }

    fn scan_at(&self, text: &[u8], start: usize) -> Option<ApproxMatch> {
        let mut row = self.seed_row();
        let mut best: Option<(usize, u8)> = None;
        if let Some(distance) = self.accept_distance(&row) {
            best = Some((start, distance));
        }
        for (offset, &byte) in text[start..].iter().enumerate() {
            row = self.step_row(&row, byte);
            if row.iter().all(|&e| e == UNREACHED) {
                break;
            }
            if let Some(distance) = self.accept_distance(&row) {
                // ties on distance go to the longer end
                if best.map_or(true, |(_, d)| distance <= d) {
                    best = Some((start + offset + 1, distance));
                }
            }
        }
        best.map(|(end, distance)| ApproxMatch { start, end, distance })
    }

    /// The ε-closure of `(0, 0)`: position `i` is reachable with `i`
    /// deletions
    fn seed_row(&self) -> Vec<u8> {
        let mut row = vec![UNREACHED; self.pattern.len() + 1];
        row[0] = 0;
        self.close_row(&mut row);
        row
    }

    /// Propagates deletion edges `(i, k) →ε→ (i+1, k+1)` left to right
    fn close_row(&self, row: &mut [u8]) {
        if !self.kinds.contains(EditKinds::DELETION) {
            return;
        }
        for i in 0..self.pattern.len() {
            if row[i] != UNREACHED && row[i] < self.max_edits && row[i] + 1 < row[i + 1] {
                row[i + 1] = row[i] + 1;
            }
        }
    }

    /// One input byte: matches and substitutions advance the position,
    /// insertions stay, then deletions close the row again
    fn step_row(&self, row: &[u8], byte: u8) -> Vec<u8> {
        let m = self.pattern.len();
        let mut next = vec![UNREACHED; m + 1];
        for i in 0..=m {
            let edits = row[i];
            if edits == UNREACHED {
                continue;
            }
            if i < m {
                if byte == self.pattern[i] {
                    next[i + 1] = next[i + 1].min(edits);
                } else if self.kinds.contains(EditKinds::SUBSTITUTION) && edits < self.max_edits {
                    next[i + 1] = next[i + 1].min(edits + 1);
                }
            }
            if self.kinds.contains(EditKinds::INSERTION) && edits < self.max_edits {
                next[i] = next[i].min(edits + 1);
            }
        }
        self.close_row(&mut next);
        next
    }

    fn accept_distance(&self, row: &[u8]) -> Option<u8> {
        let distance = row[self.pattern.len()];
        (distance != UNREACHED).then_some(distance)
    }
}

/// The reverse complement of a DNA sequence: reverses the bytes and swaps
/// A↔T and C↔G. Bytes outside the DNA alphabet pass through unchanged.
pub fn reverse_complement(dna: &[u8]) -> Vec<u8> {
    dna.iter().rev().map(|&b| complement(b)).collect()
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}
