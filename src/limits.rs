//! Resource bounds enforced by the engine.
//!
//! Subset construction is exponential in the worst case, PDA simulation can
//! chase ε-loops forever, and counted repetitions multiply the size of a
//! regular expression. Each of these is capped, and exceeding a cap yields a
//! [ResourceLimit] so that callers can tell "rejected" apart from "gave up".

use std::fmt;
use thiserror::Error;

/// Default cap on the number of DFA states produced by subset construction
pub const MAX_SUBSET_STATES: usize = 8192;

/// Default cap on the number of configurations visited while simulating a PDA
pub const MAX_PDA_CONFIGURATIONS: usize = 65536;

/// Cap on `m` and `n` in counted repetitions `a{m,n}`
pub const MAX_COUNTED_REPEAT: u32 = 1024;

/// A resource bound was exceeded before the operation could finish. This is
/// distinct from logical rejection: the caller may choose to treat it as a
/// rejection with a warning or as a hard failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} limit of {limit} exceeded")]
pub struct ResourceLimit {
    pub kind: LimitKind,
    pub limit: usize,
}

/// The kind of resource bound that was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    SubsetStates,
    PdaConfigurations,
    CountedRepeat,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::SubsetStates => write!(f, "DFA state"),
            LimitKind::PdaConfigurations => write!(f, "PDA configuration"),
            LimitKind::CountedRepeat => write!(f, "counted repetition"),
        }
    }
}
