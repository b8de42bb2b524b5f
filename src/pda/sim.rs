//! Breadth-first simulation of pushdown automata.
//!
//! A PDA run is explored as a graph of configurations `(state, remaining
//! input, stack)`. Exploration is breadth-first with a visited set keyed on
//! exactly that triple, which bounds ε-loops (a depth-first recursion would
//! not terminate on grammars that can pump the stack without consuming
//! input). The number of visited configurations is capped; hitting the cap
//! reports rejection together with the [ResourceLimit] as a diagnostic.
//!
//! Because the exploration is breadth-first, the witness returned for an
//! accepted input is a shortest accepting run.

use crate::limits::{LimitKind, ResourceLimit, MAX_PDA_CONFIGURATIONS};
use crate::pda::{Pda, PdaTransition};
use std::collections::{HashSet, VecDeque};

/// The acceptance criterion for a PDA run. Both require the input to be
/// fully consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Accept in an accepting state
    FinalState,
    /// Accept with an empty stack
    EmptyStack,
}

/// A snapshot of a running PDA: the current state, the input left to read
/// and the stack, bottom first (the last byte is the top)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub state: usize,
    pub remaining: Vec<u8>,
    pub stack: Vec<u8>,
}

/// One step of an accepting run: the configuration before, the transition
/// taken and the configuration after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessStep {
    pub before: Config,
    pub transition: PdaTransition,
    pub after: Config,
}

/// The outcome of a PDA simulation. `limit` is set when the configuration
/// cap was hit, in which case `accepted` is reported as `false` even though
/// an accepting run might exist beyond the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub accepted: bool,
    pub limit: Option<ResourceLimit>,
    pub witness: Option<Vec<WitnessStep>>,
}

/// A discovered configuration with a link to how it was reached
struct Node {
    state: usize,
    pos: usize,
    stack: Vec<u8>,
    parent: Option<(usize, usize)>,
}

impl Pda {
    /// Checks acceptance by final state. A hit configuration cap reports as
    /// rejection; use [Pda::simulate] to tell the two apart.
    pub fn accepts_final(&self, input: &[u8]) -> bool {
        self.simulate(input, Acceptance::FinalState).accepted
    }

    /// Checks acceptance by empty stack. A hit configuration cap reports as
    /// rejection; use [Pda::simulate] to tell the two apart.
    pub fn accepts_empty(&self, input: &[u8]) -> bool {
        self.simulate(input, Acceptance::EmptyStack).accepted
    }

    /// Returns a shortest accepting run for `input` under the given
    /// acceptance mode, or `None` if the input is rejected
    pub fn witness(&self, input: &[u8], mode: Acceptance) -> Option<Vec<WitnessStep>> {
        self.simulate(input, mode).witness
    }

    /// Simulates this PDA on `input` with the default configuration cap
    pub fn simulate(&self, input: &[u8], mode: Acceptance) -> Simulation {
        self.simulate_bounded(input, mode, MAX_PDA_CONFIGURATIONS)
    }

    /// Simulates this PDA on `input`, visiting at most `max_configurations`
    /// configurations before giving up
    pub fn simulate_bounded(
        &self,
        input: &[u8],
        mode: Acceptance,
        max_configurations: usize,
    ) -> Simulation {
        let Some(start) = self.start else {
            return Simulation { accepted: false, limit: None, witness: None };
        };

        let mut nodes = vec![Node {
            state: start,
            pos: 0,
            stack: vec![self.initial_stack],
            parent: None,
        }];
        let mut visited: HashSet<(usize, usize, Vec<u8>)> =
            HashSet::from([(start, 0, vec![self.initial_stack])]);
        let mut queue = VecDeque::from([0usize]);

        while let Some(index) = queue.pop_front() {
            if self.is_accepting_config(&nodes[index], input.len(), mode) {
                let witness = self.unwind(&nodes, index, input);
                return Simulation {
                    accepted: true,
                    limit: None,
                    witness: Some(witness),
                };
            }

            let (state, pos, stack) = {
                let node = &nodes[index];
                (node.state, node.pos, node.stack.clone())
            };
            for (t_index, t) in self.transitions.iter().enumerate() {
                if t.from != state {
                    continue;
                }
                if let Some(byte) = t.input {
                    if input.get(pos) != Some(&byte) {
                        continue;
                    }
                }
                if let Some(top) = t.pop {
                    if stack.last() != Some(&top) {
                        continue;
                    }
                }
                let mut next_stack = stack.clone();
                if t.pop.is_some() {
                    next_stack.pop();
                }
                next_stack.extend_from_slice(&t.push);
                let next_pos = pos + usize::from(t.input.is_some());
                if !visited.insert((t.to, next_pos, next_stack.clone())) {
                    continue;
                }
                if visited.len() > max_configurations {
                    return Simulation {
                        accepted: false,
                        limit: Some(ResourceLimit {
                            kind: LimitKind::PdaConfigurations,
                            limit: max_configurations,
                        }),
                        witness: None,
                    };
                }
                nodes.push(Node {
                    state: t.to,
                    pos: next_pos,
                    stack: next_stack,
                    parent: Some((index, t_index)),
                });
                queue.push_back(nodes.len() - 1);
            }
        }

        Simulation {
            accepted: false,
            limit: None,
            witness: None,
        }
    }

    fn is_accepting_config(&self, node: &Node, input_len: usize, mode: Acceptance) -> bool {
        node.pos == input_len
            && match mode {
                Acceptance::FinalState => self.states[node.state].accepting,
                Acceptance::EmptyStack => node.stack.is_empty(),
            }
    }

    fn unwind(&self, nodes: &[Node], accepting: usize, input: &[u8]) -> Vec<WitnessStep> {
        let mut links = Vec::new();
        let mut index = accepting;
        while let Some((parent, t_index)) = nodes[index].parent {
            links.push((parent, t_index, index));
            index = parent;
        }
        links.reverse();
        links
            .into_iter()
            .map(|(before, t_index, after)| WitnessStep {
                before: self.config_of(&nodes[before], input),
                transition: self.transitions[t_index].clone(),
                after: self.config_of(&nodes[after], input),
            })
            .collect()
    }

    fn config_of(&self, node: &Node, input: &[u8]) -> Config {
        Config {
            state: node.state,
            remaining: input[node.pos..].to_vec(),
            stack: node.stack.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn witness_stack_trajectory() {
        let pda = Pda::balanced_parens();
        let witness = pda.witness(b"(())", Acceptance::FinalState).unwrap();
        let mut stacks: Vec<Vec<u8>> = witness.iter().map(|step| step.before.stack.clone()).collect();
        stacks.push(witness.last().unwrap().after.stack.clone());
        assert_eq!(
            stacks,
            vec![
                b"Z".to_vec(),
                b"Z(".to_vec(),
                b"Z((".to_vec(),
                b"Z(".to_vec(),
                b"Z".to_vec(),
                b"".to_vec(),
            ]
        );
        // the witness consumes the input step by step
        assert_eq!(witness[0].before.remaining, b"(())".to_vec());
        assert_eq!(witness.last().unwrap().after.remaining, b"".to_vec());
    }

    #[test]
    fn witness_is_shortest() {
        let pda = Pda::a_n_b_n();
        let witness = pda.witness(b"ab", Acceptance::EmptyStack).unwrap();
        // push a, switch, pop b, pop Z: four steps, no detours
        assert_eq!(witness.len(), 4);
    }

    #[test]
    fn epsilon_loops_terminate() {
        // A PDA that can pump the stack forever without reading input
        let mut pda = Pda::new(b'Z');
        let q = pda.add_state(None, false);
        pda.rule(q, q, None, None, b"X");
        pda.start = Some(q);
        let run = pda.simulate_bounded(b"", Acceptance::FinalState, 100);
        assert!(!run.accepted);
        assert_eq!(
            run.limit,
            Some(ResourceLimit {
                kind: LimitKind::PdaConfigurations,
                limit: 100,
            })
        );
    }

    #[test]
    fn bounded_epsilon_cycles_are_deduplicated() {
        // ε-cycle that restores the same stack: visited set must cut it off
        let mut pda = Pda::new(b'Z');
        let q = pda.add_state(None, false);
        let r = pda.add_state(None, false);
        pda.rule(q, r, None, None, b"");
        pda.rule(r, q, None, None, b"");
        pda.start = Some(q);
        let run = pda.simulate(b"", Acceptance::FinalState);
        assert!(!run.accepted);
        assert_eq!(run.limit, None);
    }

    #[test]
    fn missing_start_state_rejects() {
        let pda = Pda::new(b'Z');
        assert!(!pda.accepts_final(b""));
        assert!(!pda.accepts_empty(b""));
    }
}
