// One-dimensional binary cellular automaton over a 256-cell ring.
//
// SAFETY INVARIANTS:
// 1. The lookup table always agrees with `rule` (rebuilt by `set_rule` only)
// 2. A generation reads only `state` and writes only `next`; the buffers are
//    swapped after the full scan, so no cell sees a neighbour's new value
// 3. For fixed (rule, initial state, generations) the digest is reproducible

use crate::bitfield::{BitField, STATE_BITS, STATE_BYTES};

/// Elementary automaton with a precomputed 3-neighbour transition table.
#[derive(Debug, Clone)]
pub struct CellularAutomaton {
    state: BitField,
    next: BitField,
    rule: u8,
    lookup: [bool; 8],
}

impl CellularAutomaton {
    /// Zeroed automaton running `rule`.
    pub fn new(rule: u8) -> Self {
        CellularAutomaton {
            state: BitField::new(),
            next: BitField::new(),
            rule,
            lookup: Self::build_lookup(rule),
        }
    }

    /// Entry `p` is bit `p` of `rule`, where `p = (left << 2) | (center << 1) | right`.
    fn build_lookup(rule: u8) -> [bool; 8] {
        let mut lookup = [false; 8];
        for (pattern, entry) in lookup.iter_mut().enumerate() {
            *entry = (rule >> pattern) & 1 == 1;
        }
        lookup
    }

    pub fn set_rule(&mut self, rule: u8) {
        self.rule = rule;
        self.lookup = Self::build_lookup(rule);
    }

    pub fn rule(&self) -> u8 {
        self.rule
    }

    /// Loads up to `STATE_BYTES` bytes as the current generation. Shorter
    /// input is zero-padded, longer input truncated; no folding happens here.
    pub fn seed(&mut self, bytes: &[u8]) {
        self.state = BitField::from_bytes(bytes);
    }

    /// Replaces the current generation wholesale.
    pub fn seed_field(&mut self, field: BitField) {
        self.state = field;
    }

    /// Advances one generation under periodic boundaries.
    pub fn step(&mut self) {
        let state = &self.state;
        for i in 0..STATE_BITS as isize {
            let pattern = (usize::from(state.get(i - 1)) << 2)
                | (usize::from(state.get(i)) << 1)
                | usize::from(state.get(i + 1));
            self.next.set(i, self.lookup[pattern]);
        }
        // Every cell of `next` was written above, so it is a complete generation.
        std::mem::swap(&mut self.state, &mut self.next);
    }

    pub fn evolve(&mut self, generations: usize) {
        for _ in 0..generations {
            self.step();
        }
    }

    pub fn state(&self) -> &BitField {
        &self.state
    }

    /// Raw fixed-width state, used as the hash payload.
    pub fn digest(&self) -> [u8; STATE_BYTES] {
        self.state.into_bytes()
    }
}
