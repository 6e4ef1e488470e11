// SPDX-License-Identifier: Apache-2.0

//! Structural hashing for `And2` nodes.
//!
//! Two `And2` nodes are structurally identical when they have the same pair
//! of fan-in operands, in either order. The table keys on the canonically
//! ordered pair so lookups are order-insensitive.

use std::collections::HashMap;

use crate::aig::gate::{AigNode, AigOperand, AigRef};

pub type StrashKey = (AigOperand, AigOperand);

pub fn strash_key(a: AigOperand, b: AigOperand) -> StrashKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Default, Clone)]
pub struct AigHasher {
    table: HashMap<StrashKey, AigRef>,
}

impl AigHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, a: AigOperand, b: AigOperand) -> Option<AigRef> {
        self.table.get(&strash_key(a, b)).copied()
    }

    /// Records `aig_ref` as the canonical node for `(a, b)` unless one already
    /// exists; returns the pre-existing node in that case.
    pub fn insert(&mut self, a: AigOperand, b: AigOperand, aig_ref: AigRef) -> Option<AigRef> {
        match self.table.entry(strash_key(a, b)) {
            std::collections::hash_map::Entry::Occupied(e) => Some(*e.get()),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(aig_ref);
                None
            }
        }
    }

    /// Removes the entry for `(a, b)` only if it currently maps to `aig_ref`.
    pub fn remove_if(&mut self, a: AigOperand, b: AigOperand, aig_ref: AigRef) {
        let key = strash_key(a, b);
        if self.table.get(&key) == Some(&aig_ref) {
            self.table.remove(&key);
        }
    }

    /// Feeds a freshly-pushed node; returns the existing equivalent node if
    /// the same `And2` was seen before.
    pub fn feed_ref(&mut self, aig_ref: &AigRef, nodes: &[AigNode]) -> Option<AigRef> {
        match &nodes[aig_ref.id] {
            AigNode::And2 { a, b } => self.insert(*a, *b, *aig_ref),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
