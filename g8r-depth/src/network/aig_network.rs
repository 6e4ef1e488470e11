// SPDX-License-Identifier: Apache-2.0

//! Concrete mutable AIG with structural hashing and in-place substitution.

use std::collections::HashMap;

use bitvec::vec::BitVec;

use crate::aig::aig_hasher::{strash_key, AigHasher};
use crate::aig::dce::dce;
use crate::aig::gate::{AigNode, AigOperand, AigRef, GateFn, Input, Output};
use crate::network::Network;

const FALSE_OPERAND: AigOperand = AigOperand {
    node: AigRef { id: 0 },
    negated: false,
};

/// Returns the folded result of `a & b` when it does not need a gate.
fn fold_and(a: AigOperand, b: AigOperand) -> Option<AigOperand> {
    let is_false = |op: AigOperand| op == FALSE_OPERAND;
    let is_true = |op: AigOperand| op == FALSE_OPERAND.negate();
    if is_false(a) || is_false(b) {
        Some(FALSE_OPERAND)
    } else if is_true(a) {
        Some(b)
    } else if is_true(b) {
        Some(a)
    } else if a == b {
        Some(a)
    } else if a == b.negate() {
        Some(FALSE_OPERAND)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct AigNetwork {
    name: String,
    nodes: Vec<AigNode>,
    dead: BitVec,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    hasher: AigHasher,
}

impl AigNetwork {
    pub fn from_gate_fn(gate_fn: &GateFn) -> Self {
        let mut hasher = AigHasher::new();
        for (id, node) in gate_fn.gates.iter().enumerate() {
            if let AigNode::And2 { a, b } = node {
                hasher.insert(*a, *b, AigRef { id });
            }
        }
        let mut network = AigNetwork {
            name: gate_fn.name.clone(),
            nodes: gate_fn.gates.clone(),
            dead: BitVec::repeat(false, gate_fn.gates.len()),
            inputs: gate_fn.inputs.clone(),
            outputs: gate_fn.outputs.clone(),
            hasher,
        };
        network.sweep_unreachable();
        network
    }

    /// Snapshot of the live network; dead slots are dropped and the gates are
    /// renumbered in topological order.
    pub fn to_gate_fn(&self) -> GateFn {
        let gates: Vec<AigNode> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, node)| {
                if self.dead[id] {
                    AigNode::Literal(false)
                } else {
                    node.clone()
                }
            })
            .collect();
        dce(&GateFn {
            name: self.name.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            gates,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, node: AigRef) -> &AigNode {
        &self.nodes[node.id]
    }

    pub fn live_gate_count(&self) -> usize {
        self.gate_refs().len()
    }

    fn resolve(&self, mut op: AigOperand, replaced: &HashMap<AigRef, AigOperand>) -> AigOperand {
        while let Some(target) = replaced.get(&op.node) {
            op = target.with_negation(op.negated);
        }
        op
    }

    fn kill(&mut self, node: AigRef) {
        if let AigNode::And2 { a, b } = self.nodes[node.id] {
            self.hasher.remove_if(a, b, node);
            self.dead.set(node.id, true);
        }
    }

    /// Marks every `And2` not reachable from a primary output as dead.
    fn sweep_unreachable(&mut self) {
        let mut reachable: BitVec = BitVec::repeat(false, self.nodes.len());
        let mut stack: Vec<AigRef> = self
            .outputs
            .iter()
            .flat_map(|o| o.bit_vector.iter_lsb_to_msb().map(|op| op.node))
            .collect();
        while let Some(node) = stack.pop() {
            if reachable[node.id] {
                continue;
            }
            reachable.set(node.id, true);
            stack.extend(self.nodes[node.id].get_args());
        }
        let mut swept = 0usize;
        for id in 0..self.nodes.len() {
            if !reachable[id] && !self.dead[id] && matches!(self.nodes[id], AigNode::And2 { .. })
            {
                self.kill(AigRef { id });
                swept += 1;
            }
        }
        if swept > 0 {
            log::trace!("sweep_unreachable: {} gates swept", swept);
        }
    }

    /// Rewrites the fan-ins of `parent` that reference `old` to `new`. Returns
    /// the signal `parent` should itself be replaced by when it became trivial
    /// or a structural duplicate.
    fn redirect_parent(
        &mut self,
        parent: AigRef,
        old: AigRef,
        new: AigOperand,
    ) -> Option<AigOperand> {
        let AigNode::And2 { a, b } = self.nodes[parent.id] else {
            return None;
        };
        self.hasher.remove_if(a, b, parent);
        let redirect = |op: AigOperand| {
            if op.node == old {
                new.with_negation(op.negated)
            } else {
                op
            }
        };
        let (new_a, new_b) = (redirect(a), redirect(b));
        self.nodes[parent.id] = AigNode::And2 { a: new_a, b: new_b };
        if let Some(folded) = fold_and(new_a, new_b) {
            return Some(folded);
        }
        match self.hasher.insert(new_a, new_b, parent) {
            Some(existing) if existing != parent => Some(existing.into()),
            _ => None,
        }
    }
}

impl Network for AigNetwork {
    fn gate_refs(&self) -> Vec<AigRef> {
        (0..self.nodes.len())
            .filter(|&id| !self.dead[id] && matches!(self.nodes[id], AigNode::And2 { .. }))
            .map(|id| AigRef { id })
            .collect()
    }

    fn fanins(&self, node: AigRef) -> Option<[AigOperand; 2]> {
        if self.dead[node.id] {
            return None;
        }
        self.nodes[node.id].fanins()
    }

    fn output_operands(&self) -> Vec<AigOperand> {
        self.outputs
            .iter()
            .flat_map(|output| output.bit_vector.iter_lsb_to_msb().copied())
            .collect()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn is_dead(&self, node: AigRef) -> bool {
        self.dead[node.id]
    }

    fn create_and(&mut self, a: AigOperand, b: AigOperand) -> AigOperand {
        if let Some(folded) = fold_and(a, b) {
            return folded;
        }
        if let Some(existing) = self.hasher.lookup(a, b) {
            return existing.into();
        }
        let (a, b) = strash_key(a, b);
        let aig_ref = AigRef {
            id: self.nodes.len(),
        };
        self.nodes.push(AigNode::And2 { a, b });
        self.dead.push(false);
        self.hasher.insert(a, b, aig_ref);
        aig_ref.into()
    }

    fn substitute_node(&mut self, old: AigRef, new: AigOperand) {
        if new.node == old {
            return;
        }
        let mut replaced: HashMap<AigRef, AigOperand> = HashMap::new();
        let mut worklist: Vec<(AigRef, AigOperand)> = vec![(old, new)];
        while let Some((old, new)) = worklist.pop() {
            let new = self.resolve(new, &replaced);
            if self.dead[old.id] || new.node == old {
                continue;
            }
            replaced.insert(old, new);

            for id in 0..self.nodes.len() {
                if self.dead[id] || id == old.id {
                    continue;
                }
                let references_old = self.nodes[id].get_args().contains(&old);
                if !references_old {
                    continue;
                }
                if let Some(merged) = self.redirect_parent(AigRef { id }, old, new) {
                    worklist.push((AigRef { id }, merged));
                }
            }
            for output in self.outputs.iter_mut() {
                for bit in output.bit_vector.iter_lsb_to_msb_mut() {
                    if bit.node == old {
                        *bit = new.with_negation(bit.negated);
                    }
                }
            }
            self.kill(old);
        }
        self.sweep_unreachable();
    }
}
