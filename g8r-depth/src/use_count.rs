// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use crate::aig::gate::{AigNode, AigRef, GateFn};

/// Computes a use count for the nodes reachable from the outputs of the gate
/// function. Each output bit counts as one use.
///
/// Nodes absent from the map are dead.
pub fn get_id_to_use_count(gate_fn: &GateFn) -> HashMap<AigRef, usize> {
    let mut id_to_use_count: HashMap<AigRef, usize> = HashMap::new();
    let mut bump_use_count = |node: AigRef| {
        *id_to_use_count.entry(node).or_insert(0) += 1;
    };
    let mut processed_nodes = HashSet::new();

    // Nodes observed as used whose arguments have not been traversed yet.
    let mut worklist = Vec::new();

    for operand in gate_fn.output_operands() {
        bump_use_count(operand.node);
        worklist.push(operand.node);
    }

    while let Some(node) = worklist.pop() {
        if !processed_nodes.insert(node) {
            continue;
        }
        let gate: &AigNode = &gate_fn.gates[node.id];
        for arg in gate.get_args() {
            bump_use_count(arg);
            worklist.push(arg);
        }
    }

    id_to_use_count
}
