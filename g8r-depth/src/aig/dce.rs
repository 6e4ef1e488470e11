// SPDX-License-Identifier: Apache-2.0

use crate::aig::gate::{AigBitVector, AigNode, AigOperand, AigRef, GateFn, Input, Output};
use crate::aig::topo::topo_sort_refs;
use std::collections::{HashMap, HashSet};

fn remap_bit_vector(bit_vector: &AigBitVector, old_to_new: &HashMap<usize, usize>) -> AigBitVector {
    let bits: Vec<AigOperand> = bit_vector
        .iter_lsb_to_msb()
        .map(|bit| AigOperand {
            node: AigRef {
                id: old_to_new[&bit.node.id],
            },
            negated: bit.negated,
        })
        .collect();
    AigBitVector::from_lsb_is_index_0(&bits)
}

/// Dead-code elimination that is robust to *any* node ordering.
///
/// Accepts a `GateFn` whose `gates` vector may be in arbitrary order (even with
/// parents before children, as happens after in-place substitution) and
/// produces a new `GateFn` where:
///   • Every gate is reachable from at least one output.
///   • The `gates` list is in topological order (children precede parents).
///   • Node 0 is still the constant-false literal and every input bit is kept.
pub fn dce(orig_fn: &GateFn) -> GateFn {
    // 1. Mark reachable nodes starting from outputs (and always include the bits of
    //    inputs so they stay alive).
    let mut reachable = HashSet::new();
    let mut stack: Vec<AigOperand> = orig_fn.output_operands();
    for input in &orig_fn.inputs {
        for bit in input.bit_vector.iter_lsb_to_msb() {
            reachable.insert(bit.node);
        }
    }
    while let Some(current) = stack.pop() {
        if !reachable.insert(current.node) {
            continue;
        }
        stack.extend(orig_fn.gates[current.node.id].get_operands());
    }

    // 2. Build mapping old_id -> new_id using a topological ordering to ensure
    //    children appear before parents.
    let topo_order = topo_sort_refs(&orig_fn.gates);
    let mut old_to_new: HashMap<usize, usize> = HashMap::new();
    let mut new_gates: Vec<AigNode> = Vec::with_capacity(reachable.len() + 1);

    old_to_new.insert(0, 0);
    new_gates.push(orig_fn.gates[0].clone());

    for aref in topo_order {
        if !reachable.contains(&aref) || aref.id == 0 {
            continue;
        }
        let old_id = aref.id;
        old_to_new.insert(old_id, new_gates.len());

        let mut new_node = orig_fn.gates[old_id].clone();
        if let AigNode::And2 { a, b } = &mut new_node {
            a.node.id = old_to_new[&a.node.id];
            b.node.id = old_to_new[&b.node.id];
        }
        new_gates.push(new_node);
    }

    let new_outputs = orig_fn
        .outputs
        .iter()
        .map(|output| Output {
            name: output.name.clone(),
            bit_vector: remap_bit_vector(&output.bit_vector, &old_to_new),
        })
        .collect();
    let new_inputs = orig_fn
        .inputs
        .iter()
        .map(|input| Input {
            name: input.name.clone(),
            bit_vector: remap_bit_vector(&input.bit_vector, &old_to_new),
        })
        .collect();

    let result = GateFn {
        name: orig_fn.name.clone(),
        inputs: new_inputs,
        outputs: new_outputs,
        gates: new_gates,
    };
    result.check_invariants_with_debug_assert();
    result
}
