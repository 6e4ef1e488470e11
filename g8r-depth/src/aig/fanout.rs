// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use crate::aig::gate::{AigNode, GateFn};

/// Maps fanout count to the number of nodes with that many AND-gate users.
///
/// Nodes driving a primary output are skipped, since their external users are
/// not visible here, and so is the constant node.
pub fn fanout_histogram(gate_fn: &GateFn) -> HashMap<usize, usize> {
    let mut users = vec![0usize; gate_fn.gates.len()];
    for (a, b) in gate_fn.gates.iter().filter_map(|node| match node {
        AigNode::And2 { a, b } => Some((a, b)),
        _ => None,
    }) {
        users[a.node.id] += 1;
        users[b.node.id] += 1;
    }
    let drives_output: HashSet<usize> = gate_fn
        .output_operands()
        .iter()
        .map(|operand| operand.node.id)
        .collect();
    let mut histogram = HashMap::new();
    for (id, count) in users.iter().enumerate().skip(1) {
        if !drives_output.contains(&id) {
            *histogram.entry(*count).or_insert(0) += 1;
        }
    }
    histogram
}
