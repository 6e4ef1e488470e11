// SPDX-License-Identifier: Apache-2.0

use crate::aig::fanout::fanout_histogram;
use crate::aig::gate::{AigNode, AigRef, GateFn};
use crate::aig::topo::topo_sort_refs;
use crate::use_count::get_id_to_use_count;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryStats {
    pub live_nodes: usize,
    pub and_nodes: usize,
    pub deepest_path: usize,
    pub fanout_histogram: BTreeMap<usize, usize>,
}

#[derive(Debug)]
pub struct GateDepthStats {
    pub depth_to_count: HashMap<usize, usize>,
    pub deepest_path: Vec<AigRef>,
    /// Indexed by node id; inputs and literals are depth 0.
    pub ref_to_depth: Vec<usize>,
}

/// Returns the level of every node (indexed by node id) in the gate list.
pub fn compute_levels(gate_fn: &GateFn) -> Vec<usize> {
    let mut depths = vec![0usize; gate_fn.gates.len()];
    // Topological order rather than recursion: very deep chains are exactly the
    // graphs this crate is asked to process.
    for node_ref in topo_sort_refs(&gate_fn.gates) {
        if let AigNode::And2 { a, b } = &gate_fn.gates[node_ref.id] {
            depths[node_ref.id] = 1 + std::cmp::max(depths[a.node.id], depths[b.node.id]);
        }
    }
    depths
}

/// Returns:
/// * a mapping that shows {depth: count} where the count is in number of gates.
/// * the deepest path in the gate DAG, from the output back to a leaf.
pub fn get_gate_depth(gate_fn: &GateFn, live_nodes: &[AigRef]) -> GateDepthStats {
    let depths = compute_levels(gate_fn);

    let deepest_primary_output: Option<(AigRef, usize)> = gate_fn
        .output_operands()
        .iter()
        .map(|operand| (operand.node, depths[operand.node.id]))
        .fold(None, |best, (node, depth)| match best {
            Some((_, best_depth)) if best_depth >= depth => best,
            _ => Some((node, depth)),
        });

    let Some((deepest_gate_ref, _)) = deepest_primary_output else {
        // If there are no outputs for this function, its summary stats are trivial.
        return GateDepthStats {
            depth_to_count: HashMap::new(),
            deepest_path: vec![],
            ref_to_depth: depths,
        };
    };
    log::trace!("Deepest primary output: {:?}", deepest_primary_output);

    let mut deepest_path = vec![];
    let mut current_gate_ref = Some(deepest_gate_ref);
    while let Some(gate_ref) = current_gate_ref {
        deepest_path.push(gate_ref);
        let args = gate_fn.gates[gate_ref.id].get_args();
        current_gate_ref = args.iter().copied().max_by_key(|arg| depths[arg.id]);
    }

    let mut depth_to_count: HashMap<usize, usize> = HashMap::new();
    for node in live_nodes {
        *depth_to_count.entry(depths[node.id]).or_insert(0) += 1;
    }
    GateDepthStats {
        depth_to_count,
        deepest_path,
        ref_to_depth: depths,
    }
}

pub fn get_summary_stats(gate_fn: &GateFn) -> SummaryStats {
    let id_to_use_count: HashMap<AigRef, usize> = get_id_to_use_count(gate_fn);
    let live_nodes: Vec<AigRef> = id_to_use_count.keys().cloned().collect();
    let and_nodes = live_nodes
        .iter()
        .filter(|r| matches!(gate_fn.gates[r.id], AigNode::And2 { .. }))
        .count();

    let stats = get_gate_depth(gate_fn, &live_nodes);

    let hist_sorted: BTreeMap<usize, usize> = fanout_histogram(gate_fn).into_iter().collect();
    SummaryStats {
        live_nodes: live_nodes.len(),
        and_nodes,
        // The path includes its leaf; the number of AND levels is one less.
        deepest_path: stats.deepest_path.len().saturating_sub(1),
        fanout_histogram: hist_sorted,
    }
}
