// SPDX-License-Identifier: Apache-2.0

use crate::aig::gate::{AigNode, AigOperand, AigRef};
use std::collections::{HashSet, VecDeque};

/// Returns a postorder traversal of the AIG operands reachable from a set of
/// outputs (dedup by operand).
pub fn post_order_operands(
    starts: &[AigOperand],
    nodes: &[AigNode],
    discard_inputs: bool,
) -> Vec<AigOperand> {
    debug_assert!(
        !starts.is_empty(),
        "post_order_operands: starts is empty (no outputs or degenerate graph)"
    );
    let mut worklist = VecDeque::new();
    let mut visited = HashSet::new();
    let mut postorder = Vec::new();
    for &start in starts {
        debug_assert!(
            start.node.id < nodes.len(),
            "post_order_operands: start operand node index out of bounds: {} (nodes.len() = {})",
            start.node.id,
            nodes.len()
        );
        worklist.push_back(start);
    }
    while let Some(current) = worklist.pop_back() {
        if visited.contains(&current) {
            continue;
        }
        let node = &nodes[current.node.id];
        let mut all_deps_visited = true;
        for dep in node.get_operands() {
            if !visited.contains(&dep) {
                worklist.push_back(current); // Revisit after dependencies
                worklist.push_back(dep);
                all_deps_visited = false;
                break;
            }
        }
        if all_deps_visited {
            let should_push = match node {
                AigNode::Input { .. } => current.negated || !discard_inputs,
                _ => true,
            };
            if should_push {
                postorder.push(current);
            }
            visited.insert(current);
        }
    }
    postorder
}

/// Extracts the combined transitive fan-in cone for a set of nodes.
///
/// Returns:
/// * the gates within the cones, in the order they were discovered.
/// * the set of primary inputs feeding the cones.
pub fn extract_cone(start_nodes: &[AigRef], gates: &[AigNode]) -> (Vec<AigRef>, HashSet<AigRef>) {
    let mut cone_gates = Vec::new();
    let mut cone_inputs = HashSet::new();
    let mut visited = HashSet::new();
    let mut worklist: Vec<AigRef> = start_nodes.to_vec();

    while let Some(current_ref) = worklist.pop() {
        if !visited.insert(current_ref) {
            continue;
        }
        match &gates[current_ref.id] {
            AigNode::Input { .. } => {
                cone_inputs.insert(current_ref);
            }
            AigNode::Literal(_) => {
                cone_gates.push(current_ref);
            }
            AigNode::And2 { a, b } => {
                cone_gates.push(current_ref);
                worklist.push(a.node);
                worklist.push(b.node);
            }
        }
    }

    (cone_gates, cone_inputs)
}

/// Returns (topological order, None) if acyclic, or (partial order,
/// Some(not_visited_nodes)) if a cycle is detected.
pub fn topo_order_and_cycle_check(nodes: &[AigNode]) -> (Vec<AigRef>, Option<Vec<usize>>) {
    let gate_count = nodes.len();
    let mut indegree = vec![0usize; gate_count];
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); gate_count];
    for (i, node) in nodes.iter().enumerate() {
        if let AigNode::And2 { a, b } = node {
            indegree[i] = 2;
            parents[a.node.id].push(i);
            parents[b.node.id].push(i);
        }
    }
    let mut queue: VecDeque<usize> = (0..gate_count).filter(|i| indegree[*i] == 0).collect();
    let mut topo: Vec<AigRef> = Vec::with_capacity(gate_count);
    while let Some(node_id) = queue.pop_front() {
        topo.push(AigRef { id: node_id });
        for &parent in &parents[node_id] {
            indegree[parent] -= 1;
            if indegree[parent] == 0 {
                queue.push_back(parent);
            }
        }
    }
    if topo.len() != gate_count {
        let seen: HashSet<usize> = topo.iter().map(|r| r.id).collect();
        let not_visited: Vec<usize> = (0..gate_count).filter(|id| !seen.contains(id)).collect();
        (topo, Some(not_visited))
    } else {
        (topo, None)
    }
}

/// Returns a topological order (children before parents) of all nodes in the
/// graph.
pub fn topo_sort_refs(nodes: &[AigNode]) -> Vec<AigRef> {
    let (order, cycle) = topo_order_and_cycle_check(nodes);
    if let Some(not_visited) = cycle {
        panic!(
            "Cycle detected in AIG graph: topological sort visited {} of {} nodes; not visited: {:?}",
            nodes.len() - not_visited.len(),
            nodes.len(),
            not_visited
        );
    }
    order
}
