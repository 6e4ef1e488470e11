// SPDX-License-Identifier: Apache-2.0

//! Level and critical-path annotation for any `Network`.
//!
//! Levels: inputs and constants are 0, an `And2` is one more than its deepest
//! fan-in. The depth is the largest level among primary outputs. A node is on
//! the critical path when it lies on some output-to-input path whose length
//! equals the depth.
//!
//! The annotation is a snapshot: after any mutation of the wrapped network it
//! is stale until `update_levels()` is called.

use bitvec::vec::BitVec;

use crate::aig::gate::{AigOperand, AigRef};
use crate::network::{DepthNetwork, Network};

pub struct DepthView<N: Network> {
    network: N,
    levels: Vec<usize>,
    critical: BitVec,
    depth: usize,
}

/// Post-order over the live gates of `network`: every gate appears after both
/// of its fan-ins. Iterative so long chains do not exhaust the stack.
fn topo_gates<N: Network>(network: &N) -> Vec<AigRef> {
    let mut visited: BitVec = BitVec::repeat(false, network.node_count());
    let mut order = Vec::new();
    for root in network.gate_refs() {
        if visited[root.id] {
            continue;
        }
        // (node, fan-ins already pushed)
        let mut stack: Vec<(AigRef, bool)> = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            if visited[node.id] {
                continue;
            }
            visited.set(node.id, true);
            let Some(fanins) = network.fanins(node) else {
                continue;
            };
            stack.push((node, true));
            for fanin in fanins {
                if !visited[fanin.node.id] {
                    stack.push((fanin.node, false));
                }
            }
        }
    }
    order
}

impl<N: Network> DepthView<N> {
    pub fn new(network: N) -> Self {
        let mut view = DepthView {
            network,
            levels: Vec::new(),
            critical: BitVec::new(),
            depth: 0,
        };
        view.update_levels();
        view
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn into_inner(self) -> N {
        self.network
    }
}

impl<N: Network> Network for DepthView<N> {
    fn gate_refs(&self) -> Vec<AigRef> {
        self.network.gate_refs()
    }

    fn fanins(&self, node: AigRef) -> Option<[AigOperand; 2]> {
        self.network.fanins(node)
    }

    fn output_operands(&self) -> Vec<AigOperand> {
        self.network.output_operands()
    }

    fn node_count(&self) -> usize {
        self.network.node_count()
    }

    fn is_dead(&self, node: AigRef) -> bool {
        self.network.is_dead(node)
    }

    fn create_and(&mut self, a: AigOperand, b: AigOperand) -> AigOperand {
        self.network.create_and(a, b)
    }

    fn substitute_node(&mut self, old: AigRef, new: AigOperand) {
        self.network.substitute_node(old, new)
    }
}

impl<N: Network> DepthNetwork for DepthView<N> {
    fn level(&self, node: AigRef) -> usize {
        self.levels.get(node.id).copied().unwrap_or(0)
    }

    fn is_on_critical_path(&self, node: AigRef) -> bool {
        self.critical.get(node.id).map(|bit| *bit).unwrap_or(false)
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn update_levels(&mut self) {
        let node_count = self.network.node_count();
        let order = topo_gates(&self.network);

        let mut levels = vec![0usize; node_count];
        for &gate in &order {
            if let Some([a, b]) = self.network.fanins(gate) {
                levels[gate.id] = 1 + std::cmp::max(levels[a.node.id], levels[b.node.id]);
            }
        }

        let outputs = self.network.output_operands();
        let depth = outputs
            .iter()
            .map(|op| levels[op.node.id])
            .max()
            .unwrap_or(0);

        let mut critical: BitVec = BitVec::repeat(false, node_count);
        for op in &outputs {
            if levels[op.node.id] == depth {
                critical.set(op.node.id, true);
            }
        }
        for &gate in order.iter().rev() {
            if !critical[gate.id] {
                continue;
            }
            let Some(fanins) = self.network.fanins(gate) else {
                continue;
            };
            for fanin in fanins {
                if levels[fanin.node.id] + 1 == levels[gate.id] {
                    critical.set(fanin.node.id, true);
                }
            }
        }

        log::trace!(
            "update_levels: {} nodes, depth {}, {} critical",
            node_count,
            depth,
            critical.count_ones()
        );
        self.levels = levels;
        self.critical = critical;
        self.depth = depth;
    }
}
