// SPDX-License-Identifier: Apache-2.0

//! Mutable logic-network abstractions the depth rewriter operates on.
//!
//! `Network` is the structural interface: enumerate gates, read fan-ins,
//! create ANDs and substitute nodes. `DepthNetwork` layers level and
//! critical-path queries on top; the rewriting entry point is bounded on it so
//! a network without level information is rejected at compile time.

pub mod aig_network;
pub mod depth_view;

pub use aig_network::AigNetwork;
pub use depth_view::DepthView;

use crate::aig::gate::{AigOperand, AigRef};

pub trait Network {
    /// Live `And2` nodes in ascending id order.
    fn gate_refs(&self) -> Vec<AigRef>;

    /// Ordered fan-in pair of a live `And2` node; `None` for inputs and
    /// constants.
    fn fanins(&self, node: AigRef) -> Option<[AigOperand; 2]>;

    /// Primary output signals, flattened in declaration order.
    fn output_operands(&self) -> Vec<AigOperand>;

    /// Total number of node slots (live or dead).
    fn node_count(&self) -> usize;

    fn is_dead(&self, node: AigRef) -> bool;

    /// Returns a signal computing `a & b`. Under structural hashing and
    /// constant folding this may be a pre-existing node.
    fn create_and(&mut self, a: AigOperand, b: AigOperand) -> AigOperand;

    /// Redirects every reference to `old` (gate fan-ins and primary outputs)
    /// to `new`, preserving the polarity carried on each reference. `old` is
    /// dead afterwards.
    fn substitute_node(&mut self, old: AigRef, new: AigOperand);
}

pub trait DepthNetwork: Network {
    fn level(&self, node: AigRef) -> usize;

    fn is_on_critical_path(&self, node: AigRef) -> bool;

    /// Maximum level over the primary outputs.
    fn depth(&self) -> usize;

    /// Recomputes levels and critical-path flags for the whole network.
    fn update_levels(&mut self);
}
