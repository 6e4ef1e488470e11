// SPDX-License-Identifier: Apache-2.0

pub mod aig_hasher;
pub mod dce;
pub mod fanout;
pub mod gate;
pub mod get_summary_stats;
pub mod topo;

pub use crate::aig::gate::{AigBitVector, AigNode, AigOperand, AigRef, GateFn, Input, Output};
pub use crate::gate_builder::{GateBuilder, GateBuilderOptions};
