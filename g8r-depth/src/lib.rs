// SPDX-License-Identifier: Apache-2.0

//! Depth-oriented algebraic rewriting of and-inverter graphs (AIGs).
//!
//! A `GateFn` is the flat, serializable form of an AIG. The rewriter works on a
//! mutable [`network::AigNetwork`] wrapped in a [`network::DepthView`] that
//! tracks levels and the critical path, and repeatedly applies the rules in
//! [`algebraic`] until none of them shortens the critical path any further.

pub mod aig;
pub mod aig_serdes;
pub mod aig_sim;
pub mod algebraic;
pub mod equiv;
pub mod gate_builder;
pub mod network;
pub mod process_aig_path;
pub mod test_utils;
pub mod use_count;
