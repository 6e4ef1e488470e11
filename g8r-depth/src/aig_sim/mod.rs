// SPDX-License-Identifier: Apache-2.0

pub mod gate_sim;

pub use gate_sim::{eval_bools, simulate_words, truth_tables};
