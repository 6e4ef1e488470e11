// SPDX-License-Identifier: Apache-2.0

pub mod prove_equiv;

pub use prove_equiv::{prove_gate_fn_equiv, EquivResult, ProveError};
