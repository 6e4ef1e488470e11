// SPDX-License-Identifier: Apache-2.0

//! Textual formats: the native `GateFn` text form and ASCII AIGER.

pub mod emit_aiger;
pub mod gate_parser;
pub mod load_aiger;

pub use emit_aiger::emit_aiger;
pub use gate_parser::{parse_gate_fn, ParseError};
pub use load_aiger::{load_aiger, LoadAigerResult};
