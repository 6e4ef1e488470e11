// SPDX-License-Identifier: Apache-2.0

//! The `GateBuilder` is a builder for a `GateFn` -- it builds up the underlying
//! (AIG) data structure as operations are added.
//!
//! It tracks `Input` and `Output` nodes which are bundles of "primary input" /
//! "primary output" values.
//!
//! It can be created with "folding" (opportunistic simplification) on or off --
//! "off" is generally useful for building exact structures in tests, e.g. a
//! deliberately deep chain the depth rewriter is expected to rebalance.
//!
//! Basic example usage:
//! ```
//! use g8r_depth::gate_builder::{GateBuilder, GateBuilderOptions};
//! use g8r_depth::aig::{GateFn, AigBitVector, AigOperand};
//!
//! let mut builder = GateBuilder::new("my_and_gate".to_string(), GateBuilderOptions::opt());
//! let a: AigBitVector = builder.add_input("a".to_string(), 1);
//! let a0: &AigOperand = a.get_lsb(0);
//! let b: AigBitVector = builder.add_input("b".to_string(), 1);
//! let b0: &AigOperand = b.get_lsb(0);
//! let o0: AigOperand = builder.add_and_binary(*a0, *b0);
//! builder.add_output("o".to_string(), o0.into());
//! let gate_fn: GateFn = builder.build();
//! ```

use crate::aig::aig_hasher::AigHasher;
use crate::aig::gate::{AigBitVector, AigNode, AigOperand, AigRef, GateFn, Input, Output};

pub struct GateBuilder {
    pub name: String,
    pub gates: Vec<AigNode>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub options: GateBuilderOptions,
    pub hasher: Option<AigHasher>,
}

#[derive(Debug, Clone, Copy)]
pub struct GateBuilderOptions {
    pub fold: bool,
    pub hash: bool,
}

impl GateBuilderOptions {
    /// Returns a default "optimizing" `GateBuilderOptions` with folding and
    /// hashing enabled.
    pub fn opt() -> Self {
        Self {
            fold: true,
            hash: true,
        }
    }

    pub fn no_opt() -> Self {
        Self {
            fold: false,
            hash: false,
        }
    }
}

impl GateBuilder {
    pub fn new(name: String, options: GateBuilderOptions) -> Self {
        Self {
            name,
            gates: vec![AigNode::Literal(false)],
            inputs: Vec::new(),
            outputs: Vec::new(),
            options,
            hasher: if options.hash {
                Some(AigHasher::new())
            } else {
                None
            },
        }
    }

    pub fn build(self) -> GateFn {
        debug_assert!(
            !self.outputs.is_empty(),
            "GateBuilder::build: graph must have at least one output (degenerate/empty graph)"
        );
        GateFn {
            name: self.name,
            inputs: self.inputs,
            outputs: self.outputs,
            gates: self.gates,
        }
    }

    pub fn get_false(&self) -> AigOperand {
        AigOperand {
            node: AigRef { id: 0 },
            negated: false,
        }
    }

    pub fn is_known_false(&self, operand: AigOperand) -> bool {
        operand.node.id == 0 && !operand.negated
    }

    pub fn get_true(&self) -> AigOperand {
        AigOperand {
            node: AigRef { id: 0 },
            negated: true,
        }
    }

    pub fn is_known_true(&self, operand: AigOperand) -> bool {
        operand.node.id == 0 && operand.negated
    }

    pub fn add_input(&mut self, name: String, bit_count: usize) -> AigBitVector {
        let mut bits: Vec<AigOperand> = Vec::new();
        for lsb_i in 0..bit_count {
            let gate_ref = AigRef {
                id: self.gates.len(),
            };
            self.gates.push(AigNode::Input {
                name: name.clone(),
                lsb_index: lsb_i,
            });
            bits.push(gate_ref.into());
        }
        let bit_vector = AigBitVector::from_lsb_is_index_0(&bits);
        self.inputs.push(Input {
            name,
            bit_vector: bit_vector.clone(),
        });
        bit_vector
    }

    pub fn add_output(&mut self, name: String, bit_vector: AigBitVector) {
        for bit in bit_vector.iter_lsb_to_msb() {
            debug_assert!(
                bit.node.id < self.gates.len(),
                "add_output: Output node index out of bounds: {} (gates.len() = {})",
                bit.node.id,
                self.gates.len()
            );
        }
        self.outputs.push(Output { name, bit_vector });
    }

    pub fn add_and_binary(&mut self, lhs: AigOperand, rhs: AigOperand) -> AigOperand {
        if self.options.fold {
            if self.is_known_false(lhs) || self.is_known_false(rhs) {
                return self.get_false();
            }
            if self.is_known_true(lhs) {
                return rhs;
            }
            if self.is_known_true(rhs) {
                return lhs;
            }
            if lhs == rhs {
                return lhs;
            }
            if lhs == rhs.negate() {
                return self.get_false();
            }
        }
        if let Some(hasher) = &self.hasher {
            if let Some(existing) = hasher.lookup(lhs, rhs) {
                return existing.into();
            }
        }
        let gate_ref = AigRef {
            id: self.gates.len(),
        };
        self.gates.push(AigNode::And2 { a: lhs, b: rhs });
        if let Some(hasher) = &mut self.hasher {
            hasher.feed_ref(&gate_ref, &self.gates);
        }
        gate_ref.into()
    }

    /// Left-leaning conjunction `((args[0] & args[1]) & args[2]) & ...`.
    pub fn add_and_nary(&mut self, args: &[AigOperand]) -> AigOperand {
        assert!(
            !args.is_empty(),
            "attempted to reduce an empty list of operands"
        );
        let mut accum = args[0];
        for arg in &args[1..] {
            accum = self.add_and_binary(accum, *arg);
        }
        accum
    }
}
