// SPDX-License-Identifier: Apache-2.0

use crate::aig::topo::post_order_operands;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct AigRef {
    pub id: usize,
}

/// A reference to a node together with the polarity it is used with.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct AigOperand {
    pub node: AigRef,
    pub negated: bool,
}

impl AigOperand {
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            node: self.node,
            negated: !self.negated,
        }
    }

    /// Returns this operand with its polarity flipped iff `negated` is set;
    /// i.e. the operand as seen through a (possibly inverting) reference.
    #[must_use]
    pub fn with_negation(&self, negated: bool) -> Self {
        Self {
            node: self.node,
            negated: self.negated ^ negated,
        }
    }
}

impl From<AigRef> for AigOperand {
    fn from(node: AigRef) -> Self {
        AigOperand {
            node,
            negated: false,
        }
    }
}

impl From<&AigRef> for AigOperand {
    fn from(node: &AigRef) -> Self {
        AigOperand {
            node: *node,
            negated: false,
        }
    }
}

impl std::ops::Not for AigOperand {
    type Output = AigOperand;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    Input {
        name: String,
        /// Index where 0 is the least significant bit of the input.
        lsb_index: usize,
    },
    Literal(bool),
    And2 {
        a: AigOperand,
        b: AigOperand,
    },
}

impl AigNode {
    pub fn get_operands(&self) -> Vec<AigOperand> {
        match self {
            AigNode::Input { .. } => vec![],
            AigNode::Literal(_) => vec![],
            AigNode::And2 { a, b } => vec![*a, *b],
        }
    }

    pub fn get_args(&self) -> Vec<AigRef> {
        match self {
            AigNode::Input { .. } => vec![],
            AigNode::Literal(_) => vec![],
            AigNode::And2 { a, b } => vec![a.node, b.node],
        }
    }

    /// Returns the ordered fan-in pair for an `And2`, `None` otherwise.
    pub fn fanins(&self) -> Option<[AigOperand; 2]> {
        match self {
            AigNode::And2 { a, b } => Some([*a, *b]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AigBitVector {
    /// In this representation index 0 is the LSb, the last index is the MSb.
    operands: Vec<AigOperand>,
}

impl From<AigOperand> for AigBitVector {
    fn from(operand: AigOperand) -> Self {
        AigBitVector {
            operands: vec![operand],
        }
    }
}

impl TryFrom<AigBitVector> for AigOperand {
    type Error = String;

    fn try_from(bv: AigBitVector) -> Result<AigOperand, Self::Error> {
        if bv.operands.len() != 1 {
            Err(format!(
                "expected a single operand for AigBitVector -> AigOperand, but got {} operands",
                bv.operands.len()
            ))
        } else {
            Ok(bv.operands[0])
        }
    }
}

impl AigBitVector {
    pub fn from_bit(bit: AigOperand) -> Self {
        Self {
            operands: vec![bit],
        }
    }

    /// Creates a bit vector from a slice where index 0 of the slice is the
    /// least significant bit.
    pub fn from_lsb_is_index_0(operands: &[AigOperand]) -> Self {
        Self {
            operands: operands.to_vec(),
        }
    }

    pub fn iter_lsb_to_msb(&self) -> impl DoubleEndedIterator<Item = &AigOperand> {
        self.operands.iter()
    }

    pub fn iter_lsb_to_msb_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut AigOperand> {
        self.operands.iter_mut()
    }

    pub fn get_lsb(&self, index: usize) -> &AigOperand {
        assert!(
            index < self.operands.len(),
            "index {} is out of bounds for bit vector of length {}",
            index,
            self.operands.len()
        );
        &self.operands[index]
    }

    pub fn get_bit_count(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }
}

fn io_to_string(name: &str, bit_vector: &AigBitVector) -> String {
    let array_str = bit_vector
        .iter_lsb_to_msb()
        .map(|bit| {
            if bit.negated {
                format!("not(%{})", bit.node.id)
            } else {
                format!("%{}", bit.node.id)
            }
        })
        .collect::<Vec<String>>()
        .join(", ");
    format!(
        "{}: bits[{}] = [{}]",
        name,
        bit_vector.get_bit_count(),
        array_str
    )
}

/// An input has a name (which should be unique among inputs/outputs) and a
/// vector of gate references that make up this named entity; i.e. we have bit
/// vectors for named inputs.
#[derive(Debug, Clone)]
pub struct Input {
    pub name: String,
    pub bit_vector: AigBitVector,
}

impl Input {
    pub fn get_bit_count(&self) -> usize {
        self.bit_vector.get_bit_count()
    }
}

/// Similar to inputs, but references from the AIG can be negated.
#[derive(Debug, Clone)]
pub struct Output {
    pub name: String,
    pub bit_vector: AigBitVector,
}

impl Output {
    pub fn get_bit_count(&self) -> usize {
        self.bit_vector.get_bit_count()
    }
}

/// Flat snapshot of a combinational AIG with named bit-vector I/O.
///
/// Node 0 is always the constant-false literal.
#[derive(Debug, Clone)]
pub struct GateFn {
    pub name: String,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub gates: Vec<AigNode>,
}

impl std::fmt::Display for GateFn {
    /// Implementation note: we emit nodes here and the negation is folded into
    /// the node emission process, which means we need a sweep over the
    /// outputs to negate those explicitly.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.check_invariants_with_debug_assert();
        let input_str = self
            .inputs
            .iter()
            .map(|input| io_to_string(&input.name, &input.bit_vector))
            .collect::<Vec<String>>()
            .join(", ");
        let output_str = self
            .outputs
            .iter()
            .map(|output| io_to_string(&output.name, &output.bit_vector))
            .collect::<Vec<String>>()
            .join(", ");

        let get_node_str = |id: usize| match &self.gates[id] {
            AigNode::Input { name, lsb_index } => format!("{}[{}]", name, lsb_index),
            _ => format!("%{}", id),
        };
        let operand_str = |op: &AigOperand| {
            let node_str = get_node_str(op.node.id);
            if op.negated {
                format!("not({})", node_str)
            } else {
                node_str
            }
        };

        writeln!(f, "fn {}({}) -> ({}) {{", self.name, input_str, output_str)?;
        let mut emitted = std::collections::HashSet::new();
        for operand in self.post_order_operands(true) {
            let aig_ref = operand.node;
            if !emitted.insert(aig_ref) {
                continue;
            }
            match self.get(aig_ref) {
                AigNode::And2 { a, b } => {
                    writeln!(
                        f,
                        "  %{} = and({}, {})",
                        aig_ref.id,
                        operand_str(a),
                        operand_str(b)
                    )?;
                }
                AigNode::Input { .. } => {}
                AigNode::Literal(value) => {
                    writeln!(f, "  %{} = literal({})", aig_ref.id, value)?;
                }
            }
        }

        for output in &self.outputs {
            for (i, output_bit) in output.bit_vector.iter_lsb_to_msb().enumerate() {
                if output_bit.negated {
                    writeln!(
                        f,
                        "  {}[{}] = not(%{})",
                        output.name, i, output_bit.node.id
                    )?;
                } else {
                    writeln!(f, "  {}[{}] = %{}", output.name, i, output_bit.node.id)?;
                }
            }
        }
        write!(f, "}}")
    }
}

impl GateFn {
    pub fn get(&self, aig_ref: AigRef) -> &AigNode {
        &self.gates[aig_ref.id]
    }

    pub fn input_bit_count(&self) -> usize {
        self.inputs.iter().map(|i| i.get_bit_count()).sum()
    }

    pub fn output_bit_count(&self) -> usize {
        self.outputs.iter().map(|o| o.get_bit_count()).sum()
    }

    /// All input bits, flattened in declaration order (LSb first per input).
    pub fn input_refs(&self) -> Vec<AigRef> {
        self.inputs
            .iter()
            .flat_map(|input| input.bit_vector.iter_lsb_to_msb().map(|op| op.node))
            .collect()
    }

    /// All output bits, flattened in declaration order (LSb first per output).
    pub fn output_operands(&self) -> Vec<AigOperand> {
        self.outputs
            .iter()
            .flat_map(|output| output.bit_vector.iter_lsb_to_msb().copied())
            .collect()
    }

    /// Worklist-based postorder traversal from all outputs, returns
    /// Vec<AigOperand> (with negation).
    pub fn post_order_operands(&self, discard_inputs: bool) -> Vec<AigOperand> {
        let starts = self.output_operands();
        if starts.is_empty() {
            return Vec::new();
        }
        post_order_operands(&starts, &self.gates, discard_inputs)
    }

    pub fn post_order_refs(&self) -> Vec<AigRef> {
        crate::aig::topo::topo_sort_refs(&self.gates)
    }

    pub fn get_signature(&self) -> String {
        let params_str = self
            .inputs
            .iter()
            .map(|input| format!("{}: bits[{}]", input.name, input.get_bit_count()))
            .collect::<Vec<String>>()
            .join(", ");
        let outputs_str = if self.outputs.len() == 1 {
            format!("bits[{}]", self.outputs[0].get_bit_count())
        } else {
            let guts = self
                .outputs
                .iter()
                .map(|output| format!("bits[{}]", output.get_bit_count()))
                .collect::<Vec<String>>()
                .join(", ");
            format!("({})", guts)
        };
        format!("fn {}({}) -> {}", self.name, params_str, outputs_str)
    }

    /// Checks internal invariants of the GateFn, panicking if any are violated.
    /// - All AigRef indices in inputs, outputs, and gates must be in-bounds for
    ///   self.gates.
    pub fn check_invariants_with_debug_assert(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        let gate_count = self.gates.len();
        for input in &self.inputs {
            for bit in input.bit_vector.iter_lsb_to_msb() {
                assert!(
                    bit.node.id < gate_count,
                    "Input AigRef out of bounds: {:?} (gates.len() = {})",
                    bit.node,
                    gate_count
                );
            }
        }
        for output in &self.outputs {
            for bit in output.bit_vector.iter_lsb_to_msb() {
                assert!(
                    bit.node.id < gate_count,
                    "Output AigRef out of bounds: {:?} (gates.len() = {})",
                    bit.node,
                    gate_count
                );
            }
        }
        for (i, node) in self.gates.iter().enumerate() {
            if let AigNode::And2 { a, b } = node {
                assert!(
                    a.node.id < gate_count && b.node.id < gate_count,
                    "Gate %{}: operand AigRef out of bounds: {:?}, {:?} (gates.len() = {})",
                    i,
                    a.node,
                    b.node,
                    gate_count
                );
            }
        }
    }
}
