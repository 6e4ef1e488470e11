// SPDX-License-Identifier: Apache-2.0

//! Bit-parallel gate-level interpreter.
//!
//! A node value is a `u64`: bit `k` is the value of that node under stimulus
//! pattern `k`, so one pass over the gates evaluates 64 input assignments.

use crate::aig::gate::{AigNode, AigOperand, GateFn};

fn operand_word(values: &[u64], operand: &AigOperand) -> u64 {
    let value = values[operand.node.id];
    if operand.negated {
        !value
    } else {
        value
    }
}

/// Returns the per-node words for the given per-input-bit stimulus words.
fn simulate_node_words(gate_fn: &GateFn, input_words: &[u64]) -> Vec<u64> {
    assert_eq!(
        input_words.len(),
        gate_fn.input_bit_count(),
        "simulate: expected one stimulus word per input bit"
    );
    let mut values = vec![0u64; gate_fn.gates.len()];
    for (aig_ref, word) in gate_fn.input_refs().into_iter().zip(input_words) {
        values[aig_ref.id] = *word;
    }
    for aig_ref in gate_fn.post_order_refs() {
        values[aig_ref.id] = match &gate_fn.gates[aig_ref.id] {
            AigNode::Input { .. } => values[aig_ref.id],
            AigNode::Literal(value) => {
                if *value {
                    u64::MAX
                } else {
                    0
                }
            }
            AigNode::And2 { a, b } => operand_word(&values, a) & operand_word(&values, b),
        };
    }
    values
}

/// Simulates 64 patterns at once: one stimulus word per input bit (flattened
/// in declaration order), one result word per output bit.
pub fn simulate_words(gate_fn: &GateFn, input_words: &[u64]) -> Vec<u64> {
    let values = simulate_node_words(gate_fn, input_words);
    gate_fn
        .output_operands()
        .iter()
        .map(|op| operand_word(&values, op))
        .collect()
}

/// Evaluates a single assignment over the flattened input bits and returns the
/// flattened output bits.
pub fn eval_bools(gate_fn: &GateFn, input_bits: &[bool]) -> Vec<bool> {
    let input_words: Vec<u64> = input_bits
        .iter()
        .map(|bit| if *bit { u64::MAX } else { 0 })
        .collect();
    simulate_words(gate_fn, &input_words)
        .into_iter()
        .map(|word| word & 1 == 1)
        .collect()
}

pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// Stimulus word `word_index` for input bit `input_index` when enumerating
/// all assignments: pattern `k` (across all words) assigns bit `i` of `k`.
fn exhaustive_stimulus(input_index: usize, word_index: usize) -> u64 {
    const LOW_MASKS: [u64; 6] = [
        0xAAAA_AAAA_AAAA_AAAA,
        0xCCCC_CCCC_CCCC_CCCC,
        0xF0F0_F0F0_F0F0_F0F0,
        0xFF00_FF00_FF00_FF00,
        0xFFFF_0000_FFFF_0000,
        0xFFFF_FFFF_0000_0000,
    ];
    if input_index < 6 {
        LOW_MASKS[input_index]
    } else if (word_index >> (input_index - 6)) & 1 == 1 {
        u64::MAX
    } else {
        0
    }
}

/// Exhaustive truth table per output bit. Entry `k` of the table (bit `k % 64`
/// of word `k / 64`) is the output under the assignment whose input bit `i` is
/// bit `i` of `k`. Bits beyond `2^inputs` are zero.
pub fn truth_tables(gate_fn: &GateFn) -> Vec<Vec<u64>> {
    let input_count = gate_fn.input_bit_count();
    assert!(
        input_count <= MAX_TRUTH_TABLE_INPUTS,
        "truth_tables: {} input bits exceeds the limit of {}",
        input_count,
        MAX_TRUTH_TABLE_INPUTS
    );
    let pattern_count = 1usize << input_count;
    let word_count = pattern_count.div_ceil(64);
    let valid_mask = if pattern_count >= 64 {
        u64::MAX
    } else {
        (1u64 << pattern_count) - 1
    };

    let mut tables = vec![Vec::with_capacity(word_count); gate_fn.output_bit_count()];
    for word_index in 0..word_count {
        let stimulus: Vec<u64> = (0..input_count)
            .map(|input_index| exhaustive_stimulus(input_index, word_index))
            .collect();
        for (table, word) in tables.iter_mut().zip(simulate_words(gate_fn, &stimulus)) {
            table.push(word & valid_mask);
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate_builder::{GateBuilder, GateBuilderOptions};

    #[test]
    fn test_simulate_words_negated_output() {
        let mut gb = GateBuilder::new("nand".to_string(), GateBuilderOptions::no_opt());
        let a = *gb.add_input("a".to_string(), 1).get_lsb(0);
        let b = *gb.add_input("b".to_string(), 1).get_lsb(0);
        let ab = gb.add_and_binary(a, b);
        gb.add_output("o".to_string(), ab.negate().into());
        let gate_fn = gb.build();
        let got = simulate_words(&gate_fn, &[0b1100, 0b1010]);
        assert_eq!(got, vec![!0b1000u64]);
    }

    #[test]
    fn test_truth_table_small() {
        let mut gb = GateBuilder::new("a_and_not_b".to_string(), GateBuilderOptions::no_opt());
        let a = *gb.add_input("a".to_string(), 1).get_lsb(0);
        let b = *gb.add_input("b".to_string(), 1).get_lsb(0);
        let x = gb.add_and_binary(a, b.negate());
        gb.add_output("x".to_string(), x.into());
        let gate_fn = gb.build();
        // Patterns (b, a): 00 -> 0, 01 -> 1, 10 -> 0, 11 -> 0.
        assert_eq!(truth_tables(&gate_fn), vec![vec![0b0010]]);
    }

    #[test]
    fn test_truth_table_spans_words() {
        let mut gb = GateBuilder::new("msb".to_string(), GateBuilderOptions::no_opt());
        let input = gb.add_input("x".to_string(), 7);
        gb.add_output("o".to_string(), (*input.get_lsb(6)).into());
        let gate_fn = gb.build();
        assert_eq!(truth_tables(&gate_fn), vec![vec![0, u64::MAX]]);
    }
}
