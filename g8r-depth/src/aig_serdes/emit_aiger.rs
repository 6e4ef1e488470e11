// SPDX-License-Identifier: Apache-2.0

//! ASCII AIGER ("aag") emitter for combinational `GateFn`s.
//!
//! Variables are renumbered densely: input bits become variables `1..=I` in
//! declaration order and live AND gates follow in topological order, so every
//! AND's left-hand side is larger than both of its right-hand-side literals.
//! The constant-false node is literal 0 and constant true is literal 1.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::aig::gate::{AigNode, AigOperand, AigRef, GateFn};
use crate::aig::topo::topo_sort_refs;
use crate::use_count::get_id_to_use_count;

fn operand_to_literal(
    gate_fn: &GateFn,
    var_of: &HashMap<AigRef, u32>,
    op: AigOperand,
) -> Result<u32, String> {
    let base = match &gate_fn.gates[op.node.id] {
        AigNode::Literal(value) => u32::from(*value),
        _ => {
            let var = var_of
                .get(&op.node)
                .ok_or_else(|| format!("operand refers to unmapped node %{}", op.node.id))?;
            var << 1
        }
    };
    Ok(base ^ u32::from(op.negated))
}

fn bit_names(name: &str, bit_count: usize) -> Vec<String> {
    if bit_count == 1 {
        vec![name.to_string()]
    } else {
        (0..bit_count).map(|i| format!("{}_{}", name, i)).collect()
    }
}

/// Emits `gate_fn` in ASCII AIGER format; only gates reachable from the
/// outputs are written.
pub fn emit_aiger(gate_fn: &GateFn, include_symbols: bool) -> Result<String, String> {
    let mut var_of: HashMap<AigRef, u32> = HashMap::new();
    let input_refs = gate_fn.input_refs();
    for aig_ref in &input_refs {
        if !matches!(gate_fn.get(*aig_ref), AigNode::Input { .. }) {
            return Err(format!("input bit %{} is not an input node", aig_ref.id));
        }
        let var = var_of.len() as u32 + 1;
        var_of.insert(*aig_ref, var);
    }

    let live = get_id_to_use_count(gate_fn);
    let and_refs: Vec<AigRef> = topo_sort_refs(&gate_fn.gates)
        .into_iter()
        .filter(|r| live.contains_key(r) && matches!(gate_fn.get(*r), AigNode::And2 { .. }))
        .collect();
    for aig_ref in &and_refs {
        let var = var_of.len() as u32 + 1;
        var_of.insert(*aig_ref, var);
    }

    let max_var_index = var_of.len();
    let output_count = gate_fn.output_bit_count();
    let mut out = String::new();
    writeln!(
        out,
        "aag {} {} 0 {} {}",
        max_var_index,
        input_refs.len(),
        output_count,
        and_refs.len()
    )
    .map_err(|e| e.to_string())?;

    for aig_ref in &input_refs {
        writeln!(out, "{}", var_of[aig_ref] << 1).map_err(|e| e.to_string())?;
    }
    for op in gate_fn.output_operands() {
        let lit = operand_to_literal(gate_fn, &var_of, op)?;
        writeln!(out, "{}", lit).map_err(|e| e.to_string())?;
    }
    for aig_ref in &and_refs {
        let AigNode::And2 { a, b } = gate_fn.get(*aig_ref) else {
            continue;
        };
        let lhs = var_of[aig_ref] << 1;
        let rhs0 = operand_to_literal(gate_fn, &var_of, *a)?;
        let rhs1 = operand_to_literal(gate_fn, &var_of, *b)?;
        writeln!(out, "{} {} {}", lhs, rhs0, rhs1).map_err(|e| e.to_string())?;
    }

    if include_symbols {
        let input_names = gate_fn
            .inputs
            .iter()
            .flat_map(|input| bit_names(&input.name, input.get_bit_count()));
        for (i, name) in input_names.enumerate() {
            writeln!(out, "i{} {}", i, name).map_err(|e| e.to_string())?;
        }
        let output_names = gate_fn
            .outputs
            .iter()
            .flat_map(|output| bit_names(&output.name, output.get_bit_count()));
        for (i, name) in output_names.enumerate() {
            writeln!(out, "o{} {}", i, name).map_err(|e| e.to_string())?;
        }
    }

    out.push_str("c\n");
    writeln!(out, "generated by g8r-depth emit_aiger").map_err(|e| e.to_string())?;
    Ok(out)
}
