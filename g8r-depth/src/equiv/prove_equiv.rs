// SPDX-License-Identifier: Apache-2.0

//! SAT-based combinational equivalence between two `GateFn`s.
//!
//! Both functions are Tseitin-encoded over a shared set of input literals, an
//! XOR miter is placed on every output bit pair, and the solver is asked for
//! an assignment that makes some miter true.

use std::collections::{HashMap, HashSet};

use varisat::ExtendFormula;

use crate::aig::gate::{AigNode, AigRef, GateFn};
use crate::aig::topo::extract_cone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivResult {
    Proved,
    /// Distinguishing assignment over the flattened input bits.
    Disproved(Vec<bool>),
}

#[derive(Debug)]
pub enum ProveError {
    SignatureMismatch { lhs: String, rhs: String },
    SolverError(varisat::solver::SolverError),
}

impl std::fmt::Display for ProveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProveError::SignatureMismatch { lhs, rhs } => {
                write!(f, "signature mismatch: `{}` vs `{}`", lhs, rhs)
            }
            ProveError::SolverError(e) => write!(f, "SAT solver error: {:?}", e),
        }
    }
}

impl std::error::Error for ProveError {}

// Tseitin clauses for: output <=> a AND b
// (output ∨ ¬a ∨ ¬b) (¬output ∨ a) (¬output ∨ b)
fn add_tseitsin_and(
    solver: &mut impl ExtendFormula,
    a: varisat::Lit,
    b: varisat::Lit,
    output: varisat::Lit,
) {
    solver.add_clause(&[!a, !b, output]);
    solver.add_clause(&[a, !output]);
    solver.add_clause(&[b, !output]);
}

// Clauses for m = a XOR b are:
// (!a | !b | !m) & (a | b | !m) & (a | !b | m) & (!a | b | m)
fn add_tseitsin_xor(
    solver: &mut impl ExtendFormula,
    a: varisat::Lit,
    b: varisat::Lit,
    output: varisat::Lit,
) {
    solver.add_clause(&[!a, !b, !output]);
    solver.add_clause(&[a, b, !output]);
    solver.add_clause(&[a, !b, output]);
    solver.add_clause(&[!a, b, output]);
}

/// Encodes the output cones of `gate_fn`; returns one literal per flattened
/// output bit.
fn build_gate_fn(
    solver: &mut impl ExtendFormula,
    gate_fn: &GateFn,
    input_lits: &[varisat::Lit],
) -> Vec<varisat::Lit> {
    let input_map: HashMap<AigRef, varisat::Lit> = gate_fn
        .input_refs()
        .into_iter()
        .zip(input_lits.iter().copied())
        .collect();

    let output_refs: Vec<AigRef> = gate_fn.output_operands().iter().map(|op| op.node).collect();
    let (cone_gates, cone_inputs) = extract_cone(&output_refs, &gate_fn.gates);

    let mut map: HashMap<AigRef, varisat::Lit> = HashMap::new();
    for g in &cone_gates {
        map.insert(*g, solver.new_lit());
    }
    for input in &cone_inputs {
        map.insert(*input, input_map[input]);
    }

    let lit_of = |map: &HashMap<AigRef, varisat::Lit>, op: &crate::aig::AigOperand| {
        let base = map[&op.node];
        if op.negated {
            !base
        } else {
            base
        }
    };

    for g in &cone_gates {
        let out_lit = map[g];
        match &gate_fn.gates[g.id] {
            AigNode::Literal(v) => {
                if *v {
                    solver.add_clause(&[out_lit]);
                } else {
                    solver.add_clause(&[!out_lit]);
                }
            }
            AigNode::And2 { a, b } => {
                let a_lit = lit_of(&map, a);
                let b_lit = lit_of(&map, b);
                add_tseitsin_and(solver, a_lit, b_lit, out_lit);
            }
            AigNode::Input { .. } => {}
        }
    }

    gate_fn
        .output_operands()
        .iter()
        .map(|op| lit_of(&map, op))
        .collect()
}

/// Checks equivalence of two gate functions with identical signatures.
pub fn prove_gate_fn_equiv(a: &GateFn, b: &GateFn) -> Result<EquivResult, ProveError> {
    if a.input_bit_count() != b.input_bit_count() || a.output_bit_count() != b.output_bit_count()
    {
        return Err(ProveError::SignatureMismatch {
            lhs: a.get_signature(),
            rhs: b.get_signature(),
        });
    }

    let mut solver = varisat::Solver::new();
    let input_lits: Vec<varisat::Lit> = (0..a.input_bit_count())
        .map(|_| solver.new_lit())
        .collect();

    let outputs_a = build_gate_fn(&mut solver, a, &input_lits);
    let outputs_b = build_gate_fn(&mut solver, b, &input_lits);

    let mut miters = Vec::with_capacity(outputs_a.len());
    for (la, lb) in outputs_a.iter().zip(outputs_b.iter()) {
        let m = solver.new_lit();
        add_tseitsin_xor(&mut solver, *la, *lb, m);
        miters.push(m);
    }

    // diff -> OR(miters)
    let diff = solver.new_lit();
    let mut clause = Vec::with_capacity(miters.len() + 1);
    clause.push(!diff);
    clause.extend(miters.iter().cloned());
    solver.add_clause(&clause);

    solver.assume(&[diff]);
    match solver.solve() {
        Ok(false) => Ok(EquivResult::Proved),
        Ok(true) => {
            let model: HashSet<varisat::Lit> =
                solver.model().unwrap_or_default().into_iter().collect();
            let cex = input_lits.iter().map(|lit| model.contains(lit)).collect();
            Ok(EquivResult::Disproved(cex))
        }
        Err(e) => Err(ProveError::SolverError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig_sim::eval_bools;
    use crate::gate_builder::{GateBuilder, GateBuilderOptions};
    use crate::test_utils::{setup_simple_graph, setup_three_layer_graph};

    #[test]
    fn test_self_equivalence() {
        let tg = setup_simple_graph();
        assert_eq!(prove_gate_fn_equiv(&tg.g, &tg.g).unwrap(), EquivResult::Proved);
    }

    #[test]
    fn test_rewritten_graph_is_equivalent() {
        let tg = setup_three_layer_graph();
        let (optimized, stats) = crate::algebraic::optimize_depth(&tg.g);
        assert!(stats.total_rewrites() > 0);
        assert_eq!(
            prove_gate_fn_equiv(&tg.g, &optimized).unwrap(),
            EquivResult::Proved
        );
    }

    #[test]
    fn test_counterexample_distinguishes() {
        let build = |or: bool| {
            let mut gb = GateBuilder::new("f".to_string(), GateBuilderOptions::no_opt());
            let a = *gb.add_input("a".to_string(), 1).get_lsb(0);
            let b = *gb.add_input("b".to_string(), 1).get_lsb(0);
            let o = if or {
                gb.add_and_binary(a.negate(), b.negate()).negate()
            } else {
                gb.add_and_binary(a, b)
            };
            gb.add_output("o".to_string(), o.into());
            gb.build()
        };
        let and_fn = build(false);
        let or_fn = build(true);
        let EquivResult::Disproved(cex) = prove_gate_fn_equiv(&and_fn, &or_fn).unwrap() else {
            panic!("expected a counterexample");
        };
        assert_eq!(cex.len(), 2);
        assert_ne!(eval_bools(&and_fn, &cex), eval_bools(&or_fn, &cex));
    }

    #[test]
    fn test_signature_mismatch_is_error() {
        let tg = setup_simple_graph();
        let tl = setup_three_layer_graph();
        assert!(matches!(
            prove_gate_fn_equiv(&tg.g, &tl.g),
            Err(ProveError::SignatureMismatch { .. })
        ));
    }
}
