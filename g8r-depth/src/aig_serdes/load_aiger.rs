// SPDX-License-Identifier: Apache-2.0

//! Loads an ASCII AIGER ("aag") file into a `GateFn`.
//!
//! Only purely combinational files (L == 0) are accepted. AND definitions must
//! appear after the definitions of the variables they read. Symbol-table names
//! of the form `base_0, base_1, ...` on consecutive inputs (or outputs) are
//! regrouped into one multi-bit `base` input (or output), which is the shape
//! `emit_aiger` writes.

use std::collections::HashMap;

use crate::aig::gate::{AigBitVector, AigOperand, GateFn};
use crate::gate_builder::{GateBuilder, GateBuilderOptions};

/// Resulting `GateFn` together with the mapping from AIGER variable index to
/// operand (useful for diagnostics).
#[derive(Debug)]
pub struct LoadAigerResult {
    pub gate_fn: GateFn,
    pub var_to_operand: HashMap<u32, AigOperand>,
}

struct AndLine {
    lhs_var: u32,
    rhs0_lit: u32,
    rhs1_lit: u32,
}

fn next_non_empty_line<'a>(iter: &mut std::str::Lines<'a>) -> Option<&'a str> {
    iter.by_ref().find(|line| !line.trim().is_empty())
}

fn parse_literal(line: &str, what: &str) -> Result<u32, String> {
    line.trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid {} literal '{}': {}", what, line, e))
}

/// Splits a trailing `_<digits>` suffix off `name`.
fn split_base_bit(name: &str) -> Option<(&str, usize)> {
    let pos = name.rfind('_')?;
    if pos == 0 || pos == name.len() - 1 {
        return None;
    }
    let idx = name[pos + 1..].parse::<usize>().ok()?;
    Some((&name[..pos], idx))
}

/// Groups consecutive `base_0..base_{n-1}` names (n >= 2) into `(base, n)`;
/// every other name becomes a single-bit group.
fn group_bit_names(names: &[String]) -> Vec<(String, usize)> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < names.len() {
        let mut width = 1;
        if let Some((base, 0)) = split_base_bit(&names[i]) {
            while i + width < names.len()
                && split_base_bit(&names[i + width]) == Some((base, width))
            {
                width += 1;
            }
            if width >= 2 {
                groups.push((base.to_string(), width));
                i += width;
                continue;
            }
            width = 1;
        }
        groups.push((names[i].clone(), width));
        i += 1;
    }
    groups
}

/// Parses ASCII-AIGER text and builds a `GateFn` with the supplied
/// `GateBuilderOptions`.
pub fn load_aiger(src: &str, opts: GateBuilderOptions) -> Result<LoadAigerResult, String> {
    let mut lines = src.lines();

    let header_line = next_non_empty_line(&mut lines).ok_or("empty AIGER input")?;
    let header_tokens: Vec<&str> = header_line.split_whitespace().collect();
    if header_tokens.len() != 6 {
        return Err(format!(
            "expected 6 tokens in AIGER header, got {} (\"{}\")",
            header_tokens.len(),
            header_line
        ));
    }
    if header_tokens[0] != "aag" {
        return Err(format!(
            "only ASCII-AIGER (aag) is supported; got '{}'",
            header_tokens[0]
        ));
    }
    let parse_u32 = |s: &str, field: &str| -> Result<u32, String> {
        s.parse::<u32>()
            .map_err(|e| format!("invalid {} value '{}': {}", field, s, e))
    };
    let m = parse_u32(header_tokens[1], "M")?;
    let i = parse_u32(header_tokens[2], "I")?;
    let l = parse_u32(header_tokens[3], "L")?;
    let o = parse_u32(header_tokens[4], "O")?;
    let a = parse_u32(header_tokens[5], "A")?;
    if l != 0 {
        return Err(format!(
            "latch count (L) must be zero for a combinational AIG; got {}",
            l
        ));
    }

    let mut input_vars: Vec<u32> = Vec::with_capacity(i as usize);
    for _ in 0..i {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} input lines but found fewer", i))?;
        let lit = parse_literal(line, "input")?;
        if lit & 1 != 0 {
            return Err(format!(
                "input literal must be positive, got negated literal {}",
                lit
            ));
        }
        let var = lit >> 1;
        if var == 0 || var > m {
            return Err(format!("input literal {} is out of range (M = {})", lit, m));
        }
        if input_vars.contains(&var) {
            return Err(format!("duplicate input variable index {}", var));
        }
        input_vars.push(var);
    }

    let mut output_literals: Vec<u32> = Vec::with_capacity(o as usize);
    for _ in 0..o {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} output lines but found fewer", o))?;
        output_literals.push(parse_literal(line, "output")?);
    }

    let mut and_lines: Vec<AndLine> = Vec::with_capacity(a as usize);
    for _ in 0..a {
        let line = next_non_empty_line(&mut lines)
            .ok_or_else(|| format!("expected {} AND lines but found fewer", a))?;
        let toks: Vec<&str> = line.split_whitespace().collect();
        if toks.len() != 3 {
            return Err(format!("AND line should have 3 fields, got '{}'", line));
        }
        let lhs = parse_literal(toks[0], "AND lhs")?;
        if lhs & 1 != 0 {
            return Err(format!("AND lhs literal {} must be positive (even)", lhs));
        }
        if lhs >> 1 == 0 || lhs >> 1 > m {
            return Err(format!("AND lhs literal {} is out of range (M = {})", lhs, m));
        }
        and_lines.push(AndLine {
            lhs_var: lhs >> 1,
            rhs0_lit: parse_literal(toks[1], "AND rhs")?,
            rhs1_lit: parse_literal(toks[2], "AND rhs")?,
        });
    }

    let mut input_names: Vec<String> = (0..i).map(|idx| format!("i{}", idx)).collect();
    let mut output_names: Vec<String> = (0..o).map(|idx| format!("o{}", idx)).collect();
    for line in lines {
        if line.starts_with('c') {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let (names, rest) = if let Some(rest) = line.strip_prefix('i') {
            (&mut input_names, rest)
        } else if let Some(rest) = line.strip_prefix('o') {
            (&mut output_names, rest)
        } else {
            // Latch and justice symbols have no counterpart here.
            continue;
        };
        let (idx_str, name) = rest
            .split_once(' ')
            .ok_or_else(|| format!("malformed symbol '{}'", line))?;
        let idx: usize = idx_str
            .parse()
            .map_err(|e| format!("invalid symbol index in '{}': {}", line, e))?;
        let slot = names
            .get_mut(idx)
            .ok_or_else(|| format!("symbol index out of range in '{}'", line))?;
        *slot = name.to_string();
    }

    let mut gb = GateBuilder::new("loaded_aiger".to_string(), opts);
    let mut var_to_operand: HashMap<u32, AigOperand> = HashMap::new();
    var_to_operand.insert(0, gb.get_false());

    let mut next_input = 0usize;
    for (name, width) in group_bit_names(&input_names) {
        let bv = gb.add_input(name, width);
        for op in bv.iter_lsb_to_msb() {
            var_to_operand.insert(input_vars[next_input], *op);
            next_input += 1;
        }
    }

    let lit_to_operand =
        |lit: u32, var_map: &HashMap<u32, AigOperand>| -> Result<AigOperand, String> {
            let var = lit >> 1;
            let base = var_map.get(&var).copied().ok_or_else(|| {
                format!("referenced undefined variable {} (literal {})", var, lit)
            })?;
            Ok(base.with_negation(lit & 1 == 1))
        };

    for al in &and_lines {
        let rhs0 = lit_to_operand(al.rhs0_lit, &var_to_operand)?;
        let rhs1 = lit_to_operand(al.rhs1_lit, &var_to_operand)?;
        if var_to_operand.contains_key(&al.lhs_var) {
            return Err(format!("variable {} already defined", al.lhs_var));
        }
        let and_op = gb.add_and_binary(rhs0, rhs1);
        var_to_operand.insert(al.lhs_var, and_op);
    }

    let mut next_output = 0usize;
    for (name, width) in group_bit_names(&output_names) {
        let mut bits = Vec::with_capacity(width);
        for lit in &output_literals[next_output..next_output + width] {
            bits.push(lit_to_operand(*lit, &var_to_operand)?);
        }
        next_output += width;
        gb.add_output(name, AigBitVector::from_lsb_is_index_0(&bits));
    }

    Ok(LoadAigerResult {
        gate_fn: gb.build(),
        var_to_operand,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig_serdes::emit_aiger::emit_aiger;
    use crate::aig_sim::truth_tables;
    use crate::test_utils::{setup_simple_graph, setup_three_layer_graph, structurally_equivalent};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aiger_roundtrip_simple_and() {
        let mut gb = GateBuilder::new("rt_and".to_string(), GateBuilderOptions::no_opt());
        let a = gb.add_input("a".to_string(), 1).try_into().unwrap();
        let b = gb.add_input("b".to_string(), 1).try_into().unwrap();
        let o = gb.add_and_binary(a, b);
        gb.add_output("o".to_string(), o.into());
        let orig = gb.build();

        let aiger = emit_aiger(&orig, true).unwrap();
        let loaded = load_aiger(&aiger, GateBuilderOptions::no_opt()).unwrap();
        assert!(structurally_equivalent(&orig, &loaded.gate_fn));
        assert_eq!(loaded.gate_fn.inputs[1].name, "b");
    }

    #[test]
    fn test_aiger_roundtrip_fixtures() {
        for g in [setup_simple_graph().g, setup_three_layer_graph().g] {
            let aiger = emit_aiger(&g, true).unwrap();
            let loaded = load_aiger(&aiger, GateBuilderOptions::no_opt()).unwrap();
            assert!(structurally_equivalent(&g, &loaded.gate_fn));
            assert_eq!(truth_tables(&g), truth_tables(&loaded.gate_fn));
        }
    }

    #[test]
    fn test_multi_bit_symbols_regroup() {
        let mut gb = GateBuilder::new("bus".to_string(), GateBuilderOptions::no_opt());
        let x = gb.add_input("x".to_string(), 3);
        let y = gb.add_and_binary(*x.get_lsb(0), x.get_lsb(2).negate());
        gb.add_output(
            "y".to_string(),
            AigBitVector::from_lsb_is_index_0(&[y, x.get_lsb(1).negate()]),
        );
        let orig = gb.build();

        let loaded = load_aiger(&emit_aiger(&orig, true).unwrap(), GateBuilderOptions::no_opt())
            .unwrap()
            .gate_fn;
        assert_eq!(loaded.get_signature(), "fn loaded_aiger(x: bits[3]) -> bits[2]");
        assert!(structurally_equivalent(&orig, &loaded));
    }

    #[test]
    fn test_constant_outputs_without_symbols() {
        let src = "aag 1 1 0 3 0\n2\n0\n1\n3\n";
        let loaded = load_aiger(src, GateBuilderOptions::no_opt()).unwrap();
        let g = loaded.gate_fn;
        assert_eq!(g.inputs[0].name, "i0");
        let names: Vec<&str> = g.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["o0", "o1", "o2"]);
        assert_eq!(truth_tables(&g), vec![vec![0b00], vec![0b11], vec![0b01]]);
    }

    #[test]
    fn test_rejects_latches() {
        let err = load_aiger("aag 1 0 1 0 0\n2 3\n", GateBuilderOptions::no_opt()).unwrap_err();
        assert!(err.contains("latch"), "{}", err);
    }

    #[test]
    fn test_rejects_forward_reference() {
        let src = "aag 3 1 0 1 2\n2\n6\n6 4 2\n4 2 2\n";
        let err = load_aiger(src, GateBuilderOptions::no_opt()).unwrap_err();
        assert!(err.contains("undefined variable 2"), "{}", err);
    }

    #[test]
    fn test_group_bit_names() {
        let names: Vec<String> = ["a_0", "a_1", "b_1", "c", "d_0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            group_bit_names(&names),
            vec![
                ("a".to_string(), 2),
                ("b_1".to_string(), 1),
                ("c".to_string(), 1),
                ("d_0".to_string(), 1),
            ]
        );
    }
}
