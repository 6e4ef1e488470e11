// SPDX-License-Identifier: Apache-2.0

//! Parser for the textual `GateFn` form produced by its `Display` impl:
//!
//! ```text
//! fn f(a: bits[2] = [%1, %2]) -> (o: bits[1] = [not(%3)]) {
//!   %3 = and(a[0], not(a[1]))
//!   o[0] = not(%3)
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::aig::gate::{AigBitVector, AigNode, AigOperand, AigRef, GateFn, Input, Output};

#[derive(Debug)]
pub struct ParseError {
    msg: String,
}

impl ParseError {
    fn new(msg: String) -> Self {
        Self { msg }
    }

    fn new_with_pos(msg: String, input: &str, pos: usize) -> Self {
        let mut line = 1usize;
        let mut col = 1usize;
        for ch in input[..pos].chars() {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        Self {
            msg: format!("{} at line {}, column {}", msg, line, col),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseError: {}", self.msg)
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    input_lookup: HashMap<(String, usize), usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            input_lookup: HashMap::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn drop_ws(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn try_drop(&mut self, tok: &str) -> bool {
        self.drop_ws();
        if self.rest().starts_with(tok) {
            self.pos += tok.len();
            true
        } else {
            false
        }
    }

    fn err(&self, msg: &str) -> ParseError {
        ParseError::new_with_pos(msg.to_string(), self.input, self.pos)
    }

    fn drop_or_error(&mut self, tok: &str) -> Result<(), ParseError> {
        if self.try_drop(tok) {
            return Ok(());
        }
        let got: String = self.rest().chars().take(tok.chars().count()).collect();
        Err(self.err(&format!("expected '{}' got '{}...'", tok, got)))
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        self.drop_ws();
        let mut result = String::new();
        match self.rest().chars().next() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                result.push(c);
                self.pos += c.len_utf8();
            }
            Some(c) => {
                return Err(self.err(&format!("expected identifier start, got '{}'", c)));
            }
            None => return Err(self.err("unexpected eof")),
        }
        while let Some(c) = self.rest().chars().next() {
            if c.is_alphanumeric() || c == '_' {
                result.push(c);
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        Ok(result)
    }

    fn parse_usize(&mut self) -> Result<usize, ParseError> {
        self.drop_ws();
        let rest = self.rest();
        let len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if len == 0 {
            return Err(self.err("expected number"));
        }
        let num: usize = rest[..len]
            .parse()
            .map_err(|e| self.err(&format!("invalid number: {}", e)))?;
        self.pos += len;
        Ok(num)
    }

    fn parse_operand(&mut self) -> Result<AigOperand, ParseError> {
        let negated = self.try_drop("not(");
        let id = if self.try_drop("%") {
            self.parse_usize()?
        } else {
            let name = self.parse_identifier()?;
            self.drop_or_error("[")?;
            let idx = self.parse_usize()?;
            self.drop_or_error("]")?;
            match self.input_lookup.get(&(name.clone(), idx)) {
                Some(id) => *id,
                None => {
                    return Err(self.err(&format!("unknown input reference {}[{}]", name, idx)))
                }
            }
        };
        if negated {
            self.drop_or_error(")")?;
        }
        Ok(AigOperand {
            node: AigRef { id },
            negated,
        })
    }

    fn parse_bit_vector(&mut self) -> Result<AigBitVector, ParseError> {
        self.drop_or_error("[")?;
        let mut ops = Vec::new();
        if !self.try_drop("]") {
            loop {
                ops.push(self.parse_operand()?);
                if self.try_drop("]") {
                    break;
                }
                self.drop_or_error(",")?;
            }
        }
        Ok(AigBitVector::from_lsb_is_index_0(&ops))
    }

    fn parse_io_list(&mut self) -> Result<Vec<(String, AigBitVector)>, ParseError> {
        self.drop_or_error("(")?;
        let mut entries = Vec::new();
        if self.try_drop(")") {
            return Ok(entries);
        }
        loop {
            let name = self.parse_identifier()?;
            self.drop_or_error(":")?;
            self.drop_or_error("bits[")?;
            let width = self.parse_usize()?;
            self.drop_or_error("]")?;
            self.drop_or_error("=")?;
            let bv = self.parse_bit_vector()?;
            if bv.get_bit_count() != width {
                return Err(self.err(&format!(
                    "`{}` declares {} bits but lists {}",
                    name,
                    width,
                    bv.get_bit_count()
                )));
            }
            entries.push((name, bv));
            if self.try_drop(")") {
                break;
            }
            self.drop_or_error(",")?;
        }
        Ok(entries)
    }

    fn at_eof(&mut self) -> bool {
        self.drop_ws();
        self.pos >= self.input.len()
    }
}

/// Parses the textual form of a `GateFn`.
///
/// Node ids that are never defined (dead nodes the printer skipped) are filled
/// with constant-false placeholders; referencing such an id is an error.
pub fn parse_gate_fn(text: &str) -> Result<GateFn, ParseError> {
    let mut p = Parser::new(text);
    p.drop_or_error("fn")?;
    let name = p.parse_identifier()?;
    let input_pairs = p.parse_io_list()?;
    p.drop_or_error("->")?;
    let output_pairs = p.parse_io_list()?;
    p.drop_or_error("{")?;

    let mut nodes: BTreeMap<usize, AigNode> = BTreeMap::new();
    nodes.insert(0, AigNode::Literal(false));

    let mut inputs = Vec::with_capacity(input_pairs.len());
    for (input_name, bv) in input_pairs {
        for (i, op) in bv.iter_lsb_to_msb().enumerate() {
            if op.negated || op.node.id == 0 {
                return Err(ParseError::new(format!(
                    "input `{}` bit {} must be a plain non-constant node",
                    input_name, i
                )));
            }
            nodes.insert(
                op.node.id,
                AigNode::Input {
                    name: input_name.clone(),
                    lsb_index: i,
                },
            );
            p.input_lookup.insert((input_name.clone(), i), op.node.id);
        }
        inputs.push(Input {
            name: input_name,
            bit_vector: bv,
        });
    }

    let mut closed = false;
    while !p.at_eof() {
        if p.try_drop("}") {
            closed = true;
            break;
        }
        if p.try_drop("%") {
            let id = p.parse_usize()?;
            p.drop_or_error("=")?;
            let node = if p.try_drop("and(") {
                let a = p.parse_operand()?;
                p.drop_or_error(",")?;
                let b = p.parse_operand()?;
                p.drop_or_error(")")?;
                AigNode::And2 { a, b }
            } else if p.try_drop("literal(") {
                let value = if p.try_drop("true") {
                    true
                } else if p.try_drop("false") {
                    false
                } else {
                    p.parse_usize()? != 0
                };
                p.drop_or_error(")")?;
                AigNode::Literal(value)
            } else {
                return Err(p.err("unknown node kind"));
            };
            if id == 0 && !matches!(node, AigNode::Literal(false)) {
                return Err(p.err("node %0 is reserved for literal(false)"));
            }
            nodes.insert(id, node);
        } else {
            // Output bit assignments restate the header; skip them.
            p.parse_identifier()?;
            p.drop_or_error("[")?;
            p.parse_usize()?;
            p.drop_or_error("]")?;
            p.drop_or_error("=")?;
            p.parse_operand()?;
        }
    }
    if !closed {
        return Err(p.err("expected '}' before end of input"));
    }

    let outputs: Vec<Output> = output_pairs
        .into_iter()
        .map(|(name, bit_vector)| Output { name, bit_vector })
        .collect();

    let check_defined = |op: &AigOperand, context: &str| -> Result<(), ParseError> {
        if nodes.contains_key(&op.node.id) {
            Ok(())
        } else {
            Err(ParseError::new(format!(
                "{} references undefined node %{}",
                context, op.node.id
            )))
        }
    };
    for (id, node) in &nodes {
        if let AigNode::And2 { a, b } = node {
            check_defined(a, &format!("%{}", id))?;
            check_defined(b, &format!("%{}", id))?;
        }
    }
    for output in &outputs {
        for op in output.bit_vector.iter_lsb_to_msb() {
            check_defined(op, &format!("output `{}`", output.name))?;
        }
    }

    let max_id = nodes.keys().next_back().copied().unwrap_or(0);
    let gates: Vec<AigNode> = (0..=max_id)
        .map(|id| nodes.remove(&id).unwrap_or(AigNode::Literal(false)))
        .collect();

    let gate_fn = GateFn {
        name,
        inputs,
        outputs,
        gates,
    };
    if let Some(cycle) = crate::aig::topo::topo_order_and_cycle_check(&gate_fn.gates).1 {
        return Err(ParseError::new(format!(
            "combinational cycle through nodes {:?}",
            cycle
        )));
    }
    Ok(gate_fn)
}

impl std::str::FromStr for GateFn {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_gate_fn(text)
    }
}
