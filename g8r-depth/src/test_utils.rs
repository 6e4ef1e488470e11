// SPDX-License-Identifier: Apache-2.0

//! Small hand-built graphs and helpers shared by unit and integration tests.

use std::collections::HashMap;

use rand::Rng;

use crate::aig::gate::{AigBitVector, AigNode, AigOperand, AigRef, GateFn, Output};
use crate::gate_builder::{GateBuilder, GateBuilderOptions};

pub struct TestGraph {
    pub g: GateFn,
    pub i0: AigOperand,
    pub i1: AigOperand,
    pub i2: AigOperand,
    pub i3: AigOperand,
    pub a: AigOperand,
    pub b: AigOperand,
    pub c: AigOperand,
    pub o: AigOperand,
}

/// Creates a common graph structure for testing cone extraction and levels.
/// Graph:
/// i0 --\
///       AND(a) --\
/// i1 --|          \
///       AND(b) -- AND(o) [output]
/// i2 --|
///       AND(c) [output]
/// i3 --/
pub fn setup_simple_graph() -> TestGraph {
    let mut gb = GateBuilder::new("g".to_string(), GateBuilderOptions::no_opt());
    let i0: AigOperand = gb.add_input("i0".to_string(), 1).try_into().unwrap();
    let i1: AigOperand = gb.add_input("i1".to_string(), 1).try_into().unwrap();
    let i2: AigOperand = gb.add_input("i2".to_string(), 1).try_into().unwrap();
    let i3: AigOperand = gb.add_input("i3".to_string(), 1).try_into().unwrap();

    let a = gb.add_and_binary(i0, i1);
    let b = gb.add_and_binary(i1, i2);
    let c = gb.add_and_binary(i2, i3);

    let o = gb.add_and_binary(a, b);
    gb.add_output("o".to_string(), o.into());
    gb.add_output("c".to_string(), c.into());

    let g = gb.build();
    TestGraph {
        g,
        i0,
        i1,
        i2,
        i3,
        a,
        b,
        c,
        o,
    }
}

pub struct AssociativityGraph {
    pub g: GateFn,
    pub a: AigOperand,
    pub c: AigOperand,
    pub d: AigOperand,
    pub e: AigOperand,
    pub x: AigOperand,
    pub n: AigOperand,
}

/// `n = a & x`, `x = c & d`, `d = e & (f & g)`; depth 4 with the critical
/// path running n -> x -> d -> (f & g). Input `b` is declared but unused.
pub fn setup_associativity_graph() -> AssociativityGraph {
    let mut gb = GateBuilder::new("assoc".to_string(), GateBuilderOptions::no_opt());
    let a: AigOperand = gb.add_input("a".to_string(), 1).try_into().unwrap();
    let _b: AigOperand = gb.add_input("b".to_string(), 1).try_into().unwrap();
    let c: AigOperand = gb.add_input("c".to_string(), 1).try_into().unwrap();
    let e: AigOperand = gb.add_input("e".to_string(), 1).try_into().unwrap();
    let f: AigOperand = gb.add_input("f".to_string(), 1).try_into().unwrap();
    let g_in: AigOperand = gb.add_input("g".to_string(), 1).try_into().unwrap();

    let fg = gb.add_and_binary(f, g_in);
    let d = gb.add_and_binary(e, fg);
    let x = gb.add_and_binary(c, d);
    let n = gb.add_and_binary(a, x);
    gb.add_output("n".to_string(), n.into());

    AssociativityGraph {
        g: gb.build(),
        a,
        c,
        d,
        e,
        x,
        n,
    }
}

pub struct AssociativityNoGainGraph {
    pub g: GateFn,
    pub a: AigOperand,
    pub c: AigOperand,
    pub d: AigOperand,
    pub x: AigOperand,
    pub n: AigOperand,
}

/// `n = a & (c & d)`: the shallow side is only one level above the deep side,
/// so moving it gains nothing.
pub fn setup_associativity_no_gain_graph() -> AssociativityNoGainGraph {
    let mut gb = GateBuilder::new("assoc_no_gain".to_string(), GateBuilderOptions::no_opt());
    let a: AigOperand = gb.add_input("a".to_string(), 1).try_into().unwrap();
    let c: AigOperand = gb.add_input("c".to_string(), 1).try_into().unwrap();
    let d: AigOperand = gb.add_input("d".to_string(), 1).try_into().unwrap();
    let x = gb.add_and_binary(c, d);
    let n = gb.add_and_binary(a, x);
    gb.add_output("n".to_string(), n.into());
    AssociativityNoGainGraph {
        g: gb.build(),
        a,
        c,
        d,
        x,
        n,
    }
}

pub struct SharedDepthGraph {
    pub g: GateFn,
    pub n: AigOperand,
}

/// `n = a & ((c1 & c2) & (c3 & c4))`: both grandchildren are equally deep.
pub fn setup_associativity_shared_depth_graph() -> SharedDepthGraph {
    let mut gb = GateBuilder::new("shared_depth".to_string(), GateBuilderOptions::no_opt());
    let a: AigOperand = gb.add_input("a".to_string(), 1).try_into().unwrap();
    let c = gb.add_input("c".to_string(), 4);
    let p = gb.add_and_binary(*c.get_lsb(0), *c.get_lsb(1));
    let q = gb.add_and_binary(*c.get_lsb(2), *c.get_lsb(3));
    let x = gb.add_and_binary(p, q);
    let n = gb.add_and_binary(a, x);
    gb.add_output("n".to_string(), n.into());
    SharedDepthGraph { g: gb.build(), n }
}

pub struct DistributivityGraph {
    pub g: GateFn,
    pub p: AigOperand,
    pub q: AigOperand,
    pub c: AigOperand,
    pub d: AigOperand,
    pub e: AigOperand,
    pub child0: AigOperand,
    pub child1: AigOperand,
    pub n: AigOperand,
}

/// `n = !(c & d) & !(c & e)` with `c = p & q`, i.e. `!n = c & (d | e)`.
pub fn setup_distributivity_graph() -> DistributivityGraph {
    let mut gb = GateBuilder::new("dist".to_string(), GateBuilderOptions::no_opt());
    let p: AigOperand = gb.add_input("p".to_string(), 1).try_into().unwrap();
    let q: AigOperand = gb.add_input("q".to_string(), 1).try_into().unwrap();
    let d: AigOperand = gb.add_input("d".to_string(), 1).try_into().unwrap();
    let e: AigOperand = gb.add_input("e".to_string(), 1).try_into().unwrap();
    let c = gb.add_and_binary(p, q);
    let child0 = gb.add_and_binary(c, d);
    let child1 = gb.add_and_binary(c, e);
    let n = gb.add_and_binary(child0.negate(), child1.negate());
    gb.add_output("n".to_string(), n.into());
    DistributivityGraph {
        g: gb.build(),
        p,
        q,
        c,
        d,
        e,
        child0,
        child1,
        n,
    }
}

pub struct ThreeLayerGraph {
    pub g: GateFn,
    pub u: AigOperand,
    pub v: AigOperand,
    pub w: AigOperand,
    pub s: AigOperand,
    pub x: AigOperand,
    pub y: AigOperand,
    pub n: AigOperand,
}

/// `n = u & !x`, `x = !y & v`, `y = s & w`, where `s` is a level-2 signal
/// built from `i1..i4`. Depth 5.
pub fn setup_three_layer_graph() -> ThreeLayerGraph {
    let mut gb = GateBuilder::new("three_layer".to_string(), GateBuilderOptions::no_opt());
    let u: AigOperand = gb.add_input("u".to_string(), 1).try_into().unwrap();
    let v: AigOperand = gb.add_input("v".to_string(), 1).try_into().unwrap();
    let w: AigOperand = gb.add_input("w".to_string(), 1).try_into().unwrap();
    let i1: AigOperand = gb.add_input("i1".to_string(), 1).try_into().unwrap();
    let i2: AigOperand = gb.add_input("i2".to_string(), 1).try_into().unwrap();
    let i3: AigOperand = gb.add_input("i3".to_string(), 1).try_into().unwrap();
    let i4: AigOperand = gb.add_input("i4".to_string(), 1).try_into().unwrap();

    let l = gb.add_and_binary(i1, i2);
    let r = gb.add_and_binary(i3, i4);
    let s = gb.add_and_binary(l.negate(), r.negate());
    let y = gb.add_and_binary(s, w);
    let x = gb.add_and_binary(y.negate(), v);
    let n = gb.add_and_binary(u, x.negate());
    gb.add_output("n".to_string(), n.into());

    ThreeLayerGraph {
        g: gb.build(),
        u,
        v,
        w,
        s,
        x,
        y,
        n,
    }
}

/// Left-leaning AND chain `((x0 & x1) & x2) & ...` over an `input_count`-bit
/// input; depth `input_count - 1`.
pub fn setup_and_chain(input_count: usize) -> GateFn {
    assert!(input_count >= 2, "an AND chain needs at least two inputs");
    let mut gb = GateBuilder::new("and_chain".to_string(), GateBuilderOptions::opt());
    let x = gb.add_input("x".to_string(), input_count);
    let bits: Vec<AigOperand> = x.iter_lsb_to_msb().copied().collect();
    let acc = gb.add_and_nary(&bits);
    gb.add_output("o".to_string(), acc.into());
    gb.build()
}

/// Appends the raw gate `a & b` to `g` without folding or hashing.
pub fn push_and_gate(g: &mut GateFn, a: AigOperand, b: AigOperand) -> AigOperand {
    let id = g.gates.len();
    g.gates.push(AigNode::And2 { a, b });
    AigRef { id }.into()
}

/// Appends `((start & rest[0]) & rest[1]) & ...` to `g` and exposes it as a
/// new single-bit output called `name`.
pub fn append_chain_output(
    g: &mut GateFn,
    name: &str,
    start: AigOperand,
    rest: &[AigOperand],
) -> AigOperand {
    let mut acc = start;
    for op in rest {
        acc = push_and_gate(g, acc, *op);
    }
    g.outputs.push(Output {
        name: name.to_string(),
        bit_vector: AigBitVector::from_bit(acc),
    });
    acc
}

/// Builds a random AIG over `input_count` single-bit inputs. Fan-ins are drawn
/// from the most recent nodes half of the time so the graphs grow deep.
pub fn random_gate_fn<R: Rng>(
    rng: &mut R,
    input_count: usize,
    gate_count: usize,
    output_count: usize,
) -> GateFn {
    assert!(input_count >= 2, "need at least two inputs to form gates");
    let mut gb = GateBuilder::new("random".to_string(), GateBuilderOptions::no_opt());
    let mut pool: Vec<AigOperand> = (0..input_count)
        .map(|i| *gb.add_input(format!("i{}", i), 1).get_lsb(0))
        .collect();

    let pick = |rng: &mut R, pool: &[AigOperand]| -> usize {
        const RECENT: usize = 4;
        if pool.len() > RECENT && rng.gen_bool(0.5) {
            rng.gen_range(pool.len() - RECENT..pool.len())
        } else {
            rng.gen_range(0..pool.len())
        }
    };

    for _ in 0..gate_count {
        let lhs = pick(rng, &pool);
        let mut rhs = pick(rng, &pool);
        while rhs == lhs {
            rhs = rng.gen_range(0..pool.len());
        }
        let a = pool[lhs].with_negation(rng.gen_bool(0.5));
        let b = pool[rhs].with_negation(rng.gen_bool(0.5));
        let gate = gb.add_and_binary(a, b);
        pool.push(gate);
    }

    for i in 0..output_count {
        let index = if i == 0 {
            pool.len() - 1
        } else {
            rng.gen_range(input_count.min(pool.len() - 1)..pool.len())
        };
        let op = pool[index].with_negation(rng.gen_bool(0.5));
        gb.add_output(format!("o{}", i), op.into());
    }
    gb.build()
}

/// Returns true if the output cones of `lhs` and `rhs` have the same shape,
/// matching inputs by flattened position and allowing commuted AND fan-ins.
/// Node numbering, names, and dead gates are ignored.
pub fn structurally_equivalent(lhs: &GateFn, rhs: &GateFn) -> bool {
    if lhs.input_bit_count() != rhs.input_bit_count()
        || lhs.output_bit_count() != rhs.output_bit_count()
    {
        return false;
    }
    let lhs_inputs: HashMap<AigRef, usize> = lhs
        .input_refs()
        .into_iter()
        .enumerate()
        .map(|(i, r)| (r, i))
        .collect();
    let rhs_inputs: HashMap<AigRef, usize> = rhs
        .input_refs()
        .into_iter()
        .enumerate()
        .map(|(i, r)| (r, i))
        .collect();

    struct Matcher<'a> {
        lhs: &'a GateFn,
        rhs: &'a GateFn,
        lhs_inputs: HashMap<AigRef, usize>,
        rhs_inputs: HashMap<AigRef, usize>,
        memo: HashMap<(AigRef, AigRef), bool>,
    }

    impl Matcher<'_> {
        fn operands(&mut self, l: AigOperand, r: AigOperand) -> bool {
            l.negated == r.negated && self.nodes(l.node, r.node)
        }

        fn nodes(&mut self, l: AigRef, r: AigRef) -> bool {
            if let Some(result) = self.memo.get(&(l, r)) {
                return *result;
            }
            let result = match (self.lhs.get(l), self.rhs.get(r)) {
                (AigNode::Literal(x), AigNode::Literal(y)) => x == y,
                (AigNode::Input { .. }, AigNode::Input { .. }) => {
                    self.lhs_inputs.get(&l).is_some()
                        && self.lhs_inputs.get(&l) == self.rhs_inputs.get(&r)
                }
                (AigNode::And2 { a: la, b: lb }, AigNode::And2 { a: ra, b: rb }) => {
                    let (la, lb, ra, rb) = (*la, *lb, *ra, *rb);
                    (self.operands(la, ra) && self.operands(lb, rb))
                        || (self.operands(la, rb) && self.operands(lb, ra))
                }
                _ => false,
            };
            self.memo.insert((l, r), result);
            result
        }
    }

    let mut matcher = Matcher {
        lhs,
        rhs,
        lhs_inputs,
        rhs_inputs,
        memo: HashMap::new(),
    };
    lhs.output_operands()
        .into_iter()
        .zip(rhs.output_operands())
        .all(|(l, r)| matcher.operands(l, r))
}
