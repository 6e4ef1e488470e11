// SPDX-License-Identifier: Apache-2.0

//! `u & !(v & !(s & w)) -> !(!(u & !v) & !(s & (u & w)))`
//!
//! Applies when the critical chain runs through two inverted references down
//! to `s`, and the chain is at least three levels deeper than `u`. The result
//! moves `s` from four gates below the top to two.

use crate::aig::gate::{AigOperand, AigRef};
use crate::algebraic::{commit_rewrite, split_critical_fanins, RuleKind};
use crate::network::DepthNetwork;

const MIN_LEVEL_GAP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeLayerMatch {
    /// `u`: the non-critical primary fan-in.
    pub non_critical_primary: AigOperand,
    /// `v`: the non-critical secondary fan-in.
    pub non_critical_secondary: AigOperand,
    /// `w`: the non-critical tertiary fan-in.
    pub non_critical_tertiary: AigOperand,
    /// `s`: the critical tertiary fan-in.
    pub critical_tertiary: AigOperand,
}

pub fn match_three_layer_distributivity<N: DepthNetwork>(
    ntk: &N,
    node: AigRef,
) -> Option<ThreeLayerMatch> {
    if !ntk.is_on_critical_path(node) {
        return None;
    }
    let primary = split_critical_fanins(ntk, ntk.fanins(node)?)?;
    if !primary.critical.negated {
        return None;
    }
    let gap = ntk
        .level(primary.critical.node)
        .saturating_sub(ntk.level(primary.non_critical.node));
    if gap < MIN_LEVEL_GAP {
        return None;
    }
    let secondary = split_critical_fanins(ntk, ntk.fanins(primary.critical.node)?)?;
    if !secondary.critical.negated {
        return None;
    }
    let tertiary = split_critical_fanins(ntk, ntk.fanins(secondary.critical.node)?)?;
    Some(ThreeLayerMatch {
        non_critical_primary: primary.non_critical,
        non_critical_secondary: secondary.non_critical,
        non_critical_tertiary: tertiary.non_critical,
        critical_tertiary: tertiary.critical,
    })
}

pub fn try_three_layer_distributivity<N: DepthNetwork>(ntk: &mut N, node: AigRef) -> bool {
    let Some(m) = match_three_layer_distributivity(ntk, node) else {
        return false;
    };
    let u = m.non_critical_primary;
    let uw = ntk.create_and(u, m.non_critical_tertiary);
    let u_not_v = ntk.create_and(u, m.non_critical_secondary.negate());
    let deep = ntk.create_and(m.critical_tertiary, uw);
    let top = ntk.create_and(u_not_v.negate(), deep.negate());
    commit_rewrite(ntk, RuleKind::ThreeLayerDistributivity, node, top.negate());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig_sim::truth_tables;
    use crate::algebraic::associativity::match_associativity;
    use crate::algebraic::distributivity::match_distributivity;
    use crate::network::{AigNetwork, DepthView, Network};
    use crate::test_utils::{append_chain_output, push_and_gate, setup_three_layer_graph};

    #[test]
    fn test_match_three_layers() {
        let tg = setup_three_layer_graph();
        let view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        assert_eq!(view.depth(), 5);
        let m = match_three_layer_distributivity(&view, tg.n.node).unwrap();
        assert_eq!(m.non_critical_primary, tg.u);
        assert_eq!(m.non_critical_secondary, tg.v);
        assert_eq!(m.non_critical_tertiary, tg.w);
        assert_eq!(m.critical_tertiary, tg.s);

        // The other two rules do not apply at the top node.
        assert_eq!(match_associativity(&view, tg.n.node), None);
        assert_eq!(match_distributivity(&view, tg.n.node), None);
    }

    #[test]
    fn test_rewrite_shortens_chain() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tg = setup_three_layer_graph();
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        assert!(try_three_layer_distributivity(&mut view, tg.n.node));
        view.update_levels();
        assert_eq!(view.depth(), 4);
        assert!(view.is_dead(tg.x.node));
        assert!(view.is_dead(tg.y.node));

        let result = view.into_inner().to_gate_fn();
        assert_eq!(truth_tables(&result), truth_tables(&tg.g));
    }

    #[test]
    fn test_rejects_small_level_gap() {
        // Feed u through a two-deep chain so the gap drops to 2.
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        let first = crate::aig::AigRef { id: g.gates.len() };
        g.gates.push(crate::aig::AigNode::And2 {
            a: tg.u,
            b: tg.v.negate(),
        });
        let second = crate::aig::AigRef { id: g.gates.len() };
        g.gates.push(crate::aig::AigNode::And2 {
            a: first.into(),
            b: tg.w.negate(),
        });
        if let crate::aig::AigNode::And2 { a, .. } = &mut g.gates[tg.n.node.id] {
            *a = second.into();
        }
        let view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(view.level(second), 2);
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
    }

    #[test]
    fn test_rejects_uninverted_secondary() {
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        // x = !y & v becomes y & v.
        if let crate::aig::AigNode::And2 { a, .. } = &mut g.gates[tg.x.node.id] {
            *a = a.negate();
        }
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
        assert!(!try_three_layer_distributivity(&mut view, tg.n.node));
    }

    #[test]
    fn test_rejects_node_off_critical_path() {
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        append_chain_output(&mut g, "deep", tg.s, &[tg.v, tg.w, tg.u, tg.v.negate()]);
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(view.depth(), 6);
        assert!(!view.is_on_critical_path(tg.n.node));
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
        let node_count = view.node_count();
        assert!(!try_three_layer_distributivity(&mut view, tg.n.node));
        assert_eq!(view.node_count(), node_count);
    }

    #[test]
    fn test_rejects_both_primaries_critical() {
        // u is replaced by (s & v) & w, as deep as x.
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        let sv = push_and_gate(&mut g, tg.s, tg.v);
        let svw = push_and_gate(&mut g, sv, tg.w);
        if let crate::aig::AigNode::And2 { a, .. } = &mut g.gates[tg.n.node.id] {
            *a = svw;
        }
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(view.level(svw.node), view.level(tg.x.node));
        assert!(view.is_on_critical_path(svw.node));
        assert!(view.is_on_critical_path(tg.x.node));
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
        let node_count = view.node_count();
        assert!(!try_three_layer_distributivity(&mut view, tg.n.node));
        assert_eq!(view.node_count(), node_count);
    }

    #[test]
    fn test_rejects_uninverted_critical_primary() {
        // n = u & !x becomes u & x.
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        if let crate::aig::AigNode::And2 { b, .. } = &mut g.gates[tg.n.node.id] {
            *b = b.negate();
        }
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert!(view.is_on_critical_path(tg.x.node));
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
        let node_count = view.node_count();
        assert!(!try_three_layer_distributivity(&mut view, tg.n.node));
        assert_eq!(view.node_count(), node_count);
    }

    #[test]
    fn test_rejects_both_tertiaries_critical() {
        // y = s & w becomes s & t, with t built from the same level-1 gates as s.
        let tg = setup_three_layer_graph();
        let mut g = tg.g.clone();
        let [not_l, not_r] = g.gates[tg.s.node.id].fanins().unwrap();
        let t = push_and_gate(&mut g, not_l.negate(), not_r);
        if let crate::aig::AigNode::And2 { b, .. } = &mut g.gates[tg.y.node.id] {
            *b = t;
        }
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(view.level(t.node), view.level(tg.s.node));
        assert!(view.is_on_critical_path(t.node));
        assert!(view.is_on_critical_path(tg.s.node));
        assert_eq!(match_three_layer_distributivity(&view, tg.n.node), None);
        let node_count = view.node_count();
        assert!(!try_three_layer_distributivity(&mut view, tg.n.node));
        assert_eq!(view.node_count(), node_count);
    }
}
