// SPDX-License-Identifier: Apache-2.0

//! `a & (c & d) -> (a & c) & d` where `(c & d)` is the critical fan-in, used
//! un-inverted, and `d` is its only critical fan-in.

use crate::aig::gate::{AigOperand, AigRef};
use crate::algebraic::{commit_rewrite, split_critical_fanins, RuleKind};
use crate::network::DepthNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociativityMatch {
    pub non_critical_primary: AigOperand,
    pub non_critical_secondary: AigOperand,
    pub critical_secondary: AigOperand,
}

pub fn match_associativity<N: DepthNetwork>(ntk: &N, node: AigRef) -> Option<AssociativityMatch> {
    if !ntk.is_on_critical_path(node) {
        return None;
    }
    let primary = split_critical_fanins(ntk, ntk.fanins(node)?)?;
    if primary.critical.negated {
        return None;
    }
    // The shallow side must be at least two levels above the deep one or
    // nothing is gained.
    if ntk.level(primary.non_critical.node) + 1 >= ntk.level(primary.critical.node) {
        return None;
    }
    let secondary = split_critical_fanins(ntk, ntk.fanins(primary.critical.node)?)?;
    Some(AssociativityMatch {
        non_critical_primary: primary.non_critical,
        non_critical_secondary: secondary.non_critical,
        critical_secondary: secondary.critical,
    })
}

pub fn try_associativity<N: DepthNetwork>(ntk: &mut N, node: AigRef) -> bool {
    let Some(m) = match_associativity(ntk, node) else {
        return false;
    };
    let shallow = ntk.create_and(m.non_critical_primary, m.non_critical_secondary);
    let top = ntk.create_and(shallow, m.critical_secondary);
    commit_rewrite(ntk, RuleKind::Associativity, node, top);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig_sim::truth_tables;
    use crate::network::{AigNetwork, DepthView, Network};
    use crate::test_utils::{
        setup_associativity_graph, setup_associativity_no_gain_graph,
        setup_associativity_shared_depth_graph,
    };

    #[test]
    fn test_match_at_top() {
        let tg = setup_associativity_graph();
        let view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        assert_eq!(view.depth(), 4);
        let m = match_associativity(&view, tg.n.node).unwrap();
        assert_eq!(m.non_critical_primary, tg.a);
        assert_eq!(m.non_critical_secondary, tg.c);
        assert_eq!(m.critical_secondary, tg.d);
    }

    #[test]
    fn test_rewrite_shortens_path_and_keeps_function() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tg = setup_associativity_graph();
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        assert!(try_associativity(&mut view, tg.n.node));
        assert!(view.is_dead(tg.n.node));
        view.update_levels();
        assert_eq!(view.depth(), 3);

        // The deep signal is now a direct fan-in of the output gate.
        let out = view.output_operands()[0];
        let fanins = view.fanins(out.node).unwrap();
        assert!(fanins.contains(&tg.d));

        let result = view.into_inner().to_gate_fn();
        assert_eq!(truth_tables(&result), truth_tables(&tg.g));
    }

    #[test]
    fn test_rejects_when_levels_are_close() {
        // n = a & (c & d) with all of a, c, d primary inputs.
        let tg = setup_associativity_no_gain_graph();
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        assert_eq!(match_associativity(&view, tg.n.node), None);
        assert!(!try_associativity(&mut view, tg.n.node));
        assert!(!view.is_dead(tg.n.node));
    }

    #[test]
    fn test_rejects_when_both_secondaries_critical() {
        let tg = setup_associativity_shared_depth_graph();
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        let node_count = view.node_count();
        assert!(!try_associativity(&mut view, tg.n.node));
        assert_eq!(view.node_count(), node_count);
    }

    #[test]
    fn test_rejects_inverted_critical_primary() {
        let tg = setup_associativity_graph();
        // Same shape but the output gate consumes !x.
        let mut g = tg.g.clone();
        if let crate::aig::AigNode::And2 { b, .. } = &mut g.gates[tg.n.node.id] {
            *b = b.negate();
        }
        let view = DepthView::new(AigNetwork::from_gate_fn(&g));
        assert_eq!(match_associativity(&view, tg.n.node), None);
    }

    #[test]
    fn test_rejects_non_critical_node() {
        let tg = setup_associativity_graph();
        let view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        // The e-side of d is off the critical path.
        assert!(!view.is_on_critical_path(tg.e.node));
        assert_eq!(match_associativity(&view, tg.e.node), None);
    }
}
