// SPDX-License-Identifier: Apache-2.0

//! Fixpoint loop: scan live gates, apply the first rule that matches, refresh
//! levels, and start over until a full scan changes nothing.

use crate::algebraic::{RewriteOptions, RewriteStats, RuleKind};
use crate::network::DepthNetwork;

/// Rewrites `ntk` for depth with the default rule order.
///
/// Only networks that expose level and critical-path queries can be passed
/// here; wrap a plain network in a `DepthView` first.
pub fn aig_algebraic_rewriting<N: DepthNetwork>(ntk: &mut N) -> RewriteStats {
    aig_algebraic_rewriting_with_options(ntk, &RewriteOptions::default())
}

pub fn aig_algebraic_rewriting_with_options<N: DepthNetwork>(
    ntk: &mut N,
    options: &RewriteOptions,
) -> RewriteStats {
    ntk.update_levels();
    let mut stats = RewriteStats {
        initial_depth: ntk.depth(),
        ..RewriteStats::default()
    };
    log::info!(
        "aig_algebraic_rewriting: start; depth {} gates {} rules {:?}",
        stats.initial_depth,
        ntk.gate_refs().len(),
        options.rule_order
    );

    loop {
        stats.scans += 1;
        match scan_once(ntk, &options.rule_order) {
            Some(rule) => {
                stats.record(rule);
                ntk.update_levels();
            }
            None => break,
        }
    }

    stats.final_depth = ntk.depth();
    log::info!(
        "aig_algebraic_rewriting: done; depth {} -> {}; {} rewrites over {} scans",
        stats.initial_depth,
        stats.final_depth,
        stats.total_rewrites(),
        stats.scans
    );
    stats
}

/// Applies at most one rewrite; returns the rule that fired.
fn scan_once<N: DepthNetwork>(ntk: &mut N, rule_order: &[RuleKind]) -> Option<RuleKind> {
    for node in ntk.gate_refs() {
        // Earlier iterations of this scan never mutate, so the enumerated
        // gates are all still live here.
        debug_assert!(!ntk.is_dead(node));
        for &rule in rule_order {
            if rule.try_apply(ntk, node) {
                return Some(rule);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::GateFn;
    use crate::aig_sim::truth_tables;
    use crate::network::{AigNetwork, DepthView};
    use crate::test_utils::{
        setup_associativity_graph, setup_distributivity_graph, setup_three_layer_graph,
    };
    use pretty_assertions::assert_eq;

    fn run(g: &GateFn, options: &RewriteOptions) -> (GateFn, RewriteStats) {
        let mut view = DepthView::new(AigNetwork::from_gate_fn(g));
        let stats = aig_algebraic_rewriting_with_options(&mut view, options);
        (view.into_inner().to_gate_fn(), stats)
    }

    #[test]
    fn test_associativity_fixpoint() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tg = setup_associativity_graph();
        let (result, stats) = run(&tg.g, &RewriteOptions::default());
        assert_eq!(
            stats,
            RewriteStats {
                associativity: 1,
                distributivity: 0,
                three_layer_distributivity: 0,
                scans: 2,
                initial_depth: 4,
                final_depth: 3,
            }
        );
        assert_eq!(truth_tables(&result), truth_tables(&tg.g));
    }

    #[test]
    fn test_distributivity_fixpoint() {
        let tg = setup_distributivity_graph();
        let (result, stats) = run(&tg.g, &RewriteOptions::default());
        assert_eq!(stats.distributivity, 1);
        assert_eq!(stats.total_rewrites(), 1);
        assert_eq!((stats.initial_depth, stats.final_depth), (3, 2));
        assert_eq!(truth_tables(&result), truth_tables(&tg.g));
    }

    #[test]
    fn test_three_layer_fixpoint() {
        let tg = setup_three_layer_graph();
        let (result, stats) = run(&tg.g, &RewriteOptions::default());
        assert_eq!(stats.three_layer_distributivity, 1);
        assert_eq!(stats.total_rewrites(), 1);
        assert_eq!((stats.initial_depth, stats.final_depth), (5, 4));
        assert_eq!(truth_tables(&result), truth_tables(&tg.g));
    }

    #[test]
    fn test_rule_order_subset_disables_rules() {
        let tg = setup_distributivity_graph();
        let options = RewriteOptions {
            rule_order: vec![RuleKind::Associativity, RuleKind::ThreeLayerDistributivity],
        };
        let (_, stats) = run(&tg.g, &options);
        assert_eq!(stats.total_rewrites(), 0);
        assert_eq!(stats.scans, 1);
        assert_eq!(stats.final_depth, 3);
    }

    #[test]
    fn test_second_run_is_noop() {
        let tg = setup_three_layer_graph();
        let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
        let first = aig_algebraic_rewriting(&mut view);
        assert!(first.total_rewrites() > 0);
        let second = aig_algebraic_rewriting(&mut view);
        assert_eq!(second.total_rewrites(), 0);
        assert_eq!(second.scans, 1);
        assert_eq!(second.initial_depth, first.final_depth);
    }
}
