// SPDX-License-Identifier: Apache-2.0

//! End-to-end rewriting of small networks through the public API.

use g8r_depth::aig::get_summary_stats::get_summary_stats;
use g8r_depth::aig::{AigNode, GateFn};
use g8r_depth::aig_serdes::{emit_aiger, load_aiger, parse_gate_fn};
use g8r_depth::aig_sim::truth_tables;
use g8r_depth::algebraic::{optimize_depth, optimize_depth_with_options, RewriteOptions, RuleKind};
use g8r_depth::equiv::{prove_gate_fn_equiv, EquivResult};
use g8r_depth::gate_builder::GateBuilderOptions;
use g8r_depth::network::{AigNetwork, DepthNetwork, DepthView, Network};
use g8r_depth::test_utils::{
    setup_and_chain, setup_associativity_graph, setup_distributivity_graph,
    setup_three_layer_graph,
};
use pretty_assertions::assert_eq;

fn assert_same_function(lhs: &GateFn, rhs: &GateFn) {
    assert_eq!(truth_tables(lhs), truth_tables(rhs));
    assert_eq!(prove_gate_fn_equiv(lhs, rhs).unwrap(), EquivResult::Proved);
}

#[test]
fn test_single_and_terminates_after_one_scan() {
    let _ = env_logger::builder().is_test(true).try_init();
    let g = parse_gate_fn(
        "fn single(a: bits[1] = [%1], b: bits[1] = [%2]) -> (o: bits[1] = [%3]) {
  %3 = and(a[0], b[0])
  o[0] = %3
}",
    )
    .unwrap();
    let (result, stats) = optimize_depth(&g);
    assert_eq!(stats.total_rewrites(), 0);
    assert_eq!(stats.scans, 1);
    assert_eq!((stats.initial_depth, stats.final_depth), (1, 1));
    assert_eq!(result.to_string(), g.to_string());
}

#[test]
fn test_two_level_associativity_candidate_is_left_alone() {
    // n = a & (c & d): moving `a` down cannot shorten a two-level path.
    let src = "aag 6 4 0 1 2\n2\n4\n6\n8\n12\n10 6 8\n12 2 10\ni0 a\ni1 b\ni2 c\ni3 d\no0 n\n";
    let g = load_aiger(src, GateBuilderOptions::no_opt()).unwrap().gate_fn;
    let (result, stats) = optimize_depth(&g);
    assert_eq!(stats.total_rewrites(), 0);
    assert_eq!(stats.final_depth, 2);
    assert_same_function(&g, &result);
}

#[test]
fn test_associativity_brings_deep_signal_up() {
    let tg = setup_associativity_graph();
    let (result, stats) = optimize_depth(&tg.g);
    assert_eq!(stats.associativity, 1);
    assert_eq!((stats.initial_depth, stats.final_depth), (4, 3));
    assert_eq!(get_summary_stats(&result).deepest_path, 3);
    assert_same_function(&tg.g, &result);
}

#[test]
fn test_distributivity_factors_shared_signal() {
    let tg = setup_distributivity_graph();
    let (result, stats) = optimize_depth(&tg.g);
    assert_eq!(stats.distributivity, 1);
    assert_eq!(get_summary_stats(&result).deepest_path, 2);
    // !(c & !(!d & !e)): the output is an inverted AND over c.
    let out = result.outputs[0].bit_vector.get_lsb(0);
    assert!(out.negated);
    let AigNode::And2 { a, b } = result.get(out.node) else {
        panic!("output should be an AND gate");
    };
    assert!(a.negated ^ b.negated, "exactly one fan-in is the inverted OR");
    assert_same_function(&tg.g, &result);
}

#[test]
fn test_three_layer_distributivity() {
    let tg = setup_three_layer_graph();
    let (result, stats) = optimize_depth(&tg.g);
    assert_eq!(stats.three_layer_distributivity, 1);
    assert_eq!((stats.initial_depth, stats.final_depth), (5, 4));
    assert_same_function(&tg.g, &result);
}

#[test]
fn test_and_chain_is_rebalanced() {
    let g = setup_and_chain(8);
    let (result, stats) = optimize_depth(&g);
    assert_eq!(stats.initial_depth, 7);
    assert!(stats.associativity > 0);
    assert!(stats.final_depth < 7, "final depth {}", stats.final_depth);
    assert_eq!(get_summary_stats(&result).deepest_path, stats.final_depth);
    assert_same_function(&g, &result);
}

#[test]
fn test_rule_order_only_three_layer() {
    let tg = setup_distributivity_graph();
    let options = RewriteOptions {
        rule_order: vec![RuleKind::ThreeLayerDistributivity],
    };
    let (result, stats) = optimize_depth_with_options(&tg.g, &options);
    assert_eq!(stats.total_rewrites(), 0);
    assert_eq!(get_summary_stats(&result).deepest_path, 3);
}

#[test]
fn test_shared_fanout_keeps_other_output() {
    // The associativity candidate's inner gate also drives a second output.
    let src = "fn f(a: bits[1] = [%1], c: bits[1] = [%2], e: bits[1] = [%3], f: bits[2] = [%4, %5]) -> (n: bits[1] = [%9], x: bits[1] = [not(%8)]) {
  %6 = and(f[0], f[1])
  %7 = and(e[0], %6)
  %8 = and(c[0], %7)
  %9 = and(a[0], %8)
  n[0] = %9
  x[0] = not(%8)
}";
    let g = parse_gate_fn(src).unwrap();
    let (result, stats) = optimize_depth(&g);
    assert!(stats.total_rewrites() > 0);
    assert!(stats.final_depth <= stats.initial_depth);
    assert_same_function(&g, &result);
}

#[test]
fn test_driver_on_network_directly() {
    let tg = setup_three_layer_graph();
    let mut view = DepthView::new(AigNetwork::from_gate_fn(&tg.g));
    let before = view.network().live_gate_count();
    let stats = g8r_depth::algebraic::aig_algebraic_rewriting(&mut view);
    assert_eq!(stats.final_depth, view.depth());
    // n, x and y were retired; four gates replace them.
    assert_eq!(view.network().live_gate_count(), before + 1);
    for node in view.gate_refs() {
        assert!(!view.is_dead(node));
    }
}

#[test]
fn test_aiger_round_trip_after_rewrite() {
    let tg = setup_three_layer_graph();
    let (result, _) = optimize_depth(&tg.g);
    let text = emit_aiger(&result, true).unwrap();
    let reloaded = load_aiger(&text, GateBuilderOptions::no_opt())
        .unwrap()
        .gate_fn;
    assert_same_function(&tg.g, &reloaded);
    assert_eq!(get_summary_stats(&reloaded).deepest_path, 4);
}
