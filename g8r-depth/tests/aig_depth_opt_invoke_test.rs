// SPDX-License-Identifier: Apache-2.0

//! Tests that invoke the `aig-depth-opt` binary.

use std::process::Command;

use g8r_depth::aig_serdes::load_aiger;
use g8r_depth::aig_sim::truth_tables;
use g8r_depth::gate_builder::GateBuilderOptions;
use g8r_depth::test_utils::setup_three_layer_graph;

#[test]
fn test_invoke_rewrites_and_reports_json() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tg = setup_three_layer_graph();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("three_layer.g8r");
    let output = dir.path().join("three_layer_opt.aag");
    std::fs::write(&input, tg.g.to_string()).unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_aig-depth-opt"))
        .arg("--quiet")
        .arg("--output")
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&result.stdout),
        String::from_utf8_lossy(&result.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["before"]["deepest_path"], 5);
    assert_eq!(report["after"]["deepest_path"], 4);
    assert_eq!(report["rewrites"]["three_layer_distributivity"], 1);
    assert_eq!(report["rewrites"]["scans"], 2);
    assert_eq!(report["equivalent"], true);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("aag "));
    let written = load_aiger(&text, GateBuilderOptions::no_opt()).unwrap().gate_fn;
    assert_eq!(truth_tables(&written), truth_tables(&tg.g));
}

#[test]
fn test_invoke_aiger_input_without_equivalence_check() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("chain.aag");
    // o = ((x0 & x1) & x2) & x3
    std::fs::write(
        &input,
        "aag 7 4 0 1 3\n2\n4\n6\n8\n14\n10 2 4\n12 10 6\n14 12 8\n",
    )
    .unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_aig-depth-opt"))
        .arg("--quiet")
        .arg("--check-equivalence=false")
        .arg(&input)
        .output()
        .unwrap();
    assert!(result.status.success());
    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["before"]["deepest_path"], 3);
    assert_eq!(report["after"]["deepest_path"], 2);
    assert_eq!(report["rewrites"]["associativity"], 1);
    assert!(report["equivalent"].is_null());
}

#[test]
fn test_invoke_rejects_unknown_rule() {
    let tg = setup_three_layer_graph();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("three_layer.g8r");
    std::fs::write(&input, tg.g.to_string()).unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_aig-depth-opt"))
        .arg("--rule-order=associativity,balance")
        .arg(&input)
        .output()
        .unwrap();
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("invalid --rule-order"), "stderr: {}", stderr);
}
