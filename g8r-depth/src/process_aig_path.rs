// SPDX-License-Identifier: Apache-2.0

//! Load / rewrite / verify / write pipeline behind the `aig-depth-opt` binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;

use crate::aig::get_summary_stats::{get_gate_depth, get_summary_stats, SummaryStats};
use crate::aig::GateFn;
use crate::aig_serdes::{emit_aiger, load_aiger, parse_gate_fn};
use crate::algebraic::{optimize_depth_with_options, RewriteOptions, RewriteStats};
use crate::equiv::{prove_gate_fn_equiv, EquivResult};
use crate::gate_builder::GateBuilderOptions;
use crate::use_count::get_id_to_use_count;

pub struct Options {
    pub check_equivalence: bool,
    pub rewrite: RewriteOptions,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    pub before: SummaryStats,
    pub after: SummaryStats,
    pub rewrites: RewriteStats,
    /// `None` when the check was not requested.
    pub equivalent: Option<bool>,
}

fn is_aiger_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "aag")
}

/// Reads a network from `path`: ASCII AIGER for `.aag` files (or text that
/// starts with an `aag` header), the `GateFn` text form otherwise.
pub fn load_gate_fn(path: &Path) -> anyhow::Result<GateFn> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_aiger_path(path) || text.trim_start().starts_with("aag ") {
        let loaded = load_aiger(&text, GateBuilderOptions::no_opt())
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        Ok(loaded.gate_fn)
    } else {
        parse_gate_fn(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Writes `gate_fn` in the format selected by the extension of `path`.
pub fn write_gate_fn(gate_fn: &GateFn, path: &Path) -> anyhow::Result<()> {
    let text = if is_aiger_path(path) {
        emit_aiger(gate_fn, true).map_err(|e| anyhow::anyhow!(e))?
    } else {
        format!("{}\n", gate_fn)
    };
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn print_depth_histogram(gate_fn: &GateFn) {
    let live_nodes: Vec<_> = get_id_to_use_count(gate_fn).into_keys().collect();
    let depth_stats = get_gate_depth(gate_fn, &live_nodes);
    let sorted: BTreeMap<usize, usize> = depth_stats.depth_to_count.into_iter().collect();
    let max_count = sorted.values().copied().max().unwrap_or(1);
    let max_bar_width = 50;
    println!("== Level histogram:");
    for (depth, count) in sorted {
        let bar_length =
            ((count as f64) / (max_count as f64) * max_bar_width as f64).round() as usize;
        println!("  {:4} | {:<50} | {:4}", depth, "█".repeat(bar_length), count);
    }
}

pub fn process_aig_path(input: &Path, options: &Options) -> anyhow::Result<Report> {
    let gate_fn = load_gate_fn(input)?;
    log::info!("loaded {}: {}", input.display(), gate_fn.get_signature());

    let before = get_summary_stats(&gate_fn);
    if !options.quiet {
        println!("== Before rewriting: depth {}", before.deepest_path);
        print_depth_histogram(&gate_fn);
    }

    let start = std::time::Instant::now();
    let (optimized, rewrites) = optimize_depth_with_options(&gate_fn, &options.rewrite);
    log::info!(
        "rewriting took {:?}; {} rewrites over {} scans",
        start.elapsed(),
        rewrites.total_rewrites(),
        rewrites.scans
    );

    let after = get_summary_stats(&optimized);
    if !options.quiet {
        println!("== After rewriting: depth {}", after.deepest_path);
        print_depth_histogram(&optimized);
    }

    let equivalent = if options.check_equivalence {
        let start = std::time::Instant::now();
        let result = prove_gate_fn_equiv(&gate_fn, &optimized)
            .context("equivalence check failed to run")?;
        log::info!("equivalence check took {:?}", start.elapsed());
        if let EquivResult::Disproved(cex) = result {
            bail!(
                "rewritten network is not equivalent to the input; counterexample: {:?}",
                cex
            );
        }
        Some(true)
    } else {
        None
    };

    if let Some(output) = &options.output {
        write_gate_fn(&optimized, output)?;
        log::info!("wrote {}", output.display());
    }

    Ok(Report {
        input: input.display().to_string(),
        before,
        after,
        rewrites,
        equivalent,
    })
}
