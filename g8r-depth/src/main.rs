// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use g8r_depth::algebraic::RewriteOptions;
use g8r_depth::process_aig_path::{process_aig_path, Options};

/// Reduces the depth of an AIG with critical-path algebraic rewriting and
/// prints a JSON report of the before/after statistics.
#[derive(Parser, Debug)]
struct Args {
    /// Input network: ASCII AIGER (`.aag`) or the g8r text form.
    input: PathBuf,

    /// Where to write the rewritten network; `.aag` selects ASCII AIGER.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Whether to prove the rewritten network equivalent to the input.
    #[arg(long, default_value_t = true)]
    #[arg(action = clap::ArgAction::Set)]
    check_equivalence: bool,

    /// Comma-separated order in which rules are tried at each node.
    #[arg(long, default_value = "associativity,distributivity,three-layer")]
    rule_order: String,

    /// Only print the JSON report.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().try_init();
    let args = Args::parse();

    let rewrite = RewriteOptions::from_rule_list(&args.rule_order)
        .map_err(|e| anyhow::anyhow!(e))
        .context("invalid --rule-order")?;
    let options = Options {
        check_equivalence: args.check_equivalence,
        rewrite,
        output: args.output,
        quiet: args.quiet,
    };
    let report = process_aig_path(&args.input, &options)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
