// SPDX-License-Identifier: Apache-2.0

//! Critical-path algebraic rewriting.
//!
//! Three local Boolean identities are applied only around nodes that lie on
//! the current critical path, each guarded by a level check that proves the
//! rewrite shortens that path:
//!
//! * associativity: `a & (c & d) -> (a & c) & d` when `d` is the deep input.
//! * distributivity: `!(c & d) & !(c & e) -> !(c & !(!d & !e))` when `c` is the
//!   shared deep input.
//! * three-layer distributivity: `u & !(v & !(s & w)) -> !(!(u & !v) & !(s & (u
//!   & w)))` when `s` is the deep input.
//!
//! Every rule is split into a pure matcher that computes all signals it needs
//! and an applying step that only then creates gates and substitutes.

pub mod associativity;
pub mod distributivity;
pub mod driver;
pub mod three_layer_distributivity;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::aig::gate::{AigOperand, AigRef, GateFn};
use crate::network::{AigNetwork, DepthNetwork, DepthView};

pub use driver::{aig_algebraic_rewriting, aig_algebraic_rewriting_with_options};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RuleKind {
    Associativity,
    Distributivity,
    ThreeLayerDistributivity,
}

impl RuleKind {
    pub const ALL: [RuleKind; 3] = [
        RuleKind::Associativity,
        RuleKind::Distributivity,
        RuleKind::ThreeLayerDistributivity,
    ];

    /// Attempts this rule on `node`; returns true if the network was changed.
    pub fn try_apply<N: DepthNetwork>(self, ntk: &mut N, node: AigRef) -> bool {
        match self {
            RuleKind::Associativity => associativity::try_associativity(ntk, node),
            RuleKind::Distributivity => distributivity::try_distributivity(ntk, node),
            RuleKind::ThreeLayerDistributivity => {
                three_layer_distributivity::try_three_layer_distributivity(ntk, node)
            }
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Associativity => write!(f, "associativity"),
            RuleKind::Distributivity => write!(f, "distributivity"),
            RuleKind::ThreeLayerDistributivity => write!(f, "three-layer"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "associativity" | "assoc" => Ok(RuleKind::Associativity),
            "distributivity" | "dist" => Ok(RuleKind::Distributivity),
            "three-layer" | "three-layer-distributivity" | "3layer" => {
                Ok(RuleKind::ThreeLayerDistributivity)
            }
            other => Err(format!(
                "unknown rewrite rule {:?}; expected one of: associativity, distributivity, three-layer",
                other
            )),
        }
    }
}

/// A fan-in pair in which exactly one signal is on the critical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalSplit {
    pub critical: AigOperand,
    pub non_critical: AigOperand,
}

/// Returns the split of `fanins` when exactly one of the two is critical.
pub fn split_critical_fanins<N: DepthNetwork>(
    ntk: &N,
    fanins: [AigOperand; 2],
) -> Option<CriticalSplit> {
    let [first, second] = fanins;
    let first_critical = ntk.is_on_critical_path(first.node);
    let second_critical = ntk.is_on_critical_path(second.node);
    if first_critical ^ second_critical {
        Some(if first_critical {
            CriticalSplit {
                critical: first,
                non_critical: second,
            }
        } else {
            CriticalSplit {
                critical: second,
                non_critical: first,
            }
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Rules are tried on each node in this order; the first that applies wins.
    pub rule_order: Vec<RuleKind>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            rule_order: RuleKind::ALL.to_vec(),
        }
    }
}

impl RewriteOptions {
    /// Parses a comma-separated rule list such as `"distributivity,associativity"`.
    pub fn from_rule_list(s: &str) -> Result<Self, String> {
        let rule_order = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(RuleKind::from_str)
            .collect::<Result<Vec<RuleKind>, String>>()?;
        if rule_order.is_empty() {
            return Err("rule order must name at least one rule".to_string());
        }
        Ok(Self { rule_order })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub associativity: usize,
    pub distributivity: usize,
    pub three_layer_distributivity: usize,
    /// Number of full gate scans, including the final scan that found nothing.
    pub scans: usize,
    pub initial_depth: usize,
    pub final_depth: usize,
}

impl RewriteStats {
    pub fn record(&mut self, rule: RuleKind) {
        match rule {
            RuleKind::Associativity => self.associativity += 1,
            RuleKind::Distributivity => self.distributivity += 1,
            RuleKind::ThreeLayerDistributivity => self.three_layer_distributivity += 1,
        }
    }

    pub fn count(&self, rule: RuleKind) -> usize {
        match rule {
            RuleKind::Associativity => self.associativity,
            RuleKind::Distributivity => self.distributivity,
            RuleKind::ThreeLayerDistributivity => self.three_layer_distributivity,
        }
    }

    pub fn total_rewrites(&self) -> usize {
        self.associativity + self.distributivity + self.three_layer_distributivity
    }
}

/// Substitutes `node` by `replacement`. Every leaf of a replacement lies in the
/// strict fan-in cone of `node`, so it can never hash back to `node` itself.
pub(crate) fn commit_rewrite<N: DepthNetwork>(
    ntk: &mut N,
    rule: RuleKind,
    node: AigRef,
    replacement: AigOperand,
) {
    debug_assert_ne!(
        replacement.node, node,
        "{}: replacement for %{} is the node itself",
        rule, node.id
    );
    log::debug!(
        "{}: %{} -> {}%{}",
        rule,
        node.id,
        if replacement.negated { "!" } else { "" },
        replacement.node.id
    );
    ntk.substitute_node(node, replacement);
}

/// Runs the rewriter over `gate_fn` with the default rule order.
pub fn optimize_depth(gate_fn: &GateFn) -> (GateFn, RewriteStats) {
    optimize_depth_with_options(gate_fn, &RewriteOptions::default())
}

pub fn optimize_depth_with_options(
    gate_fn: &GateFn,
    options: &RewriteOptions,
) -> (GateFn, RewriteStats) {
    let mut view = DepthView::new(AigNetwork::from_gate_fn(gate_fn));
    let stats = aig_algebraic_rewriting_with_options(&mut view, options);
    let result = view.into_inner().to_gate_fn();
    debug_assert_eq!(result.get_signature(), gate_fn.get_signature());
    (result, stats)
}
