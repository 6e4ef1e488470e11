// SPDX-License-Identifier: Apache-2.0

//! `!(c & d) & !(c & e) -> !(c & !(!d & !e))` where both primary fan-ins are
//! critical and inverted and `c` is the critical fan-in they share.

use crate::aig::gate::{AigOperand, AigRef};
use crate::algebraic::{commit_rewrite, split_critical_fanins, CriticalSplit, RuleKind};
use crate::network::DepthNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributivityMatch {
    /// The critical secondary signal common to both primary fan-ins.
    pub shared: AigOperand,
    pub non_critical_0: AigOperand,
    pub non_critical_1: AigOperand,
}

fn critical_inverted_child<N: DepthNetwork>(ntk: &N, child: AigOperand) -> Option<CriticalSplit> {
    if !ntk.is_on_critical_path(child.node) || !child.negated {
        return None;
    }
    split_critical_fanins(ntk, ntk.fanins(child.node)?)
}

pub fn match_distributivity<N: DepthNetwork>(ntk: &N, node: AigRef) -> Option<DistributivityMatch> {
    if !ntk.is_on_critical_path(node) {
        return None;
    }
    let [child0, child1] = ntk.fanins(node)?;
    let split0 = critical_inverted_child(ntk, child0)?;
    let split1 = critical_inverted_child(ntk, child1)?;
    if split0.critical != split1.critical {
        return None;
    }
    Some(DistributivityMatch {
        shared: split0.critical,
        non_critical_0: split0.non_critical,
        non_critical_1: split1.non_critical,
    })
}

pub fn try_distributivity<N: DepthNetwork>(ntk: &mut N, node: AigRef) -> bool {
    let Some(m) = match_distributivity(ntk, node) else {
        return false;
    };
    let either_nor = ntk.create_and(m.non_critical_0.negate(), m.non_critical_1.negate());
    let factored = ntk.create_and(either_nor.negate(), m.shared);
    commit_rewrite(ntk, RuleKind::Distributivity, node, factored.negate());
    true
}
