use std::collections::BTreeSet;

use crate::bank::ErrorRecord;
use crate::fix::{Fix, FixKind};
use crate::graph::FixNode;
use crate::method_index::MethodIndex;
use crate::tracker::Region;

/// A fix whose measurement and correction are both complete.
///
/// Produced only after the raw build delta and the structural correction are
/// known, so nothing partially scored can reach the accept/reject decision.
#[derive(Clone, Debug)]
pub(crate) struct ScoredFix {
    pub(crate) id: u32,
    pub(crate) fix: Fix,
    pub(crate) regions: BTreeSet<Region>,
    pub(crate) raw: i32,
    pub(crate) effect: i32,
}

impl ScoredFix {
    /// A fix is worth keeping only when it strictly reduces the corrected
    /// error count; ties mean churn with no measurable benefit.
    pub(crate) fn accepted(&self) -> bool {
        self.effect < 0
    }
}

/// Errors attributable to the given regions.
pub(crate) fn attributable(errors: &[ErrorRecord], regions: &BTreeSet<Region>) -> i32 {
    errors
        .iter()
        .filter(|record| regions.contains(&record.region))
        .count() as i32
}

/// Apply the structural correction to a raw build-measured effect.
///
/// The build counts every call-site error separately, but the decision is
/// about a single declaration: parameter fixes subtract the referenced-site
/// count, method and field fixes pay a flat declaration cost, and edits that
/// would newly break an override contract are penalized per violation.
pub(crate) fn score(
    node: &FixNode,
    raw: i32,
    index: &MethodIndex,
    round_fixes: &[Fix],
) -> ScoredFix {
    let effect = match node.fix.kind {
        FixKind::Parameter => {
            raw - node.fix.referenced as i32 + param_violations(index, &node.fix)
        }
        FixKind::Method => raw + return_violations(index, &node.fix, round_fixes) - 1,
        FixKind::Field => raw - 1,
    };
    ScoredFix {
        id: node.id,
        fix: node.fix.clone(),
        regions: node.regions.clone(),
        raw,
        effect,
    }
}

/// Ancestor or descendant parameters that are still non-nullable at the same
/// position: annotating this declaration alone leaves the override contract
/// inconsistent, one violation per relative.
fn param_violations(index: &MethodIndex, fix: &Fix) -> i32 {
    let Some(position) = fix.param_index else {
        return 0;
    };
    index
        .ancestors(&fix.method, &fix.class)
        .iter()
        .chain(index.descendants(&fix.method, &fix.class).iter())
        .filter(|record| record.param_flags.get(position) == Some(&false))
        .count() as i32
}

/// Return-type violations against override relatives, counted only for
/// relatives whose own METHOD fix is being evaluated in the same round;
/// fixes outside the round cannot interact with this measurement.
fn return_violations(index: &MethodIndex, fix: &Fix, round_fixes: &[Fix]) -> i32 {
    index
        .ancestors(&fix.method, &fix.class)
        .iter()
        .chain(index.descendants(&fix.method, &fix.class).iter())
        .filter(|record| !record.nullable_return)
        .filter(|record| {
            round_fixes.iter().any(|other| {
                other.kind == FixKind::Method
                    && other.method == record.signature
                    && other.class == record.class
            })
        })
        .count() as i32
}
