use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Why the search loop stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StopReason {
    DepthReached,
    Bailout,
    NoCandidates,
}

/// One round's bookkeeping, logged and serialized for post-hoc inspection.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RoundSummary {
    pub(crate) round: usize,
    pub(crate) candidates: usize,
    pub(crate) batches: usize,
    pub(crate) builds: usize,
    pub(crate) cache_hits: usize,
    pub(crate) clamped_components: usize,
    pub(crate) accepted: usize,
    pub(crate) rejected: usize,
    pub(crate) deferred: usize,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct RunReport {
    pub(crate) rounds: Vec<RoundSummary>,
    pub(crate) total_accepted: usize,
    pub(crate) stop_reason: StopReason,
}

impl RunReport {
    pub(crate) fn new(rounds: Vec<RoundSummary>, stop_reason: StopReason) -> Self {
        let total_accepted = rounds.iter().map(|round| round.accepted).sum();
        RunReport {
            rounds,
            total_accepted,
            stop_reason,
        }
    }
}

pub(crate) fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report at {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("failed to serialize run report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(round: usize, accepted: usize) -> RoundSummary {
        RoundSummary {
            round,
            candidates: 4,
            batches: 2,
            builds: 2,
            cache_hits: 0,
            clamped_components: 0,
            accepted,
            rejected: 4 - accepted,
            deferred: 0,
        }
    }

    #[test]
    fn report_totals_accepted_across_rounds() {
        let report = RunReport::new(vec![summary(0, 3), summary(1, 1)], StopReason::DepthReached);

        assert_eq!(report.total_accepted, 4);
    }

    #[test]
    fn report_serializes_with_snake_case_stop_reason() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.json");
        let report = RunReport::new(vec![summary(0, 0)], StopReason::Bailout);

        write_report(&path, &report).expect("write report");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read report"))
                .expect("parse report");
        assert_eq!(value["stop_reason"], "bailout");
        assert_eq!(value["rounds"][0]["candidates"], 4);
    }
}
