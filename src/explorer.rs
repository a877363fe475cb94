use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::bank::{Bank, EffectRecord, ErrorRecord, load_errors};
use crate::config::Config;
use crate::error::EngineError;
use crate::fix::{Fix, FixKey, load_fixes};
use crate::graph::{FixGraph, FixNode};
use crate::method_index::{MethodIndex, RunContext};
use crate::oracle::BuildOracle;
use crate::report::{RoundSummary, RunReport, StopReason};
use crate::rewriter::Rewriter;
use crate::score::{ScoredFix, attributable, score};
use crate::tracker::{Region, RegionTracker};

/// Capability surface the decision phase consults about a candidate fix.
///
/// Two variants exist: the build-driven explorer backed by this round's
/// measurements, and a no-op explorer for dry runs where nothing is staged
/// and nothing is applicable.
pub(crate) trait Explorer {
    /// Corrected effect measured this round; 0 when the fix is unknown.
    fn effect(&self, fix: &Fix) -> i32;
    /// Raw error delta restricted to an explicit region scope.
    fn effect_by_scope(&self, fix: &Fix, regions: &BTreeSet<Region>) -> i32;
    fn is_applicable(&self, fix: &Fix) -> bool;
    /// Whether measuring this fix needs the rewriter to stage it.
    fn requires_injection(&self, fix: &Fix) -> bool;
}

/// Explorer backed by the round's batched build measurements.
pub(crate) struct BuildExplorer {
    scored: BTreeMap<FixKey, ScoredFix>,
    baseline: Vec<ErrorRecord>,
    probes: BTreeMap<FixKey, Vec<ErrorRecord>>,
}

impl BuildExplorer {
    pub(crate) fn new(
        scored: Vec<ScoredFix>,
        baseline: Vec<ErrorRecord>,
        probes: BTreeMap<FixKey, Vec<ErrorRecord>>,
    ) -> Self {
        let scored = scored
            .into_iter()
            .map(|entry| (entry.fix.key(), entry))
            .collect();
        Self {
            scored,
            baseline,
            probes,
        }
    }
}

impl Explorer for BuildExplorer {
    fn effect(&self, fix: &Fix) -> i32 {
        self.scored
            .get(&fix.key())
            .map(|entry| entry.effect)
            .unwrap_or(0)
    }

    fn effect_by_scope(&self, fix: &Fix, regions: &BTreeSet<Region>) -> i32 {
        match self.probes.get(&fix.key()) {
            Some(probe) => attributable(probe, regions) - attributable(&self.baseline, regions),
            None => 0,
        }
    }

    fn is_applicable(&self, fix: &Fix) -> bool {
        self.effect(fix) < 0
    }

    fn requires_injection(&self, _fix: &Fix) -> bool {
        true
    }
}

/// Explorer for dry runs: measures nothing, applies nothing.
pub(crate) struct NoopExplorer;

impl Explorer for NoopExplorer {
    fn effect(&self, _fix: &Fix) -> i32 {
        0
    }

    fn effect_by_scope(&self, _fix: &Fix, _regions: &BTreeSet<Region>) -> i32 {
        0
    }

    fn is_applicable(&self, _fix: &Fix) -> bool {
        false
    }

    fn requires_injection(&self, _fix: &Fix) -> bool {
        false
    }
}

/// The round loop: DISCOVER, BUILD, SCORE, DECIDE, repeated up to the
/// configured depth.
///
/// Rounds are strictly sequential; an accepted set is durably committed
/// before the next round's discovery build, and any oracle or relation-file
/// failure aborts the run rather than scoring a partial round.
pub(crate) struct SearchLoop {
    config: Config,
    oracle: Box<dyn BuildOracle>,
    rewriter: Box<dyn Rewriter>,
    bank: Bank,
    ctx: RunContext,
    /// Regions touched by each round's accepted fixes, consulted before
    /// trusting a cached measurement from an earlier round.
    accepted_regions: Vec<(usize, BTreeSet<Region>)>,
}

impl SearchLoop {
    pub(crate) fn new(
        config: Config,
        oracle: Box<dyn BuildOracle>,
        rewriter: Box<dyn Rewriter>,
    ) -> Self {
        Self {
            config,
            oracle,
            rewriter,
            bank: Bank::new(),
            ctx: RunContext::new(),
            accepted_regions: Vec::new(),
        }
    }

    pub(crate) fn run(&mut self) -> Result<RunReport, EngineError> {
        let mut rounds = Vec::new();
        let mut consecutive_zero_rounds = 0;
        let mut stop_reason = StopReason::DepthReached;

        for round_number in 0..self.config.depth as usize {
            let Some(summary) = self.round(round_number)? else {
                stop_reason = StopReason::NoCandidates;
                break;
            };
            info!(
                round = summary.round,
                candidates = summary.candidates,
                builds = summary.builds,
                cache_hits = summary.cache_hits,
                accepted = summary.accepted,
                rejected = summary.rejected,
                deferred = summary.deferred,
                "round complete"
            );
            if summary.accepted == 0 {
                consecutive_zero_rounds += 1;
            } else {
                consecutive_zero_rounds = 0;
            }
            rounds.push(summary);
            if self.config.bailout && consecutive_zero_rounds >= 2 {
                stop_reason = StopReason::Bailout;
                break;
            }
        }
        Ok(RunReport::new(rounds, stop_reason))
    }

    /// One DISCOVER → BUILD → SCORE → DECIDE cycle. Returns `None` when
    /// discovery finds no candidates.
    fn round(&mut self, round_number: usize) -> Result<Option<RoundSummary>, EngineError> {
        // DISCOVER: baseline build against the committed workspace state.
        self.rewriter.revert()?;
        self.oracle.build()?;
        let fixes = load_fixes(&self.config.fixes_path(), &self.config.nullable_annotation)?;
        if fixes.is_empty() {
            return Ok(None);
        }
        let index = MethodIndex::load(&self.config.method_info_path())?;
        let tracker = RegionTracker::load(
            &self.config.call_graph_path(),
            &self.config.field_graph_path(),
        )?;
        let graph = FixGraph::build(fixes, &tracker, &index, &mut self.ctx);
        for node in graph.nodes() {
            let observed = tracker.referenced(&node.fix);
            if observed != node.fix.referenced {
                debug!(
                    class = %node.fix.class,
                    member = %node.fix.method,
                    declared = node.fix.referenced,
                    observed,
                    "referenced count differs from the use relation"
                );
            }
        }

        let round = self.bank.begin_round();
        debug_assert_eq!(round, round_number);
        let baseline = load_errors(&self.config.errors_path())?;
        for record in &baseline {
            self.bank.put_error(record.clone());
        }
        if round > 0 {
            let (introduced, resolved) = self.bank.diff(round - 1, round);
            debug!(
                introduced = introduced.len(),
                resolved = resolved.len(),
                "error drift since previous round"
            );
        }

        let round_fixes: Vec<Fix> = graph.nodes().iter().map(|node| node.fix.clone()).collect();
        let batches = graph.batches(self.config.chain, self.config.max_batch);
        let clamped_components = if self.config.chain {
            graph.clamped_components(self.config.max_batch)
        } else {
            0
        };

        // BUILD + SCORE, one oracle invocation per uncached batch.
        let mut builds = 0;
        let mut cache_hits = 0;
        let mut scored: Vec<ScoredFix> = Vec::new();
        let mut probes: BTreeMap<FixKey, Vec<ErrorRecord>> = BTreeMap::new();
        for batch in &batches {
            let nodes: Vec<&FixNode> = batch.iter().filter_map(|id| graph.node(*id)).collect();
            if self.config.dry_run {
                for node in &nodes {
                    scored.push(score(node, 0, &index, &round_fixes));
                }
                continue;
            }
            if let Some(cached) = self.cached_batch(&nodes) {
                debug!(size = nodes.len(), "reusing banked batch measurement");
                cache_hits += 1;
                for (node, raw) in nodes.iter().zip(cached) {
                    scored.push(score(node, raw, &index, &round_fixes));
                }
                continue;
            }

            let staged: Vec<Fix> = nodes.iter().map(|node| node.fix.clone()).collect();
            self.rewriter.apply(&staged)?;
            if let Err(error) = self.oracle.build() {
                let _ = self.rewriter.revert();
                return Err(error);
            }
            builds += 1;
            let after = load_errors(&self.config.errors_path())?;
            self.rewriter.revert()?;
            for node in &nodes {
                let raw =
                    attributable(&after, &node.regions) - attributable(&baseline, &node.regions);
                let entry = score(node, raw, &index, &round_fixes);
                self.bank.put_effect(EffectRecord {
                    key: node.fix.key(),
                    raw,
                    effect: entry.effect,
                });
                probes.insert(node.fix.key(), after.clone());
                scored.push(entry);
            }
        }

        // DECIDE through the configured explorer variant.
        let explorer: Box<dyn Explorer> = if self.config.dry_run {
            Box::new(NoopExplorer)
        } else {
            Box::new(BuildExplorer::new(scored.clone(), baseline, probes))
        };
        let mut accepted: Vec<ScoredFix> = scored
            .iter()
            .filter(|entry| explorer.is_applicable(&entry.fix))
            .cloned()
            .collect();
        let mut deferred = 0;
        if self.config.optimized {
            accepted.sort_by(|a, b| {
                explorer
                    .effect(&a.fix)
                    .cmp(&explorer.effect(&b.fix))
                    .then(a.id.cmp(&b.id))
            });
            let mut kept: Vec<ScoredFix> = Vec::new();
            for candidate in accepted {
                if kept
                    .iter()
                    .any(|winner| winner.fix.contradicts(&candidate.fix))
                {
                    let banked_errors = self
                        .bank
                        .errors_matching(|record| record.symbol == candidate.fix.param)
                        .len();
                    warn!(
                        class = %candidate.fix.class,
                        member = %candidate.fix.param,
                        banked_errors,
                        scoped = explorer.effect_by_scope(&candidate.fix, &candidate.regions),
                        "contradicting accepted fixes; deferring the weaker one"
                    );
                    deferred += 1;
                } else {
                    kept.push(candidate);
                }
            }
            accepted = kept;
        }

        // Fixes whose measurement needed no injection have no edit to keep.
        let committed: Vec<Fix> = accepted
            .iter()
            .filter(|entry| explorer.requires_injection(&entry.fix))
            .map(|entry| entry.fix.clone())
            .collect();
        self.rewriter.commit(&committed)?;
        let mut touched = BTreeSet::new();
        for entry in &accepted {
            touched.extend(entry.regions.iter().cloned());
        }
        self.accepted_regions.push((round, touched));

        Ok(Some(RoundSummary {
            round,
            candidates: graph.nodes().len(),
            batches: batches.len(),
            builds,
            cache_hits,
            clamped_components,
            accepted: accepted.len(),
            rejected: scored.len() - accepted.len() - deferred,
            deferred,
        }))
    }

    /// Raw effects for a whole batch from the bank, when caching is enabled
    /// and every member has a banked measurement untouched by any fix
    /// accepted since it was observed.
    fn cached_batch(&self, nodes: &[&FixNode]) -> Option<Vec<i32>> {
        if !self.config.use_cache {
            return None;
        }
        let current_round = self.bank.current_round();
        let mut raws = Vec::with_capacity(nodes.len());
        for node in nodes {
            let (cached_round, record) = self.bank.cached_effect(&node.fix.key())?;
            if cached_round >= current_round {
                return None;
            }
            let touched_since = self
                .accepted_regions
                .iter()
                .filter(|(round, _)| *round >= cached_round)
                .any(|(_, regions)| regions.intersection(&node.regions).next().is_some());
            if touched_since {
                return None;
            }
            raws.push(record.raw);
        }
        Some(raws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::{FixKind, Location};
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::Duration;

    fn test_config(out_dir: PathBuf) -> Config {
        Config {
            build_command: "true".to_string(),
            nullable_annotation: "javax.annotation.Nullable".to_string(),
            initializer_annotation: "com.example.Initializer".to_string(),
            out_dir,
            depth: 5,
            bailout: true,
            use_cache: true,
            optimized: true,
            chain: false,
            preserve_format: false,
            dry_run: false,
            max_batch: 16,
            build_timeout: Some(Duration::from_secs(60)),
        }
    }

    /// What one scripted build leaves in the output directory.
    #[derive(Clone, Default)]
    struct BuildStep {
        fixes: Vec<String>,
        errors: Vec<String>,
        methods: Vec<String>,
        calls: Vec<String>,
        fields: Vec<String>,
    }

    /// Oracle that replays a fixed sequence of build outcomes and counts
    /// invocations; running past the script is a test failure.
    struct ScriptedOracle {
        config: Config,
        steps: Vec<BuildStep>,
        calls: Rc<RefCell<usize>>,
    }

    impl BuildOracle for ScriptedOracle {
        fn build(&mut self) -> Result<(), EngineError> {
            let call = *self.calls.borrow();
            let step = self
                .steps
                .get(call)
                .cloned()
                .ok_or_else(|| EngineError::BuildFailure("script exhausted".to_string()))?;
            *self.calls.borrow_mut() += 1;
            fs::write(self.config.fixes_path(), lines(&step.fixes)).expect("write fixes");
            fs::write(self.config.errors_path(), lines(&step.errors)).expect("write errors");
            fs::write(self.config.method_info_path(), lines(&step.methods))
                .expect("write methods");
            fs::write(self.config.call_graph_path(), lines(&step.calls)).expect("write calls");
            fs::write(self.config.field_graph_path(), lines(&step.fields)).expect("write fields");
            Ok(())
        }
    }

    fn lines(items: &[String]) -> String {
        let mut text = String::new();
        for item in items {
            text.push_str(item);
            text.push('\n');
        }
        text
    }

    fn step(fixes: &[&str], errors: &[&str]) -> BuildStep {
        BuildStep {
            fixes: fixes.iter().map(|s| s.to_string()).collect(),
            errors: errors.iter().map(|s| s.to_string()).collect(),
            ..BuildStep::default()
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        config: Config,
        calls: Rc<RefCell<usize>>,
    }

    fn harness(steps: Vec<BuildStep>, tune: impl FnOnce(&mut Config)) -> (Harness, SearchLoop) {
        let dir = tempfile::tempdir().expect("temp out dir");
        let mut config = test_config(dir.path().to_path_buf());
        tune(&mut config);
        let calls = Rc::new(RefCell::new(0));
        let oracle = ScriptedOracle {
            config: config.clone(),
            steps,
            calls: calls.clone(),
        };
        let rewriter = crate::rewriter::WorklistRewriter::new(
            config.worklist_path(),
            config.applied_path(),
            config.preserve_format,
        );
        let search = SearchLoop::new(config.clone(), Box::new(oracle), Box::new(rewriter));
        (
            Harness {
                _dir: dir,
                config,
                calls,
            },
            search,
        )
    }

    const PARAM_FIX: &str = "PARAMETER\tcom.example.A\tm()\tp\t0\t0\tA.java\t3";
    const FIELD_FIX: &str = "FIELD\tcom.example.B\t\tcache\t-\t0\tB.java\t8";
    const ERROR_IN_A_M: &str = "com.example.A\tm()\tDEREFERENCE\tp";
    const ERROR_IN_B_CACHE: &str = "com.example.B\tcache\tFIELD_NO_INIT\tcache";

    #[test]
    fn bailout_stops_after_two_consecutive_zero_accept_rounds() {
        // Round 0 accepts the parameter fix; rounds 1 and 2 measure a field
        // fix that gets worse when applied; round 2 reuses the banked
        // measurement, so the run needs five builds in total.
        let steps = vec![
            step(&[PARAM_FIX], &[ERROR_IN_A_M, ERROR_IN_A_M]),
            step(&[PARAM_FIX], &[]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE, ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]),
        ];
        let (harness, mut search) = harness(steps, |_| {});

        let report = search.run().expect("run search");

        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.stop_reason, StopReason::Bailout);
        assert_eq!(report.rounds[0].accepted, 1);
        assert_eq!(report.rounds[1].accepted, 0);
        assert_eq!(report.rounds[2].accepted, 0);
        assert_eq!(report.rounds[2].cache_hits, 1);
        assert_eq!(report.rounds[2].builds, 0);
        assert_eq!(*harness.calls.borrow(), 5);
        assert_eq!(report.total_accepted, 1);
    }

    #[test]
    fn disabled_bailout_traverses_to_full_depth() {
        // Zero-accept rounds forever; without bailout the loop still runs
        // `depth` rounds. Cache keeps every round after the first to a
        // single discovery build.
        let mut steps = vec![
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE, ERROR_IN_B_CACHE]),
        ];
        for _ in 0..3 {
            steps.push(step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]));
        }
        let (_harness, mut search) = harness(steps, |config| {
            config.bailout = false;
            config.depth = 4;
        });

        let report = search.run().expect("run search");

        assert_eq!(report.rounds.len(), 4);
        assert_eq!(report.stop_reason, StopReason::DepthReached);
        assert!(report.rounds.iter().all(|round| round.accepted == 0));
    }

    #[test]
    fn disabled_cache_reinvokes_the_oracle_for_unchanged_batches() {
        let steps = vec![
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE, ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE]),
            step(&[FIELD_FIX], &[ERROR_IN_B_CACHE, ERROR_IN_B_CACHE]),
        ];
        let (harness, mut search) = harness(steps, |config| {
            config.use_cache = false;
            config.depth = 2;
        });

        let report = search.run().expect("run search");

        assert_eq!(report.rounds.len(), 2);
        assert_eq!(report.rounds[1].cache_hits, 0);
        assert_eq!(report.rounds[1].builds, 1);
        assert_eq!(*harness.calls.borrow(), 4);
    }

    #[test]
    fn no_candidates_ends_the_run() {
        let steps = vec![step(&[], &[])];
        let (harness, mut search) = harness(steps, |_| {});

        let report = search.run().expect("run search");

        assert_eq!(report.stop_reason, StopReason::NoCandidates);
        assert!(report.rounds.is_empty());
        assert_eq!(*harness.calls.borrow(), 1);
    }

    #[test]
    fn accepted_fixes_are_committed_to_the_applied_worklist() {
        let steps = vec![
            step(&[PARAM_FIX], &[ERROR_IN_A_M, ERROR_IN_A_M, ERROR_IN_A_M]),
            step(&[PARAM_FIX], &[]),
            step(&[], &[]),
        ];
        let (harness, mut search) = harness(steps, |_| {});

        let report = search.run().expect("run search");

        assert_eq!(report.total_accepted, 1);
        let applied =
            fs::read_to_string(harness.config.applied_path()).expect("read applied file");
        assert!(applied.contains("PARAMETER\tcom.example.A\tm()\tp"));
        // Temporary staging always ends reverted.
        let worklist =
            fs::read_to_string(harness.config.worklist_path()).expect("read worklist file");
        assert_eq!(worklist, "");
    }

    #[test]
    fn contradicting_accepted_fixes_prefer_the_more_negative_effect() {
        // A parameter fix and a field fix edit the same declaration; both
        // measure beneficial, the stronger parameter fix wins and the field
        // fix is deferred to the next round.
        let contradicting_field = "FIELD\tcom.example.A\tm()\tp\t-\t0\tA.java\t3";
        let field_error = "com.example.A\tp\tFIELD_NO_INIT\tp";
        let steps = vec![
            step(
                &[PARAM_FIX, contradicting_field],
                &[ERROR_IN_A_M, ERROR_IN_A_M, ERROR_IN_A_M, field_error],
            ),
            step(&[PARAM_FIX, contradicting_field], &[]),
            step(&[], &[]),
        ];
        let (harness, mut search) = harness(steps, |_| {});

        let report = search.run().expect("run search");

        assert_eq!(report.rounds[0].accepted, 1);
        assert_eq!(report.rounds[0].deferred, 1);
        let applied =
            fs::read_to_string(harness.config.applied_path()).expect("read applied file");
        assert!(applied.starts_with("PARAMETER"));
        assert!(!applied.contains("FIELD"));
    }

    #[test]
    fn dry_run_discovers_but_never_stages_or_accepts() {
        let steps = vec![
            step(&[PARAM_FIX], &[ERROR_IN_A_M, ERROR_IN_A_M]),
            step(&[PARAM_FIX], &[ERROR_IN_A_M, ERROR_IN_A_M]),
        ];
        let (harness, mut search) = harness(steps, |config| {
            config.dry_run = true;
        });

        let report = search.run().expect("run search");

        // Two zero-accept rounds, then bailout; only discovery builds ran.
        assert_eq!(report.stop_reason, StopReason::Bailout);
        assert_eq!(report.rounds.len(), 2);
        assert!(report.rounds.iter().all(|round| round.builds == 0));
        assert_eq!(*harness.calls.borrow(), 2);
        assert!(!harness.config.applied_path().exists());
    }

    #[test]
    fn identical_inputs_produce_identical_outcomes() {
        let steps = || {
            vec![
                step(&[PARAM_FIX, FIELD_FIX], &[ERROR_IN_A_M, ERROR_IN_A_M, ERROR_IN_B_CACHE]),
                step(&[PARAM_FIX, FIELD_FIX], &[ERROR_IN_B_CACHE]),
                step(&[], &[]),
            ]
        };
        let (first_harness, mut first) = harness(steps(), |_| {});
        let (second_harness, mut second) = harness(steps(), |_| {});

        let first_report = first.run().expect("first run");
        let second_report = second.run().expect("second run");

        assert_eq!(first_report.total_accepted, second_report.total_accepted);
        assert_eq!(first_report.rounds.len(), second_report.rounds.len());
        let first_applied = fs::read_to_string(first_harness.config.applied_path())
            .unwrap_or_default();
        let second_applied = fs::read_to_string(second_harness.config.applied_path())
            .unwrap_or_default();
        assert_eq!(first_applied, second_applied);
    }

    #[test]
    fn build_failure_aborts_the_run() {
        let steps = vec![step(&[PARAM_FIX], &[ERROR_IN_A_M])];
        let (_harness, mut search) = harness(steps, |_| {});

        let result = search.run();

        assert!(matches!(result, Err(EngineError::BuildFailure(_))));
    }

    #[test]
    fn build_explorer_answers_scoped_and_corrected_effects() {
        let fix = Fix {
            kind: FixKind::Parameter,
            class: "com.example.A".to_string(),
            method: "m()".to_string(),
            param: "p".to_string(),
            param_index: Some(0),
            referenced: 1,
            annotation: "Nullable".to_string(),
            location: Location {
                uri: "A.java".to_string(),
                line: 3,
            },
        };
        let region = Region::new("com.example.A", "m()");
        let baseline = vec![
            ErrorRecord {
                region: region.clone(),
                kind: "DEREFERENCE".to_string(),
                symbol: "p".to_string(),
            },
            ErrorRecord {
                region: region.clone(),
                kind: "DEREFERENCE".to_string(),
                symbol: "q".to_string(),
            },
        ];
        let scored = ScoredFix {
            id: 0,
            fix: fix.clone(),
            regions: BTreeSet::from([region.clone()]),
            raw: -2,
            effect: -3,
        };
        let probes = BTreeMap::from([(fix.key(), Vec::new())]);
        let explorer = BuildExplorer::new(vec![scored], baseline, probes);

        assert_eq!(explorer.effect(&fix), -3);
        assert!(explorer.is_applicable(&fix));
        assert!(explorer.requires_injection(&fix));
        let scope = BTreeSet::from([region]);
        assert_eq!(explorer.effect_by_scope(&fix, &scope), -2);

        let mut unknown = fix.clone();
        unknown.param = "other".to_string();
        assert_eq!(explorer.effect(&unknown), 0);
        assert!(!explorer.is_applicable(&unknown));
    }

    #[test]
    fn noop_explorer_reports_nothing_applicable() {
        let fix = Fix {
            kind: FixKind::Field,
            class: "com.example.B".to_string(),
            method: String::new(),
            param: "cache".to_string(),
            param_index: None,
            referenced: 0,
            annotation: "Nullable".to_string(),
            location: Location {
                uri: "B.java".to_string(),
                line: 8,
            },
        };

        let explorer = NoopExplorer;

        assert_eq!(explorer.effect(&fix), 0);
        assert_eq!(explorer.effect_by_scope(&fix, &BTreeSet::new()), 0);
        assert!(!explorer.is_applicable(&fix));
        assert!(!explorer.requires_injection(&fix));
    }
}
