use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::EngineError;
use crate::fix::FixKey;
use crate::tracker::Region;

/// One diagnostic from a build: where it happened, what kind, which symbol.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct ErrorRecord {
    pub(crate) region: Region,
    pub(crate) kind: String,
    pub(crate) symbol: String,
}

/// Measured effect of one fix, banked for cross-round cache lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EffectRecord {
    pub(crate) key: FixKey,
    pub(crate) raw: i32,
    pub(crate) effect: i32,
}

#[derive(Debug, Default)]
struct RoundSlot {
    errors: Vec<ErrorRecord>,
    effects: Vec<EffectRecord>,
}

/// Append-only, round-partitioned store of observed errors and measured
/// effects. Rounds are never deleted, so any two rounds stay diffable and
/// earlier measurements remain available for caching.
#[derive(Debug, Default)]
pub(crate) struct Bank {
    rounds: Vec<RoundSlot>,
}

impl Bank {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open a new round partition and return its number (starting at 0).
    pub(crate) fn begin_round(&mut self) -> usize {
        self.rounds.push(RoundSlot::default());
        self.rounds.len() - 1
    }

    pub(crate) fn current_round(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    pub(crate) fn put_error(&mut self, record: ErrorRecord) {
        if let Some(slot) = self.rounds.last_mut() {
            slot.errors.push(record);
        }
    }

    pub(crate) fn put_effect(&mut self, record: EffectRecord) {
        if let Some(slot) = self.rounds.last_mut() {
            slot.effects.push(record);
        }
    }

    pub(crate) fn round_errors(&self, round: usize) -> &[ErrorRecord] {
        self.rounds
            .get(round)
            .map(|slot| slot.errors.as_slice())
            .unwrap_or(&[])
    }

    /// All error records, any round, satisfying the predicate.
    pub(crate) fn errors_matching<P>(&self, predicate: P) -> Vec<(usize, &ErrorRecord)>
    where
        P: Fn(&ErrorRecord) -> bool,
    {
        let mut matches = Vec::new();
        for (round, slot) in self.rounds.iter().enumerate() {
            for record in &slot.errors {
                if predicate(record) {
                    matches.push((round, record));
                }
            }
        }
        matches
    }

    /// Most recent banked measurement for a fix, with the round it was
    /// observed in.
    pub(crate) fn cached_effect(&self, key: &FixKey) -> Option<(usize, &EffectRecord)> {
        for (round, slot) in self.rounds.iter().enumerate().rev() {
            if let Some(record) = slot.effects.iter().rev().find(|record| &record.key == key) {
                return Some((round, record));
            }
        }
        None
    }

    /// Errors present in `after` but not in `before`, and vice versa.
    pub(crate) fn diff(&self, before: usize, after: usize) -> (Vec<&ErrorRecord>, Vec<&ErrorRecord>) {
        let old = self.round_errors(before);
        let new = self.round_errors(after);
        let introduced = new.iter().filter(|record| !old.contains(record)).collect();
        let resolved = old.iter().filter(|record| !new.contains(record)).collect();
        (introduced, resolved)
    }
}

/// Parse a build's diagnostic relation: `regionClass, regionMember, kind,
/// symbol`, tab-delimited. Missing file is fatal for the round; malformed
/// lines are skipped with a warning.
pub(crate) fn load_errors(path: &Path) -> Result<Vec<ErrorRecord>, EngineError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::MissingFile(path.to_path_buf()));
        }
        Err(source) => return Err(EngineError::io(path, source)),
    };
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.is_empty() || (index == 0 && line.starts_with("regionClass\t")) {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 4 {
            let error = EngineError::MalformedRelation {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected 4 columns, found {}", columns.len()),
            };
            warn!("skipping error record: {error}");
            continue;
        }
        records.push(ErrorRecord {
            region: Region::new(columns[0], columns[1]),
            kind: columns[2].to_string(),
            symbol: columns[3].to_string(),
        });
    }
    Ok(records)
}
