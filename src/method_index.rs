use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::EngineError;

/// Sentinel parent id marking a method with no known override parent.
const NO_PARENT: i64 = -1;

/// One method implementation from the serialized inheritance relation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MethodRecord {
    pub(crate) id: u32,
    pub(crate) class: String,
    pub(crate) signature: String,
    pub(crate) parent: Option<u32>,
    pub(crate) children: Vec<u32>,
    /// Per-parameter nullable flags, declaration order.
    pub(crate) param_flags: Vec<bool>,
    pub(crate) nullable_return: bool,
}

/// Per-run id generator and method interning state.
///
/// Passed explicitly into whatever needs to mint or look up stable ids,
/// instead of living in process-wide statics.
#[derive(Debug, Default)]
pub(crate) struct RunContext {
    next_id: u32,
    interned: HashMap<(String, String), u32>,
}

impl RunContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Stable id for a `(signature, class)` pair within this run.
    pub(crate) fn intern(&mut self, signature: &str, class: &str) -> u32 {
        if let Some(id) = self
            .interned
            .get(&(signature.to_string(), class.to_string()))
        {
            return *id;
        }
        let id = self.fresh_id();
        self.interned
            .insert((signature.to_string(), class.to_string()), id);
        id
    }
}

/// Override forest over every method implementation the checker serialized.
///
/// The raw relation has no signature keyed lookup, so a secondary hash index
/// from `(signature, class)` to record id is built at load time; ancestor and
/// descendant queries then cost O(depth) and O(subtree) respectively.
#[derive(Debug, Default)]
pub(crate) struct MethodIndex {
    records: BTreeMap<u32, MethodRecord>,
    by_signature: HashMap<(String, String), u32>,
}

impl MethodIndex {
    /// Parse the tab-delimited method relation:
    /// `id, class, signature, parentId, paramCount, [paramFlags], nullableReturn`.
    ///
    /// A missing file is fatal; a malformed line is skipped with a warning
    /// and the index proceeds with partial data.
    pub(crate) fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::MissingFile(path.to_path_buf()));
            }
            Err(source) => return Err(EngineError::io(path, source)),
        };

        let mut index = MethodIndex::default();
        for (line_index, line) in contents.lines().enumerate() {
            if line.is_empty() || (line_index == 0 && line.starts_with("id\t")) {
                continue;
            }
            match parse_record_line(line) {
                Ok(record) => index.insert(record),
                Err(reason) => {
                    let error = EngineError::MalformedRelation {
                        path: path.to_path_buf(),
                        line: line_index + 1,
                        reason,
                    };
                    warn!("skipping method record: {error}");
                }
            }
        }
        Ok(index)
    }

    fn insert(&mut self, record: MethodRecord) {
        let id = record.id;
        if let Some(parent) = record.parent {
            let parent_record = self.records.entry(parent).or_default();
            parent_record.id = parent;
            if !parent_record.children.contains(&id) {
                parent_record.children.push(id);
            }
        }
        self.by_signature
            .insert((record.signature.clone(), record.class.clone()), id);
        let slot = self.records.entry(id).or_default();
        let children = std::mem::take(&mut slot.children);
        *slot = record;
        for child in children {
            if !slot.children.contains(&child) {
                slot.children.push(child);
            }
        }
    }

    pub(crate) fn record(&self, signature: &str, class: &str) -> Option<&MethodRecord> {
        let id = self
            .by_signature
            .get(&(signature.to_string(), class.to_string()))?;
        self.records.get(id)
    }

    /// Overridden methods from nearest to furthest; empty when unknown.
    pub(crate) fn ancestors(&self, signature: &str, class: &str) -> Vec<&MethodRecord> {
        let mut result = Vec::new();
        let Some(mut current) = self.record(signature, class) else {
            return result;
        };
        while let Some(parent_id) = current.parent {
            match self.records.get(&parent_id) {
                // Placeholder records exist only as parents of malformed
                // lines; stop rather than report a half-filled record.
                Some(parent) if !parent.signature.is_empty() => {
                    result.push(parent);
                    current = parent;
                }
                _ => break,
            }
        }
        result
    }

    /// All transitive overriders, de-duplicated; empty when none.
    pub(crate) fn descendants(&self, signature: &str, class: &str) -> Vec<&MethodRecord> {
        let mut result = Vec::new();
        let Some(root) = self.record(signature, class) else {
            return result;
        };
        let mut visited = vec![root.id];
        let mut queue: VecDeque<u32> = root.children.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if visited.contains(&id) {
                continue;
            }
            visited.push(id);
            if let Some(record) = self.records.get(&id) {
                if !record.signature.is_empty() {
                    result.push(record);
                }
                queue.extend(record.children.iter().copied());
            }
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn record_by_id(&self, id: u32) -> Option<&MethodRecord> {
        self.records.get(&id)
    }
}

fn parse_record_line(line: &str) -> Result<MethodRecord, String> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 7 {
        return Err(format!("expected 7 columns, found {}", columns.len()));
    }
    let id = columns[0]
        .parse::<u32>()
        .map_err(|_| format!("bad id {}", columns[0]))?;
    let parent_raw = columns[3]
        .parse::<i64>()
        .map_err(|_| format!("bad parent id {}", columns[3]))?;
    let parent = match parent_raw {
        NO_PARENT => None,
        value if value >= 0 && value as u32 != id => Some(value as u32),
        value if value as u32 == id => return Err("record is its own parent".to_string()),
        value => return Err(format!("bad parent id {value}")),
    };
    let param_count = columns[4]
        .parse::<usize>()
        .map_err(|_| format!("bad parameter count {}", columns[4]))?;
    let param_flags = parse_flag_list(columns[5])?;
    if param_flags.len() != param_count {
        return Err(format!(
            "parameter count {} does not match {} flags",
            param_count,
            param_flags.len()
        ));
    }
    let nullable_return = parse_bool(columns[6])?;
    Ok(MethodRecord {
        id,
        class: columns[1].to_string(),
        signature: columns[2].to_string(),
        parent,
        children: Vec::new(),
        param_flags,
        nullable_return,
    })
}

/// Flags are serialized `[true, false, ...]`; `[]` and `null` mean no
/// parameters.
fn parse_flag_list(value: &str) -> Result<Vec<bool>, String> {
    if value == "null" {
        return Ok(Vec::new());
    }
    let inner = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("bad flag list {value}"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner.split(',').map(|flag| parse_bool(flag.trim())).collect()
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("bad boolean {other}")),
    }
}
