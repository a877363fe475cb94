use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::EngineError;
use crate::fix::{Fix, FixKind};

/// A source scope whose compiled behavior a fix can change: a method body or
/// a field initializer.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct Region {
    pub(crate) class: String,
    pub(crate) member: String,
}

impl Region {
    pub(crate) fn new(class: impl Into<String>, member: impl Into<String>) -> Self {
        Region {
            class: class.into(),
            member: member.into(),
        }
    }
}

/// Answers "which regions are affected if symbol S changes nullability",
/// built from the call-use and field-use relations the checker serialized.
#[derive(Debug, Default)]
pub(crate) struct RegionTracker {
    method_callers: BTreeMap<(String, String), BTreeSet<Region>>,
    field_users: BTreeMap<(String, String), BTreeSet<Region>>,
}

impl RegionTracker {
    pub(crate) fn load(call_path: &Path, field_path: &Path) -> Result<Self, EngineError> {
        let mut tracker = RegionTracker::default();
        load_relation(call_path, &mut tracker.method_callers)?;
        load_relation(field_path, &mut tracker.field_users)?;
        Ok(tracker)
    }

    /// Regions affected by the fix's target symbol: every use site, plus the
    /// declaration's own region.
    pub(crate) fn regions(&self, fix: &Fix) -> BTreeSet<Region> {
        let (uses, declaration) = match fix.kind {
            FixKind::Parameter | FixKind::Method => (
                self.method_callers
                    .get(&(fix.class.clone(), fix.method.clone())),
                Region::new(fix.class.clone(), fix.method.clone()),
            ),
            FixKind::Field => (
                self.field_users
                    .get(&(fix.class.clone(), fix.param.clone())),
                Region::new(fix.class.clone(), fix.param.clone()),
            ),
        };
        let mut regions = uses.cloned().unwrap_or_default();
        regions.insert(declaration);
        regions
    }

    /// Distinct use sites of the fix's target symbol, excluding the
    /// declaration itself.
    pub(crate) fn referenced(&self, fix: &Fix) -> u32 {
        let uses = match fix.kind {
            FixKind::Parameter | FixKind::Method => self
                .method_callers
                .get(&(fix.class.clone(), fix.method.clone())),
            FixKind::Field => self.field_users.get(&(fix.class.clone(), fix.param.clone())),
        };
        uses.map(|regions| regions.len() as u32).unwrap_or(0)
    }
}

/// Parse a per-use relation: `calleeClass, calleeMember, callerClass,
/// callerMember`, tab-delimited. Missing file is fatal; malformed lines are
/// skipped with a warning.
fn load_relation(
    path: &Path,
    target: &mut BTreeMap<(String, String), BTreeSet<Region>>,
) -> Result<(), EngineError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::MissingFile(path.to_path_buf()));
        }
        Err(source) => return Err(EngineError::io(path, source)),
    };
    for (index, line) in contents.lines().enumerate() {
        if line.is_empty() || (index == 0 && line.starts_with("calleeClass\t")) {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 4 {
            let error = EngineError::MalformedRelation {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("expected 4 columns, found {}", columns.len()),
            };
            warn!("skipping use record: {error}");
            continue;
        }
        target
            .entry((columns[0].to_string(), columns[1].to_string()))
            .or_default()
            .insert(Region::new(columns[2], columns[3]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::Location;
    use std::io::Write;

    fn write_lines(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp relation file");
        for line in lines {
            writeln!(file, "{line}").expect("write relation line");
        }
        file
    }

    fn tracker() -> RegionTracker {
        let calls = write_lines(&[
            "com.example.A\tget(int)\tcom.example.Caller\tuse()",
            "com.example.A\tget(int)\tcom.example.Other\trun()",
        ]);
        let fields = write_lines(&["com.example.A\tcache\tcom.example.Caller\tuse()"]);
        RegionTracker::load(calls.path(), fields.path()).expect("load tracker")
    }

    fn parameter_fix() -> Fix {
        Fix {
            kind: FixKind::Parameter,
            class: "com.example.A".to_string(),
            method: "get(int)".to_string(),
            param: "key".to_string(),
            param_index: Some(0),
            referenced: 2,
            annotation: "Nullable".to_string(),
            location: Location {
                uri: "A.java".to_string(),
                line: 1,
            },
        }
    }

    #[test]
    fn method_fix_regions_cover_callers_and_declaration() {
        let tracker = tracker();

        let regions = tracker.regions(&parameter_fix());

        assert_eq!(regions.len(), 3);
        assert!(regions.contains(&Region::new("com.example.Caller", "use()")));
        assert!(regions.contains(&Region::new("com.example.A", "get(int)")));
    }

    #[test]
    fn field_fix_regions_cover_users_and_initializer() {
        let tracker = tracker();
        let mut fix = parameter_fix();
        fix.kind = FixKind::Field;
        fix.method = String::new();
        fix.param = "cache".to_string();
        fix.param_index = None;

        let regions = tracker.regions(&fix);

        assert_eq!(regions.len(), 2);
        assert!(regions.contains(&Region::new("com.example.A", "cache")));
        assert_eq!(tracker.referenced(&fix), 1);
    }

    #[test]
    fn unknown_symbol_still_has_its_declaration_region() {
        let tracker = tracker();
        let mut fix = parameter_fix();
        fix.method = "missing()".to_string();

        let regions = tracker.regions(&fix);

        assert_eq!(regions.len(), 1);
        assert_eq!(tracker.referenced(&fix), 0);
    }

    #[test]
    fn missing_relation_file_is_fatal() {
        let calls = write_lines(&[]);

        let result = RegionTracker::load(calls.path(), Path::new("/nonexistent/fields.tsv"));

        assert!(matches!(result, Err(EngineError::MissingFile(_))));
    }
}
