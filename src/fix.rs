use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::EngineError;

/// Declaration site kind targeted by a candidate annotation edit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) enum FixKind {
    Parameter,
    Method,
    Field,
}

impl FixKind {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "PARAMETER" => Some(FixKind::Parameter),
            "METHOD" => Some(FixKind::Method),
            "FIELD" => Some(FixKind::Field),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            FixKind::Parameter => "PARAMETER",
            FixKind::Method => "METHOD",
            FixKind::Field => "FIELD",
        }
    }
}

/// File position consumed only by the external rewriter.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct Location {
    pub(crate) uri: String,
    pub(crate) line: u32,
}

/// A candidate nullability edit discovered from checker diagnostics.
///
/// Immutable once discovered; a fresh set is parsed each round against the
/// current workspace state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Fix {
    pub(crate) kind: FixKind,
    pub(crate) class: String,
    pub(crate) method: String,
    /// Parameter or field name; empty for METHOD fixes.
    pub(crate) param: String,
    /// Zero-based parameter position, when the target is a parameter.
    pub(crate) param_index: Option<usize>,
    /// Static call/use sites touching the target symbol.
    pub(crate) referenced: u32,
    pub(crate) annotation: String,
    pub(crate) location: Location,
}

/// Structural identity of a fix: what declaration it edits, not where the
/// diagnostic happened to point.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub(crate) struct FixKey {
    pub(crate) kind: FixKind,
    pub(crate) class: String,
    pub(crate) method: String,
    pub(crate) param: String,
}

impl Fix {
    pub(crate) fn key(&self) -> FixKey {
        FixKey {
            kind: self.kind,
            class: self.class.clone(),
            method: self.method.clone(),
            param: self.param.clone(),
        }
    }

    /// True when `other` edits the same declaration through a different kind
    /// of annotation, which a single round must not accept twice.
    pub(crate) fn contradicts(&self, other: &Fix) -> bool {
        self.kind != other.kind
            && self.class == other.class
            && self.method == other.method
            && self.param == other.param
    }
}

/// Parse the checker's suggested-fix relation.
///
/// Tab-delimited, one fix per line:
/// `kind, class, method, param, paramIndex, referenced, uri, line`.
/// Duplicate structural keys collapse to the first occurrence; malformed
/// lines are skipped with a warning.
pub(crate) fn load_fixes(path: &Path, annotation: &str) -> Result<Vec<Fix>, EngineError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::MissingFile(path.to_path_buf()));
        }
        Err(source) => return Err(EngineError::io(path, source)),
    };

    let mut fixes: Vec<Fix> = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.is_empty() || (index == 0 && line.starts_with("kind\t")) {
            continue;
        }
        match parse_fix_line(line, annotation) {
            Ok(fix) => {
                if !fixes.iter().any(|existing| existing.key() == fix.key()) {
                    fixes.push(fix);
                }
            }
            Err(reason) => {
                let error = EngineError::MalformedRelation {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason,
                };
                warn!("skipping fix record: {error}");
            }
        }
    }
    Ok(fixes)
}

fn parse_fix_line(line: &str, annotation: &str) -> Result<Fix, String> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != 8 {
        return Err(format!("expected 8 columns, found {}", columns.len()));
    }
    let kind = FixKind::parse(columns[0]).ok_or_else(|| format!("unknown kind {}", columns[0]))?;
    let param_index = match columns[4] {
        "-" | "" => None,
        value => Some(
            value
                .parse::<usize>()
                .map_err(|_| format!("bad parameter index {value}"))?,
        ),
    };
    if kind == FixKind::Parameter && param_index.is_none() {
        return Err("parameter fix without parameter index".to_string());
    }
    let referenced = columns[5]
        .parse::<u32>()
        .map_err(|_| format!("bad referenced count {}", columns[5]))?;
    let line_number = columns[7]
        .parse::<u32>()
        .map_err(|_| format!("bad line number {}", columns[7]))?;
    Ok(Fix {
        kind,
        class: columns[1].to_string(),
        method: columns[2].to_string(),
        param: columns[3].to_string(),
        param_index,
        referenced,
        annotation: annotation.to_string(),
        location: Location {
            uri: columns[6].to_string(),
            line: line_number,
        },
    })
}
