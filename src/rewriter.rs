use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::error::EngineError;
use crate::fix::Fix;

/// Source-editing collaborator. `apply` stages a fix set for the next build,
/// `revert` undoes the staging, `commit` makes an accepted set permanent.
pub(crate) trait Rewriter {
    fn apply(&mut self, fixes: &[Fix]) -> Result<(), EngineError>;
    fn revert(&mut self) -> Result<(), EngineError>;
    fn commit(&mut self, fixes: &[Fix]) -> Result<(), EngineError>;
}

/// Rewriter that talks to the external injector through files: the build
/// honors whatever the worklist file lists, so staging is a write and
/// reverting is a truncate. Committed fixes accumulate in a separate file
/// that stays applied across rounds.
pub(crate) struct WorklistRewriter {
    worklist_path: PathBuf,
    applied_path: PathBuf,
    preserve_format: bool,
}

impl WorklistRewriter {
    pub(crate) fn new(worklist_path: PathBuf, applied_path: PathBuf, preserve_format: bool) -> Self {
        Self {
            worklist_path,
            applied_path,
            preserve_format,
        }
    }

    /// Directive the injector reads before any fix line.
    const PRESERVE_DIRECTIVE: &'static str = "FORMAT\tPRESERVE";

    fn render(fix: &Fix) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            fix.kind.as_str(),
            fix.class,
            fix.method,
            fix.param,
            fix.param_index.map_or_else(|| "-".to_string(), |i| i.to_string()),
            fix.annotation,
            fix.location.uri,
            fix.location.line,
        )
    }
}

impl Rewriter for WorklistRewriter {
    fn apply(&mut self, fixes: &[Fix]) -> Result<(), EngineError> {
        debug!(count = fixes.len(), "staging fixes for next build");
        let mut lines = String::new();
        if self.preserve_format && !fixes.is_empty() {
            lines.push_str(Self::PRESERVE_DIRECTIVE);
            lines.push('\n');
        }
        for fix in fixes {
            lines.push_str(&Self::render(fix));
            lines.push('\n');
        }
        fs::write(&self.worklist_path, lines)
            .map_err(|err| EngineError::io(&self.worklist_path, err))
    }

    fn revert(&mut self) -> Result<(), EngineError> {
        fs::write(&self.worklist_path, "")
            .map_err(|err| EngineError::io(&self.worklist_path, err))
    }

    fn commit(&mut self, fixes: &[Fix]) -> Result<(), EngineError> {
        if fixes.is_empty() {
            return Ok(());
        }
        let fresh = !self.applied_path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.applied_path)
            .map_err(|err| EngineError::io(&self.applied_path, err))?;
        if self.preserve_format && fresh {
            writeln!(file, "{}", Self::PRESERVE_DIRECTIVE)
                .map_err(|err| EngineError::io(&self.applied_path, err))?;
        }
        for fix in fixes {
            writeln!(file, "{}", Self::render(fix))
                .map_err(|err| EngineError::io(&self.applied_path, err))?;
        }
        Ok(())
    }
}
