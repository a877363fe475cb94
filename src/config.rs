use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

pub(crate) const DEFAULT_NULLABLE_ANNOTATION: &str = "javax.annotation.Nullable";
pub(crate) const DEFAULT_DEPTH: u32 = 5;
pub(crate) const DEFAULT_MAX_BATCH: usize = 16;

/// Engine policies plus the collaborator surface (build command, annotation
/// names, output directory). Built either from CLI flags or from a JSON file
/// carrying the same keys.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) build_command: String,
    pub(crate) nullable_annotation: String,
    pub(crate) initializer_annotation: String,
    pub(crate) out_dir: PathBuf,
    pub(crate) depth: u32,
    pub(crate) bailout: bool,
    pub(crate) use_cache: bool,
    pub(crate) optimized: bool,
    pub(crate) chain: bool,
    pub(crate) preserve_format: bool,
    pub(crate) dry_run: bool,
    pub(crate) max_batch: usize,
    pub(crate) build_timeout: Option<Duration>,
}

impl Config {
    /// Load from a JSON file. Nested keys use the `ANNOTATION` object, e.g.
    /// `{"ANNOTATION": {"NULLABLE": "...", "INITIALIZER": "..."}}`; every
    /// policy key is optional except `BUILD_COMMAND`.
    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let json: Value = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        let build_command = string_key(&json, &["BUILD_COMMAND"])
            .context("config is missing BUILD_COMMAND")?;
        let nullable_annotation = string_key(&json, &["ANNOTATION", "NULLABLE"])
            .unwrap_or_else(|_| DEFAULT_NULLABLE_ANNOTATION.to_string());
        let initializer_annotation = string_key(&json, &["ANNOTATION", "INITIALIZER"])
            .context("config is missing ANNOTATION.INITIALIZER")?;
        let out_dir = PathBuf::from(
            string_key(&json, &["OUTPUT_DIR"]).context("config is missing OUTPUT_DIR")?,
        );

        Ok(Config {
            build_command,
            nullable_annotation,
            initializer_annotation,
            out_dir,
            depth: u64_key(&json, &["DEPTH"]).unwrap_or(DEFAULT_DEPTH as u64) as u32,
            bailout: bool_key(&json, &["BAILOUT"]).unwrap_or(true),
            use_cache: bool_key(&json, &["CACHE"]).unwrap_or(true),
            optimized: bool_key(&json, &["OPTIMIZED"]).unwrap_or(true),
            chain: bool_key(&json, &["CHAIN"]).unwrap_or(false),
            preserve_format: bool_key(&json, &["FORMAT"]).unwrap_or(false),
            dry_run: bool_key(&json, &["DRY_RUN"]).unwrap_or(false),
            max_batch: u64_key(&json, &["MAX_BATCH"]).unwrap_or(DEFAULT_MAX_BATCH as u64)
                as usize,
            build_timeout: u64_key(&json, &["BUILD_TIMEOUT_SECONDS"])
                .ok()
                .map(Duration::from_secs),
        })
    }

    pub(crate) fn fixes_path(&self) -> PathBuf {
        self.out_dir.join("fixes.tsv")
    }

    pub(crate) fn errors_path(&self) -> PathBuf {
        self.out_dir.join("errors.tsv")
    }

    pub(crate) fn method_info_path(&self) -> PathBuf {
        self.out_dir.join("method_info.tsv")
    }

    pub(crate) fn call_graph_path(&self) -> PathBuf {
        self.out_dir.join("call_graph.tsv")
    }

    pub(crate) fn field_graph_path(&self) -> PathBuf {
        self.out_dir.join("field_graph.tsv")
    }

    pub(crate) fn worklist_path(&self) -> PathBuf {
        self.out_dir.join("worklist.tsv")
    }

    pub(crate) fn applied_path(&self) -> PathBuf {
        self.out_dir.join("applied.tsv")
    }

    pub(crate) fn report_path(&self) -> PathBuf {
        self.out_dir.join("report.json")
    }

    /// Files each build must regenerate for the round to proceed.
    pub(crate) fn required_outputs(&self) -> Vec<PathBuf> {
        vec![
            self.fixes_path(),
            self.errors_path(),
            self.method_info_path(),
            self.call_graph_path(),
            self.field_graph_path(),
        ]
    }
}

fn lookup<'a>(json: &'a Value, keys: &[&str]) -> Result<&'a Value> {
    let mut current = json;
    for key in keys {
        current = current
            .get(key)
            .with_context(|| format!("missing key {}", keys.join(".")))?;
    }
    Ok(current)
}

fn string_key(json: &Value, keys: &[&str]) -> Result<String> {
    let value = lookup(json, keys)?;
    value
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("key {} is not a string", keys.join(".")))
}

fn u64_key(json: &Value, keys: &[&str]) -> Result<u64> {
    let value = lookup(json, keys)?;
    value
        .as_u64()
        .with_context(|| format!("key {} is not a number", keys.join(".")))
}

fn bool_key(json: &Value, keys: &[&str]) -> Result<bool> {
    let value = lookup(json, keys)?;
    value
        .as_bool()
        .with_context(|| format!("key {} is not a boolean", keys.join(".")))
}
