//! Batch validation of connector configuration files.
//!
//! Each file is validated independently. A file that cannot be parsed or
//! whose connector type cannot be determined is skipped with a reason; only
//! rule tables that fail to load abort the batch.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use connector_rules::{
    ConnectorType, RuleStore, ValidateError, ValidationResult, load_connector_rules,
};

/// What happened to one configuration file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Accepted,
    Rejected { result: ValidationResult },
    Unreadable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// File name, without its directory.
    pub file: String,
    pub connector_type: Option<ConnectorType>,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, FileOutcome::Accepted)
    }

    /// Reasons the file was skipped; empty when accepted.
    pub fn issues(&self) -> Vec<String> {
        match &self.outcome {
            FileOutcome::Accepted => Vec::new(),
            FileOutcome::Rejected { result } => result.error_messages.clone(),
            FileOutcome::Unreadable { reason } => vec![reason.clone()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn accepted_count(&self) -> usize {
        self.files.iter().filter(|file| file.is_accepted()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.len() - self.accepted_count()
    }

    pub fn has_skipped(&self) -> bool {
        self.skipped_count() > 0
    }
}

/// Expand the given paths into `.json` files. Directories are scanned one
/// level deep; results are sorted and deduplicated.
pub fn collect_config_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries =
                fs::read_dir(path).with_context(|| format!("read dir: {}", path.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("read dir: {}", path.display()))?;
                let candidate = entry.path();
                if candidate.is_file() && is_json_file(&candidate) {
                    files.push(candidate);
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("path not found: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_config(path: &Path) -> std::result::Result<Map<String, Value>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(config)) => Ok(config),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// Validates many files, loading each connector type's rules once.
#[derive(Debug)]
pub struct BatchValidator {
    rules_dir: PathBuf,
    connector_type: Option<ConnectorType>,
    stores: HashMap<ConnectorType, RuleStore>,
}

impl BatchValidator {
    /// `connector_type` forces the type for every file; `None` detects it
    /// per file from `connector.class`.
    pub fn new(rules_dir: impl Into<PathBuf>, connector_type: Option<ConnectorType>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            connector_type,
            stores: HashMap::new(),
        }
    }

    /// Rule store for `connector_type`, loaded on first use.
    pub fn store_for(&mut self, connector_type: ConnectorType) -> Result<&RuleStore, ValidateError> {
        match self.stores.entry(connector_type) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let store = load_connector_rules(&self.rules_dir, connector_type)?;
                info!(%connector_type, rules = store.len(), "loaded connector rules");
                Ok(&*entry.insert(store))
            }
        }
    }

    /// Validate one configuration. Fails only if rule tables cannot be
    /// loaded.
    pub fn validate_config(
        &mut self,
        file: &str,
        config: &Map<String, Value>,
    ) -> Result<FileReport, ValidateError> {
        let connector_type = match self.connector_type {
            Some(connector_type) => connector_type,
            None => match ConnectorType::detect(config) {
                Ok(connector_type) => connector_type,
                Err(error) => {
                    return Ok(FileReport {
                        file: file.to_string(),
                        connector_type: None,
                        outcome: FileOutcome::Unreadable {
                            reason: error.to_string(),
                        },
                    });
                }
            },
        };
        debug!(file, %connector_type, "validating");

        let result = self.store_for(connector_type)?.evaluate(config);
        let outcome = if result.is_valid {
            FileOutcome::Accepted
        } else {
            FileOutcome::Rejected { result }
        };
        Ok(FileReport {
            file: file.to_string(),
            connector_type: Some(connector_type),
            outcome,
        })
    }

    pub fn validate_file(&mut self, path: &Path) -> Result<FileReport> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let report = match read_config(path) {
            Ok(config) => self
                .validate_config(&file, &config)
                .with_context(|| format!("validate {}", path.display()))?,
            Err(reason) => FileReport {
                file,
                connector_type: None,
                outcome: FileOutcome::Unreadable { reason },
            },
        };
        if !report.is_accepted() {
            warn!(file = %report.file, issues = report.issues().len(), "skipping configuration");
        }
        Ok(report)
    }

    pub fn validate_files(&mut self, files: &[PathBuf]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for path in files {
            report.files.push(self.validate_file(path)?);
        }
        info!(
            files = report.files.len(),
            accepted = report.accepted_count(),
            skipped = report.skipped_count(),
            "validation finished"
        );
        Ok(report)
    }
}
