//! Rule store with last-wins override across rule sources.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::action::ValidationAction;
use crate::config::ConfigLookup;
use crate::error::RulesError;
use crate::evaluate::{ValidationResult, evaluate};
use crate::loader::read_rule_file;
use crate::rule::ValidationRule;

/// A rule table on disk plus the label it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    pub path: PathBuf,
    pub label: String,
}

impl RuleSource {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    /// Source labelled with its file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, label }
    }
}

/// Field name to effective rule, in first-load order.
///
/// Sources are merged in the order they are loaded. When a field name is
/// already present, the new rule replaces the old one wholesale (no
/// attribute-level merge) and keeps its position; the source attribution is
/// updated to the new label.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: IndexMap<String, ValidationRule>,
    sources: HashMap<String, String>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `rules` attributed to `label`, later rules winning. Returns the
    /// number of rules merged.
    pub fn merge<I>(&mut self, rules: I, label: &str) -> usize
    where
        I: IntoIterator<Item = ValidationRule>,
    {
        let mut merged = 0;
        for rule in rules {
            self.insert(rule, label);
            merged += 1;
        }
        merged
    }

    /// Insert a single rule, replacing any rule for the same field name.
    pub fn insert(&mut self, rule: ValidationRule, label: &str) {
        let name = rule.name.clone();
        if let Some(previous) = self.sources.insert(name.clone(), label.to_string()) {
            if previous != label {
                debug!(field = %name, from = %previous, to = %label, "rule overridden");
            }
        }
        self.rules.insert(name, rule);
    }

    /// Load one rule table, reporting why it failed.
    ///
    /// The table is parsed completely before anything is merged, so a
    /// failed load leaves the store untouched.
    pub fn try_load_rule_source(&mut self, path: &Path, label: &str) -> Result<usize, RulesError> {
        let rules = read_rule_file(path)?;
        let merged = self.merge(rules, label);
        debug!(source = %label, path = %path.display(), rules = merged, "loaded rule source");
        Ok(merged)
    }

    /// Load one rule table. Returns `false` if the file does not exist or
    /// cannot be read; the failure is logged, never raised.
    pub fn load_rule_source(&mut self, path: &Path, label: &str) -> bool {
        match self.try_load_rule_source(path, label) {
            Ok(_) => true,
            Err(RulesError::MissingSource { path }) => {
                debug!(source = %label, path = %path.display(), "rule source not found");
                false
            }
            Err(error) => {
                warn!(source = %label, %error, "error loading rule source");
                false
            }
        }
    }

    /// Load several rule tables in order. Every source is attempted; the
    /// result is `true` only if all of them loaded.
    pub fn load_rule_sources(&mut self, sources: &[RuleSource]) -> bool {
        let mut all_loaded = true;
        for source in sources {
            if !self.load_rule_source(&source.path, &source.label) {
                all_loaded = false;
            }
        }
        all_loaded
    }

    /// Evaluate a configuration against every loaded rule.
    pub fn evaluate<C: ConfigLookup + ?Sized>(&self, config: &C) -> ValidationResult {
        evaluate(self, config)
    }

    pub fn get(&self, name: &str) -> Option<&ValidationRule> {
        self.rules.get(name)
    }

    /// Label of the source that supplied the effective rule for `name`.
    pub fn source_of(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in first-load order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.values()
    }

    fn names_with(&self, action: ValidationAction) -> Vec<String> {
        self.iter()
            .filter(|rule| rule.action == action)
            .map(|rule| rule.name.clone())
            .collect()
    }

    pub fn required_fields(&self) -> Vec<String> {
        self.names_with(ValidationAction::Require)
    }

    pub fn disallowed_fields(&self) -> Vec<String> {
        self.names_with(ValidationAction::Disallow)
    }

    /// Number of rules per action. Actions with no rules are omitted.
    pub fn action_summary(&self) -> BTreeMap<ValidationAction, usize> {
        let mut summary = BTreeMap::new();
        for rule in self.iter() {
            *summary.entry(rule.action).or_insert(0) += 1;
        }
        summary
    }
}
