//! Evaluation of a configuration against a rule store.

use serde::{Deserialize, Serialize};

use crate::action::ValidationAction;
use crate::config::ConfigLookup;
use crate::rule::ValidationRule;
use crate::store::RuleStore;

/// Outcome of evaluating one configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Required fields that were absent, in rule order.
    pub missing_required: Vec<String>,
    /// Disallowed fields that were present, in rule order.
    pub disallowed_present: Vec<String>,
    /// Value violations first, then the aggregate missing/disallowed lines.
    pub error_messages: Vec<String>,
}

impl ValidationResult {
    pub fn issue_count(&self) -> usize {
        self.error_messages.len()
    }
}

fn only_supported(allowed: &str, field: &str) -> String {
    format!("Only {allowed} is supported for {field}")
}

/// Value check for `ALLOW default` and `ALLOW a, b` rules. `None` means the
/// field passes (absent, unconstrained, or matching).
fn value_violation<C: ConfigLookup + ?Sized>(rule: &ValidationRule, config: &C) -> Option<String> {
    let provided = config.field_text(&rule.name)?;
    let provided = provided.trim();
    match rule.action {
        ValidationAction::AllowDefault => {
            let default = rule.default_value.as_deref()?.trim();
            (provided != default).then(|| only_supported(default, &rule.name))
        }
        ValidationAction::AllowValues => {
            let allowed = rule.allowed_values.as_ref()?;
            (!allowed.iter().any(|value| value == provided))
                .then(|| only_supported(&allowed.join(", "), &rule.name))
        }
        _ => None,
    }
}

/// Apply every rule in `store` to `config`.
pub fn evaluate<C: ConfigLookup + ?Sized>(store: &RuleStore, config: &C) -> ValidationResult {
    let mut missing_required = Vec::new();
    let mut disallowed_present = Vec::new();
    let mut error_messages = Vec::new();

    for rule in store.iter() {
        match rule.action {
            ValidationAction::Require => {
                if !config.contains_field(&rule.name) {
                    missing_required.push(rule.name.clone());
                }
            }
            ValidationAction::Disallow => {
                if config.contains_field(&rule.name) {
                    disallowed_present.push(rule.name.clone());
                }
            }
            ValidationAction::AllowDefault | ValidationAction::AllowValues => {
                if let Some(message) = value_violation(rule, config) {
                    error_messages.push(message);
                }
            }
            ValidationAction::Ignore | ValidationAction::Allow => {}
        }
    }

    let is_valid =
        missing_required.is_empty() && disallowed_present.is_empty() && error_messages.is_empty();

    if !missing_required.is_empty() {
        error_messages.push(format!(
            "Missing required fields: {}",
            missing_required.join(", ")
        ));
    }
    if !disallowed_present.is_empty() {
        error_messages.push(format!(
            "The following fields are not supported: {}",
            disallowed_present.join(", ")
        ));
    }

    ValidationResult {
        is_valid,
        missing_required,
        disallowed_present,
        error_messages,
    }
}
