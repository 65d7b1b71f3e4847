//! Validation rules loaded from rule tables.

use serde::{Deserialize, Serialize};

use crate::action::{Directive, ValidationAction};

/// Documentation-only columns of a rule table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMeta {
    pub subsection: Option<String>,
    pub definition: Option<String>,
    pub importance: Option<String>,
    /// Raw `valid_values` cell, as written in the table.
    pub valid_values: Option<String>,
}

/// One directive for one field name.
///
/// `default_value` is only set for [`ValidationAction::AllowDefault`] and
/// `allowed_values` only for [`ValidationAction::AllowValues`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub name: String,
    pub action: ValidationAction,
    pub default_value: Option<String>,
    pub allowed_values: Option<Vec<String>>,
    #[serde(default)]
    pub meta: RuleMeta,
}

impl ValidationRule {
    fn bare(name: impl Into<String>, action: ValidationAction) -> Self {
        Self {
            name: name.into(),
            action,
            default_value: None,
            allowed_values: None,
            meta: RuleMeta::default(),
        }
    }

    pub fn require(name: impl Into<String>) -> Self {
        Self::bare(name, ValidationAction::Require)
    }

    pub fn ignore(name: impl Into<String>) -> Self {
        Self::bare(name, ValidationAction::Ignore)
    }

    pub fn disallow(name: impl Into<String>) -> Self {
        Self::bare(name, ValidationAction::Disallow)
    }

    pub fn allow(name: impl Into<String>) -> Self {
        Self::bare(name, ValidationAction::Allow)
    }

    /// `ALLOW default` rule. A `None` default disables the value check.
    pub fn allow_default(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            default_value,
            ..Self::bare(name, ValidationAction::AllowDefault)
        }
    }

    pub fn allow_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::bare(name, ValidationAction::AllowValues)
        }
    }

    /// Build a rule from a parsed directive, keeping only the attributes the
    /// action uses.
    pub fn from_directive(
        name: impl Into<String>,
        directive: Directive,
        default_value: Option<String>,
    ) -> Self {
        let rule = Self::bare(name, directive.action);
        match directive.action {
            ValidationAction::AllowDefault => Self {
                default_value,
                ..rule
            },
            ValidationAction::AllowValues => Self {
                allowed_values: directive.allowed_values,
                ..rule
            },
            _ => rule,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }

    /// The value constraint in display form (`latest`, `earliest, latest`),
    /// if the rule has one.
    pub fn constraint(&self) -> Option<String> {
        match self.action {
            ValidationAction::AllowDefault => self.default_value.clone(),
            ValidationAction::AllowValues => self.allowed_values.as_ref().map(|v| v.join(", ")),
            _ => None,
        }
    }
}
