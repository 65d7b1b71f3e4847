//! Rule-driven validation of MongoDB/Kafka connector configurations.
//!
//! Field policies live in CSV rule tables (one directive per field name).
//! A [`RuleStore`] loads one or more tables with last-wins override and
//! evaluates connector configurations against them, producing a
//! [`ValidationResult`]. [`validate_connector_config`] picks the general and
//! connector-specific tables from the `connector.class` field and runs the
//! whole thing in one call.
//!
//! ```rust,ignore
//! use connector_rules::{RuleSource, RuleStore};
//!
//! let mut store = RuleStore::new();
//! store.load_rule_sources(&[
//!     RuleSource::new("rules/general_managed_configs.csv", "general"),
//!     RuleSource::new("rules/managed_sink_configs.csv", "sink"),
//! ]);
//! let result = store.evaluate(&config);
//! ```
#![deny(unsafe_code)]

pub mod action;
pub mod config;
pub mod connector;
pub mod error;
pub mod evaluate;
pub mod loader;
pub mod paths;
pub mod rule;
pub mod store;

pub use crate::action::{Directive, ValidationAction};
pub use crate::config::{ConfigLookup, value_text};
pub use crate::connector::{
    CONNECTOR_CLASS_FIELD, ConnectorType, load_connector_rules, validate_connector_config,
};
pub use crate::error::{RulesError, ValidateError};
pub use crate::evaluate::{ValidationResult, evaluate};
pub use crate::loader::{parse_rule_table, read_rule_file};
pub use crate::paths::{RULES_ENV_VAR, rules_root};
pub use crate::rule::{RuleMeta, ValidationRule};
pub use crate::store::{RuleSource, RuleStore};
