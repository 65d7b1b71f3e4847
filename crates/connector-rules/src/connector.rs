//! Connector-type detection and the one-call validation entry point.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigLookup;
use crate::error::ValidateError;
use crate::evaluate::ValidationResult;
use crate::paths::rules_root;
use crate::store::{RuleSource, RuleStore};

/// Configuration field whose class name decides the connector type.
pub const CONNECTOR_CLASS_FIELD: &str = "connector.class";

/// Rule table shared by every connector type. Always loaded first.
pub const GENERAL_RULES_FILE: &str = "general_managed_configs.csv";
pub const SOURCE_RULES_FILE: &str = "managed_source_configs.csv";
pub const SINK_RULES_FILE: &str = "managed_sink_configs.csv";

const GENERAL_LABEL: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorType {
    Source,
    Sink,
}

impl ConnectorType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
        }
    }

    /// File name of the type-specific rule table.
    pub fn rules_file(&self) -> &'static str {
        match self {
            Self::Source => SOURCE_RULES_FILE,
            Self::Sink => SINK_RULES_FILE,
        }
    }

    /// Detect the type from a connector class name by substring.
    ///
    /// `Source` is checked before `Sink`, so a class name containing both
    /// is treated as a source.
    pub fn from_connector_class(class: &str) -> Result<Self, ValidateError> {
        if class.contains("Source") {
            Ok(Self::Source)
        } else if class.contains("Sink") {
            Ok(Self::Sink)
        } else {
            Err(ValidateError::UnknownConnectorClass {
                value: class.to_string(),
            })
        }
    }

    /// Detect the type from the `connector.class` field of a configuration.
    /// A missing field is treated as an empty class name.
    pub fn detect<C: ConfigLookup + ?Sized>(config: &C) -> Result<Self, ValidateError> {
        let class = config
            .field_text(CONNECTOR_CLASS_FIELD)
            .unwrap_or_default();
        Self::from_connector_class(&class)
    }

    /// Rule sources for this type: the general table, then the specific one.
    pub fn rule_sources(&self, rules_dir: &Path) -> Vec<RuleSource> {
        vec![
            RuleSource::new(rules_dir.join(GENERAL_RULES_FILE), GENERAL_LABEL),
            RuleSource::new(rules_dir.join(self.rules_file()), self.label()),
        ]
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConnectorType {
    type Err = ValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(Self::Source),
            "sink" => Ok(Self::Sink),
            other => Err(ValidateError::InvalidConnectorType {
                value: other.to_string(),
            }),
        }
    }
}

/// Build a store from the general and type-specific tables in `rules_dir`.
///
/// Both tables must load; the specific table overrides the general one for
/// shared field names.
pub fn load_connector_rules(
    rules_dir: &Path,
    connector_type: ConnectorType,
) -> Result<RuleStore, ValidateError> {
    let mut store = RuleStore::new();
    let mut failed = Vec::new();
    for source in connector_type.rule_sources(rules_dir) {
        if !store.load_rule_source(&source.path, &source.label) {
            failed.push(source.label);
        }
    }
    if !failed.is_empty() {
        return Err(ValidateError::RulesUnavailable {
            rules_dir: rules_dir.to_path_buf(),
            failed: failed.join(", "),
        });
    }
    Ok(store)
}

/// Validate a connector configuration in one call.
///
/// The connector type is detected from `connector.class` unless given.
/// `rules_dir` defaults to [`rules_root`]. Detection errors are raised
/// before any rule table is read.
pub fn validate_connector_config<C: ConfigLookup + ?Sized>(
    config: &C,
    connector_type: Option<ConnectorType>,
    rules_dir: Option<&Path>,
) -> Result<ValidationResult, ValidateError> {
    let connector_type = match connector_type {
        Some(connector_type) => connector_type,
        None => ConnectorType::detect(config)?,
    };
    let rules_dir = rules_dir.map_or_else(rules_root, Path::to_path_buf);
    debug!(%connector_type, rules_dir = %rules_dir.display(), "validating connector config");

    let store = load_connector_rules(&rules_dir, connector_type)?;
    Ok(store.evaluate(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_type_by_substring() {
        assert_eq!(
            ConnectorType::from_connector_class("com.mongodb.kafka.connect.MongoSourceConnector")
                .unwrap(),
            ConnectorType::Source
        );
        assert_eq!(
            ConnectorType::from_connector_class("MongoDbAtlasSink").unwrap(),
            ConnectorType::Sink
        );
        assert_eq!(
            ConnectorType::from_connector_class("SourceToSinkBridge").unwrap(),
            ConnectorType::Source
        );
    }

    #[test]
    fn unknown_class_names_the_value() {
        let err = ConnectorType::from_connector_class("MongoConnector").unwrap_err();
        assert!(matches!(err, ValidateError::UnknownConnectorClass { .. }));
        assert!(err.to_string().contains("'MongoConnector'"));
    }

    #[test]
    fn missing_class_is_an_empty_value() {
        let config = serde_json::Map::new();
        let err = ConnectorType::detect(&config).unwrap_err();
        assert!(err.to_string().contains("''"));
    }

    #[test]
    fn explicit_type_parsing() {
        assert_eq!("source".parse::<ConnectorType>().unwrap(), ConnectorType::Source);
        assert_eq!("sink".parse::<ConnectorType>().unwrap(), ConnectorType::Sink);
        let err = "bogus".parse::<ConnectorType>().unwrap_err();
        assert!(err.to_string().contains("'bogus'"));
    }

    #[test]
    fn general_rules_come_first() {
        let sources = ConnectorType::Sink.rule_sources(Path::new("rules"));
        assert_eq!(sources[0].label, "general");
        assert!(sources[0].path.ends_with(GENERAL_RULES_FILE));
        assert_eq!(sources[1].label, "sink");
        assert!(sources[1].path.ends_with(SINK_RULES_FILE));
    }
}
