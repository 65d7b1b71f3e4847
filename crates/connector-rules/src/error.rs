use std::path::PathBuf;

/// Failure to load a single rule table.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("rule source not found: {path}")]
    MissingSource { path: PathBuf },

    #[error("failed to read rule source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule source {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl RulesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Fatal errors raised by [`crate::validate_connector_config`].
///
/// Field-level policy violations are never errors; they are reported inside
/// [`crate::ValidationResult`].
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error(
        "cannot determine connector type from connector.class: '{value}'. Must contain 'Source' or 'Sink'"
    )]
    UnknownConnectorClass { value: String },

    #[error("invalid connector type: '{value}'. Must be 'source' or 'sink'")]
    InvalidConnectorType { value: String },

    #[error("failed to load validation rules from {rules_dir}: {failed}")]
    RulesUnavailable { rules_dir: PathBuf, failed: String },
}
