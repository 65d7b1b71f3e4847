//! Rules directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the rules directory.
pub const RULES_ENV_VAR: &str = "CONNECTOR_RULES_DIR";

/// Get the rules root directory.
///
/// Resolution order:
/// 1. `CONNECTOR_RULES_DIR` environment variable
/// 2. `rules/` directory relative to workspace root
pub fn rules_root() -> PathBuf {
    if let Ok(root) = std::env::var(RULES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rules")
}
