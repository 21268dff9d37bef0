use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Parser settings, loadable from a JSON file such as
/// `{ "parseMetadata": false, "strictFeatures": true }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Parse header keywords into [`Metadata`](crate::genbank::Metadata)
    /// instead of skipping them.
    pub parse_metadata: bool,
    /// Fail on the first malformed feature instead of skipping it.
    pub strict_features: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            parse_metadata: true,
            strict_features: false,
        }
    }
}

impl ParserConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
