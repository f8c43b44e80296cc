//! History configuration.

use super::error::BuildError;
use serde::{Deserialize, Serialize};

/// Tunables for a history writer.
///
/// Missing fields take their defaults, so an empty JSON object is a valid
/// configuration.
///
/// # Example
///
/// ```rust
/// use rewind::builder::HistoryConfig;
///
/// let config = HistoryConfig::from_json(r#"{ "max_depth": 100 }"#).unwrap();
/// assert_eq!(config.max_depth, Some(100));
///
/// assert_eq!(HistoryConfig::default().max_depth, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo entries kept; the oldest are evicted first.
    /// `None` keeps every entry.
    pub max_depth: Option<usize>,
}

impl HistoryConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json).map_err(BuildError::InvalidConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations a writer cannot honor.
    pub fn validate(&self) -> Result<(), BuildError> {
        match self.max_depth {
            Some(0) => Err(BuildError::ZeroDepth),
            _ => Ok(()),
        }
    }
}
