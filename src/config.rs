/// Construction-time options for prompt generators
use crate::ast::QuantitySpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Text placed between drawn variants when a combination names no joiner
pub const DEFAULT_COMBO_JOINER: &str = ",";

/// Quantity used when a combination has no quantity section
pub const DEFAULT_NUM_COMBINATIONS: QuantitySpec = QuantitySpec::ANY;

/// Bound on each of the two rewrite loops
pub const MAX_RECURSIONS: usize = 20;

pub const UNLINK_SEED_FROM_PROMPT: bool = false;

/// Most variants a single combination may draw
pub const MAX_COMBINATIONS: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options for a [`PromptGenerator`](crate::PromptGenerator)
///
/// Every field has a default, so a config file only needs to list the
/// options it changes:
///
/// ```
/// use dynprompt::ExpanderConfig;
///
/// let config = ExpanderConfig::from_json_str(r#"{ "seed": 7, "max_recursions": 5 }"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.default_combo_joiner, ",");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Seed for the generator's private random stream
    pub seed: Option<u64>,
    /// Draw from the process-wide random stream instead of a private one.
    /// The seed is ignored in this mode.
    pub unlink_seed_from_prompt: bool,
    pub default_combo_joiner: String,
    pub default_num_combinations: QuantitySpec,
    pub max_recursions: usize,
    /// Larger drawn quantities are lowered to this, with a warning
    pub max_combinations: usize,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        ExpanderConfig {
            seed: None,
            unlink_seed_from_prompt: UNLINK_SEED_FROM_PROMPT,
            default_combo_joiner: DEFAULT_COMBO_JOINER.to_string(),
            default_num_combinations: DEFAULT_NUM_COMBINATIONS,
            max_recursions: MAX_RECURSIONS,
            max_combinations: MAX_COMBINATIONS,
        }
    }
}

impl ExpanderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn unlinked(mut self, unlink: bool) -> Self {
        self.unlink_seed_from_prompt = unlink;
        self
    }

    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.default_combo_joiner = joiner.into();
        self
    }

    pub fn with_default_quantity(mut self, quantity: QuantitySpec) -> Self {
        self.default_num_combinations = quantity;
        self
    }

    pub fn with_max_recursions(mut self, max_recursions: usize) -> Self {
        self.max_recursions = max_recursions;
        self
    }

    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
