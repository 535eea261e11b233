/// Dynamic prompts - random expansion of prompt templates
///
/// Templates mix literal text with two kinds of choice points:
///
/// - combinations, `{red|green|blue}`, optionally with a quantity and a
///   joiner: `{2$$and$$red|green|blue}` picks two distinct colors and joins
///   them with ` and `
/// - wildcards, `__colors__`, replaced by a phrase from an external
///   [`WildcardLookup`]
///
/// # Example
///
/// ```
/// use dynprompt::generate_with_seed;
///
/// let prompts = generate_with_seed("a {1$$red|blue} ball", 3, 42, None).unwrap();
/// assert_eq!(prompts.len(), 3);
/// assert!(prompts.iter().all(|p| p == "a red ball" || p == "a blue ball"));
/// ```
pub mod ast;
pub mod combination;
pub mod config;
pub mod diagnostic;
pub mod expander;
pub mod loader;
pub mod parser;
pub mod random;
pub mod span;
pub mod trace;
pub mod wildcard;

use std::sync::Arc;

/// Re-export main types for convenience
pub use ast::{Combination, QuantitySpec, Segment};
pub use config::{ConfigError, ExpanderConfig};
pub use expander::{ExpandError, PromptGenerator};
pub use loader::{
    ChainWildcards, FolderWildcards, InMemoryWildcards, LoadError, WildcardLookup, WildcardSource,
};
pub use parser::ParseError;
pub use random::{RandomStream, SharedRng};
pub use trace::{ExpansionTrace, PassKind, TraceResult, TraceStep};

/// Check that every combination in a template parses
///
/// Only the template as written is checked; wildcard phrases are not
/// loaded, so combinations they introduce are not covered.
///
/// # Example
/// ```
/// use dynprompt::validate;
///
/// assert!(validate("{2$$a|b|c} and __color__").is_ok());
/// assert!(validate("{lots$$a|b}").is_err());
/// ```
pub fn validate(template: &str) -> Result<(), ParseError> {
    parser::parse_combinations(template).map(|_| ())
}

/// Generate `count` prompts from a template with a seed
///
/// This is a convenience function for reproducible output. Without a
/// lookup, every wildcard resolves to an empty string.
pub fn generate_with_seed(
    template: &str,
    count: usize,
    seed: u64,
    lookup: Option<Arc<dyn WildcardLookup>>,
) -> Result<Vec<String>, ExpandError> {
    let lookup =
        lookup.unwrap_or_else(|| Arc::new(InMemoryWildcards::new()) as Arc<dyn WildcardLookup>);
    let config = ExpanderConfig::new().with_seed(seed);
    PromptGenerator::new(template, lookup, config).generate(count)
}

/// Generate one prompt with a seed and return it with its expansion trace
pub fn generate_with_seed_and_trace(
    template: &str,
    seed: u64,
    lookup: Option<Arc<dyn WildcardLookup>>,
) -> Result<TraceResult, ExpandError> {
    let lookup =
        lookup.unwrap_or_else(|| Arc::new(InMemoryWildcards::new()) as Arc<dyn WildcardLookup>);
    let config = ExpanderConfig::new().with_seed(seed);
    PromptGenerator::new(template, lookup, config).generate_prompt_with_trace(template)
}
