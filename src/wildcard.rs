//! Wildcard resolution
//!
//! Pools the phrases of every source matching a wildcard name and draws one.
//! Missing or empty wildcards are not errors: they resolve to an empty
//! string and are logged, so one bad wildcard does not abort a prompt.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{trace, warn};

use crate::loader::WildcardLookup;

/// Every phrase available under a wildcard name, in sorted order
///
/// The phrases of all matching sources are pooled, so a glob name draws
/// from several files at once. Failures and empty pools are logged and
/// give an empty list.
pub fn phrases(name: &str, lookup: &dyn WildcardLookup) -> Vec<String> {
    let sources = match lookup.matching(name) {
        Ok(sources) => sources,
        Err(e) => {
            warn!(wildcard = name, error = %e, "Could not look up wildcard");
            return Vec::new();
        }
    };

    if sources.is_empty() {
        warn!(wildcard = name, "No wildcard matches name");
        return Vec::new();
    }

    // Ordered so that a seeded stream always picks the same phrase
    let pool: BTreeSet<&str> = sources
        .iter()
        .flat_map(|source| source.phrases().iter().map(String::as_str))
        .collect();

    if pool.is_empty() {
        warn!(wildcard = name, "Could not find any phrases for wildcard");
    }
    pool.into_iter().map(str::to_string).collect()
}

/// Resolve a wildcard name to one phrase, or `""` if none is available
pub fn resolve<R: Rng>(name: &str, lookup: &dyn WildcardLookup, rng: &mut R) -> String {
    let pool = phrases(name, lookup);
    match pool.choose(rng) {
        Some(phrase) => {
            trace!(wildcard = name, phrase = phrase.as_str(), candidates = pool.len(), "Picked wildcard phrase");
            phrase.clone()
        }
        None => String::new(),
    }
}
