//! Combination resolution
//!
//! Turns one parsed combination expression into text: resolve the quantity
//! bounds, draw a quantity, sample that many variants and join them.
//!
//! A variant that is a lone wildcard token (`{2$$__color__|__size__}`)
//! stands for every phrase of that wildcard. Such combinations draw
//! phrases rather than variants and never repeat a phrase.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

use crate::ast::{Combination, QuantitySpec, Segment};
use crate::config::ExpanderConfig;
use crate::loader::WildcardLookup;
use crate::{parser, wildcard};

/// Consecutive duplicate picks after which phrase collection gives up
pub const MAX_SELECTION_ITERATIONS: usize = 100;

/// Inclusive `(low, high)` bounds for a quantity spec.
///
/// Missing range bounds default to 0 and `num_variants`; the result is
/// ordered, so `3-1` and `1-3` give the same bounds.
pub fn quantity_bounds(spec: QuantitySpec, num_variants: usize) -> (i64, i64) {
    let default_high = i64::try_from(num_variants).unwrap_or(i64::MAX);
    let (low, high) = match spec {
        QuantitySpec::Exact(k) => (k, k),
        QuantitySpec::Range { low, high } => (low.unwrap_or(0), high.unwrap_or(default_high)),
    };
    (low.min(high), low.max(high))
}

/// Draw a quantity uniformly from `bounds`, capped at `limit`.
///
/// Returns `None` for a negative quantity.
pub fn draw_quantity<R: Rng>(bounds: (i64, i64), limit: usize, rng: &mut R) -> Option<usize> {
    let (low, high) = (bounds.0.min(bounds.1), bounds.0.max(bounds.1));
    let quantity = rng.gen_range(low..=high);

    let Ok(quantity) = usize::try_from(quantity) else {
        warn!(quantity, "Cannot draw a negative number of variants");
        return None;
    };

    if quantity > limit {
        warn!(quantity, limit, "Quantity exceeds max_combinations, drawing fewer variants");
        return Some(limit);
    }
    Some(quantity)
}

/// Sample `quantity` variants.
///
/// Quantities up to the number of variants sample without replacement, in
/// random order. Larger quantities sample with replacement.
pub fn draw<'v, R: Rng>(variants: &'v [String], quantity: usize, rng: &mut R) -> Vec<&'v str> {
    if quantity == 0 {
        trace!("Drew zero variants");
        return Vec::new();
    }

    if variants.is_empty() {
        warn!(quantity, "Cannot draw from a combination with no variants");
        return Vec::new();
    }

    let picked: Vec<&str> = if quantity > variants.len() {
        (0..quantity)
            .filter_map(|_| variants.choose(&mut *rng))
            .map(String::as_str)
            .collect()
    } else {
        index::sample(rng, variants.len(), quantity)
            .into_iter()
            .map(|i| variants[i].as_str())
            .collect()
    };

    trace!(quantity, ?picked, "Drew variants");
    picked
}

/// Collect up to `quantity` distinct phrases.
///
/// Each pick chooses an option uniformly, then a phrase of that option.
/// When fewer distinct phrases exist than requested, all of them are
/// collected.
pub fn collect_distinct<R: Rng>(options: &[Vec<String>], quantity: usize, rng: &mut R) -> Vec<String> {
    let available: BTreeSet<&str> = options.iter().flatten().map(String::as_str).collect();
    let target = quantity.min(available.len());
    if target < quantity {
        debug!(quantity, available = available.len(), "Fewer distinct phrases than requested");
    }

    let mut collected: Vec<String> = Vec::with_capacity(target);
    let mut misses = 0;
    while collected.len() < target {
        let Some(option) = options.choose(&mut *rng) else {
            break;
        };
        let phrase = match option.choose(&mut *rng) {
            Some(phrase) if !collected.contains(phrase) => phrase,
            _ => {
                misses += 1;
                if misses > MAX_SELECTION_ITERATIONS {
                    debug!(collected = collected.len(), target, "Gave up collecting distinct phrases");
                    break;
                }
                continue;
            }
        };

        misses = 0;
        collected.push(phrase.clone());
    }

    trace!(quantity, ?collected, "Collected phrases");
    collected
}

/// The wildcard name of a variant that is a single wildcard token
fn wildcard_name(variant: &str) -> Option<String> {
    match parser::parse_wildcards(variant.trim()).as_slice() {
        [segment] => match &segment.value {
            Segment::Wildcard(name) => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Candidate phrases per variant, or `None` when no variant is a wildcard.
///
/// A wildcard with no phrases keeps its token, so the wildcard pass still
/// reports it.
fn wildcard_options(variants: &[String], lookup: &dyn WildcardLookup) -> Option<Vec<Vec<String>>> {
    let names: Vec<Option<String>> = variants.iter().map(|v| wildcard_name(v)).collect();
    if names.iter().all(Option::is_none) {
        return None;
    }

    let options = variants
        .iter()
        .zip(names)
        .map(|(variant, name)| {
            let pool = name
                .map(|name| wildcard::phrases(&name, lookup))
                .unwrap_or_default();
            if pool.is_empty() {
                vec![variant.clone()]
            } else {
                pool
            }
        })
        .collect();
    Some(options)
}

/// Resolve a combination expression to its replacement text
pub fn resolve<R: Rng>(
    combination: &Combination,
    config: &ExpanderConfig,
    lookup: &dyn WildcardLookup,
    rng: &mut R,
) -> String {
    let spec = combination
        .quantity
        .unwrap_or(config.default_num_combinations);
    let joiner = combination
        .joiner
        .as_deref()
        .unwrap_or(&config.default_combo_joiner);
    let joiner = format!(" {} ", joiner);

    let bounds = quantity_bounds(spec, combination.variants.len());
    let Some(quantity) = draw_quantity(bounds, config.max_combinations, rng) else {
        return String::new();
    };

    match wildcard_options(&combination.variants, lookup) {
        Some(options) => collect_distinct(&options, quantity, rng).join(&joiner),
        None => draw(&combination.variants, quantity, rng).join(&joiner),
    }
}
