/// Template expander - rewrites a template until it stops changing
mod error;
mod trace_impl;

pub use error::ExpandError;

use crate::ast::Segment;
use crate::config::ExpanderConfig;
use crate::loader::WildcardLookup;
use crate::parser;
use crate::random::RandomStream;
use crate::span::Spanned;
use crate::trace::{ExpansionTrace, PassKind};
use crate::{combination, wildcard};
use std::sync::Arc;
use tracing::debug;

/// Expands one template into random prompts
///
/// Each prompt runs the template through two nested fixed-point loops. The
/// inner loop resolves combinations until none are left, the outer loop then
/// resolves wildcards once and starts over, until a full cycle changes
/// nothing. Both loops are bounded by `max_recursions`.
pub struct PromptGenerator {
    template: String,
    lookup: Arc<dyn WildcardLookup>,
    rng: RandomStream,
    config: ExpanderConfig,
    trace: Option<ExpansionTrace>,
}

impl PromptGenerator {
    /// Create a generator; the random stream is chosen from `config`
    pub fn new(
        template: impl Into<String>,
        lookup: Arc<dyn WildcardLookup>,
        config: ExpanderConfig,
    ) -> Self {
        let rng = RandomStream::from_config(&config);
        PromptGenerator {
            template: template.into(),
            lookup,
            rng,
            config,
            trace: None,
        }
    }

    /// Replace the random stream chosen at construction
    pub fn with_random_stream(mut self, rng: RandomStream) -> Self {
        self.rng = rng;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Generate `count` independent prompts from the generator's template
    pub fn generate(&mut self, count: usize) -> Result<Vec<String>, ExpandError> {
        let template = self.template.clone();
        (0..count)
            .map(|_| self.generate_prompt(&template))
            .collect()
    }

    /// Expand `template` into one prompt
    pub fn generate_prompt(&mut self, template: &str) -> Result<String, ExpandError> {
        let limit = self.config.max_recursions;
        let mut text = template.to_string();
        let mut outer = 0;

        loop {
            outer += 1;
            if outer > limit {
                return Err(ExpandError::RecursionExceeded {
                    limit,
                    pass: PassKind::Wildcard,
                    text,
                });
            }
            let prev_outer = text.clone();

            let mut inner = 0;
            loop {
                inner += 1;
                if inner > limit {
                    return Err(ExpandError::RecursionExceeded {
                        limit,
                        pass: PassKind::Combination,
                        text,
                    });
                }

                let next = self.pick_variants(&text)?;
                let changed = next != text;
                debug!(outer, inner, prompt = %next, "Combination pass");
                self.trace_step(PassKind::Combination, outer, Some(inner), &next, changed);
                if !changed {
                    break;
                }
                text = next;
            }

            text = self.pick_wildcards(&text);
            let changed = text != prev_outer;
            debug!(outer, prompt = %text, "Wildcard pass");
            self.trace_step(PassKind::Wildcard, outer, None, &text, changed);
            if !changed {
                return Ok(text);
            }
        }
    }

    /// Resolve every combination expression in `text` once
    pub fn pick_variants(&mut self, text: &str) -> Result<String, ExpandError> {
        let segments =
            parser::parse_combinations(text).map_err(|source| ExpandError::MalformedExpression {
                source,
                text: text.to_string(),
            })?;
        Ok(self.render(segments))
    }

    /// Resolve every wildcard token in `text` once
    pub fn pick_wildcards(&mut self, text: &str) -> String {
        let segments = parser::parse_wildcards(text);
        self.render(segments)
    }

    fn render(&mut self, segments: Vec<Spanned<Segment>>) -> String {
        let mut output = String::new();
        for segment in segments {
            match segment.value {
                Segment::Literal(text) => output.push_str(&text),
                Segment::Combination(combination) => output.push_str(&combination::resolve(
                    &combination,
                    &self.config,
                    self.lookup.as_ref(),
                    &mut self.rng,
                )),
                Segment::Wildcard(name) => {
                    output.push_str(&wildcard::resolve(&name, self.lookup.as_ref(), &mut self.rng))
                }
            }
        }
        output
    }
}
