use crate::trace::{ExpansionTrace, PassKind, TraceResult, TraceStep};

use super::{ExpandError, PromptGenerator};

impl PromptGenerator {
    /// Expand `template` into one prompt, recording every pass
    pub fn generate_prompt_with_trace(&mut self, template: &str) -> Result<TraceResult, ExpandError> {
        self.trace = Some(ExpansionTrace::new(template));
        let result = self.generate_prompt(template);
        let trace = self.trace.take();

        let output = result?;
        let trace = trace.unwrap_or_else(|| ExpansionTrace::new(template));
        Ok(TraceResult::new(output, trace))
    }

    /// Record a finished pass when tracing
    pub(super) fn trace_step(
        &mut self,
        pass: PassKind,
        outer_iteration: usize,
        inner_iteration: Option<usize>,
        text: &str,
        changed: bool,
    ) {
        if let Some(trace) = self.trace.as_mut() {
            trace.add_step(TraceStep {
                pass,
                outer_iteration,
                inner_iteration,
                text: text.to_string(),
                changed,
            });
        }
    }
}
