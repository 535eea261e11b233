/// Trace of the rewrite passes behind one generated prompt
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rewrite a pass applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    /// Combination pass: {a|b}
    Combination,

    /// Wildcard pass: __name__
    Wildcard,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Combination => write!(f, "combination"),
            PassKind::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// The text after one rewrite pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceStep {
    pub pass: PassKind,

    /// 1-based iteration of the outer loop
    pub outer_iteration: usize,

    /// 1-based iteration of the combination loop (combination passes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_iteration: Option<usize>,

    /// Text produced by the pass
    pub text: String,

    /// Whether the pass rewrote anything
    pub changed: bool,
}

/// Every pass applied to one template, in order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpansionTrace {
    pub template: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TraceStep>,
}

impl ExpansionTrace {
    pub fn new(template: impl Into<String>) -> Self {
        ExpansionTrace {
            template: template.into(),
            steps: Vec::new(),
        }
    }

    pub fn add_step(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    /// Number of passes of the given kind
    pub fn count(&self, pass: PassKind) -> usize {
        self.steps.iter().filter(|step| step.pass == pass).count()
    }
}

/// Result type that includes trace information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// The final output
    pub output: String,

    /// The passes that produced it
    pub trace: ExpansionTrace,
}

impl TraceResult {
    pub fn new(output: String, trace: ExpansionTrace) -> Self {
        TraceResult { output, trace }
    }
}
