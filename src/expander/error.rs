use crate::parser::ParseError;
use crate::span::Span;
use crate::trace::PassKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// A combination in `text` could not be parsed. `text` is the prompt as
    /// it stood when the pass ran, which may already be partly expanded.
    #[error("Malformed expression: {source}")]
    MalformedExpression { source: ParseError, text: String },

    /// A rewrite loop hit its bound without reaching a fixed point
    #[error("Too many recursions ({limit}) in the {pass} pass, the prompt never stopped changing")]
    RecursionExceeded {
        limit: usize,
        pass: PassKind,
        text: String,
    },
}

impl ExpandError {
    /// Get the span of the offending expression, if there is one
    pub fn span(&self) -> Option<Span> {
        match self {
            ExpandError::MalformedExpression { source, .. } => Some(source.span()),
            ExpandError::RecursionExceeded { .. } => None,
        }
    }

    /// The prompt text the error was raised on
    pub fn text(&self) -> &str {
        match self {
            ExpandError::MalformedExpression { text, .. } => text,
            ExpandError::RecursionExceeded { text, .. } => text,
        }
    }
}
