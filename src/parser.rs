/// Scanners for combination and wildcard syntax
///
/// Each rewrite pass only looks for its own syntax: the combination scanner
/// treats wildcard tokens as literal text and vice versa. Spans in the
/// returned segments are byte offsets into the scanned text.
use crate::ast::*;
use crate::span::{Span, Spanned};
use thiserror::Error;

const SECTION_SEPARATOR: &str = "$$";
const VARIANT_SEPARATOR: char = '|';
const WILDCARD_DELIMITER: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Combination has {count} '$$' sections, expected at most 3, at position {}", .span.start)]
    TooManySections { count: usize, span: Span },

    #[error("Invalid quantity '{quantity}' at position {}", .span.start)]
    InvalidQuantity { quantity: String, span: Span },
}

impl ParseError {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            ParseError::TooManySections { span, .. } => *span,
            ParseError::InvalidQuantity { span, .. } => *span,
        }
    }
}

pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
    literal_start: usize,
    segments: Vec<Spanned<Segment>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            literal_start: 0,
            segments: Vec::new(),
        }
    }

    /// Split the input into literal text and combination expressions.
    ///
    /// A combination is an innermost `{...}` pair: the body may not contain
    /// braces, so in `{a|{b|c}}` only `{b|c}` is a combination on this pass.
    pub fn parse_combinations(mut self) -> Result<Vec<Spanned<Segment>>, ParseError> {
        let input = self.input;
        let bytes = input.as_bytes();

        while self.pos < bytes.len() {
            if bytes[self.pos] != b'{' {
                self.pos += 1;
                continue;
            }

            let body_start = self.pos + 1;
            let next_brace = bytes[body_start..]
                .iter()
                .position(|b| *b == b'{' || *b == b'}')
                .map(|offset| body_start + offset);

            match next_brace {
                Some(close) if bytes[close] == b'}' => {
                    let body = &input[body_start..close];
                    let combination = parse_combination(body, body_start)?;
                    self.push_segment(Segment::Combination(combination), close + 1);
                }
                // Unbalanced or nested: this brace is plain text
                _ => self.pos += 1,
            }
        }

        Ok(self.finish())
    }

    /// Split the input into literal text and `__name__` wildcard tokens.
    ///
    /// Names are matched lazily and never span a line break.
    pub fn parse_wildcards(mut self) -> Vec<Spanned<Segment>> {
        let input = self.input;
        let bytes = input.as_bytes();

        while self.pos < bytes.len() {
            if !bytes[self.pos..].starts_with(WILDCARD_DELIMITER.as_bytes()) {
                self.pos += 1;
                continue;
            }

            let name_start = self.pos + WILDCARD_DELIMITER.len();
            let rest = &input[name_start..];
            let line = &rest[..rest.find('\n').unwrap_or(rest.len())];

            match line.find(WILDCARD_DELIMITER) {
                Some(len) => {
                    let name = rest[..len].to_string();
                    let end = name_start + len + WILDCARD_DELIMITER.len();
                    self.push_segment(Segment::Wildcard(name), end);
                }
                None => self.pos += 1,
            }
        }

        self.finish()
    }

    fn push_segment(&mut self, segment: Segment, end: usize) {
        self.flush_literal();
        self.segments.push(Spanned::new(segment, Span::new(self.pos, end)));
        self.pos = end;
        self.literal_start = end;
    }

    fn flush_literal(&mut self) {
        if self.literal_start < self.pos {
            let text = self.input[self.literal_start..self.pos].to_string();
            self.segments.push(Spanned::new(
                Segment::Literal(text),
                Span::new(self.literal_start, self.pos),
            ));
        }
    }

    fn finish(mut self) -> Vec<Spanned<Segment>> {
        self.pos = self.input.len();
        self.flush_literal();
        self.segments
    }
}

/// Parse the body of a combination expression (the text between the braces).
///
/// `offset` is the byte position of the body in the scanned text and is only
/// used to place error spans.
pub fn parse_combination(body: &str, offset: usize) -> Result<Combination, ParseError> {
    let sections: Vec<&str> = body.split(SECTION_SEPARATOR).collect();

    let (quantity, joiner, variants) = match sections.as_slice() {
        [variants] => (None, None, *variants),
        [quantity, variants] => (Some(*quantity), None, *variants),
        [quantity, joiner, variants] => (Some(*quantity), Some(*joiner), *variants),
        _ => {
            return Err(ParseError::TooManySections {
                count: sections.len(),
                span: Span::at(offset, body.len()),
            })
        }
    };

    let mut combination = Combination::new(split_variants(variants));
    if let Some(quantity) = quantity {
        let spec = quantity
            .parse::<QuantitySpec>()
            .map_err(|_| ParseError::InvalidQuantity {
                quantity: quantity.to_string(),
                span: Span::at(offset, quantity.len()),
            })?;
        combination = combination.with_quantity(spec);
    }
    if let Some(joiner) = joiner {
        combination = combination.with_joiner(joiner);
    }

    Ok(combination)
}

fn split_variants(section: &str) -> Vec<String> {
    section.split(VARIANT_SEPARATOR).map(str::to_string).collect()
}

/// Scan `input` for combination expressions
pub fn parse_combinations(input: &str) -> Result<Vec<Spanned<Segment>>, ParseError> {
    Parser::new(input).parse_combinations()
}

/// Scan `input` for wildcard tokens
pub fn parse_wildcards(input: &str) -> Vec<Spanned<Segment>> {
    Parser::new(input).parse_wildcards()
}
