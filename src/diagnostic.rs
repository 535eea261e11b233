/// Diagnostic reporting using ariadne for readable error messages
use crate::expander::ExpandError;
use crate::parser::ParseError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;

fn render<'a>(report: Report<'_, (&'a str, Range<usize>)>, source_name: &'a str, source: &str) -> String {
    let mut output = Vec::new();

    report
        .write((source_name, Source::from(source)), &mut output)
        .expect("Failed to write diagnostic");

    String::from_utf8(output).expect("Invalid UTF-8 in diagnostic output")
}

/// Report a parse error in `source`
pub fn report_parse_error(source_name: &str, source: &str, error: &ParseError) -> String {
    let report = match error {
        ParseError::TooManySections { count, span } => {
            Report::build(ReportKind::Error, source_name, span.start)
                .with_message("Malformed combination")
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message(format!("this combination has {} '$$' sections", count))
                        .with_color(Color::Red),
                )
                .with_help("Use {variants}, {quantity$$variants} or {quantity$$joiner$$variants}")
                .finish()
        }
        ParseError::InvalidQuantity { quantity, span } => {
            Report::build(ReportKind::Error, source_name, span.start)
                .with_message(format!("Invalid quantity: '{}'", quantity))
                .with_label(
                    Label::new((source_name, span.range()))
                        .with_message("expected a number or a range")
                        .with_color(Color::Red),
                )
                .with_help("Quantities look like 2, 1-3, -2 or 2-")
                .finish()
        }
    };

    render(report, source_name, source)
}

/// Report an expansion error
///
/// Errors are reported against the text the failing pass ran on, which is
/// the template itself or a partly expanded version of it.
pub fn report_expand_error(source_name: &str, template: &str, error: &ExpandError) -> String {
    let text = error.text();
    let name = if text == template {
        source_name.to_string()
    } else {
        format!("{} (expanded)", source_name)
    };

    match error {
        ExpandError::MalformedExpression { source, .. } => report_parse_error(&name, text, source),
        ExpandError::RecursionExceeded { limit, pass, .. } => {
            let report = Report::build(ReportKind::Error, name.as_str(), 0)
                .with_message(format!("Too many recursions in the {} pass", pass))
                .with_label(
                    Label::new((name.as_str(), 0..text.len()))
                        .with_message(format!("still changing after {} passes", limit))
                        .with_color(Color::Red),
                )
                .with_note("Wildcards that expand into each other never reach a stable prompt")
                .with_help("Break the cycle, or raise max_recursions for deeply nested templates")
                .finish();
            render(report, &name, text)
        }
    }
}
