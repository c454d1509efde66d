//! Ariadne-based rendering of parse and type errors.
//!
//! Turns structured errors into labeled source reports. Rendering is
//! colorless by default so output is stable in tests and pipelines; the CLI
//! opts into color for terminals.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use rill_common::span::Span;
use rill_parser::ParseError;

use crate::error::TypeError;

fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::ParameterMismatch { .. } => "E0001",
        TypeError::UnknownParameter { .. } => "E0002",
        TypeError::UnknownTypeName { .. } => "E0003",
        TypeError::BadTypeParameters { .. } => "E0004",
        TypeError::UnsupportedConstruct { .. } => "E0005",
    }
}

fn span_to_range(span: Span) -> Range<usize> {
    span.start as usize..span.end as usize
}

/// Clamp a range into the source and make it at least one byte wide, which
/// ariadne needs to place a label.
fn clamp(range: Range<usize>, source_len: usize) -> Range<usize> {
    let start = range.start.min(source_len);
    let end = range.end.min(source_len).max(start);
    if start == end {
        start..end.saturating_add(1).min(source_len)
    } else {
        start..end
    }
}

fn write_report(report: Report<'_, Range<usize>>, source: &str) -> String {
    let mut buf = Vec::new();
    report
        .write(Source::from(source), &mut buf)
        .expect("diagnostic rendering failed");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

/// Render a type error as a labeled report over `source`.
pub fn render_type_error(error: &TypeError, source: &str, color: bool) -> String {
    let config = Config::default().with_color(color);
    let range = clamp(span_to_range(error.span()), source.len());

    let label = match error {
        TypeError::ParameterMismatch {
            declared, inferred, ..
        } => format!("expected {declared}, got {inferred}"),
        TypeError::UnknownParameter { type_name, .. } => {
            format!("not a parameter of `{type_name}`")
        }
        TypeError::UnknownTypeName { .. } => "not a known type".to_string(),
        TypeError::BadTypeParameters { .. } => {
            "wrong number or kind of type parameters".to_string()
        }
        TypeError::UnsupportedConstruct { .. } => "no inference rule applies".to_string(),
    };

    let report = Report::build(ReportKind::Error, range.clone())
        .with_code(error_code(error))
        .with_message(error.to_string())
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish();

    write_report(report, source)
}

/// Render a parse error as a labeled report over `source`.
pub fn render_parse_error(error: &ParseError, source: &str, color: bool) -> String {
    let config = Config::default().with_color(color);
    let range = clamp(span_to_range(error.span), source.len());

    let mut builder = Report::build(ReportKind::Error, range.clone())
        .with_code("P0001")
        .with_message(&error.message)
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message("syntax error here")
                .with_color(Color::Red),
        );

    if let Some((note, related_span)) = &error.related {
        builder.add_label(
            Label::new(clamp(span_to_range(*related_span), source.len()))
                .with_message(note.clone())
                .with_color(Color::Blue),
        );
    }

    write_report(builder.finish(), source)
}
