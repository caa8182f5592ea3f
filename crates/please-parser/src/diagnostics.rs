//! Ariadne-based rendering of parse diagnostics.
//!
//! Output is colorless so it can be compared in tests and written to logs.
//! The primary span gets a red label; a related span ("block opened here")
//! becomes a second, blue label.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::error::ParseError;

/// Render a single diagnostic against the source it was produced from.
pub fn render_diagnostic(error: &ParseError, source: &str) -> String {
    let config = Config::default()
        .with_color(false)
        .with_index_type(IndexType::Byte);
    let source_len = source.len();

    // Clamp a range to be valid within source bounds.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        // Zero-width spans (end of file, synthetic block tokens) still need
        // a character to point at.
        if s != e {
            s..e
        } else if e < source_len {
            s..e + 1
        } else {
            s.saturating_sub(1)..e
        }
    };

    let span = clamp(error.span.range());
    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_message(&error.message)
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some(related) = &error.related {
        builder.add_label(
            Label::new(clamp(related.span.range()))
                .with_message(&related.message)
                .with_color(Color::Blue),
        );
    }
    let report = builder.finish();

    let mut buf = Vec::new();
    if let Err(err) = report.write(Source::from(source), &mut buf) {
        log::warn!("failed to render diagnostic `{}`: {err}", error.message);
        return format!("Error: {}\n", error.message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render every diagnostic, in order, separated by blank lines.
pub fn render_diagnostics(errors: &[ParseError], source: &str) -> String {
    errors
        .iter()
        .map(|error| render_diagnostic(error, source))
        .collect::<Vec<_>>()
        .join("\n")
}
