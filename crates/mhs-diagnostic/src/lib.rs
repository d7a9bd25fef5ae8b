//! Diagnostic and error reporting for micro-Haskell.
//! micro-Haskell 的诊断和错误报告。
//!
//! This crate provides readable error messages using ariadne.
//! 本 crate 使用 ariadne 库提供美观的错误信息。

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticKind, Label, Severity};

use std::ops::Range;

use ariadne::{ColorGenerator, Config, Label as AriadneLabel, Report, ReportKind, Source};

fn build_report<'a>(
    filename: &'a str,
    diagnostic: &Diagnostic,
    color: bool,
) -> Report<'a, (&'a str, Range<usize>)> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, diagnostic.span.start.0 as usize)
        .with_config(Config::default().with_color(color))
        .with_message(&diagnostic.message);

    if let Some(code) = &diagnostic.code {
        report = report.with_code(code.as_str());
    }

    // A diagnostic without explicit labels still points at its span.
    if diagnostic.labels.is_empty() {
        report = report.with_label(
            AriadneLabel::new((filename, diagnostic.span.range()))
                .with_message(&diagnostic.message)
                .with_color(colors.next()),
        );
    }

    for label in &diagnostic.labels {
        let ariadne_label = AriadneLabel::new((filename, label.span.range()))
            .with_message(&label.message)
            .with_color(colors.next());
        report = report.with_label(ariadne_label);
    }

    for note in &diagnostic.notes {
        report = report.with_note(note);
    }

    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    report.finish()
}

/// Render a diagnostic to stderr.
/// 将诊断信息渲染到标准错误输出。
pub fn emit(source: &str, filename: &str, diagnostic: &Diagnostic) {
    let report = build_report(filename, diagnostic, true);
    if let Err(err) = report.eprint((filename, Source::from(source))) {
        tracing::warn!(%err, "failed to write diagnostic");
    }
}

/// Render a diagnostic to a plain (uncolored) string.
/// 将诊断信息渲染为纯文本字符串。
pub fn render_to_string(source: &str, filename: &str, diagnostic: &Diagnostic) -> String {
    let report = build_report(filename, diagnostic, false);
    let mut buf = Vec::new();
    if let Err(err) = report.write((filename, Source::from(source)), &mut buf) {
        tracing::warn!(%err, "failed to render diagnostic");
        return diagnostic.message.clone();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
