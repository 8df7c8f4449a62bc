//! Text rendering of diagnostics.
//!
//! Three formats are supported. `Detailed` prints a line-numbered
//! excerpt of the source with a caret line under the offending tokens;
//! `HeaderOnly` and `Short` are single-line forms for logs and tooling.

use crate::spec::{Diagnostic, MessageSpec};
use sxml_source_map::{Position, SourceText};

/// How a message is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// Multi-line snippet with a caret underline.
    #[default]
    Detailed,
    /// `{severity} ({kind}) at {uri}:{line}:{col} - {message}`.
    HeaderOnly,
    /// `{uri}:{line}:{col} - {message}`.
    Short,
}

/// Rendering configuration shared by a whole report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub format: MessageFormat,
    /// Lines of surrounding context shown above and below the primary
    /// line in the detailed format.
    pub context_lines: usize,
}

impl Default for ReportConfig {
    fn default() -> ReportConfig {
        ReportConfig {
            format: MessageFormat::Detailed,
            context_lines: 1,
        }
    }
}

impl ReportConfig {
    pub fn new(format: MessageFormat) -> ReportConfig {
        ReportConfig {
            format,
            context_lines: 1,
        }
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> ReportConfig {
        self.context_lines = context_lines;
        self
    }

    /// Renders `spec` against `source`. ANSI escapes are emitted only
    /// when `colors` is set; output is byte-for-byte deterministic for
    /// a given input.
    pub fn render(&self, spec: &MessageSpec, source: &SourceText, colors: bool) -> String {
        match self.format {
            MessageFormat::Detailed => render_detailed(spec, source, self.context_lines, colors),
            MessageFormat::HeaderOnly => {
                let severity = severity_token(spec, colors);
                let kind = kind_token(spec);
                let at = location(source, spec.position());
                format!("{severity}{kind} at {at} - {}", spec.message)
            }
            MessageFormat::Short => {
                format!("{} - {}", location(source, spec.position()), spec.message)
            }
        }
    }

    /// Renders `spec` and pairs the result with it.
    pub fn diagnostic(&self, spec: MessageSpec, source: &SourceText, colors: bool) -> Diagnostic {
        let rendered = self.render(&spec, source, colors);
        Diagnostic::new(rendered, spec)
    }
}

fn severity_token(spec: &MessageSpec, colors: bool) -> String {
    let name = spec.severity.display_name();
    if colors {
        spec.severity.colored(name)
    } else {
        name.to_string()
    }
}

fn kind_token(spec: &MessageSpec) -> String {
    match &spec.kind {
        Some(kind) => format!(" ({kind})"),
        None => String::new(),
    }
}

fn location(source: &SourceText, position: Position) -> String {
    match source.uri() {
        Some(uri) => format!("{uri}:{position}"),
        None => position.to_string(),
    }
}

fn render_detailed(
    spec: &MessageSpec,
    source: &SourceText,
    context_lines: usize,
    colors: bool,
) -> String {
    let line_count = source.line_count() as u32;
    // The span may point past the end of a truncated document; clamp
    // the primary line into what we can actually show.
    let line = spec.span.start.line.clamp(1, line_count.max(1));
    let first = line.saturating_sub(context_lines as u32).max(1);
    let last = line
        .saturating_add(context_lines as u32)
        .min(line_count.max(1));
    let width = decimal_width(last);

    let mut header = severity_token(spec, colors);
    header.push_str(&kind_token(spec));
    if let Some(uri) = source.uri() {
        header.push_str(&format!(" in {uri}"));
    }

    let mut lines = Vec::with_capacity((last - first + 4) as usize);
    lines.push(header);
    for shown in first..=line {
        lines.push(gutter_line(source, shown, width));
    }
    lines.push(caret_line(spec, source, line, width, colors));
    lines.push(String::new());
    for shown in (line + 1)..=last {
        lines.push(gutter_line(source, shown, width));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn gutter_line(source: &SourceText, line: u32, width: usize) -> String {
    format!(
        " {line:>width$}| {}",
        source.line_content(line).unwrap_or("")
    )
}

/// Builds the caret line: padding to the start column, one caret per
/// spanned character on the primary line, then the message.
fn caret_line(
    spec: &MessageSpec,
    source: &SourceText,
    line: u32,
    width: usize,
    colors: bool,
) -> String {
    let content = source.line_content(line).unwrap_or("");
    let line_chars = content.chars().count() as u32;
    let start_column = spec.span.start.column.clamp(1, line_chars + 1);
    let (carets, continues) = if spec.span.end.line > line {
        // Span runs off this line; underline to end of line and mark
        // the continuation.
        ((line_chars + 1).saturating_sub(start_column).max(1), true)
    } else {
        (
            spec.span
                .end
                .column
                .saturating_sub(start_column)
                .saturating_add(1)
                .max(1),
            false,
        )
    };
    // " " + line number + "| " puts the gutter at width + 3 columns.
    let indent = width + 3 + (start_column - 1) as usize;
    let mut underline = "^".repeat(carets as usize);
    if continues {
        underline.push_str("...");
    }
    underline.push(' ');
    underline.push_str(&spec.message);
    let underline = if colors {
        spec.severity.colored(&underline)
    } else {
        underline
    };
    format!("{}{underline}", " ".repeat(indent))
}

fn decimal_width(n: u32) -> usize {
    n.max(1).to_string().len()
}
