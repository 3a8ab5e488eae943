//! Terminal rendering of diagnostics.
//!
//! The renderer writes to any `termcolor::WriteColor`, so the same code
//! drives coloured stderr output and plain buffers in tests.

use crate::span::{Label, LineColumn, ResolvedSpan, SourceSpan};
use crate::{Diagnostic, DiagnosticResult, DiagnosticSeverity};
use std::collections::HashMap;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub use_color: bool,
    pub show_docs_links: bool,
    pub docs_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            show_docs_links: false,
            docs_base_url: "https://serpent.dev/errors".to_string(),
        }
    }
}

impl RenderConfig {
    /// No colour and no links, for logs and snapshot tests.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            ..Default::default()
        }
    }
}

/// Source text keyed by file name.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<String, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }

    pub fn get_source(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn resolve_span(&self, span: &SourceSpan) -> Option<ResolvedSpan> {
        let path = span.file.to_string_lossy();
        let source = self.get_source(&path)?;

        let (start_line, start_col) = offset_to_line_col(source, span.start);
        let (end_line, end_col) = offset_to_line_col(source, span.end);

        let source_lines = source
            .lines()
            .skip(start_line - 1)
            .take(end_line - start_line + 1)
            .map(String::from)
            .collect();

        Some(ResolvedSpan {
            span: span.clone(),
            start: LineColumn::new(start_line, start_col),
            end: LineColumn::new(end_line, end_col),
            source_lines,
        })
    }
}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut col = 1;

    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Display width of the first `chars` characters of `line`.
fn display_width(line: &str, chars: usize) -> usize {
    let prefix: String = line.chars().take(chars).collect();
    prefix.width()
}

pub struct TerminalRenderer<W> {
    config: RenderConfig,
    out: W,
}

impl TerminalRenderer<StandardStream> {
    pub fn stderr(config: RenderConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            out: StandardStream::stderr(choice),
            config,
        }
    }
}

impl<W: WriteColor> TerminalRenderer<W> {
    pub fn new(out: W, config: RenderConfig) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn severity_color(severity: DiagnosticSeverity) -> Color {
        match severity {
            DiagnosticSeverity::Error => Color::Red,
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Note => Color::Cyan,
            DiagnosticSeverity::Help => Color::Green,
        }
    }

    fn write_colored(&mut self, text: &str, color: Color, bold: bool) -> DiagnosticResult<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(bold);
        self.out.set_color(&spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()?;
        Ok(())
    }

    pub fn render(&mut self, diagnostic: &Diagnostic, sources: &SourceCache) -> DiagnosticResult<()> {
        let color = Self::severity_color(diagnostic.severity);
        let mut header = diagnostic.severity.prefix().to_string();
        if let Some(code) = &diagnostic.code {
            header.push_str(&format!("[{}]", code));
        }
        self.write_colored(&header, color, true)?;
        self.write_colored(&format!(": {}", diagnostic.message), Color::White, true)?;
        writeln!(self.out)?;

        let resolved = diagnostic
            .spans
            .primary_span()
            .and_then(|span| sources.resolve_span(span));

        let gutter = match &resolved {
            Some(resolved) => resolved.end.line.to_string().len(),
            None => 1,
        };

        match (&resolved, diagnostic.spans.primary_span()) {
            (Some(resolved), _) => {
                writeln!(
                    self.out,
                    "{:>width$}--> {}:{}:{}",
                    "",
                    resolved.span.file.display(),
                    resolved.start.line,
                    resolved.start.column,
                    width = gutter
                )?;
                writeln!(self.out, "{:>width$} |", "", width = gutter)?;
                for (i, line) in resolved.source_lines.iter().enumerate() {
                    let number = format!("{:>width$}", resolved.start.line + i, width = gutter);
                    self.write_colored(&number, Color::Blue, true)?;
                    writeln!(self.out, " | {}", line)?;
                }
                for label in diagnostic.spans.labels() {
                    if let Some(label_resolved) = sources.resolve_span(&label.span) {
                        self.write_underline(label, &label_resolved, diagnostic.severity, gutter)?;
                    }
                }
            }
            (None, Some(span)) => {
                // No source text: point at the byte range instead of a snippet.
                writeln!(
                    self.out,
                    "{:>width$}--> {} (bytes {}..{})",
                    "",
                    span.file.display(),
                    span.start,
                    span.end,
                    width = gutter
                )?;
            }
            (None, None) => {}
        }

        for suggestion in &diagnostic.suggestions {
            write!(self.out, "{:>width$} = ", "", width = gutter)?;
            self.write_colored("help", Self::severity_color(DiagnosticSeverity::Help), true)?;
            writeln!(self.out, ": {}", suggestion.full_message())?;
        }

        for child in &diagnostic.children {
            write!(self.out, "{:>width$} = ", "", width = gutter)?;
            self.write_colored(child.severity.prefix(), Self::severity_color(child.severity), true)?;
            writeln!(self.out, ": {}", child.message)?;
        }

        if self.config.show_docs_links {
            if let Some(url) = diagnostic.docs_url(&self.config.docs_base_url) {
                writeln!(self.out, "{:>width$} = docs: {}", "", url, width = gutter)?;
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    fn write_underline(
        &mut self,
        label: &Label,
        resolved: &ResolvedSpan,
        severity: DiagnosticSeverity,
        gutter: usize,
    ) -> DiagnosticResult<()> {
        let Some(first_line) = resolved.source_lines.first() else {
            return Ok(());
        };

        let marker = severity.underline_char();
        let color = Self::severity_color(severity);

        let start_chars = resolved.start.column - 1;
        let end_chars = if resolved.is_multiline() {
            first_line.chars().count()
        } else {
            resolved.end.column - 1
        };
        let pad = display_width(first_line, start_chars);
        let len = display_width(first_line, end_chars).saturating_sub(pad).max(1);

        write!(self.out, "{:>width$} | {:>pad$}", "", "", width = gutter, pad = pad)?;
        let underline: String = std::iter::repeat(marker).take(len).collect();
        self.write_colored(&underline, color, true)?;
        if !label.message.is_empty() {
            write!(self.out, " ")?;
            self.write_colored(&label.message, color, true)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}
