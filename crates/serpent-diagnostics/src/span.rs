//! Source spans and labels for diagnostic locations.

use std::path::PathBuf;

/// A byte range inside a named source file.
///
/// Offsets are converted to line/column only when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub file: PathBuf,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl SourceSpan {
    pub fn new(file: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A message attached to a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
}

impl Label {
    pub fn primary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// The labelled locations of one diagnostic. The first label decides
/// where the renderer points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSpan {
    primary: Option<SourceSpan>,
    labels: Vec<Label>,
}

impl MultiSpan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_span(&self) -> Option<&SourceSpan> {
        self.primary.as_ref()
    }

    pub fn push_primary(&mut self, span: SourceSpan, message: impl Into<String>) {
        if self.primary.is_none() {
            self.primary = Some(span.clone());
        }
        self.labels.push(Label::primary(span, message));
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.labels.is_empty()
    }
}

/// 1-indexed line and column (column counted in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span resolved against its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub span: SourceSpan,
    pub start: LineColumn,
    pub end: LineColumn,
    /// Full text of every line the span touches.
    pub source_lines: Vec<String>,
}

impl ResolvedSpan {
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }
}
