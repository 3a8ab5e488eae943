//! Fix suggestions attached to diagnostics.

use crate::span::SourceSpan;
use std::path::PathBuf;

/// Confidence that a suggestion is correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Applicability {
    /// Safe to apply without review.
    MachineApplicable,
    /// Plausible; rendered with "consider".
    #[default]
    MaybeIncorrect,
}

impl Applicability {
    pub fn help_prefix(&self) -> &'static str {
        match self {
            Applicability::MachineApplicable => "",
            Applicability::MaybeIncorrect => "consider ",
        }
    }
}

/// Replace `start..end` of `file` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEdit {
    pub file: PathBuf,
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl SuggestionEdit {
    pub fn from_span(span: &SourceSpan, new_text: impl Into<String>) -> Self {
        Self {
            file: span.file.clone(),
            start: span.start,
            end: span.end,
            new_text: new_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub message: String,
    pub applicability: Applicability,
    pub edits: Vec<SuggestionEdit>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>, applicability: Applicability) -> Self {
        Self {
            message: message.into(),
            applicability,
            edits: Vec::new(),
        }
    }

    pub fn maybe_incorrect(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::MaybeIncorrect)
    }

    pub fn with_edit(mut self, edit: SuggestionEdit) -> Self {
        self.edits.push(edit);
        self
    }

    /// Message with the applicability prefix, as shown after `help: `.
    pub fn full_message(&self) -> String {
        format!("{}{}", self.applicability.help_prefix(), self.message)
    }
}
