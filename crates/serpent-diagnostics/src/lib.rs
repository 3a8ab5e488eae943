//! Serpent Diagnostics - diagnostic values and rendering for the Serpent checker.
//!
//! - `Diagnostic` - code, severity, message, labelled spans and suggestions
//! - `ErrorCodeRegistry` - the codes the checker emits, grouped by category
//! - `render::TerminalRenderer` - `rustc`-style terminal output
//!
//! # Example
//!
//! ```rust
//! use serpent_diagnostics::{Diagnostic, DiagnosticSeverity};
//! use serpent_diagnostics::span::SourceSpan;
//!
//! let diagnostic = Diagnostic::error("E0001", "type mismatch")
//!     .with_primary_span(SourceSpan::new("main.py", 9, 13), "expected `int`, found `bool`");
//!
//! assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
//! assert_eq!(diagnostic.code.as_deref(), Some("E0001"));
//! ```

pub mod render;
pub mod span;
pub mod suggestion;

use span::{MultiSpan, SourceSpan};
use suggestion::Suggestion;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagnosticSeverity {
    #[default]
    Error,
    Warning,
    Note,
    Help,
}

impl DiagnosticSeverity {
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Note => "note",
            DiagnosticSeverity::Help => "help",
        }
    }

    pub fn underline_char(&self) -> char {
        match self {
            DiagnosticSeverity::Error => '^',
            DiagnosticSeverity::Warning => '~',
            DiagnosticSeverity::Note => '-',
            DiagnosticSeverity::Help => '+',
        }
    }

    pub fn blocks_compilation(&self) -> bool {
        matches!(self, DiagnosticSeverity::Error)
    }
}

/// A single message from the checker, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Registry code such as `E0001`.
    pub code: Option<String>,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub spans: MultiSpan,
    pub suggestions: Vec<Suggestion>,
    /// Attached notes and helps.
    pub children: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(
        severity: DiagnosticSeverity,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            spans: MultiSpan::new(),
            suggestions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, Some(code.into()), message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Note, None, message)
    }

    pub fn help(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Help, None, message)
    }

    pub fn with_primary_span(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.spans.push_primary(span, message);
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_child(mut self, child: Diagnostic) -> Self {
        self.children.push(child);
        self
    }

    pub fn docs_url(&self, base_url: &str) -> Option<String> {
        self.code.as_ref().map(|code| format!("{}/{}", base_url, code))
    }

    pub fn has_spans(&self) -> bool {
        !self.spans.is_empty()
    }

    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// Error code families. The digit after `E` selects the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// E0XXX: typing rules (mismatches, operands, conditions, signatures)
    Core,
    /// E1XXX: name and attribute resolution
    Naming,
    /// E3XXX: structural rules (`return` placement, branch agreement)
    Syntax,
    /// E9XXX: unimplemented features and internal consistency
    Internal,
}

impl ErrorCategory {
    pub fn from_code(code: &str) -> Option<Self> {
        let digit = code.strip_prefix('E')?.chars().next()?;
        match digit {
            '0' => Some(ErrorCategory::Core),
            '1' => Some(ErrorCategory::Naming),
            '3' => Some(ErrorCategory::Syntax),
            '9' => Some(ErrorCategory::Internal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCategory::Core => "Core",
            ErrorCategory::Naming => "Naming/Scope",
            ErrorCategory::Syntax => "Syntax",
            ErrorCategory::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorCodeInfo {
    pub code: String,
    pub category: ErrorCategory,
    pub description: String,
}

/// Known error codes and their one-line descriptions.
#[derive(Debug, Default)]
pub struct ErrorCodeRegistry {
    codes: std::collections::BTreeMap<String, ErrorCodeInfo>,
}

impl ErrorCodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The codes emitted by the Serpent type checker.
    pub fn with_standard_codes() -> Self {
        let mut registry = Self::new();

        registry.register("E0001", "type mismatch");
        registry.register("E0002", "unsupported operand types");
        registry.register("E0003", "non-boolean condition");
        registry.register("E0004", "call signature mismatch");

        registry.register("E1001", "unresolved name");
        registry.register("E1002", "unresolved attribute");

        registry.register("E3001", "structural rule violated");

        registry.register("E9001", "internal checker error");

        registry
    }

    /// Returns `false` when the code does not belong to a known category.
    pub fn register(&mut self, code: impl Into<String>, description: impl Into<String>) -> bool {
        let code = code.into();
        let Some(category) = ErrorCategory::from_code(&code) else {
            return false;
        };
        self.codes.insert(
            code.clone(),
            ErrorCodeInfo {
                code,
                category,
                description: description.into(),
            },
        );
        true
    }

    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn codes_in_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values().filter(move |info| info.category == category)
    }
}

pub type DiagnosticResult<T> = Result<T, DiagnosticError>;

#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
