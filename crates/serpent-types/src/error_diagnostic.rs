//! Conversion from `TypeError` to renderable diagnostics.

use crate::TypeError;
use serpent_ast::Span;
use serpent_diagnostics::span::SourceSpan;
use serpent_diagnostics::suggestion::{Suggestion, SuggestionEdit};
use serpent_diagnostics::Diagnostic;
use std::path::Path;

impl TypeError {
    /// Registry code of this error, see `ErrorCodeRegistry::with_standard_codes`.
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::Mismatch { .. } => "E0001",
            TypeError::UnsupportedOperands { .. } => "E0002",
            TypeError::NonBoolCondition { .. } => "E0003",
            TypeError::Signature { .. } => "E0004",
            TypeError::UndefinedName { .. } => "E1001",
            TypeError::UndefinedAttribute { .. } => "E1002",
            TypeError::Syntax { .. } => "E3001",
            TypeError::Internal { .. } => "E9001",
        }
    }

    /// Convert into a diagnostic pointing into `file`.
    pub fn to_diagnostic(&self, file: impl AsRef<Path>) -> Diagnostic {
        let span = source_span(file.as_ref(), self.span());

        match self {
            TypeError::Mismatch {
                expected, found, ..
            } => Diagnostic::error(self.code(), "type mismatch").with_primary_span(
                span,
                format!("expected `{}`, found `{}`", expected, found),
            ),

            TypeError::UndefinedName { name, similar, .. } => {
                let mut diag = Diagnostic::error(self.code(), self.to_string())
                    .with_primary_span(span.clone(), "not found in this scope");

                match similar.as_slice() {
                    [] => {
                        diag = diag.with_child(Diagnostic::note(
                            "names must be declared or assigned before use",
                        ));
                    }
                    [only] => {
                        diag = diag.with_suggestion(
                            Suggestion::maybe_incorrect(format!("using `{}`", only))
                                .with_edit(SuggestionEdit::from_span(&span, only.as_str())),
                        );
                    }
                    many => {
                        let names = many
                            .iter()
                            .map(|n| format!("`{}`", n))
                            .collect::<Vec<_>>()
                            .join(", ");
                        diag = diag.with_child(Diagnostic::help(format!(
                            "did you mean one of {}?",
                            names
                        )));
                    }
                }
                diag
            }

            TypeError::UndefinedAttribute {
                owner, attribute, ..
            } => Diagnostic::error(self.code(), self.to_string())
                .with_primary_span(span, format!("unknown attribute `{}`", attribute))
                .with_child(Diagnostic::note(format!(
                    "attributes are looked up on `{}` only; there is no inheritance",
                    owner
                ))),

            TypeError::NonBoolCondition { found, .. } => {
                Diagnostic::error(self.code(), "non-boolean condition")
                    .with_primary_span(span, format!("expected `bool`, found `{}`", found))
            }

            TypeError::Syntax { message, .. } => {
                Diagnostic::error(self.code(), message.clone()).with_primary_span(span, "")
            }

            TypeError::UnsupportedOperands { op, operands, .. } => {
                let found = operands
                    .iter()
                    .map(|ty| format!("`{}`", ty))
                    .collect::<Vec<_>>()
                    .join(" and ");
                Diagnostic::error(self.code(), format!("unsupported operand type(s) for `{}`", op))
                    .with_primary_span(span, format!("applied to {}", found))
            }

            TypeError::Signature { message, .. } => {
                Diagnostic::error(self.code(), "call signature mismatch")
                    .with_primary_span(span, message.clone())
            }

            TypeError::Internal { message, .. } => {
                Diagnostic::error(self.code(), format!("internal error: {}", message))
                    .with_primary_span(span, "")
            }
        }
    }
}

fn source_span(file: &Path, span: Span) -> SourceSpan {
    SourceSpan::new(file, span.start, span.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Type;
    use pretty_assertions::assert_eq;
    use serpent_diagnostics::{ErrorCategory, ErrorCodeRegistry};

    fn all_variants() -> Vec<TypeError> {
        let span = Span::new(1, 2);
        vec![
            TypeError::Mismatch { expected: Type::Num, found: Type::Bool, span },
            TypeError::UnsupportedOperands { op: "+".into(), operands: vec![Type::Num], span },
            TypeError::NonBoolCondition { found: Type::Num, span },
            TypeError::Signature { message: "bad call".into(), span },
            TypeError::UndefinedName { name: "x".into(), similar: vec![], span },
            TypeError::UndefinedAttribute { owner: "C".into(), attribute: "g".into(), span },
            TypeError::Syntax { message: "bad".into(), span },
            TypeError::Internal { message: "oops".into(), span },
        ]
    }

    #[test]
    fn test_codes_are_registered() {
        let registry = ErrorCodeRegistry::with_standard_codes();
        for err in all_variants() {
            assert!(registry.get(err.code()).is_some(), "{} not registered", err.code());
            let diag = err.to_diagnostic("main.py");
            assert_eq!(diag.code.as_deref(), Some(err.code()));
        }
    }

    #[test]
    fn test_code_categories() {
        let codes: Vec<_> = all_variants().iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            vec!["E0001", "E0002", "E0003", "E0004", "E1001", "E1002", "E3001", "E9001"]
        );
        assert_eq!(ErrorCategory::from_code(codes[4]), Some(ErrorCategory::Naming));
    }

    #[test]
    fn test_mismatch_diagnostic() {
        let err = TypeError::Mismatch {
            expected: Type::Num,
            found: Type::Bool,
            span: Span::new(15, 23),
        };
        let diag = err.to_diagnostic("main.py");

        assert_eq!(diag.message, "type mismatch");
        let label = &diag.spans.labels()[0];
        assert_eq!(label.message, "expected `int`, found `bool`");
        assert_eq!(label.span, SourceSpan::new("main.py", 15, 23));
    }

    #[test]
    fn test_undefined_name_suggestions() {
        let one = TypeError::UndefinedName {
            name: "cuont".into(),
            similar: vec!["count".into()],
            span: Span::new(6, 11),
        }
        .to_diagnostic("main.py");
        assert_eq!(one.suggestions[0].full_message(), "consider using `count`");
        let edit = &one.suggestions[0].edits[0];
        assert_eq!((edit.start, edit.end), (6, 11));
        assert_eq!(edit.new_text, "count");

        let many = TypeError::UndefinedName {
            name: "vlaue".into(),
            similar: vec!["value".into(), "valve".into()],
            span: Span::dummy(),
        }
        .to_diagnostic("main.py");
        assert!(!many.has_suggestions());
        assert_eq!(many.children[0].message, "did you mean one of `value`, `valve`?");

        let none = TypeError::UndefinedName {
            name: "q".into(),
            similar: vec![],
            span: Span::dummy(),
        }
        .to_diagnostic("main.py");
        assert_eq!(none.children[0].message, "names must be declared or assigned before use");
    }
}
