//! Serpent Type Checker
//!
//! Static checking for the Serpent subset: `int`, `bool`, `None` and
//! user classes with fields and methods. The checker is a single
//! fail-fast pass over an unannotated [`Program`], threaded through two
//! environments:
//!
//! - [`GlobalEnv`]: whole-program declarations (globals, functions, classes)
//! - [`LocalScope`]: the bindings of one function body or top-level block
//!
//! A successful check returns the annotated tree together with the
//! extended environment, ready for code generation or for the next
//! incremental chunk (see [`Session`]).

mod checker;
mod config;
mod env;
mod error_diagnostic;
mod session;

pub use checker::{Checked, TypeChecker};
pub use config::CheckerConfig;
pub use env::{ClassInfo, FuncSig, GlobalEnv, LocalScope, INIT_METHOD, PRINT_BUILTIN};
pub use session::Session;

pub use serpent_ast::{Program, Span, Type};

use smol_str::SmolStr;
use thiserror::Error;

/// Type checking errors.
///
/// Checking stops at the first one; every variant carries the span of the
/// offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("expected type `{expected}`, got type `{found}`")]
    Mismatch {
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("unresolved name `{name}`")]
    UndefinedName {
        name: SmolStr,
        /// Close names visible at the failure point, nearest first
        similar: Vec<SmolStr>,
        span: Span,
    },

    #[error("`{owner}` has no attribute `{attribute}`")]
    UndefinedAttribute {
        owner: SmolStr,
        attribute: SmolStr,
        span: Span,
    },

    #[error("condition must be of type `bool`, got type `{found}`")]
    NonBoolCondition { found: Type, span: Span },

    #[error("{message}")]
    Syntax { message: String, span: Span },

    #[error("unsupported operand type(s) for `{op}`: {}", format_operands(.operands))]
    UnsupportedOperands {
        op: SmolStr,
        operands: Vec<Type>,
        span: Span,
    },

    #[error("{message}")]
    Signature { message: String, span: Span },

    #[error("internal error: {message}")]
    Internal { message: String, span: Span },
}

fn format_operands(operands: &[Type]) -> String {
    operands
        .iter()
        .map(|ty| format!("`{}`", ty))
        .collect::<Vec<_>>()
        .join(" and ")
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::UndefinedName { span, .. }
            | TypeError::UndefinedAttribute { span, .. }
            | TypeError::NonBoolCondition { span, .. }
            | TypeError::Syntax { span, .. }
            | TypeError::UnsupportedOperands { span, .. }
            | TypeError::Signature { span, .. }
            | TypeError::Internal { span, .. } => *span,
        }
    }
}

pub type TypeResult<T> = Result<T, TypeError>;

/// Whether a value of type `source` may be stored where `target` is expected.
///
/// Equal types are assignable, and `None` is assignable to every class.
/// There is no other coercion.
pub fn is_assignable(target: &Type, source: &Type) -> bool {
    target == source || (*source == Type::None && target.is_class())
}

/// Common type of two branches. Only identical types join.
pub fn join(left: &Type, right: &Type) -> Option<Type> {
    (left == right).then(|| left.clone())
}
