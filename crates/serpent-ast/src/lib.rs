//! Serpent Abstract Syntax Tree
//!
//! Defines the AST node types consumed and produced by the Serpent type
//! checker, together with the static [`Type`] model used for declarations
//! and annotations.
//!
//! Every node is generic over an annotation parameter `A`. The parser
//! produces `Program<()>`; the checker returns the same shapes as
//! `Program<Type>`, with every statement and expression carrying its static
//! type. The only shape change is that a call whose callee names a class is
//! rewritten into [`ExprKind::Construct`].

use std::fmt;

// Re-export common types for use by other crates
pub use smol_str::SmolStr;

// ============================================================================
// Source Locations
// ============================================================================

/// Byte range in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// A spanned value - wraps any value with source location info
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self {
            node,
            span: Span::dummy(),
        }
    }
}

/// Identifier (variable, function, class, field and method names)
pub type Ident = Spanned<SmolStr>;

// ============================================================================
// Static Types
// ============================================================================

/// The closed set of static types.
///
/// Primitive types compare by tag, class types by name. `None` is not a
/// class, but it is assignable to every class type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Num,
    Bool,
    None,
    Class(SmolStr),
}

impl Type {
    /// Name of the universal class accepted by `print`.
    pub const OBJECT: &'static str = "object";

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Type::Class(name.into())
    }

    pub fn object() -> Self {
        Type::Class(SmolStr::new(Self::OBJECT))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    /// True for `None` and every class type (the operands accepted by `is`).
    pub fn is_none_or_class(&self) -> bool {
        matches!(self, Type::None | Type::Class(_))
    }

    pub fn class_name(&self) -> Option<&SmolStr> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Short tag used in diagnostics.
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Num => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::None => write!(f, "<None>"),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// Program Structure
// ============================================================================

/// A complete program, or one incremental top-level chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<A = ()> {
    pub var_inits: Vec<VarInit<A>>,
    pub fun_defs: Vec<FunDef<A>>,
    pub classes: Vec<ClassDef<A>>,
    pub stmts: Vec<Stmt<A>>,
    pub span: Span,
}

impl<A> Program<A> {
    pub fn is_empty(&self) -> bool {
        self.var_inits.is_empty()
            && self.fun_defs.is_empty()
            && self.classes.is_empty()
            && self.stmts.is_empty()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self {
            var_inits: Vec::new(),
            fun_defs: Vec::new(),
            classes: Vec::new(),
            stmts: Vec::new(),
            span: Span::dummy(),
        }
    }
}

/// A name with its declared type: `x: int`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedVar {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

/// Variable declaration with a literal initializer: `x: int = 0`
///
/// Annotated with the initializer's type.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInit<A = ()> {
    pub var: TypedVar,
    pub value: Spanned<Literal>,
    pub span: Span,
    pub ann: A,
}

/// Function or method definition.
///
/// Methods list the receiver as their first parameter. Annotated with the
/// declared return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunDef<A = ()> {
    pub name: Ident,
    pub params: Vec<TypedVar>,
    pub return_type: Type,
    pub inits: Vec<VarInit<A>>,
    pub body: Vec<Stmt<A>>,
    pub span: Span,
    pub ann: A,
}

/// Class definition. Annotated with the class type.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef<A = ()> {
    pub name: Ident,
    pub fields: Vec<VarInit<A>>,
    pub methods: Vec<FunDef<A>>,
    pub span: Span,
    pub ann: A,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt<A = ()> {
    pub kind: StmtKind<A>,
    pub span: Span,
    pub ann: A,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span, ann: () }
    }
}

impl<A> Stmt<A> {
    pub fn with_ann(kind: StmtKind<A>, span: Span, ann: A) -> Self {
        Self { kind, span, ann }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind<A = ()> {
    /// `x = value`
    Assign { target: Ident, value: Expr<A> },
    /// `a, b = value`
    Destructure { targets: Vec<Ident>, value: Expr<A> },
    /// Expression statement
    Expr(Expr<A>),
    If {
        condition: Expr<A>,
        then_branch: Vec<Stmt<A>>,
        else_branch: Vec<Stmt<A>>,
    },
    /// `return` or `return value`
    Return(Option<Expr<A>>),
    While { condition: Expr<A>, body: Vec<Stmt<A>> },
    Pass,
    /// `obj.field = value`
    FieldAssign {
        object: Expr<A>,
        field: Ident,
        value: Expr<A>,
    },
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr<A = ()> {
    pub kind: ExprKind<A>,
    pub span: Span,
    pub ann: A,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ann: () }
    }
}

impl<A> Expr<A> {
    pub fn with_ann(kind: ExprKind<A>, span: Span, ann: A) -> Self {
        Self { kind, span, ann }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<A = ()> {
    Literal(Literal),
    Id(SmolStr),
    Binary {
        op: BinaryOp,
        left: Box<Expr<A>>,
        right: Box<Expr<A>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr<A>>,
    },
    /// Call of a single-argument builtin such as `print(x)` or `abs(x)`
    Builtin1 { name: Ident, arg: Box<Expr<A>> },
    /// Call of a two-argument builtin such as `max(a, b)`
    Builtin2 {
        name: Ident,
        first: Box<Expr<A>>,
        second: Box<Expr<A>>,
    },
    /// Call of a user function, or of a class before checking
    Call { callee: Ident, args: Vec<Expr<A>> },
    /// Object construction; only produced by the checker
    Construct { class: Ident, args: Vec<Expr<A>> },
    /// `obj.field`
    Lookup { object: Box<Expr<A>>, field: Ident },
    /// `obj.method(args)`
    MethodCall {
        object: Box<Expr<A>>,
        method: Ident,
        args: Vec<Expr<A>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Num(i64),
    None,
    /// Produced by the parser, but outside the statically typed subset
    Str(SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    IntDiv,
    Mod,

    // Equality
    Eq,
    NotEq,

    // Relational
    LtEq,
    GtEq,
    Lt,
    Gt,

    // Logical
    And,
    Or,

    // Identity
    Is,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::IntDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Is => "is",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
