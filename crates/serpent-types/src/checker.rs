//! The checking pass: literals, expressions, statements and whole programs.

use crate::env::{ClassInfo, GlobalEnv, LocalScope, INIT_METHOD, PRINT_BUILTIN};
use crate::{is_assignable, join, CheckerConfig, TypeError, TypeResult};
use serpent_ast::{
    BinaryOp, ClassDef, Expr, ExprKind, FunDef, Ident, Literal, Program, Span, Stmt, StmtKind,
    Type, UnaryOp, VarInit,
};
use smol_str::SmolStr;
use tracing::{debug, info_span, trace};

/// Result of checking a program or chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    /// The input tree with every node annotated with its type.
    pub program: Program<Type>,
    /// The input environment extended with the program's declarations and
    /// its top-level first assignments.
    pub env: GlobalEnv,
    /// Type of the last top-level statement, `None` if there is none.
    pub ty: Type,
}

/// The Serpent type checker.
///
/// Holds only configuration, so one checker can be shared between
/// programs; all per-check state lives in the environments passed in.
#[derive(Debug, Clone, Default)]
pub struct TypeChecker {
    config: CheckerConfig,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a program against `env`.
    ///
    /// Declarations are registered first, then variable initializers,
    /// function bodies, classes and finally the top-level statements. On
    /// success the names first assigned at top level become globals of the
    /// returned environment. `env` itself is never modified.
    pub fn check_program(&self, env: &GlobalEnv, program: &Program) -> TypeResult<Checked> {
        let span = info_span!(
            "check_program",
            var_inits = program.var_inits.len(),
            functions = program.fun_defs.len(),
            classes = program.classes.len(),
            stmts = program.stmts.len()
        );
        let _enter = span.enter();

        self.check_program_inner(env, program).map_err(|err| {
            debug!(error = %err, "type check failed");
            err
        })
    }

    fn check_program_inner(&self, env: &GlobalEnv, program: &Program) -> TypeResult<Checked> {
        let env = env.extend(program);
        debug!(
            globals = env.globals().count(),
            functions = env.function_names().count(),
            classes = env.class_names().count(),
            "extended declaration environment"
        );

        let var_inits = program
            .var_inits
            .iter()
            .map(|init| self.check_var_init(init))
            .collect::<TypeResult<Vec<_>>>()?;

        let fun_defs = program
            .fun_defs
            .iter()
            .map(|fun| self.check_fun_def(fun, &env))
            .collect::<TypeResult<Vec<_>>>()?;

        let classes = program
            .classes
            .iter()
            .map(|class| self.check_class(class, &env))
            .collect::<TypeResult<Vec<_>>>()?;

        let mut scope = LocalScope::top_level();
        let stmts = self.check_block(&program.stmts, &env, &mut scope)?;
        let ty = block_type(&stmts);

        let promoted: Vec<_> = scope.into_bindings().collect();
        debug!(count = promoted.len(), "promoting top-level bindings to globals");
        let env = env.with_globals(promoted);

        Ok(Checked {
            program: Program {
                var_inits,
                fun_defs,
                classes,
                stmts,
                span: program.span,
            },
            env,
            ty,
        })
    }

    fn check_var_init(&self, init: &VarInit) -> TypeResult<VarInit<Type>> {
        let ty = self.type_literal(&init.value.node, init.value.span)?;
        if !is_assignable(&init.var.ty, &ty) {
            return Err(TypeError::Mismatch {
                expected: init.var.ty.clone(),
                found: ty,
                span: init.span,
            });
        }
        Ok(VarInit {
            var: init.var.clone(),
            value: init.value.clone(),
            span: init.span,
            ann: ty,
        })
    }

    fn check_fun_def(&self, fun: &FunDef, env: &GlobalEnv) -> TypeResult<FunDef<Type>> {
        debug!(function = %fun.name.node, "checking function");

        let mut scope = LocalScope::function(fun.return_type.clone());
        for param in &fun.params {
            scope.bind(param.name.node.clone(), param.ty.clone());
        }

        let mut inits = Vec::with_capacity(fun.inits.len());
        for init in &fun.inits {
            inits.push(self.check_var_init(init)?);
            scope.bind(init.var.name.node.clone(), init.var.ty.clone());
        }

        let body = self.check_block(&fun.body, env, &mut scope)?;

        Ok(FunDef {
            name: fun.name.clone(),
            params: fun.params.clone(),
            return_type: fun.return_type.clone(),
            inits,
            body,
            span: fun.span,
            ann: fun.return_type.clone(),
        })
    }

    fn check_class(&self, class: &ClassDef, env: &GlobalEnv) -> TypeResult<ClassDef<Type>> {
        debug!(class = %class.name.node, "checking class");

        let fields = class
            .fields
            .iter()
            .map(|field| self.check_var_init(field))
            .collect::<TypeResult<Vec<_>>>()?;

        let methods = class
            .methods
            .iter()
            .map(|method| self.check_fun_def(method, env))
            .collect::<TypeResult<Vec<_>>>()?;

        Ok(ClassDef {
            name: class.name.clone(),
            fields,
            methods,
            span: class.span,
            ann: Type::Class(class.name.node.clone()),
        })
    }

    fn check_block(
        &self,
        stmts: &[Stmt],
        env: &GlobalEnv,
        scope: &mut LocalScope,
    ) -> TypeResult<Vec<Stmt<Type>>> {
        stmts
            .iter()
            .map(|stmt| self.check_stmt(stmt, env, scope))
            .collect()
    }

    pub fn type_literal(&self, literal: &Literal, span: Span) -> TypeResult<Type> {
        match literal {
            Literal::Bool(_) => Ok(Type::Bool),
            Literal::Num(_) => Ok(Type::Num),
            Literal::None => Ok(Type::None),
            Literal::Str(_) => Err(TypeError::Internal {
                message: "string literals are not part of the typed subset".to_string(),
                span,
            }),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn check_stmt(
        &self,
        stmt: &Stmt,
        env: &GlobalEnv,
        scope: &mut LocalScope,
    ) -> TypeResult<Stmt<Type>> {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let bound = resolve_name(&target.node, env, scope).cloned();
                let value = match bound {
                    Some(bound) => {
                        let value = self.infer_expr(value, env, scope)?;
                        if !is_assignable(&bound, &value.ann) {
                            return Err(TypeError::Mismatch {
                                expected: bound,
                                found: value.ann,
                                span: stmt.span,
                            });
                        }
                        value
                    }
                    // First assignment at top level declares the name.
                    None if scope.is_top_level() => {
                        let value = self.infer_expr(value, env, scope)?;
                        trace!(name = %target.node, ty = %value.ann, "declared by assignment");
                        scope.bind(target.node.clone(), value.ann.clone());
                        value
                    }
                    None => {
                        return Err(undefined_name(
                            &target.node,
                            target.span,
                            variable_names(env, scope),
                        ))
                    }
                };
                Ok(Stmt::with_ann(
                    StmtKind::Assign {
                        target: target.clone(),
                        value,
                    },
                    stmt.span,
                    Type::None,
                ))
            }

            StmtKind::Destructure { .. } => Err(TypeError::Internal {
                message: "destructuring assignment is not implemented".to_string(),
                span: stmt.span,
            }),

            StmtKind::Expr(expr) => {
                let expr = self.infer_expr(expr, env, scope)?;
                let ty = expr.ann.clone();
                Ok(Stmt::with_ann(StmtKind::Expr(expr), stmt.span, ty))
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.check_condition(condition, env, scope)?;
                let then_branch = self.check_block(then_branch, env, scope)?;
                let else_branch = self.check_block(else_branch, env, scope)?;

                let then_ty = block_type(&then_branch);
                let else_ty = block_type(&else_branch);
                let ty = join(&then_ty, &else_ty).ok_or_else(|| TypeError::Syntax {
                    message: format!(
                        "branches of `if` have different types: `{}` and `{}`",
                        then_ty, else_ty
                    ),
                    span: stmt.span,
                })?;

                Ok(Stmt::with_ann(
                    StmtKind::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    stmt.span,
                    ty,
                ))
            }

            StmtKind::Return(value) => {
                if scope.is_top_level() {
                    return Err(TypeError::Syntax {
                        message: "`return` outside of a function".to_string(),
                        span: stmt.span,
                    });
                }

                let value = value
                    .as_ref()
                    .map(|value| self.infer_expr(value, env, scope))
                    .transpose()?;
                let ty = value.as_ref().map_or(Type::None, |value| value.ann.clone());

                let expected = scope.expected_return();
                if !is_assignable(expected, &ty) {
                    return Err(TypeError::Mismatch {
                        expected: expected.clone(),
                        found: ty,
                        span: stmt.span,
                    });
                }

                Ok(Stmt::with_ann(StmtKind::Return(value), stmt.span, ty))
            }

            StmtKind::While { condition, body } => {
                let condition = self.check_condition(condition, env, scope)?;
                let body = self.check_block(body, env, scope)?;
                Ok(Stmt::with_ann(
                    StmtKind::While { condition, body },
                    stmt.span,
                    Type::None,
                ))
            }

            StmtKind::Pass => Ok(Stmt::with_ann(StmtKind::Pass, stmt.span, Type::None)),

            StmtKind::FieldAssign {
                object,
                field,
                value,
            } => {
                let object = self.infer_expr(object, env, scope)?;
                let (owner, class) = class_of(&object, field, stmt.span, env)?;
                let field_ty = class
                    .field(&field.node)
                    .cloned()
                    .ok_or_else(|| undefined_attribute(owner, field, stmt.span))?;

                let value = self.infer_expr(value, env, scope)?;
                if !is_assignable(&field_ty, &value.ann) {
                    return Err(TypeError::Mismatch {
                        expected: field_ty,
                        found: value.ann,
                        span: stmt.span,
                    });
                }

                Ok(Stmt::with_ann(
                    StmtKind::FieldAssign {
                        object,
                        field: field.clone(),
                        value,
                    },
                    stmt.span,
                    Type::None,
                ))
            }
        }
    }

    fn check_condition(
        &self,
        condition: &Expr,
        env: &GlobalEnv,
        scope: &LocalScope,
    ) -> TypeResult<Expr<Type>> {
        let condition = self.infer_expr(condition, env, scope)?;
        if condition.ann != Type::Bool {
            return Err(TypeError::NonBoolCondition {
                found: condition.ann,
                span: condition.span,
            });
        }
        Ok(condition)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn infer_expr(
        &self,
        expr: &Expr,
        env: &GlobalEnv,
        scope: &LocalScope,
    ) -> TypeResult<Expr<Type>> {
        let typed = self.infer_expr_kind(expr, env, scope)?;
        trace!(ty = %typed.ann, start = typed.span.start, "typed expression");
        Ok(typed)
    }

    fn infer_expr_kind(
        &self,
        expr: &Expr,
        env: &GlobalEnv,
        scope: &LocalScope,
    ) -> TypeResult<Expr<Type>> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(literal) => {
                let ty = self.type_literal(literal, span)?;
                Ok(Expr::with_ann(ExprKind::Literal(literal.clone()), span, ty))
            }

            ExprKind::Id(name) => {
                let ty = resolve_name(name, env, scope)
                    .cloned()
                    .ok_or_else(|| undefined_name(name, span, variable_names(env, scope)))?;
                Ok(Expr::with_ann(ExprKind::Id(name.clone()), span, ty))
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.infer_expr(left, env, scope)?;
                let right = self.infer_expr(right, env, scope)?;
                let ty = binary_result(*op, &left.ann, &right.ann).ok_or_else(|| {
                    TypeError::UnsupportedOperands {
                        op: op.symbol().into(),
                        operands: vec![left.ann.clone(), right.ann.clone()],
                        span,
                    }
                })?;
                Ok(Expr::with_ann(
                    ExprKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                    ty,
                ))
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.infer_expr(operand, env, scope)?;
                let ty = match (op, &operand.ann) {
                    (UnaryOp::Neg, Type::Num) => Type::Num,
                    (UnaryOp::Not, Type::Bool) => Type::Bool,
                    _ => {
                        return Err(TypeError::UnsupportedOperands {
                            op: op.symbol().into(),
                            operands: vec![operand.ann],
                            span,
                        })
                    }
                };
                Ok(Expr::with_ann(
                    ExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    span,
                    ty,
                ))
            }

            ExprKind::Builtin1 { name, arg } => {
                let (arg, ty) = if name.node == PRINT_BUILTIN {
                    let arg = self.infer_expr(arg, env, scope)?;
                    let ty = arg.ann.clone();
                    (arg, ty)
                } else {
                    let sig = env
                        .function(&name.node)
                        .ok_or_else(|| undefined_name(&name.node, name.span, env.function_names()))?;
                    let arg = self.infer_expr(arg, env, scope)?;
                    if sig.params.len() != 1 {
                        return Err(TypeError::Signature {
                            message: format!(
                                "builtin `{}` takes {} argument(s) but 1 was given",
                                name.node,
                                sig.params.len()
                            ),
                            span,
                        });
                    }
                    if self.config.strict_builtin_arguments && !is_assignable(&sig.params[0], &arg.ann)
                    {
                        return Err(TypeError::Mismatch {
                            expected: sig.params[0].clone(),
                            found: arg.ann,
                            span: arg.span,
                        });
                    }
                    (arg, sig.ret.clone())
                };
                Ok(Expr::with_ann(
                    ExprKind::Builtin1 {
                        name: name.clone(),
                        arg: Box::new(arg),
                    },
                    span,
                    ty,
                ))
            }

            ExprKind::Builtin2 {
                name,
                first,
                second,
            } => {
                let sig = env
                    .function(&name.node)
                    .ok_or_else(|| undefined_name(&name.node, name.span, env.function_names()))?;
                let first = self.infer_expr(first, env, scope)?;
                let second = self.infer_expr(second, env, scope)?;
                if sig.params.len() != 2 {
                    return Err(TypeError::Signature {
                        message: format!(
                            "builtin `{}` takes {} argument(s) but 2 were given",
                            name.node,
                            sig.params.len()
                        ),
                        span,
                    });
                }
                self.check_builtin_argument(&sig.params[0], &first)?;
                self.check_builtin_argument(&sig.params[1], &second)?;
                Ok(Expr::with_ann(
                    ExprKind::Builtin2 {
                        name: name.clone(),
                        first: Box::new(first),
                        second: Box::new(second),
                    },
                    span,
                    sig.ret.clone(),
                ))
            }

            ExprKind::Call { callee, args } => {
                if env.class(&callee.node).is_some() {
                    return self.infer_construct(callee, args, span, env, scope);
                }

                let sig = env.function(&callee.node).ok_or_else(|| {
                    undefined_name(
                        &callee.node,
                        callee.span,
                        env.function_names().chain(env.class_names()),
                    )
                })?;
                let args = self.infer_args(args, env, scope)?;
                let actual: Vec<Type> = args.iter().map(|arg| arg.ann.clone()).collect();
                if actual != sig.params {
                    return Err(TypeError::Signature {
                        message: format!(
                            "`{}` expects arguments ({}) but was called with ({})",
                            callee.node,
                            type_list(&sig.params),
                            type_list(&actual)
                        ),
                        span,
                    });
                }
                Ok(Expr::with_ann(
                    ExprKind::Call {
                        callee: callee.clone(),
                        args,
                    },
                    span,
                    sig.ret.clone(),
                ))
            }

            ExprKind::Construct { class, args } => {
                self.infer_construct(class, args, span, env, scope)
            }

            ExprKind::Lookup { object, field } => {
                let object = self.infer_expr(object, env, scope)?;
                let (owner, class) = class_of(&object, field, span, env)?;
                let ty = class
                    .field(&field.node)
                    .cloned()
                    .ok_or_else(|| undefined_attribute(owner, field, span))?;
                Ok(Expr::with_ann(
                    ExprKind::Lookup {
                        object: Box::new(object),
                        field: field.clone(),
                    },
                    span,
                    ty,
                ))
            }

            ExprKind::MethodCall {
                object,
                method,
                args,
            } => {
                let object = self.infer_expr(object, env, scope)?;
                let (owner, class) = class_of(&object, method, span, env)?;
                let sig = class
                    .method(&method.node)
                    .ok_or_else(|| undefined_attribute(owner.clone(), method, span))?;
                let args = self.infer_args(args, env, scope)?;

                if args.len() + 1 != sig.params.len() {
                    return Err(TypeError::Signature {
                        message: format!(
                            "method `{}.{}` takes {} argument(s) including the receiver but {} were given",
                            owner,
                            method.node,
                            sig.params.len(),
                            args.len() + 1
                        ),
                        span,
                    });
                }

                let actuals = std::iter::once(&object).chain(args.iter());
                for (param, actual) in sig.params.iter().zip(actuals) {
                    if !is_assignable(param, &actual.ann) {
                        return Err(TypeError::Mismatch {
                            expected: param.clone(),
                            found: actual.ann.clone(),
                            span: actual.span,
                        });
                    }
                }

                Ok(Expr::with_ann(
                    ExprKind::MethodCall {
                        object: Box::new(object),
                        method: method.clone(),
                        args,
                    },
                    span,
                    sig.ret.clone(),
                ))
            }
        }
    }

    fn infer_args(
        &self,
        args: &[Expr],
        env: &GlobalEnv,
        scope: &LocalScope,
    ) -> TypeResult<Vec<Expr<Type>>> {
        args.iter()
            .map(|arg| self.infer_expr(arg, env, scope))
            .collect()
    }

    fn infer_construct(
        &self,
        class: &Ident,
        args: &[Expr],
        span: Span,
        env: &GlobalEnv,
        scope: &LocalScope,
    ) -> TypeResult<Expr<Type>> {
        let info = env
            .class(&class.node)
            .ok_or_else(|| undefined_name(&class.node, class.span, env.class_names()))?;
        let args = self.infer_args(args, env, scope)?;

        match info.constructor() {
            Some(init) => {
                if init.ret != Type::None {
                    return Err(TypeError::Signature {
                        message: format!(
                            "`{}` of class `{}` must return `{}`, not `{}`",
                            INIT_METHOD,
                            class.node,
                            Type::None,
                            init.ret
                        ),
                        span,
                    });
                }

                let expected = init.params.len().saturating_sub(1);
                if args.len() != expected {
                    return Err(TypeError::Signature {
                        message: format!(
                            "constructor of `{}` takes {} argument(s) but {} were given",
                            class.node,
                            expected,
                            args.len()
                        ),
                        span,
                    });
                }

                if self.config.check_constructor_arguments {
                    for (param, arg) in init.params.iter().skip(1).zip(&args) {
                        if !is_assignable(param, &arg.ann) {
                            return Err(TypeError::Mismatch {
                                expected: param.clone(),
                                found: arg.ann.clone(),
                                span: arg.span,
                            });
                        }
                    }
                }
            }
            None if !args.is_empty() => {
                return Err(TypeError::Signature {
                    message: format!(
                        "class `{}` has no `{}` and takes no arguments, but {} were given",
                        class.node,
                        INIT_METHOD,
                        args.len()
                    ),
                    span,
                });
            }
            None => {}
        }

        Ok(Expr::with_ann(
            ExprKind::Construct {
                class: class.clone(),
                args,
            },
            span,
            Type::Class(class.node.clone()),
        ))
    }

    fn check_builtin_argument(&self, param: &Type, arg: &Expr<Type>) -> TypeResult<()> {
        let accepted = if self.config.conventional_builtin_direction {
            is_assignable(param, &arg.ann)
        } else {
            is_assignable(&arg.ann, param)
        };
        if accepted {
            Ok(())
        } else {
            Err(TypeError::Mismatch {
                expected: param.clone(),
                found: arg.ann.clone(),
                span: arg.span,
            })
        }
    }
}

fn block_type(stmts: &[Stmt<Type>]) -> Type {
    stmts.last().map_or(Type::None, |stmt| stmt.ann.clone())
}

fn binary_result(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    let both = |ty: &Type| left == ty && right == ty;
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::IntDiv | BinaryOp::Mod => {
            both(&Type::Num).then_some(Type::Num)
        }
        BinaryOp::Eq | BinaryOp::NotEq => (left == right).then_some(Type::Bool),
        BinaryOp::LtEq | BinaryOp::GtEq | BinaryOp::Lt | BinaryOp::Gt => {
            both(&Type::Num).then_some(Type::Bool)
        }
        BinaryOp::And | BinaryOp::Or => both(&Type::Bool).then_some(Type::Bool),
        BinaryOp::Is => {
            (left.is_none_or_class() && right.is_none_or_class()).then_some(Type::Bool)
        }
    }
}

fn resolve_name<'a>(name: &str, env: &'a GlobalEnv, scope: &'a LocalScope) -> Option<&'a Type> {
    scope.lookup(name).or_else(|| env.global(name))
}

fn variable_names<'a>(
    env: &'a GlobalEnv,
    scope: &'a LocalScope,
) -> impl Iterator<Item = &'a SmolStr> {
    scope.names().chain(env.globals().map(|(name, _)| name))
}

/// The class named by `object`'s type, for access to `member`.
fn class_of<'e>(
    object: &Expr<Type>,
    member: &Ident,
    span: Span,
    env: &'e GlobalEnv,
) -> TypeResult<(SmolStr, &'e ClassInfo)> {
    let Some(name) = object.ann.class_name() else {
        return Err(undefined_attribute(object.ann.tag().into(), member, span));
    };
    let info = env
        .class(name)
        .ok_or_else(|| undefined_name(name, span, env.class_names()))?;
    Ok((name.clone(), info))
}

fn undefined_attribute(owner: SmolStr, member: &Ident, span: Span) -> TypeError {
    TypeError::UndefinedAttribute {
        owner,
        attribute: member.node.clone(),
        span,
    }
}

fn undefined_name<'a>(
    name: &SmolStr,
    span: Span,
    candidates: impl IntoIterator<Item = &'a SmolStr>,
) -> TypeError {
    TypeError::UndefinedName {
        name: name.clone(),
        similar: similar_names(name, candidates),
        span,
    }
}

/// Up to three candidates within a small edit distance of `name`.
fn similar_names<'a>(name: &str, candidates: impl IntoIterator<Item = &'a SmolStr>) -> Vec<SmolStr> {
    let max_distance = (name.chars().count() / 3).max(1);
    let mut scored: Vec<(usize, SmolStr)> = candidates
        .into_iter()
        .filter(|candidate| candidate.as_str() != name)
        .map(|candidate| (strsim::damerau_levenshtein(name, candidate), candidate.clone()))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.truncate(3);
    scored.into_iter().map(|(_, name)| name).collect()
}

fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serpent_ast::Spanned;

    fn num(n: i64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Num(n)), Span::dummy())
    }

    fn boolean(b: bool) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Bool(b)), Span::dummy())
    }

    fn none() -> Expr {
        Expr::new(ExprKind::Literal(Literal::None), Span::dummy())
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::dummy(),
        )
    }

    fn infer(expr: &Expr) -> TypeResult<Type> {
        TypeChecker::new()
            .infer_expr(expr, &GlobalEnv::new(), &LocalScope::top_level())
            .map(|typed| typed.ann)
    }

    #[test]
    fn test_literals() {
        let checker = TypeChecker::new();
        assert_eq!(checker.type_literal(&Literal::Num(3), Span::dummy()), Ok(Type::Num));
        assert_eq!(checker.type_literal(&Literal::Bool(false), Span::dummy()), Ok(Type::Bool));
        assert_eq!(checker.type_literal(&Literal::None, Span::dummy()), Ok(Type::None));
        assert!(matches!(
            checker.type_literal(&Literal::Str("hi".into()), Span::new(0, 4)),
            Err(TypeError::Internal { span, .. }) if span == Span::new(0, 4)
        ));
    }

    #[test]
    fn test_binary_operator_table() {
        assert_eq!(infer(&binary(BinaryOp::Add, num(1), num(2))), Ok(Type::Num));
        assert_eq!(infer(&binary(BinaryOp::Mod, num(7), num(2))), Ok(Type::Num));
        assert_eq!(infer(&binary(BinaryOp::Lt, num(1), num(2))), Ok(Type::Bool));
        assert_eq!(infer(&binary(BinaryOp::Eq, boolean(true), boolean(false))), Ok(Type::Bool));
        assert_eq!(infer(&binary(BinaryOp::NotEq, none(), none())), Ok(Type::Bool));
        assert_eq!(infer(&binary(BinaryOp::And, boolean(true), boolean(false))), Ok(Type::Bool));
        assert_eq!(infer(&binary(BinaryOp::Is, none(), none())), Ok(Type::Bool));
    }

    #[test]
    fn test_binary_operator_rejections() {
        let err = infer(&binary(BinaryOp::Add, num(1), boolean(true))).unwrap_err();
        assert_eq!(
            err,
            TypeError::UnsupportedOperands {
                op: "+".into(),
                operands: vec![Type::Num, Type::Bool],
                span: Span::dummy(),
            }
        );
        assert!(infer(&binary(BinaryOp::Eq, num(1), boolean(true))).is_err());
        assert!(infer(&binary(BinaryOp::Gt, boolean(true), boolean(false))).is_err());
        assert!(infer(&binary(BinaryOp::Or, num(0), num(1))).is_err());
        assert!(infer(&binary(BinaryOp::Is, num(0), none())).is_err());
    }

    #[test]
    fn test_unary_operators() {
        let neg = |e| Expr::new(ExprKind::Unary { op: UnaryOp::Neg, operand: Box::new(e) }, Span::dummy());
        let not = |e| Expr::new(ExprKind::Unary { op: UnaryOp::Not, operand: Box::new(e) }, Span::dummy());

        assert_eq!(infer(&neg(num(4))), Ok(Type::Num));
        assert_eq!(infer(&not(boolean(true))), Ok(Type::Bool));
        assert_eq!(
            infer(&not(num(1))),
            Err(TypeError::UnsupportedOperands {
                op: "not".into(),
                operands: vec![Type::Num],
                span: Span::dummy(),
            })
        );
        assert!(infer(&neg(boolean(false))).is_err());
    }

    #[test]
    fn test_identifier_resolution_prefers_local() {
        let env = GlobalEnv::new().with_global("x", Type::Num);
        let mut scope = LocalScope::function(Type::None);
        scope.bind("x", Type::Bool);

        let id = Expr::new(ExprKind::Id("x".into()), Span::dummy());
        let typed = TypeChecker::new().infer_expr(&id, &env, &scope).unwrap();
        assert_eq!(typed.ann, Type::Bool);
    }

    #[test]
    fn test_unresolved_name_suggests_similar() {
        let env = GlobalEnv::new()
            .with_global("count", Type::Num)
            .with_global("total", Type::Num);
        let id = Expr::new(ExprKind::Id("cuont".into()), Span::new(6, 11));

        let err = TypeChecker::new()
            .infer_expr(&id, &env, &LocalScope::top_level())
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::UndefinedName {
                name: "cuont".into(),
                similar: vec!["count".into()],
                span: Span::new(6, 11),
            }
        );
    }

    #[test]
    fn test_similar_names_ranking() {
        let candidates: Vec<SmolStr> = vec!["value".into(), "valve".into(), "vale".into(), "zzz".into()];
        assert_eq!(
            similar_names("valu", &candidates),
            vec![SmolStr::from("vale"), SmolStr::from("value")]
        );
        assert!(similar_names("q", &[SmolStr::from("q")]).is_empty());
    }

    #[test]
    fn test_builtin1_unknown_name() {
        let call = Expr::new(
            ExprKind::Builtin1 {
                name: Spanned::dummy("len".into()),
                arg: Box::new(num(1)),
            },
            Span::dummy(),
        );
        assert!(matches!(infer(&call), Err(TypeError::UndefinedName { name, .. }) if name == "len"));
    }
}
