//! Type Checker Performance Benchmarks
//!
//! This module benchmarks the Serpent type checker:
//! - Declaration-heavy programs (many functions and classes)
//! - Long top-level blocks with first-assignment promotion
//! - Incremental sessions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serpent_ast::{
    BinaryOp, ClassDef, Expr, ExprKind, FunDef, Ident, Literal, Program, Span, Spanned, Stmt, StmtKind,
    Type, TypedVar, VarInit,
};
use serpent_types::{GlobalEnv, Session, TypeChecker};

// ============================================================================
// Program Generators
// ============================================================================

fn ident(name: &str) -> Ident {
    Spanned::dummy(name.into())
}

fn num(n: i64) -> Expr {
    Expr::new(ExprKind::Literal(Literal::Num(n)), Span::dummy())
}

fn id(name: &str) -> Expr {
    Expr::new(ExprKind::Id(name.into()), Span::dummy())
}

fn add(left: Expr, right: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(left),
            right: Box::new(right),
        },
        Span::dummy(),
    )
}

fn assign(target: &str, value: Expr) -> Stmt {
    Stmt::new(
        StmtKind::Assign {
            target: ident(target),
            value,
        },
        Span::dummy(),
    )
}

fn typed_var(name: &str, ty: Type) -> TypedVar {
    TypedVar {
        name: ident(name),
        ty,
        span: Span::dummy(),
    }
}

fn num_init(name: &str, value: i64) -> VarInit {
    VarInit {
        var: typed_var(name, Type::Num),
        value: Spanned::dummy(Literal::Num(value)),
        span: Span::dummy(),
        ann: (),
    }
}

/// `count` functions `f_i(a: int, b: int) -> int: return a + b`
fn generate_many_functions(count: usize) -> Program {
    let fun_defs = (0..count)
        .map(|i| FunDef {
            name: ident(&format!("f_{i}")),
            params: vec![typed_var("a", Type::Num), typed_var("b", Type::Num)],
            return_type: Type::Num,
            inits: vec![num_init("tmp", 0)],
            body: vec![
                assign("tmp", add(id("a"), id("b"))),
                Stmt::new(StmtKind::Return(Some(id("tmp"))), Span::dummy()),
            ],
            span: Span::dummy(),
            ann: (),
        })
        .collect();

    Program {
        fun_defs,
        ..Program::default()
    }
}

/// `count` classes with one field and a getter, each constructed once.
fn generate_many_classes(count: usize) -> Program {
    let mut classes = Vec::with_capacity(count);
    let mut stmts = Vec::with_capacity(count * 2);

    for i in 0..count {
        let name = format!("C{i}");
        classes.push(ClassDef {
            name: ident(&name),
            fields: vec![num_init("value", i as i64)],
            methods: vec![FunDef {
                name: ident("get"),
                params: vec![typed_var("self", Type::class(name.as_str()))],
                return_type: Type::Num,
                inits: vec![],
                body: vec![Stmt::new(
                    StmtKind::Return(Some(Expr::new(
                        ExprKind::Lookup {
                            object: Box::new(id("self")),
                            field: ident("value"),
                        },
                        Span::dummy(),
                    ))),
                    Span::dummy(),
                )],
                span: Span::dummy(),
                ann: (),
            }],
            span: Span::dummy(),
            ann: (),
        });

        let var = format!("obj_{i}");
        stmts.push(assign(
            &var,
            Expr::new(
                ExprKind::Call {
                    callee: ident(&name),
                    args: vec![],
                },
                Span::dummy(),
            ),
        ));
        stmts.push(Stmt::new(
            StmtKind::Expr(Expr::new(
                ExprKind::MethodCall {
                    object: Box::new(id(&var)),
                    method: ident("get"),
                    args: vec![],
                },
                Span::dummy(),
            )),
            Span::dummy(),
        ));
    }

    Program {
        classes,
        stmts,
        ..Program::default()
    }
}

/// A top-level block of `count` chained first assignments.
fn generate_many_globals(count: usize) -> Program {
    let mut stmts = vec![assign("v_0", num(0))];
    for i in 1..count {
        stmts.push(assign(
            &format!("v_{i}"),
            add(id(&format!("v_{}", i - 1)), num(i as i64)),
        ));
    }
    Program {
        stmts,
        ..Program::default()
    }
}

// ============================================================================
// Type Checker Benchmarks
// ============================================================================

fn bench_typechecker_stress(c: &mut Criterion) {
    let mut group = c.benchmark_group("typechecker_stress");
    let env = GlobalEnv::new();
    let checker = TypeChecker::new();

    let generators: [(&str, fn(usize) -> Program); 3] = [
        ("functions", generate_many_functions),
        ("classes", generate_many_classes),
        ("globals", generate_many_globals),
    ];

    for (name, generate) in generators {
        for &count in &[10, 100, 1000] {
            let program = generate(count);
            group.throughput(Throughput::Elements(count as u64));

            group.bench_with_input(BenchmarkId::new(name, count), &program, |b, program| {
                b.iter(|| {
                    let result = checker.check_program(black_box(&env), black_box(program));
                    black_box(result)
                })
            });
        }
    }

    group.finish();
}

fn bench_session_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for &chunks in &[10, 100] {
        let programs: Vec<Program> = (0..chunks)
            .map(|i| {
                let stmts = if i == 0 {
                    vec![assign("acc_0", num(0))]
                } else {
                    vec![assign(
                        &format!("acc_{i}"),
                        add(id(&format!("acc_{}", i - 1)), num(1)),
                    )]
                };
                Program {
                    stmts,
                    ..Program::default()
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("chunks", chunks), &programs, |b, programs| {
            b.iter(|| {
                let mut session = Session::new();
                for program in programs {
                    let _ = black_box(session.check_chunk(program));
                }
                black_box(session.committed_chunks())
            })
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Main
// ============================================================================

criterion_group!(benches, bench_typechecker_stress, bench_session_chunks);

criterion_main!(benches);
