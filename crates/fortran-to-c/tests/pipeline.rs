// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

mod common;

use common::{body, declare, evaluate, options, render, subroutine};
use fortran_to_c::data::source::{
    BinaryOperator, Dimension, DoLoop, Procedure, ProcedureKind, UnaryOperator,
};
use fortran_to_c::{
    Include, Intent, SourceExpr, SourceNode, SourceType, SourceUnit, TargetExpr, TargetStmt,
    TranslateError, TranslationPipeline,
};
use std::collections::BTreeMap;

fn assign(lhs: SourceExpr, rhs: SourceExpr) -> SourceNode {
    SourceNode::ExprStatement(SourceExpr::assign(lhs, rhs))
}

fn plus(lhs: SourceExpr, rhs: SourceExpr) -> SourceExpr {
    SourceExpr::binary(BinaryOperator::Add, lhs, rhs)
}

#[test]
fn test_subroutine_round_trip() {
    let source = SourceUnit::new(
        "s.f90",
        vec![subroutine(
            "s",
            &[("x", SourceType::integer()), ("y", SourceType::integer())],
            vec![
                declare(Intent::In, "x", SourceType::integer()),
                declare(Intent::Out, "y", SourceType::integer()),
                assign(SourceExpr::var("y"), plus(SourceExpr::var("x"), SourceExpr::int(1))),
            ],
        )],
    );

    let output = TranslationPipeline::new(&options()).run(&[source]);
    assert_eq!(output.error_count(), 0);

    let translated = output.unit("s.c").unwrap();
    assert_eq!(
        render(&translated.unit.globals),
        vec!["void s(int x, int* y) {", "  *y = x + 1;"]
    );
    assert_eq!(
        translated.unit.includes,
        vec![Include::system("math.h"), Include::local("s.h")]
    );
    assert_eq!(render(&translated.header.globals), vec!["void s(int x, int* y);"]);
}

#[test]
fn test_header_synthesis() {
    let source = SourceUnit::new(
        "lib.f90",
        vec![
            declare(Intent::Default, "g", SourceType::integer()),
            SourceNode::Procedure(Procedure {
                name: "f".to_string(),
                kind: ProcedureKind::Function {
                    return_type: SourceType::integer(),
                },
                params: vec![fortran_to_c::data::source::Parameter {
                    name: "x".to_string(),
                    ty: SourceType::integer(),
                }],
                body: vec![
                    declare(Intent::In, "x", SourceType::integer()),
                    assign(SourceExpr::FunctionRef("f".to_string()), SourceExpr::var("x")),
                ],
            }),
        ],
    );

    let output = TranslationPipeline::new(&options()).run(&[source]);
    let translated = output.unit("lib.c").unwrap();

    assert_eq!(translated.header.file_name, "lib.h");
    assert!(translated.header.pragma_once);
    assert_eq!(render(&translated.header.globals), vec!["extern int g;", "int f(int x);"]);
    assert_eq!(
        render(&translated.unit.globals),
        vec!["int g;", "int f(int x) {", "  int __retv;", "  __retv = x;"]
    );
}

#[test]
fn test_callee_in_later_unit_hoists_all_arguments() {
    let main = SourceUnit::new(
        "main.f90",
        vec![subroutine(
            "driver",
            &[],
            vec![
                declare(Intent::Default, "a", SourceType::integer()),
                declare(Intent::Default, "c", SourceType::integer()),
                SourceNode::ExprStatement(SourceExpr::call(
                    "sub",
                    vec![
                        SourceExpr::var("a"),
                        plus(SourceExpr::var("a"), SourceExpr::int(1)),
                        SourceExpr::var("c"),
                    ],
                )),
            ],
        )],
    );
    let lib = SourceUnit::new(
        "lib.f90",
        vec![subroutine(
            "sub",
            &[
                ("p", SourceType::integer()),
                ("q", SourceType::integer()),
                ("r", SourceType::integer()),
            ],
            vec![
                declare(Intent::In, "p", SourceType::integer()),
                declare(Intent::In, "r", SourceType::integer()),
                declare(Intent::Out, "q", SourceType::integer()),
            ],
        )],
    );

    let output = TranslationPipeline::new(&options()).run(&[main, lib]);
    assert_eq!(output.error_count(), 0);

    let driver = body(&output.unit("main.c").unwrap().unit.globals);
    assert_eq!(
        render(&driver.statements),
        vec![
            "int a;",
            "int c;",
            "int __arg0 = a;",
            "int __arg1 = a + 1;",
            "int __arg2 = c;",
            "sub(__arg0, &__arg1, __arg2);",
        ]
    );
    let lib = output.unit("lib.c").unwrap();
    assert_eq!(render(&lib.header.globals), vec!["void sub(int p, int* q, int r);"]);
}

#[test]
fn test_descending_loop_runs_downwards() {
    let source = SourceUnit::new(
        "count.f90",
        vec![
            declare(Intent::Default, "i", SourceType::integer()),
            SourceNode::Do(DoLoop {
                init: SourceExpr::assign(SourceExpr::var("i"), SourceExpr::int(5)),
                bound: SourceExpr::int(1),
                step: Some(SourceExpr::unary(UnaryOperator::Minus, SourceExpr::int(1))),
                body: vec![],
            }),
        ],
    );

    let output = TranslationPipeline::new(&options()).run(&[source]);
    let globals = &output.unit("count.c").unwrap().unit.globals;

    let initializer = |name: &str| {
        globals.iter().find_map(|stmt| match stmt {
            TargetStmt::Declaration(decl) if decl.name.starts_with(name) => {
                Some((decl.name.clone(), decl.initializer.clone().unwrap()))
            }
            _ => None,
        })
    };
    let (bound, bound_value) = initializer("__fbound").unwrap();
    let (direction, direction_value) = initializer("__fdir").unwrap();
    let (step, step_value) = initializer("__fstep").unwrap();
    assert_eq!(step_value, TargetExpr::Int(-1));

    // the direction flag is computed once, right after `i = 5`
    let mut env = BTreeMap::new();
    env.insert("i", 5);
    env.insert(bound.as_str(), evaluate(&bound_value, &env).unwrap());
    let ascending = evaluate(&direction_value, &env).unwrap();
    assert_eq!(ascending, 0);
    env.insert(direction.as_str(), ascending);

    let Some(TargetStmt::For { test, step: increment, .. }) = globals.last() else {
        panic!("expected the loop last");
    };
    assert_eq!(
        increment,
        &TargetExpr::binary(
            fortran_to_c::data::expressions::BinOp::AddAssign,
            TargetExpr::var("i"),
            TargetExpr::var(step)
        )
    );

    let mut visited = Vec::new();
    let mut i = 5;
    loop {
        env.insert("i", i);
        if evaluate(test, &env).unwrap() == 0 {
            break;
        }
        visited.push(i);
        i += -1;
    }
    assert_eq!(visited, vec![5, 4, 3, 2, 1]);
}

#[test]
fn test_array_offsets_follow_column_major_layout() {
    // integer :: a(0:2, 1:3); a(i, j) = 0
    let source = SourceUnit::new(
        "grid.f90",
        vec![
            declare(
                Intent::Default,
                "a",
                SourceType::array(SourceType::integer(), vec![Dimension::range(0, 2), Dimension::range(1, 3)]),
            ),
            declare(Intent::Default, "i", SourceType::integer()),
            declare(Intent::Default, "j", SourceType::integer()),
            assign(
                SourceExpr::subscript("a", vec![SourceExpr::var("i"), SourceExpr::var("j")]),
                SourceExpr::int(0),
            ),
        ],
    );

    let output = TranslationPipeline::new(&options()).run(&[source]);
    let globals = &output.unit("grid.c").unwrap().unit.globals;
    assert_eq!(render(globals)[0], "int a[9];");
    assert_eq!(render(globals)[3], "a[i + (j - 1) * 3] = 0;");

    let TargetStmt::Expr(TargetExpr::Binary { lhs, .. }) = &globals[3] else {
        panic!("expected an assignment");
    };
    let TargetExpr::Index { index, .. } = lhs.as_ref() else {
        panic!("expected an indexed store");
    };
    for i in 0..=2 {
        for j in 1..=3 {
            let env = BTreeMap::from([("i", i), ("j", j)]);
            assert_eq!(evaluate(index, &env), Some(i + (j - 1) * 3));
        }
    }
    assert_eq!(evaluate(index, &BTreeMap::from([("i", 0), ("j", 1)])), Some(0));
}

#[test]
fn test_modules_link_to_their_headers() {
    let geometry = SourceUnit::new(
        "src/geometry.f90",
        vec![SourceNode::Module {
            name: "geometry".to_string(),
            body: vec![
                SourceNode::Implicit,
                declare(Intent::Default, "scale", SourceType::real_kind(8)),
                SourceNode::Contains,
                subroutine("reset", &[], vec![assign(SourceExpr::var("scale"), SourceExpr::int(1))]),
            ],
        }],
    );
    let main = SourceUnit::new(
        "src/main.f90",
        vec![
            SourceNode::Use {
                module: "geometry".to_string(),
            },
            SourceNode::ExprStatement(SourceExpr::call("reset", vec![])),
        ],
    );

    let output = TranslationPipeline::new(&options()).run(&[main, geometry]);
    assert_eq!(output.error_count(), 0);

    let main = output.unit("src/main.c").unwrap();
    assert_eq!(
        main.unit.includes,
        vec![
            Include::system("math.h"),
            Include::local("geometry.h"),
            Include::local("main.h"),
        ]
    );
    let geometry = output.unit("src/geometry.c").unwrap();
    assert_eq!(
        render(&geometry.header.globals),
        vec!["extern double scale;", "void reset();"]
    );
}

#[test]
fn test_failed_units_are_counted_and_dropped() {
    let broken = SourceUnit::new(
        "broken.f90",
        vec![SourceNode::Module {
            name: "broken".to_string(),
            body: vec![SourceNode::Unknown {
                kind: "SgComputedGotoStatement".to_string(),
            }],
        }],
    );
    let user = SourceUnit::new(
        "user.f90",
        vec![SourceNode::Use {
            module: "broken".to_string(),
        }],
    );
    let fine = SourceUnit::new("fine.f90", vec![declare(Intent::Default, "n", SourceType::integer())]);

    let output = TranslationPipeline::new(&options()).run(&[broken, user, fine]);

    assert_eq!(output.error_count(), 2);
    assert_eq!(output.failures[0].file_name, "broken.f90");
    assert_eq!(
        output.failures[0].error,
        TranslateError::unhandled_construct("SgComputedGotoStatement")
    );
    assert_eq!(output.failures[1].file_name, "user.f90");
    assert_eq!(
        output.failures[1].error,
        TranslateError::UnresolvedModule("broken".to_string())
    );
    assert_eq!(output.units.len(), 1);
    assert!(output.unit("fine.c").is_some());
}

#[test]
fn test_unresolved_modules_cascade_to_their_users() {
    // a uses a module nobody defines; b uses the module a defines
    let a = SourceUnit::new(
        "a.f90",
        vec![
            SourceNode::Use {
                module: "missing".to_string(),
            },
            SourceNode::Module {
                name: "ma".to_string(),
                body: vec![declare(Intent::Default, "k", SourceType::integer())],
            },
        ],
    );
    let b = SourceUnit::new(
        "b.f90",
        vec![SourceNode::Use {
            module: "ma".to_string(),
        }],
    );
    let c = SourceUnit::new("c.f90", vec![]);

    let output = TranslationPipeline::new(&options()).run(&[a, b, c]);

    assert_eq!(output.error_count(), 2);
    assert_eq!(output.failures[0].file_name, "a.f90");
    assert_eq!(output.failures[0].error, TranslateError::UnresolvedModule("missing".to_string()));
    assert_eq!(output.failures[1].file_name, "b.f90");
    assert_eq!(output.failures[1].error, TranslateError::UnresolvedModule("ma".to_string()));
    assert_eq!(output.units.len(), 1);

    // no surviving unit includes a header that was not produced
    let headers: Vec<String> = output.units.iter().map(|t| t.header.file_name.clone()).collect();
    for translated in &output.units {
        for include in translated.unit.includes.iter().filter(|include| !include.system) {
            assert!(headers.contains(&include.name), "{} is never generated", include.name);
        }
    }
}

#[test]
fn test_hoisted_temporaries_take_the_parameter_type() {
    // call s(sqrt(y)) with `real(8), intent(inout) :: q`
    let main = SourceUnit::new(
        "main.f90",
        vec![subroutine(
            "driver",
            &[],
            vec![
                declare(Intent::Default, "y", SourceType::real_kind(8)),
                SourceNode::ExprStatement(SourceExpr::call(
                    "s",
                    vec![SourceExpr::call("sqrt", vec![SourceExpr::var("y")])],
                )),
            ],
        )],
    );
    let lib = SourceUnit::new(
        "lib.f90",
        vec![subroutine(
            "s",
            &[("q", SourceType::real_kind(8))],
            vec![declare(Intent::InOut, "q", SourceType::real_kind(8))],
        )],
    );

    let output = TranslationPipeline::new(&options()).run(&[main, lib]);
    assert_eq!(output.error_count(), 0);

    let lib = output.unit("lib.c").unwrap();
    assert_eq!(render(&lib.header.globals), vec!["void s(double* q);"]);
    let driver = body(&output.unit("main.c").unwrap().unit.globals);
    assert_eq!(
        render(&driver.statements),
        vec!["double y;", "double __arg0 = sqrt(y);", "s(&__arg0);"]
    );
}

#[test]
fn test_missing_runtime_root_fails_every_unit() {
    let mut options = options();
    options.runtime_root = None;
    // only meaningful when the environment does not provide a root either
    if std::env::var_os(fortran_to_c::options::RUNTIME_ROOT_ENV).is_some() {
        return;
    }
    let output = TranslationPipeline::new(&options).run(&[SourceUnit::new("a.f90", vec![])]);
    assert_eq!(output.error_count(), 1);
    assert!(matches!(output.failures[0].error, TranslateError::Config(_)));
}

#[test]
fn test_json_source_tree() {
    let json = r#"{
        "file_name": "s.f90",
        "language": "fortran",
        "body": [
            {"procedure": {
                "name": "s",
                "kind": "subroutine",
                "params": [
                    {"name": "x", "ty": {"integer": {}}},
                    {"name": "y", "ty": {"integer": {}}}
                ],
                "body": [
                    {"variable_declaration": {"intent": "in",
                        "variables": [{"name": "x", "ty": {"integer": {}}}]}},
                    {"variable_declaration": {"intent": "out",
                        "variables": [{"name": "y", "ty": {"integer": {}}}]}},
                    {"expr_statement": {"binary": {
                        "op": "assign",
                        "lhs": {"var": "y"},
                        "rhs": {"binary": {"op": "add", "lhs": {"var": "x"}, "rhs": {"literal": {"int": 1}}}}
                    }}}
                ]
            }}
        ]
    }"#;
    let source: SourceUnit = serde_json::from_str(json).unwrap();
    let output = TranslationPipeline::new(&options()).run(&[source]);
    let translated = output.unit("s.c").unwrap();
    assert_eq!(
        render(&translated.unit.globals),
        vec!["void s(int x, int* y) {", "  *y = x + 1;"]
    );

    let serialized = serde_json::to_value(&translated.header).unwrap();
    assert_eq!(serialized["file_name"], "s.h");
    assert_eq!(serialized["pragma_once"], true);
}
