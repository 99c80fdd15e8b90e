//! Unit tests for the type checker module.
//!
//! This module contains tests for:
//! - The type algebra (`lub`, `glb`, `compatible`)
//! - Type interning and scopes
//! - Typing rules for declarations, expressions and items
//! - Return-path analysis

use super::{
    cfa::{analyse_function, Verdict},
    environment::{EnvEntry, Environment},
    symbol_table::{LocalInfo, SymbolTable},
    type_checker::{analyse, type_check, TypeChecker},
    typed_ast::{TypedExprKind, TypedProgram, TypedStmt},
    types::{compatible, glb, lub, Type},
};
use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.pop".to_string())).unwrap();
    parse(tokens).unwrap()
}

fn analyse_source(source: &str) -> (TypedProgram, Vec<Error>) {
    analyse(&parse_source(source))
}

fn error_names(source: &str) -> Vec<String> {
    let (_, errors) = analyse_source(source);
    errors.iter().map(|error| error.get_error_name().to_string()).collect()
}

fn check_ok(source: &str) -> TypedProgram {
    match type_check(&parse_source(source)) {
        Ok(program) => program,
        Err(errors) => panic!(
            "expected no errors, found {:?}",
            errors.iter().map(|error| error.to_string()).collect::<Vec<_>>()
        ),
    }
}

/// Type of the expression in `debug <expr>;`, the first statement of `main`.
fn debug_type(program: &TypedProgram) -> String {
    let main = program.function("main").unwrap();
    match &main.body.statements[0] {
        TypedStmt::Expression { expression, .. } => match &expression.kind {
            TypedExprKind::Debug(value) => program.table.type_definition(value.ty).to_string(),
            other => panic!("expected debug, found {:?}", other),
        },
        other => panic!("expected expression, found {:?}", other),
    }
}

// Type algebra

#[test]
fn test_glb_narrows_literals() {
    assert_eq!(glb(&Type::I_LITERAL, &Type::U8), Type::U8);
    assert_eq!(glb(&Type::U8, &Type::I_LITERAL), Type::U8);
    assert_eq!(glb(&Type::F_LITERAL, &Type::F64), Type::F64);
    assert_eq!(glb(&Type::NUMERIC, &Type::I_LITERAL), Type::I_LITERAL);
    assert_eq!(glb(&Type::I_LITERAL, &Type::STR), Type::NOTHING);
    assert_eq!(glb(&Type::I_LITERAL, &Type::F_LITERAL), Type::NOTHING);
    assert_eq!(glb(&Type::I32, &Type::U8), Type::NOTHING);
}

#[test]
fn test_lub_widens_to_any() {
    assert_eq!(lub(&Type::I_LITERAL, &Type::I64), Type::I64);
    assert_eq!(lub(&Type::STR, &Type::BOOLEAN), Type::ANY);
    assert_eq!(lub(&Type::F_LITERAL, &Type::I32), Type::ANY);
}

#[test]
fn test_any_is_absorbing() {
    // ANY yields to the other operand in both directions
    assert_eq!(lub(&Type::ANY, &Type::STR), Type::STR);
    assert_eq!(glb(&Type::STR, &Type::ANY), Type::STR);
    assert_eq!(lub(&Type::ANY, &Type::ANY), Type::ANY);
}

#[test]
fn test_list_bounds_are_elementwise() {
    let literals = Type::list(Type::I_LITERAL);
    assert_eq!(glb(&literals, &Type::list(Type::U8)), Type::list(Type::U8));
    assert_eq!(glb(&Type::list(Type::ANY), &Type::list(Type::STR)), Type::list(Type::STR));
    assert_eq!(lub(&literals, &Type::list(Type::STR)), Type::list(Type::ANY));
}

#[test]
fn test_compatible() {
    assert!(compatible(&Type::F_LITERAL, &Type::F32));
    assert!(!compatible(&Type::F_LITERAL, &Type::I32));
    assert!(compatible(&Type::I_LITERAL, &Type::U64));
    assert!(compatible(&Type::NUMERIC, &Type::F64));
    assert!(!compatible(&Type::NUMERIC, &Type::STR));
    assert!(!compatible(&Type::I32, &Type::I64));
    assert!(compatible(&Type::ANY, &Type::STR));
    assert!(!compatible(&Type::NOTHING, &Type::STR));
    assert!(compatible(&Type::list(Type::I_LITERAL), &Type::list(Type::I32)));
    assert!(!compatible(&Type::list(Type::I32), &Type::range(Type::I32)));
}

#[test]
fn test_compatible_is_symmetric_for_placeholders() {
    let pairs = [
        (Type::I_LITERAL, Type::U8),
        (Type::NUMERIC, Type::F_LITERAL),
        (Type::F_LITERAL, Type::I32),
        (Type::list(Type::NUMERIC), Type::list(Type::I16)),
    ];
    for (a, b) in pairs {
        assert_eq!(compatible(&a, &b), compatible(&b, &a), "{} / {}", a, b);
    }
}

#[test]
fn test_type_display() {
    assert_eq!(Type::list(Type::list(Type::U8)).to_string(), "[][]u8");
    assert_eq!(Type::range(Type::I32).to_string(), "Range(i32)");
    assert_eq!(Type::I_LITERAL.to_string(), "{integer}");

    let function = Type::Function {
        args: vec![Type::I32, Type::STR],
        ret: Box::new(Type::BOOLEAN),
        names: vec![String::from("a"), String::from("b")],
    };
    assert_eq!(function.to_string(), "fn(a: i32, b: str) -> bool");
}

#[test]
fn test_numeric_classification() {
    assert!(Type::I_LITERAL.is_integer());
    assert!(Type::U16.is_integer());
    assert!(!Type::F32.is_integer());
    assert!(Type::F_LITERAL.is_float());
    assert!(Type::NUMERIC.is_numeric());
    assert!(!Type::BOOLEAN.is_numeric());
    assert_eq!(Type::I8.integer_bounds(), Some((-128, 127)));
    assert_eq!(Type::U8.integer_bounds(), Some((0, 255)));
    assert_eq!(Type::F32.integer_bounds(), None);
}

// Symbol table and environment

#[test]
fn test_type_interning() {
    let mut table = SymbolTable::new();

    let first = table.type_id(Type::list(Type::I32));
    let second = table.type_id(Type::list(Type::I32));
    let other = table.type_id(Type::list(Type::I64));

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(table.type_count(), 2);
    assert_eq!(table.type_definition(first), &Type::list(Type::I32));
}

#[test]
fn test_records_intern_structurally() {
    let mut table = SymbolTable::new();
    let point = || Type::Record {
        name: String::from("Point"),
        fields: vec![String::from("x")],
        types: vec![Type::I32],
    };

    assert_eq!(table.type_id(point()), table.type_id(point()));
}

#[test]
#[should_panic(expected = "never issued")]
fn test_unknown_id_panics() {
    let mut issuer = SymbolTable::new();
    let ty = issuer.type_id(Type::I32);
    let local = issuer.insert_local(LocalInfo {
        name: String::from("x"),
        ty,
    });

    SymbolTable::new().local(local);
}

#[test]
fn test_environment_shadowing() {
    let mut table = SymbolTable::new();
    let ty = table.type_id(Type::I32);
    let outer = table.insert_local(LocalInfo {
        name: String::from("x"),
        ty,
    });
    let inner = table.insert_local(LocalInfo {
        name: String::from("x"),
        ty,
    });

    let mut environment = Environment::new();
    environment.put("x", EnvEntry::Local(outer));
    environment.push_scope();
    assert!(!environment.declared_here("x"));
    environment.put("x", EnvEntry::Local(inner));
    assert_eq!(environment.get("x"), Some(EnvEntry::Local(inner)));

    environment.pop_scope();
    assert_eq!(environment.get("x"), Some(EnvEntry::Local(outer)));
    assert!(environment.declared_here("x"));
}

#[test]
fn test_root_scope_is_never_popped() {
    let mut environment = Environment::new();
    environment.pop_scope();
    environment.pop_scope();
    assert_eq!(environment.depth(), 0);
}

#[test]
fn test_scopes_unwind_after_analysis() {
    let program = parse_source(
        "fn f(c: bool) -> i32 { if c { let a: i32 = 1; return a; } while c { let b: i32 = 2; } 3 }",
    );
    let mut type_checker = TypeChecker::new();
    type_checker.check_program(&program);

    assert!(type_checker.errors().is_empty());
    assert_eq!(type_checker.environment().depth(), 0);
    assert!(type_checker.environment().get("a").is_none());
    assert!(type_checker.environment().get("f").is_some());
}

// Declarations and literals

#[test]
fn test_out_of_range_literal() {
    let (program, errors) = analyse_source("fn main() { let x: u8 = 300; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_kind(), ErrorKind::Semantic);
    assert_eq!(errors[0].get_error_name(), "LiteralOutOfRange");
    assert_eq!(errors[0].get_position().line, 1);
    assert_eq!(errors[0].get_position().column, 25);

    // The declaration still binds `x` with its declared type
    let main = program.function("main").unwrap();
    match &main.body.statements[0] {
        TypedStmt::Declaration { local, .. } => {
            let ty = program.table.local(*local).ty;
            assert_eq!(program.table.type_definition(ty), &Type::U8);
        }
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_negated_literal_range() {
    check_ok("fn main() { let a: i8 = -128; let b: i8 = 127; let c: u64 = 18446744073709551615; }");

    assert_eq!(error_names("fn main() { let a: u8 = -1; }"), vec!["LiteralOutOfRange"]);
    assert_eq!(error_names("fn main() { let a: i8 = -129; }"), vec!["LiteralOutOfRange"]);
}

#[test]
fn test_float_literal_range() {
    check_ok("fn main() { let a: f32 = 1.5; let b: f64 = -2.5; }");

    let huge = format!("4{}.0", "0".repeat(38));
    let source = format!("fn main() {{ let a: f32 = {}; let b: f64 = {}; }}", huge, huge);
    assert_eq!(error_names(&source), vec!["LiteralOutOfRange"]);
}

#[test]
fn test_declaration_type_mismatch() {
    assert_eq!(error_names("fn main() { let a: i32 = \"s\"; }"), vec!["TypeMatchError"]);
    assert_eq!(error_names("fn main() { let a: f32 = 1; }"), vec!["TypeMatchError"]);
    assert_eq!(error_names("fn main() { let a: Foo = 1; }"), vec!["UnknownType"]);
}

#[test]
fn test_redeclaration_and_shadowing() {
    assert_eq!(
        error_names("fn main() { let x: i32 = 1; let x: i32 = 2; }"),
        vec!["VariableAlreadyDeclared"]
    );

    let program = check_ok("fn main() { let x: i32 = 1; { let x: str = \"s\"; debug x; } let y: i32 = x; }");
    let main = program.function("main").unwrap();
    match &main.body.statements[2] {
        TypedStmt::Declaration { value: Some(value), .. } => match &value.kind {
            TypedExprKind::Variable {
                entry: Some(EnvEntry::Local(local)),
                ..
            } => {
                let ty = program.table.local(*local).ty;
                assert_eq!(program.table.type_definition(ty), &Type::I32);
            }
            other => panic!("expected resolved variable, found {:?}", other),
        },
        other => panic!("expected declaration, found {:?}", other),
    }
}

#[test]
fn test_undeclared_variable_reports_once() {
    assert_eq!(error_names("fn main() { debug y + 1; }"), vec!["VariableNotDeclared"]);
    assert_eq!(error_names("fn main() { let a: i32 = y * 2 - 1; }"), vec!["VariableNotDeclared"]);
}

// Expressions

#[test]
fn test_literal_types() {
    assert_eq!(debug_type(&check_ok("fn main() { debug 1; }")), "{integer}");
    assert_eq!(debug_type(&check_ok("fn main() { debug 1.5; }")), "{float}");
    assert_eq!(debug_type(&check_ok("fn main() { debug \"s\"; }")), "str");
    assert_eq!(debug_type(&check_ok("fn main() { debug 'c'; }")), "char");
    assert_eq!(debug_type(&check_ok("fn main() { debug true; }")), "bool");
}

#[test]
fn test_list_types() {
    assert_eq!(debug_type(&check_ok("fn main() { debug [1, 2, 3]; }")), "[]{integer}");
    assert_eq!(debug_type(&check_ok("fn main() { debug []; }")), "[]any");

    let (program, errors) = analyse_source("fn main() { debug [1, \"x\", 'c']; }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "ListElementTypeError");
    assert_eq!(debug_type(&program), "[]?");
}

#[test]
fn test_list_narrows_to_concrete_element() {
    let program = check_ok("fn f(a: u8) { debug [1, a, 2]; }");
    let function = program.function("f").unwrap();
    match &function.body.statements[0] {
        TypedStmt::Expression { expression, .. } => {
            assert_eq!(program.table.type_definition(expression.ty), &Type::list(Type::U8))
        }
        other => panic!("expected expression, found {:?}", other),
    }
}

#[test]
fn test_arithmetic() {
    check_ok("fn f(a: i32) -> i32 { return a * 2 + a % 3 - a ^ 2; }");
    check_ok("fn f(a: f64) -> f64 { return a / 2.0; }");

    assert_eq!(
        error_names("fn f(a: i32, b: u8) -> i32 { return a + b; }"),
        vec!["OperandTypeMatchError"]
    );
    assert_eq!(error_names("fn f(a: i32) -> i32 { return a + 1.5; }"), vec!["OperandTypeMatchError"]);
    assert_eq!(error_names("fn f(a: str) { debug a + 1; }"), vec!["ExpectedNumeric"]);
}

#[test]
fn test_division_by_literal_zero() {
    assert_eq!(error_names("fn f(a: i32) -> i32 { return a / 0; }"), vec!["DivisionByZero"]);
    assert_eq!(error_names("fn f(a: f32) -> f32 { return a % 0.0; }"), vec!["DivisionByZero"]);
    check_ok("fn f(a: i32) -> i32 { return a * 0; }");
}

#[test]
fn test_comparison_and_logic() {
    check_ok("fn f(a: i32, b: bool) -> bool { return a < 3 && !b || a == 4; }");
    check_ok("fn f(a: str, b: i32) -> bool { return a != \"x\" && b >= 0; }");

    assert_eq!(error_names("fn f(a: i32) -> bool { return a && true; }"), vec!["ExpectedBoolean"]);
    assert_eq!(error_names("fn f(a: str) -> bool { return a < 1; }"), vec!["ExpectedNumeric"]);
}

#[test]
fn test_prefix_operators() {
    check_ok("fn f(a: i32, xs: []str, s: str) -> i32 { let n: i64 = #xs + #s; return -a; }");

    assert_eq!(error_names("fn f() { debug !1; }"), vec!["ExpectedBoolean"]);
    assert_eq!(error_names("fn f() { debug -\"s\"; }"), vec!["ExpectedNumeric"]);
    assert_eq!(error_names("fn f() { debug #1; }"), vec!["NotMeasurable"]);
}

#[test]
fn test_assignment() {
    check_ok("fn f(xs: []i32) { let x: i32 = 1; x = 2; x += 3; xs[0] = x; }");

    assert_eq!(error_names("fn f() { let x: i32 = 1; x = \"s\"; }"), vec!["TypeMatchError"]);
    assert_eq!(error_names("fn f() { 1 = 2; }"), vec!["InvalidAssignmentTarget"]);
    assert_eq!(error_names("fn f() { let x: i32 = 1; x += \"s\"; }"), vec!["TypeMatchError"]);
}

#[test]
fn test_compound_assignment_only_needs_compatible_types() {
    check_ok("fn f() { let s: str = \"a\"; s += \"b\"; let b: bool = true; b ^= false; }");
}

#[test]
fn test_range() {
    let program = check_ok("fn main() { debug 0..10; }");
    assert_eq!(debug_type(&program), "Range({integer})");

    assert_eq!(error_names("fn main() { debug 0..\"a\"; }"), vec!["OperandTypeMatchError"]);
}

#[test]
fn test_index() {
    check_ok("fn f(xs: []i32) -> i32 { return xs[0]; }");

    assert_eq!(error_names("fn f(xs: []i32) -> i32 { return xs[\"a\"]; }"), vec!["TypeMatchError"]);
    assert_eq!(error_names("fn f(x: i32) { debug x[0]; }"), vec!["ExpectedList"]);
}

#[test]
fn test_records() {
    let program = check_ok(
        "rec Point { let x: i32; let y: i32; } fn main() { let p: Point = Point(1, 2); debug p.y; }",
    );

    let record = program.record("Point").unwrap();
    assert_eq!(record.fields.len(), 2);
    let info = program.table.record(record.id);
    assert_eq!(program.table.type_definition(info.ty).to_string(), "Point");

    let main = program.function("main").unwrap();
    match &main.body.statements[0] {
        TypedStmt::Declaration { value: Some(value), .. } => {
            assert!(matches!(
                program.table.type_definition(value.ty),
                Type::Record { name, .. } if name == "Point"
            ));
        }
        other => panic!("expected declaration, found {:?}", other),
    }
    match &main.body.statements[1] {
        TypedStmt::Expression { expression, .. } => match &expression.kind {
            TypedExprKind::Debug(value) => {
                assert!(matches!(value.kind, TypedExprKind::Field { index: Some(1), .. }));
                assert_eq!(program.table.type_definition(value.ty), &Type::I32);
            }
            other => panic!("expected debug, found {:?}", other),
        },
        other => panic!("expected expression, found {:?}", other),
    }
}

#[test]
fn test_record_constructor_signature() {
    let program = check_ok("rec Point { let x: i32; let y: i32; } fn main() { debug Point; }");
    assert_eq!(debug_type(&program), "fn(x: i32, y: i32) -> Point");
}

#[test]
fn test_record_errors() {
    let record = "rec Point { let x: i32; let y: i32; }";

    assert_eq!(
        error_names(&format!("{} fn main() {{ debug Point(1); }}", record)),
        vec!["MissingArguments"]
    );
    assert_eq!(
        error_names(&format!("{} fn main() {{ debug Point(1, 2, 3); }}", record)),
        vec!["UnexpectedArguments"]
    );
    assert_eq!(
        error_names(&format!("{} fn main() {{ debug Point(1, \"y\"); }}", record)),
        vec!["ArgumentTypeMatchError"]
    );
    assert_eq!(
        error_names(&format!("{} fn f(p: Point) {{ debug p.z; }}", record)),
        vec!["UnknownField"]
    );
    assert_eq!(error_names("fn f(x: i32) { debug x.y; }"), vec!["ExpectedRecord"]);
}

#[test]
fn test_labels_are_not_checked() {
    check_ok("rec Point { let x: i32; let y: i32; } fn main() { debug Point(y: 1, x: 2); }");
}

#[test]
fn test_record_declaration_errors() {
    assert_eq!(
        error_names("rec P { let x: i32; } rec P { let y: i32; } fn main() { debug 1; }"),
        vec!["RecordAlreadyDeclared"]
    );
    assert_eq!(error_names("rec i32 { let x: i32; }"), vec!["RecordAlreadyDeclared"]);
    assert_eq!(error_names("rec P { let x: i32; let x: str; }"), vec!["FieldAlreadyDeclared"]);
}

#[test]
fn test_records_see_only_earlier_records() {
    check_ok("rec B { let x: i32; } rec A { let b: B; let bs: []B; }");
    assert_eq!(error_names("rec A { let b: B; } rec B { let x: i32; }"), vec!["UnknownType"]);
}

// Calls and functions

#[test]
fn test_numeric_conversions() {
    check_ok("fn f(x: f64) -> i32 { return i32(x); }");
    check_ok("fn f(x: u8) -> f32 { let y: f32 = f32(x) * 2.0; return y; }");

    assert_eq!(error_names("fn f() -> i32 { return i32(\"s\"); }"), vec!["ArgumentTypeMatchError"]);
}

#[test]
fn test_recursion() {
    check_ok("fn fact(n: i64) -> i64 { if n <= 1 { return 1; } return n * fact(n - 1); }");
}

#[test]
fn test_no_forward_references() {
    assert_eq!(
        error_names("fn a() -> i32 { return b(); } fn b() -> i32 { return 1; }"),
        vec!["VariableNotDeclared"]
    );
    check_ok("fn b() -> i32 { return 1; } fn a() -> i32 { return b(); }");
}

#[test]
fn test_not_callable() {
    assert_eq!(error_names("fn f(x: i32) { debug x(1); }"), vec!["NotCallable"]);
}

#[test]
fn test_duplicate_functions_and_parameters() {
    assert_eq!(
        error_names("fn a() { debug 1; } fn a() { debug 2; }"),
        vec!["FunctionAlreadyDeclared"]
    );
    assert_eq!(error_names("fn i32() { debug 1; }"), vec!["FunctionAlreadyDeclared"]);
    assert_eq!(
        error_names("rec P { let x: i32; } fn P() { debug 1; }"),
        vec!["FunctionAlreadyDeclared"]
    );
    assert_eq!(error_names("fn f(a: i32, a: i32) { debug a; }"), vec!["VariableAlreadyDeclared"]);
}

#[test]
fn test_function_signature() {
    let program = check_ok("fn add(a: i32, b: i32) -> i32 { a + b } fn main() { debug add; }");

    assert_eq!(debug_type(&program), "fn(a: i32, b: i32) -> i32");
    let add = program.function("add").unwrap();
    assert_eq!(add.parameters.len(), 2);
    assert_eq!(program.table.type_definition(add.return_type), &Type::I32);
}

#[test]
fn test_missing_arrow_means_unit() {
    let program = check_ok("fn main() { debug 1; }");
    let main = program.function("main").unwrap();
    assert_eq!(program.table.type_definition(main.return_type), &Type::UNIT);
}

#[test]
fn test_empty_block() {
    assert_eq!(error_names("fn main() {}"), vec!["EmptyBlock"]);
    assert_eq!(error_names("fn main(c: bool) { while c {} }"), vec!["EmptyBlock"]);
}

// Control flow

#[test]
fn test_if_else_returns() {
    check_ok("fn f() -> i32 { if true { return 1; } else { return 2; } }");
}

#[test]
fn test_expression_bodies() {
    check_ok("fn two() -> i32 { 2 }");
    check_ok("fn pick(c: bool) -> i32 { if c { 1 } else { 2 } }");
    check_ok("fn nested(c: bool, d: bool) -> str { if c { \"a\" } else if d { \"b\" } else { \"c\" } }");
}

#[test]
fn test_if_condition_and_branches() {
    assert_eq!(error_names("fn f() { if 1 { debug 1; } }"), vec!["ExpectedBoolean"]);
    assert_eq!(
        error_names("fn f(c: bool) -> i32 { if c { 1 } else { \"s\" } }"),
        vec!["BranchTypeMatchError"]
    );
}

#[test]
fn test_loops() {
    check_ok("fn f() { for i: i32 in 0..10 { debug i; } }");
    check_ok("fn f() { let i: i32 = 0; while i < 10 { i += 1; } }");

    assert_eq!(error_names("fn f() { for i: i32 in 5 { debug i; } }"), vec!["ExpectedRange"]);
    assert_eq!(error_names("fn f() { for s: str in 0..3 { debug s; } }"), vec!["TypeMatchError"]);
    assert_eq!(error_names("fn f() { while 1 { debug 1; } }"), vec!["ExpectedBoolean"]);
}

#[test]
fn test_loop_variable_is_scoped() {
    assert_eq!(
        error_names("fn f() { for i: i32 in 0..3 { debug i; } debug i; }"),
        vec!["VariableNotDeclared"]
    );
}

#[test]
fn test_return_type_mismatch() {
    // The mismatch is reported once, without a missing-return error on top
    assert_eq!(error_names("fn f() -> i32 { return \"s\"; }"), vec!["ReturnTypeMatchError"]);
    assert_eq!(error_names("fn f() { return 1; }"), vec!["ReturnTypeMatchError"]);
}

#[test]
fn test_missing_return() {
    let (_, errors) = analyse_source("fn f() -> i32 { debug 1; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "MissingReturn");
    assert_eq!(
        errors[0].message(),
        "function `f` does not return a value of type `i32` on every path"
    );
}

#[test]
fn test_while_never_guarantees_a_return() {
    assert_eq!(
        error_names("fn f(c: bool) -> i32 { while c { return 1; } }"),
        vec!["MissingReturn"]
    );
}

#[test]
fn test_if_else_with_falling_arm() {
    assert_eq!(
        error_names("fn f(c: bool) -> i32 { if c { return 1; } else { debug 2; } }"),
        vec!["MissingReturn"]
    );
}

#[test]
fn test_if_without_else_uses_then_arm() {
    // Accepted although `c == false` falls through
    check_ok("fn f(c: bool) -> i32 { if c { return 1; } }");

    assert_eq!(
        error_names("fn f(c: bool) -> i32 { if c { debug 1; } }"),
        vec!["MissingReturn"]
    );
}

#[test]
fn test_verdicts() {
    let verdict = |source: &str| {
        let program = check_ok(source);
        let function = &program.functions[0];
        analyse_function(&function.body, function.return_type)
    };

    assert_eq!(verdict("fn f() -> i32 { return 1; }"), Verdict::ReturnedType);
    assert_eq!(verdict("fn f() -> i64 { debug 0; return 1; }"), Verdict::ReturnedType);
    assert_eq!(
        verdict("fn f(c: bool) -> i32 { if c { return 1; } else { return 2; } }"),
        Verdict::ReturnedType
    );
    // A literal tail is not yet the declared type, the body type accepts it
    assert_eq!(verdict("fn f() -> i32 { 5 }"), Verdict::ReturnedOther);
    assert_eq!(verdict("fn f(x: i32) -> i32 { x }"), Verdict::ReturnedType);
    assert_eq!(verdict("fn f(c: bool) { while c { debug 1; } debug 2; }"), Verdict::Continue);
    // A trailing loop is a `unit` tail
    assert_eq!(verdict("fn f(c: bool) { while c { debug 1; } }"), Verdict::ReturnedType);
    assert_eq!(verdict("fn f() { debug 1; }"), Verdict::Continue);
    assert_eq!(verdict("fn f() { for i: i32 in 0..3 { debug i; } debug 0; }"), Verdict::Continue);
}

#[test]
fn test_return_inside_for_body() {
    let source = "fn f() -> i32 { for i: i32 in 0..10 { return i; } }";
    let (program, errors) = analyse_source(source);

    assert!(errors.is_empty());
    let function = &program.functions[0];
    assert_eq!(analyse_function(&function.body, function.return_type), Verdict::ReturnedType);
}

#[test]
fn test_return_operand_is_analysed_first() {
    let source = "fn f(c: bool) -> i32 { return if c { return 1; } else { return 2; }; }";
    let (program, errors) = analyse_source(source);

    let names: Vec<&str> = errors.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(names, vec!["ReturnTypeMatchError"]);
    let function = &program.functions[0];
    assert_eq!(analyse_function(&function.body, function.return_type), Verdict::ReturnedType);
}

#[test]
fn test_return_records_narrowed_type() {
    let program = check_ok("fn f() -> u16 { return 7; }");
    let function = program.function("f").unwrap();
    match &function.body.statements[0] {
        TypedStmt::Expression { expression, .. } => {
            assert!(matches!(expression.kind, TypedExprKind::Return(Some(_))));
            assert_eq!(program.table.type_definition(expression.ty), &Type::U16);
        }
        other => panic!("expected return, found {:?}", other),
    }
}

#[test]
fn test_errors_accumulate_across_functions() {
    let (_, errors) = analyse_source(
        "fn a() { let x: u8 = 300; } fn b() -> bool { return 1; } fn c() { debug nope; }",
    );

    let names: Vec<&str> = errors.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(names, vec!["LiteralOutOfRange", "ReturnTypeMatchError", "VariableNotDeclared"]);
    assert!(errors.iter().all(|error| error.get_kind() == ErrorKind::Semantic));
}

#[test]
fn test_dump() {
    let program = check_ok("rec P { let x: i32; } fn main() { let a: i32 = 1; debug a; }");
    let dump = program.dump();

    assert!(dump.contains("rec P"));
    assert!(dump.contains("fn main: fn() -> unit"));
    assert!(dump.contains("let a: i32"));
    assert!(dump.contains("debug: i32"));
}
