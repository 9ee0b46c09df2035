// ABOUTME: Black-box grammar and precedence checks against the public parser API

use loxi::ast::{Expr, LiteralValue, Stmt};
use loxi::lexer::scan_tokens;
use loxi::parser::parse;
use loxi::token::TokenKind;

fn parse_source(source: &str) -> Vec<Stmt> {
    parse(scan_tokens(source).unwrap()).unwrap()
}

#[test]
fn test_full_precedence_ladder_left_to_right() {
    let stmts = parse_source("print 1 + 2 * 3 > 4 == true;");
    match &stmts[0] {
        Stmt::Print(Expr::Binary { operator, .. }) => {
            assert_eq!(operator.kind, TokenKind::EqualEqual);
        }
        other => panic!("expected top-level equality, got {other:?}"),
    }
}

#[test]
fn test_unary_minus_binds_tighter_than_star() {
    let stmts = parse_source("print -2 * 3;");
    match &stmts[0] {
        Stmt::Print(Expr::Binary { left, operator, .. }) => {
            assert_eq!(operator.kind, TokenKind::Star);
            assert!(matches!(**left, Expr::Unary { .. }));
        }
        other => panic!("expected print of a binary expression, got {other:?}"),
    }
}

#[test]
fn test_and_or_bind_looser_than_equality() {
    let stmts = parse_source("print 1 == 1 and 2 == 2;");
    assert!(matches!(stmts[0], Stmt::Print(Expr::Logical { .. })));
}

#[test]
fn test_call_arguments_are_parsed_in_order() {
    let stmts = parse_source("f(1, 2, 3);");
    match &stmts[0] {
        Stmt::Expression(Expr::Call { arguments, .. }) => {
            assert_eq!(arguments.len(), 3);
            assert!(matches!(arguments[0], Expr::Literal(LiteralValue::Number(1.0))));
            assert!(matches!(arguments[2], Expr::Literal(LiteralValue::Number(3.0))));
        }
        other => panic!("expected a call expression statement, got {other:?}"),
    }
}

#[test]
fn test_nested_function_declaration_inside_function_body() {
    let stmts = parse_source("func outer(){ func inner(){ return 1; } return inner; }");
    match &stmts[0] {
        Stmt::Function(decl) => {
            assert!(matches!(decl.body[0], Stmt::Function(_)));
        }
        other => panic!("expected a function declaration, got {other:?}"),
    }
}

#[test]
fn test_every_statement_shape_round_trips_through_one_program() {
    let source = r#"
        class Shape {
            area() { return 0; }
        }
        class Circle < Shape {
            init(r) { this.r = r; }
            area() { return this.r * this.r; }
        }
        var c = Circle(2);
        if (c.area() > 0) {
            print "positive";
        } else {
            print "non-positive";
        }
        for (var i = 0; i < 1; i = i + 1) {
            print i;
        }
    "#;
    let stmts = parse_source(source);
    assert_eq!(stmts.len(), 5);
    assert!(matches!(stmts[0], Stmt::Class { .. }));
    assert!(matches!(stmts[1], Stmt::Class { .. }));
    assert!(matches!(stmts[2], Stmt::Var { .. }));
    assert!(matches!(stmts[3], Stmt::If { .. }));
    assert!(matches!(stmts[4], Stmt::For { .. }));
}
