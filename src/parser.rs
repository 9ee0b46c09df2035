// ABOUTME: Recursive-descent parser turning a token stream into a statement list

use crate::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::error::ParseError;
use crate::token::{Literal, Token, TokenKind};
use std::rc::Rc;

/// Recursive-descent parser with a one-token lookahead (`peek`) and a
/// `match_kind` helper that consumes the current token only if it matches.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

type ExprResult = Result<Expr, ParseError>;
type StmtResult = Result<Stmt, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    /// `program → declaration* EOF`
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        Ok(statements)
    }

    // ===== token stream primitives =====

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(expected, self.peek()))
        }
    }

    // ===== declarations =====

    fn declaration(&mut self) -> StmtResult {
        if self.match_kind(TokenKind::Class) {
            return self.class_declaration();
        }
        if self.match_kind(TokenKind::Func) {
            let decl = self.function_decl("function")?;
            return Ok(Stmt::Function(Rc::new(decl)));
        }
        if self.match_kind(TokenKind::Var) {
            return self.var_declaration();
        }
        self.statement()
    }

    /// `classDecl → "class" IDENT ( "<" IDENT )? "{" funcDecl* "}"`
    ///
    /// Method declarations inside the body reuse the function-declaration
    /// grammar directly, without a leading `func` keyword.
    fn class_declaration(&mut self) -> StmtResult {
        let name = self.consume(TokenKind::Identifier, "class name")?.clone();

        let superclass = if self.match_kind(TokenKind::Less) {
            Some(self.consume(TokenKind::Identifier, "superclass name")?.clone())
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "'{' before class body")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(Rc::new(self.function_decl("method")?));
        }

        self.consume(TokenKind::RightBrace, "'}' after class body")?;

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    /// `funcDecl → "func" IDENT "(" params? ")" "{" declaration* "}"`
    ///
    /// Assumes the `func` keyword (if any) was already consumed by the
    /// caller; this routine starts at the function/method name.
    fn function_decl(&mut self, kind: &str) -> Result<FunctionDecl, ParseError> {
        let name = self
            .consume(TokenKind::Identifier, &format!("{kind} name"))?
            .clone();

        self.consume(TokenKind::LeftParen, &format!("'(' after {kind} name"))?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.consume(TokenKind::Identifier, "parameter name")?.clone());
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "')' after parameters")?;

        self.consume(TokenKind::LeftBrace, &format!("'{{' before {kind} body"))?;
        let body = self.block_statements()?;

        Ok(FunctionDecl { name, params, body })
    }

    /// `varDecl → "var" IDENT ( "=" expression )? ";"`
    fn var_declaration(&mut self) -> StmtResult {
        let name = self.consume(TokenKind::Identifier, "variable name")?.clone();

        let initializer = if self.match_kind(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Stmt::Var { name, initializer })
    }

    // ===== statements =====

    fn statement(&mut self) -> StmtResult {
        if self.match_kind(TokenKind::Return) {
            return self.return_statement();
        }
        if self.match_kind(TokenKind::For) {
            return self.for_statement();
        }
        if self.match_kind(TokenKind::If) {
            return self.if_statement();
        }
        if self.match_kind(TokenKind::Print) {
            return self.print_statement();
        }
        if self.match_kind(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block_statements()?));
        }
        self.assignment_or_expr_statement()
    }

    /// `returnStmt → "return" expression? ";"`
    fn return_statement(&mut self) -> StmtResult {
        let keyword = self.previous().clone();
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// `forStmt → "for" "(" ( varDecl | ";" ) expression? ";" ( IDENT "=" expression )? ")" "{" declaration* "}"`
    fn for_statement(&mut self) -> StmtResult {
        self.consume(TokenKind::LeftParen, "'(' after 'for'")?;

        let initializer = if self.match_kind(TokenKind::Semicolon) {
            None
        } else if self.match_kind(TokenKind::Var) {
            Some(Box::new(self.var_declaration()?))
        } else {
            return Err(ParseError::unexpected("'var' or ';' in for-initializer", self.peek()));
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "';' after loop condition")?;

        let change = if self.check(TokenKind::RightParen) {
            None
        } else {
            let name = self.consume(TokenKind::Identifier, "loop variable name")?.clone();
            self.consume(TokenKind::Equal, "'=' in for-change clause")?;
            let value = self.expression()?;
            Some(Box::new(Stmt::Assign { name, value }))
        };
        self.consume(TokenKind::RightParen, "')' after for clauses")?;

        self.consume(TokenKind::LeftBrace, "'{' before for body")?;
        let body = Box::new(Stmt::Block(self.block_statements()?));

        Ok(Stmt::For {
            initializer,
            condition,
            change,
            body,
        })
    }

    /// `ifStmt → "if" "(" expression ")" "{" declaration* "}" ( "else" "{" declaration* "}" )?`
    fn if_statement(&mut self) -> StmtResult {
        self.consume(TokenKind::LeftParen, "'(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "')' after if condition")?;

        self.consume(TokenKind::LeftBrace, "'{' before then-branch")?;
        let then_branch = Box::new(Stmt::Block(self.block_statements()?));

        let else_branch = if self.match_kind(TokenKind::Else) {
            self.consume(TokenKind::LeftBrace, "'{' before else-branch")?;
            Some(Box::new(Stmt::Block(self.block_statements()?)))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `printStmt → "print" expression ";"`
    fn print_statement(&mut self) -> StmtResult {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "';' after value")?;
        Ok(Stmt::Print(value))
    }

    /// `block → "{" declaration* "}"` — consumes the closing brace; caller
    /// already consumed the opening one.
    fn block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "'}' after block")?;
        Ok(statements)
    }

    /// `assignment → expression "=" expression ";"` when an `=` follows,
    /// else `exprStmt → expression ";"`. The left-hand side must be a
    /// `Variable` (→ `Assign`) or a `Get` (→ `Set`); any other expression is
    /// a syntax error.
    fn assignment_or_expr_statement(&mut self) -> StmtResult {
        let expr = self.expression()?;

        if self.match_kind(TokenKind::Equal) {
            let equals_line = self.previous().line;
            let value = self.expression()?;
            self.consume(TokenKind::Semicolon, "';' after assignment")?;

            return match expr {
                Expr::Variable(name) => Ok(Stmt::Assign { name, value }),
                Expr::Get { object, name } => Ok(Stmt::Set {
                    object: *object,
                    name,
                    value,
                }),
                _ => Err(ParseError::InvalidAssignmentTarget { line: equals_line }),
            };
        }

        self.consume(TokenKind::Semicolon, "';' after expression")?;
        Ok(Stmt::Expression(expr))
    }

    // ===== expressions (precedence ladder, top = lowest) =====

    fn expression(&mut self) -> ExprResult {
        let mut expr = self.equality()?;
        while self.check(TokenKind::And) || self.check(TokenKind::Or) {
            let operator = self.advance().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;
        while self.check(TokenKind::EqualEqual) || self.check(TokenKind::BangEqual) {
            let operator = self.advance().clone();
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.term()?;
        while matches!(
            self.peek().kind,
            TokenKind::Greater | TokenKind::GreaterEqual | TokenKind::Less | TokenKind::LessEqual
        ) {
            let operator = self.advance().clone();
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;
        while matches!(self.peek().kind, TokenKind::Plus | TokenKind::Minus) {
            let operator = self.advance().clone();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;
        while matches!(self.peek().kind, TokenKind::Star | TokenKind::Slash) {
            let operator = self.advance().clone();
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if matches!(self.peek().kind, TokenKind::Bang | TokenKind::Minus) {
            let operator = self.advance().clone();
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
            });
        }
        self.call()
    }

    /// `call → primary ( "(" args? ")" | "." IDENT )*`
    fn call(&mut self) -> ExprResult {
        let mut expr = self.primary()?;

        loop {
            if self.match_kind(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.match_kind(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "property name after '.'")?.clone();
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ExprResult {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                arguments.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "')' after arguments")?.clone();
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    /// `primary → NUM | STR | "true" | "false" | "nil" | "this" | "super" "." IDENT | IDENT | "(" expression ")"`
    fn primary(&mut self) -> ExprResult {
        if self.match_kind(TokenKind::False) {
            return Ok(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.match_kind(TokenKind::True) {
            return Ok(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.match_kind(TokenKind::Nil) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }
        if self.match_kind(TokenKind::Number) {
            return match &self.previous().literal {
                Some(Literal::Number(n)) => Ok(Expr::Literal(LiteralValue::Number(*n))),
                _ => unreachable!("number token always carries a numeric literal"),
            };
        }
        if self.match_kind(TokenKind::String) {
            return match &self.previous().literal {
                Some(Literal::String(s)) => Ok(Expr::Literal(LiteralValue::String(s.clone()))),
                _ => unreachable!("string token always carries a string literal"),
            };
        }
        if self.match_kind(TokenKind::This) {
            return Ok(Expr::This(self.previous().clone()));
        }
        if self.match_kind(TokenKind::Super) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "'.' after 'super'")?;
            let method = self.consume(TokenKind::Identifier, "superclass method name")?.clone();
            return Ok(Expr::Super { keyword, method });
        }
        if self.match_kind(TokenKind::Identifier) {
            return Ok(Expr::Variable(self.previous().clone()));
        }
        if self.match_kind(TokenKind::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "')' after expression")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(ParseError::unexpected("expression", self.peek()))
    }
}

/// Convenience entry point mirroring `parser::parse` in the teacher crate.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, ParseError> {
    Parser::new(tokens).parse()
}
