// ABOUTME: Tree-walking evaluator — executes statements and evaluates expressions

use crate::ast::{Expr, LiteralValue, Stmt};
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::natives;
use crate::token::TokenKind;
use crate::value::{values_equal, LoxClass, LoxFunction, LoxInstance, NativeFunction, Value};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

/// Reserved environment slot used to smuggle a function's return value out
/// of its body without unwinding (spec §4.4, §9 — last-assign-wins; dead
/// code after a `return` still executes, by design).
const RETURN_SENTINEL: &str = "$RETURN_KEY$";

pub struct Interpreter<W: Write> {
    globals: Rc<Environment>,
    output: std::cell::RefCell<W>,
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W) -> Self {
        let globals = Environment::new();
        globals
            .define(
                "clock".to_string(),
                Value::Native(Rc::new(NativeFunction {
                    name: "clock".to_string(),
                    arity: 0,
                    func: natives::clock,
                })),
            )
            .expect("fresh global environment has no prior 'clock' binding");

        Interpreter {
            globals,
            output: std::cell::RefCell::new(output),
        }
    }

    pub fn interpret(&self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute(stmt, self.globals.clone())?;
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    // ===== statement execution =====

    fn execute(&self, stmt: &Stmt, env: Rc<Environment>) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                let _ = writeln!(self.output.borrow_mut(), "{}", value);
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(e) => self.evaluate(e, env.clone())?,
                    None => Value::Nil,
                };
                env.define(name.lexeme.clone(), value)
            }
            Stmt::Assign { name, value } => {
                let v = self.evaluate(value, env.clone())?;
                env.assign(&name.lexeme, v)
            }
            Stmt::Set { object, name, value } => {
                let obj = self.evaluate(object, env.clone())?;
                let instance = expect_instance(obj)?;
                let v = self.evaluate(value, env)?;
                instance.set_field(name.lexeme.clone(), v);
                Ok(())
            }
            Stmt::Block(statements) => {
                let block_env = Environment::with_parent(env);
                self.execute_all(statements, block_env)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.evaluate(condition, env.clone())?;
                if expect_bool(cond, "if")? {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(())
                }
            }
            Stmt::For {
                initializer,
                condition,
                change,
                body,
            } => {
                let loop_env = Environment::with_parent(env);
                if let Some(init) = initializer {
                    self.execute(init, loop_env.clone())?;
                }
                loop {
                    let should_continue = match condition {
                        Some(cond) => expect_bool(self.evaluate(cond, loop_env.clone())?, "for")?,
                        None => true,
                    };
                    if !should_continue {
                        break;
                    }
                    self.execute(body, loop_env.clone())?;
                    if let Some(change) = change {
                        self.execute(change, loop_env.clone())?;
                    }
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = LoxFunction {
                    declaration: decl.clone(),
                    closure: env.clone(),
                };
                env.define(decl.name.lexeme.clone(), Value::Function(Rc::new(function)))
            }
            Stmt::Return { keyword: _, value } => {
                let v = match value {
                    Some(e) => self.evaluate(e, env.clone())?,
                    None => Value::Nil,
                };
                env.assign(RETURN_SENTINEL, v)
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods, env),
        }
    }

    fn execute_all(&self, statements: &[Stmt], env: Rc<Environment>) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute(stmt, env.clone())?;
        }
        Ok(())
    }

    fn execute_class(
        &self,
        name: &crate::token::Token,
        superclass: Option<&crate::token::Token>,
        methods: &[Rc<crate::ast::FunctionDecl>],
        env: Rc<Environment>,
    ) -> Result<(), RuntimeError> {
        let resolved_superclass = match superclass {
            Some(tok) => match env.get(&tok.lexeme)? {
                Value::Class(c) => Some(c),
                _ => {
                    return Err(RuntimeError::TypeMismatch {
                        operator: "class inheritance".to_string(),
                        expected: "a class".to_string(),
                    })
                }
            },
            None => None,
        };

        let mut method_map = HashMap::new();
        for method_decl in methods {
            let function = LoxFunction {
                declaration: method_decl.clone(),
                closure: env.clone(),
            };
            method_map.insert(method_decl.name.lexeme.clone(), Rc::new(function));
        }

        let class = LoxClass {
            name: name.lexeme.clone(),
            superclass: resolved_superclass,
            methods: method_map,
        };

        env.define(name.lexeme.clone(), Value::Class(Rc::new(class)))
    }

    // ===== expression evaluation =====

    fn evaluate(&self, expr: &Expr, env: Rc<Environment>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::String(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),
            Expr::Variable(name) => env.get(&name.lexeme),
            Expr::This(_) => env.get("this"),
            Expr::Super { method, .. } => self.evaluate_super(method, env),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Unary { operator, operand } => {
                let value = self.evaluate(operand, env)?;
                match operator.kind {
                    TokenKind::Bang => Ok(Value::Bool(!expect_bool(value, "!")?)),
                    TokenKind::Minus => Ok(Value::Number(-expect_number(value, "-")?)),
                    _ => unreachable!("unary operator kind is restricted by the parser"),
                }
            }
            Expr::Binary { left, operator, right } => {
                let l = self.evaluate(left, env.clone())?;
                let r = self.evaluate(right, env)?;
                self.evaluate_binary(operator.kind, l, r)
            }
            Expr::Logical { left, operator, right } => {
                let l = self.evaluate(left, env.clone())?;
                let truthy = expect_bool(l, "and/or")?;
                match operator.kind {
                    TokenKind::And => {
                        if !truthy {
                            Ok(Value::Bool(false))
                        } else {
                            self.evaluate(right, env)
                        }
                    }
                    TokenKind::Or => {
                        if truthy {
                            Ok(Value::Bool(true))
                        } else {
                            self.evaluate(right, env)
                        }
                    }
                    _ => unreachable!("logical operator kind is restricted by the parser"),
                }
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                let callee_value = self.evaluate(callee, env.clone())?;
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg, env.clone())?);
                }
                self.call_value(callee_value, args)
            }
            Expr::Get { object, name } => {
                let obj = self.evaluate(object, env)?;
                let instance = expect_instance(obj)?;
                if let Some(field) = instance.get_field(&name.lexeme) {
                    return Ok(field);
                }
                match instance.class.find_method(&name.lexeme) {
                    Some(method) => Ok(Value::Function(Rc::new(method.bind(instance)))),
                    None => Err(RuntimeError::UndefinedProperty(name.lexeme.clone())),
                }
            }
        }
    }

    fn evaluate_binary(&self, op: TokenKind, l: Value, r: Value) -> Result<Value, RuntimeError> {
        match op {
            TokenKind::Plus => match (l, r) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(RuntimeError::TypeMismatch {
                    operator: "+".to_string(),
                    expected: "two numbers or two strings".to_string(),
                }),
            },
            TokenKind::Minus => Ok(Value::Number(expect_number(l, "-")? - expect_number(r, "-")?)),
            TokenKind::Star => Ok(Value::Number(expect_number(l, "*")? * expect_number(r, "*")?)),
            TokenKind::Slash => Ok(Value::Number(expect_number(l, "/")? / expect_number(r, "/")?)),
            TokenKind::Greater => Ok(Value::Bool(expect_number(l, ">")? > expect_number(r, ">")?)),
            TokenKind::GreaterEqual => Ok(Value::Bool(expect_number(l, ">=")? >= expect_number(r, ">=")?)),
            TokenKind::Less => Ok(Value::Bool(expect_number(l, "<")? < expect_number(r, "<")?)),
            TokenKind::LessEqual => Ok(Value::Bool(expect_number(l, "<=")? <= expect_number(r, "<=")?)),
            TokenKind::EqualEqual => Ok(Value::Bool(values_equal(&l, &r))),
            TokenKind::BangEqual => Ok(Value::Bool(!values_equal(&l, &r))),
            _ => unreachable!("binary operator kind is restricted by the parser"),
        }
    }

    fn evaluate_super(&self, method: &crate::token::Token, env: Rc<Environment>) -> Result<Value, RuntimeError> {
        let instance = match env.get("this")? {
            Value::Instance(i) => i,
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    operator: "super".to_string(),
                    expected: "use inside a method".to_string(),
                })
            }
        };
        let parent = instance
            .class
            .superclass
            .clone()
            .ok_or(RuntimeError::SuperWithNoParent)?;
        let raw = parent
            .find_method(&method.lexeme)
            .ok_or_else(|| RuntimeError::UndefinedProperty(method.lexeme.clone()))?;
        Ok(Value::Function(Rc::new(raw.bind(instance))))
    }

    fn call_value(&self, callee: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(f) => {
                check_arity(f.arity(), args.len())?;
                self.call_function(&f, args)
            }
            Value::Native(n) => {
                check_arity(n.arity, args.len())?;
                (n.func)(&args)
            }
            Value::Class(c) => {
                let arity = c.arity();
                check_arity(arity, args.len())?;
                let instance = Rc::new(LoxInstance::new(c.clone()));
                if let Some(init) = c.find_method("init") {
                    let bound = init.bind(instance.clone());
                    self.call_function(&bound, args)?;
                }
                Ok(Value::Instance(instance))
            }
            _ => Err(RuntimeError::NotCallable),
        }
    }

    /// Saves/restores the current environment by passing it as a parameter:
    /// the call frame lives only for the duration of this call and is
    /// dropped on return (spec §4.3's "save current environment / restore
    /// on exit" realized through ordinary Rust call-stack scoping).
    fn call_function(&self, func: &LoxFunction, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let call_env = Environment::with_parent(func.closure.clone());
        for (param, arg) in func.declaration.params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg)?;
        }
        call_env.define(RETURN_SENTINEL.to_string(), Value::Nil)?;

        self.execute_all(&func.declaration.body, call_env.clone())?;

        call_env.get(RETURN_SENTINEL)
    }
}

fn check_arity(expected: usize, actual: usize) -> Result<(), RuntimeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch { expected, actual })
    }
}

fn expect_bool(value: Value, context: &str) -> Result<bool, RuntimeError> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(RuntimeError::TypeMismatch {
            operator: context.to_string(),
            expected: "a boolean".to_string(),
        }),
    }
}

fn expect_number(value: Value, context: &str) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(n),
        _ => Err(RuntimeError::TypeMismatch {
            operator: context.to_string(),
            expected: "a number".to_string(),
        }),
    }
}

fn expect_instance(value: Value) -> Result<Rc<LoxInstance>, RuntimeError> {
    match value {
        Value::Instance(i) => Ok(i),
        _ => Err(RuntimeError::NotAnInstance),
    }
}
