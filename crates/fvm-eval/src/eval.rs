//! Guard and action evaluation over a variable evaluation.

use crate::parser::ParseError;
use crate::value::{Evaluation, Value};
use thiserror::Error;

/// Evaluation error.
///
/// Inside an exploration every one of these means "the transition does not
/// fire"; they only surface to callers that evaluate text directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("no action definition matches '{0}'")]
    NoMatchingAction(String),

    #[error("incompatible communication '{0}'")]
    IncompatibleCommunication(String),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Binary operators, loosest binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne => 3,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Guard / right-hand-side expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A single action statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Skip,
    Assign { var: String, value: Expr },
}

fn expect_int(v: &Value) -> EvalResult<i64> {
    v.as_int().ok_or(EvalError::TypeMismatch {
        expected: "int",
        actual: v.type_name(),
    })
}

fn expect_bool(v: &Value) -> EvalResult<bool> {
    v.as_bool().ok_or(EvalError::TypeMismatch {
        expected: "bool",
        actual: v.type_name(),
    })
}

impl Expr {
    /// Evaluate against the given variable evaluation.
    pub fn eval(&self, env: &Evaluation) -> EvalResult<Value> {
        match self {
            Expr::Lit(v) => Ok(v.clone()),
            Expr::Var(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Unary { op, operand } => {
                let v = operand.eval(env)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!expect_bool(&v)?)),
                    UnaryOp::Neg => expect_int(&v)?
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or(EvalError::Overflow),
                }
            }
            Expr::Binary { op, left, right } => eval_binary(*op, left, right, env),
        }
    }

    /// Evaluate and require a boolean result.
    pub fn eval_bool(&self, env: &Evaluation) -> EvalResult<bool> {
        expect_bool(&self.eval(env)?)
    }
}

fn eval_binary(op: BinOp, left: &Expr, right: &Expr, env: &Evaluation) -> EvalResult<Value> {
    // Short-circuit logical operators
    match op {
        BinOp::And => {
            if !left.eval_bool(env)? {
                return Ok(Value::Bool(false));
            }
            return right.eval(env).and_then(|v| expect_bool(&v)).map(Value::Bool);
        }
        BinOp::Or => {
            if left.eval_bool(env)? {
                return Ok(Value::Bool(true));
            }
            return right.eval(env).and_then(|v| expect_bool(&v)).map(Value::Bool);
        }
        _ => {}
    }

    let l = left.eval(env)?;
    let r = right.eval(env)?;

    match op {
        BinOp::Eq | BinOp::Ne => {
            if std::mem::discriminant(&l) != std::mem::discriminant(&r) {
                return Err(EvalError::TypeMismatch {
                    expected: l.type_name(),
                    actual: r.type_name(),
                });
            }
            let equal = l == r;
            Ok(Value::Bool(if op == BinOp::Eq { equal } else { !equal }))
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let (a, b) = (expect_int(&l)?, expect_int(&r)?);
            let result = match op {
                BinOp::Lt => a < b,
                BinOp::Le => a <= b,
                BinOp::Gt => a > b,
                _ => a >= b,
            };
            Ok(Value::Bool(result))
        }
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            let (a, b) = (expect_int(&l)?, expect_int(&r)?);
            if matches!(op, BinOp::Div | BinOp::Mod) && b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Sub => a.checked_sub(b),
                BinOp::Mul => a.checked_mul(b),
                BinOp::Div => a.checked_div(b),
                _ => a.checked_rem(b),
            };
            result.map(Value::Int).ok_or(EvalError::Overflow)
        }
        BinOp::And | BinOp::Or => unreachable!("handled above"),
    }
}

impl Stmt {
    /// Execute in place. Assignments see the effects of earlier statements.
    pub fn exec(&self, env: &mut Evaluation) -> EvalResult<()> {
        match self {
            Stmt::Skip => Ok(()),
            Stmt::Assign { var, value } => {
                let v = value.eval(env)?;
                env.insert(var.clone(), v);
                Ok(())
            }
        }
    }
}

/// Run a statement sequence on a copy of `env`.
pub fn exec_all(stmts: &[Stmt], env: &Evaluation) -> EvalResult<Evaluation> {
    let mut next = env.clone();
    for stmt in stmts {
        stmt.exec(&mut next)?;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_expr, parse_stmts};

    fn env(pairs: &[(&str, Value)]) -> Evaluation {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn eval_str(source: &str, env: &Evaluation) -> EvalResult<Value> {
        parse_expr(source)?.eval(env)
    }

    #[test]
    fn test_arithmetic_precedence() {
        let e = env(&[("x", Value::Int(2))]);
        assert_eq!(eval_str("1 + x * 3", &e), Ok(Value::Int(7)));
        assert_eq!(eval_str("(1 + x) * 3", &e), Ok(Value::Int(9)));
        assert_eq!(eval_str("10 - 4 - 3", &e), Ok(Value::Int(3)));
        assert_eq!(eval_str("-x % 3", &e), Ok(Value::Int(-2)));
    }

    #[test]
    fn test_comparisons_and_logic() {
        let e = env(&[("x", Value::Int(2)), ("done", Value::Bool(false))]);
        assert_eq!(eval_str("x < 3 && !done", &e), Ok(Value::Bool(true)));
        assert_eq!(eval_str("x == 2 || y > 0", &e), Ok(Value::Bool(true)));
        assert_eq!(eval_str("x != 2", &e), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_short_circuit_skips_undefined() {
        let e = env(&[("x", Value::Int(0))]);
        assert_eq!(eval_str("x > 0 && y > 0", &e), Ok(Value::Bool(false)));
        assert_eq!(
            eval_str("x == 0 && y > 0", &e),
            Err(EvalError::UndefinedVariable("y".to_string()))
        );
    }

    #[test]
    fn test_errors() {
        let e = env(&[("x", Value::Int(1)), ("s", Value::from("a"))]);
        assert_eq!(eval_str("x / 0", &e), Err(EvalError::DivisionByZero));
        assert_eq!(
            eval_str("9223372036854775807 + x", &e),
            Err(EvalError::Overflow)
        );
        assert!(matches!(
            eval_str("s == x", &e),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            eval_str("!x", &e),
            Err(EvalError::TypeMismatch {
                expected: "bool",
                ..
            })
        ));
    }

    #[test]
    fn test_sequential_assignment() {
        let stmts = parse_stmts("x := 1; y := x + 1; skip").unwrap();
        let out = exec_all(&stmts, &Evaluation::new()).unwrap();
        assert_eq!(out.get("x"), Some(&Value::Int(1)));
        assert_eq!(out.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_failed_statement_leaves_input_untouched() {
        let start = env(&[("x", Value::Int(1))]);
        let stmts = parse_stmts("x := 5; y := z").unwrap();
        assert_eq!(
            exec_all(&stmts, &start),
            Err(EvalError::UndefinedVariable("z".to_string()))
        );
        assert_eq!(start.get("x"), Some(&Value::Int(1)));
    }
}
