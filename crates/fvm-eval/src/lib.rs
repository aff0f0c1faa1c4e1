//! Values, variable evaluations and the guard/action semantics consumed by
//! model construction.

pub mod channel;
pub mod defs;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod semantics;
pub mod value;

pub use channel::{ChannelSyntax, Communication, Direction};
pub use defs::{ChannelActionDef, ExprActionDef, ExprConditionDef};
pub use eval::{exec_all, EvalError, EvalResult, Expr, Stmt};
pub use parser::{parse_expr, parse_stmts, ParseError, ParseResult};
pub use semantics::{ActionDef, ConditionDef, Semantics};
pub use value::{binding_label, binding_labels, Evaluation, Value};
