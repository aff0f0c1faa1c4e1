//! Reference guard, action and channel definitions backed by the
//! expression parser.

use crate::channel::{ChannelSyntax, Direction};
use crate::eval::{exec_all, EvalError, EvalResult, Expr, Stmt};
use crate::parser::{parse_expr, parse_stmts, ParseResult};
use crate::semantics::{ActionDef, ConditionDef};
use crate::value::Evaluation;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// Concurrent cache from source text to its parse result.
///
/// The same guard and action texts are evaluated at every state that
/// reaches their location, so each is parsed once. Failures are cached too.
struct ParseCache<T> {
    entries: DashMap<String, ParseResult<Arc<T>>>,
}

impl<T> ParseCache<T> {
    fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn get_or_parse(
        &self,
        source: &str,
        parse: impl FnOnce(&str) -> ParseResult<T>,
    ) -> ParseResult<Arc<T>> {
        if let Some(hit) = self.entries.get(source) {
            return hit.value().clone();
        }
        let parsed = parse(source).map(Arc::new);
        if let Err(e) = &parsed {
            trace!(source, error = %e, "unparsable text cached");
        }
        self.entries.insert(source.to_string(), parsed.clone());
        parsed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Guards written as boolean expressions. Blank text is `true`.
pub struct ExprConditionDef {
    cache: ParseCache<Expr>,
}

impl ExprConditionDef {
    pub fn new() -> Self {
        Self {
            cache: ParseCache::new(),
        }
    }

    /// Number of distinct guard texts parsed so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for ExprConditionDef {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionDef for ExprConditionDef {
    fn evaluate(&self, eval: &Evaluation, condition: &str) -> EvalResult<bool> {
        let condition = condition.trim();
        if condition.is_empty() {
            return Ok(true);
        }
        let expr = self.cache.get_or_parse(condition, parse_expr)?;
        expr.eval_bool(eval)
    }
}

/// Ordinary actions: `;`-separated assignments and `skip`.
///
/// Matches every action that is not a communication. Blank text is the
/// identity.
pub struct ExprActionDef {
    syntax: ChannelSyntax,
    cache: ParseCache<Vec<Stmt>>,
}

impl ExprActionDef {
    pub fn new() -> Self {
        Self::with_syntax(ChannelSyntax::default())
    }

    pub fn with_syntax(syntax: ChannelSyntax) -> Self {
        Self {
            syntax,
            cache: ParseCache::new(),
        }
    }
}

impl Default for ExprActionDef {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDef for ExprActionDef {
    fn is_matching_action(&self, action: &str) -> bool {
        !self.syntax.is_communication(action)
    }

    fn effect(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation> {
        let stmts = self.cache.get_or_parse(action.trim(), parse_stmts)?;
        exec_all(&stmts, eval)
    }
}

/// Rendezvous pairs `_c!expr|_c?x`: binds `x` to the value of `expr`.
///
/// Both halves must name the same channel. A send without an operand only
/// pairs with a receive without a variable, and such a pair leaves the
/// evaluation unchanged.
pub struct ChannelActionDef {
    syntax: ChannelSyntax,
    cache: ParseCache<Expr>,
}

impl ChannelActionDef {
    pub fn new() -> Self {
        Self::with_syntax(ChannelSyntax::default())
    }

    pub fn with_syntax(syntax: ChannelSyntax) -> Self {
        Self {
            syntax,
            cache: ParseCache::new(),
        }
    }
}

impl Default for ChannelActionDef {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDef for ChannelActionDef {
    fn is_matching_action(&self, action: &str) -> bool {
        match self.syntax.split_pair(action) {
            Some((send, receive)) => {
                let send = self.syntax.classify(send);
                let receive = self.syntax.classify(receive);
                matches!(
                    (send, receive),
                    (Some(s), Some(r)) if s.direction == Direction::Send
                        && r.direction == Direction::Receive
                )
            }
            None => false,
        }
    }

    fn effect(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation> {
        let incompatible = || EvalError::IncompatibleCommunication(action.to_string());
        let (send, receive) = self.syntax.split_pair(action).ok_or_else(incompatible)?;
        let send = self.syntax.classify(send).ok_or_else(incompatible)?;
        let receive = self.syntax.classify(receive).ok_or_else(incompatible)?;
        if send.direction != Direction::Send
            || receive.direction != Direction::Receive
            || send.channel != receive.channel
        {
            return Err(incompatible());
        }

        match (send.operand.is_empty(), receive.operand.is_empty()) {
            (true, true) => Ok(eval.clone()),
            (true, false) => Err(incompatible()),
            (false, receive_empty) => {
                let expr = self.cache.get_or_parse(send.operand, parse_expr)?;
                let value = expr.eval(eval)?;
                let mut next = eval.clone();
                if !receive_empty {
                    next.insert(receive.operand.to_string(), value);
                }
                Ok(next)
            }
        }
    }
}
