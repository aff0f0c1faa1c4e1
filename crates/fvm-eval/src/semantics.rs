//! Pluggable guard and action semantics.
//!
//! Exploration never interprets guard or action text itself. It asks a
//! [`Semantics`] bundle whether a guard holds and what an action does, and
//! treats every error as "this transition does not fire".

use crate::channel::ChannelSyntax;
use crate::defs::{ChannelActionDef, ExprActionDef, ExprConditionDef};
use crate::eval::{EvalError, EvalResult};
use crate::value::Evaluation;

/// Decides whether a guard holds in an evaluation.
pub trait ConditionDef: Send + Sync {
    fn evaluate(&self, eval: &Evaluation, condition: &str) -> EvalResult<bool>;
}

/// Applies an action to an evaluation.
pub trait ActionDef: Send + Sync {
    /// Whether this definition is responsible for `action`.
    fn is_matching_action(&self, action: &str) -> bool;

    /// The evaluation after `action`. The input is never modified.
    fn effect(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation>;
}

/// The evaluator set used by one construction.
///
/// * every condition definition must accept a guard for it to hold;
/// * the first action definition matching an action applies its effect;
/// * communication definitions handle synthesized `send|receive` actions.
///
/// The bundle also carries the [`ChannelSyntax`] explorers use to tell
/// communications from ordinary actions; it must agree with the syntax of
/// the registered definitions. [`Semantics::standard_with`] builds both from
/// one value.
#[derive(Default)]
pub struct Semantics {
    channels: ChannelSyntax,
    conditions: Vec<Box<dyn ConditionDef>>,
    actions: Vec<Box<dyn ActionDef>>,
    communications: Vec<Box<dyn ActionDef>>,
}

impl Semantics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expression guards, assignment actions and rendezvous channels.
    pub fn standard() -> Self {
        Self::standard_with(ChannelSyntax::default())
    }

    /// [`Semantics::standard`] with communications written in `syntax`.
    pub fn standard_with(syntax: ChannelSyntax) -> Self {
        Self::new()
            .with_condition(ExprConditionDef::new())
            .with_action(ExprActionDef::with_syntax(syntax.clone()))
            .with_communication(ChannelActionDef::with_syntax(syntax.clone()))
            .with_channels(syntax)
    }

    pub fn with_channels(mut self, syntax: ChannelSyntax) -> Self {
        self.channels = syntax;
        self
    }

    pub fn channels(&self) -> &ChannelSyntax {
        &self.channels
    }

    pub fn with_condition(mut self, def: impl ConditionDef + 'static) -> Self {
        self.conditions.push(Box::new(def));
        self
    }

    pub fn with_action(mut self, def: impl ActionDef + 'static) -> Self {
        self.actions.push(Box::new(def));
        self
    }

    pub fn with_communication(mut self, def: impl ActionDef + 'static) -> Self {
        self.communications.push(Box::new(def));
        self
    }

    /// Conjunction over all condition definitions. With none registered,
    /// every guard holds.
    pub fn holds(&self, eval: &Evaluation, condition: &str) -> EvalResult<bool> {
        for def in &self.conditions {
            if !def.evaluate(eval, condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply an ordinary action.
    pub fn effect(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation> {
        first_matching(&self.actions, eval, action)
    }

    /// Apply a synthesized communication action.
    pub fn communicate(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation> {
        first_matching(&self.communications, eval, action)
    }
}

fn first_matching(
    defs: &[Box<dyn ActionDef>],
    eval: &Evaluation,
    action: &str,
) -> EvalResult<Evaluation> {
    defs.iter()
        .find(|def| def.is_matching_action(action))
        .ok_or_else(|| EvalError::NoMatchingAction(action.to_string()))?
        .effect(eval, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Always(bool);

    impl ConditionDef for Always {
        fn evaluate(&self, _: &Evaluation, _: &str) -> EvalResult<bool> {
            Ok(self.0)
        }
    }

    /// Sets `tag` to the action text for actions with the given prefix.
    struct Tagger(&'static str);

    impl ActionDef for Tagger {
        fn is_matching_action(&self, action: &str) -> bool {
            action.starts_with(self.0)
        }

        fn effect(&self, eval: &Evaluation, action: &str) -> EvalResult<Evaluation> {
            let mut next = eval.clone();
            next.insert("tag".to_string(), Value::from(format!("{}:{}", self.0, action)));
            Ok(next)
        }
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let eval = Evaluation::new();
        assert_eq!(Semantics::new().holds(&eval, "anything"), Ok(true));
        let sem = Semantics::new()
            .with_condition(Always(true))
            .with_condition(Always(false));
        assert_eq!(sem.holds(&eval, "x"), Ok(false));
    }

    #[test]
    fn test_first_matching_action_wins() {
        let sem = Semantics::new()
            .with_action(Tagger("a"))
            .with_action(Tagger(""));
        let out = sem.effect(&Evaluation::new(), "ab").unwrap();
        assert_eq!(out.get("tag"), Some(&Value::from("a:ab")));
        let out = sem.effect(&Evaluation::new(), "b").unwrap();
        assert_eq!(out.get("tag"), Some(&Value::from(":b")));
    }

    #[test]
    fn test_standard_with_shares_syntax() {
        let syntax = ChannelSyntax {
            marker: '#',
            separator: '&',
            ..Default::default()
        };
        let sem = Semantics::standard_with(syntax.clone());
        assert_eq!(sem.channels(), &syntax);
        assert_eq!(Semantics::standard().channels(), &ChannelSyntax::default());

        let mut e = Evaluation::new();
        e.insert("v".to_string(), Value::Int(3));
        let out = sem.communicate(&e, "#c!v&#c?x").unwrap();
        assert_eq!(out.get("x"), Some(&Value::Int(3)));
        // under '#' syntax an underscore name is ordinary
        let out = sem.effect(&e, "_u := v").unwrap();
        assert_eq!(out.get("_u"), Some(&Value::Int(3)));
        assert!(sem.effect(&e, "#c!v").is_err());
    }

    #[test]
    fn test_no_matching_action() {
        let sem = Semantics::new().with_action(Tagger("a"));
        assert_eq!(
            sem.communicate(&Evaluation::new(), "a"),
            Err(EvalError::NoMatchingAction("a".to_string()))
        );
        assert!(sem.effect(&Evaluation::new(), "b").is_err());
    }
}
