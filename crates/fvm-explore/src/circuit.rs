//! Sequential boolean circuits.

use std::collections::BTreeMap;
use thiserror::Error;

/// Signal name to value.
pub type Valuation = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("unknown signal '{name}'")]
    UnknownSignal { name: String },

    #[error("'{name}' is neither a register nor an output")]
    UnknownTarget { name: String },
}

/// A circuit with named input ports, registers and output ports.
pub trait Circuit {
    fn input_names(&self) -> &[String];
    fn register_names(&self) -> &[String];
    fn output_names(&self) -> &[String];

    /// Register contents after one clock tick.
    fn update_registers(
        &self,
        inputs: &Valuation,
        registers: &Valuation,
    ) -> Result<Valuation, CircuitError>;

    /// Output values in the current step.
    fn compute_outputs(
        &self,
        inputs: &Valuation,
        registers: &Valuation,
    ) -> Result<Valuation, CircuitError>;
}

/// Boolean expression over input and register names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicExpr {
    Signal(String),
    Not(Box<LogicExpr>),
    And(Box<LogicExpr>, Box<LogicExpr>),
    Or(Box<LogicExpr>, Box<LogicExpr>),
    Xor(Box<LogicExpr>, Box<LogicExpr>),
}

impl LogicExpr {
    pub fn signal(name: impl Into<String>) -> Self {
        LogicExpr::Signal(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: LogicExpr) -> Self {
        LogicExpr::Not(Box::new(inner))
    }

    pub fn and(left: LogicExpr, right: LogicExpr) -> Self {
        LogicExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: LogicExpr, right: LogicExpr) -> Self {
        LogicExpr::Or(Box::new(left), Box::new(right))
    }

    pub fn xor(left: LogicExpr, right: LogicExpr) -> Self {
        LogicExpr::Xor(Box::new(left), Box::new(right))
    }

    /// Evaluate; inputs shadow registers of the same name.
    pub fn eval(&self, inputs: &Valuation, registers: &Valuation) -> Result<bool, CircuitError> {
        match self {
            LogicExpr::Signal(name) => inputs
                .get(name)
                .or_else(|| registers.get(name))
                .copied()
                .ok_or_else(|| CircuitError::UnknownSignal { name: name.clone() }),
            LogicExpr::Not(inner) => Ok(!inner.eval(inputs, registers)?),
            LogicExpr::And(l, r) => Ok(l.eval(inputs, registers)? && r.eval(inputs, registers)?),
            LogicExpr::Or(l, r) => Ok(l.eval(inputs, registers)? || r.eval(inputs, registers)?),
            LogicExpr::Xor(l, r) => Ok(l.eval(inputs, registers)? ^ r.eval(inputs, registers)?),
        }
    }
}

/// Circuit defined by one expression per register and per output.
///
/// A register without a rule keeps its value; an output without a rule is
/// false.
#[derive(Debug, Clone, Default)]
pub struct RuleCircuit {
    inputs: Vec<String>,
    registers: Vec<String>,
    outputs: Vec<String>,
    register_rules: BTreeMap<String, LogicExpr>,
    output_rules: BTreeMap<String, LogicExpr>,
}

impl RuleCircuit {
    pub fn new<I, R, O>(inputs: I, registers: R, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            registers: registers.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            register_rules: BTreeMap::new(),
            output_rules: BTreeMap::new(),
        }
    }

    /// Set the rule computing a register or an output, replacing any
    /// previous one.
    pub fn add_rule(
        &mut self,
        target: impl Into<String>,
        expr: LogicExpr,
    ) -> Result<(), CircuitError> {
        let target = target.into();
        if self.registers.contains(&target) {
            self.register_rules.insert(target, expr);
        } else if self.outputs.contains(&target) {
            self.output_rules.insert(target, expr);
        } else {
            return Err(CircuitError::UnknownTarget { name: target });
        }
        Ok(())
    }
}

impl Circuit for RuleCircuit {
    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn register_names(&self) -> &[String] {
        &self.registers
    }

    fn output_names(&self) -> &[String] {
        &self.outputs
    }

    fn update_registers(
        &self,
        inputs: &Valuation,
        registers: &Valuation,
    ) -> Result<Valuation, CircuitError> {
        let mut next = Valuation::new();
        for name in &self.registers {
            let value = match self.register_rules.get(name) {
                Some(rule) => rule.eval(inputs, registers)?,
                None => registers.get(name).copied().unwrap_or(false),
            };
            next.insert(name.clone(), value);
        }
        Ok(next)
    }

    fn compute_outputs(
        &self,
        inputs: &Valuation,
        registers: &Valuation,
    ) -> Result<Valuation, CircuitError> {
        let mut out = Valuation::new();
        for name in &self.outputs {
            let value = match self.output_rules.get(name) {
                Some(rule) => rule.eval(inputs, registers)?,
                None => false,
            };
            out.insert(name.clone(), value);
        }
        Ok(out)
    }
}
