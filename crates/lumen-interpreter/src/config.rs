//! Evaluation policy switches.

use std::env;
use std::str::FromStr;

/// How `if`, the ternary form and `&&`/`||` treat the operands they do not need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conditionals {
    /// Every child is evaluated before the node decides; side effects in an
    /// untaken branch still happen.
    #[default]
    Eager,
    /// Only the condition and the selected branch are evaluated, and the
    /// logical operators short-circuit.
    Lazy,
}

/// What happens when a call cannot be resolved or the callee fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallFaults {
    /// The fault ends the evaluation as an `Err`.
    #[default]
    Propagate,
    /// The fault is logged and recorded, and the call yields `Value::Error`.
    Sentinel,
}

impl FromStr for Conditionals {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(Conditionals::Eager),
            "lazy" => Ok(Conditionals::Lazy),
            other => Err(format!("unknown conditional mode '{}' (expected eager or lazy)", other)),
        }
    }
}

impl FromStr for CallFaults {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(CallFaults::Propagate),
            "sentinel" => Ok(CallFaults::Sentinel),
            other => Err(format!(
                "unknown call fault mode '{}' (expected propagate or sentinel)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub conditionals: Conditionals,
    pub call_faults: CallFaults,
}

impl Config {
    pub const CONDITIONALS_VAR: &'static str = "LUMEN_CONDITIONALS";
    pub const CALL_FAULTS_VAR: &'static str = "LUMEN_CALL_FAULTS";

    /// Defaults overridden by `LUMEN_CONDITIONALS` and `LUMEN_CALL_FAULTS`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        if let Ok(raw) = env::var(Self::CONDITIONALS_VAR) {
            match raw.parse() {
                Ok(mode) => cfg.conditionals = mode,
                Err(msg) => log::warn!("{}: {}", Self::CONDITIONALS_VAR, msg),
            }
        }
        if let Ok(raw) = env::var(Self::CALL_FAULTS_VAR) {
            match raw.parse() {
                Ok(mode) => cfg.call_faults = mode,
                Err(msg) => log::warn!("{}: {}", Self::CALL_FAULTS_VAR, msg),
            }
        }
        cfg
    }

    pub fn conditionals(mut self, mode: Conditionals) -> Self {
        self.conditionals = mode;
        self
    }

    pub fn call_faults(mut self, mode: CallFaults) -> Self {
        self.call_faults = mode;
        self
    }

    pub fn is_lazy(&self) -> bool {
        self.conditionals == Conditionals::Lazy
    }
}
