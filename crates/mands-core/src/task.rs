// Rust guideline compliant 2026-02-06

//! Planning task model.
//!
//! The task is the read-only input of the whole construction: finite-domain
//! variables, operators with preconditions and conditional effects, an
//! initial state and a conjunction of goal facts. Every component that needs
//! variable domains or operator data receives a `&Task` explicitly.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cost for operators that do not specify one.
fn default_cost() -> u32 {
    1
}

/// A variable/value assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    /// Index of the variable.
    pub var: usize,
    /// Value assigned to the variable.
    pub value: usize,
}

impl Fact {
    /// Creates a new fact.
    pub fn new(var: usize, value: usize) -> Self {
        Self { var, value }
    }
}

/// A finite-domain state variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Human-readable name.
    pub name: String,
    /// Number of values; the domain is `0..domain_size`.
    pub domain_size: usize,
}

/// An effect that sets `fact` when all of its `conditions` hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Fact made true by the effect.
    pub fact: Fact,
    /// Effect conditions; empty for unconditional effects.
    #[serde(default)]
    pub conditions: Vec<Fact>,
}

/// A planning operator. Operator `i` becomes label `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Human-readable name.
    pub name: String,
    /// Non-negative action cost.
    #[serde(default = "default_cost")]
    pub cost: u32,
    /// Preconditions (including prevail conditions).
    #[serde(default)]
    pub preconditions: Vec<Fact>,
    /// Possibly conditional effects.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Operator {
    /// Returns the precondition value on `var`, if any.
    pub fn precondition_on(&self, var: usize) -> Option<usize> {
        self.preconditions
            .iter()
            .find(|fact| fact.var == var)
            .map(|fact| fact.value)
    }

    /// Returns the effects that modify `var`.
    pub fn effects_on(&self, var: usize) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |effect| effect.fact.var == var)
    }
}

/// A finite-domain planning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// State variables.
    pub variables: Vec<Variable>,
    /// Operators; their indices are the initial label numbers.
    pub operators: Vec<Operator>,
    /// Value of every variable in the initial state.
    pub initial_state: Vec<usize>,
    /// Goal facts.
    pub goals: Vec<Fact>,
}

impl Task {
    /// Parses and validates a task from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the task is invalid.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let task: Task = serde_json::from_str(content)?;
        task.validate()?;
        Ok(task)
    }

    /// Loads and validates a task from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// describes an invalid task.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validates the task.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The task has no variables or a variable has an empty domain
    /// - The initial state does not assign every variable a domain value
    /// - A fact references an unknown variable or an out-of-range value
    /// - A variable appears twice in the goal or in one precondition list
    pub fn validate(&self) -> Result<()> {
        if self.variables.is_empty() {
            return Err(Error::InvalidTask("task has no variables".to_string()));
        }
        for (var, variable) in self.variables.iter().enumerate() {
            if variable.domain_size == 0 {
                return Err(Error::InvalidTask(format!(
                    "variable {} ({}) has an empty domain",
                    var, variable.name
                )));
            }
        }
        if self.initial_state.len() != self.variables.len() {
            return Err(Error::InvalidTask(format!(
                "initial state has {} values for {} variables",
                self.initial_state.len(),
                self.variables.len()
            )));
        }
        for (var, &value) in self.initial_state.iter().enumerate() {
            self.check_fact(Fact::new(var, value), "initial state")?;
        }
        self.check_fact_list(&self.goals, "goal")?;
        for op in &self.operators {
            let context = format!("operator {}", op.name);
            self.check_fact_list(&op.preconditions, &context)?;
            for effect in &op.effects {
                self.check_fact(effect.fact, &context)?;
                self.check_fact_list(&effect.conditions, &context)?;
            }
        }
        Ok(())
    }

    fn check_fact(&self, fact: Fact, context: &str) -> Result<()> {
        let variable = self.variables.get(fact.var).ok_or_else(|| {
            Error::InvalidTask(format!("{}: unknown variable {}", context, fact.var))
        })?;
        if fact.value >= variable.domain_size {
            return Err(Error::InvalidTask(format!(
                "{}: value {} out of range for variable {} (domain size {})",
                context, fact.value, variable.name, variable.domain_size
            )));
        }
        Ok(())
    }

    fn check_fact_list(&self, facts: &[Fact], context: &str) -> Result<()> {
        let mut seen = vec![false; self.variables.len()];
        for fact in facts {
            self.check_fact(*fact, context)?;
            if seen[fact.var] {
                return Err(Error::InvalidTask(format!(
                    "{}: variable {} constrained twice",
                    context, fact.var
                )));
            }
            seen[fact.var] = true;
        }
        Ok(())
    }

    /// Number of state variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Domain size of `var`.
    pub fn domain_size(&self, var: usize) -> usize {
        self.variables[var].domain_size
    }

    /// Goal value of `var`, if the variable is a goal variable.
    pub fn goal_value(&self, var: usize) -> Option<usize> {
        self.goals
            .iter()
            .find(|fact| fact.var == var)
            .map(|fact| fact.value)
    }

    /// Whether `var` appears in the goal.
    pub fn is_goal_variable(&self, var: usize) -> bool {
        self.goal_value(var).is_some()
    }
}
