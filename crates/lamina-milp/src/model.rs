//! Model containers: variables, range constraints and solved values.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

/// Variable domain. Every variable is nonnegative; `Boolean` is additionally bounded by 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VarKind {
    Boolean,
    Integer,
    Continuous,
}

impl VarKind {
    pub fn is_integral(self) -> bool {
        matches!(self, VarKind::Boolean | VarKind::Integer)
    }

    pub fn upper_bound(self) -> Option<f64> {
        match self {
            VarKind::Boolean => Some(1.0),
            VarKind::Integer | VarKind::Continuous => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub kind: VarKind,
    pub objective: f64,
    /// Branching priority; fractional variables with a higher priority are branched on first.
    #[serde(default)]
    pub priority: i32,
}

/// `min <= sum(coef * var) <= max`; a missing side is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub terms: Vec<(VarId, f64)>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub sense: Sense,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn add_variable(&mut self, kind: VarKind, objective: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            kind,
            objective,
            priority: 0,
        });
        id
    }

    pub fn set_priority(&mut self, var: VarId, priority: i32) {
        if let Some(v) = self.variables.get_mut(var.0) {
            v.priority = priority;
        }
    }

    pub fn add_constraint(
        &mut self,
        terms: impl IntoIterator<Item = (VarId, f64)>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> usize {
        let ix = self.constraints.len();
        self.constraints.push(Constraint {
            terms: terms.into_iter().collect(),
            min,
            max,
        });
        ix
    }

    pub fn variable(&self, var: VarId) -> Option<&Variable> {
        self.variables.get(var.0)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn integer_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind.is_integral())
            .count()
    }

    pub fn validate(&self) -> Result<()> {
        for (ix, c) in self.constraints.iter().enumerate() {
            if let Some(&(var, _)) = c.terms.iter().find(|(v, _)| v.0 >= self.variables.len()) {
                return Err(Error::UnknownVariable {
                    constraint: ix,
                    var,
                });
            }
            if let (Some(min), Some(max)) = (c.min, c.max) {
                if min > max {
                    return Err(Error::EmptyRange {
                        constraint: ix,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether `values` (indexed by [`VarId`]) respects every domain and constraint within
    /// `tolerance`.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }
        let domains = self.variables.iter().zip(values).all(|(v, &x)| {
            x >= -tolerance
                && v.kind.upper_bound().is_none_or(|u| x <= u + tolerance)
                && (!v.kind.is_integral() || (x - x.round()).abs() <= tolerance)
        });
        domains
            && self.constraints.iter().all(|c| {
                let activity: f64 = c
                    .terms
                    .iter()
                    .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
                    .sum();
                c.min.is_none_or(|min| activity >= min - tolerance)
                    && c.max.is_none_or(|max| activity <= max + tolerance)
            })
    }

    /// Objective value of an assignment, in the model's own sense.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, x)| v.objective * x)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    pub objective: f64,
    pub values: HashMap<VarId, f64>,
}

impl Solution {
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.values.get(&var).copied()
    }

    /// Reads a boolean variable, rounding away solver noise.
    pub fn flag(&self, var: VarId) -> Option<bool> {
        self.value(var).map(|v| v > 0.5)
    }
}

/// Anything that can solve a [`Model`] to optimality.
pub trait MilpSolver {
    fn solve(&mut self, model: &Model) -> Result<Solution>;

    /// Solves with a known feasible assignment to improve upon. Solvers that cannot make use
    /// of one ignore it.
    fn solve_from(&mut self, model: &Model, start: &[f64]) -> Result<Solution> {
        let _ = start;
        self.solve(model)
    }
}
