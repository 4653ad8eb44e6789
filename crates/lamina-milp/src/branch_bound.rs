//! Depth-first branch-and-bound over warm-started simplex relaxations.

use crate::error::{Error, Result};
use crate::model::{MilpSolver, Model, Sense, Solution, VarId, VarKind};
use crate::simplex::{self, LpOutcome, Relaxation, Row};
use rustc_hash::FxHashMap as HashMap;

/// Tolerance used when checking a caller-supplied starting assignment.
const START_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchAndBoundOptions {
    /// Maximum number of relaxations to solve before giving up with [`Error::NodeLimit`].
    /// `None` searches until the tree is exhausted.
    pub node_limit: Option<usize>,
    /// Distance from the nearest integer under which a value counts as integral.
    pub integrality_tolerance: f64,
}

impl Default for BranchAndBoundOptions {
    fn default() -> Self {
        Self {
            node_limit: None,
            integrality_tolerance: 1e-6,
        }
    }
}

/// Reference exact solver. Dense and single-threaded; intended for the model sizes the crossing
/// minimizer's size guard lets through.
///
/// Nodes are explored depth first, rounded-down branch first. Among fractional integer
/// variables the one with the highest [`priority`](crate::Variable::priority) is branched on,
/// then booleans before general integers, then the most fractional.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    options: BranchAndBoundOptions,
}

#[derive(Debug, Clone)]
struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BranchAndBoundOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BranchAndBoundOptions {
        &self.options
    }

    fn search(&self, model: &Model, start: Option<&[f64]>) -> Result<Solution> {
        model.validate()?;

        let n = model.variables.len();
        let sign = match model.sense {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        };
        let cost: Vec<f64> = model
            .variables
            .iter()
            .map(|v| sign * v.objective)
            .collect();
        let rows: Vec<Row> = model
            .constraints
            .iter()
            .map(|c| Row {
                terms: c.terms.iter().map(|&(var, coef)| (var.0, coef)).collect(),
                lower: c.min.unwrap_or(-simplex::BOX),
                upper: c.max.unwrap_or(simplex::BOX),
            })
            .collect();
        let tol = self.options.integrality_tolerance;
        let integral_objective = has_integral_objective(model);

        let mut incumbent: Option<(f64, Vec<f64>)> = None;
        if let Some(start) = start {
            if model.is_feasible(start, START_TOLERANCE) {
                incumbent = Some((sign * model.evaluate(start), start.to_vec()));
            } else {
                tracing::debug!("starting assignment is infeasible; searching without it");
            }
        }

        let mut relaxation = Relaxation::new(&cost, &rows);
        let mut stack = vec![Bounds {
            lower: vec![0.0; n],
            upper: model
                .variables
                .iter()
                .map(|v| v.kind.upper_bound().unwrap_or(simplex::BOX))
                .collect(),
        }];
        let mut explored: usize = 0;

        while let Some(bounds) = stack.pop() {
            explored += 1;
            if let Some(limit) = self.options.node_limit {
                if explored > limit {
                    return Err(Error::NodeLimit { limit });
                }
            }

            let objective = match relaxation.solve(&bounds.lower, &bounds.upper) {
                LpOutcome::Infeasible => continue,
                LpOutcome::Unbounded => return Err(Error::Unbounded),
                LpOutcome::Optimal { objective } => objective,
            };
            if let Some((best, _)) = &incumbent {
                let bound = if integral_objective {
                    (objective - tol).ceil()
                } else {
                    objective
                };
                if bound >= best - simplex::EPS {
                    continue;
                }
            }

            let x = relaxation.values();
            match select_branch(model, x, tol) {
                None => {
                    let mut x = x.to_vec();
                    for (j, v) in model.variables.iter().enumerate() {
                        if v.kind.is_integral() {
                            x[j] = x[j].round();
                        }
                    }
                    incumbent = Some((objective, x));
                }
                Some(j) => {
                    let value = x[j];
                    let mut up = bounds.clone();
                    up.lower[j] = value.ceil();
                    let mut down = bounds;
                    down.upper[j] = value.floor();
                    // Popped first: the rounded-down branch.
                    stack.push(up);
                    stack.push(down);
                }
            }
        }

        let Some((objective, x)) = incumbent else {
            return Err(Error::Infeasible);
        };
        tracing::debug!(
            variables = n,
            rows = rows.len(),
            explored,
            pivots = relaxation.pivots(),
            objective = sign * objective,
            "branch-and-bound finished"
        );
        let values: HashMap<VarId, f64> = x
            .into_iter()
            .enumerate()
            .map(|(j, v)| (VarId(j), v))
            .collect();
        Ok(Solution {
            objective: sign * objective,
            values,
        })
    }
}

/// True when every feasible integer point has an integral objective, which lets a relaxation
/// bound be rounded up before pruning.
fn has_integral_objective(model: &Model) -> bool {
    model
        .variables
        .iter()
        .all(|v| v.objective == 0.0 || (v.kind.is_integral() && v.objective.fract() == 0.0))
}

fn select_branch(model: &Model, x: &[f64], tol: f64) -> Option<usize> {
    let mut best: Option<(usize, (i32, bool), f64)> = None;
    for (j, v) in model.variables.iter().enumerate() {
        if !v.kind.is_integral() {
            continue;
        }
        let dist = (x[j] - x[j].round()).abs();
        if dist <= tol {
            continue;
        }
        let rank = (v.priority, v.kind == VarKind::Boolean);
        let better = match best {
            None => true,
            Some((_, best_rank, best_dist)) => {
                rank > best_rank || (rank == best_rank && dist > best_dist + simplex::EPS)
            }
        };
        if better {
            best = Some((j, rank, dist));
        }
    }
    best.map(|(j, ..)| j)
}

impl MilpSolver for BranchAndBound {
    fn solve(&mut self, model: &Model) -> Result<Solution> {
        self.search(model, None)
    }

    fn solve_from(&mut self, model: &Model, start: &[f64]) -> Result<Solution> {
        self.search(model, Some(start))
    }
}
