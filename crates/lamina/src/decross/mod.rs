//! Exact crossing minimization.
//!
//! [`OptimalDecrossing`] builds a [`CrossingModel`] for a [`LayeredGraph`], hands it to a
//! [`MilpSolver`] along with a barycenter-sweep order to improve upon, and turns the solved pair
//! decisions back into one order per layer. Planning never touches the graph;
//! [`LayerOrders::apply`] writes the result back.

pub mod canonical;
pub mod crossings;
pub mod model;
pub mod sweep;

pub use canonical::{OrderingIndex, PairSlot};
pub use crossings::{crossing_count, two_layer_crossings};
pub use model::CrossingModel;
pub use sweep::barycenter_order;

use crate::error::{Error, Result};
use crate::layered::{LayeredGraph, VertexId};
use crate::milp::{self, BranchAndBound, MilpSolver, Solution};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE_GUARD_LIMIT: usize = 2500;

/// Direction assumed for a pair whose value is missing from the solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackOrder {
    /// Keep the pair in its order at call time.
    #[default]
    Canonical,
    /// Swap the pair.
    Reversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecrossOptions {
    /// Solve even when the sum of squared layer sizes exceeds `size_guard_limit`.
    pub override_size_guard: bool,
    pub size_guard_limit: usize,
    pub fallback: FallbackOrder,
    /// Fail instead of falling back when the solution is missing pair values or does not
    /// describe a total order.
    pub strict: bool,
}

impl Default for DecrossOptions {
    fn default() -> Self {
        Self {
            override_size_guard: false,
            size_guard_limit: DEFAULT_SIZE_GUARD_LIMIT,
            fallback: FallbackOrder::Canonical,
            strict: false,
        }
    }
}

/// Immutable crossing minimizer configuration. Setters return a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimalDecrossing {
    options: DecrossOptions,
}

/// Solved per-layer orders, ready to be applied to the graph they were planned for.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOrders {
    layers: Vec<Vec<VertexId>>,
    objective: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecrossReport {
    pub crossings_before: usize,
    pub crossings_after: usize,
    /// Objective value reported by the solver.
    pub objective: f64,
}

impl OptimalDecrossing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: DecrossOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecrossOptions {
        &self.options
    }

    pub fn override_size_guard(self, value: bool) -> Self {
        Self {
            options: DecrossOptions {
                override_size_guard: value,
                ..self.options
            },
        }
    }

    pub fn size_guard_limit(self, limit: usize) -> Self {
        Self {
            options: DecrossOptions {
                size_guard_limit: limit,
                ..self.options
            },
        }
    }

    pub fn fallback(self, fallback: FallbackOrder) -> Self {
        Self {
            options: DecrossOptions {
                fallback,
                ..self.options
            },
        }
    }

    pub fn strict(self, value: bool) -> Self {
        Self {
            options: DecrossOptions {
                strict: value,
                ..self.options
            },
        }
    }

    pub fn check_size(&self, g: &LayeredGraph) -> Result<()> {
        let cost = g.ordering_cost();
        if cost > self.options.size_guard_limit && !self.options.override_size_guard {
            return Err(Error::SizeGuard {
                cost,
                limit: self.options.size_guard_limit,
            });
        }
        Ok(())
    }

    /// Plans with the bundled [`BranchAndBound`] solver.
    pub fn plan(&self, g: &LayeredGraph) -> Result<LayerOrders> {
        self.plan_with(g, &mut BranchAndBound::new())
    }

    pub fn plan_with<S>(&self, g: &LayeredGraph, solver: &mut S) -> Result<LayerOrders>
    where
        S: MilpSolver + ?Sized,
    {
        self.check_size(g)?;

        let model = CrossingModel::build(g);
        let start = model.assignment(&barycenter_order(g));
        let solution = match solver.solve_from(model.model(), &start) {
            Ok(solution) => solution,
            Err(err @ (milp::Error::Infeasible | milp::Error::Unbounded)) => {
                return Err(Error::SolverInconsistency {
                    message: format!("the ordering model always has a solution, but {err}"),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let mut layers = Vec::with_capacity(g.layer_count());
        for (ix, layer) in g.layers().iter().enumerate() {
            layers.push(self.resolve_layer(&model, &solution, ix, layer)?);
        }
        Ok(LayerOrders {
            layers,
            objective: solution.objective,
        })
    }

    /// Plans with the bundled solver and applies the result.
    pub fn decross(&self, g: &mut LayeredGraph) -> Result<DecrossReport> {
        self.decross_with(g, &mut BranchAndBound::new())
    }

    pub fn decross_with<S>(&self, g: &mut LayeredGraph, solver: &mut S) -> Result<DecrossReport>
    where
        S: MilpSolver + ?Sized,
    {
        let crossings_before = crossing_count(g);
        let orders = self.plan_with(g, solver)?;
        let objective = orders.objective();
        orders.apply(g)?;
        let crossings_after = crossing_count(g);
        if (objective - crossings_after as f64).abs() > 0.5 {
            tracing::warn!(
                objective,
                crossings_after,
                "solved objective disagrees with the crossings of the applied order"
            );
        }
        Ok(DecrossReport {
            crossings_before,
            crossings_after,
            objective,
        })
    }

    /// Orders one layer by how many of its peers each vertex precedes. For a solution that
    /// satisfies the transitivity rows these counts are a permutation and the result is the
    /// solved order; otherwise ties fall back to canonical order.
    fn resolve_layer(
        &self,
        model: &CrossingModel,
        solution: &Solution,
        ix: usize,
        layer: &[VertexId],
    ) -> Result<Vec<VertexId>> {
        let n = layer.len();
        let mut wins: Vec<usize> = vec![0; n];
        let mut missing: usize = 0;
        for i in 0..n {
            for j in i + 1..n {
                let Some((var, forward)) = model.pair_var(layer[i], layer[j]) else {
                    continue;
                };
                let lower_first = match solution.flag(var) {
                    Some(flag) => flag,
                    None => {
                        missing += 1;
                        self.options.fallback == FallbackOrder::Canonical
                    }
                };
                let i_first = lower_first == forward;
                if i_first {
                    wins[i] += 1;
                } else {
                    wins[j] += 1;
                }
            }
        }

        if missing > 0 {
            if self.options.strict {
                return Err(Error::SolverInconsistency {
                    message: format!("solution is missing {missing} pair values on layer {ix}"),
                });
            }
            tracing::warn!(
                layer = ix,
                missing,
                fallback = ?self.options.fallback,
                "solution is missing pair values; using the fallback direction"
            );
        }

        let mut sorted_wins = wins.clone();
        sorted_wins.sort_unstable();
        if sorted_wins.iter().enumerate().any(|(k, &w)| k != w) {
            if self.options.strict {
                return Err(Error::SolverInconsistency {
                    message: format!("pair values on layer {ix} do not form a total order"),
                });
            }
            tracing::warn!(
                layer = ix,
                "pair values do not form a total order; breaking ties canonically"
            );
        }

        let mut positions: Vec<usize> = (0..n).collect();
        positions.sort_by(|&a, &b| wins[b].cmp(&wins[a]).then(a.cmp(&b)));
        Ok(positions.into_iter().map(|p| layer[p]).collect())
    }
}

impl LayerOrders {
    pub fn layers(&self) -> &[Vec<VertexId>] {
        &self.layers
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Writes the planned orders back. Fails without modifying anything if a layer no longer
    /// holds the same vertices it was planned with.
    pub fn apply(self, g: &mut LayeredGraph) -> Result<()> {
        if self.layers.len() != g.layer_count() {
            return Err(Error::StaleOrder {
                layer: self.layers.len().min(g.layer_count()),
            });
        }
        for (ix, order) in self.layers.iter().enumerate() {
            let mut planned = order.clone();
            let mut current = g.layers()[ix].clone();
            planned.sort_unstable();
            current.sort_unstable();
            if planned != current {
                return Err(Error::StaleOrder { layer: ix });
            }
        }
        for (ix, order) in self.layers.into_iter().enumerate() {
            g.replace_layer(ix, order);
        }
        Ok(())
    }
}
