//! Bounded-variable dual simplex over a dense tableau.
//!
//! Every constraint row gets a logical variable equal to its activity, so range constraints and
//! variable bounds are both plain bounds rather than extra rows. The tableau outlives a single
//! solve: changing bounds never breaks dual feasibility of the current basis, so a
//! branch-and-bound node re-optimizes from wherever the previous node stopped, usually in a
//! handful of pivots.

pub(crate) const EPS: f64 = 1e-9;
const PRIMAL_TOL: f64 = 1e-7;
const PIVOT_TOL: f64 = 1e-9;
const DROP_TOL: f64 = 1e-12;

/// Stand-in for a missing bound. A solution resting on it means the relaxation is unbounded.
pub(crate) const BOX: f64 = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Basic,
    AtLower,
    AtUpper,
}

/// `lower <= sum(coef * x) <= upper`, with `-BOX` / `BOX` for a missing side.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) terms: Vec<(usize, f64)>,
    pub(crate) lower: f64,
    pub(crate) upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum LpOutcome {
    Optimal { objective: f64 },
    Infeasible,
    Unbounded,
}

/// LP relaxation of `min cost·x` over the rows, with per-solve bounds on the structural
/// variables.
///
/// Tableau row `i` reads `x[basis[i]] + sum(tableau[i][j] * x[j] for nonbasic j) = 0`; columns
/// `0..n` are structural and column `n + i` is the logical of row `i`.
#[derive(Debug, Clone)]
pub(crate) struct Relaxation {
    structural: usize,
    tableau: Vec<Vec<f64>>,
    basis: Vec<usize>,
    status: Vec<Status>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    cost: Vec<f64>,
    reduced: Vec<f64>,
    value: Vec<f64>,
    pivots: usize,
}

impl Relaxation {
    pub(crate) fn new(cost: &[f64], rows: &[Row]) -> Self {
        let n = cost.len();
        let width = n + rows.len();
        let mut tableau = vec![vec![0.0; width]; rows.len()];
        let mut lower = vec![0.0; width];
        let mut upper = vec![BOX; width];
        for (i, row) in rows.iter().enumerate() {
            for &(j, coef) in &row.terms {
                tableau[i][j] -= coef;
            }
            tableau[i][n + i] = 1.0;
            lower[n + i] = row.lower;
            upper[n + i] = row.upper;
        }

        let mut status = vec![Status::AtLower; width];
        for s in status.iter_mut().skip(n) {
            *s = Status::Basic;
        }
        let mut full_cost = vec![0.0; width];
        full_cost[..n].copy_from_slice(cost);

        Self {
            structural: n,
            tableau,
            basis: (n..width).collect(),
            status,
            lower,
            upper,
            reduced: full_cost.clone(),
            cost: full_cost,
            value: vec![0.0; width],
            pivots: 0,
        }
    }

    /// Structural values of the last solve.
    pub(crate) fn values(&self) -> &[f64] {
        &self.value[..self.structural]
    }

    /// Pivots performed over the lifetime of the relaxation.
    pub(crate) fn pivots(&self) -> usize {
        self.pivots
    }

    /// Re-optimizes under new structural bounds, starting from the current basis.
    pub(crate) fn solve(&mut self, lower: &[f64], upper: &[f64]) -> LpOutcome {
        let n = self.structural;
        self.lower[..n].copy_from_slice(lower);
        self.upper[..n].copy_from_slice(upper);
        for j in 0..self.status.len() {
            if self.status[j] != Status::Basic {
                self.place_nonbasic(j);
            }
        }
        self.refresh_basics();

        // Largest-violation pricing; Bland's rule once the step count suggests cycling.
        let bland_after = 50 + 10 * (self.basis.len() + self.status.len());
        let mut steps: usize = 0;
        loop {
            let bland = steps > bland_after;
            let Some(r) = self.leaving_row(bland) else {
                break;
            };
            let Some(q) = self.entering_column(r, bland) else {
                return LpOutcome::Infeasible;
            };
            self.step(r, q);
            steps += 1;
        }

        if self.value.iter().any(|v| v.abs() >= BOX / 2.0) {
            return LpOutcome::Unbounded;
        }
        let objective = self.cost[..n]
            .iter()
            .zip(&self.value[..n])
            .map(|(c, v)| c * v)
            .sum();
        LpOutcome::Optimal { objective }
    }

    /// Parks a nonbasic variable on the bound its reduced cost asks for, which keeps the basis
    /// dual feasible whatever the bounds are.
    fn place_nonbasic(&mut self, j: usize) {
        let d = self.reduced[j];
        let status = if self.lower[j] >= self.upper[j] || d > EPS {
            Status::AtLower
        } else if d < -EPS {
            Status::AtUpper
        } else if self.status[j] == Status::AtUpper && self.upper[j] < BOX {
            Status::AtUpper
        } else if self.lower[j] > -BOX {
            Status::AtLower
        } else {
            Status::AtUpper
        };
        self.status[j] = status;
        self.value[j] = match status {
            Status::AtUpper => self.upper[j],
            _ => self.lower[j],
        };
    }

    fn refresh_basics(&mut self) {
        let moved: Vec<(usize, f64)> = self
            .status
            .iter()
            .enumerate()
            .filter(|&(j, s)| *s != Status::Basic && self.value[j] != 0.0)
            .map(|(j, _)| (j, self.value[j]))
            .collect();
        for (i, row) in self.tableau.iter().enumerate() {
            let activity: f64 = moved.iter().map(|&(j, x)| row[j] * x).sum();
            self.value[self.basis[i]] = -activity;
        }
    }

    fn violation(&self, var: usize) -> Option<f64> {
        let v = self.value[var];
        if v < self.lower[var] - PRIMAL_TOL {
            Some(self.lower[var] - v)
        } else if v > self.upper[var] + PRIMAL_TOL {
            Some(v - self.upper[var])
        } else {
            None
        }
    }

    fn leaving_row(&self, bland: bool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &b) in self.basis.iter().enumerate() {
            let Some(violation) = self.violation(b) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((k, worst)) => {
                    if bland {
                        b < self.basis[k]
                    } else {
                        violation > worst
                    }
                }
            };
            if better {
                best = Some((i, violation));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Dual ratio test on row `r`: the nonbasic column that can push the leaving variable back
    /// toward its bound while keeping every reduced cost on the right side of zero.
    fn entering_column(&self, r: usize, bland: bool) -> Option<usize> {
        let b = self.basis[r];
        let raise = self.value[b] < self.lower[b];
        let mut best: Option<(usize, f64, f64)> = None;
        for (j, &alpha) in self.tableau[r].iter().enumerate() {
            if alpha.abs() <= PIVOT_TOL
                || self.status[j] == Status::Basic
                || self.lower[j] >= self.upper[j]
            {
                continue;
            }
            // The leaving variable moves by `-alpha` per unit the entering one moves.
            let increases = self.status[j] == Status::AtLower;
            let helps = if raise {
                (alpha < 0.0) == increases
            } else {
                (alpha > 0.0) == increases
            };
            if !helps {
                continue;
            }
            let ratio = self.reduced[j].abs() / alpha.abs();
            let better = match best {
                None => true,
                Some((_, best_ratio, best_alpha)) => {
                    ratio < best_ratio - EPS
                        || (!bland && ratio <= best_ratio + EPS && alpha.abs() > best_alpha)
                }
            };
            if better {
                best = Some((j, ratio, alpha.abs()));
            }
        }
        best.map(|(j, ..)| j)
    }

    fn step(&mut self, r: usize, q: usize) {
        let b = self.basis[r];
        let to_lower = self.value[b] < self.lower[b];
        let target = if to_lower {
            self.lower[b]
        } else {
            self.upper[b]
        };
        let delta = (self.value[b] - target) / self.tableau[r][q];
        for (i, row) in self.tableau.iter().enumerate() {
            if i != r {
                self.value[self.basis[i]] -= row[q] * delta;
            }
        }
        self.value[q] += delta;
        self.value[b] = target;
        self.status[b] = if to_lower {
            Status::AtLower
        } else {
            Status::AtUpper
        };
        self.pivot(r, q);
    }

    fn pivot(&mut self, r: usize, q: usize) {
        let p = self.tableau[r][q];
        for v in self.tableau[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = std::mem::take(&mut self.tableau[r]);
        let support: Vec<usize> = pivot_row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(j, _)| j)
            .collect();

        for (i, row) in self.tableau.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let f = row[q];
            if f == 0.0 {
                continue;
            }
            for &j in &support {
                let v = row[j] - f * pivot_row[j];
                row[j] = if v.abs() < DROP_TOL { 0.0 } else { v };
            }
            row[q] = 0.0;
        }

        let d = self.reduced[q];
        if d != 0.0 {
            for &j in &support {
                self.reduced[j] -= d * pivot_row[j];
            }
            self.reduced[q] = 0.0;
        }

        self.tableau[r] = pivot_row;
        self.basis[r] = q;
        self.status[q] = Status::Basic;
        self.pivots += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(terms: &[(usize, f64)], lower: f64, upper: f64) -> Row {
        Row {
            terms: terms.to_vec(),
            lower,
            upper,
        }
    }

    fn optimum(outcome: LpOutcome) -> f64 {
        let LpOutcome::Optimal { objective } = outcome else {
            panic!("expected an optimum, got {outcome:?}");
        };
        objective
    }

    #[test]
    fn solves_a_textbook_maximization() {
        // max 3x + 5y s.t. x <= 4, 2y <= 12, 3x + 2y <= 18  =>  x = 2, y = 6, value 36
        let mut lp = Relaxation::new(
            &[-3.0, -5.0],
            &[
                row(&[(0, 1.0)], -BOX, 4.0),
                row(&[(1, 2.0)], -BOX, 12.0),
                row(&[(0, 3.0), (1, 2.0)], -BOX, 18.0),
            ],
        );
        let objective = optimum(lp.solve(&[0.0, 0.0], &[BOX, BOX]));
        assert!((objective + 36.0).abs() < 1e-6);
        assert!((lp.values()[0] - 2.0).abs() < 1e-6);
        assert!((lp.values()[1] - 6.0).abs() < 1e-6);
    }

    #[test]
    fn handles_ranges_and_equalities() {
        // min x + y s.t. x + y >= 2, x - y = 1  =>  x = 1.5, y = 0.5
        let mut lp = Relaxation::new(
            &[1.0, 1.0],
            &[
                row(&[(0, 1.0), (1, 1.0)], 2.0, BOX),
                row(&[(0, 1.0), (1, -1.0)], 1.0, 1.0),
            ],
        );
        let objective = optimum(lp.solve(&[0.0, 0.0], &[BOX, BOX]));
        assert!((objective - 2.0).abs() < 1e-6);
        assert!((lp.values()[0] - 1.5).abs() < 1e-6);
        assert!((lp.values()[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn detects_infeasibility() {
        let mut lp = Relaxation::new(&[1.0], &[row(&[(0, 1.0)], 2.0, BOX)]);
        assert_eq!(lp.solve(&[0.0], &[1.0]), LpOutcome::Infeasible);
    }

    #[test]
    fn detects_unboundedness() {
        let mut lp = Relaxation::new(&[-1.0], &[row(&[(0, 1.0)], 1.0, BOX)]);
        assert_eq!(lp.solve(&[0.0], &[BOX]), LpOutcome::Unbounded);
    }

    #[test]
    fn re_solves_after_bound_changes() {
        // min -x - y s.t. x + y <= 1.5, both in [0, 1].
        let mut lp = Relaxation::new(&[-1.0, -1.0], &[row(&[(0, 1.0), (1, 1.0)], -BOX, 1.5)]);
        assert!((optimum(lp.solve(&[0.0, 0.0], &[1.0, 1.0])) + 1.5).abs() < 1e-6);

        // Fix x to 0: y alone reaches 1.
        assert!((optimum(lp.solve(&[0.0, 0.0], &[0.0, 1.0])) + 1.0).abs() < 1e-6);
        assert!(lp.values()[0].abs() < 1e-9);

        // Force both up: infeasible. Then relax again.
        assert_eq!(lp.solve(&[1.0, 1.0], &[1.0, 1.0]), LpOutcome::Infeasible);
        assert!((optimum(lp.solve(&[0.0, 0.0], &[1.0, 1.0])) + 1.5).abs() < 1e-6);
    }
}
