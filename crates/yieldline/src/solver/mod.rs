//! Collapse solve: LP backend seam, constraint-generation outer loop and
//! yield-line extraction.
//!
//! Purpose
//! - Solve the kinematic LP on the currently active edge subset, read the
//!   nodal forces off the dual row values, test every removable candidate
//!   for yield violation over the full set, activate the worst offenders,
//!   and repeat until no candidate violates (or the objective stagnates).
//!   Each activation only enlarges the feasible set of the minimisation, so
//!   the objective sequence is monotone non-increasing: the restricted
//!   problem over-estimates capacity until the violated candidates join.
//!
//! Why a backend trait
//! - The LP layer is a plain column-oriented contract (resize, row bounds,
//!   add-column, objective, column bounds, solve with primal and dual
//!   recovery), so backends are interchangeable; `InteriorPoint` is the
//!   bundled one and tests drive the loop with scripted stand-ins.

mod assemble;
mod interior;

pub use interior::{InteriorCfg, InteriorPoint};

use crate::domain::Domain;
use crate::error::Error;
use crate::geom::{EdgeKind, Vec2};

pub(crate) use assemble::{assemble, Assembly};

/// Column-oriented LP backend contract. Rows are constraints, columns are
/// variables; the model is rebuilt from scratch between outer iterations.
pub trait LpBackend {
    /// Drop any previously assembled model.
    fn clear(&mut self);
    /// Declare the number of constraint rows.
    fn resize(&mut self, num_rows: usize);
    fn set_row_bounds(&mut self, row: usize, lo: f64, hi: f64);
    /// Append a column given its sparse entries; returns the column index.
    fn add_column(&mut self, rows: &[usize], values: &[f64]) -> usize;
    fn set_objective(&mut self, col: usize, coeff: f64);
    fn set_column_bounds(&mut self, col: usize, lo: f64, hi: f64);
    /// Minimise; returns the primal objective, the primal column solution
    /// and the dual row values.
    fn solve(&mut self) -> Result<LpSolution, Error>;
}

/// Result of one LP solve.
#[derive(Clone, Debug)]
pub struct LpSolution {
    pub objective: f64,
    pub columns: Vec<f64>,
    pub row_duals: Vec<f64>,
}

/// Outer-loop configuration.
#[derive(Clone, Copy, Debug)]
pub struct SolveCfg {
    /// A candidate violates when its yield ratio exceeds 1 by more than
    /// this.
    pub yield_tol: f64,
    /// Fraction of the active set activated per iteration (at least one
    /// edge).
    pub activation_fraction: f64,
    /// Objective change treated as "no progress".
    pub stagnation_tol: f64,
    /// Consecutive no-progress iterations before the loop stops.
    pub stagnation_limit: usize,
    /// Plastic multipliers below this are not reported as yield lines.
    pub multiplier_tol: f64,
}

impl Default for SolveCfg {
    fn default() -> Self {
        SolveCfg {
            yield_tol: 1e-6,
            activation_fraction: 0.05,
            stagnation_tol: 1e-6,
            stagnation_limit: 10,
            multiplier_tol: 1e-3,
        }
    }
}

/// One yield-line record: the kinematic variables, the governing plastic
/// multiplier and the segment endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YieldLine {
    pub phi_n: f64,
    pub phi_t: f64,
    pub delta: f64,
    pub plastic: f64,
    pub p1: Vec2,
    pub p2: Vec2,
}

impl YieldLine {
    /// The 8-double wire record consumed by line renderers:
    /// (φn, φt, δ, plastic, x1, y1, x2, y2).
    pub fn to_row(&self) -> [f64; 8] {
        [
            self.phi_n, self.phi_t, self.delta, self.plastic, self.p1.x, self.p1.y, self.p2.x,
            self.p2.y,
        ]
    }
}

/// Converged collapse state.
#[derive(Clone, Debug)]
pub struct Collapse {
    /// The collapse load factor.
    pub lambda: f64,
    pub yield_lines: Vec<YieldLine>,
    /// Objective after each LP solve, in order; non-increasing within
    /// solver tolerance.
    pub history: Vec<f64>,
    /// Total number of LP solves.
    pub solves: usize,
}

/// Solve with the default configuration.
pub fn solve<B: LpBackend>(domain: &mut Domain, backend: &mut B) -> Result<Collapse, Error> {
    solve_with_cfg(domain, backend, SolveCfg::default())
}

/// Run the constraint-generation loop to convergence.
pub fn solve_with_cfg<B: LpBackend>(
    domain: &mut Domain,
    backend: &mut B,
    cfg: SolveCfg,
) -> Result<Collapse, Error> {
    OuterRunner {
        domain,
        backend,
        cfg,
        history: Vec::new(),
    }
    .run()
}

struct OuterRunner<'a, B: LpBackend> {
    domain: &'a mut Domain,
    backend: &'a mut B,
    cfg: SolveCfg,
    history: Vec<f64>,
}

impl<B: LpBackend> OuterRunner<'_, B> {
    fn run(mut self) -> Result<Collapse, Error> {
        let (mut sol, mut plan) = self.lp_round()?;
        let mut lambda = sol.objective;
        self.history.push(lambda);

        let mut violations = self.activate_violators(lambda, &sol.row_duals);
        let mut stale = 0usize;
        while violations {
            let old = lambda;
            (sol, plan) = self.lp_round()?;
            lambda = sol.objective;
            self.history.push(lambda);

            if (old - lambda).abs() < self.cfg.stagnation_tol {
                stale += 1;
            } else {
                stale = 0;
            }
            if stale == self.cfg.stagnation_limit {
                tracing::warn!(lambda, "objective stagnated; treating as converged");
                break;
            }
            violations = self.activate_violators(lambda, &sol.row_duals);
        }

        let yield_lines =
            extract_yield_lines(self.domain, &sol, plan.num_disp, self.cfg.multiplier_tol);
        tracing::info!(
            lambda,
            solves = self.history.len(),
            yield_lines = yield_lines.len(),
            "collapse solve finished"
        );
        Ok(Collapse {
            lambda,
            yield_lines,
            solves: self.history.len(),
            history: self.history,
        })
    }

    fn lp_round(&mut self) -> Result<(LpSolution, Assembly), Error> {
        self.backend.clear();
        let plan = assemble(self.domain, self.backend);
        let sol = self.backend.solve()?;
        tracing::debug!(
            objective = sol.objective,
            columns = plan.num_disp + 2 * plan.num_yield,
            rows = plan.num_rows,
            "lp solved"
        );
        Ok((sol, plan))
    }

    /// Update every removable candidate's yield ratio from the nodal
    /// forces, then activate the worst offenders. Returns whether any
    /// candidate violated.
    fn activate_violators(&mut self, lambda: f64, duals: &[f64]) -> bool {
        let live = self.domain.live_load;
        let dead = self.domain.dead_load;
        let force = |id: usize| -> [f64; 3] {
            [duals[3 * id - 3], duals[3 * id - 2], duals[3 * id - 1]]
        };

        let mut violators: Vec<usize> = Vec::new();
        let indices: Vec<usize> = self.domain.active.to_vec();
        for i in indices {
            let edge = &mut self.domain.edges[i];
            if !edge.removable {
                continue;
            }
            let b = edge.compatibility(false);
            let fl = edge.udl.unwrap_or([0.0; 3]);
            let f1 = force(edge.n1);
            let f2 = force(edge.n2);

            let mut mn = 0.0;
            for row in 0..3 {
                mn += b[row][0] * f1[row];
            }
            for row in 3..6 {
                mn += b[row][0] * f2[row - 3];
            }
            mn += lambda * fl[0] * live + fl[0] * dead;

            edge.yield_ratio = if mn < 0.0 {
                (mn / (edge.mp_neg * edge.length)).abs()
            } else {
                (mn / (edge.mp_pos * edge.length)).abs()
            };
            if edge.yield_ratio - 1.0 > self.cfg.yield_tol && !edge.added {
                violators.push(i);
            }
        }

        if violators.is_empty() {
            return false;
        }

        violators.sort_by(|&a, &b| {
            self.domain.edges[b]
                .yield_ratio
                .partial_cmp(&self.domain.edges[a].yield_ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let added = self.domain.active_edges().filter(|e| e.added).count();
        let quota = ((added as f64 * self.cfg.activation_fraction) as usize)
            .max(1)
            .min(violators.len());
        for &i in violators.iter().take(quota) {
            self.domain.edges[i].added = true;
        }
        tracing::debug!(
            violators = violators.len(),
            activated = quota,
            "activated violated candidates"
        );
        true
    }
}

/// Walk the active edges in insertion order and read each one's kinematic
/// variables and plastic multipliers off the primal solution.
fn extract_yield_lines(
    domain: &Domain,
    sol: &LpSolution,
    num_disp: usize,
    tol: f64,
) -> Vec<YieldLine> {
    let primal = &sol.columns;
    let mut out = Vec::new();
    let mut row = 0usize;
    let mut yield_idx = 0usize;

    for edge in domain.active_edges() {
        if !edge.added {
            continue;
        }
        let (p1, p2) = edge.endpoints();
        match edge.kind {
            EdgeKind::Free => {
                out.push(YieldLine {
                    phi_n: primal[row],
                    phi_t: primal[row + 1],
                    delta: primal[row + 2],
                    plastic: 0.0,
                    p1,
                    p2,
                });
                row += 3;
            }
            EdgeKind::SimpleAnchored => {
                out.push(YieldLine {
                    phi_n: primal[row],
                    phi_t: 0.0,
                    delta: 0.0,
                    plastic: 0.0,
                    p1,
                    p2,
                });
                row += 1;
            }
            _ => {
                let phi_n = primal[row];
                row += edge.dof();
                let slot = num_disp + 2 * yield_idx;
                let pm_pos = primal[slot];
                let pm_neg = primal[slot + 1];
                if pm_pos > tol || pm_neg > tol {
                    out.push(YieldLine {
                        phi_n,
                        phi_t: 0.0,
                        delta: 0.0,
                        plastic: if pm_pos > tol { pm_pos } else { pm_neg },
                        p1,
                        p2,
                    });
                }
                yield_idx += 1;
            }
        }
    }
    out
}
