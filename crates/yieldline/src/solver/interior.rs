//! Bundled LP backend: a primal-dual interior-point method (Mehrotra
//! predictor-corrector) over the column-oriented model.
//!
//! The assembled model has equality rows, free displacement columns and
//! non-negative multiplier columns. Free columns are split into differences
//! of non-negatives, giving the standard form min cᵀx, Ax = b, x ≥ 0. Each
//! iteration factors the normal equations A·Θ·Aᵀ + δI with a dense
//! Cholesky; the static δ regularisation absorbs structurally zero rows
//! (rotation rows of nodes touched only by single-DOF edges).

use nalgebra::{Cholesky, DMatrix, DVector};

use super::{LpBackend, LpSolution};
use crate::error::Error;

#[derive(Clone, Copy, Debug)]
pub struct InteriorCfg {
    /// Relative tolerance on primal/dual residuals and the duality gap.
    pub tol: f64,
    pub max_iter: usize,
    /// Static diagonal added to the normal equations.
    pub regularization: f64,
}

impl Default for InteriorCfg {
    fn default() -> Self {
        InteriorCfg {
            tol: 1e-8,
            max_iter: 200,
            regularization: 1e-10,
        }
    }
}

#[derive(Clone, Debug)]
struct Column {
    rows: Vec<usize>,
    vals: Vec<f64>,
    obj: f64,
    lo: f64,
    hi: f64,
}

/// Interior-point LP backend.
#[derive(Clone, Debug, Default)]
pub struct InteriorPoint {
    pub cfg: InteriorCfg,
    num_rows: usize,
    row_lo: Vec<f64>,
    row_hi: Vec<f64>,
    cols: Vec<Column>,
}

impl LpBackend for InteriorPoint {
    fn clear(&mut self) {
        self.num_rows = 0;
        self.row_lo.clear();
        self.row_hi.clear();
        self.cols.clear();
    }

    fn resize(&mut self, num_rows: usize) {
        self.num_rows = num_rows;
        self.row_lo = vec![0.0; num_rows];
        self.row_hi = vec![0.0; num_rows];
    }

    fn set_row_bounds(&mut self, row: usize, lo: f64, hi: f64) {
        self.row_lo[row] = lo;
        self.row_hi[row] = hi;
    }

    fn add_column(&mut self, rows: &[usize], values: &[f64]) -> usize {
        debug_assert_eq!(rows.len(), values.len());
        self.cols.push(Column {
            rows: rows.to_vec(),
            vals: values.to_vec(),
            obj: 0.0,
            lo: 0.0,
            hi: f64::INFINITY,
        });
        self.cols.len() - 1
    }

    fn set_objective(&mut self, col: usize, coeff: f64) {
        self.cols[col].obj = coeff;
    }

    fn set_column_bounds(&mut self, col: usize, lo: f64, hi: f64) {
        self.cols[col].lo = lo;
        self.cols[col].hi = hi;
    }

    fn solve(&mut self) -> Result<LpSolution, Error> {
        Solver::build(self)?.run(self.cfg)
    }
}

/// Standard-form problem data plus the split map back to model columns.
struct Solver<'a> {
    backend: &'a InteriorPoint,
    m: usize,
    /// (model column, sign) per standard-form variable.
    vars: Vec<(usize, f64)>,
    b: DVector<f64>,
    c: DVector<f64>,
}

impl<'a> Solver<'a> {
    fn build(backend: &'a InteriorPoint) -> Result<Self, Error> {
        let m = backend.num_rows;
        if m == 0 || backend.cols.is_empty() {
            return Err(Error::Backend("empty model".into()));
        }
        let mut b = DVector::zeros(m);
        for r in 0..m {
            if (backend.row_lo[r] - backend.row_hi[r]).abs() > 1e-12 {
                return Err(Error::Backend("only equality rows are supported".into()));
            }
            b[r] = backend.row_lo[r];
        }

        let mut vars = Vec::new();
        for (j, col) in backend.cols.iter().enumerate() {
            if col.lo == 0.0 && col.hi == f64::INFINITY {
                vars.push((j, 1.0));
            } else if col.lo == f64::NEG_INFINITY && col.hi == f64::INFINITY {
                vars.push((j, 1.0));
                vars.push((j, -1.0));
            } else {
                return Err(Error::Backend("unsupported column bounds".into()));
            }
        }
        let c = DVector::from_iterator(
            vars.len(),
            vars.iter().map(|&(j, s)| s * backend.cols[j].obj),
        );
        Ok(Solver { backend, m, vars, b, c })
    }

    fn a_mul(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(self.m);
        for (k, &(j, s)) in self.vars.iter().enumerate() {
            let xk = x[k];
            if xk == 0.0 {
                continue;
            }
            let col = &self.backend.cols[j];
            for (r, v) in col.rows.iter().zip(col.vals.iter()) {
                out[*r] += s * v * xk;
            }
        }
        out
    }

    fn at_mul(&self, y: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.vars.len(),
            self.vars.iter().map(|&(j, s)| {
                let col = &self.backend.cols[j];
                let mut acc = 0.0;
                for (r, v) in col.rows.iter().zip(col.vals.iter()) {
                    acc += v * y[*r];
                }
                s * acc
            }),
        )
    }

    /// A·Θ·Aᵀ + δI; the split signs square away.
    fn normal_matrix(&self, theta: &DVector<f64>, delta: f64) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.m, self.m);
        for (k, &(j, _)) in self.vars.iter().enumerate() {
            let t = theta[k];
            let col = &self.backend.cols[j];
            for (ri, vi) in col.rows.iter().zip(col.vals.iter()) {
                for (rj, vj) in col.rows.iter().zip(col.vals.iter()) {
                    mat[(*ri, *rj)] += t * vi * vj;
                }
            }
        }
        for r in 0..self.m {
            mat[(r, r)] += delta;
        }
        mat
    }

    fn factor(&self, theta: &DVector<f64>, delta0: f64) -> Result<Cholesky<f64, nalgebra::Dyn>, Error> {
        let mut delta = delta0;
        for _ in 0..6 {
            if let Some(ch) = Cholesky::new(self.normal_matrix(theta, delta)) {
                return Ok(ch);
            }
            delta *= 100.0;
        }
        Err(Error::Backend("normal equations are not factorizable".into()))
    }

    fn run(&self, cfg: InteriorCfg) -> Result<LpSolution, Error> {
        let n = self.vars.len();
        let nf = n as f64;
        let e = DVector::from_element(n, 1.0);

        // Starting point from the least-squares heuristic; fall back to the
        // all-ones point when it degenerates.
        let (mut x, mut y, mut s) = {
            let ch = self.factor(&e, cfg.regularization.max(1e-10))?;
            let x_t = self.at_mul(&ch.solve(&self.b));
            let y0 = ch.solve(&self.a_mul(&self.c));
            let s_t = &self.c - self.at_mul(&y0);
            let dx = (-1.5 * x_t.min()).max(0.0);
            let ds = (-1.5 * s_t.min()).max(0.0);
            let xs: f64 = x_t
                .iter()
                .zip(s_t.iter())
                .map(|(xi, si)| (xi + dx) * (si + ds))
                .sum();
            let sum_x: f64 = x_t.iter().map(|v| v + dx).sum();
            let sum_s: f64 = s_t.iter().map(|v| v + ds).sum();
            if xs > 0.0 && sum_x > 0.0 && sum_s > 0.0 {
                let dxh = dx + 0.5 * xs / sum_s;
                let dsh = ds + 0.5 * xs / sum_x;
                (x_t.add_scalar(dxh), y0, s_t.add_scalar(dsh))
            } else {
                (e.clone(), DVector::zeros(self.m), e.clone())
            }
        };

        let bnorm = 1.0 + self.b.norm();
        let cnorm = 1.0 + self.c.norm();

        for iter in 0..cfg.max_iter {
            let rp = &self.b - self.a_mul(&x);
            let rd = &self.c - self.at_mul(&y) - &s;
            let mu = x.dot(&s) / nf;
            let pobj = self.c.dot(&x);
            let dobj = self.b.dot(&y);
            let rel_gap = (pobj - dobj).abs() / (1.0 + pobj.abs());
            let rp_rel = rp.norm() / bnorm;
            let rd_rel = rd.norm() / cnorm;

            if !mu.is_finite() || !pobj.is_finite() {
                return Err(Error::Backend("iterates diverged".into()));
            }
            if rp_rel < cfg.tol && rd_rel < cfg.tol && rel_gap < cfg.tol {
                tracing::debug!(iter, pobj, "interior point converged");
                return Ok(self.solution(pobj, &x, &y));
            }
            if mu < 1e-11 {
                // Complementarity has collapsed; either the point is
                // near-optimal or a residual refuses to vanish, which marks
                // the model infeasible/unbounded rather than unsolved.
                if rp_rel < 1e-6 && rd_rel < 1e-6 {
                    tracing::debug!(iter, pobj, "interior point near-optimal");
                    return Ok(self.solution(pobj, &x, &y));
                }
                if rp_rel > rd_rel {
                    return Err(Error::Infeasible);
                }
                return Err(Error::Unbounded);
            }

            let theta = x.zip_map(&s, |xi, si| (xi / si).clamp(1e-12, 1e12));
            let ch = self.factor(&theta, cfg.regularization)?;

            // Predictor (affine scaling) direction.
            let rxs_aff = -x.component_mul(&s);
            let w_aff = &rd - rxs_aff.component_div(&x);
            let dy_aff = ch.solve(&(&rp + self.a_mul(&theta.component_mul(&w_aff))));
            let dx_aff = theta.component_mul(&(self.at_mul(&dy_aff) - &w_aff));
            let ds_aff = (&rxs_aff - s.component_mul(&dx_aff)).component_div(&x);

            let ap_aff = step_ratio(&x, &dx_aff).min(1.0);
            let ad_aff = step_ratio(&s, &ds_aff).min(1.0);
            let mu_aff: f64 = x
                .iter()
                .zip(dx_aff.iter())
                .zip(s.iter().zip(ds_aff.iter()))
                .map(|((xi, dxi), (si, dsi))| (xi + ap_aff * dxi) * (si + ad_aff * dsi))
                .sum::<f64>()
                / nf;
            let sigma = (mu_aff / mu).powi(3).clamp(0.0, 1.0);

            // Corrector with centring.
            let rxs = rxs_aff.add_scalar(sigma * mu) - dx_aff.component_mul(&ds_aff);
            let w = &rd - rxs.component_div(&x);
            let dy = ch.solve(&(&rp + self.a_mul(&theta.component_mul(&w))));
            let dx = theta.component_mul(&(self.at_mul(&dy) - &w));
            let ds = (&rxs - s.component_mul(&dx)).component_div(&x);

            let ap = (0.9995 * step_ratio(&x, &dx)).min(1.0);
            let ad = (0.9995 * step_ratio(&s, &ds)).min(1.0);

            x += dx * ap;
            y += dy * ad;
            s += ds * ad;
        }
        Err(Error::IterationLimit(cfg.max_iter))
    }

    fn solution(&self, objective: f64, x: &DVector<f64>, y: &DVector<f64>) -> LpSolution {
        let mut columns = vec![0.0; self.backend.cols.len()];
        for (k, &(j, sgn)) in self.vars.iter().enumerate() {
            columns[j] += sgn * x[k];
        }
        LpSolution {
            objective,
            columns,
            row_duals: y.iter().copied().collect(),
        }
    }
}

/// Largest α with v + α·dv ≥ 0.
fn step_ratio(v: &DVector<f64>, dv: &DVector<f64>) -> f64 {
    let mut alpha = f64::INFINITY;
    for (vi, dvi) in v.iter().zip(dv.iter()) {
        if *dvi < 0.0 {
            alpha = alpha.min(-vi / dvi);
        }
    }
    alpha
}
