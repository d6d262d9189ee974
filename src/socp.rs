use crate::error::{JabrError, Result};
use crate::opt::JabrOpt;
use crate::program::{ConeKind, ConicProgram, Domain, ProgramSolution, Sense};
use crate::traits::ConicSolver;
use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use std::f64::consts::FRAC_1_SQRT_2;

/// [`ConicSolver`] backed by the Clarabel interior point solver.
///
/// Clarabel solves
///
/// ```txt
/// min  1/2 x'Px + q'x
/// s.t. Ax + s = b,  s in K
/// ```
///
/// so every constraint is written as `s = b - Ax`. Equalities go to the
/// zero cone, variable bounds to the nonnegative cone and each rotated
/// cone `(a, b, c, d)` to the second-order cone over
/// `((a + b)/sqrt(2), (a - b)/sqrt(2), c, d)`.
#[derive(Default)]
pub struct ClarabelSolver {
    opt: JabrOpt,
}

impl ClarabelSolver {
    pub fn new(opt: JabrOpt) -> Self {
        Self { opt }
    }
}

/// Constraint rows accumulated per column.
struct Rows {
    cols: Vec<Vec<(usize, f64)>>,
    b: Vec<f64>,
}

impl Rows {
    fn new(n: usize) -> Self {
        Self {
            cols: vec![Vec::new(); n],
            b: Vec::new(),
        }
    }

    /// Appends a row and returns its index.
    fn row(&mut self, entries: &[(usize, f64)], b: f64) -> usize {
        let r = self.b.len();
        for &(j, v) in entries {
            self.cols[j].push((r, v));
        }
        self.b.push(b);
        r
    }

    fn m(&self) -> usize {
        self.b.len()
    }

    fn to_csc(&self) -> CscMatrix<f64> {
        let n = self.cols.len();
        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for col in &self.cols {
            // Rows are appended in increasing order.
            for &(r, v) in col {
                rowval.push(r);
                nzval.push(v);
            }
            colptr.push(rowval.len());
        }
        CscMatrix::new(self.m(), n, colptr, rowval, nzval)
    }
}

/// Rejects programs whose matrices or column references do not fit the
/// stacked variable vector.
fn check_shape(program: &ConicProgram, n: usize) -> Result<()> {
    for eq in &program.equalities {
        if eq.a_mat.rows() != eq.rhs.len() || eq.a_mat.cols() != n {
            return Err(JabrError::Solver(format!(
                "equality {}: {}x{} matrix with {} right-hand sides and {} columns",
                eq.name,
                eq.a_mat.rows(),
                eq.a_mat.cols(),
                eq.rhs.len(),
                n
            )));
        }
    }
    for c in &program.cones {
        if let Some(j) = c.members.iter().find(|&&j| j >= n) {
            return Err(JabrError::Solver(format!(
                "cone {}: column {} out of range",
                c.name, j
            )));
        }
    }
    if let Some(&(j, _)) = program.objective.coeffs.iter().find(|&&(j, _)| j >= n) {
        return Err(JabrError::Solver(format!(
            "objective {}: column {} out of range",
            program.objective.name, j
        )));
    }
    Ok(())
}

impl ConicSolver for ClarabelSolver {
    fn solve(&self, program: &ConicProgram) -> Result<ProgramSolution> {
        let n = program.n_cols();
        check_shape(program, n)?;
        let mut rows = Rows::new(n);
        let mut cones = Vec::new();

        for eq in &program.equalities {
            let (rowptr, colidx, values) = (eq.a_mat.rowptr(), eq.a_mat.colidx(), eq.a_mat.values());
            for (r, &b) in eq.rhs.iter().enumerate() {
                let entries: Vec<(usize, f64)> = (rowptr[r]..rowptr[r + 1])
                    .map(|k| (colidx[k], values[k]))
                    .collect();
                rows.row(&entries, b);
            }
        }
        if program.n_eq() > 0 {
            cones.push(SupportedConeT::ZeroConeT(program.n_eq()));
        }

        let mut n_nonneg = 0;
        for (v, offset) in program.vars.iter().zip(program.offsets()) {
            if v.domain == Domain::NonNegative {
                for j in offset..offset + v.dim {
                    rows.row(&[(j, -1.0)], 0.0);
                }
                n_nonneg += v.dim;
            }
        }
        if n_nonneg > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(n_nonneg));
        }

        for c in &program.cones {
            match c.kind {
                ConeKind::RotatedQuadratic => {
                    let [a, b, x, y] = c.members;
                    let h = FRAC_1_SQRT_2;
                    rows.row(&[(a, -h), (b, -h)], 0.0);
                    rows.row(&[(a, -h), (b, h)], 0.0);
                    rows.row(&[(x, -1.0)], 0.0);
                    rows.row(&[(y, -1.0)], 0.0);
                    cones.push(SupportedConeT::SecondOrderConeT(4));
                }
            }
        }

        let sign = match program.objective.sense {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        };
        let mut q = vec![0.0; n];
        for &(j, c) in &program.objective.coeffs {
            q[j] += sign * c;
        }

        let a_mat = rows.to_csc();
        a_mat
            .check_format()
            .map_err(|e| JabrError::Solver(format!("constraint matrix: {:?}", e)))?;
        let p_mat = CscMatrix::<f64>::spalloc((n, n), 0);

        let settings = DefaultSettingsBuilder::default()
            .max_iter(self.opt.max_iter)
            .time_limit(self.opt.time_limit)
            .verbose(self.opt.verbose)
            .tol_feas(self.opt.tol_feas)
            .tol_gap_abs(self.opt.tol_gap_abs)
            .tol_gap_rel(self.opt.tol_gap_rel)
            .build()
            .map_err(|e| JabrError::Solver(format!("settings: {:?}", e)))?;

        log::debug!(
            "clarabel: {} variables, {} constraint rows, {} nonzeros",
            n,
            rows.m(),
            a_mat.nnz()
        );

        let mut solver = DefaultSolver::new(&p_mat, &q, &a_mat, &rows.b, &cones, settings)
            .map_err(|e| JabrError::Solver(format!("setup: {:?}", e)))?;
        solver.solve();
        let sol = solver.solution;

        match sol.status {
            SolverStatus::Solved => {}
            SolverStatus::AlmostSolved => {
                log::warn!("clarabel: solved to reduced accuracy");
            }
            status => return Err(JabrError::SolverNonConvergence(status.to_string())),
        }
        log::info!(
            "clarabel: {} in {} iterations",
            sol.status,
            sol.iterations
        );

        let objective = program
            .objective
            .coeffs
            .iter()
            .map(|&(j, c)| c * sol.x[j])
            .sum();
        let values = program
            .vars
            .iter()
            .zip(program.offsets())
            .map(|(v, offset)| sol.x[offset..offset + v.dim].to_vec())
            .collect();

        Ok(ProgramSolution {
            values,
            status: sol.status.to_string(),
            objective,
            iterations: sol.iterations,
        })
    }
}
