use crate::error::{JabrError, Result};
use crate::network::Network;
use crate::program::{ConicProgram, ProgramSolution};
use sparsetools::csr::CSR;

/// Names of the lifted variable blocks, in stacking order.
pub const U_NAME: &str = "u";
pub const R_NAME: &str = "R";
pub const I_NAME: &str = "I";

/// Component of the stacked lifted vector `[u; R; I]`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum LiftedVar {
    /// `u_i`, squared voltage magnitude of bus `i` over `sqrt(2)`.
    U(usize),
    /// `R_k`, cosine cross term of branch `k`.
    R(usize),
    /// `I_k`, sine cross term of branch `k`.
    I(usize),
}

/// Column layout of `[u; R; I]` for a tree of `n` buses: `n` columns for
/// `u` followed by `n - 1` each for `R` and `I`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct LiftedLayout {
    n_bus: usize,
}

impl LiftedLayout {
    pub fn new(n_bus: usize) -> Self {
        Self { n_bus }
    }

    pub fn n_bus(&self) -> usize {
        self.n_bus
    }

    pub fn n_branch(&self) -> usize {
        self.n_bus.saturating_sub(1)
    }

    pub fn ncols(&self) -> usize {
        self.n_bus + 2 * self.n_branch()
    }

    pub fn u(&self, i: usize) -> usize {
        i
    }

    pub fn r(&self, k: usize) -> usize {
        self.n_bus + k
    }

    pub fn im(&self, k: usize) -> usize {
        self.n_bus + self.n_branch() + k
    }

    pub fn col(&self, var: LiftedVar) -> usize {
        match var {
            LiftedVar::U(i) => self.u(i),
            LiftedVar::R(k) => self.r(k),
            LiftedVar::I(k) => self.im(k),
        }
    }
}

/// Solved lifted variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftedSolution {
    pub u: Vec<f64>,
    pub r: Vec<f64>,
    pub i: Vec<f64>,
}

impl LiftedSolution {
    /// Splits a solver answer into its `u`, `R` and `I` blocks.
    pub fn from_program(program: &ConicProgram, solution: &ProgramSolution) -> Result<Self> {
        if solution.values.len() != program.vars.len() {
            return Err(JabrError::Solver(format!(
                "{} value vectors for {} variables",
                solution.values.len(),
                program.vars.len()
            )));
        }
        let block = |name: &str| -> Result<Vec<f64>> {
            let k = program
                .vars
                .iter()
                .position(|v| v.name == name)
                .ok_or_else(|| JabrError::Solver(format!("no variable named {}", name)))?;
            let values = &solution.values[k];
            if values.len() != program.vars[k].dim {
                return Err(JabrError::Solver(format!(
                    "variable {}: {} values, expected {}",
                    name,
                    values.len(),
                    program.vars[k].dim
                )));
            }
            Ok(values.clone())
        };
        Ok(Self {
            u: block(U_NAME)?,
            r: block(R_NAME)?,
            i: block(I_NAME)?,
        })
    }

    /// Stacked vector `[u; R; I]`.
    pub fn stacked(&self) -> Vec<f64> {
        let mut x = Vec::with_capacity(self.u.len() + self.r.len() + self.i.len());
        x.extend_from_slice(&self.u);
        x.extend_from_slice(&self.r);
        x.extend_from_slice(&self.i);
        x
    }

    /// Largest absolute residual `|A x - rhs|` over every equality of the
    /// program.
    pub fn balance_mismatch(&self, program: &ConicProgram) -> f64 {
        let x = self.stacked();
        program
            .equalities
            .iter()
            .flat_map(|eq| {
                mul_vec(&eq.a_mat, &x)
                    .into_iter()
                    .zip(eq.rhs.iter())
                    .map(|(ax, b)| (ax - b).abs())
                    .collect::<Vec<f64>>()
            })
            .fold(0.0, f64::max)
    }

    /// Per branch slack `2 u_i u_j - R^2 - I^2` of the rotated cone.
    ///
    /// The relaxation is tight where this is zero and infeasible where it
    /// is negative.
    pub fn cone_slack(&self, net: &Network) -> Result<Vec<f64>> {
        self.check_dims(net)?;
        Ok(net
            .branches()
            .iter()
            .enumerate()
            .map(|(k, br)| {
                2.0 * self.u[br.from] * self.u[br.to] - self.r[k] * self.r[k] - self.i[k] * self.i[k]
            })
            .collect())
    }

    /// True if every branch satisfies its cone to within `tol`.
    pub fn is_cone_feasible(&self, net: &Network, tol: f64) -> bool {
        match self.cone_slack(net) {
            Ok(slack) => slack.iter().all(|&s| s >= -tol),
            Err(_) => false,
        }
    }

    /// Fails unless there is one `u` per bus and one `R` and `I` per branch
    /// of `net`.
    pub fn check_dims(&self, net: &Network) -> Result<()> {
        let (nb, nl) = (net.n_bus(), net.n_branch());
        if self.u.len() != nb || self.r.len() != nl || self.i.len() != nl {
            return Err(JabrError::Solver(format!(
                "lifted solution has {} u, {} R and {} I values for {} buses and {} branches",
                self.u.len(),
                self.r.len(),
                self.i.len(),
                nb,
                nl
            )));
        }
        Ok(())
    }
}

fn mul_vec(a: &CSR<usize, f64>, x: &[f64]) -> Vec<f64> {
    let (rowptr, colidx, values) = (a.rowptr(), a.colidx(), a.values());
    (0..a.rows())
        .map(|r| {
            (rowptr[r]..rowptr[r + 1])
                .map(|k| values[k] * x[colidx[k]])
                .sum()
        })
        .collect()
}
