use crate::balance::{make_balance, BalanceMatrices};
use crate::cones::make_cones;
use crate::lifted::{LiftedLayout, I_NAME, R_NAME, U_NAME};
use crate::network::Network;
use sparsetools::coo::Coo;
use sparsetools::csr::CSR;
use std::f64::consts::SQRT_2;

/// Domain of every component of a variable.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Domain {
    NonNegative,
    Unbounded,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarDecl {
    pub name: String,
    pub dim: usize,
    pub domain: Domain,
}

/// Named equality `a_mat * x = rhs` over the stacked variables.
pub struct LinearEq {
    pub name: String,
    pub a_mat: CSR<usize, f64>,
    pub rhs: Vec<f64>,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ConeKind {
    /// `(a, b, c, d)` with `a, b >= 0` and `2ab >= c^2 + d^2`.
    RotatedQuadratic,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ConeConstraint {
    pub name: String,
    pub kind: ConeKind,

    /// Stacked columns of the cone members.
    pub members: [usize; 4],
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Linear objective, as `(column, coefficient)` pairs.
#[derive(Debug, PartialEq, Clone)]
pub struct Objective {
    pub name: String,
    pub sense: Sense,
    pub coeffs: Vec<(usize, f64)>,
}

/// Conic program handed to a [`ConicSolver`](crate::ConicSolver).
///
/// Variables are stacked in declaration order, so column `j` of every
/// equality refers to the same scalar.
pub struct ConicProgram {
    pub vars: Vec<VarDecl>,
    pub equalities: Vec<LinearEq>,
    pub cones: Vec<ConeConstraint>,
    pub objective: Objective,
}

impl ConicProgram {
    /// Length of the stacked variable vector.
    pub fn n_cols(&self) -> usize {
        self.vars.iter().map(|v| v.dim).sum()
    }

    /// Total number of equality rows.
    pub fn n_eq(&self) -> usize {
        self.equalities.iter().map(|eq| eq.rhs.len()).sum()
    }

    /// First stacked column of each variable.
    pub fn offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.vars.len());
        let mut j = 0;
        for v in &self.vars {
            offsets.push(j);
            j += v.dim;
        }
        offsets
    }
}

/// Solver answer: one value vector per declared variable.
#[derive(Debug, PartialEq, Clone)]
pub struct ProgramSolution {
    pub values: Vec<Vec<f64>>,
    pub status: String,

    /// Objective value in the sense of the program.
    pub objective: f64,
    pub iterations: u32,
}

/// Assembles the Jabr relaxation of a radial network.
///
/// ```txt
/// max   sum(R)
/// s.t.  u_0 = vhat^2 / sqrt(2)
///       u_i = v_i^2 / sqrt(2)        for generator buses i != 0
///       A_real [u; R; I] = -Re(d)
///       A_reac [u; R; I] = -Im(d)
///       (u_i, u_j, R_ij, I_ij) in rotated cone for every branch
///       u >= 0, R >= 0
/// ```
pub fn make_program(net: &Network) -> ConicProgram {
    let nb = net.n_bus();
    let lay = LiftedLayout::new(nb);
    let nl = lay.n_branch();
    let ncols = lay.ncols();

    let vars = vec![
        VarDecl {
            name: U_NAME.to_string(),
            dim: nb,
            domain: Domain::NonNegative,
        },
        VarDecl {
            name: R_NAME.to_string(),
            dim: nl,
            domain: Domain::NonNegative,
        },
        VarDecl {
            name: I_NAME.to_string(),
            dim: nl,
            domain: Domain::Unbounded,
        },
    ];

    let mut equalities = Vec::with_capacity(4);

    let mut u0 = Coo::with_size(1, ncols);
    u0.push(0, lay.u(0), 1.0);
    equalities.push(LinearEq {
        name: "u0".to_string(),
        a_mat: u0.to_csr(),
        rhs: vec![net.vhat() * net.vhat() / SQRT_2],
    });

    let gens = net.gens();
    if !gens.is_empty() {
        let mut ugen = Coo::with_size(gens.len(), ncols);
        let mut rhs = Vec::with_capacity(gens.len());
        for (row, (&i, &v)) in gens.iter().enumerate() {
            ugen.push(row, lay.u(i), 1.0);
            rhs.push(v * v / SQRT_2);
        }
        equalities.push(LinearEq {
            name: "ugen".to_string(),
            a_mat: ugen.to_csr(),
            rhs,
        });
    }

    let BalanceMatrices {
        real,
        reac,
        real_rhs,
        reac_rhs,
        ..
    } = make_balance(net);
    if !real_rhs.is_empty() {
        equalities.push(LinearEq {
            name: "real".to_string(),
            a_mat: real,
            rhs: real_rhs,
        });
    }
    if !reac_rhs.is_empty() {
        equalities.push(LinearEq {
            name: "reac".to_string(),
            a_mat: reac,
            rhs: reac_rhs,
        });
    }

    let cones = make_cones(net)
        .iter()
        .map(|c| ConeConstraint {
            name: format!("cone_{}_{}", c.from, c.to),
            kind: ConeKind::RotatedQuadratic,
            members: c.cols(&lay),
        })
        .collect();

    let objective = Objective {
        name: "maxRsum".to_string(),
        sense: Sense::Maximize,
        coeffs: (0..nl).map(|k| (lay.r(k), 1.0)).collect(),
    };

    let program = ConicProgram {
        vars,
        equalities,
        cones,
        objective,
    };
    log::debug!(
        "program: {} columns, {} equality rows, {} cones",
        program.n_cols(),
        program.n_eq(),
        program.cones.len()
    );
    program
}
