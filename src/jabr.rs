use crate::case::CaseData;
use crate::debug::{format_f64_vec, format_flows, format_rect_vec, format_voltages};
use crate::error::Result;
use crate::flows::{branch_flows, total_loss, BranchFlow};
use crate::lifted::LiftedSolution;
use crate::network::Network;
use crate::opt::JabrOpt;
use crate::program::make_program;
use crate::recover::{recover, Voltages};
use crate::traits::ConicSolver;
use num_complex::Complex64;

/// Outcome of a relaxed power flow solve.
pub struct JabrResult {
    pub network: Network,
    pub lifted: LiftedSolution,
    pub voltages: Voltages,
    pub flows: Vec<BranchFlow>,

    /// Solver status string.
    pub status: String,
    pub iterations: u32,

    /// Optimal `sum(R)`.
    pub objective: f64,

    /// Largest equality residual of the lifted solution.
    pub mismatch: f64,
    /// Per branch cone slack `2 u_i u_j - R^2 - I^2`.
    pub cone_slack: Vec<f64>,
}

impl JabrResult {
    pub fn loss(&self) -> Complex64 {
        total_loss(&self.flows)
    }

    /// `(magnitude, angle in degrees)` keyed by external bus number.
    pub fn bus_voltages(&self) -> std::collections::BTreeMap<usize, (f64, f64)> {
        self.voltages.to_external(self.network.order())
    }
}

/// Builds the network, solves its Jabr relaxation and recovers the bus
/// voltages.
pub fn run_jabr(case: &CaseData, solver: &impl ConicSolver, opt: &JabrOpt) -> Result<JabrResult> {
    let network = Network::new(case)?;
    log::debug!("adjusted demand = {}", format_rect_vec(network.demands()));
    let program = make_program(&network);

    let sol = solver.solve(&program)?;
    let lifted = LiftedSolution::from_program(&program, &sol)?;
    log::debug!("u = {}", format_f64_vec(&lifted.u));
    log::debug!("R = {}", format_f64_vec(&lifted.r));
    log::debug!("I = {}", format_f64_vec(&lifted.i));

    let mismatch = lifted.balance_mismatch(&program);
    let cone_slack = lifted.cone_slack(&network)?;
    if cone_slack.iter().any(|&s| s < -opt.cone_tol) {
        log::warn!(
            "lifted solution violates cone constraints: {}",
            format_f64_vec(&cone_slack)
        );
    } else if cone_slack.iter().any(|&s| s > opt.cone_tol) {
        log::warn!("relaxation is not tight: {}", format_f64_vec(&cone_slack));
    }

    let voltages = recover(&network, &lifted, opt.angle_tol)?;
    let flows = branch_flows(&network, &voltages);
    log::debug!("V = {}", format_voltages(&voltages));
    log::trace!("flows = {}", format_flows(&flows));

    log::info!(
        "jabr: {} after {} iterations, sum(R) = {}, max mismatch = {:e}",
        sol.status,
        sol.iterations,
        sol.objective,
        mismatch
    );

    Ok(JabrResult {
        network,
        lifted,
        voltages,
        flows,
        status: sol.status,
        iterations: sol.iterations,
        objective: sol.objective,
        mismatch,
        cone_slack,
    })
}
