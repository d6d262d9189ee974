use derive_builder::Builder;

/// Options of a relaxed power flow solve.
#[derive(Debug, PartialEq, Clone, Builder)]
#[builder(default)]
pub struct JabrOpt {
    /// Maximum number of solver iterations. Default value is 200.
    pub max_iter: u32,

    /// Solver time limit in seconds. Unlimited by default.
    pub time_limit: f64,

    /// Print solver progress.
    pub verbose: bool,

    // Solver termination tolerances. Default values are 1e-8.
    pub tol_feas: f64,
    pub tol_gap_abs: f64,
    pub tol_gap_rel: f64,

    /// Branch sine ratios `|I/(Vi*Vj)|` up to `1 + angle_tol` are clamped
    /// to 1 before taking the arcsine.
    pub angle_tol: f64,

    /// Tolerance on negative cone slack when checking a solution.
    pub cone_tol: f64,
}

impl Default for JabrOpt {
    fn default() -> Self {
        Self {
            max_iter: 200,
            time_limit: f64::INFINITY,
            verbose: false,
            tol_feas: 1e-8,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
            angle_tol: 1e-9,
            cone_tol: 1e-6,
        }
    }
}
