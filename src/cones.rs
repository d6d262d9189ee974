use crate::lifted::{LiftedLayout, LiftedVar};
use crate::network::Network;

/// Lifted variables of one branch that must lie in the rotated cone
/// `2 u_i u_j >= R_ij^2 + I_ij^2`, `u_i, u_j >= 0`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ConeTuple {
    /// Branch index.
    pub branch: usize,
    pub from: usize,
    pub to: usize,

    /// `(u_from, u_to, R, I)`.
    pub vars: [LiftedVar; 4],
}

impl ConeTuple {
    /// Columns of the members in the stacked `[u; R; I]` vector.
    pub fn cols(&self, lay: &LiftedLayout) -> [usize; 4] {
        self.vars.map(|v| lay.col(v))
    }
}

/// One cone tuple per branch, in branch order.
pub fn make_cones(net: &Network) -> Vec<ConeTuple> {
    net.branches()
        .iter()
        .enumerate()
        .map(|(k, br)| ConeTuple {
            branch: k,
            from: br.from,
            to: br.to,
            vars: [
                LiftedVar::U(br.from),
                LiftedVar::U(br.to),
                LiftedVar::R(k),
                LiftedVar::I(k),
            ],
        })
        .collect()
}
