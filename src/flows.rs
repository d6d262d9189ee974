use crate::network::Network;
use crate::recover::Voltages;
use num_complex::Complex64;

/// Complex power flow at both ends of a branch (p.u.).
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BranchFlow {
    pub from: usize,
    pub to: usize,

    /// Power leaving `from` into the branch.
    pub s_ft: Complex64,
    /// Power leaving `to` into the branch.
    pub s_tf: Complex64,
}

impl BranchFlow {
    /// Series losses, `s_ft + s_tf`.
    pub fn loss(&self) -> Complex64 {
        self.s_ft + self.s_tf
    }
}

/// Computes branch flows from bus voltages:
///
/// ```txt
/// S_ft = V_f * conj(y * (V_f - V_t))
/// S_tf = V_t * conj(y * (V_t - V_f))
/// ```
pub fn branch_flows(net: &Network, v: &Voltages) -> Vec<BranchFlow> {
    let v = v.to_complex();
    net.branches()
        .iter()
        .map(|br| {
            let (vf, vt) = (v[br.from], v[br.to]);
            let i_ft = br.y() * (vf - vt);
            BranchFlow {
                from: br.from,
                to: br.to,
                s_ft: vf * i_ft.conj(),
                s_tf: -vt * i_ft.conj(),
            }
        })
        .collect()
}

/// Total series losses.
pub fn total_loss(flows: &[BranchFlow]) -> Complex64 {
    flows.iter().map(|f| f.loss()).sum()
}
