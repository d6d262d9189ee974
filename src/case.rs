use crate::error::{JabrError, Result};
use caseformat::{Branch, Bus, Gen};
use num_complex::Complex64;
use std::collections::BTreeMap;

/// Generator set-point: fixed active power output and voltage magnitude.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct GenSetpoint {
    /// Active power output (p.u.).
    pub p: f64,

    /// Voltage magnitude set-point (p.u.).
    pub v: f64,
}

/// Series impedance of a line between two buses (external numbering).
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BranchData {
    /// From bus number.
    pub from: usize,

    /// To bus number.
    pub to: usize,

    /// Resistance (p.u.).
    pub r: f64,

    /// Reactance (p.u.).
    pub x: f64,
}

/// Raw case data in external bus numbering, as read from a case description.
///
/// This is the input contract of [`Network::new`](crate::Network::new). Nothing
/// here is validated; all topology checks happen when the network is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseData {
    /// Complex power demand per bus number (p.u.). Every bus of the network
    /// must appear here, even with zero demand.
    pub demands: BTreeMap<usize, Complex64>,

    /// Bus number of the root (slack) bus.
    pub root: usize,

    /// Voltage magnitude of the root bus (p.u.).
    pub vhat: f64,

    /// Generators keyed by bus number.
    pub gens: BTreeMap<usize, GenSetpoint>,

    pub branches: Vec<BranchData>,
}

impl CaseData {
    pub fn new(root: usize, vhat: f64) -> Self {
        Self {
            root,
            vhat,
            ..Default::default()
        }
    }

    pub fn bus(mut self, i: usize, demand: Complex64) -> Self {
        self.demands.insert(i, demand);
        self
    }

    pub fn gen(mut self, i: usize, p: f64, v: f64) -> Self {
        self.gens.insert(i, GenSetpoint { p, v });
        self
    }

    pub fn branch(mut self, from: usize, to: usize, r: f64, x: f64) -> Self {
        self.branches.push(BranchData { from, to, r, x });
        self
    }

    /// Reads case data from MATPOWER bus, generator and branch records.
    ///
    /// The reference bus becomes the root, with its `VM` as root voltage.
    /// Demands and generator outputs are converted to per-unit on `base_mva`.
    /// Out-of-service generators and branches are skipped. Where several
    /// generators share a bus their outputs are summed and the voltage
    /// set-point of the first one is kept.
    pub fn from_matpower(
        base_mva: f64,
        bus: &[Bus],
        gen: &[Gen],
        branch: &[Branch],
    ) -> Result<Self> {
        let ref_bus = bus
            .iter()
            .find(|b| b.is_ref())
            .ok_or_else(|| JabrError::Structural("no reference bus".to_string()))?;
        let mut case = CaseData::new(ref_bus.bus_i, ref_bus.vm);

        for b in bus {
            case.demands
                .insert(b.bus_i, Complex64::new(b.pd, b.qd) / base_mva);
        }
        for g in gen.iter().filter(|g| g.is_on()) {
            let sp = case.gens.entry(g.gen_bus).or_insert(GenSetpoint {
                p: 0.0,
                v: g.vg,
            });
            sp.p += g.pg / base_mva;
        }
        for br in branch.iter().filter(|br| br.is_on()) {
            case.branches.push(BranchData {
                from: br.f_bus,
                to: br.t_bus,
                r: br.br_r,
                x: br.br_x,
            });
        }
        log::debug!(
            "case: {} buses, {} gens, {} branches, root {}",
            case.demands.len(),
            case.gens.len(),
            case.branches.len(),
            case.root
        );
        Ok(case)
    }
}
