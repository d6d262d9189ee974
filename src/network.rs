use crate::admittance::z2y;
use crate::case::CaseData;
use crate::error::{JabrError, Result};
use crate::order::BusOrder;
use num_complex::Complex64;
use sparsetools::coo::Coo;
use sparsetools::csr::CSR;
use std::collections::{BTreeMap, HashMap};

/// Sign of a branch cross term seen from `bus` towards `other`.
///
/// `I` is defined for the canonical orientation of a branch (smaller bus
/// first). Referenced from the "from" end it enters with -1, from the "to"
/// end with +1.
pub fn orientation_sign(bus: usize, other: usize) -> f64 {
    if bus < other {
        -1.0
    } else {
        1.0
    }
}

/// Branch with canonical orientation, `from < to` (internal numbering).
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct NetBranch {
    pub from: usize,
    pub to: usize,

    /// Series conductance (p.u.).
    pub g: f64,

    /// Series susceptance (p.u.).
    pub b: f64,
}

impl NetBranch {
    /// Series admittance `g + jb`.
    pub fn y(&self) -> Complex64 {
        Complex64::new(self.g, self.b)
    }
}

/// Radial network in internal bus numbering, with bus 0 as root.
///
/// Built once from [`CaseData`] and never modified afterwards.
pub struct Network {
    order: BusOrder,
    demands: Vec<Complex64>,
    vhat: f64,
    gens: BTreeMap<usize, f64>,
    branches: Vec<NetBranch>,
    branch_map: HashMap<(usize, usize), usize>,
    g_mat: CSR<usize, f64>,
    b_mat: CSR<usize, f64>,
}

impl Network {
    /// Builds the network model from raw case data.
    ///
    /// Buses are renumbered with the root first, generator active power is
    /// subtracted from the demand at every non-root generator bus, and the
    /// branches are sorted by `(min(f, t), max(f, t))`. Fails unless there
    /// are exactly `n - 1` distinct branches without self loops.
    pub fn new(case: &CaseData) -> Result<Self> {
        let order = BusOrder::new(&case.demands, case.root)?;
        let nb = order.len();
        let nl = case.branches.len();

        if nl + 1 != nb {
            return Err(JabrError::Structural(format!(
                "{} branches for {} buses, expected {}",
                nl,
                nb,
                nb - 1
            )));
        }

        let mut demands = vec![Complex64::default(); nb];
        for (&e, &d) in case.demands.iter() {
            demands[order.internal(e)?] = d;
        }

        // The root injection is the slack, so only non-root generators
        // offset demand and fix a voltage.
        let mut gens = BTreeMap::new();
        for (&e, sp) in case.gens.iter() {
            let i = order.internal(e)?;
            if i == 0 {
                continue;
            }
            demands[i].re -= sp.p;
            gens.insert(i, sp.v);
        }

        let mut branches = Vec::with_capacity(nl);
        for br in &case.branches {
            let f = order.internal(br.from)?;
            let t = order.internal(br.to)?;
            if f == t {
                return Err(JabrError::Structural(format!(
                    "branch ({}, {}) is a self loop",
                    br.from, br.to
                )));
            }
            let (g, b) = z2y(br.r, br.x).map_err(|reason| JabrError::Domain {
                from: br.from,
                to: br.to,
                reason,
            })?;
            branches.push(NetBranch {
                from: f.min(t),
                to: f.max(t),
                g,
                b,
            });
        }
        branches.sort_by_key(|br| (br.from, br.to));

        let mut branch_map = HashMap::with_capacity(2 * nl);
        for (k, br) in branches.iter().enumerate() {
            if branch_map.insert((br.from, br.to), k).is_some() {
                return Err(JabrError::Structural(format!(
                    "parallel branches between buses {} and {}",
                    order.external(br.from),
                    order.external(br.to)
                )));
            }
            branch_map.insert((br.to, br.from), k);
        }

        let mut g_mat = Coo::with_size(nb, nb);
        let mut b_mat = Coo::with_size(nb, nb);
        for br in &branches {
            g_mat.push(br.from, br.to, br.g);
            g_mat.push(br.to, br.from, br.g);
            b_mat.push(br.from, br.to, br.b);
            b_mat.push(br.to, br.from, br.b);
        }

        log::debug!(
            "network: {} buses, {} branches, {} generator buses",
            nb,
            nl,
            gens.len()
        );

        Ok(Self {
            order,
            demands,
            vhat: case.vhat,
            gens,
            branches,
            branch_map,
            g_mat: g_mat.to_csr(),
            b_mat: b_mat.to_csr(),
        })
    }

    pub fn n_bus(&self) -> usize {
        self.demands.len()
    }

    pub fn n_branch(&self) -> usize {
        self.branches.len()
    }

    /// Generator adjusted demand per bus.
    pub fn demands(&self) -> &[Complex64] {
        &self.demands
    }

    /// Root voltage magnitude.
    pub fn vhat(&self) -> f64 {
        self.vhat
    }

    /// Voltage set-points of the non-root generator buses.
    pub fn gens(&self) -> &BTreeMap<usize, f64> {
        &self.gens
    }

    pub fn is_gen(&self, i: usize) -> bool {
        self.gens.contains_key(&i)
    }

    pub fn branches(&self) -> &[NetBranch] {
        &self.branches
    }

    /// Index of the branch between buses `i` and `j`, in either order.
    pub fn branch_index(&self, i: usize, j: usize) -> Option<usize> {
        self.branch_map.get(&(i, j)).copied()
    }

    pub fn branch_map(&self) -> &HashMap<(usize, usize), usize> {
        &self.branch_map
    }

    /// Symmetric branch conductance matrix.
    pub fn g_mat(&self) -> &CSR<usize, f64> {
        &self.g_mat
    }

    /// Symmetric branch susceptance matrix.
    pub fn b_mat(&self) -> &CSR<usize, f64> {
        &self.b_mat
    }

    pub fn order(&self) -> &BusOrder {
        &self.order
    }

    /// Neighbours of every bus as `(bus, branch index)` pairs, listed in
    /// both directions regardless of branch orientation.
    pub fn adjacency(&self) -> Vec<Vec<(usize, usize)>> {
        let mut adj = vec![Vec::new(); self.n_bus()];
        for (k, br) in self.branches.iter().enumerate() {
            adj[br.from].push((br.to, k));
            adj[br.to].push((br.from, k));
        }
        adj
    }
}
