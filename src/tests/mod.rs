use crate::case::CaseData;
use num_complex::Complex64;
use sparsetools::csr::CSR;

/// Uniform branch impedance of the 5 bus test cases.
pub(crate) const R5: f64 = 0.01;
pub(crate) const X5: f64 = 0.1;

/// Admittances of the 14 bus tree, internal numbering `(f, t, g, b)`.
pub(crate) const CASE14_Y: [(usize, usize, f64, f64); 13] = [
    (0, 1, 499.9131600798035, -1526.3086523179554),
    (0, 4, 102.58974549701888, -423.4983682334831),
    (1, 2, 113.50191923073959, -478.1863151757718),
    (3, 4, 684.0980661495671, -2157.855398169159),
    (3, 6, 0.0, -478.1943381790359),
    (4, 5, 0.0, -396.79390524561546),
    (5, 10, 195.50285631772607, -409.4074344240442),
    (5, 11, 152.59674404509738, -317.5963965029401),
    (5, 12, 309.89274038379875, -610.2755448193116),
    (6, 7, 0.0, -567.6979846721543),
    (6, 8, 0.0, -909.0082719752751),
    (8, 9, 390.2049552447428, -1036.5394127060915),
    (8, 13, 142.4005487019931, -302.90504569306034),
];

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Root bus 0 at 1 p.u. feeding a unit load at bus 1.
pub(crate) fn two_bus() -> CaseData {
    CaseData::new(0, 1.0)
        .bus(0, Complex64::new(0.0, 0.0))
        .bus(1, Complex64::new(1.0, 0.0))
        .branch(0, 1, 0.02, 0.2)
}

/// Star-like tree: 0-1, 0-2, 2-3, 2-4 with unit loads at buses 1 to 4.
pub(crate) fn star5() -> CaseData {
    let mut case = CaseData::new(0, 1.0).bus(0, Complex64::new(0.0, 0.0));
    for i in 1..5 {
        case = case.bus(i, Complex64::new(1.0, 0.0));
    }
    case.branch(0, 1, R5, X5)
        .branch(0, 2, R5, X5)
        .branch(2, 3, R5, X5)
        .branch(2, 4, R5, X5)
}

/// Five bus tree with root bus 5, renumbered internally to
/// branches (0, 2), (0, 3), (1, 3), (3, 4).
pub(crate) fn case5_tree() -> CaseData {
    CaseData::new(5, 1.0)
        .bus(1, Complex64::new(1.0, 0.0))
        .bus(2, Complex64::new(1.0, 0.0))
        .bus(3, Complex64::new(1.0, 0.0))
        .bus(4, Complex64::new(1.0, 0.0))
        .bus(5, Complex64::new(0.0, 0.0))
        .gen(5, 4.1590465, 1.0)
        .branch(5, 2, R5, X5)
        .branch(3, 5, R5, X5)
        .branch(1, 3, R5, X5)
        .branch(3, 4, R5, X5)
}

/// Tree version of the IEEE 14 bus case (demands in MW/MVAr, not per-unit).
pub(crate) fn case14() -> CaseData {
    let demands = [
        (0.0, 0.0),
        (21.7, 12.7),
        (94.2, 19.0),
        (47.8, -3.9),
        (7.6, 1.6),
        (11.2, 7.5),
        (0.0, 0.0),
        (0.0, 0.0),
        (29.5, 16.6),
        (9.0, 5.8),
        (3.5, 1.8),
        (6.1, 1.6),
        (13.5, 5.8),
        (14.9, 5.0),
    ];
    let mut case = CaseData::new(1, 1.06);
    for (i, (pd, qd)) in demands.iter().enumerate() {
        case = case.bus(i + 1, Complex64::new(*pd, *qd));
    }
    case = case
        .gen(1, 238.679924, 1.06)
        .gen(2, 40.0, 1.045)
        .gen(3, 0.0, 1.01)
        .gen(6, 0.0, 1.07)
        .gen(8, 0.0, 1.09);
    for (f, t, g, b) in CASE14_Y {
        let z = Complex64::new(1.0, 0.0) / Complex64::new(g, b);
        case = case.branch(f + 1, t + 1, z.re, z.im);
    }
    case
}

/// Expands a sparse matrix into rows of dense values.
pub(crate) fn dense(a: &CSR<usize, f64>) -> Vec<Vec<f64>> {
    let mut d = vec![vec![0.0; a.cols()]; a.rows()];
    let (rowptr, colidx, values) = (a.rowptr(), a.colidx(), a.values());
    for r in 0..a.rows() {
        for k in rowptr[r]..rowptr[r + 1] {
            d[r][colidx[k]] += values[k];
        }
    }
    d
}
