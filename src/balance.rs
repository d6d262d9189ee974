use crate::lifted::LiftedLayout;
use crate::network::{orientation_sign, Network};
use sparsetools::coo::Coo;
use sparsetools::csr::CSR;
use std::f64::consts::SQRT_2;

/// Real and reactive power balance equations over `[u; R; I]`.
///
/// `real * x = real_rhs` and `reac * x = reac_rhs`, where each row gives the
/// power injected into the network at one non-root bus.
pub struct BalanceMatrices {
    pub real: CSR<usize, f64>,
    pub reac: CSR<usize, f64>,

    /// Bus of each row of `real`.
    pub real_buses: Vec<usize>,
    /// Bus of each row of `reac`. Generator buses have no reactive row.
    pub reac_buses: Vec<usize>,

    /// Negated real demand of each row bus.
    pub real_rhs: Vec<f64>,
    /// Negated reactive demand of each row bus.
    pub reac_rhs: Vec<f64>,
}

/// Builds the power balance matrices of a radial network.
///
/// Row `i - 1` of the real system belongs to bus `i`. For every branch
/// `(i, k)` incident to `i`:
///
/// ```txt
///          u_i          R_ik    I_ik
/// real   sqrt(2)*g     -g      s*b
/// reac  -sqrt(2)*b      b      s*g
/// ```
///
/// with `s = orientation_sign(i, k)`; the `u_i` entries are summed over
/// all neighbours. Non-root generator buses get no reactive row.
pub fn make_balance(net: &Network) -> BalanceMatrices {
    let nb = net.n_bus();
    let lay = LiftedLayout::new(nb);
    let adj = net.adjacency();
    let branches = net.branches();

    let n_reac = (1..nb).filter(|&i| !net.is_gen(i)).count();
    let mut real = Coo::with_size(nb - 1, lay.ncols());
    let mut reac = Coo::with_size(n_reac, lay.ncols());

    let mut real_buses = Vec::with_capacity(nb - 1);
    let mut reac_buses = Vec::with_capacity(n_reac);
    let mut real_rhs = Vec::with_capacity(nb - 1);
    let mut reac_rhs = Vec::with_capacity(n_reac);

    for i in 1..nb {
        let row = i - 1;
        let q_row = if net.is_gen(i) {
            None
        } else {
            Some(reac_buses.len())
        };

        let (mut g_sum, mut b_sum) = (0.0, 0.0);
        for &(k, l) in &adj[i] {
            let br = &branches[l];
            let s = orientation_sign(i, k);
            g_sum += br.g;
            b_sum += br.b;

            real.push(row, lay.r(l), -br.g);
            real.push(row, lay.im(l), s * br.b);
            if let Some(q) = q_row {
                reac.push(q, lay.r(l), br.b);
                reac.push(q, lay.im(l), s * br.g);
            }
        }
        real.push(row, lay.u(i), SQRT_2 * g_sum);
        real_buses.push(i);
        real_rhs.push(-net.demands()[i].re);

        if let Some(q) = q_row {
            reac.push(q, lay.u(i), -SQRT_2 * b_sum);
            reac_buses.push(i);
            reac_rhs.push(-net.demands()[i].im);
        }
        log::trace!(
            "balance row {}: degree {}, g_sum {}, b_sum {}",
            i,
            adj[i].len(),
            g_sum,
            b_sum
        );
    }

    BalanceMatrices {
        real: real.to_csr(),
        reac: reac.to_csr(),
        real_buses,
        reac_buses,
        real_rhs,
        reac_rhs,
    }
}

#[cfg(test)]
mod tests {
    use super::make_balance;
    use crate::admittance::z2y;
    use crate::network::Network;
    use crate::tests::{case14, case5_tree, dense, init_logger, star5, R5, X5};
    use anyhow::{format_err, Result};
    use std::f64::consts::SQRT_2;

    fn assert_rows_eq(name: &str, expected: &[Vec<f64>], actual: &[Vec<f64>]) -> Result<()> {
        if expected.len() != actual.len() {
            return Err(format_err!(
                "{}: expected {} rows, got {}",
                name,
                expected.len(),
                actual.len()
            ));
        }
        for (r, (e, a)) in expected.iter().zip(actual).enumerate() {
            if e.len() != a.len() {
                return Err(format_err!("{} row {}: column count {}", name, r, a.len()));
            }
            for (c, (e, a)) in e.iter().zip(a).enumerate() {
                if (e - a).abs() > 1e-9 {
                    return Err(format_err!(
                        "{} ({}, {}): expected {} got {}",
                        name,
                        r,
                        c,
                        e,
                        a
                    ));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_balance_star5() -> Result<()> {
        init_logger();
        let net = Network::new(&star5())?;
        let bal = make_balance(&net);
        let (g, b) = z2y(R5, X5).unwrap();
        let r2 = SQRT_2;

        // Columns: u0..u4, R0..R3, I0..I3 for branches
        // (0,1), (0,2), (2,3), (2,4).
        #[rustfmt::skip]
        let real = vec![
            vec![0.0, r2 * g, 0.0, 0.0, 0.0,        -g, 0.0, 0.0, 0.0,   b, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 3.0 * r2 * g, 0.0, 0.0,  0.0, -g, -g, -g,     0.0, b, -b, -b],
            vec![0.0, 0.0, 0.0, r2 * g, 0.0,        0.0, 0.0, -g, 0.0,   0.0, 0.0, b, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, r2 * g,        0.0, 0.0, 0.0, -g,   0.0, 0.0, 0.0, b],
        ];
        #[rustfmt::skip]
        let reac = vec![
            vec![0.0, -r2 * b, 0.0, 0.0, 0.0,        b, 0.0, 0.0, 0.0,   g, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, -3.0 * r2 * b, 0.0, 0.0,  0.0, b, b, b,       0.0, g, -g, -g],
            vec![0.0, 0.0, 0.0, -r2 * b, 0.0,        0.0, 0.0, b, 0.0,   0.0, 0.0, g, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, -r2 * b,        0.0, 0.0, 0.0, b,   0.0, 0.0, 0.0, g],
        ];
        assert_rows_eq("real", &real, &dense(&bal.real))?;
        assert_rows_eq("reac", &reac, &dense(&bal.reac))?;

        assert_eq!(bal.real_buses, vec![1, 2, 3, 4]);
        assert_eq!(bal.reac_buses, vec![1, 2, 3, 4]);
        assert_eq!(bal.real_rhs, vec![-1.0; 4]);
        assert_eq!(bal.reac_rhs, vec![0.0; 4]);
        Ok(())
    }

    #[test]
    fn test_balance_case5_tree() -> Result<()> {
        let net = Network::new(&case5_tree())?;
        let bal = make_balance(&net);
        let (g, b) = z2y(R5, X5).unwrap();
        let r2 = SQRT_2;

        // Branches (0,2), (0,3), (1,3), (3,4).
        #[rustfmt::skip]
        let real = vec![
            vec![0.0, r2 * g, 0.0, 0.0, 0.0,        0.0, 0.0, -g, 0.0,   0.0, 0.0, -b, 0.0],
            vec![0.0, 0.0, r2 * g, 0.0, 0.0,        -g, 0.0, 0.0, 0.0,   b, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 3.0 * r2 * g, 0.0,  0.0, -g, -g, -g,     0.0, b, b, -b],
            vec![0.0, 0.0, 0.0, 0.0, r2 * g,        0.0, 0.0, 0.0, -g,   0.0, 0.0, 0.0, b],
        ];
        #[rustfmt::skip]
        let reac = vec![
            vec![0.0, -r2 * b, 0.0, 0.0, 0.0,        0.0, 0.0, b, 0.0,   0.0, 0.0, -g, 0.0],
            vec![0.0, 0.0, -r2 * b, 0.0, 0.0,        b, 0.0, 0.0, 0.0,   g, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, -3.0 * r2 * b, 0.0,  0.0, b, b, b,       0.0, g, g, -g],
            vec![0.0, 0.0, 0.0, 0.0, -r2 * b,        0.0, 0.0, 0.0, b,   0.0, 0.0, 0.0, g],
        ];
        assert_rows_eq("real", &real, &dense(&bal.real))?;
        assert_rows_eq("reac", &reac, &dense(&bal.reac))?;
        Ok(())
    }

    #[test]
    fn test_balance_shape() -> Result<()> {
        for case in [star5(), case5_tree(), case14()] {
            let net = Network::new(&case)?;
            let bal = make_balance(&net);
            let nb = net.n_bus();
            let adj = net.adjacency();

            assert_eq!(bal.real.rows(), nb - 1);
            assert_eq!(bal.real.cols(), 3 * nb - 2);
            assert_eq!(bal.reac.rows(), nb - 1 - net.gens().len());
            assert_eq!(bal.reac.cols(), 3 * nb - 2);

            let rowptr = bal.real.rowptr();
            for (r, &i) in bal.real_buses.iter().enumerate() {
                let nnz = rowptr[r + 1] - rowptr[r];
                if nnz > 2 * adj[i].len() + 1 {
                    return Err(format_err!("bus {}: {} nonzeros", i, nnz));
                }
            }
            let rowptr = bal.reac.rowptr();
            for (r, &i) in bal.reac_buses.iter().enumerate() {
                assert!(rowptr[r + 1] - rowptr[r] <= 2 * adj[i].len() + 1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_balance_generator_rows() -> Result<()> {
        let net = Network::new(&case14())?;
        let bal = make_balance(&net);

        assert_eq!(bal.real_buses, (1..14).collect::<Vec<usize>>());
        assert_eq!(bal.reac_buses, vec![3, 4, 6, 8, 9, 10, 11, 12, 13]);
        assert!((bal.real_rhs[0] - 18.3).abs() < 1e-9);
        assert!((bal.reac_rhs[0] - 3.9).abs() < 1e-9);
        Ok(())
    }
}
