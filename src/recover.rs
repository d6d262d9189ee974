use crate::error::{JabrError, Result};
use crate::lifted::LiftedSolution;
use crate::network::{orientation_sign, Network};
use crate::order::BusOrder;
use num_complex::Complex64;
use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::SQRT_2;

/// Bus voltages in polar form, internal numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct Voltages {
    /// Voltage magnitudes (p.u.).
    pub vm: Vec<f64>,
    /// Voltage angles (radians).
    pub va: Vec<f64>,
}

impl Voltages {
    pub fn va_deg(&self) -> Vec<f64> {
        self.va.iter().map(|a| a.to_degrees()).collect()
    }

    pub fn to_complex(&self) -> Vec<Complex64> {
        self.vm
            .iter()
            .zip(&self.va)
            .map(|(&m, &a)| Complex64::from_polar(m, a))
            .collect()
    }

    /// `(magnitude, angle in degrees)` keyed by external bus number.
    pub fn to_external(&self, order: &BusOrder) -> BTreeMap<usize, (f64, f64)> {
        self.vm
            .iter()
            .zip(self.va_deg())
            .enumerate()
            .map(|(i, (&m, a))| (order.external(i), (m, a)))
            .collect()
    }
}

/// `V_i = sqrt(sqrt(2) * u_i)`.
///
/// Slightly negative `u` from solver round-off gives zero.
pub fn voltage_magnitudes(u: &[f64]) -> Vec<f64> {
    u.iter().map(|&u| (SQRT_2 * u).max(0.0).sqrt()).collect()
}

/// Angle difference `theta_from - theta_to` across every branch, from
/// `asin(I / (V_from * V_to))`.
///
/// Ratios within `angle_tol` outside `[-1, 1]` are clamped. Anything further
/// out is a `Domain` error naming the external buses of the branch.
pub fn branch_angles(
    net: &Network,
    vm: &[f64],
    im: &[f64],
    angle_tol: f64,
) -> Result<Vec<f64>> {
    net.branches()
        .iter()
        .zip(im)
        .map(|(br, &i)| {
            let ratio = i / (vm[br.from] * vm[br.to]);
            if !ratio.is_finite() || ratio.abs() > 1.0 + angle_tol {
                return Err(JabrError::Domain {
                    from: net.order().external(br.from),
                    to: net.order().external(br.to),
                    reason: format!("sine ratio {} is outside [-1, 1]", ratio),
                });
            }
            Ok(ratio.clamp(-1.0, 1.0).asin())
        })
        .collect()
}

/// Bus angles from branch angle differences, by breadth-first search from
/// the root (angle zero).
pub fn bus_angles(net: &Network, theta: &[f64]) -> Result<Vec<f64>> {
    let nb = net.n_bus();
    let adj = net.adjacency();

    let mut va = vec![0.0; nb];
    let mut visited = vec![false; nb];
    let mut queue = VecDeque::with_capacity(nb);
    visited[0] = true;
    queue.push_back(0);

    while let Some(p) = queue.pop_front() {
        for &(c, k) in &adj[p] {
            if visited[c] {
                continue;
            }
            visited[c] = true;
            va[c] = va[p] + orientation_sign(p, c) * theta[k];
            queue.push_back(c);
        }
    }

    let unreached: Vec<usize> = (0..nb)
        .filter(|&i| !visited[i])
        .map(|i| net.order().external(i))
        .collect();
    if !unreached.is_empty() {
        return Err(JabrError::Structural(format!(
            "buses {:?} are not connected to the root",
            unreached
        )));
    }
    Ok(va)
}

/// Physical bus voltages from a solved relaxation.
pub fn recover(net: &Network, lifted: &LiftedSolution, angle_tol: f64) -> Result<Voltages> {
    lifted.check_dims(net)?;
    let vm = voltage_magnitudes(&lifted.u);
    let theta = branch_angles(net, &vm, &lifted.i, angle_tol)?;
    let va = bus_angles(net, &theta)?;
    Ok(Voltages { vm, va })
}
