use crate::error::{JabrError, Result};
use std::collections::{BTreeMap, HashMap};

/// Mapping between external bus numbers and consecutive internal indexes.
///
/// The root bus is always internal bus 0. The remaining buses follow in
/// ascending order of external number.
#[derive(Debug, Clone, PartialEq)]
pub struct BusOrder {
    pub e2i: HashMap<usize, usize>,
    pub i2e: Vec<usize>,
}

impl BusOrder {
    /// Renumbers the buses in `buses` so that `root` becomes bus 0.
    pub fn new<T>(buses: &BTreeMap<usize, T>, root: usize) -> Result<Self> {
        if !buses.contains_key(&root) {
            return Err(JabrError::Structural(format!(
                "root bus {} is not in the bus list",
                root
            )));
        }
        let nb = buses.len();
        let mut order = Self {
            e2i: HashMap::with_capacity(nb),
            i2e: Vec::with_capacity(nb),
        };
        order.e2i.insert(root, 0);
        order.i2e.push(root);
        for &b in buses.keys().filter(|&&b| b != root) {
            order.e2i.insert(b, order.i2e.len());
            order.i2e.push(b);
        }
        Ok(order)
    }

    pub fn len(&self) -> usize {
        self.i2e.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2e.is_empty()
    }

    /// Internal index of external bus `e`.
    pub fn internal(&self, e: usize) -> Result<usize> {
        self.e2i
            .get(&e)
            .copied()
            .ok_or_else(|| JabrError::Structural(format!("unknown bus {}", e)))
    }

    pub fn external(&self, i: usize) -> usize {
        self.i2e[i]
    }
}
