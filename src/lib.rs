mod admittance;
mod balance;
mod case;
mod cones;
mod error;
mod flows;
mod jabr;
mod lifted;
mod network;
mod opt;
mod order;
mod program;
mod recover;
mod socp;
mod traits;

pub mod debug;

pub use admittance::*;
pub use balance::*;
pub use case::*;
pub use cones::*;
pub use error::*;
pub use flows::*;
pub use jabr::*;
pub use lifted::*;
pub use network::*;
pub use opt::*;
pub use order::*;
pub use program::*;
pub use recover::*;
pub use socp::*;
pub use traits::*;

#[cfg(test)]
mod tests;
