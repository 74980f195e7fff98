mod ens_nondominating_sorting;
pub mod config;
pub mod hv_algorithm;
pub mod hv_error;
pub mod hypervolume;
pub mod persistence;
pub mod population;
#[cfg(test)]
mod tests;

pub use crate::config::{ApproxConfig, HypervolumeConfig};
pub use crate::ens_nondominating_sorting::ens_nondominated_sorting;
pub use crate::hv_algorithm::{best_method, Beume3d, BfApprox, Estimate, HvAlgorithm, Native2d, Wfg};
pub use crate::hv_error::{HvError, HvResult};
pub use crate::hypervolume::Hypervolume;
pub use crate::population::Population;
