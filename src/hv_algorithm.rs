pub mod native2d;
pub mod beume3d;
pub mod wfg;
pub mod bf_approx;

use std::cmp::Ordering;
use dyn_clone::DynClone;
use itertools::Itertools;
use log::debug;
use crate::config::HypervolumeConfig;
use crate::ens_nondominating_sorting::nondominated_points;

pub use native2d::Native2d;
pub use beume3d::Beume3d;
pub use wfg::Wfg;
pub use bf_approx::{BfApprox, Estimate};

/// A hypervolume computation strategy.
///
/// Implementations receive points that have already been validated by
/// [`crate::Hypervolume`]: every point shares the dimension of `r_point`,
/// the set is non-empty and `r_point` weakly dominates every point.
pub trait HvAlgorithm: DynClone + Send + Sync {
    fn name(&self) -> &str;

    fn is_compatible(&self, dimension: usize) -> bool;

    fn compute(&self, points: &[Vec<f64>], r_point: &[f64]) -> f64;

    /// Volume dominated by `points[p_idx]` and by no other point
    fn exclusive(&self, p_idx: usize, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        let limit_set = limit_set(p_idx, points);
        if limit_set.is_empty()
        {
            return inclusive_volume(&points[p_idx], r_point);
        }

        let covered = self.compute(&nondominated_points(limit_set), r_point);

        (inclusive_volume(&points[p_idx], r_point) - covered).max(0.0)
    }

    /// Index of the point with the smallest exclusive contribution, lowest index on ties
    fn least_contributor(&self, points: &[Vec<f64>], r_point: &[f64]) -> usize {
        let contributions = (0..points.len())
            .map(|idx| self.exclusive(idx, points, r_point))
            .collect::<Vec<f64>>();

        argmin(&contributions)
    }

    /// Rough operation count, only used to compare strategies
    fn expected_operations(&self, n: usize, d: usize) -> u64;
}

dyn_clone::clone_trait_object!(HvAlgorithm);

/// Pick the cheapest strategy expected to finish in bounded time for `n` points of dimension `d`.
pub fn best_method(n: usize, d: usize, config: &HypervolumeConfig) -> Box<dyn HvAlgorithm> {
    let method: Box<dyn HvAlgorithm> = match d {
        2 => Box::new(Native2d::new()),
        3 => Box::new(Beume3d::new()),
        _ if config.time_budget.is_none() && n < config.exact_threshold => Box::new(Wfg::new()),
        _ => Box::new(BfApprox::new(config.approx.clone(), config.time_budget)),
    };

    debug!(
        "Selected {} for {} points of dimension {} (~{} operations)",
        method.name(),
        n,
        d,
        method.expected_operations(n, d)
    );

    method
}

/// Volume of the box spanned by `point` and `r_point`
pub fn inclusive_volume(point: &[f64], r_point: &[f64]) -> f64 {
    point
        .iter()
        .zip(r_point)
        .map(|(p_i, r_i)| (r_i - p_i).max(0.0))
        .product()
}

/// Coordinate-wise maximum of two points
pub(crate) fn worse(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(a_i, b_i)| a_i.max(*b_i)).collect()
}

/// Every other point pushed into the dominated box of `points[p_idx]`
pub(crate) fn limit_set(p_idx: usize, points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let p = &points[p_idx];

    points
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != p_idx)
        .map(|(_, q)| worse(p, q))
        .collect()
}

/// First index of the minimum value
pub(crate) fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .position_min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(0)
}

/// `d * n * ln(n)` for the sweeps, `n^(d/2)` for anything higher
pub fn expected_operations(n: usize, d: usize) -> u64 {
    let n = n as f64;
    let d_f = d as f64;

    if d <= 3
    {
        (d_f * n * n.max(1.0).ln()) as u64
    }
    else
    {
        n.powf(d_f * 0.5) as u64
    }
}
