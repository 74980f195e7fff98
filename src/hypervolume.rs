
use std::borrow::Cow;
use log::debug;
use crate::config::HypervolumeConfig;
use crate::hv_algorithm::{self, best_method, BfApprox, Estimate, HvAlgorithm};
use crate::hv_error::{HvError, HvResult};
use crate::population::Population;

/// Hypervolume indicator of a fixed set of points.
///
/// The point set is validated once at construction and never changes afterwards;
/// every query validates its reference point again before dispatching to an
/// [`HvAlgorithm`], either the one picked by [`best_method`] or an explicit override.
/// Cloning copies the points, so clones can be handed to other threads freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypervolume {
    points: Vec<Vec<f64>>,
    config: HypervolumeConfig,
}

impl Hypervolume {
    pub fn new(points: Vec<Vec<f64>>) -> HvResult<Self> {
        Self::with_config(points, HypervolumeConfig::default())
    }

    pub fn with_config(points: Vec<Vec<f64>>, config: HypervolumeConfig) -> HvResult<Self> {
        let hypervolume = Hypervolume { points, config };
        hypervolume.verify_after_construct()?;
        Ok(hypervolume)
    }

    /// Take the `front_idx`-th non-dominated front of `population` as the point set
    pub fn from_population<P: Population + ?Sized>(population: &P, front_idx: usize) -> HvResult<Self> {
        Self::new(population.front(front_idx)?)
    }

    pub fn from_population_with_config<P: Population + ?Sized>(population: &P,
                                                               front_idx: usize,
                                                               config: HypervolumeConfig) -> HvResult<Self> {
        Self::with_config(population.front(front_idx)?, config)
    }

    pub fn get_points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn config(&self) -> &HypervolumeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of objectives, `None` for an empty set
    pub fn dimension(&self) -> Option<usize> {
        self.points.first().map(|p| p.len())
    }

    /// The strategy [`Hypervolume::compute`] would use for this point set
    pub fn best_method(&self) -> Box<dyn HvAlgorithm> {
        best_method(self.points.len(), self.dimension().unwrap_or(0), &self.config)
    }

    pub fn compute(&self, r_point: &[f64]) -> HvResult<f64> {
        self.compute_with(r_point, self.best_method().as_ref())
    }

    pub fn compute_with(&self, r_point: &[f64], algorithm: &dyn HvAlgorithm) -> HvResult<f64> {
        let points = self.verify_before_compute(r_point, algorithm)?;

        Ok(algorithm.compute(&points, r_point))
    }

    /// Volume dominated by the point at `p_idx` and by no other point
    pub fn exclusive(&self, p_idx: usize, r_point: &[f64]) -> HvResult<f64> {
        self.exclusive_with(p_idx, r_point, self.best_method().as_ref())
    }

    pub fn exclusive_with(&self, p_idx: usize, r_point: &[f64], algorithm: &dyn HvAlgorithm) -> HvResult<f64> {
        let points = self.verify_before_compute(r_point, algorithm)?;
        self.verify_index(p_idx)?;

        Ok(algorithm.exclusive(p_idx, &points, r_point))
    }

    /// Index of the point with the smallest exclusive contribution, lowest index on ties
    pub fn least_contributor(&self, r_point: &[f64]) -> HvResult<usize> {
        self.least_contributor_with(r_point, self.best_method().as_ref())
    }

    pub fn least_contributor_with(&self, r_point: &[f64], algorithm: &dyn HvAlgorithm) -> HvResult<usize> {
        let points = self.verify_before_compute(r_point, algorithm)?;

        Ok(algorithm.least_contributor(&points, r_point))
    }

    /// Sampled total volume together with its confidence interval
    pub fn approximate(&self, r_point: &[f64]) -> HvResult<Estimate> {
        let algorithm = self.approximation();
        let points = self.verify_before_compute(r_point, &algorithm)?;

        Ok(algorithm.estimate(&points, r_point))
    }

    /// Sampled exclusive contribution together with its confidence interval
    pub fn approximate_exclusive(&self, p_idx: usize, r_point: &[f64]) -> HvResult<Estimate> {
        let algorithm = self.approximation();
        let points = self.verify_before_compute(r_point, &algorithm)?;
        self.verify_index(p_idx)?;

        Ok(algorithm.estimate_exclusive(p_idx, &points, r_point))
    }

    fn approximation(&self) -> BfApprox {
        BfApprox::new(self.config.approx.clone(), self.config.time_budget)
    }

    /// Coordinate-wise maximum of all points, shifted by `epsilon`
    pub fn get_nadir_point(&self, epsilon: f64) -> HvResult<Vec<f64>> {
        let d = self.dimension().ok_or(HvError::EmptySet)?;

        let mut nadir = vec![f64::NEG_INFINITY; d];
        for p in self.points.iter()
        {
            for (n_i, p_i) in nadir.iter_mut().zip(p)
            {
                *n_i = n_i.max(*p_i);
            }
        }

        Ok(nadir.into_iter().map(|n_i| n_i + epsilon).collect())
    }

    /// Nadir point shifted by the configured offset, a reasonable default reference point
    pub fn nadir_reference(&self) -> HvResult<Vec<f64>> {
        self.get_nadir_point(self.config.nadir_offset)
    }

    /// Estimated operation count of the exact algorithm class for `n` points in `d` objectives
    pub fn get_expected_operations(n: usize, d: usize) -> u64 {
        hv_algorithm::expected_operations(n, d)
    }

    fn verify_after_construct(&self) -> HvResult<()> {
        let Some(d) = self.dimension() else {
            return Ok(());
        };

        if d < 2
        {
            return Err(HvError::InvalidDimension { expected: 2, found: d });
        }

        for (index, p) in self.points.iter().enumerate()
        {
            if p.len() != d
            {
                return Err(HvError::InvalidDimension { expected: d, found: p.len() });
            }

            if p.iter().any(|p_i| !p_i.is_finite())
            {
                return Err(HvError::NonFiniteCoordinate { point: Some(index) });
            }
        }

        Ok(())
    }

    /// Validate `r_point` against the point set and `algorithm`.
    ///
    /// Points exceeding the reference point within the configured tolerance are
    /// clamped onto it, so algorithms never see negative extents.
    fn verify_before_compute(&self, r_point: &[f64], algorithm: &dyn HvAlgorithm) -> HvResult<Cow<'_, [Vec<f64>]>> {
        let d = self.dimension().ok_or(HvError::EmptySet)?;

        if r_point.len() != d
        {
            return Err(HvError::InvalidDimension { expected: d, found: r_point.len() });
        }

        if r_point.iter().any(|r_i| !r_i.is_finite())
        {
            return Err(HvError::NonFiniteCoordinate { point: None });
        }

        if !algorithm.is_compatible(d)
        {
            return Err(HvError::UnsupportedAlgorithmForDimension {
                algorithm: algorithm.name().to_string(),
                dimension: d,
            });
        }

        let tolerance = self.config.dominance_tolerance;
        let mut needs_clamp = false;

        for (index, p) in self.points.iter().enumerate()
        {
            for (p_i, r_i) in p.iter().zip(r_point)
            {
                if *p_i > r_i + tolerance
                {
                    return Err(HvError::InvalidReferencePoint { index });
                }
                needs_clamp |= p_i > r_i;
            }
        }

        if !needs_clamp
        {
            return Ok(Cow::Borrowed(self.points.as_slice()));
        }

        debug!("Clamping points onto the reference point within tolerance {}", tolerance);

        Ok(Cow::Owned(
            self.points
                .iter()
                .map(|p| p.iter().zip(r_point).map(|(p_i, r_i)| p_i.min(*r_i)).collect())
                .collect(),
        ))
    }

    fn verify_index(&self, p_idx: usize) -> HvResult<()> {
        if p_idx >= self.points.len()
        {
            return Err(HvError::IndexOutOfRange {
                index: p_idx,
                len: self.points.len(),
            });
        }
        Ok(())
    }
}
