
use std::panic;
use std::time::{Duration, Instant};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use crate::config::ApproxConfig;
use crate::ens_nondominating_sorting::weakly_dominates;
use crate::hv_algorithm::{inclusive_volume, HvAlgorithm};

const CHUNK_SIZE: u64 = 4096;
/// Cap on the samples behind one estimate, whatever accuracy was requested
pub const MAX_SAMPLES: u64 = CHUNK_SIZE << 12;

/// Monte Carlo value with a Hoeffding confidence interval
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub value: f64,
    /// The true value lies within `value ± half_width` with probability `confidence`
    pub half_width: f64,
    pub samples: u64,
    pub confidence: f64,
}

impl Estimate {
    fn exact(value: f64) -> Self {
        Estimate {
            value,
            half_width: 0.0,
            samples: 0,
            confidence: 1.0,
        }
    }

    pub fn lower(&self) -> f64 {
        (self.value - self.half_width).max(0.0)
    }

    pub fn upper(&self) -> f64 {
        self.value + self.half_width
    }
}

#[derive(Debug, Clone)]
struct SamplingBox {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl SamplingBox {
    fn volume(&self) -> f64 {
        inclusive_volume(&self.lower, &self.upper)
    }

    fn distributions(&self) -> Vec<Uniform<f64>> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| Uniform::new(*lo, *hi))
            .collect()
    }
}

/// Smallest box holding the region dominated by `points[p_idx]` alone.
///
/// `None` when another point weakly dominates it, so nothing is exclusive.
fn exclusive_box(p_idx: usize, points: &[Vec<f64>], r_point: &[f64]) -> Option<SamplingBox> {
    let p = &points[p_idx];
    let mut upper = r_point.to_vec();

    for (idx, q) in points.iter().enumerate()
    {
        if idx == p_idx
        {
            continue;
        }

        let mut worse_count = 0;
        let mut worse_at = 0;
        for (j, (q_j, p_j)) in q.iter().zip(p).enumerate()
        {
            if q_j > p_j
            {
                worse_count += 1;
                worse_at = j;
            }
        }

        match worse_count {
            0 => return None,
            // any sample at or beyond q in that objective would be dominated by q
            1 => upper[worse_at] = upper[worse_at].min(q[worse_at]),
            _ => (),
        }
    }

    Some(SamplingBox {
        lower: p.clone(),
        upper,
    })
}

/// Independent generator for one chunk of one sampling stream
fn chunk_rng(seed: u64, stream: u64, chunk: u64) -> StdRng {
    let mut key = <StdRng as SeedableRng>::Seed::default();
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&stream.to_le_bytes());
    key[16..24].copy_from_slice(&chunk.to_le_bytes());

    StdRng::from_seed(key)
}

fn sample_chunk<F>(distributions: &[Uniform<f64>], mut rng: StdRng, size: u64, is_hit: &F) -> u64
    where
        F: Fn(&[f64]) -> bool + Sync
{
    let mut sample = vec![0.0; distributions.len()];
    let mut hits = 0;

    for _ in 0..size
    {
        for (s, distribution) in sample.iter_mut().zip(distributions)
        {
            *s = distribution.sample(&mut rng);
        }

        if is_hit(&sample)
        {
            hits += 1;
        }
    }

    hits
}

/// Run `f` on every index below `len`, spread round-robin across scoped worker threads,
/// and hand each worker's results to `collect`
fn spread<R, F, C, T>(workers: usize, len: u64, f: F, collect: C) -> Vec<T>
    where
        R: Send,
        T: Send,
        F: Fn(u64) -> R + Sync,
        C: Fn(&mut dyn Iterator<Item = (u64, R)>) -> T + Sync
{
    let workers = (workers.max(1) as u64).min(len.max(1));
    if workers == 1
    {
        return vec![collect(&mut (0..len).map(|index| (index, f(index))))];
    }

    let (f, collect) = (&f, &collect);

    crossbeam::thread::scope(|scope| {
        let handles = (0..workers)
            .map(|worker| {
                scope.spawn(move |_| {
                    let mut results = (worker..len)
                        .step_by(workers as usize)
                        .map(|index| (index, f(index)));
                    collect(&mut results)
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|e| panic::resume_unwind(e))
}

/// Order preserving map over `0..len`
fn parallel_map<R, F>(workers: usize, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync
{
    let per_worker = spread(workers, len as u64, |index| f(index as usize), |results| {
        results.collect::<Vec<_>>()
    });

    let mut ordered = (0..len).map(|_| None).collect::<Vec<Option<R>>>();
    for (index, result) in per_worker.into_iter().flatten()
    {
        ordered[index as usize] = Some(result);
    }

    ordered.into_iter().flatten().collect()
}

/// Sum of `f` over `0..len`; nothing is buffered per index
fn parallel_sum<F>(workers: usize, len: u64, f: F) -> (u64, u64)
    where
        F: Fn(u64) -> (u64, u64) + Sync
{
    spread(workers, len, f, |results| {
        results.fold((0, 0), |(a, b), (_, (x, y))| (a + x, b + y))
    })
    .into_iter()
    .fold((0, 0), |(a, b), (x, y)| (a + x, b + y))
}

struct RaceCandidate {
    index: usize,
    volume: f64,
    distributions: Vec<Uniform<f64>>,
    hits: u64,
    samples: u64,
}

impl RaceCandidate {
    fn estimate(&self, log_term: f64) -> (f64, f64) {
        let value = self.volume * self.hits as f64 / self.samples as f64;
        let half_width = self.volume * (log_term / (2.0 * self.samples as f64)).sqrt();
        (value, half_width)
    }
}

/// Randomized hypervolume estimation in the spirit of Bringmann and Friedrich.
///
/// Samples are drawn in fixed size chunks, each from its own generator seeded by
/// `(seed, stream, chunk)`, so a given seed reproduces the same estimate whatever
/// the number of worker threads. A time budget makes sampling stop early; the
/// interval then reflects the samples actually drawn.
#[derive(Debug, Clone)]
pub struct BfApprox {
    config: ApproxConfig,
    time_budget: Option<Duration>,
}

impl Default for BfApprox {
    fn default() -> Self {
        BfApprox::new(ApproxConfig::default(), None)
    }
}

impl BfApprox {
    pub fn new(config: ApproxConfig, time_budget: Option<Duration>) -> Self {
        BfApprox {
            config,
            time_budget,
        }
    }

    pub fn config(&self) -> &ApproxConfig {
        &self.config
    }

    fn deadline(&self) -> Option<Instant> {
        self.time_budget.map(|budget| Instant::now() + budget)
    }

    fn half_width(&self, volume: f64, samples: u64, log_term: f64) -> f64 {
        if samples == 0
        {
            return volume;
        }
        volume * (log_term / (2.0 * samples as f64)).sqrt()
    }

    fn sample_box<F>(&self, sampling_box: &SamplingBox, stream: u64, is_hit: F) -> Estimate
        where
            F: Fn(&[f64]) -> bool + Sync
    {
        let volume = sampling_box.volume();
        if volume <= 0.0
        {
            return Estimate::exact(0.0);
        }

        let required = self.config.required_samples();
        let total = required.min(MAX_SAMPLES);
        if total < required
        {
            debug!("Capping {} requested samples at {}", required, total);
        }

        let distributions = sampling_box.distributions();
        let deadline = self.deadline();

        let (hits, samples) = parallel_sum(self.config.workers, total.div_ceil(CHUNK_SIZE), |chunk| {
            if chunk > 0 && deadline.map_or(false, |deadline| Instant::now() >= deadline)
            {
                return (0, 0);
            }

            let size = CHUNK_SIZE.min(total - chunk * CHUNK_SIZE);
            let rng = chunk_rng(self.config.seed, stream, chunk);

            (sample_chunk(&distributions, rng, size, &is_hit), size)
        });

        if samples < total
        {
            warn!("Time budget exhausted after {} of {} samples", samples, total);
        }

        let log_term = (2.0 / self.config.delta).ln();

        Estimate {
            value: volume * hits as f64 / samples as f64,
            half_width: self.half_width(volume, samples, log_term),
            samples,
            confidence: 1.0 - self.config.delta,
        }
    }

    /// Dominated volume estimated inside the box spanned by the ideal point and `r_point`
    pub fn estimate(&self, points: &[Vec<f64>], r_point: &[f64]) -> Estimate {
        let ideal = (0..r_point.len())
            .map(|j| points.iter().map(|p| p[j]).fold(f64::INFINITY, f64::min))
            .collect::<Vec<f64>>();

        let bounding_box = SamplingBox {
            lower: ideal,
            upper: r_point.to_vec(),
        };

        self.sample_box(&bounding_box, 0, |sample| {
            points.iter().any(|p| weakly_dominates(p, sample))
        })
    }

    /// Exclusive contribution of `points[p_idx]`, sampled in its exclusive bounding box
    pub fn estimate_exclusive(&self, p_idx: usize, points: &[Vec<f64>], r_point: &[f64]) -> Estimate {
        let Some(exclusive_box) = exclusive_box(p_idx, points, r_point) else {
            return Estimate::exact(0.0);
        };

        self.sample_box(&exclusive_box, 1 + p_idx as u64, |sample| {
            !points
                .iter()
                .enumerate()
                .any(|(idx, q)| idx != p_idx && weakly_dominates(q, sample))
        })
    }

    /// Race the exclusive contribution estimates until the minimum is separated
    /// from every other candidate, the target accuracy is reached, the round limit
    /// is hit or the time budget runs out. Candidates still in the race are tied
    /// and the lowest index wins.
    fn race_least_contributor(&self, points: &[Vec<f64>], r_point: &[f64]) -> usize {
        let mut candidates = vec![];

        for idx in 0..points.len()
        {
            match exclusive_box(idx, points, r_point) {
                Some(sampling_box) if sampling_box.volume() > 0.0 => {
                    candidates.push(RaceCandidate {
                        index: idx,
                        volume: sampling_box.volume(),
                        distributions: sampling_box.distributions(),
                        hits: 0,
                        samples: 0,
                    });
                }
                // contributes nothing, which no other point can undercut
                _ => return idx,
            }
        }

        let log_term = (2.0 * points.len() as f64 / self.config.delta).ln();
        let deadline = self.deadline();

        for round in 0..self.config.max_rounds as u64
        {
            let round_hits = parallel_map(self.config.workers, candidates.len(), |position| {
                let candidate = &candidates[position];
                let p_idx = candidate.index;
                let rng = chunk_rng(self.config.seed, 1 + p_idx as u64, round);

                sample_chunk(&candidate.distributions, rng, CHUNK_SIZE, &|sample: &[f64]| {
                    !points
                        .iter()
                        .enumerate()
                        .any(|(idx, q)| idx != p_idx && weakly_dominates(q, sample))
                })
            });

            for (candidate, hits) in candidates.iter_mut().zip(round_hits)
            {
                candidate.hits += hits;
                candidate.samples += CHUNK_SIZE;
            }

            let min_upper = candidates
                .iter()
                .map(|candidate| {
                    let (value, half_width) = candidate.estimate(log_term);
                    value + half_width
                })
                .fold(f64::INFINITY, f64::min);

            candidates.retain(|candidate| {
                let (value, half_width) = candidate.estimate(log_term);
                value - half_width <= min_upper
            });

            trace!("Racing round {}: {} candidates left", round, candidates.len());

            let accurate = candidates.iter().all(|candidate| {
                candidate.estimate(log_term).1 <= self.config.epsilon * candidate.volume
            });
            let expired = deadline.map_or(false, |deadline| Instant::now() >= deadline);

            if candidates.len() <= 1 || accurate || expired
            {
                break;
            }
        }

        candidates
            .iter()
            .map(|candidate| candidate.index)
            .min()
            .unwrap_or(0)
    }
}

impl HvAlgorithm for BfApprox {
    fn name(&self) -> &str {
        "bf_approx"
    }

    fn is_compatible(&self, dimension: usize) -> bool {
        dimension >= 2
    }

    fn compute(&self, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        self.estimate(points, r_point).value
    }

    fn exclusive(&self, p_idx: usize, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        self.estimate_exclusive(p_idx, points, r_point).value
    }

    fn least_contributor(&self, points: &[Vec<f64>], r_point: &[f64]) -> usize {
        self.race_least_contributor(points, r_point)
    }

    fn expected_operations(&self, n: usize, d: usize) -> u64 {
        self.config
            .required_samples()
            .saturating_mul(n as u64)
            .saturating_mul(d as u64)
    }
}
