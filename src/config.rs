use std::time::Duration;

/// Smallest accepted `epsilon`; finer targets need more samples than one estimate can draw
pub const MIN_EPSILON: f64 = 1e-6;
/// Smallest accepted `delta`
pub const MIN_DELTA: f64 = 1e-12;

/// Parameters of the randomized estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproxConfig {
    /// Target half width of the estimate, as a fraction of the sampled box volume
    pub epsilon: f64,
    /// Probability that the true value lies outside the reported interval
    pub delta: f64,
    pub seed: u64,
    /// Number of sampling threads. Results do not depend on it.
    pub workers: usize,
    /// Upper bound on racing rounds for the least contributor
    pub max_rounds: usize,
}

impl Default for ApproxConfig {
    fn default() -> Self {
        ApproxConfig {
            epsilon: 1e-2,
            delta: 1e-3,
            seed: 0,
            workers: num_cpus::get(),
            max_rounds: 64,
        }
    }
}

impl ApproxConfig {
    /// Clamped into `[MIN_EPSILON, 1]`, NaN falls back to the default
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = clamp_or(epsilon, MIN_EPSILON, 1.0, 1e-2);
        self
    }

    /// Clamped into `[MIN_DELTA, 1]`, NaN falls back to the default
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = clamp_or(delta, MIN_DELTA, 1.0, 1e-3);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Hoeffding sample count for a fraction estimate within `epsilon` at confidence `1 - delta`.
    ///
    /// Saturates at `u64::MAX` when the fields were set to zero or negative values directly.
    pub fn required_samples(&self) -> u64 {
        let samples = ((2.0 / self.delta).ln() / (2.0 * self.epsilon * self.epsilon)).ceil();

        if samples.is_nan()
        {
            return u64::MAX;
        }
        // float to integer casts saturate
        (samples as u64).max(1)
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan()
    {
        fallback
    }
    else
    {
        value.clamp(min, max)
    }
}

/// Engine level settings, mostly consulted by the algorithm selector.
#[derive(Debug, Clone, PartialEq)]
pub struct HypervolumeConfig {
    /// Above three objectives, point sets smaller than this are computed exactly
    pub exact_threshold: usize,
    /// How far a point may exceed the reference point and still count as dominated
    pub dominance_tolerance: f64,
    /// Forces the approximate algorithm above three objectives and bounds its sampling time
    pub time_budget: Option<Duration>,
    /// Offset added to the nadir point when it serves as the default reference point
    pub nadir_offset: f64,
    pub approx: ApproxConfig,
}

impl Default for HypervolumeConfig {
    fn default() -> Self {
        HypervolumeConfig {
            exact_threshold: 64,
            dominance_tolerance: 0.0,
            time_budget: None,
            nadir_offset: 1.0,
            approx: ApproxConfig::default(),
        }
    }
}

impl HypervolumeConfig {
    pub fn with_exact_threshold(mut self, exact_threshold: usize) -> Self {
        self.exact_threshold = exact_threshold;
        self
    }

    pub fn with_dominance_tolerance(mut self, tolerance: f64) -> Self {
        self.dominance_tolerance = tolerance.max(0.0);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_nadir_offset(mut self, offset: f64) -> Self {
        self.nadir_offset = offset;
        self
    }

    pub fn with_approx(mut self, approx: ApproxConfig) -> Self {
        self.approx = approx;
        self
    }
}
