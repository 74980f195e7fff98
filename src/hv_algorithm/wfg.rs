use crate::ens_nondominating_sorting::nondominated_points;
use crate::hv_algorithm::native2d::sweep_2d;
use crate::hv_algorithm::{expected_operations, inclusive_volume, worse, HvAlgorithm};

/// Exact algorithm for any number of objectives (While, Bradstreet, Barone).
///
/// Points are sorted by the last objective, worst first. Every point then adds a
/// slab whose height is its distance to the reference point in that objective
/// and whose base is its exclusive contribution among the points after it,
/// projected onto the remaining objectives. Projections are filtered down to
/// their non-dominated subset before recursing, and the recursion ends in the
/// two objective sweep.
#[derive(Debug, Clone, Default)]
pub struct Wfg {}

impl Wfg {
    pub fn new() -> Self {
        Wfg {}
    }
}

fn wfg(mut points: Vec<Vec<f64>>, r_point: &[f64]) -> f64 {
    let d = r_point.len();

    if points.is_empty()
    {
        return 0.0;
    }

    if d == 2
    {
        return sweep_2d(&points, r_point);
    }

    if points.len() == 1
    {
        return inclusive_volume(&points[0], r_point);
    }

    let last = d - 1;
    points.sort_by(|a, b| b[last].total_cmp(&a[last]));

    let r_base = &r_point[..last];
    let mut volume = 0.0;

    for (k, p) in points.iter().enumerate()
    {
        let height = r_point[last] - p[last];
        if height <= 0.0
        {
            continue;
        }

        let base = &p[..last];
        let limit_set = points[k + 1..]
            .iter()
            .map(|q| worse(base, &q[..last]))
            .collect::<Vec<Vec<f64>>>();

        let covered = wfg(nondominated_points(limit_set), r_base);
        let exclusive_base = (inclusive_volume(base, r_base) - covered).max(0.0);

        volume += height * exclusive_base;
    }

    volume
}

impl HvAlgorithm for Wfg {
    fn name(&self) -> &str {
        "wfg"
    }

    fn is_compatible(&self, dimension: usize) -> bool {
        dimension >= 2
    }

    fn compute(&self, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        wfg(nondominated_points(points.to_vec()), r_point)
    }

    fn expected_operations(&self, n: usize, d: usize) -> u64 {
        expected_operations(n, d.max(4))
    }
}
