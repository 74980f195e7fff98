use std::cmp::Ordering;
use crate::hv_algorithm::{argmin, inclusive_volume, HvAlgorithm};

/// Exact staircase sweep for two objectives, O(n log n).
#[derive(Debug, Clone, Default)]
pub struct Native2d {}

impl Native2d {
    pub fn new() -> Self {
        Native2d {}
    }
}

fn by_first_then_second(a: &[f64], b: &[f64]) -> Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}

/// Area dominated by two dimensional `points` inside the box of `r_point`
pub(crate) fn sweep_2d<P: AsRef<[f64]>>(points: &[P], r_point: &[f64]) -> f64 {
    let mut sorted = points.iter().map(|p| p.as_ref()).collect::<Vec<&[f64]>>();
    sorted.sort_by(|a, b| by_first_then_second(a, b));

    let mut area = 0.0;
    let mut min_y = r_point[1];

    for p in sorted
    {
        if p[1] < min_y
        {
            area += (r_point[0] - p[0]) * (min_y - p[1]);
            min_y = p[1];
        }
    }

    area
}

impl HvAlgorithm for Native2d {
    fn name(&self) -> &str {
        "native2d"
    }

    fn is_compatible(&self, dimension: usize) -> bool {
        dimension == 2
    }

    fn compute(&self, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        sweep_2d(points, r_point)
    }

    /// Zero contributors win outright. Otherwise the set is mutually non-dominated
    /// and each contribution is the rectangle spanned by its sorted neighbours.
    fn least_contributor(&self, points: &[Vec<f64>], r_point: &[f64]) -> usize {
        let mut order = (0..points.len()).collect::<Vec<usize>>();
        order.sort_by(|&a, &b| by_first_then_second(&points[a], &points[b]).then(a.cmp(&b)));

        let mut zero_contributors = vec![];
        let mut front: Vec<usize> = vec![];
        let mut min_y = f64::INFINITY;

        for &idx in order.iter()
        {
            let p = &points[idx];

            if p[1] >= min_y
            {
                zero_contributors.push(idx);

                // an exact duplicate also cancels the contribution of the copy already on the front
                if let Some(&last) = front.last()
                {
                    if points[last] == *p
                    {
                        zero_contributors.push(last);
                    }
                }
                continue;
            }

            if inclusive_volume(p, r_point) == 0.0
            {
                zero_contributors.push(idx);
            }

            min_y = p[1];
            front.push(idx);
        }

        if let Some(&lowest) = zero_contributors.iter().min()
        {
            return lowest;
        }

        let mut contributions = vec![0.0; points.len()];
        for (pos, &idx) in front.iter().enumerate()
        {
            let p = &points[idx];
            let next_x = front.get(pos + 1).map_or(r_point[0], |&next| points[next][0]);
            let prev_y = if pos == 0 { r_point[1] } else { points[front[pos - 1]][1] };

            contributions[idx] = (next_x - p[0]) * (prev_y - p[1]);
        }

        argmin(&contributions)
    }

    fn expected_operations(&self, n: usize, _d: usize) -> u64 {
        let n = n as f64;
        (n * n.max(1.0).log2()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Vec<f64>> {
        vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![3.0, 3.0]]
    }

    #[test]
    fn test_staircase_area() {
        assert_eq!(Native2d::new().compute(&sample(), &[6.0, 6.0]), 13.0);
    }

    #[test]
    fn test_exclusive_by_limit_set() {
        let algorithm = Native2d::new();
        let points = sample();

        assert_eq!(algorithm.exclusive(0, &points, &[6.0, 6.0]), 2.0);
        assert_eq!(algorithm.exclusive(1, &points, &[6.0, 6.0]), 2.0);
        assert_eq!(algorithm.exclusive(2, &points, &[6.0, 6.0]), 4.0);
    }

    #[test]
    fn test_least_contributor_ties_to_lowest_index() {
        assert_eq!(Native2d::new().least_contributor(&sample(), &[6.0, 6.0]), 0);
    }

    #[test]
    fn test_least_contributor_dominated_point() {
        let points = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![0.5, 3.0]];

        assert_eq!(Native2d::new().least_contributor(&points, &[4.0, 4.0]), 1);
    }

    #[test]
    fn test_least_contributor_duplicates() {
        let points = vec![vec![1.0, 4.0], vec![3.0, 1.0], vec![1.0, 4.0]];

        assert_eq!(Native2d::new().least_contributor(&points, &[5.0, 5.0]), 0);
    }

    #[test]
    fn test_degenerate_box_contributes_nothing() {
        let points = vec![vec![1.0, 1.0], vec![4.0, 0.5]];

        assert_eq!(Native2d::new().least_contributor(&points, &[4.0, 4.0]), 1);
    }
}
