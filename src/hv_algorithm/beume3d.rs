use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use crate::hv_algorithm::HvAlgorithm;

/// Exact sweep for three objectives (Beume et al.), O(n log n).
///
/// Points are visited in ascending third objective while a balanced tree keeps
/// the two dimensional skyline of everything visited so far.
#[derive(Debug, Clone, Default)]
pub struct Beume3d {}

impl Beume3d {
    pub fn new() -> Self {
        Beume3d {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Key(f64);

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Skyline of (x, y) pairs, x ascending and y strictly descending
struct Skyline {
    front: BTreeMap<Key, f64>,
    area: f64,
    r_x: f64,
    r_y: f64,
}

impl Skyline {
    fn new(r_x: f64, r_y: f64) -> Self {
        Skyline {
            front: BTreeMap::new(),
            area: 0.0,
            r_x,
            r_y,
        }
    }

    fn insert(&mut self, x: f64, y: f64) {
        if let Some((_, &left_y)) = self.front.range(..=Key(x)).next_back()
        {
            if left_y <= y
            {
                return;
            }
        }

        let mut y_top = self
            .front
            .range(..Key(x))
            .next_back()
            .map_or(self.r_y, |(_, &left_y)| left_y);

        let dominated = self
            .front
            .range(Key(x)..)
            .take_while(|&(_, &q_y)| q_y >= y)
            .map(|(&q_x, &q_y)| (q_x, q_y))
            .collect::<Vec<(Key, f64)>>();

        let mut cur_x = x;
        for (q_x, q_y) in dominated
        {
            self.area += (q_x.0 - cur_x) * (y_top - y);
            y_top = q_y;
            cur_x = q_x.0;
            self.front.remove(&q_x);
        }

        let next_x = self
            .front
            .range((Excluded(Key(x)), Unbounded))
            .next()
            .map_or(self.r_x, |(q_x, _)| q_x.0);
        self.area += (next_x - cur_x) * (y_top - y);

        self.front.insert(Key(x), y);
    }
}

impl HvAlgorithm for Beume3d {
    fn name(&self) -> &str {
        "beume3d"
    }

    fn is_compatible(&self, dimension: usize) -> bool {
        dimension == 3
    }

    fn compute(&self, points: &[Vec<f64>], r_point: &[f64]) -> f64 {
        let mut sorted = points.iter().collect::<Vec<&Vec<f64>>>();
        sorted.sort_by(|a, b| a[2].total_cmp(&b[2]));

        let mut skyline = Skyline::new(r_point[0], r_point[1]);
        let mut volume = 0.0;

        for (i, p) in sorted.iter().enumerate()
        {
            skyline.insert(p[0], p[1]);

            let next_z = sorted.get(i + 1).map_or(r_point[2], |next| next[2]);
            volume += skyline.area * (next_z - p[2]);
        }

        volume
    }

    fn expected_operations(&self, n: usize, _d: usize) -> u64 {
        let n = n as f64;
        (n * n.max(1.0).log2()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hv_algorithm::native2d::sweep_2d;

    #[test]
    fn test_skyline_tracks_area() {
        let mut skyline = Skyline::new(6.0, 6.0);

        skyline.insert(3.0, 3.0);
        assert_eq!(skyline.area, 9.0);

        skyline.insert(1.0, 5.0);
        skyline.insert(5.0, 1.0);
        assert_eq!(skyline.area, 13.0);

        // dominated, no change
        skyline.insert(4.0, 4.0);
        assert_eq!(skyline.area, 13.0);

        // dominates (3, 3) and (5, 1)
        skyline.insert(2.0, 1.0);
        assert_eq!(skyline.area, sweep_2d(&[vec![1.0, 5.0], vec![2.0, 1.0]], &[6.0, 6.0]));
        assert_eq!(skyline.front.len(), 2);
    }

    #[test]
    fn test_single_cube() {
        assert_eq!(Beume3d::new().compute(&[vec![1.0, 1.0, 1.0]], &[3.0, 3.0, 3.0]), 8.0);
    }

    #[test]
    fn test_two_boxes() {
        let points = vec![vec![0.0, 0.0, 2.0], vec![1.0, 1.0, 0.0]];

        // [0,3]^2 x [2,3] plus [1,3]^2 x [0,3] minus their overlap [1,3]^2 x [2,3]
        assert_eq!(Beume3d::new().compute(&points, &[3.0, 3.0, 3.0]), 9.0 + 12.0 - 4.0);
    }

    #[test]
    fn test_equal_x_replaces_point() {
        let mut skyline = Skyline::new(4.0, 4.0);

        skyline.insert(1.0, 3.0);
        skyline.insert(1.0, 2.0);

        assert_eq!(skyline.area, 6.0);
        assert_eq!(skyline.front.len(), 1);
    }
}
