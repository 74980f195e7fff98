use proptest::prelude::*;
use crate::hv_algorithm::{inclusive_volume, worse, Beume3d, HvAlgorithm, Native2d, Wfg};
use crate::hv_error::HvError;
use crate::hypervolume::Hypervolume;

const R: f64 = 10.0;

/// Integer coordinates keep every intermediate value exact
fn point_set(d: usize, max_len: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(0u8..10, d), 1..max_len)
        .prop_map(|points| {
            points
                .into_iter()
                .map(|p| p.into_iter().map(f64::from).collect())
                .collect()
        })
}

/// Inclusion-exclusion over all subsets, only feasible for a handful of points
fn brute_force(points: &[Vec<f64>], r_point: &[f64]) -> f64 {
    let mut volume = 0.0;

    for mask in 1u32..(1 << points.len())
    {
        let mut corner: Option<Vec<f64>> = None;
        for (idx, p) in points.iter().enumerate()
        {
            if mask & (1 << idx) != 0
            {
                corner = Some(match corner {
                    None => p.clone(),
                    Some(c) => worse(&c, p),
                });
            }
        }

        let sign = if mask.count_ones() % 2 == 1 { 1.0 } else { -1.0 };
        if let Some(corner) = corner
        {
            volume += sign * inclusive_volume(&corner, r_point);
        }
    }

    volume
}

fn naive_exclusives(points: &[Vec<f64>], r_point: &[f64]) -> Vec<f64> {
    let total = Hypervolume::new(points.to_vec()).unwrap().compute(r_point).unwrap();

    (0..points.len())
        .map(|idx| {
            let mut rest = points.to_vec();
            rest.remove(idx);

            match Hypervolume::new(rest).unwrap().compute(r_point) {
                Ok(without) => total - without,
                Err(HvError::EmptySet) => total,
                Err(e) => panic!("unexpected error {}", e),
            }
        })
        .collect()
}

fn naive_least_contributor(points: &[Vec<f64>], r_point: &[f64]) -> usize {
    let exclusives = naive_exclusives(points, r_point);

    let mut best = 0;
    for idx in 1..exclusives.len()
    {
        if exclusives[idx] < exclusives[best]
        {
            best = idx;
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_native2d_agrees_with_wfg(points in point_set(2, 16)) {
        let r_point = [R; 2];

        prop_assert_eq!(Native2d::new().compute(&points, &r_point), Wfg::new().compute(&points, &r_point));
    }

    #[test]
    fn prop_beume3d_agrees_with_wfg(points in point_set(3, 16)) {
        let r_point = [R; 3];

        prop_assert_eq!(Beume3d::new().compute(&points, &r_point), Wfg::new().compute(&points, &r_point));
    }

    #[test]
    fn prop_wfg_agrees_with_inclusion_exclusion(points in point_set(5, 7)) {
        let r_point = [R; 5];

        let expected = brute_force(&points, &r_point);
        let actual = Wfg::new().compute(&points, &r_point);

        prop_assert!((expected - actual).abs() <= 1e-6, "{} != {}", expected, actual);
    }

    #[test]
    fn prop_exclusive_sum_bounded_by_total(points in point_set(3, 10)) {
        let r_point = [R; 3];
        let hv = Hypervolume::new(points.clone()).unwrap();

        let total = hv.compute(&r_point).unwrap();
        let sum = (0..points.len())
            .map(|idx| hv.exclusive(idx, &r_point).unwrap())
            .sum::<f64>();

        prop_assert!(total >= 0.0);
        prop_assert!(sum <= total);
    }

    #[test]
    fn prop_exclusive_matches_removal(points in point_set(4, 8)) {
        let r_point = [R; 4];
        let hv = Hypervolume::new(points.clone()).unwrap();

        for (idx, expected) in naive_exclusives(&points, &r_point).into_iter().enumerate()
        {
            prop_assert_eq!(hv.exclusive(idx, &r_point).unwrap(), expected);
        }
    }

    #[test]
    fn prop_least_contributor_2d(points in point_set(2, 12)) {
        let r_point = [R; 2];
        let hv = Hypervolume::new(points.clone()).unwrap();

        prop_assert_eq!(hv.least_contributor(&r_point).unwrap(), naive_least_contributor(&points, &r_point));
    }

    #[test]
    fn prop_least_contributor_3d(points in point_set(3, 10)) {
        let r_point = [R; 3];
        let hv = Hypervolume::new(points.clone()).unwrap();

        prop_assert_eq!(hv.least_contributor(&r_point).unwrap(), naive_least_contributor(&points, &r_point));
    }

    #[test]
    fn prop_least_contributor_4d(points in point_set(4, 8)) {
        let r_point = [R; 4];
        let hv = Hypervolume::new(points.clone()).unwrap();

        prop_assert_eq!(hv.least_contributor(&r_point).unwrap(), naive_least_contributor(&points, &r_point));
    }

    #[test]
    fn prop_nadir_point_is_coordinate_max(points in point_set(3, 10), epsilon in 0u8..4) {
        let hv = Hypervolume::new(points.clone()).unwrap();
        let epsilon = f64::from(epsilon);

        let nadir = hv.get_nadir_point(epsilon).unwrap();
        let plain = hv.get_nadir_point(0.0).unwrap();

        for j in 0..3
        {
            let max = points.iter().map(|p| p[j]).fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(plain[j], max);
            prop_assert_eq!(nadir[j], max + epsilon);
        }
    }
}

#[test]
fn test_single_point_exclusive_is_total() {
    let hv = Hypervolume::new(vec![vec![2.0, 3.0, 4.0, 5.0]]).unwrap();
    let r_point = [R; 4];

    assert_eq!(hv.exclusive(0, &r_point), hv.compute(&r_point));
    assert_eq!(hv.compute(&r_point), Ok(8.0 * 7.0 * 6.0 * 5.0));
}

#[test]
fn test_all_points_on_reference() {
    let hv = Hypervolume::new(vec![vec![R; 4]; 3]).unwrap();

    assert_eq!(hv.compute(&[R; 4]), Ok(0.0));
    assert_eq!(hv.least_contributor(&[R; 4]), Ok(0));
}
