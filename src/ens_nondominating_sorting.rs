use std::cmp::Ordering;

/// Pareto dominance under minimization: no worse everywhere and strictly better somewhere.
///
/// Equal vectors do not dominate each other and share a front.
fn dominates(p1: &[f64], p2: &[f64]) -> bool {
    let mut better = false;
    for (a, b) in p1.iter().zip(p2)
    {
        if a > b
        {
            return false;
        }
        better |= a < b;
    }
    better
}

/// Weak dominance under minimization: `p1` is no worse than `p2` in every objective.
///
/// Equal vectors dominate each other, which is what pruning duplicates needs.
pub(crate) fn weakly_dominates(p1: &[f64], p2: &[f64]) -> bool {
    p1.iter().zip(p2).all(|(a, b)| a <= b)
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    for (a_i, b_i) in a.iter().zip(b)
    {
        match a_i.total_cmp(b_i) {
            Ordering::Equal => (),
            other => return other,
        }
    }
    Ordering::Equal
}

/// ENS-SS over `pop` with a pluggable dominance relation
fn sort_fronts(pop: &[Vec<f64>], dominance: fn(&[f64], &[f64]) -> bool) -> Vec<Vec<usize>> {
    let mut indices = (0..pop.len()).collect::<Vec<usize>>();
    indices.sort_by(|&a, &b| lexicographic(&pop[a], &pop[b]));

    let mut fronts: Vec<Vec<usize>> = vec![];
    for &n in indices.iter()
    {
        let mut k = 0;
        while k < fronts.len()
        {
            let contain_dominating_n = fronts[k]
                .iter()
                .rev()
                .any(|&i| dominance(&pop[i], &pop[n]));

            if !contain_dominating_n
            {
                fronts[k].push(n);
                break;
            }
            else
            {
                k += 1;
            }
        }

        if k == fronts.len()
        {
            fronts.push(vec![n]);
        }
    }

    fronts
}

/// Efficient non-dominated sorting (ENS-SS).
///
/// Returns the fronts as lists of indices into `pop`, best front first.
/// Duplicated objective vectors land on the same front.
pub fn ens_nondominated_sorting(pop: &[Vec<f64>]) -> Vec<Vec<usize>> {
    sort_fronts(pop, dominates)
}

/// The set with weakly dominated points and duplicates removed, in input order
pub(crate) fn nondominated_points(points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    if points.len() < 2
    {
        return points;
    }

    let mut first_front = sort_fronts(&points, weakly_dominates)
        .into_iter()
        .next()
        .unwrap_or_default();
    first_front.sort_unstable();

    let mut points = points.into_iter().map(Some).collect::<Vec<_>>();

    first_front
        .into_iter()
        .filter_map(|index| points[index].take())
        .collect()
}
