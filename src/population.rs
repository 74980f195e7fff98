use crate::ens_nondominating_sorting::ens_nondominated_sorting;
use crate::hv_error::{HvError, HvResult};

/// Anything that can hand over the objective vectors of its individuals.
pub trait Population {
    fn fitness_vectors(&self) -> Vec<Vec<f64>>;

    /// Objective vectors of the `front_idx`-th non-dominated front, in population order
    fn front(&self, front_idx: usize) -> HvResult<Vec<Vec<f64>>> {
        let fitness = self.fitness_vectors();
        let fronts = ens_nondominated_sorting(&fitness);

        let mut front = fronts
            .get(front_idx)
            .ok_or(HvError::IndexOutOfRange {
                index: front_idx,
                len: fronts.len(),
            })?
            .clone();
        front.sort_unstable();

        Ok(front.into_iter().map(|index| fitness[index].clone()).collect())
    }
}

impl Population for [Vec<f64>] {
    fn fitness_vectors(&self) -> Vec<Vec<f64>> {
        self.to_vec()
    }
}

impl Population for Vec<Vec<f64>> {
    fn fitness_vectors(&self) -> Vec<Vec<f64>> {
        self.clone()
    }
}

/// The `(values, solution)` pairs returned by an optimizer's best solutions
impl<S> Population for Vec<(Vec<f64>, S)> {
    fn fitness_vectors(&self) -> Vec<Vec<f64>> {
        self.iter().map(|(values, _)| values.clone()).collect()
    }
}
