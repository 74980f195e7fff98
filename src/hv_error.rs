use thiserror::Error;

pub type HvResult<T> = Result<T, HvError>;

/// Errors raised at the boundary of the hypervolume engine.
///
/// All of them describe caller misuse, so nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HvError {
    /// A point or the reference point does not have the expected dimension
    #[error("Invalid dimension: expected {expected}, found {found}")]
    InvalidDimension { expected: usize, found: usize },
    /// The reference point does not weakly dominate the point at `index`
    #[error("Reference point does not dominate point {index}")]
    InvalidReferencePoint { index: usize },
    /// The operation requires at least one point
    #[error("Point set is empty")]
    EmptySet,
    /// A point index (or front index) does not exist
    #[error("Index {index} is out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
    /// Explicit algorithm override cannot handle the point set dimension
    #[error("Algorithm {algorithm} does not support dimension {dimension}")]
    UnsupportedAlgorithmForDimension { algorithm: String, dimension: usize },
    /// NaN or infinity in point `point`, or in the reference point when `None`
    #[error("Non-finite coordinate in {}", describe_point(.point))]
    NonFiniteCoordinate { point: Option<usize> },
}

fn describe_point(point: &Option<usize>) -> String {
    match point {
        Some(index) => format!("point {}", index),
        None => "reference point".to_string(),
    }
}
