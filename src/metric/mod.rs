//! Similarity and distance functions

pub mod euclidean;
pub mod kernel_distance;
pub mod polynomial;
pub mod rbf;
pub mod selection;
pub mod traits;

pub use self::euclidean::*;
pub use self::kernel_distance::*;
pub use self::polynomial::*;
pub use self::rbf::*;
pub use self::selection::*;
pub use self::traits::*;
