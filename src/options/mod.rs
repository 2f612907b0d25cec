//! Configuration parameters and cross-parameter constraints

pub mod constraints;
pub mod parameter;

pub use self::constraints::*;
pub use self::parameter::*;
