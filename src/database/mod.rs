//! Instance stores answering k-nearest-neighbor queries
//!
//! The classifier only relies on the `Database` trait; this module provides
//! an in-memory store and CSV loading to fill it.

pub mod csv;
pub mod memory;

pub use self::csv::*;
pub use self::memory::*;
