//! Numerical primitives for AMR snapshot analysis.

pub mod bins;
pub mod roots;
