//! Numerical building blocks.
//!
//! - [`solvers`]: Cholesky factorisation and ridge-regularised least squares

pub mod solvers;
