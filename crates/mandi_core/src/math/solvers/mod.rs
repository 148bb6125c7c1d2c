//! Linear solvers for model fitting.
//!
//! ## Available Solvers
//!
//! - [`solve_cholesky`]: Solve `A x = b` for symmetric positive-definite `A`
//! - [`least_squares`]: Ridge-regularised normal equations
//!   `(XᵀX + λI') β = Xᵀy`, where `I'` leaves the intercept column unpenalised
//!
//! ## Examples
//!
//! ```
//! use mandi_core::math::solvers::least_squares;
//!
//! // Fit y = 1 + 2x exactly
//! let design: Vec<Vec<f64>> = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 2.0]];
//! let targets = vec![1.0, 3.0, 5.0];
//!
//! let beta = least_squares(&design, &targets, 0.0).unwrap();
//! assert!((beta[0] - 1.0).abs() < 1e-10);
//! assert!((beta[1] - 2.0).abs() < 1e-10);
//! ```

mod cholesky;

pub use cholesky::{least_squares, solve_cholesky};
