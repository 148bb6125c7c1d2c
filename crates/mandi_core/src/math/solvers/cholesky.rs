//! Cholesky factorisation and least squares.

use num_traits::Float;

use crate::types::SolverError;

/// Solve `A x = b` using Cholesky decomposition (`A = L Lᵀ`).
///
/// # Errors
///
/// - `SolverError::EmptySystem` if `b` is empty
/// - `SolverError::DimensionMismatch` if `A` is not `n × n`
/// - `SolverError::NotPositiveDefinite` if a pivot is not strictly positive
pub fn solve_cholesky<T: Float>(a: &[Vec<T>], b: &[T]) -> Result<Vec<T>, SolverError> {
    let n = b.len();
    if n == 0 {
        return Err(SolverError::EmptySystem("no unknowns".to_string()));
    }
    if a.len() != n {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            got: a.len(),
        });
    }
    if let Some(row) = a.iter().find(|row| row.len() != n) {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            got: row.len(),
        });
    }

    let tiny = T::from(1e-30).unwrap_or_else(T::min_positive_value);
    let mut l = vec![vec![T::zero(); n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum = sum - l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= T::zero() || sum.is_nan() {
                    return Err(SolverError::NotPositiveDefinite { pivot: i });
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < tiny {
                    return Err(SolverError::NotPositiveDefinite { pivot: j });
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![T::zero(); n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: Lᵀ x = y
    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum = sum - l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Ok(x)
}

/// Ridge-regularised ordinary least squares.
///
/// Solves `(XᵀX + λI') β = Xᵀy` where `I'` is the identity with a zero in the
/// first diagonal entry, so column 0 (the intercept) is never shrunk.
///
/// # Arguments
///
/// * `design` - Row-major design matrix `X` (`n_obs × n_params`)
/// * `targets` - Observations `y` (`n_obs`)
/// * `ridge` - Penalty `λ ≥ 0` on non-intercept coefficients
pub fn least_squares<T: Float>(
    design: &[Vec<T>],
    targets: &[T],
    ridge: T,
) -> Result<Vec<T>, SolverError> {
    let n_obs = design.len();
    if n_obs == 0 {
        return Err(SolverError::EmptySystem("no observations".to_string()));
    }
    if targets.len() != n_obs {
        return Err(SolverError::DimensionMismatch {
            expected: n_obs,
            got: targets.len(),
        });
    }

    let n_params = design[0].len();
    if let Some(row) = design.iter().find(|row| row.len() != n_params) {
        return Err(SolverError::DimensionMismatch {
            expected: n_params,
            got: row.len(),
        });
    }

    let mut xtx = vec![vec![T::zero(); n_params]; n_params];
    let mut xty = vec![T::zero(); n_params];

    for (row, &y) in design.iter().zip(targets) {
        for i in 0..n_params {
            xty[i] = xty[i] + row[i] * y;
            for j in 0..=i {
                xtx[i][j] = xtx[i][j] + row[i] * row[j];
            }
        }
    }

    // Mirror the lower triangle
    for i in 0..n_params {
        for j in (i + 1)..n_params {
            xtx[i][j] = xtx[j][i];
        }
    }

    for (i, row) in xtx.iter_mut().enumerate().skip(1) {
        row[i] = row[i] + ridge;
    }

    solve_cholesky(&xtx, &xty)
}
