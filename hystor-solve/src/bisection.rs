//! Bracketed root finding by interval halving.
//!
//! Used where a model is monotone in one unknown but has no closed-form
//! inverse, such as finding the stack current that draws a requested power.

mod config;
mod error;

pub use config::Config;
pub use error::Error;

/// How the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The bracket or the residual met its tolerance.
    Converged,
    /// The iteration limit was reached; `x` is the best point seen.
    MaxIters,
}

/// Result of a bisection solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub x: f64,
    pub residual: f64,
    pub iters: usize,
    pub status: Status,
}

/// Finds a root of `f` inside `bracket` by bisection.
///
/// The residual must change sign across the bracket (or vanish at one end).
///
/// # Errors
///
/// Returns an error if the config or bracket is invalid, the bracket does not
/// straddle a root, or `f` returns a non-finite value.
///
/// # Example
///
/// ```
/// use hystor_solve::bisection::{self, Config, Status};
///
/// let solution = bisection::solve(|x| x * x - 2.0, [0.0, 2.0], &Config::default()).unwrap();
/// assert_eq!(solution.status, Status::Converged);
/// assert!((solution.x - 2.0_f64.sqrt()).abs() < 1e-9);
/// ```
pub fn solve<F>(mut f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error>
where
    F: FnMut(f64) -> f64,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let (mut left, mut right) = validate_bracket(bracket)?;

    let mut residual_at = |x: f64| {
        let residual = f(x);
        if residual.is_finite() {
            Ok(residual)
        } else {
            Err(Error::NonFiniteResidual { x, residual })
        }
    };

    let mut left_residual = residual_at(left)?;
    if left_residual.abs() <= config.residual_tol {
        return Ok(converged(left, left_residual, 0));
    }

    let right_residual = residual_at(right)?;
    if right_residual.abs() <= config.residual_tol {
        return Ok(converged(right, right_residual, 0));
    }

    if left_residual.signum() == right_residual.signum() {
        return Err(Error::NoBracket {
            left,
            right,
            left_residual,
            right_residual,
        });
    }

    let (mut best, mut best_residual) = if left_residual.abs() <= right_residual.abs() {
        (left, left_residual)
    } else {
        (right, right_residual)
    };

    for iter in 1..=config.max_iters {
        let mid = 0.5 * (left + right);
        let mid_residual = residual_at(mid)?;

        let x_converged = (right - left).abs() <= config.x_abs_tol + config.x_rel_tol * mid.abs();
        if x_converged || mid_residual.abs() <= config.residual_tol {
            return Ok(converged(mid, mid_residual, iter));
        }

        if mid_residual.abs() < best_residual.abs() {
            best = mid;
            best_residual = mid_residual;
        }

        if left_residual.signum() == mid_residual.signum() {
            left = mid;
            left_residual = mid_residual;
        } else {
            right = mid;
        }
    }

    Ok(Solution {
        x: best,
        residual: best_residual,
        iters: config.max_iters,
        status: Status::MaxIters,
    })
}

fn converged(x: f64, residual: f64, iters: usize) -> Solution {
    Solution {
        x,
        residual,
        iters,
        status: Status::Converged,
    }
}

/// Orders the bracket and rejects degenerate ones.
fn validate_bracket([a, b]: [f64; 2]) -> Result<(f64, f64), Error> {
    for value in [a, b] {
        if !value.is_finite() {
            return Err(Error::NonFiniteBracket { value });
        }
    }
    if a == b {
        return Err(Error::ZeroWidthBracket { value: a });
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn finds_root_of_monotone_function() {
        let solution = solve(|x| x.powi(3) - 8.0, [0.0, 10.0], &Config::default()).unwrap();
        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_bracket_is_accepted() {
        let solution = solve(|x| x - 1.0, [3.0, -1.0], &Config::default()).unwrap();
        assert_relative_eq!(solution.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn root_at_bracket_end_returns_immediately() {
        let solution = solve(|x| x, [0.0, 1.0], &Config::default()).unwrap();
        assert_eq!(solution.iters, 0);
        assert_eq!(solution.x, 0.0);
    }

    #[test]
    fn rejects_bracket_without_sign_change() {
        let result = solve(|x| x * x + 1.0, [-1.0, 1.0], &Config::default());
        assert!(matches!(result, Err(Error::NoBracket { .. })));
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let config = Config::default();
        assert!(matches!(
            solve(|x| x, [1.0, 1.0], &config),
            Err(Error::ZeroWidthBracket { .. })
        ));
        assert!(matches!(
            solve(|x| x, [f64::NEG_INFINITY, 1.0], &config),
            Err(Error::NonFiniteBracket { .. })
        ));
        assert!(matches!(
            solve(|x| 1.0 / x, [-1.0, 0.0], &config),
            Err(Error::NonFiniteResidual { .. })
        ));

        let bad = Config {
            residual_tol: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            solve(|x| x, [-1.0, 1.0], &bad),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn reports_best_point_when_iterations_run_out() {
        let config = Config {
            max_iters: 3,
            x_abs_tol: 0.0,
            x_rel_tol: 0.0,
            residual_tol: 0.0,
        };
        let solution = solve(|x| x - 0.3, [0.0, 1.0], &config).unwrap();
        assert_eq!(solution.status, Status::MaxIters);
        assert!(solution.residual.abs() < 0.1);
    }
}
