use std::f64::consts::PI;

use thiserror::Error;

/// Newton iterations applied to each closed-form root.
const POLISH_ITERS: usize = 3;

/// Errors that can occur when solving a polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RootError {
    #[error("polynomial is degenerate: every non-constant coefficient is zero")]
    Degenerate,

    #[error("coefficient is not finite: {value}")]
    NonFiniteCoefficient { value: f64 },
}

/// Returns every real root of `a·x³ + b·x² + c·x + d = 0`, ascending.
///
/// Uses the closed-form Cardano/trigonometric solution and refines each root
/// with a few Newton steps on the original polynomial.
/// Repeated roots are reported once.
///
/// A zero leading coefficient falls back to the quadratic or linear case, so
/// callers never need to assume how many real roots exist.
///
/// # Errors
///
/// Returns [`RootError::NonFiniteCoefficient`] if any coefficient is NaN or
/// infinite, and [`RootError::Degenerate`] if `a`, `b` and `c` are all zero.
///
/// # Example
///
/// ```
/// use hystor_solve::cubic_real_roots;
///
/// // (x - 1)(x - 2)(x - 3)
/// let roots = cubic_real_roots(1.0, -6.0, 11.0, -6.0).unwrap();
/// assert_eq!(roots.len(), 3);
/// assert!((roots[2] - 3.0).abs() < 1e-12);
/// ```
pub fn cubic_real_roots(a: f64, b: f64, c: f64, d: f64) -> Result<Vec<f64>, RootError> {
    for value in [a, b, c, d] {
        if !value.is_finite() {
            return Err(RootError::NonFiniteCoefficient { value });
        }
    }

    if a == 0.0 {
        return quadratic_real_roots(b, c, d);
    }

    // Normalize to x³ + B·x² + C·x + D and substitute x = t − B/3,
    // giving the depressed cubic t³ + p·t + q.
    let (b_n, c_n, d_n) = (b / a, c / a, d / a);
    let shift = b_n / 3.0;
    let p = c_n - b_n * b_n / 3.0;
    let q = 2.0 * b_n.powi(3) / 27.0 - b_n * c_n / 3.0 + d_n;
    let discriminant = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    let depressed: Vec<f64> = if discriminant > 0.0 {
        let sqrt_disc = discriminant.sqrt();
        vec![(-q / 2.0 + sqrt_disc).cbrt() + (-q / 2.0 - sqrt_disc).cbrt()]
    } else if discriminant == 0.0 {
        if p == 0.0 {
            vec![0.0]
        } else {
            vec![3.0 * q / p, -3.0 * q / (2.0 * p)]
        }
    } else {
        // Three distinct real roots, p < 0 here.
        let m = 2.0 * (-p / 3.0).sqrt();
        let arg = (3.0 * q / (p * m)).clamp(-1.0, 1.0);
        let theta = arg.acos() / 3.0;
        (0..3_u8)
            .map(|k| m * (theta - 2.0 * PI * f64::from(k) / 3.0).cos())
            .collect()
    };

    let mut roots: Vec<f64> = depressed
        .into_iter()
        .map(|t| polish(t - shift, [a, b, c, d]))
        .collect();

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|x, y| (*x - *y).abs() <= 1e-12 * x.abs().max(y.abs()).max(1.0));
    Ok(roots)
}

/// Real roots of `a·x² + b·x + c = 0`, ascending.
fn quadratic_real_roots(a: f64, b: f64, c: f64) -> Result<Vec<f64>, RootError> {
    if a == 0.0 {
        if b == 0.0 {
            return Err(RootError::Degenerate);
        }
        return Ok(vec![-c / b]);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Ok(Vec::new());
    }
    if discriminant == 0.0 {
        return Ok(vec![-b / (2.0 * a)]);
    }

    // Avoids cancellation when b² ≫ 4ac.
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let mut roots = vec![q / a, c / q];
    roots.sort_by(f64::total_cmp);
    Ok(roots)
}

/// Refines a root estimate with Newton steps, keeping the estimate if a step
/// would not improve the residual.
fn polish(mut x: f64, [a, b, c, d]: [f64; 4]) -> f64 {
    let eval = |x: f64| ((a * x + b) * x + c) * x + d;
    let slope = |x: f64| (3.0 * a * x + 2.0 * b) * x + c;

    for _ in 0..POLISH_ITERS {
        let f = eval(x);
        let df = slope(x);
        if f == 0.0 || df == 0.0 {
            break;
        }
        let next = x - f / df;
        if !next.is_finite() || eval(next).abs() >= f.abs() {
            break;
        }
        x = next;
    }
    x
}
