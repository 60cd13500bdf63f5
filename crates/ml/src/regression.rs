//! Ordinary least squares and its evaluation helpers.

use ndarray::{Array1, Array2};
use petrodash_core::{PetroError, PetroResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Pivots smaller than this, relative to the largest Gram entry, are treated
/// as zero.
const PIVOT_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit `y ≈ x·w + b` by solving the normal equations.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> PetroResult<Self> {
        let (n, p) = x.dim();
        if n == 0 {
            return Err(PetroError::InvalidInput("no training samples".into()));
        }
        if y.len() != n {
            return Err(PetroError::InvalidInput(format!(
                "{} samples but {} targets",
                n,
                y.len()
            )));
        }

        // Design matrix with a trailing column of ones for the intercept.
        let mut design = Array2::<f64>::ones((n, p + 1));
        design.slice_mut(ndarray::s![.., ..p]).assign(x);

        let gram = design.t().dot(&design);
        let rhs = design.t().dot(y);
        let solution = solve_least_squares(gram, rhs)?;

        Ok(Self {
            coefficients: solution.slice(ndarray::s![..p]).to_owned(),
            intercept: solution[p],
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Gauss-Jordan elimination with partial pivoting. Columns without a usable
/// pivot get a zero coefficient instead of failing, so collinear features
/// still yield a fit.
fn solve_least_squares(mut a: Array2<f64>, mut b: Array1<f64>) -> PetroResult<Array1<f64>> {
    let n = b.len();
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(PetroError::Model("non-finite values in design matrix".into()));
    }
    let magnitude = a.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let tolerance = PIVOT_TOLERANCE * magnitude.max(1.0);

    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(n);
    let mut row = 0;
    for col in 0..n {
        if row == n {
            break;
        }
        let (best, best_abs) = (row..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((row, -1.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if best_abs <= tolerance {
            continue;
        }
        if best != row {
            for c in 0..n {
                a.swap([row, c], [best, c]);
            }
            b.swap(row, best);
        }

        let pivot = a[[row, col]];
        for r in 0..n {
            if r == row {
                continue;
            }
            let factor = a[[r, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                let v = a[[row, c]];
                a[[r, c]] -= factor * v;
            }
            let pivot_rhs = b[row];
            b[r] -= factor * pivot_rhs;
        }
        pivots.push((row, col));
        row += 1;
    }

    let mut x = Array1::<f64>::zeros(n);
    for (r, c) in pivots {
        x[c] = b[r] / a[[r, c]];
    }
    Ok(x)
}

pub fn mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let diff = actual - predicted;
    diff.mapv(|d| d * d).mean().unwrap_or(0.0)
}

/// Shuffle `0..n` with a seeded generator and split off
/// `ceil(n * test_size)` test indices. Both sides keep at least one sample.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> PetroResult<(Vec<usize>, Vec<usize>)> {
    if n < 2 {
        return Err(PetroError::InvalidInput(format!(
            "need at least 2 samples to split, got {}",
            n
        )));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PetroError::InvalidInput(format!(
            "test size {} is not in (0, 1)",
            test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let n_test = ((n as f64 * test_size).ceil() as usize).clamp(1, n - 1);
    let train = indices.split_off(n_test);
    Ok((train, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recovers_exact_plane() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 3.0], [3.0, 5.0], [4.0, 1.0]];
        let y = x.column(0).mapv(|v| 2.0 * v) + x.column(1).mapv(|v| -0.5 * v) + 1.25;
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients()[1] + 0.5).abs() < 1e-9);
        assert!((model.intercept() - 1.25).abs() < 1e-9);
        assert!(mean_squared_error(&y, &model.predict(&x)) < 1e-12);
    }

    #[test]
    fn test_collinear_feature_does_not_fail() {
        // second column is a copy of the first
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];
        let model = LinearRegression::fit(&x, &y).unwrap();
        let pred = model.predict(&x);
        assert!(mean_squared_error(&y, &pred) < 1e-12);
    }

    #[test]
    fn test_constant_feature_after_scaling() {
        let x = array![[0.0], [0.0], [0.0]];
        let y = array![1.0, 2.0, 3.0];
        let model = LinearRegression::fit(&x, &y).unwrap();
        assert_eq!(model.coefficients()[0], 0.0);
        assert!((model.intercept() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_targets() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        assert!(matches!(
            LinearRegression::fit(&x, &y),
            Err(PetroError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mse() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 3.0, 1.0];
        assert!((mean_squared_error(&a, &b) - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let (train, test) = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        let (train2, test2) = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(train, train2);
        assert_eq!(test, test2);
    }

    #[test]
    fn test_split_keeps_both_sides() {
        let (train, test) = train_test_split(2, 0.9, 0).unwrap();
        assert_eq!((train.len(), test.len()), (1, 1));
        assert!(train_test_split(1, 0.2, 0).is_err());
        assert!(train_test_split(5, 1.0, 0).is_err());
    }
}
