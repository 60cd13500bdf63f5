//! Lloyd's k-means with k-means++ seeding.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use petrodash_core::{PetroError, PetroResult};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub max_iter: usize,
    /// Independent initialisations; the lowest inertia wins.
    pub n_init: usize,
    /// Convergence threshold on total squared centroid shift, relative to
    /// the mean feature variance.
    pub tolerance: f64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub centroids: Array2<f64>,
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeansFit {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.nrows()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            seed,
        }
    }

    pub fn fit(&self, x: &Array2<f64>) -> PetroResult<KMeansFit> {
        let n = x.nrows();
        if self.k == 0 || self.k > n {
            return Err(PetroError::InvalidInput(format!(
                "cannot form {} clusters from {} samples",
                self.k, n
            )));
        }

        let mean_variance = x.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0);
        let threshold = self.tolerance * mean_variance;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.n_init.max(1) {
            let fit = self.lloyd(x, self.init_centroids(x, &mut rng), threshold);
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| PetroError::Model("k-means produced no fit".into()))
    }

    /// k-means++: each next centre is drawn with probability proportional to
    /// its squared distance from the nearest centre chosen so far.
    fn init_centroids(&self, x: &Array2<f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = x.nrows();
        let mut centroids = Array2::<f64>::zeros((self.k, x.ncols()));
        centroids.row_mut(0).assign(&x.row(rng.gen_range(0..n)));

        let mut nearest: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|r| squared_distance(r, centroids.row(0)))
            .collect();

        for c in 1..self.k {
            let total: f64 = nearest.iter().sum();
            let chosen = if total > 0.0 {
                let mut target = rng.gen::<f64>() * total;
                let mut idx = n - 1;
                for (i, d) in nearest.iter().enumerate() {
                    if target < *d {
                        idx = i;
                        break;
                    }
                    target -= d;
                }
                idx
            } else {
                rng.gen_range(0..n)
            };
            centroids.row_mut(c).assign(&x.row(chosen));

            for (i, row) in x.rows().into_iter().enumerate() {
                let d = squared_distance(row, centroids.row(c));
                if d < nearest[i] {
                    nearest[i] = d;
                }
            }
        }
        centroids
    }

    fn lloyd(&self, x: &Array2<f64>, mut centroids: Array2<f64>, threshold: f64) -> KMeansFit {
        let mut labels = vec![0usize; x.nrows()];
        let mut iterations = 0;

        for iter in 0..self.max_iter.max(1) {
            iterations = iter + 1;
            assign(x, &centroids, &mut labels);

            let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
            let mut counts = vec![0usize; self.k];
            for (row, &label) in x.rows().into_iter().zip(labels.iter()) {
                let mut target = sums.row_mut(label);
                target += &row;
                counts[label] += 1;
            }

            let mut shift = 0.0;
            for c in 0..self.k {
                // Empty clusters keep their previous centre.
                if counts[c] == 0 {
                    continue;
                }
                let updated: Array1<f64> = sums.row(c).mapv(|v| v / counts[c] as f64);
                shift += squared_distance(updated.view(), centroids.row(c));
                centroids.row_mut(c).assign(&updated);
            }

            if shift <= threshold {
                break;
            }
        }

        let inertia = assign(x, &centroids, &mut labels);
        debug!(k = self.k, iterations, inertia, "k-means run converged");

        KMeansFit {
            centroids,
            labels,
            inertia,
            iterations,
        }
    }
}

/// Label every row with its nearest centroid (lowest index on ties) and
/// return the inertia.
fn assign(x: &Array2<f64>, centroids: &Array2<f64>, labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (i, row) in x.rows().into_iter().enumerate() {
        let (label, dist) = centroids
            .rows()
            .into_iter()
            .map(|c| squared_distance(row, c))
            .enumerate()
            .fold((0, f64::INFINITY), |best, (c, d)| if d < best.1 { (c, d) } else { best });
        labels[i] = label;
        inertia += dist;
    }
    inertia
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
