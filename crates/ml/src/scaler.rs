use ndarray::{Array1, Array2, Axis};
use petrodash_core::{PetroError, PetroResult};

/// Per-column standardisation to zero mean and unit variance.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Learn column means and population standard deviations. Constant
    /// columns get a scale of 1 so they transform to zero.
    pub fn fit(x: &Array2<f64>) -> PetroResult<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PetroError::InvalidInput("cannot scale an empty matrix".into()))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.scale
    }

    pub fn fit_transform(x: &Array2<f64>) -> PetroResult<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x);
        Ok((scaler, scaled))
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}
