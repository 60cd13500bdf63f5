//! Reward sequence built from one price column.

use tracing::debug;

/// Ordered rewards, one per historical record.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardSeries {
    values: Vec<f64>,
    dropped: usize,
}

impl RewardSeries {
    /// Build from a positional price column. Missing prices are either kept
    /// as NaN, preserving record positions, or dropped.
    pub fn from_column(column: Vec<Option<f64>>, drop_missing: bool) -> Self {
        let total = column.len();
        let values: Vec<f64> = if drop_missing {
            column.into_iter().flatten().collect()
        } else {
            column.into_iter().map(|p| p.unwrap_or(f64::NAN)).collect()
        };
        let dropped = total - values.len();
        if dropped > 0 {
            debug!(dropped, kept = values.len(), "Dropped records without a price");
        }
        Self { values, dropped }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_missing_as_nan() {
        let series = RewardSeries::from_column(vec![Some(1.8), None, Some(1.9)], false);
        assert_eq!(series.len(), 3);
        assert!(series.as_slice()[1].is_nan());
        assert_eq!(series.missing(), 1);
        assert_eq!(series.dropped(), 0);
    }

    #[test]
    fn test_drop_missing() {
        let series = RewardSeries::from_column(vec![None, Some(1.8), None, Some(1.9)], true);
        assert_eq!(series.as_slice(), &[1.8, 1.9]);
        assert_eq!(series.dropped(), 2);
        assert_eq!(series.missing(), 0);
    }
}
