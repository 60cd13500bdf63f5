use crate::charts::{LineChart, LineSeries, Point, SeriesData};
use petrodash_rl_engine::BanditRun;

fn per_arm(runs: &[BanditRun], chart: LineChart, pick: impl Fn(&BanditRun, usize) -> f64) -> LineChart {
    let series = runs
        .iter()
        .map(|run| LineSeries {
            name: format!("epsilon={}", run.epsilon),
            data: SeriesData::Numeric(
                (0..run.counts.len())
                    .map(|arm| Point {
                        x: arm as f64,
                        y: pick(run, arm),
                    })
                    .collect(),
            ),
        })
        .collect();
    LineChart { series, ..chart }
}

/// Selection counts, value estimates, and `count * value` per arm, one
/// series per exploration rate. The weighted values are drawn twice, on a
/// log and on a linear x axis.
pub fn bandit_charts(runs: &[BanditRun]) -> Vec<LineChart> {
    vec![
        per_arm(
            runs,
            LineChart::new("Epsilon-greedy selections", "Action", "Number of times action was selected"),
            |run, arm| run.counts[arm] as f64,
        ),
        per_arm(
            runs,
            LineChart::new("Epsilon-greedy estimates", "Action", "Value of the action"),
            |run, arm| run.values[arm],
        ),
        per_arm(
            runs,
            LineChart::new("Epsilon-greedy weighted values", "Action", "Value of the action").with_log_x(),
            |run, arm| run.weighted[arm],
        ),
        per_arm(
            runs,
            LineChart::new("Epsilon-greedy weighted values", "Action", "Value of the action"),
            |run, arm| run.weighted[arm],
        ),
    ]
}
