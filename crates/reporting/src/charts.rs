//! Serializable chart descriptions. A plotting front-end draws them; this
//! crate only decides what goes on each axis.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    /// `None` renders as an empty bar.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            bars: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: Option<f64>) {
        self.bars.push(Bar {
            label: label.into(),
            value,
        });
    }

    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.bars.iter().find(|b| b.label == label).and_then(|b| b.value)
    }
}

/// Bars grouped by category, one bar per series within each group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<String>,
    /// `values[category][series]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl GroupedBarChart {
    pub fn value(&self, category: &str, series: &str) -> Option<f64> {
        let c = self.categories.iter().position(|x| x == category)?;
        let s = self.series.iter().position(|x| x == series)?;
        self.values[c][s]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line over categorical x positions (months, for example).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    pub category: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum SeriesData {
    Numeric(Vec<Point>),
    Categorical(Vec<CategoryPoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub data: SeriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default)]
    pub log_x: bool,
    /// Fixed `[min, max]` of the y axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_domain: Option<[f64; 2]>,
    /// Sort order of the x axis for categorical series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x_categories: Vec<String>,
    pub series: Vec<LineSeries>,
}

impl LineChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            log_x: false,
            y_domain: None,
            x_categories: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn with_log_x(mut self) -> Self {
        self.log_x = true;
        self
    }

    pub fn with_y_domain(mut self, min: f64, max: f64) -> Self {
        self.y_domain = Some([min, max]);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterGroup {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<ScatterGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_lookup() {
        let mut chart = BarChart::new("t", "x", "y");
        chart.push("Gazole", Some(1.8));
        chart.push("E85", None);
        assert_eq!(chart.value_of("Gazole"), Some(1.8));
        assert_eq!(chart.value_of("E85"), None);
        assert_eq!(chart.value_of("SP98"), None);
    }

    #[test]
    fn test_line_chart_serialization() {
        let mut chart = LineChart::new("t", "x", "y").with_log_x();
        chart.series.push(LineSeries {
            name: "epsilon = 0.1".into(),
            data: SeriesData::Numeric(vec![Point { x: 0.0, y: 3.0 }]),
        });
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["log_x"], true);
        assert!(json.get("y_domain").is_none());
        assert_eq!(json["series"][0]["data"]["kind"], "numeric");
        assert_eq!(json["series"][0]["data"]["points"][0]["y"], 3.0);
    }

    #[test]
    fn test_grouped_lookup() {
        let chart = GroupedBarChart {
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            categories: vec!["Bretagne".into()],
            series: vec!["E10".into(), "Gazole".into()],
            values: vec![vec![Some(1.0), None]],
        };
        assert_eq!(chart.value("Bretagne", "E10"), Some(1.0));
        assert_eq!(chart.value("Bretagne", "Gazole"), None);
        assert_eq!(chart.value("Corse", "E10"), None);
    }
}
