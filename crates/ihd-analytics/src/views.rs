//! The named output views handed to a rendering collaborator.
//!
//! These are plain data. Field names serialize to the keys a chart layer
//! expects (`ageData`, `bmiData`, ...).

use serde::{Deserialize, Serialize};

use crate::scatter::ScatterPoint;

/// One age band and the number of patients in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBucket {
    #[serde(rename = "ageRange")]
    pub age_range: String,
    pub count: u64,
}

/// A labelled tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self { name: name.into(), value }
    }
}

/// BMI average plus category histogram.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BmiData {
    /// Mean over every valid, non-zero BMI across all records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    /// Number of readings behind `average`.
    pub samples: u64,
    pub categories: Vec<NamedCount>,
}

/// Predictions per calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub predictions: u64,
}

/// Records per period for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCount {
    pub period: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    pub total_patients: u64,
    pub total_records: u64,
    /// Record counts per tier, keyed by display label.
    pub tiers: Vec<NamedCount>,
}

/// Cohort-wide vital averages and the stroke-history tally.
///
/// An average of `None` means no record carried a usable reading. It is
/// never reported as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_systolic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_diastolic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cholesterol: Option<f64>,
    pub history_of_stroke: Vec<NamedCount>,
}

/// Every view derived from one cohort snapshot.
///
/// The default value is the empty-cohort result: every series empty, every
/// average absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortViews {
    pub age_data: Vec<AgeBucket>,
    pub gender_data: Vec<NamedCount>,
    pub bmi_data: BmiData,
    pub risk_data: Vec<NamedCount>,
    pub trend_data: Vec<TrendPoint>,
    pub daily_data: Vec<PeriodCount>,
    pub weekly_data: Vec<PeriodCount>,
    pub monthly_data: Vec<PeriodCount>,
    pub yearly_data: Vec<PeriodCount>,
    pub summary_data: SummaryData,
    pub health_metrics: HealthMetrics,
    pub scatter_data: Vec<ScatterPoint>,
}

impl CohortViews {
    /// Count for `name` in a labelled tally, zero if absent.
    pub fn count_in(tally: &[NamedCount], name: &str) -> u64 {
        tally.iter().find(|c| c.name == name).map_or(0, |c| c.value)
    }
}
