//! Record counts over time.
//!
//! Every record with a valid timestamp bumps four counters at once: day
//! (`YYYY-MM-DD`), ISO week (`YYYY-Www`), month (`M/YYYY`) and year
//! (`YYYY`). All keys are computed in UTC.
//!
//! Month series are sorted chronologically. Day, week and year series keep
//! the order in which each key was first seen.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::views::{CohortViews, PeriodCount, TrendPoint};

/// Which time series the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] =
        [Timeframe::Day, Timeframe::Week, Timeframe::Month, Timeframe::Year];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Day => "Day",
            Timeframe::Week => "Week",
            Timeframe::Month => "Month",
            Timeframe::Year => "Year",
        }
    }

    /// The precomputed series for this timeframe.
    pub fn series<'a>(&self, views: &'a CohortViews) -> &'a [PeriodCount] {
        match self {
            Timeframe::Day => &views.daily_data,
            Timeframe::Week => &views.weekly_data,
            Timeframe::Month => &views.monthly_data,
            Timeframe::Year => &views.yearly_data,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown timeframe '{s}' (expected day, week, month or year)"))
    }
}

pub fn day_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// ISO-8601 week key. The year is the ISO week-numbering year, so
/// 2021-01-01 (a Friday) is `2020-W53`.
pub fn week_key(at: &DateTime<Utc>) -> String {
    let week = at.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

pub fn month_key(at: &DateTime<Utc>) -> String {
    format!("{}/{}", at.month(), at.year())
}

pub fn year_key(at: &DateTime<Utc>) -> String {
    format!("{:04}", at.year())
}

/// Sort key for an `M/YYYY` label: year major, month minor.
fn month_order(key: &str) -> Option<(i32, u32)> {
    let (month, year) = key.split_once('/')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}

/// Counts keyed by period, remembering first-seen order.
#[derive(Debug, Default)]
struct PeriodCounter {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl PeriodCounter {
    fn bump(&mut self, key: String) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
                self.order.push(key);
            }
        }
    }

    fn into_series(self) -> Vec<PeriodCount> {
        let PeriodCounter { order, counts } = self;
        order
            .into_iter()
            .map(|period| {
                let count = counts.get(&period).copied().unwrap_or_default();
                PeriodCount { period, count }
            })
            .collect()
    }
}

/// The five time-based views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub trend: Vec<TrendPoint>,
    pub daily: Vec<PeriodCount>,
    pub weekly: Vec<PeriodCount>,
    pub monthly: Vec<PeriodCount>,
    pub yearly: Vec<PeriodCount>,
}

/// Accumulates timestamps into every granularity in one pass.
#[derive(Debug, Default)]
pub struct TimeSeriesTally {
    daily: PeriodCounter,
    weekly: PeriodCounter,
    monthly: PeriodCounter,
    yearly: PeriodCounter,
}

impl TimeSeriesTally {
    pub fn record(&mut self, at: &DateTime<Utc>) {
        self.daily.bump(day_key(at));
        self.weekly.bump(week_key(at));
        self.monthly.bump(month_key(at));
        self.yearly.bump(year_key(at));
    }

    pub fn finish(self) -> TimeSeries {
        let mut monthly = self.monthly.into_series();
        monthly.sort_by_key(|p| month_order(&p.period));

        let trend = monthly
            .iter()
            .map(|p| TrendPoint { month: p.period.clone(), predictions: p.count })
            .collect();

        TimeSeries {
            trend,
            daily: self.daily.into_series(),
            weekly: self.weekly.into_series(),
            monthly,
            yearly: self.yearly.into_series(),
        }
    }
}
