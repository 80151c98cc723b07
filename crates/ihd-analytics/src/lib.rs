//! # ihd-analytics
//!
//! Cohort-level analytics for the IHD risk dashboard.
//!
//! `aggregate` turns a cohort snapshot and a scatter-axis selection into
//! every chart-ready view at once. It is recomputed from scratch on each
//! call; `CohortDashboard` adds memoization keyed by snapshot and axes.

pub mod aggregate;
pub mod dashboard;
pub mod scatter;
pub mod timeseries;
pub mod views;

pub use aggregate::{aggregate, AgeBand, BmiCategory};
pub use dashboard::CohortDashboard;
pub use scatter::{scatter_cloud, ScatterAxes, ScatterFeature, ScatterPoint};
pub use timeseries::Timeframe;
pub use views::CohortViews;
