//! A memoized view over the aggregator.
//!
//! The host calls `views` whenever it re-renders. The aggregate is
//! recomputed only when the snapshot or the axis selection differs from the
//! previous call; changing the timeframe never recomputes anything. Patient
//! ids take no part in the comparison, so re-reading a snapshot whose
//! documents carry no id is still a cache hit.

use tracing::debug;

use ihd_contracts::patient::Cohort;

use crate::{
    aggregate::aggregate,
    scatter::{ScatterAxes, ScatterFeature},
    timeseries::Timeframe,
    views::{CohortViews, PeriodCount},
};

struct Memo {
    cohort: Cohort,
    axes: ScatterAxes,
    views: CohortViews,
}

/// Dashboard state: selected axes and timeframe plus the last computed views.
#[derive(Default)]
pub struct CohortDashboard {
    axes: ScatterAxes,
    timeframe: Timeframe,
    memo: Option<Memo>,
    recomputations: u64,
}

impl CohortDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axes(&self) -> ScatterAxes {
        self.axes
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn select_x(&mut self, feature: ScatterFeature) {
        self.axes.select_x(feature);
    }

    pub fn select_y(&mut self, feature: ScatterFeature) {
        self.axes.select_y(feature);
    }

    pub fn set_axes(&mut self, axes: ScatterAxes) {
        self.axes = axes;
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
    }

    /// How many times the aggregate has actually been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Views for `cohort` under the current axes.
    pub fn views(&mut self, cohort: &Cohort) -> &CohortViews {
        let stale = match &self.memo {
            Some(memo) => memo.axes != self.axes || !memo.cohort.same_contents(cohort),
            None => true,
        };

        if stale {
            self.recomputations += 1;
            debug!(
                patients = cohort.patient_count(),
                recomputations = self.recomputations,
                "recomputing dashboard views"
            );
            self.memo = None;
        }

        let axes = self.axes;
        &self
            .memo
            .get_or_insert_with(|| Memo {
                cohort: cohort.clone(),
                axes,
                views: aggregate(cohort, &axes),
            })
            .views
    }

    /// The time series for the selected timeframe.
    pub fn time_series(&mut self, cohort: &Cohort) -> &[PeriodCount] {
        let timeframe = self.timeframe;
        timeframe.series(self.views(cohort))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cohort(bmi: f64) -> Cohort {
        serde_json::from_value(json!([{
            "firstname": "Yaw", "lastname": "Asante", "age": 66, "sex": "Male", "userid": "u1",
            "records": [
                { "BMI": bmi, "cholesterol_level": 5.5, "timestamp": "2024-04-02T10:00:00Z" },
                { "BMI": bmi, "timestamp": "2025-04-02T10:00:00Z" }
            ]
        }]))
        .unwrap()
    }

    #[test]
    fn unchanged_inputs_do_not_recompute() {
        let mut dash = CohortDashboard::new();
        let c = cohort(27.0);

        let first = dash.views(&c).clone();
        let second = dash.views(&c).clone();

        assert_eq!(first, second);
        assert_eq!(dash.recomputations(), 1);
    }

    #[test]
    fn reloaded_snapshot_without_ids_is_a_cache_hit() {
        let mut dash = CohortDashboard::new();
        let first = cohort(27.0);
        let reloaded = cohort(27.0);
        assert_ne!(first.patients[0].id, reloaded.patients[0].id);

        dash.views(&first);
        dash.views(&reloaded);

        assert_eq!(dash.recomputations(), 1);
    }

    #[test]
    fn new_snapshot_recomputes() {
        let mut dash = CohortDashboard::new();
        dash.views(&cohort(27.0));
        let views = dash.views(&cohort(31.0)).clone();

        assert_eq!(dash.recomputations(), 2);
        assert_eq!(views.bmi_data.average, Some(31.0));
    }

    #[test]
    fn axis_change_recomputes_scatter() {
        let mut dash = CohortDashboard::new();
        let c = cohort(27.0);
        assert_eq!(dash.views(&c).scatter_data.len(), 1);

        dash.select_y(ScatterFeature::Bmi);
        assert_eq!(dash.views(&c).scatter_data.len(), 2);
        assert_eq!(dash.recomputations(), 2);
    }

    #[test]
    fn timeframe_change_is_a_lookup() {
        let mut dash = CohortDashboard::new();
        let c = cohort(27.0);

        assert_eq!(dash.time_series(&c).len(), 2);
        dash.set_timeframe(Timeframe::Year);
        let years: Vec<String> = dash.time_series(&c).iter().map(|p| p.period.clone()).collect();

        assert_eq!(years, vec!["2024", "2025"]);
        assert_eq!(dash.recomputations(), 1);
    }
}
