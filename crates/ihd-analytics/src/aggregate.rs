//! The cohort aggregator.
//!
//! `aggregate` is a pure function of (snapshot, scatter axes). It never
//! fails: a reading that does not parse, or a label that matches nothing,
//! is left out of the statistic it would have fed and counted nowhere else.

use tracing::debug;

use ihd_contracts::{
    patient::{ClinicalRecord, Cohort, Patient, Sex, StrokeHistory},
    reading::Reading,
    risk::RiskTier,
};
use ihd_core::round2;

use crate::{
    scatter::{scatter_cloud, ScatterAxes},
    timeseries::TimeSeriesTally,
    views::{AgeBucket, BmiData, CohortViews, HealthMetrics, NamedCount, SummaryData},
};

// ── Bands ────────────────────────────────────────────────────────────────────

/// Patient age bands, upper bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    UpTo20,
    From21To40,
    From41To60,
    From61To80,
    Over80,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::UpTo20,
        AgeBand::From21To40,
        AgeBand::From41To60,
        AgeBand::From61To80,
        AgeBand::Over80,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::UpTo20 => "0-20",
            AgeBand::From21To40 => "21-40",
            AgeBand::From41To60 => "41-60",
            AgeBand::From61To80 => "61-80",
            AgeBand::Over80 => "81+",
        }
    }

    /// Band for an age in whole years. Negative ages fall in the lowest band.
    pub fn of(years: f64) -> AgeBand {
        match years {
            y if y <= 20.0 => AgeBand::UpTo20,
            y if y <= 40.0 => AgeBand::From21To40,
            y if y <= 60.0 => AgeBand::From41To60,
            y if y <= 80.0 => AgeBand::From61To80,
            _ => AgeBand::Over80,
        }
    }
}

/// BMI categories.
///
/// The bounds are the published ones with one decimal, so readings in
/// (24.9, 25) and (29.9, 30] belong to no category. They still count
/// towards the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Obese,
    Overweight,
    Normal,
    Underweight,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Obese,
        BmiCategory::Overweight,
        BmiCategory::Normal,
        BmiCategory::Underweight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Obese => "Obese (>30)",
            BmiCategory::Overweight => "Overweight (25-29.9)",
            BmiCategory::Normal => "Normal (18.5-24.9)",
            BmiCategory::Underweight => "Underweight (<18.5)",
        }
    }

    pub fn of(bmi: f64) -> Option<BmiCategory> {
        if bmi > 30.0 {
            Some(BmiCategory::Obese)
        } else if (25.0..=29.9).contains(&bmi) {
            Some(BmiCategory::Overweight)
        } else if (18.5..=24.9).contains(&bmi) {
            Some(BmiCategory::Normal)
        } else if bmi < 18.5 {
            Some(BmiCategory::Underweight)
        } else {
            None
        }
    }

    fn index(&self) -> usize {
        match self {
            BmiCategory::Obese => 0,
            BmiCategory::Overweight => 1,
            BmiCategory::Normal => 2,
            BmiCategory::Underweight => 3,
        }
    }
}

// ── Accumulators ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Two-decimal mean, or `None` with no samples.
    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| round2(self.sum / self.count as f64))
    }
}

#[derive(Debug, Default)]
struct Tally {
    age: [u64; 5],
    male: u64,
    female: u64,
    bmi: Mean,
    bmi_categories: [u64; 4],
    tiers: [u64; 4],
    systolic: Mean,
    diastolic: Mean,
    cholesterol: Mean,
    stroke_yes: u64,
    stroke_no: u64,
    time: TimeSeriesTally,
    /// Readings present but unparsable, for diagnostics only.
    excluded: u64,
}

impl Tally {
    fn patient(&mut self, patient: &Patient) {
        if let Some(years) = patient.age.value() {
            let band = AgeBand::of(years.trunc());
            if let Some(i) = AgeBand::ALL.iter().position(|b| *b == band) {
                self.age[i] += 1;
            }
        }
        self.note_invalid(&patient.age);

        match patient.sex.as_deref().and_then(Sex::from_label) {
            Some(Sex::Male) => self.male += 1,
            Some(Sex::Female) => self.female += 1,
            None => {}
        }
    }

    fn record(&mut self, record: &ClinicalRecord) {
        if let Some(bmi) = record.bmi.nonzero() {
            self.bmi.push(Some(bmi));
            if let Some(category) = BmiCategory::of(bmi) {
                self.bmi_categories[category.index()] += 1;
            }
        }

        if let Some(tier) = record.risk_result.as_deref().and_then(RiskTier::from_label) {
            if let Some(i) = RiskTier::ALL.iter().position(|t| *t == tier) {
                self.tiers[i] += 1;
            }
        }

        self.systolic.push(record.systolic.nonzero());
        self.diastolic.push(record.diastolic.nonzero());
        self.cholesterol.push(record.cholesterol.nonzero());

        match record.history_of_stroke.as_deref().and_then(StrokeHistory::from_label) {
            Some(StrokeHistory::Yes) => self.stroke_yes += 1,
            Some(StrokeHistory::No) => self.stroke_no += 1,
            None => {}
        }

        if let Some(at) = &record.recorded_at {
            self.time.record(at);
        }

        for reading in [&record.bmi, &record.systolic, &record.diastolic, &record.cholesterol] {
            self.note_invalid(reading);
        }
    }

    fn note_invalid(&mut self, reading: &Reading) {
        if matches!(reading, Reading::Invalid(_)) {
            self.excluded += 1;
        }
    }
}

// ── Aggregation ──────────────────────────────────────────────────────────────

/// Compute every dashboard view from `cohort`.
///
/// An empty cohort yields `CohortViews::default()`.
pub fn aggregate(cohort: &Cohort, axes: &ScatterAxes) -> CohortViews {
    if cohort.is_empty() {
        return CohortViews::default();
    }

    let mut tally = Tally::default();
    for patient in &cohort.patients {
        tally.patient(patient);
        for record in &patient.records {
            tally.record(record);
        }
    }

    let patients = cohort.patient_count() as u64;
    let records = cohort.record_count() as u64;
    debug!(patients, records, excluded = tally.excluded, "aggregated cohort");

    let series = std::mem::take(&mut tally.time).finish();

    let age_data = AgeBand::ALL
        .iter()
        .zip(tally.age)
        .map(|(band, count)| AgeBucket { age_range: band.label().to_string(), count })
        .collect();

    let gender_data = vec![
        NamedCount::new(Sex::Male.label(), tally.male),
        NamedCount::new(Sex::Female.label(), tally.female),
    ];

    let bmi_data = BmiData {
        average: tally.bmi.value(),
        samples: tally.bmi.count,
        categories: BmiCategory::ALL
            .iter()
            .zip(tally.bmi_categories)
            .map(|(category, count)| NamedCount::new(category.label(), count))
            .collect(),
    };

    let risk_data: Vec<NamedCount> = RiskTier::ALL
        .iter()
        .zip(tally.tiers)
        .map(|(tier, count)| NamedCount::new(tier.display_label(), count))
        .collect();

    let summary_data = SummaryData {
        total_patients: patients,
        total_records: records,
        tiers: risk_data.clone(),
    };

    let health_metrics = HealthMetrics {
        average_systolic: tally.systolic.value(),
        average_diastolic: tally.diastolic.value(),
        average_cholesterol: tally.cholesterol.value(),
        history_of_stroke: vec![
            NamedCount::new(StrokeHistory::Yes.label(), tally.stroke_yes),
            NamedCount::new(StrokeHistory::No.label(), tally.stroke_no),
        ],
    };

    CohortViews {
        age_data,
        gender_data,
        bmi_data,
        risk_data,
        trend_data: series.trend,
        daily_data: series.daily,
        weekly_data: series.weekly,
        monthly_data: series.monthly,
        yearly_data: series.yearly,
        summary_data,
        health_metrics,
        scatter_data: scatter_cloud(cohort, axes),
    }
}
