use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// One reading of the waiting line, taken by the minute-cadence monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    /// Simulation clock at the moment of the reading, in minutes.
    pub minute: f64,
    /// Patients waiting for a doctor at that moment. Patients already in a
    /// consultation are not counted.
    pub waiting: usize,
}

/// Aggregate outcome of one simulated scenario.
///
/// All durations are in minutes. Statistics over an empty sample set are 0,
/// so a day with no arrivals still produces a well-formed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub doctors: usize,
    /// Patients on the day's schedule.
    pub patients_arrived: usize,
    /// Patients whose departure fell within the run horizon.
    pub patients_served: usize,
    pub avg_wait: f64,
    pub min_wait: f64,
    pub max_wait: f64,
    pub avg_consult: f64,
    /// Mean time from arrival to departure, over served patients.
    pub avg_total: f64,
    /// Fraction of total doctor-minutes spent consulting. Can exceed 1 when
    /// consultations begun near the horizon run past it, since their full
    /// length is booked the moment they start.
    pub utilization: f64,
    pub queue_samples: Vec<QueueSample>,
}

/// Running accumulators for one scenario, owned by the run state and folded
/// into a [`ScenarioResult`] once the clock stops.
#[derive(Debug, Default)]
pub struct Tally {
    waits: Vec<f64>,
    consults: Vec<f64>,
    totals: Vec<f64>,
    busy_minutes: f64,
    queue_samples: Vec<QueueSample>,
}

impl Tally {
    /// Record a patient reaching a doctor: their time spent waiting and the
    /// consultation length about to be delivered. The consultation is booked
    /// against doctor busy time in full, up front.
    pub(crate) fn service_started(&mut self, wait: f64, consult: f64) {
        self.waits.push(wait);
        self.consults.push(consult);
        self.busy_minutes += consult;
    }

    /// Record a patient departing, with their total time on site.
    pub(crate) fn departed(&mut self, total: f64) {
        self.totals.push(total);
    }

    /// Record one monitor reading of the waiting line.
    pub(crate) fn queue_sampled(&mut self, minute: f64, waiting: usize) {
        self.queue_samples.push(QueueSample { minute, waiting });
    }

    /// Fold the accumulators into a [`ScenarioResult`].
    ///
    /// Utilization divides booked busy time by the doctor-minutes available
    /// over the horizon; a zero-length horizon yields 0 rather than a
    /// division error.
    pub(crate) fn into_result(
        self,
        label: impl Into<String>,
        doctors: NonZeroUsize,
        patients_arrived: usize,
        horizon: f64,
    ) -> ScenarioResult {
        let doctor_minutes = doctors.get() as f64 * horizon;
        let utilization = if doctor_minutes > 0.0 {
            self.busy_minutes / doctor_minutes
        } else {
            0.0
        };

        ScenarioResult {
            label: label.into(),
            doctors: doctors.get(),
            patients_arrived,
            patients_served: self.totals.len(),
            avg_wait: safe_mean(&self.waits),
            min_wait: self.waits.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_wait: self.waits.iter().copied().reduce(f64::max).unwrap_or(0.0),
            avg_consult: safe_mean(&self.consults),
            avg_total: safe_mean(&self.totals),
            utilization,
            queue_samples: self.queue_samples,
        }
    }
}

/// Arithmetic mean, with the empty set defined as 0.
fn safe_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
