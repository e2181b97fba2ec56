use crate::dataset::{ArrivalRecord, ArrivalSchedule, ConsultLookup};
use crate::engine::Simulation;
use crate::monitor::MonitorEvent;
use crate::patient::NextArrivalEvent;
use crate::resource::DoctorPool;
use crate::stats::{ScenarioResult, Tally};
use crate::time::Minutes;

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::thread;
use tracing::info;

/// Minutes the clock keeps running past the last scheduled arrival, so that
/// late arrivals have time to clear the line.
pub const DRAIN_MINUTES: f64 = 60.0;

/// Mutable state of one simulated day: the doctors, the arrivals not yet
/// replayed, the consultation lengths, and the statistics gathered so far.
///
/// Each run owns a fresh `Clinic`; nothing is shared between scenarios but
/// the input data they were built from.
#[derive(Debug)]
pub(crate) struct Clinic {
    pub(crate) doctors: DoctorPool,
    pub(crate) arrivals: VecDeque<ArrivalRecord>,
    pub(crate) consult_times: ConsultLookup,
    pub(crate) tally: Tally,
}

impl Clinic {
    fn new(doctors: NonZeroUsize, schedule: &ArrivalSchedule, consults: &ConsultLookup) -> Self {
        Self {
            doctors: DoctorPool::new(doctors),
            arrivals: schedule.records().iter().cloned().collect(),
            consult_times: consults.clone(),
            tally: Tally::default(),
        }
    }
}

/// One configuration of the clinic to simulate: a label for reports, a
/// doctor count, and the day's data.
#[derive(Debug, Clone, Copy)]
pub struct Scenario<'a> {
    pub label: &'a str,
    pub doctors: NonZeroUsize,
    pub schedule: &'a ArrivalSchedule,
    pub consults: &'a ConsultLookup,
}

impl Scenario<'_> {
    /// Simulate the day and fold the tally into a [`ScenarioResult`].
    ///
    /// The clock starts at minute zero with the queue monitor and, if the
    /// schedule is non-empty, the arrival generator registered, then runs
    /// until one hour past the last scheduled arrival. A consultation still
    /// open at that point counts its patient as arrived but not served. An
    /// empty schedule stops the clock at minute zero, leaving a single
    /// monitor reading and zeroed statistics.
    ///
    /// # Errors
    ///
    /// Forwards any [`Error`] surfaced by event execution; a completed run
    /// always yields a well-formed result.
    ///
    /// [`Error`]: crate::Error
    pub fn run(&self) -> crate::Result<ScenarioResult> {
        let horizon = self
            .schedule
            .last_arrival()
            .map_or(0.0, |last_arrival| last_arrival + DRAIN_MINUTES);
        info!(
            label = self.label,
            doctors = self.doctors.get(),
            patients = self.schedule.len(),
            horizon,
            "scenario starting"
        );

        let clinic = Clinic::new(self.doctors, self.schedule, self.consults);
        let mut sim = Simulation::new(clinic, Minutes::new(0.0));
        MonitorEvent::schedule_first(&mut sim)?;
        if let Some(first_arrival) = self.schedule.first_arrival() {
            NextArrivalEvent::schedule_first(&mut sim, first_arrival)?;
        }
        sim.run_until(Minutes::new(horizon))?;

        let clinic = sim.into_state();
        let result = clinic
            .tally
            .into_result(self.label, self.doctors, self.schedule.len(), horizon);
        info!(
            label = %result.label,
            served = result.patients_served,
            avg_wait = result.avg_wait,
            utilization = result.utilization,
            "scenario finished"
        );
        Ok(result)
    }
}

/// Run the standard three-way comparison: the day as recorded, the same day
/// at double load, and double load with twice the doctors.
///
/// Each scenario runs on its own thread over its own copy of the clinic
/// state, so the comparison finishes in the time of the slowest run.
///
/// # Errors
///
/// Forwards the first [`Error`] any of the runs surfaced.
///
/// [`Error`]: crate::Error
pub fn run_load_comparison(
    schedule: &ArrivalSchedule,
    consults: &ConsultLookup,
    doctors: NonZeroUsize,
) -> crate::Result<Vec<ScenarioResult>> {
    let peak_schedule = schedule.doubled();
    let improved_doctors = doctors.saturating_mul(NonZeroUsize::new(2).expect("literal is nonzero"));

    let scenarios = [
        Scenario {
            label: "Normal Load",
            doctors,
            schedule,
            consults,
        },
        Scenario {
            label: "Peak Load",
            doctors,
            schedule: &peak_schedule,
            consults,
        },
        Scenario {
            label: "Improved Peak Load",
            doctors: improved_doctors,
            schedule: &peak_schedule,
            consults,
        },
    ];

    let results = thread::scope(|scope| {
        let handles = scenarios.map(|scenario| scope.spawn(move || scenario.run()));
        handles.map(|handle| handle.join().expect("a scenario thread should not panic"))
    });
    results.into_iter().collect()
}
