use crate::engine::{Event, EventQueue, Simulation};
use crate::scenario::Clinic;
use crate::time::Minutes;
use tracing::debug;

/// Data carried by one patient from arrival through departure.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: String,
    /// Clock reading at which the patient entered the clinic.
    pub arrival: Minutes,
    /// Length of the consultation the patient is in for.
    pub consult_minutes: f64,
}

/// Replays the day's schedule: spawns the patient whose turn it is, then
/// sleeps until the next scheduled arrival.
///
/// The generator only ever spawns; it never touches the doctors itself, and
/// the run keeps going after the last spawn for as long as consultations
/// remain within the horizon.
#[derive(Debug)]
pub(crate) struct NextArrivalEvent;

impl NextArrivalEvent {
    /// Register the generator for the first scheduled arrival.
    pub(crate) fn schedule_first(sim: &mut Simulation<Clinic>, first_arrival: f64) -> crate::Result {
        sim.schedule(Self, Minutes::new(first_arrival))
    }
}

impl Event<Clinic> for NextArrivalEvent {
    fn execute(&mut self, simulation_state: &mut Clinic, event_queue: &mut EventQueue<Clinic>) -> crate::Result {
        let Some(record) = simulation_state.arrivals.pop_front() else {
            return Ok(());
        };

        let consult_minutes = simulation_state.consult_times.minutes_for(&record.patient_id);
        let patient = Patient {
            id: record.patient_id,
            arrival: event_queue.current_time(),
            consult_minutes,
        };
        debug!(patient = %patient.id, minute = %patient.arrival, "patient arrived");
        event_queue.schedule_now(ArrivalEvent::new(patient))?;

        if let Some(next) = simulation_state.arrivals.front() {
            event_queue.schedule(Self, Minutes::new(next.arrival_minutes))?;
        }
        Ok(())
    }
}

/// An arriving patient tries to see a doctor, or joins the line.
#[derive(Debug)]
pub(crate) struct ArrivalEvent {
    patient: Option<Patient>,
}

impl ArrivalEvent {
    pub(crate) fn new(patient: Patient) -> Self {
        Self { patient: Some(patient) }
    }
}

impl Event<Clinic> for ArrivalEvent {
    fn execute(&mut self, simulation_state: &mut Clinic, event_queue: &mut EventQueue<Clinic>) -> crate::Result {
        let patient = self.patient.take().expect("an arrival event executes at most once");

        match simulation_state.doctors.acquire(patient) {
            Some(patient) => begin_service(patient, simulation_state, event_queue),
            // all doctors taken; the pool holds the patient until a release
            None => Ok(()),
        }
    }
}

/// A consultation ends: the patient leaves and the freed doctor takes
/// whoever is first in line.
#[derive(Debug)]
pub(crate) struct DepartureEvent {
    patient: Option<Patient>,
}

impl DepartureEvent {
    fn new(patient: Patient) -> Self {
        Self { patient: Some(patient) }
    }
}

impl Event<Clinic> for DepartureEvent {
    fn execute(&mut self, simulation_state: &mut Clinic, event_queue: &mut EventQueue<Clinic>) -> crate::Result {
        let patient = self.patient.take().expect("a departure event executes at most once");

        let now = event_queue.current_time();
        simulation_state.tally.departed(now - patient.arrival);
        debug!(patient = %patient.id, minute = %now, "patient departed");

        if let Some(next_patient) = simulation_state.doctors.release()? {
            begin_service(next_patient, simulation_state, event_queue)?;
        }
        Ok(())
    }
}

/// Record the wait and start the consultation, booking the departure at its
/// end.
fn begin_service(patient: Patient, clinic: &mut Clinic, event_queue: &mut EventQueue<Clinic>) -> crate::Result {
    let now = event_queue.current_time();
    let wait = now - patient.arrival;
    clinic.tally.service_started(wait, patient.consult_minutes);
    debug!(patient = %patient.id, minute = %now, wait, "consultation started");

    let consult_minutes = patient.consult_minutes;
    event_queue.schedule_with_delay(DepartureEvent::new(patient), consult_minutes)
}
