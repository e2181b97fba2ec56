use crate::engine::{Event, EventQueue, Simulation};
use crate::scenario::Clinic;
use crate::time::Minutes;

/// Cadence of the waiting-line census, in minutes.
const SAMPLE_INTERVAL_MINUTES: f64 = 1.0;

/// Records the length of the waiting line once a minute, starting at minute
/// zero. The monitor reschedules itself forever; the run horizon is what
/// stops it.
///
/// Sampling happens before anything else due in the same minute, because the
/// monitor's tick is always scheduled ahead of that minute's arrivals. A
/// patient arriving at minute 3 is not yet in line when the minute-3 reading
/// is taken.
#[derive(Debug)]
pub(crate) struct MonitorEvent;

impl MonitorEvent {
    /// Register the monitor for its first reading, at minute zero.
    pub(crate) fn schedule_first(sim: &mut Simulation<Clinic>) -> crate::Result {
        sim.schedule(Self, Minutes::new(0.0))
    }
}

impl Event<Clinic> for MonitorEvent {
    fn execute(&mut self, simulation_state: &mut Clinic, event_queue: &mut EventQueue<Clinic>) -> crate::Result {
        let now = event_queue.current_time();
        simulation_state
            .tally
            .queue_sampled(now.get(), simulation_state.doctors.queue_length());
        event_queue.schedule_with_delay(Self, SAMPLE_INTERVAL_MINUTES)
    }
}
