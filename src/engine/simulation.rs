use super::{Event, EventQueue};
use crate::time::Minutes;

use std::fmt::Formatter;

/// Contains the event queue and other state belonging to a simulation.
///
/// A [`Simulation`] owns both its state and its event queue, providing both shared and mutable access to each so
/// callers can set up and tear down runs as needed - for example, scheduling initial events or folding the final state
/// into output statistics.
///
/// The expected workflow for a Simulation is:
///
/// 1. Initialize the state for a fresh run.
/// 2. Pass this state and the start time to [`new()`].
/// 3. Schedule at least one initial event.
/// 4. Call [`run_until()`]. Handle any error it might return.
/// 5. Use the [`state()`] accessor or [`into_state()`] to finish processing the results.
///
/// A [`Simulation`] also provides the same event-scheduling interface as its underlying queue for the purpose of
/// making step 3 slightly simpler.
///
/// [`new()`]: Simulation::new
/// [`run_until()`]: Simulation::run_until
/// [`state()`]: Simulation::state
/// [`into_state()`]: Simulation::into_state
#[derive(Debug)]
pub struct Simulation<State> {
    /// A priority queue of events that have been scheduled to execute, ordered ascending by execution time.
    event_queue: EventQueue<State>,
    /// The current shared state of the Simulation. Exclusive access will be granted to each event that executes.
    state: State,
}

impl<State> Simulation<State> {
    /// Initialize a Simulation instance with the provided starting state and an event queue with clock set to the
    /// provided starting time.
    pub fn new(initial_state: State, start_time: Minutes) -> Self {
        Self {
            event_queue: EventQueue::new(start_time),
            state: initial_state,
        }
    }

    /// Execute events from the priority queue, one at a time, in ascending order by execution time with scheduling
    /// order breaking ties, for as long as the earliest scheduled event falls at or before `horizon`.
    ///
    /// Follows this loop:
    ///
    /// 1. Peek at the next event in the queue. If there isn't one, or its execution time is past `horizon`, return
    ///    `Ok(())`.
    /// 2. Pop that event, advancing the clock to its execution time.
    /// 3. Pass exclusive references to the state and event queue to [`event.execute()`].
    ///     1. If an error is returned, forward it as-is to the caller.
    ///     2. Otherwise, go back to step 1.
    ///
    /// Events scheduled past the horizon remain in the queue unexecuted; the clock comes to rest on the last event
    /// that did execute. In particular, a consultation which would end after the horizon never produces its departure.
    ///
    /// # Errors
    ///
    /// Errors may occur during execution of events, and if encountered here they will be passed back to the caller,
    /// unchanged. See [`Error`] for the conditions the events in this crate can surface.
    ///
    /// [`event.execute()`]: Event::execute
    /// [`Error`]: crate::Error
    // the detected panic in here is a false alarm, as the pop is only
    // attempted after peeking confirms another event is scheduled
    #[allow(clippy::missing_panics_doc)]
    pub fn run_until(&mut self, horizon: Minutes) -> crate::Result {
        loop {
            match self.event_queue.next_time() {
                Some(time) if time <= horizon => {
                    let mut next_event = self
                        .event_queue
                        .next()
                        .expect("peeked event should still be in the queue");
                    next_event.execute(&mut self.state, &mut self.event_queue)?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time on `self`, returns an [`Error::BackInTime`] to indicate the
    /// likely presence of a logical bug at the call site, with no modifications to the queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Minutes) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        self.event_queue.schedule(event, time)
    }

    /// Get a shared reference to the simulation state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get an exclusive reference to the simulation state.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Consume the simulation, yielding ownership of its state for result processing after a run.
    pub fn into_state(self) -> State {
        self.state
    }

    /// Get a shared reference to the event queue.
    pub fn event_queue(&self) -> &EventQueue<State> {
        &self.event_queue
    }

    /// Get an exclusive reference to the event queue.
    pub fn event_queue_mut(&mut self) -> &mut EventQueue<State> {
        &mut self.event_queue
    }
}

impl<State> std::fmt::Display for Simulation<State> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {:?}", self.event_queue.current_time())
    }
}
