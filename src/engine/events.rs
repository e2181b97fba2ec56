mod event_holder;
pub(super) mod event_traits;

use crate::time::Minutes;
use event_holder::EventHolder;
use event_traits::Event;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority queue of scheduled events.
///
/// Events will execute in ascending order of execution time, with ties broken by the order in which they were pushed
/// onto the queue. The tiebreaker is what turns simultaneous arrivals into a well-defined FIFO: two patients scheduled
/// for the same minute reach the doctors in scheduling order, every run.
///
/// This struct is generic over the type used to represent simulation state so that it can work with appropriate event
/// types; the clock itself is always measured in [`Minutes`].
///
/// An [`EventQueue`] provides several methods for scheduling new events, but does not publicly support popping; popping
/// events from the queue only occurs during [`Simulation::run_until()`].
///
/// Each scheduling method compares the desired execution time against the current clock time. Attempting to schedule
/// an event for a time that is already past results in an [`Error::BackInTime`] without modifying the queue. This
/// error indicates that the caller probably has a logical error, as rewinding the clock in a discrete-event simulation
/// should be very rare.
///
/// [`Simulation::run_until()`]: crate::Simulation::run_until
/// [`Error::BackInTime`]: crate::Error::BackInTime
#[derive(Debug)]
pub struct EventQueue<State> {
    events: BinaryHeap<Reverse<EventHolder<State>>>,
    last_execution_time: Minutes,
    events_added: usize,
}

impl<State> EventQueue<State> {
    /// Construct a new [`EventQueue`] with no scheduled events and a clock initialized to the provided time.
    pub(crate) fn new(start_time: Minutes) -> Self {
        Self {
            events: BinaryHeap::default(),
            last_execution_time: start_time,
            events_added: 0,
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time on `self`, returns an [`Error::BackInTime`] to indicate the likely
    /// presence of a logical bug at the call site, with no modifications to the queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Minutes) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        if time < self.last_execution_time {
            return Err(crate::Error::BackInTime);
        }

        let count = self.increment_event_count();
        self.events.push(Reverse(EventHolder {
            execution_time: time,
            event: Box::new(event),
            insertion_sequence: count,
        }));
        Ok(())
    }

    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will
    /// still execute before this event does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackInTime`] only if the clock itself is inconsistent, which the queue never produces on its
    /// own.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        let event_time = self.last_execution_time;
        self.schedule(event, event_time)
    }

    /// Schedule the provided event after the specified delay, in minutes. The event's execution time will be equal to
    /// the result of `self.current_time() + delay`.
    ///
    /// # Errors
    ///
    /// If the delay is negative, the calculated execution time is less than the current clock time on `self`, and this
    /// method returns an [`Error::BackInTime`] to indicate the likely presence of a logical bug at the call site, with
    /// no modifications to the queue.
    ///
    /// # Panics
    ///
    /// Panics if the delay is NaN, as no execution time can be computed from it.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule_with_delay<EventType>(&mut self, event: EventType, delay: f64) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        let event_time = self.last_execution_time + delay;
        self.schedule(event, event_time)
    }

    /// Helper function to make sure incrementing the internal count of added events occurs the same way across all
    /// scheduling methods.
    fn increment_event_count(&mut self) -> usize {
        let count = self.events_added;
        self.events_added += 1;
        count
    }

    /// Crate-internal function to pop an event from the queue. Updates the current clock time to match the execution
    /// time of the popped event.
    pub(crate) fn next(&mut self) -> Option<Box<dyn Event<State>>> {
        if let Some(event_holder) = self.events.pop() {
            self.last_execution_time = event_holder.0.execution_time;
            Some(event_holder.0.event)
        } else {
            None
        }
    }

    /// Crate-internal function to peek at the execution time of the earliest scheduled event, without popping it or
    /// advancing the clock.
    pub(crate) fn next_time(&self) -> Option<Minutes> {
        self.events.peek().map(|event_holder| event_holder.0.execution_time)
    }

    /// The simulation's current clock time.
    pub fn current_time(&self) -> Minutes {
        self.last_execution_time
    }
}

impl<State> std::fmt::Display for EventQueue<State> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {:?}",
            self.events.len(),
            self.last_execution_time
        )
    }
}
