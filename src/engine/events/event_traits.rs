use super::EventQueue;
use std::fmt::Debug;

/// A behavior or state change that occurs within a simulation.
///
/// This trait has one required method that describes what happens when the implementing type executes. The trait is
/// generic over the type used to represent simulation state so that implementations for the same state type can work
/// together within one run.
///
/// Requiring implementors to be [`Debug`] enables printing the full contents of an [`EventQueue`] when necessary.
pub trait Event<State>: Debug {
    /// Update the simulation according to the specific type of event. The simulation will invoke this method during
    /// [`Simulation::run_until()`] for each scheduled event in sequence. Exclusive access will be provided to both the
    /// simulation's current state and the event queue, allowing for both mutation of the simulation's state and
    /// scheduling of new events.
    ///
    /// Note that the simulation's clock time, accessible on the `event_queue` parameter, will update before invoking
    /// this method.
    ///
    /// # Errors
    ///
    /// Implementations surface invariant violations by returning an [`Error`], which [`Simulation::run_until()`]
    /// bubbles back up to the caller unchanged, halting the run. Successful branches, as well as infallible
    /// implementations, simply return `Ok(())` so the run may continue popping events from the queue.
    ///
    /// [`Simulation::run_until()`]: crate::Simulation::run_until
    /// [`Error`]: crate::Error
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State>) -> crate::Result;
}
