//! # Overview
//!
//! waitingroom simulates a clinic's waiting room as a discrete-event system:
//! patients arrive on a recorded schedule, compete for a limited pool of
//! doctors, wait their turn in strict FIFO order, are consulted for a
//! data-derived length of time, and depart. The clock is purely virtual;
//! a run is an ordinary CPU-bound computation that is deterministic given
//! the same inputs.
//!
//! The crate is organized around a small engine and the clinic model built
//! on top of it:
//!
//! * The [`Simulation`] and [`EventQueue`] pair execute boxed [`Event`]s in
//!   ascending order of execution time, breaking ties by scheduling order so
//!   that simultaneous arrivals keep their FIFO semantics.
//! * The [`DoctorPool`] resource grants doctors up to its capacity and parks
//!   overflow [`Patient`]s in a FIFO line, handing each freed doctor to the
//!   head of the line within the same simulated instant.
//! * [`ArrivalSchedule`] and [`ConsultLookup`] load the clinic's CSV exports
//!   and normalize them into minute offsets and per-patient consultation
//!   lengths.
//! * A [`Scenario`] ties a schedule, a lookup, and a doctor count together
//!   and runs one simulated day into a [`ScenarioResult`];
//!   [`run_load_comparison`] runs the standard three-way staffing
//!   comparison, one scenario per thread.
//!
//! Runs are single-threaded internally. Because a [`Simulation`] owns all of
//! its state, independent scenarios can still be farmed out to separate
//! threads without sharing anything but the input data.

mod dataset;
mod engine;
mod error;
mod monitor;
mod patient;
mod resource;
mod scenario;
mod stats;
mod time;

pub use dataset::{ArrivalRecord, ArrivalSchedule, ConsultLookup, DatasetError, DEFAULT_CONSULT_MINUTES};
pub use engine::{Event, EventQueue, Simulation};
pub use error::{Error, Result};
pub use patient::Patient;
pub use resource::DoctorPool;
pub use scenario::{run_load_comparison, Scenario, DRAIN_MINUTES};
pub use stats::{QueueSample, ScenarioResult};
pub use time::Minutes;
