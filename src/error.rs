/// Errors that may be encountered while running
/// a simulation.
///
/// The [`BackInTime`] variant originates from the
/// [`EventQueue`] to indicate that an event's
/// scheduled execution time is prior to the queue's
/// current time. This error likely corresponds to a
/// logical bug on the caller's side, e.g. a sign
/// error in a delay computation.
///
/// The [`IdleRelease`] variant originates from the
/// [`DoctorPool`] when a release is requested while
/// no doctor is busy. Seize/release pairing is
/// managed entirely by the patient lifecycle events,
/// so this indicates broken bookkeeping rather than
/// a recoverable condition.
///
/// [`EventQueue`]: crate::EventQueue
/// [`DoctorPool`]: crate::DoctorPool
/// [`BackInTime`]: Error::BackInTime
/// [`IdleRelease`]: Error::IdleRelease
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The event queue rejected an event that would
    /// have been scheduled for a time that has
    /// already passed.
    BackInTime,
    /// A doctor was released while none was marked
    /// busy.
    IdleRelease,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let descriptor = match self {
            Self::BackInTime => "event execution time is less than current simulation time",
            Self::IdleRelease => "doctor released while none was busy",
        };
        write!(f, "{descriptor}")
    }
}

impl std::error::Error for Error {}

/// [`std::result::Result`] pinned to [`Error`], with the
/// success type defaulting to the `()` that event
/// execution returns.
pub type Result<T = ()> = std::result::Result<T, Error>;
