use ordered_float::NotNan;
use std::ops::{Add, Sub};

/// A reading of the simulation clock, in minutes since the start of the run.
///
/// Wraps [`NotNan`] so that clock readings form the total order the event
/// queue's heap requires. Instants only ever come from parsed timestamps and
/// nonnegative offsets, so a NaN here means arithmetic upstream has already
/// gone wrong; construction treats it as fatal rather than ordering it
/// arbitrarily.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Minutes(NotNan<f64>);

impl Minutes {
    /// Wrap a raw minute count.
    ///
    /// # Panics
    ///
    /// Panics if `minutes` is NaN.
    pub fn new(minutes: f64) -> Self {
        Self(NotNan::new(minutes).expect("simulation time must not be NaN"))
    }

    /// The raw minute count.
    pub fn get(self) -> f64 {
        self.0.into_inner()
    }
}

/// Offset an instant by a span of minutes. Panics if the sum is NaN.
impl Add<f64> for Minutes {
    type Output = Minutes;

    fn add(self, minutes: f64) -> Minutes {
        Minutes(self.0 + minutes)
    }
}

/// The span in minutes between two instants.
impl Sub for Minutes {
    type Output = f64;

    fn sub(self, earlier: Minutes) -> f64 {
        self.0.into_inner() - earlier.0.into_inner()
    }
}

impl std::fmt::Display for Minutes {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instants_order_by_value() {
        assert!(Minutes::new(1.5) < Minutes::new(2.0));
        assert_eq!(Minutes::new(3.0), Minutes::new(1.0) + 2.0);
    }

    #[test]
    fn subtraction_yields_span() {
        let span = Minutes::new(12.5) - Minutes::new(4.0);
        assert_eq!(8.5, span);
    }
}
