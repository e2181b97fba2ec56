use super::Event;
use crate::time::Minutes;
use std::cmp::Ordering;

/// Helper struct for the event queue. This struct holds a [`Box`] to the event itself alongside the data necessary to
/// sort events within the priority queue, namely the execution time and a record of the event's insertion sequence.
///
/// The implementation of [`Ord`] on this struct cares first about the execution time, comparing the insertion
/// sequences only to break ties so that simultaneous events execute in the order they were scheduled.
#[derive(Debug)]
pub(super) struct EventHolder<State> {
    pub execution_time: Minutes,
    pub event: Box<dyn Event<State>>,
    pub insertion_sequence: usize,
}

impl<State> PartialEq<Self> for EventHolder<State> {
    fn eq(&self, other: &Self) -> bool {
        self.insertion_sequence == other.insertion_sequence && self.execution_time == other.execution_time
    }
}

impl<State> Eq for EventHolder<State> {}

impl<State> PartialOrd<Self> for EventHolder<State> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State> Ord for EventHolder<State> {
    fn cmp(&self, other: &Self) -> Ordering {
        let comparison = self.execution_time.cmp(&other.execution_time);
        match comparison {
            Ordering::Equal => self.insertion_sequence.cmp(&other.insertion_sequence),
            _ => comparison,
        }
    }
}
