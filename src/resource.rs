use crate::patient::Patient;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// The clinic's pool of doctors: a fixed number of interchangeable servers
/// and a FIFO line of patients waiting for one.
///
/// At most `capacity` doctors are ever marked busy, and a patient joins the
/// line only while every doctor is taken. Both facts hold by construction:
/// the only way to occupy a doctor is [`acquire()`], and the only way to free
/// one is [`release()`], which hands the doctor straight to the head of the
/// line when anyone is waiting. Other components observe the line solely
/// through [`queue_length()`].
///
/// [`acquire()`]: DoctorPool::acquire
/// [`release()`]: DoctorPool::release
/// [`queue_length()`]: DoctorPool::queue_length
#[derive(Debug)]
pub struct DoctorPool {
    capacity: NonZeroUsize,
    busy: usize,
    waiting: VecDeque<Patient>,
}

impl DoctorPool {
    /// Construct a pool with the given number of doctors, all idle.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            busy: 0,
            waiting: VecDeque::new(),
        }
    }

    /// The number of doctors in the pool.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Hand the arriving patient a doctor if one is idle, or park them at
    /// the back of the line. Returns the patient only when service can begin
    /// immediately; a parked patient comes back out of [`release()`] once
    /// their turn arrives.
    ///
    /// [`release()`]: DoctorPool::release
    pub fn acquire(&mut self, patient: Patient) -> Option<Patient> {
        if self.busy < self.capacity.get() {
            self.busy += 1;
            Some(patient)
        } else {
            self.waiting.push_back(patient);
            None
        }
    }

    /// Free the doctor held by a departing patient. When the line is
    /// non-empty the freed doctor is taken over by the patient at its head
    /// without any simulated time passing, and that patient is returned so
    /// the caller can begin their service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdleRelease`] if no doctor is busy, meaning
    /// seize/release pairing went wrong somewhere upstream.
    ///
    /// [`Error::IdleRelease`]: crate::Error::IdleRelease
    pub fn release(&mut self) -> crate::Result<Option<Patient>> {
        if self.busy == 0 {
            return Err(crate::Error::IdleRelease);
        }

        match self.waiting.pop_front() {
            // the freed doctor stays busy, now with the next patient in line
            Some(next_patient) => Ok(Some(next_patient)),
            None => {
                self.busy -= 1;
                Ok(None)
            }
        }
    }

    /// Number of patients currently waiting for a doctor.
    pub fn queue_length(&self) -> usize {
        self.waiting.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Minutes;

    fn patient(id: &str) -> Patient {
        Patient {
            id: id.to_owned(),
            arrival: Minutes::new(0.0),
            consult_minutes: 15.0,
        }
    }

    #[test]
    fn grants_up_to_capacity_then_queues() {
        let mut pool = DoctorPool::new(NonZeroUsize::new(2).unwrap());

        assert!(pool.acquire(patient("a")).is_some());
        assert!(pool.acquire(patient("b")).is_some());
        assert!(pool.acquire(patient("c")).is_none());
        assert_eq!(1, pool.queue_length());
    }

    #[test]
    fn release_serves_waiters_in_arrival_order() {
        let mut pool = DoctorPool::new(NonZeroUsize::new(1).unwrap());
        pool.acquire(patient("first")).unwrap();
        assert!(pool.acquire(patient("second")).is_none());
        assert!(pool.acquire(patient("third")).is_none());

        let next = pool.release().unwrap().unwrap();
        assert_eq!("second", next.id);
        let next = pool.release().unwrap().unwrap();
        assert_eq!("third", next.id);
        assert!(pool.release().unwrap().is_none());
        assert_eq!(0, pool.queue_length());
    }

    #[test]
    fn release_with_all_doctors_idle_is_an_error() {
        let mut pool = DoctorPool::new(NonZeroUsize::new(3).unwrap());
        assert_eq!(Err(crate::Error::IdleRelease), pool.release());
    }
}
