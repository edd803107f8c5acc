//! Models of job arrivals.

use crate::Source;

mod poisson;

pub use self::poisson::Poisson;

/// A model of job arrivals.
pub trait Traffic {
    /// Return the next arrival time.
    fn next(&mut self, source: &mut Source) -> f64;

    /// Return the next `count` arrival times.
    fn take(&mut self, count: usize, source: &mut Source) -> Vec<f64> {
        (0..count).map(|_| self.next(source)).collect()
    }
}
