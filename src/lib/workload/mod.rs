//! Models of job properties.

use crate::system::{Class, Job};
use crate::traffic::Traffic;
use crate::Source;

mod random;

pub use self::random::Random;

/// A model of job properties.
pub trait Workload {
    /// Return the deadline of a job arriving at a given time.
    fn deadline(&mut self, arrival: f64, source: &mut Source) -> f64;

    /// Return the class of a job.
    fn class(&mut self, source: &mut Source) -> Class;
}

/// Generate a number of jobs.
///
/// All arrival times are drawn first, then all deadlines, and then all
/// classes, so the jobs are ordered by arrival and identified by position.
pub fn generate<T, W>(traffic: &mut T, workload: &mut W, count: usize, source: &mut Source)
                      -> Vec<Job> where T: Traffic, W: Workload {

    let arrivals = traffic.take(count, source);
    let deadlines = arrivals.iter().map(|&arrival| workload.deadline(arrival, source))
                                   .collect::<Vec<_>>();
    let classes = (0..count).map(|_| workload.class(source)).collect::<Vec<_>>();
    arrivals.into_iter().zip(deadlines).zip(classes).enumerate()
            .map(|(id, ((arrival, deadline), class))| Job::new(id, class, arrival, deadline))
            .collect()
}

#[cfg(test)]
mod tests {
    use probability::source;

    use crate::traffic::Poisson;
    use super::Random;

    #[test]
    fn generate() {
        let mut source = source::default(1);
        let mut traffic = Poisson::new(1.0).unwrap();
        let mut workload = Random::new(0.5, 0.3).unwrap();
        let jobs = super::generate(&mut traffic, &mut workload, 100, &mut source);
        assert_eq!(jobs.len(), 100);
        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(job.id(), i);
            assert!(job.deadline() >= job.arrival());
        }
        for pair in jobs.windows(2) {
            assert!(pair[0].arrival() < pair[1].arrival());
        }
    }
}
