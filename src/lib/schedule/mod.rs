//! Dispatching of jobs to servers.

use probability::distribution::{Exponential, Sample, Uniform};

use crate::platform::Server;
use crate::system::{Job, JobId};
use crate::{Result, Source};

mod queue;

pub use self::queue::Queue;

/// A scheduler holding arrived jobs and forwarding them to servers.
///
/// Each dispatch occupies the scheduler for an exponentially distributed
/// amount of time, which is accumulated in a pacing clock; jobs are
/// dispatched only while the clock lags behind the current time.
#[derive(Clone, Debug)]
pub struct Scheduler {
    queue: Queue,
    ready: f64,
    service: Exponential,
    tiebreak: Uniform,
}

/// The rank of a server; the smallest one receives the next job.
#[derive(Clone, Copy, Debug)]
struct Rank {
    key: (usize, f64),
}

order!(Rank(key) ascending);

impl Scheduler {
    /// Create a scheduler with a given service rate.
    pub fn new(rate: f64) -> Result<Scheduler> {
        if !(rate.is_finite() && rate > 0.0) {
            raise!(Config, "the scheduler rate should be positive");
        }
        Ok(Scheduler {
            queue: Queue::new(),
            ready: 0.0,
            service: Exponential::new(rate),
            tiebreak: Uniform::new(0.0, 1.0),
        })
    }

    getters! {
        ref queue: Queue,
    }

    /// Return the time after which the next dispatch may happen.
    #[inline(always)]
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Append an arrived job to the queue.
    #[inline]
    pub fn push(&mut self, id: JobId) {
        self.queue.push(id);
    }

    /// Expire the waiting jobs whose deadlines have passed.
    #[inline]
    pub fn expire(&mut self, time: f64, jobs: &mut [Job]) -> Result<Vec<JobId>> {
        self.queue.expire(time, jobs)
    }

    /// Forward jobs to servers for as long as the pacing clock allows and
    /// return the dispatched jobs.
    pub fn dispatch(&mut self, time: f64, jobs: &mut [Job], servers: &mut [Server],
                    source: &mut Source) -> Result<Vec<JobId>> {

        let mut dispatched = vec![];
        while !self.queue.is_empty() && self.ready < time {
            let id = some!(self.queue.pop(jobs));
            let i = some!(self.choose(servers, source), Config, "there are no servers");
            jobs[id].dispatch(time, servers[i].id())?;
            servers[i].push(id);
            dispatched.push(id);
            self.ready += self.service.sample(source);
        }
        Ok(dispatched)
    }

    // Pick the server with the shortest queue, breaking ties at random.
    fn choose(&self, servers: &[Server], source: &mut Source) -> Option<usize> {
        servers.iter().enumerate()
               .map(|(i, server)| (Rank { key: (server.queue().len(),
                                                 self.tiebreak.sample(source)) }, i))
               .min_by_key(|&(rank, _)| rank)
               .map(|(_, i)| i)
    }
}

#[cfg(test)]
mod tests {
    use probability::source;

    use crate::platform::Server;
    use crate::system::{Class, Job, State};
    use super::Scheduler;

    fn setup(jobs: &mut [Job], scheduler: &mut Scheduler) {
        for job in jobs.iter_mut() {
            job.admit().unwrap();
            scheduler.push(job.id());
        }
    }

    #[test]
    fn class_one_first() {
        let mut source = source::default(4);
        let mut scheduler = Scheduler::new(1e-9).unwrap();
        let mut servers = vec![Server::new(0, &[1.0]).unwrap()];
        let mut jobs = vec![
            Job::new(0, Class::Two, 0.0, 100.0),
            Job::new(1, Class::One, 0.5, 100.0),
        ];
        setup(&mut jobs, &mut scheduler);

        let dispatched = scheduler.dispatch(1.0, &mut jobs, &mut servers, &mut source).unwrap();
        assert_eq!(dispatched, vec![1]);
        assert_eq!(jobs[1].state(), State::AtServer);
        assert_eq!(jobs[1].dispatch_time(), Some(1.0));
        assert_eq!(jobs[1].server(), Some(0));
        assert_eq!(jobs[0].state(), State::AtScheduler);
        assert!(scheduler.ready() > 1.0);

        let dispatched = scheduler.dispatch(2.0, &mut jobs, &mut servers, &mut source).unwrap();
        assert!(dispatched.is_empty());
    }

    #[test]
    fn shortest_queue() {
        let mut source = source::default(5);
        let mut scheduler = Scheduler::new(1e9).unwrap();
        let mut servers = (0..3).map(|i| Server::new(i, &[1.0]).unwrap()).collect::<Vec<_>>();
        let mut jobs = (0..9).map(|i| Job::new(i, Class::Two, i as f64, 100.0))
                             .collect::<Vec<_>>();
        setup(&mut jobs, &mut scheduler);

        let dispatched = scheduler.dispatch(1.0, &mut jobs, &mut servers, &mut source).unwrap();
        assert_eq!(dispatched, (0..9).collect::<Vec<_>>());
        for server in &servers {
            assert_eq!(server.queue().len(), 3);
        }
        for chunk in jobs.chunks(3) {
            let mut servers = chunk.iter().map(|job| job.server().unwrap()).collect::<Vec<_>>();
            servers.sort();
            assert_eq!(servers, vec![0, 1, 2]);
        }
    }

    #[test]
    fn random_tiebreak() {
        let mut source = source::default(6);
        let mut counts = [0; 2];
        for _ in 0..200 {
            let mut scheduler = Scheduler::new(1.0).unwrap();
            let mut servers = (0..2).map(|i| Server::new(i, &[1.0]).unwrap()).collect::<Vec<_>>();
            let mut jobs = vec![Job::new(0, Class::One, 0.0, 100.0)];
            setup(&mut jobs, &mut scheduler);
            scheduler.dispatch(1.0, &mut jobs, &mut servers, &mut source).unwrap();
            counts[jobs[0].server().unwrap()] += 1;
        }
        assert!(counts[0] > 50 && counts[1] > 50, "{:?}", counts);
    }
}
