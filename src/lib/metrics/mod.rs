//! Performance metrics.

use crate::math::{self, Moments};
use crate::platform::Server;
use crate::schedule::Scheduler;
use crate::system::{Class, Job, State};

mod convergence;
mod report;

pub use self::convergence::Estimator;
pub use self::report::{Metric, Report, Scope};

/// A collector of performance metrics.
///
/// Terminal jobs are accounted for once, when they leave the system, and
/// queue lengths are sampled once per tick; reports are derived from the
/// accumulated totals.
#[derive(Clone, Debug)]
pub struct Collector {
    total: Tally,
    classes: [Tally; 2],
    scheduler: Moments,
    servers: Vec<Moments>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    completed: usize,
    expired: usize,
    sojourn: f64,
    wait: f64,
}

impl Collector {
    /// Create a collector for a given number of servers.
    pub fn new(servers: usize) -> Collector {
        Collector {
            total: Tally::default(),
            classes: [Tally::default(); 2],
            scheduler: Moments::default(),
            servers: vec![Moments::default(); servers],
        }
    }

    /// Take into account a job that has just left the system.
    pub fn account(&mut self, job: &Job) {
        let index = match job.class() {
            Class::One => 0,
            Class::Two => 1,
        };
        self.total.account(job);
        self.classes[index].account(job);
    }

    /// Record the current queue lengths.
    pub fn sample(&mut self, scheduler: &Scheduler, servers: &[Server]) {
        self.scheduler.push(scheduler.queue().len() as f64);
        for (moments, server) in self.servers.iter_mut().zip(servers) {
            moments.push(server.queue().len() as f64);
        }
    }

    /// Summarize the metrics collected so far.
    pub fn report(&self, time: f64) -> Report {
        let mut values = vec![];
        let scopes = [
            (Scope::Total, &self.total),
            (Scope::Class(Class::One), &self.classes[0]),
            (Scope::Class(Class::Two), &self.classes[1]),
        ];
        for &(scope, tally) in &scopes {
            values.push((Metric::Sojourn(scope), tally.sojourn()));
            values.push((Metric::Wait(scope), tally.wait()));
            values.push((Metric::Expiry(scope), tally.expiry()));
        }
        values.push((Metric::SchedulerQueue, self.scheduler.mean()));
        for (i, moments) in self.servers.iter().enumerate() {
            values.push((Metric::ServerQueue(i), moments.mean()));
        }
        Report::new(time, values)
    }
}

impl Tally {
    fn account(&mut self, job: &Job) {
        let (sojourn, wait) = match (job.sojourn_time(), job.wait_time()) {
            (Some(sojourn), Some(wait)) => (sojourn, wait),
            _ => return,
        };
        match job.state() {
            State::Completed => self.completed += 1,
            State::Expired => self.expired += 1,
            _ => return,
        }
        self.sojourn += sojourn;
        self.wait += wait;
    }

    #[inline]
    fn finished(&self) -> f64 {
        (self.completed + self.expired) as f64
    }

    #[inline]
    fn sojourn(&self) -> f64 {
        math::ratio(self.sojourn, self.finished())
    }

    #[inline]
    fn wait(&self) -> f64 {
        math::ratio(self.wait, self.finished())
    }

    #[inline]
    fn expiry(&self) -> f64 {
        math::ratio(self.expired as f64, self.finished())
    }
}
