//! Complete system.

use std::mem;

use probability::source;

use crate::config::Config;
use crate::metrics::{Collector, Estimator, Report};
use crate::platform::Server;
use crate::schedule::Scheduler;
use crate::traffic::Poisson;
use crate::workload::{self, Random};
use crate::{Outcome, Result, Source};

mod history;
mod job;

pub use self::history::History;
pub use self::job::{Class, Job, JobId, Priority, State};

/// A complete system.
///
/// The system advances in ticks. Each tick expires overdue waiting jobs,
/// retires served ones, admits arrivals, dispatches jobs to servers, starts
/// service on free cores, and then summarizes the state in a report.
pub struct System {
    config: Config,
    source: Source,
    tick: usize,
    jobs: Vec<Job>,
    arrived: usize,
    running: Vec<JobId>,
    scheduler: Scheduler,
    servers: Vec<Server>,
    history: History,
    collector: Collector,
    estimator: Estimator,
    reports: Vec<Report>,
    accuracy: f64,
    halted: bool,
}

/// The outcome of a tick.
#[derive(Clone, Debug)]
pub struct Increment {
    /// The time of the tick.
    pub time: f64,
    /// The report produced by the tick.
    pub report: Report,
    /// The accuracy of the reports so far.
    pub accuracy: f64,
    /// The flag indicating that the simulation is over.
    pub halted: bool,
}

impl System {
    /// Create a system with randomly generated jobs.
    pub fn new(config: Config) -> Result<System> {
        config.validate()?;
        let mut source = source::default(config.seed);
        let jobs = {
            let mut traffic = Poisson::new(config.arrival_rate)?;
            let mut workload = Random::new(config.deadline_rate, config.class_one_ratio)?;
            workload::generate(&mut traffic, &mut workload, config.job_count, &mut source)
        };
        if let Some(job) = jobs.last() {
            info!(target: "System", "Generated {} jobs arriving within {:.2} time units.",
                  jobs.len(), job.arrival());
        }
        System::assemble(config, source, jobs)
    }

    /// Create a system with given jobs, which should be pending, ordered by
    /// arrival, and identified by their positions. The number of jobs in the
    /// configuration is disregarded.
    pub fn with_jobs(mut config: Config, jobs: Vec<Job>) -> Result<System> {
        for (i, job) in jobs.iter().enumerate() {
            if job.id() != i {
                raise!(Config, "{} should be identified by its position {}", job, i);
            }
            if job.state() != State::Pending {
                raise!(Config, "{} should be pending", job);
            }
            if i > 0 && jobs[i - 1].arrival() > job.arrival() {
                raise!(Config, "{} arrives before its predecessor", job);
            }
        }
        config.job_count = jobs.len();
        config.validate()?;
        let source = source::default(config.seed);
        System::assemble(config, source, jobs)
    }

    fn assemble(config: Config, source: Source, jobs: Vec<Job>) -> Result<System> {
        let servers = config.servers.iter().enumerate()
                                           .map(|(i, rates)| Server::new(i, rates))
                                           .collect::<Result<Vec<_>>>()?;
        info!(target: "System",
              "Constructed {} servers with {} cores serving {:.2} jobs per time unit.",
              servers.len(), servers.iter().map(|server| server.cores().len()).sum::<usize>(),
              capacity(&servers));
        Ok(System {
            scheduler: Scheduler::new(config.scheduler_rate)?,
            collector: Collector::new(servers.len()),
            estimator: Estimator::new(config.warmup),
            config,
            source,
            tick: 0,
            jobs,
            arrived: 0,
            running: vec![],
            servers,
            history: History::default(),
            reports: vec![],
            accuracy: 0.0,
            halted: false,
        })
    }

    getters! {
        ref config: Config,
        ref jobs: [Job],
        ref scheduler: Scheduler,
        ref servers: [Server],
        ref history: History,
        ref estimator: Estimator,
        ref reports: [Report],
    }

    /// Return the accuracy of the reports so far.
    #[inline(always)]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Check if the simulation is over.
    #[inline(always)]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Advance by one tick and return the outcome, or return nothing if the
    /// simulation is over.
    pub fn next(&mut self) -> Outcome<Increment> {
        if self.halted {
            return Ok(None);
        }
        let time = self.tick as f64 * self.config.time_step;
        self.tick += 1;

        self.expire(time)?;
        self.complete(time)?;
        self.admit(time)?;
        let dispatched = self.scheduler.dispatch(time, &mut self.jobs, &mut self.servers,
                                                 &mut self.source)?;
        for server in self.servers.iter_mut() {
            let started = server.assign(time, &mut self.jobs, &mut self.source)?;
            self.running.extend(started);
        }
        self.audit()?;

        self.collector.sample(&self.scheduler, &self.servers);
        let report = self.collector.report(time);
        self.reports.push(report.clone());
        self.accuracy = self.estimator.update(self.history.started, &self.reports)?;

        trace!(target: "System", "{:10.2} | {:3} dispatched | {:4} active | accuracy {:.4}",
               time, dispatched.len(), self.history.active(), self.accuracy);

        if self.accuracy >= self.config.accuracy {
            info!(target: "System", "Reached an accuracy of {:.4} at time {}.",
                  self.accuracy, time);
            self.halted = true;
        } else if self.history.finished == self.jobs.len() {
            info!(target: "System", "All {} jobs have left the system at time {}.",
                  self.jobs.len(), time);
            self.halted = true;
        }

        Ok(Some(Increment { time, report, accuracy: self.accuracy, halted: self.halted }))
    }

    /// Advance until the simulation is over and return the last outcome.
    pub fn run(&mut self) -> Outcome<Increment> {
        let mut last = None;
        while let Some(increment) = self.next()? {
            last = Some(increment);
        }
        Ok(last)
    }

    fn expire(&mut self, time: f64) -> Result<()> {
        let mut expired = self.scheduler.expire(time, &mut self.jobs)?;
        for server in self.servers.iter_mut() {
            expired.extend(server.expire(time, &mut self.jobs)?);
        }
        for id in expired {
            debug!(target: "System", "{} expired at {}.", self.jobs[id], time);
            self.account(id);
        }
        Ok(())
    }

    fn complete(&mut self, time: f64) -> Result<()> {
        for id in mem::take(&mut self.running) {
            let finish = some!(self.jobs[id].completion_time());
            if finish < time {
                self.jobs[id].complete()?;
                debug!(target: "System", "{} completed at {}.", self.jobs[id], finish);
                self.account(id);
            } else {
                self.running.push(id);
            }
        }
        Ok(())
    }

    fn admit(&mut self, time: f64) -> Result<()> {
        while self.arrived < self.jobs.len() && self.jobs[self.arrived].arrival() < time {
            let id = self.arrived;
            self.jobs[id].admit()?;
            self.history.count(&self.jobs[id]);
            self.scheduler.push(id);
            self.arrived += 1;
        }
        Ok(())
    }

    fn account(&mut self, id: JobId) {
        self.history.count(&self.jobs[id]);
        self.collector.account(&self.jobs[id]);
    }

    // Every active job is held exactly once, either waiting in the queue that
    // matches its state or in service.
    fn audit(&self) -> Result<()> {
        let waiting = self.scheduler.queue().iter().map(|&id| (id, State::AtScheduler, None));
        let queued = self.servers.iter().flat_map(|server| {
            server.queue().iter().map(move |&id| (id, State::AtServer, Some(server.id())))
        });
        let running = self.running.iter().map(|&id| (id, State::InService, None));

        let mut seen = vec![false; self.jobs.len()];
        let mut present = 0;
        for (id, state, server) in waiting.chain(queued).chain(running) {
            let job = some!(self.jobs.get(id), Invariant, "found an unknown job #{}", id);
            if mem::replace(&mut seen[id], true) {
                raise!(Invariant, "{} is held in more than one place", job);
            }
            if job.state() != state {
                raise!(Invariant, "{} is held as {:?} but is {:?}", job, state, job.state());
            }
            if server.is_some() && job.server() != server {
                raise!(Invariant, "{} is held by server {:?} but assigned to {:?}",
                       job, server, job.server());
            }
            present += 1;
        }
        if present != self.history.active() {
            raise!(Invariant, "found {} jobs in the system but {} have started and {} finished",
                   present, self.history.started, self.history.finished);
        }
        Ok(())
    }
}

fn capacity(servers: &[Server]) -> f64 {
    servers.iter().flat_map(|server| server.cores()).map(|core| core.rate()).sum()
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::ErrorKind;
    use super::{Class, Job, State, System};

    fn config(servers: Vec<Vec<f64>>, scheduler_rate: f64) -> Config {
        let mut config = Config::new(servers, 1.0, 1.0, scheduler_rate);
        config.warmup = 1_000_000;
        config
    }

    #[test]
    fn sequential_service() {
        let jobs = (0..3).map(|i| Job::new(i, Class::Two, 0.0, 100.0)).collect();
        let mut system = System::with_jobs(config(vec![vec![1.0]], 1.0), jobs).unwrap();

        let increment = system.next().unwrap().unwrap();
        assert_eq!(increment.time, 0.0);
        assert_eq!(system.history().started, 0);

        let increment = system.next().unwrap().unwrap();
        assert_eq!(increment.time, 1.0);
        assert_eq!(system.history().started, 3);
        assert_eq!(system.jobs()[0].dispatch_time(), Some(1.0));
        assert_eq!(system.jobs()[0].service_start(), Some(1.0));
        assert_eq!(system.jobs()[0].state(), State::InService);
        for job in &system.jobs()[1..] {
            assert!(job.state() == State::AtScheduler || job.state() == State::AtServer);
        }

        let last = system.run().unwrap().unwrap();
        assert!(last.halted);
        assert_eq!(system.history().completed, 3);
        assert_eq!(system.history().expired, 0);

        let jobs = system.jobs();
        for job in jobs {
            assert_eq!(job.state(), State::Completed);
            assert_eq!(job.server(), Some(0));
        }
        for pair in jobs.windows(2) {
            assert!(pair[0].dispatch_time() <= pair[1].dispatch_time());
            assert!(pair[0].completion_time().unwrap() < pair[1].service_start().unwrap());
        }
    }

    #[test]
    fn expiry_at_scheduler() {
        let jobs = vec![
            Job::new(0, Class::Two, 0.0, 1000.0),
            Job::new(1, Class::One, 5.0, 6.0),
        ];
        let mut system = System::with_jobs(config(vec![vec![100.0]], 1e-9), jobs).unwrap();

        for _ in 0..7 {
            assert!(!system.next().unwrap().unwrap().halted);
        }
        assert_eq!(system.jobs()[1].state(), State::AtScheduler);

        let increment = system.next().unwrap().unwrap();
        assert_eq!(increment.time, 7.0);
        let job = &system.jobs()[1];
        assert_eq!(job.state(), State::Expired);
        assert_eq!(job.expiry_time(), Some(7.0));
        assert_eq!(job.dispatch_time(), None);
        assert_eq!(job.completion_time(), None);
        assert!(increment.halted);
        assert!(system.next().unwrap().is_none());
    }

    #[test]
    fn conservation() {
        let mut config = config(vec![vec![1.0, 2.0], vec![0.5]], 3.0);
        config.arrival_rate = 1.5;
        config.deadline_rate = 0.2;
        config.job_count = 300;
        config.seed = 7;
        let mut system = System::new(config).unwrap();

        while let Some(increment) = system.next().unwrap() {
            let history = system.history();
            let jobs = system.jobs();
            let active = jobs.iter().filter(|job| job.is_active()).count();
            assert_eq!(history.started, history.finished + active);
            let completed = jobs.iter().filter(|job| job.state() == State::Completed).count();
            let expired = jobs.iter().filter(|job| job.state() == State::Expired).count();
            assert_eq!(history.completed, completed);
            assert_eq!(history.expired, expired);
            for &id in system.scheduler().queue().iter() {
                assert_eq!(jobs[id].state(), State::AtScheduler);
            }
            for server in system.servers() {
                for &id in server.queue().iter() {
                    assert_eq!(jobs[id].state(), State::AtServer);
                    assert_eq!(jobs[id].server(), Some(server.id()));
                }
            }
            assert_eq!(increment.halted, history.finished == 300);
        }

        assert_eq!(system.history().finished, 300);
        assert!(system.jobs().iter().all(|job| job.is_terminal()));
    }

    #[test]
    fn reproducible() {
        let reports = |seed| {
            let mut config = config(vec![vec![1.0], vec![1.0, 1.0]], 2.0);
            config.job_count = 100;
            config.seed = seed;
            let mut system = System::new(config).unwrap();
            for _ in 0..40 {
                system.next().unwrap();
            }
            system.reports().to_vec()
        };
        assert_eq!(reports(3), reports(3));
        assert!(reports(3) != reports(4));
    }

    #[test]
    fn convergence() {
        let mut config = Config::new(vec![vec![1.0, 1.0], vec![1.0, 1.0]], 1.0, 0.1, 5.0);
        config.seed = 21;
        let mut system = System::new(config).unwrap();

        let last = system.run().unwrap().unwrap();
        assert!(last.halted);
        assert!(last.accuracy >= 0.95 || system.history().finished == 10000);
        let start = system.estimator().window_start().unwrap();
        assert!(start < system.reports().len());
        assert_eq!(&last.report, system.reports().last().unwrap());
    }

    #[test]
    fn invalid_jobs() {
        let config = config(vec![vec![1.0]], 1.0);

        let jobs = vec![Job::new(1, Class::One, 0.0, 1.0)];
        assert!(System::with_jobs(config.clone(), jobs).is_err());

        let jobs = vec![Job::new(0, Class::One, 2.0, 3.0), Job::new(1, Class::One, 1.0, 3.0)];
        assert!(System::with_jobs(config.clone(), jobs).is_err());

        let mut job = Job::new(0, Class::One, 0.0, 1.0);
        job.admit().unwrap();
        assert!(System::with_jobs(config.clone(), vec![job]).is_err());

        assert!(System::with_jobs(config, vec![]).is_err());
    }

    #[test]
    fn extreme_class_ratios() {
        for &ratio in &[0.0, 1.0] {
            let mut config = config(vec![vec![1.0]], 1.0);
            config.class_one_ratio = ratio;
            config.job_count = 10;
            assert!(config.validate().is_ok());

            let system = System::new(config).unwrap();
            let class = if ratio == 1.0 { Class::One } else { Class::Two };
            assert!(system.jobs().iter().all(|job| job.class() == class));
        }
    }

    #[test]
    fn capacity() {
        let system = System::new(config(vec![vec![1.0, 2.5], vec![0.5]], 1.0)).unwrap();
        assert_eq!(super::capacity(system.servers()), 4.0);
    }

    #[test]
    fn audit() {
        let busy = || {
            let jobs = vec![
                Job::new(0, Class::Two, 0.0, 1000.0),
                Job::new(1, Class::Two, 0.0, 1000.0),
            ];
            let mut system = System::with_jobs(config(vec![vec![1e-9]], 1e-9), jobs).unwrap();
            system.next().unwrap();
            system.next().unwrap();
            assert_eq!(system.jobs()[0].state(), State::InService);
            assert_eq!(system.jobs()[1].state(), State::AtScheduler);
            assert!(system.audit().is_ok());
            system
        };

        let mut system = busy();
        system.running.clear();
        system.scheduler.push(0);
        assert_eq!(system.audit().unwrap_err().kind(), ErrorKind::Invariant);

        let mut system = busy();
        system.running.clear();
        system.scheduler.push(1);
        assert_eq!(system.audit().unwrap_err().kind(), ErrorKind::Invariant);

        let mut system = busy();
        system.running.push(1);
        assert_eq!(system.audit().unwrap_err().kind(), ErrorKind::Invariant);
    }
}
