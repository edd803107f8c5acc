use crate::platform::Core;
use crate::schedule::Queue;
use crate::system::{Job, JobId};
use crate::{Result, Source};

/// A server with a queue of waiting jobs and a number of cores.
#[derive(Clone, Debug)]
pub struct Server {
    id: usize,
    cores: Vec<Core>,
    queue: Queue,
}

impl Server {
    /// Create a server with cores of given service rates.
    pub fn new(id: usize, rates: &[f64]) -> Result<Server> {
        if rates.is_empty() {
            raise!(Config, "server {} should have at least one core", id);
        }
        let cores = rates.iter().map(|&rate| Core::new(rate)).collect::<Result<Vec<_>>>()?;
        Ok(Server { id, cores, queue: Queue::new() })
    }

    getters! {
        ref cores: [Core],
        ref queue: Queue,
    }

    /// Return the identifier.
    #[inline(always)]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Append a dispatched job to the queue.
    #[inline]
    pub fn push(&mut self, id: JobId) {
        self.queue.push(id);
    }

    /// Expire the waiting jobs whose deadlines have passed.
    #[inline]
    pub fn expire(&mut self, time: f64, jobs: &mut [Job]) -> Result<Vec<JobId>> {
        self.queue.expire(time, jobs)
    }

    /// Give each free core the most urgent waiting job and return the jobs
    /// that have started.
    pub fn assign(&mut self, time: f64, jobs: &mut [Job], source: &mut Source)
                  -> Result<Vec<JobId>> {

        let mut started = vec![];
        for core in self.cores.iter_mut() {
            if self.queue.is_empty() {
                break;
            }
            if !core.is_free(time) {
                continue;
            }
            let id = some!(self.queue.pop(jobs));
            let finish = core.serve(time, source)?;
            jobs[id].start(time, finish)?;
            started.push(id);
        }
        Ok(started)
    }
}

#[cfg(test)]
mod tests {
    use probability::source;

    use crate::system::{Class, Job, State};
    use super::Server;

    fn queued(jobs: &mut [Job], server: &mut Server, time: f64) {
        for job in jobs.iter_mut() {
            job.admit().unwrap();
            job.dispatch(time, server.id()).unwrap();
            server.push(job.id());
        }
    }

    #[test]
    fn assign_by_priority() {
        let mut source = source::default(2);
        let mut server = Server::new(0, &[1.0, 1.0]).unwrap();
        let mut jobs = vec![
            Job::new(0, Class::Two, 0.0, 100.0),
            Job::new(1, Class::Two, 0.5, 100.0),
            Job::new(2, Class::One, 0.7, 100.0),
        ];
        queued(&mut jobs, &mut server, 1.0);

        let started = server.assign(1.0, &mut jobs, &mut source).unwrap();
        assert_eq!(started, vec![2, 0]);
        assert_eq!(jobs[2].state(), State::InService);
        assert_eq!(jobs[2].service_start(), Some(1.0));
        assert_eq!(jobs[2].completion_time(), Some(server.cores()[0].busy_until()));
        assert_eq!(jobs[1].state(), State::AtServer);
        assert_eq!(server.queue().len(), 1);
    }

    #[test]
    fn busy_cores_are_skipped() {
        let mut source = source::default(3);
        let mut server = Server::new(0, &[1.0]).unwrap();
        let mut jobs = vec![
            Job::new(0, Class::One, 0.0, 100.0),
            Job::new(1, Class::One, 0.0, 100.0),
        ];
        queued(&mut jobs, &mut server, 1.0);

        assert_eq!(server.assign(1.0, &mut jobs, &mut source).unwrap(), vec![0]);
        let busy_until = server.cores()[0].busy_until();
        let mut time = 1.0;
        while time <= busy_until {
            assert!(server.assign(time, &mut jobs, &mut source).unwrap().is_empty());
            time += 1.0;
        }
        assert_eq!(server.assign(time, &mut jobs, &mut source).unwrap(), vec![1]);
        assert_eq!(jobs[1].service_start(), Some(time));
    }

    #[test]
    fn without_cores() {
        assert!(Server::new(0, &[]).is_err());
        assert!(Server::new(0, &[1.0, 0.0]).is_err());
    }
}
