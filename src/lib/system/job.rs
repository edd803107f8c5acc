use std::fmt;

use crate::Result;

/// The identifier of a job, which is also its position in the job arena.
pub type JobId = usize;

/// A job.
#[derive(Clone, Debug)]
pub struct Job {
    id: JobId,
    class: Class,
    arrival: f64,
    deadline: f64,
    state: State,
    dispatch_time: Option<f64>,
    server: Option<usize>,
    service_start: Option<f64>,
    completion_time: Option<f64>,
    expiry_time: Option<f64>,
}

/// The class of a job; the first class takes precedence over the second.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    One,
    Two,
}

/// The state of a job.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Not yet arrived.
    Pending,
    /// Waiting in the queue of the scheduler.
    AtScheduler,
    /// Waiting in the queue of a server.
    AtServer,
    /// Being served by a core.
    InService,
    /// Served to completion.
    Completed,
    /// Dropped after missing its deadline while waiting.
    Expired,
}

/// The ordering key of waiting jobs.
#[derive(Clone, Copy, Debug)]
pub struct Priority {
    key: (Class, f64),
}

order!(Priority(key) ascending);

impl Job {
    /// Create a job.
    #[inline]
    pub fn new(id: JobId, class: Class, arrival: f64, deadline: f64) -> Job {
        Job {
            id,
            class,
            arrival,
            deadline,
            state: State::Pending,
            dispatch_time: None,
            server: None,
            service_start: None,
            completion_time: None,
            expiry_time: None,
        }
    }

    getters! {
        id: JobId,
        class: Class,
        arrival: f64,
        deadline: f64,
        state: State,
        dispatch_time: Option<f64>,
        server: Option<usize>,
        service_start: Option<f64>,
        completion_time: Option<f64>,
        expiry_time: Option<f64>,
    }

    /// Return the ordering key used by the scheduler and the servers.
    #[inline]
    pub fn priority(&self) -> Priority {
        Priority { key: (self.class, self.arrival) }
    }

    /// Check if the job has left the system.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Completed | State::Expired)
    }

    /// Check if the job has arrived but not yet left the system.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && self.state != State::Pending
    }

    /// Return the time spent in the system by a job that has left it.
    pub fn sojourn_time(&self) -> Option<f64> {
        match self.state {
            State::Completed => self.completion_time.map(|time| time - self.arrival),
            State::Expired => self.expiry_time.map(|time| time - self.arrival),
            _ => None,
        }
    }

    /// Return the time spent waiting by a job that has left the system.
    pub fn wait_time(&self) -> Option<f64> {
        match self.state {
            State::Completed => self.service_start.map(|time| time - self.arrival),
            State::Expired => self.expiry_time.map(|time| time - self.arrival),
            _ => None,
        }
    }

    /// Enter the queue of the scheduler.
    pub fn admit(&mut self) -> Result<()> {
        self.transition(State::AtScheduler)
    }

    /// Move to the queue of a server.
    pub fn dispatch(&mut self, time: f64, server: usize) -> Result<()> {
        self.transition(State::AtServer)?;
        self.dispatch_time = Some(time);
        self.server = Some(server);
        Ok(())
    }

    /// Start being served until the given completion time.
    pub fn start(&mut self, time: f64, completion_time: f64) -> Result<()> {
        self.transition(State::InService)?;
        self.service_start = Some(time);
        self.completion_time = Some(completion_time);
        Ok(())
    }

    /// Leave the system after being served.
    pub fn complete(&mut self) -> Result<()> {
        self.transition(State::Completed)
    }

    /// Leave the system after missing the deadline.
    pub fn expire(&mut self, time: f64) -> Result<()> {
        self.transition(State::Expired)?;
        self.expiry_time = Some(time);
        Ok(())
    }

    fn transition(&mut self, next: State) -> Result<()> {
        use self::State::*;

        match (self.state, next) {
            (Pending, AtScheduler) |
            (AtScheduler, AtServer) |
            (AtScheduler, Expired) |
            (AtServer, InService) |
            (AtServer, Expired) |
            (InService, Completed) => {
                self.state = next;
                Ok(())
            },
            (from, to) => raise!(Invariant, "{} cannot go from {:?} to {:?}", self, from, to),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "job #{} (class {})", self.id, self.class)
    }
}

impl Class {
    /// Convert the outcome of a Bernoulli trial with success denoting the
    /// second class.
    #[inline]
    pub fn from_trial(outcome: u8) -> Class {
        if outcome == 0 { Class::One } else { Class::Two }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Class::One => "1".fmt(formatter),
            Class::Two => "2".fmt(formatter),
        }
    }
}
