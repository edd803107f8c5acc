use crate::system::{Job, State};

/// Statistics about a system.
#[derive(Clone, Copy, Debug, Default)]
pub struct History {
    /// The number of arrived jobs.
    pub started: usize,
    /// The number of jobs that have left the system.
    pub finished: usize,
    /// The number of completed jobs.
    pub completed: usize,
    /// The number of expired jobs.
    pub expired: usize,
}

impl History {
    /// Take into account a job that has just changed its state.
    pub fn count(&mut self, job: &Job) {
        match job.state() {
            State::AtScheduler => self.started += 1,
            State::Completed => {
                self.completed += 1;
                self.finished += 1;
            },
            State::Expired => {
                self.expired += 1;
                self.finished += 1;
            },
            _ => {},
        }
    }

    /// Return the number of jobs currently in the system.
    #[inline]
    pub fn active(&self) -> usize {
        self.started - self.finished
    }
}
