use std::slice::Iter;

use crate::system::{Job, JobId};
use crate::Result;

/// A queue of waiting jobs kept in the order of entry.
#[derive(Clone, Debug, Default)]
pub struct Queue {
    jobs: Vec<JobId>,
}

impl Queue {
    /// Create an empty queue.
    #[inline]
    pub fn new() -> Queue {
        Queue { jobs: vec![] }
    }

    /// Return the number of waiting jobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Check if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterate over the waiting jobs in the order of entry.
    #[inline]
    pub fn iter(&self) -> Iter<JobId> {
        self.jobs.iter()
    }

    /// Append a job.
    #[inline]
    pub fn push(&mut self, id: JobId) {
        self.jobs.push(id);
    }

    /// Remove and return the job with the highest priority, that is, the one
    /// with the smallest class and then the earliest arrival. Ties are
    /// resolved in the order of entry.
    pub fn pop(&mut self, jobs: &[Job]) -> Option<JobId> {
        let (position, _) = self.jobs.iter().enumerate()
                                     .min_by_key(|&(_, &id)| jobs[id].priority())?;
        Some(self.jobs.remove(position))
    }

    /// Remove the jobs whose deadlines are strictly before a given time,
    /// mark them expired, and return them.
    pub fn expire(&mut self, time: f64, jobs: &mut [Job]) -> Result<Vec<JobId>> {
        let mut expired = vec![];
        let mut kept = Vec::with_capacity(self.jobs.len());
        for &id in &self.jobs {
            if jobs[id].deadline() < time {
                jobs[id].expire(time)?;
                expired.push(id);
            } else {
                kept.push(id);
            }
        }
        self.jobs = kept;
        Ok(expired)
    }
}
