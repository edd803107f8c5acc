use std::collections::BTreeMap;
use std::fmt;

use crate::system::Class;

/// A summary of the state of a system at a particular time.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    time: f64,
    values: BTreeMap<Metric, f64>,
}

/// A tracked statistic.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Metric {
    /// The mean time from arrival to completion or expiry.
    Sojourn(Scope),
    /// The mean time from arrival to the start of service or expiry.
    Wait(Scope),
    /// The fraction of the jobs that have left the system by expiring.
    Expiry(Scope),
    /// The mean length of the queue of the scheduler.
    SchedulerQueue,
    /// The mean length of the queue of a server.
    ServerQueue(usize),
}

/// The jobs a metric is computed over.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Scope {
    Total,
    Class(Class),
}

impl Report {
    /// Create a report.
    pub fn new<T>(time: f64, values: T) -> Report where T: IntoIterator<Item = (Metric, f64)> {
        Report { time, values: values.into_iter().collect() }
    }

    /// Return the time.
    #[inline(always)]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Return the value of a metric.
    #[inline]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).cloned()
    }

    /// Iterate over the metrics in their canonical order.
    pub fn iter<'l>(&'l self) -> impl Iterator<Item = (Metric, f64)> + 'l {
        self.values.iter().map(|(&metric, &value)| (metric, value))
    }

    /// Return the number of metrics.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the report is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        for (metric, value) in self.iter() {
            writeln!(formatter, "{}: {}", metric, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Metric::Sojourn(scope) => write!(formatter, "avg_spent_{}", scope),
            Metric::Wait(scope) => write!(formatter, "avg_wait_{}", scope),
            Metric::Expiry(scope) => write!(formatter, "avg_rate_expired_{}", scope),
            Metric::SchedulerQueue => write!(formatter, "avg_scheduler_queue_len"),
            Metric::ServerQueue(i) => write!(formatter, "avg_server_{}_queue_lens", i),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Scope::Total => write!(formatter, "tot"),
            Scope::Class(class) => write!(formatter, "t{}", class),
        }
    }
}
