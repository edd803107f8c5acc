//! Tool for simulating job dispatching in multi-core server farms.
//!
//! Jobs arrive at a central scheduler, which forwards them to servers; each
//! core of a server serves one job at a time. The simulation advances in
//! fixed time steps and stops once the collected metrics are statistically
//! stable or every job has left the system.

#[cfg(test)]
extern crate assert;

#[macro_use]
extern crate log;

extern crate configuration;
extern crate probability;

#[macro_use]
mod macros;

mod math;
mod result;

pub mod config;
pub mod metrics;
pub mod platform;
pub mod schedule;
pub mod system;
pub mod traffic;
pub mod workload;

pub use config::Config;
pub use result::{Error, ErrorKind, Result};
pub use system::{Increment, System};

/// An outcome.
pub type Outcome<T> = Result<Option<T>>;

/// A source of randomness.
pub type Source = probability::source::Default;
