use probability::distribution::{Exponential, Sample};

use crate::traffic::Traffic;
use crate::{Result, Source};

/// A Poisson arrival process.
pub struct Poisson {
    time: f64,
    interarrival: Exponential,
}

impl Poisson {
    /// Create a process with a given rate starting at time zero.
    pub fn new(rate: f64) -> Result<Poisson> {
        if !(rate.is_finite() && rate > 0.0) {
            raise!(Config, "the arrival rate should be positive");
        }
        Ok(Poisson { time: 0.0, interarrival: Exponential::new(rate) })
    }
}

impl Traffic for Poisson {
    fn next(&mut self, source: &mut Source) -> f64 {
        self.time += self.interarrival.sample(source);
        self.time
    }
}
