use probability::distribution::{Exponential, Sample};

use crate::{Result, Source};

/// A processing unit serving one job at a time.
#[derive(Clone, Debug)]
pub struct Core {
    rate: f64,
    service: Exponential,
    busy_until: f64,
}

impl Core {
    /// Create a core with a given service rate.
    pub fn new(rate: f64) -> Result<Core> {
        if !(rate.is_finite() && rate > 0.0) {
            raise!(Config, "the service rate of a core should be positive");
        }
        Ok(Core { rate, service: Exponential::new(rate), busy_until: 0.0 })
    }

    getters! {
        rate: f64,
        busy_until: f64,
    }

    /// Check if the core has finished its previous job strictly before a
    /// given time.
    #[inline]
    pub fn is_free(&self, time: f64) -> bool {
        self.busy_until < time
    }

    /// Start serving a job and return its completion time.
    pub fn serve(&mut self, time: f64, source: &mut Source) -> Result<f64> {
        if !self.is_free(time) {
            raise!(Invariant, "a core busy until {} cannot take a job at {}",
                   self.busy_until, time);
        }
        self.busy_until = time + self.service.sample(source);
        Ok(self.busy_until)
    }
}
