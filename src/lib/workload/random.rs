use probability::distribution::{Bernoulli, Exponential, Sample};

use crate::system::Class;
use crate::workload::Workload;
use crate::{Result, Source};

/// A workload model with exponentially distributed relative deadlines and
/// classes drawn from a Bernoulli distribution.
pub struct Random {
    deadline: Exponential,
    class: Choice,
}

// A Bernoulli distribution requires a probability strictly between zero and
// one.
enum Choice {
    Always(Class),
    Trial(Bernoulli),
}

impl Random {
    /// Create a model.
    pub fn new(deadline_rate: f64, class_one_ratio: f64) -> Result<Random> {
        if !(deadline_rate.is_finite() && deadline_rate > 0.0) {
            raise!(Config, "the deadline rate should be positive");
        }
        if !(0.0..=1.0).contains(&class_one_ratio) {
            raise!(Config, "the class-one ratio should be between zero and one");
        }
        Ok(Random {
            deadline: Exponential::new(deadline_rate),
            class: match class_one_ratio {
                ratio if ratio == 0.0 => Choice::Always(Class::Two),
                ratio if ratio == 1.0 => Choice::Always(Class::One),
                ratio => Choice::Trial(Bernoulli::new(1.0 - ratio)),
            },
        })
    }
}

impl Workload for Random {
    #[inline]
    fn deadline(&mut self, arrival: f64, source: &mut Source) -> f64 {
        arrival + self.deadline.sample(source)
    }

    #[inline]
    fn class(&mut self, source: &mut Source) -> Class {
        match self.class {
            Choice::Always(class) => class,
            Choice::Trial(ref distribution) => Class::from_trial(distribution.sample(source)),
        }
    }
}
