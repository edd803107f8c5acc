use std::collections::BTreeMap;

use crate::math::Moments;
use crate::metrics::{Metric, Report};
use crate::Result;

/// An estimator of the statistical accuracy of a series of reports.
///
/// Once enough jobs have started, the estimator anchors a window at the
/// latest report and, from then on, tracks the mean and the deviation of
/// every metric over the growing window. The accuracy of a metric is one
/// minus the half-width of the 95% confidence interval of its mean relative
/// to the mean; the overall accuracy is the worst one among the metrics.
#[derive(Clone, Debug)]
pub struct Estimator {
    warmup: usize,
    window: Option<Window>,
}

#[derive(Clone, Debug)]
struct Window {
    start: usize,
    seen: usize,
    moments: BTreeMap<Metric, Moments>,
}

impl Estimator {
    /// Create an estimator that stays idle until more than `warmup` jobs
    /// have started.
    #[inline]
    pub fn new(warmup: usize) -> Estimator {
        Estimator { warmup, window: None }
    }

    /// Return the position of the first report of the window.
    #[inline]
    pub fn window_start(&self) -> Option<usize> {
        self.window.as_ref().map(|window| window.start)
    }

    /// Take into account the reports appended since the previous call and
    /// return the current accuracy.
    pub fn update(&mut self, started: usize, reports: &[Report]) -> Result<f64> {
        if started <= self.warmup || reports.is_empty() {
            return Ok(0.0);
        }
        let window = self.window.get_or_insert_with(|| {
            let start = reports.len() - 1;
            Window { start, seen: start, moments: BTreeMap::new() }
        });
        if reports.len() < window.seen {
            raise!(Invariant, "the report history has shrunk from {} to {} entries",
                   window.seen, reports.len());
        }
        for report in &reports[window.seen..] {
            for (metric, value) in report.iter() {
                window.moments.entry(metric).or_default().push(value);
            }
        }
        window.seen = reports.len();

        if window.seen - window.start < 2 {
            return Ok(0.0);
        }
        let mut accuracy = 1f64;
        for (metric, _) in reports[reports.len() - 1].iter() {
            if let Some(moments) = window.moments.get(&metric) {
                accuracy = accuracy.min(1.0 - moments.relative_half_width());
            }
        }
        Ok(accuracy)
    }
}
