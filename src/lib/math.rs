/// The two-sided 95% quantile of the standard normal distribution.
pub const Z95: f64 = 1.96;

/// Running moments of a sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct Moments {
    count: usize,
    mean: f64,
    sum: f64,
}

impl Moments {
    /// Take into account an observation.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.sum += delta * (value - self.mean);
    }

    /// Return the number of observations.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Return the sample mean.
    #[inline(always)]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Return the sample standard deviation.
    pub fn deviation(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.sum / (self.count - 1) as f64).max(0.0).sqrt()
    }

    /// Return the half-width of the 95% confidence interval of the mean
    /// relative to the mean itself, which is zero when the mean is zero.
    pub fn relative_half_width(&self) -> f64 {
        if self.mean == 0.0 || self.count == 0 {
            return 0.0;
        }
        Z95 * self.deviation() / (self.count as f64).sqrt() / self.mean
    }
}

/// Divide, treating an empty denominator as yielding zero.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

#[cfg(test)]
mod tests {
    use super::Moments;

    #[test]
    fn moments() {
        let mut moments = Moments::default();
        for &value in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            moments.push(value);
        }
        assert_eq!(moments.count(), 8);
        assert::close(&[moments.mean()], &[5.0], 1e-12);
        assert::close(&[moments.deviation()], &[(32.0f64 / 7.0).sqrt()], 1e-12);
        assert::close(&[moments.relative_half_width()],
                      &[1.96 * (32.0f64 / 7.0).sqrt() / 8f64.sqrt() / 5.0], 1e-12);
    }

    #[test]
    fn constant() {
        let mut moments = Moments::default();
        for _ in 0..10 {
            moments.push(0.3);
        }
        assert_eq!(moments.deviation(), 0.0);
        assert_eq!(moments.relative_half_width(), 0.0);
    }

    #[test]
    fn zero_mean() {
        let mut moments = Moments::default();
        moments.push(-1.0);
        moments.push(1.0);
        assert_eq!(moments.relative_half_width(), 0.0);
    }
}
