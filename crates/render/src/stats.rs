//! Summary statistics over a channel series

/// Min, max and latest of the finite values in a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

impl SeriesStats {
    /// `None` if the series holds no finite value
    pub fn from_series(series: &[f64]) -> Option<Self> {
        let mut finite = series.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;

        let mut stats = Self {
            count: 1,
            min: first,
            max: first,
            latest: first,
        };
        for value in finite {
            stats.count += 1;
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
            stats.latest = value;
        }
        Some(stats)
    }

    /// Axis range with `padding_percent` headroom on both sides.
    ///
    /// A flat series gets a range centred on its value: 10% of the value, or
    /// 0.5 either side when the value is near zero.
    pub fn axis_range(&self, padding_percent: f64) -> (f64, f64) {
        let range = self.max - self.min;
        if range.abs() < 0.001 {
            let center = self.min;
            let half_range = if center.abs() > 0.001 {
                center.abs() * 0.1
            } else {
                0.5
            };
            return (center - half_range, center + half_range);
        }
        let padding = range * (padding_percent / 100.0);
        (self.min - padding, self.max + padding)
    }
}
