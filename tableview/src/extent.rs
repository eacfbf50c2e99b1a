/// Estimates above this relative difference from the reported value are published.
pub(crate) const ESTIMATE_THRESHOLD: f64 = 0.1;

/// Inputs for one axis of the estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AxisSample {
    /// Last loaded column (or row).
    pub(crate) last_loaded: usize,
    /// Columns (or rows) in the grid.
    pub(crate) count: usize,
    /// Far edge of the window's outer rect. Already includes the leading margin.
    pub(crate) far_edge: f64,
    pub(crate) spacing: f64,
    pub(crate) trailing_margin: f64,
}

/// Running content size along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct AxisExtent {
    /// Furthest column/row the current value was derived from.
    benchmark: Option<usize>,
    reported: f64,
    /// The next update publishes whatever it computes.
    fresh: bool,
    exact: bool,
}

impl AxisExtent {
    pub(crate) fn reported(&self) -> f64 {
        self.reported
    }

    /// Whether the last column/row contributed to the reported value.
    pub(crate) fn is_exact(&self) -> bool {
        self.exact
    }

    pub(crate) fn reset(&mut self) {
        self.benchmark = None;
        self.fresh = true;
        self.exact = false;
    }

    /// Sets the value directly (used when the grid becomes empty).
    pub(crate) fn force(&mut self, value: f64) -> Option<f64> {
        self.reset();
        self.exact = true;
        self.publish(value)
    }

    /// Refines the estimate after the window grew. Returns the new value when it changed.
    ///
    /// Only reacts when the window advanced past the previous benchmark. Until the last
    /// column/row is loaded the value only grows, and only by more than
    /// [`ESTIMATE_THRESHOLD`]; at the boundary it becomes exact.
    pub(crate) fn update(&mut self, sample: AxisSample) -> Option<f64> {
        if self.benchmark.is_some_and(|benchmark| sample.last_loaded <= benchmark) {
            return None;
        }
        self.benchmark = Some(sample.last_loaded);

        let loaded = (sample.last_loaded + 1) as f64;
        let average = sample.far_edge / loaded + sample.spacing;
        let estimated = sample.count as f64 * average - sample.spacing + sample.trailing_margin;
        let current = sample.far_edge + sample.trailing_margin;

        if sample.last_loaded + 1 >= sample.count {
            self.fresh = false;
            self.exact = true;
            return self.publish(current);
        }

        if core::mem::take(&mut self.fresh) {
            return self.publish(estimated);
        }

        if estimated <= self.reported {
            return None;
        }
        if current >= self.reported || self.reported <= 0.0 {
            return self.publish(estimated);
        }
        let diff = 1.0 - estimated / self.reported;
        if diff.abs() > ESTIMATE_THRESHOLD {
            return self.publish(estimated);
        }
        None
    }

    fn publish(&mut self, value: f64) -> Option<f64> {
        if value == self.reported {
            return None;
        }
        self.reported = value;
        Some(value)
    }
}

/// Content width and height estimates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ExtentEstimator {
    pub(crate) width: AxisExtent,
    pub(crate) height: AxisExtent,
}

impl ExtentEstimator {
    pub(crate) fn new() -> Self {
        let mut estimator = Self::default();
        estimator.reset();
        estimator
    }

    pub(crate) fn reset(&mut self) {
        self.width.reset();
        self.height.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(last_loaded: usize, far_edge: f64) -> AxisSample {
        AxisSample {
            last_loaded,
            count: 100,
            far_edge,
            spacing: 0.0,
            trailing_margin: 0.0,
        }
    }

    #[test]
    fn first_update_publishes_the_estimate() {
        let mut extent = AxisExtent::default();
        extent.reset();
        assert_eq!(extent.update(sample(3, 400.0)), Some(10_000.0));
        assert_eq!(extent.reported(), 10_000.0);
    }

    #[test]
    fn small_changes_are_held_back() {
        let mut extent = AxisExtent::default();
        extent.reset();
        extent.update(sample(3, 400.0));
        // 105 per cell -> 10_500, within 10% of 10_000.
        assert_eq!(extent.update(sample(4, 525.0)), None);
        // 150 per cell -> 15_000.
        assert_eq!(extent.update(sample(5, 900.0)), Some(15_000.0));
    }

    #[test]
    fn estimate_never_shrinks_before_the_boundary() {
        let mut extent = AxisExtent::default();
        extent.reset();
        extent.update(sample(3, 400.0));
        assert_eq!(extent.update(sample(4, 250.0)), None);
        assert_eq!(extent.reported(), 10_000.0);
    }

    #[test]
    fn exact_at_the_boundary() {
        let mut extent = AxisExtent::default();
        extent.reset();
        extent.update(sample(3, 400.0));
        assert_eq!(extent.update(sample(99, 9_000.0)), Some(9_000.0));
    }

    #[test]
    fn ignores_updates_that_do_not_advance() {
        let mut extent = AxisExtent::default();
        extent.reset();
        extent.update(sample(10, 1_100.0));
        assert_eq!(extent.update(sample(10, 5_000.0)), None);
        assert_eq!(extent.update(sample(7, 5_000.0)), None);
    }

    #[test]
    fn spacing_and_margin_enter_the_estimate() {
        let mut extent = AxisExtent::default();
        extent.reset();
        let value = extent.update(AxisSample {
            last_loaded: 1,
            count: 10,
            far_edge: 210.0,
            spacing: 10.0,
            trailing_margin: 5.0,
        });
        // average = 210 / 2 + 10 = 115; 10 * 115 - 10 + 5
        assert_eq!(value, Some(1_145.0));
    }
}
