use crate::template::MAX_COUNTER_WIDTH;

/// Stateful counter rendered into generated names.
///
/// `reset` runs once per batch run; `advance` runs once per processed
/// file, whether or not its rename succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    start: i64,
    step: i64,
    width: usize,
    current: i64,
    auto_width: usize,
}

impl CounterState {
    pub fn new(start: i64, step: i64, width: usize) -> Self {
        Self {
            start,
            step,
            width: width.min(MAX_COUNTER_WIDTH),
            current: start,
            auto_width: 1,
        }
    }

    /// Restarts the counter for a batch of `count` files and fixes the
    /// auto width from the largest value the batch will reach. Auto
    /// width is batch-global: every file renders with the same width.
    pub fn reset(&mut self, count: usize) {
        self.current = self.start;
        self.auto_width = self.compute_auto_width(count);
    }

    pub fn advance(&mut self) {
        self.current = self.current.saturating_add(self.step);
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    /// Renders the current value zero-padded. `width_override` comes
    /// from the template tag (`$c(3)`, `$c(a)`); `None` uses the
    /// profile width. A width of 0 means auto. Values wider than the
    /// requested width render in full.
    pub fn render(&self, width_override: Option<usize>) -> String {
        let width = match width_override.unwrap_or(self.width) {
            0 => self.auto_width,
            fixed => fixed.min(MAX_COUNTER_WIDTH),
        };
        format!("{:0width$}", self.current)
    }

    fn compute_auto_width(&self, count: usize) -> usize {
        if count == 0 {
            return 1;
        }
        let end = self
            .start
            .saturating_add(self.step.saturating_mul(count as i64 - 1));
        let largest = self.start.unsigned_abs().max(end.unsigned_abs());
        digits(largest).clamp(1, MAX_COUNTER_WIDTH)
    }
}

fn digits(mut value: u64) -> usize {
    let mut n = 1;
    while value >= 10 {
        value /= 10;
        n += 1;
    }
    n
}
