//! Coarse progress reporting.

/// Callback receiving 0-100 progress integers during long-running
/// aggregations. Invoked at coarse intervals, never per cell.
pub type ProgressSink = Box<dyn Fn(u8) + Send + Sync>;

/// Smallest percentage advance worth reporting.
const PROGRESS_STEP: u8 = 5;

/// Rate-limits progress callbacks to coarse steps.
pub(crate) struct ProgressReporter<'a> {
    sink: Option<&'a ProgressSink>,
    last_reported: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(sink: Option<&'a ProgressSink>) -> Self {
        Self {
            sink,
            last_reported: None,
        }
    }

    /// Report completion of `done` out of `total` work items.
    pub(crate) fn report(&mut self, done: usize, total: usize) {
        let Some(sink) = self.sink else { return };
        let percent = if total == 0 {
            100
        } else {
            ((done.min(total) * 100) / total) as u8
        };
        let worth_reporting = match self.last_reported {
            None => true,
            Some(last) => percent >= last.saturating_add(PROGRESS_STEP) || (percent == 100 && last != 100),
        };
        if worth_reporting {
            sink(percent);
            self.last_reported = Some(percent);
        }
    }

    /// Report 100 if it has not been reported yet.
    pub(crate) fn finish(&mut self) {
        if let Some(sink) = self.sink {
            if self.last_reported != Some(100) {
                sink(100);
                self.last_reported = Some(100);
            }
        }
    }
}
