//! Fixed-period pass scheduling

use std::convert::Infallible;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sync::PassReport;

/// Outcome of a scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub passes: u64,
    pub failed: u64,
    /// Changes summed over all passes
    pub changes: u64,
}

impl ScheduleSummary {
    fn record(&mut self, report: &PassReport) {
        self.passes += 1;
        if !report.success {
            self.failed += 1;
        }
        self.changes += report.changes() as u64;
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Runs sync passes back to back with a fixed pause between them.
///
/// Passes never overlap: the next pass starts only after the previous one
/// returned and the interval elapsed.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
    max_passes: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_passes: None,
        }
    }

    /// Stop after `passes` passes instead of running forever.
    pub fn with_max_passes(mut self, passes: u64) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// A scheduler that runs exactly one pass.
    pub fn once() -> Self {
        Self::new(Duration::ZERO).with_max_passes(1)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_passes(&self) -> Option<u64> {
        self.max_passes
    }

    /// Run passes until the pass limit is reached.
    ///
    /// `pass` receives the 1-based pass number. Without a limit this never
    /// returns.
    pub fn run<F>(&self, mut pass: F) -> ScheduleSummary
    where
        F: FnMut(u64) -> PassReport,
    {
        match self.try_run(|number| Ok::<_, Infallible>(pass(number))) {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Like [`run`](Self::run), but stops as soon as `pass` returns an error.
    ///
    /// The failing pass is not counted and no pause follows it.
    pub fn try_run<F, E>(&self, mut pass: F) -> Result<ScheduleSummary, E>
    where
        F: FnMut(u64) -> Result<PassReport, E>,
    {
        let mut summary = ScheduleSummary::default();

        while !self.is_done(summary.passes) {
            let number = summary.passes + 1;
            let report = pass(number)?;
            summary.record(&report);

            tracing::debug!(
                pass = number,
                success = report.success,
                changes = report.changes(),
                "Pass finished"
            );

            if !self.is_done(summary.passes) && !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }

        Ok(summary)
    }

    fn is_done(&self, passes: u64) -> bool {
        self.max_passes.is_some_and(|max| passes >= max)
    }
}
