//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus run.

use consensus_domain::Phase;

/// Callback for progress updates during a consensus run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a generation at `temperature` is finally accepted or rejected
    fn on_task_complete(&self, phase: &Phase, temperature: f64, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called before an invalid generation is requested again
    fn on_retry(&self, _temperature: f64, _attempt: usize, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _temperature: f64, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
