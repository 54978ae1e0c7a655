//! Progress reporting for consensus runs

use colored::Colorize;
use consensus_application::ports::progress::ProgressNotifier;
use consensus_domain::Phase;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a consensus run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_number(phase: &Phase) -> usize {
        match phase {
            Phase::Generation => 1,
            Phase::Voting => 2,
            Phase::Selection => 3,
        }
    }

    fn phase_label(phase: &Phase) -> String {
        format!("Phase {}: {}", Self::phase_number(phase), phase.display_name())
    }

    fn task_status(phase: &Phase, temperature: f64, success: bool) -> String {
        let label = match phase {
            Phase::Generation => format!("T={}", temperature),
            _ => phase.as_str().to_string(),
        };
        if success {
            format!("{} {}", "v".green(), label)
        } else {
            format!("{} {}", "x".red(), label)
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.phase_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.phase_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_task_complete(&self, phase: &Phase, temperature: f64, success: bool) {
        self.with_bar(|pb| {
            pb.set_message(Self::task_status(phase, temperature, success));
            pb.inc(1);
        });
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if let Ok(mut guard) = self.phase_bar.lock()
            && let Some(pb) = guard.take()
        {
            if phase == &Phase::Voting || phase == &Phase::Selection {
                pb.set_position(pb.length().unwrap_or(0));
            }
            let done = format!("Phase {}", Self::phase_number(phase));
            pb.finish_with_message(format!("{} complete!", done.green()));
        }
    }

    fn on_retry(&self, temperature: f64, attempt: usize, reason: &str) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "{} T={} retry {} ({})",
                "!".yellow(),
                temperature,
                attempt,
                reason
            ));
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        println!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, phase: &Phase, temperature: f64, success: bool) {
        println!(
            "  {}",
            ProgressReporter::task_status(phase, temperature, success)
        );
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        println!();
    }

    fn on_retry(&self, temperature: f64, attempt: usize, reason: &str) {
        println!(
            "  {} T={} retry {}: {}",
            "!".yellow(),
            temperature,
            attempt,
            reason
        );
    }
}
