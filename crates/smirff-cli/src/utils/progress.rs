use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use smirff::engine::progress::{Progress, ProgressCallback};
use smirff::engine::state::ParameterizationStage;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Names of the stages a pass runs through, in order, without `Idle` or the terminal stages.
fn pass_stages() -> Vec<&'static str> {
    std::iter::successors(ParameterizationStage::Idle.next(), ParameterizationStage::next)
        .filter(|stage| !stage.is_terminal())
        .map(|stage| stage.name())
        .collect()
}

struct BarState {
    bar: ProgressBar,
    stages: Vec<&'static str>,
    current: Option<&'static str>,
}

impl BarState {
    /// `[3/7] Matching Torsions` for a known stage, the bare name otherwise.
    fn stage_label(&self, name: &str) -> String {
        match self.stages.iter().position(|stage| *stage == name) {
            Some(index) => format!("[{}/{}] {}", index + 1, self.stages.len(), name),
            None => name.to_string(),
        }
    }

    fn on_event(&mut self, event: Progress) {
        match event {
            Progress::StageStart { name } => {
                self.current = Some(name);
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.bar.set_message(self.stage_label(name));
            }
            Progress::StageFinish => {
                self.bar.disable_steady_tick();
                let label = self
                    .current
                    .take()
                    .map(|name| self.stage_label(name))
                    .unwrap_or_default();
                self.bar.finish_with_message(format!("✓ {label}"));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(total_steps);
                self.bar.set_style(batch_style());
                self.bar.set_message("Molecules");
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
                self.bar.finish();
            }
            Progress::Message(msg) if self.bar.is_finished() => self.bar.set_message(msg),
            Progress::Message(msg) => self.bar.println(format!("  {msg}")),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn batch_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<10} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Renders engine progress on stderr: a numbered spinner per pass stage for a single
/// molecule, or a bar counting finished molecules for a batch.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            state: Arc::new(Mutex::new(BarState {
                bar,
                stages: pass_stages(),
                current: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();
        Box::new(move |event: Progress| match state.lock() {
            Ok(mut state) => state.on_event(event),
            Err(_) => warn!("Progress state mutex was poisoned. Cannot update progress."),
        })
    }

    /// Replaces the final line with a per-molecule outcome once results are known.
    pub fn finish_with_outcome(&self, succeeded: usize, failed: &[&str]) {
        let Ok(state) = self.state.lock() else {
            return;
        };
        let message = if failed.is_empty() {
            format!("✓ {succeeded} parameterized")
        } else {
            format!(
                "✗ {} of {} failed: {}",
                failed.len(),
                succeeded + failed.len(),
                failed.join(", ")
            )
        };
        state.bar.finish_with_message(message);
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
