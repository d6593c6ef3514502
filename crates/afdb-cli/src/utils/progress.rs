use afdb_clusters::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders core progress events on stderr: a spinner while datasets load,
/// then a bar while C-alpha traces are verified.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
    records_loaded: Arc<AtomicUsize>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(spinner_style());
        bar.finish_and_clear();

        Self {
            bar: Arc::new(Mutex::new(bar)),
            records_loaded: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total records reported through `Progress::Loaded` so far.
    pub fn records_loaded(&self) -> usize {
        self.records_loaded.load(Ordering::Relaxed)
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        let records_loaded = Arc::clone(&self.records_loaded);

        Box::new(move |event: Progress| {
            let Ok(bar) = bar.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match event {
                Progress::PhaseStart { name } => {
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(format!("Loading {}...", name.to_lowercase()));
                }
                Progress::Loaded {
                    name,
                    records,
                    elapsed,
                } => {
                    records_loaded.fetch_add(records, Ordering::Relaxed);
                    bar.println(loaded_line(name, records, elapsed));
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    bar.finish_with_message(format!(
                        "✓ {} records ready",
                        records_loaded.load(Ordering::Relaxed)
                    ));
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_style(bar_style());
                    bar.set_message("Verifying traces");
                }
                Progress::TaskIncrement => bar.inc(1),
                Progress::TaskFinish => {
                    if let Some(total) = bar.length() {
                        bar.set_position(total);
                    }
                    bar.finish();
                }
                Progress::Message(msg) if bar.is_finished() => bar.set_message(msg),
                Progress::Message(msg) => bar.println(format!("  {}", msg)),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn loaded_line(name: &str, records: usize, elapsed: Duration) -> String {
    format!(
        "  ✓ {:<12} {:>12} records  ({:.2}s)",
        name,
        records,
        elapsed.as_secs_f64()
    )
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<18} [{bar:40.cyan/blue}] {pos}/{len} traces ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("=>-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn loaded(name: &'static str, records: usize) -> Progress {
        Progress::Loaded {
            name,
            records,
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn new_handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::new();
        let bar = handler.bar.lock().unwrap();
        assert!(bar.is_finished());
        assert_eq!(handler.records_loaded(), 0);
    }

    #[test]
    fn loading_phase_totals_records_across_stores() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Record stores",
        });
        assert_eq!(
            handler.bar.lock().unwrap().message(),
            "Loading record stores..."
        );

        callback(loaded("afdb", 42));
        callback(loaded("afdb_ca", 40));
        callback(Progress::PhaseFinish);

        assert_eq!(handler.records_loaded(), 82);
        assert_eq!(handler.bar.lock().unwrap().message(), "✓ 82 records ready");
    }

    #[test]
    fn loaded_line_aligns_name_and_count() {
        let line = loaded_line("afdb_desc", 1234, Duration::from_millis(1500));
        assert_eq!(line, "  ✓ afdb_desc            1234 records  (1.50s)");
    }

    #[test]
    fn verification_fills_the_bar_on_finish() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 100 });
        callback(Progress::TaskIncrement);
        assert_eq!(handler.bar.lock().unwrap().position(), 1);

        callback(Progress::TaskFinish);
        let bar = handler.bar.lock().unwrap();
        assert!(bar.is_finished());
        assert_eq!(bar.position(), 100);
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Taxonomy" });
            callback(loaded("taxonomy", 9));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert_eq!(handler.records_loaded(), 9);
        assert!(handler.bar.lock().unwrap().is_finished());
    }
}
