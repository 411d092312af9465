use indicatif::{ProgressBar, ProgressStyle};
use watchlist_sync::{ItemOutcome, SyncProgress};

/// Whether builds should draw a progress bar. Quiet runs and redirected
/// stderr get plain log lines instead.
pub(crate) fn wants_bar(quiet: bool, terminal: bool) -> bool {
    !quiet && terminal
}

/// Terminal progress bar for dataset builds.
///
/// Log lines are printed through [`ProgressBar::suspend`] so they do not
/// tear the bar.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        Self { pb }
    }
}

impl SyncProgress for BarProgress {
    fn on_phase(&self, message: &str) {
        self.pb.reset();
        self.pb.set_length(0);
        self.pb.suspend(|| log::info!("{}", message));
    }

    fn on_item(&self, current: usize, total: usize, title: &str, outcome: ItemOutcome) {
        if self.pb.length() != Some(total as u64) {
            self.pb.set_length(total as u64);
        }
        self.pb.set_position(current as u64);
        self.pb.set_message(title.to_string());

        match outcome {
            ItemOutcome::Cached => {}
            ItemOutcome::Fetched => self
                .pb
                .suspend(|| log::debug!("Fetched: {} ({}/{})", title, current, total)),
            ItemOutcome::Resolved => self
                .pb
                .suspend(|| log::debug!("Resolved: {} ({}/{})", title, current, total)),
        }
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        log::info!("{}", message);
    }
}
