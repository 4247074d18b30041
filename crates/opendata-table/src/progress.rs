use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for table batches which can be switched off for
/// non-interactive runs.
#[derive(Clone)]
pub struct TableProgress {
    progress_bar: ProgressBar,
}

impl TableProgress {
    pub fn new(total: usize, desc: &str, enabled: bool) -> Self {
        let pb = if enabled {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message(desc.to_string());

        Self { progress_bar: pb }
    }

    pub fn inc(&self) {
        self.progress_bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    pub fn finish(&self) {
        self.progress_bar.finish();
    }
}
