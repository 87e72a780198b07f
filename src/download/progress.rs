//! Per-file progress bars for downloads.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg:30!} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg:30!} {bytes} ({bytes_per_sec})";

/// How download progress is shown.
#[derive(Debug, Clone, Default)]
pub enum ProgressDisplay {
    /// No progress output.
    #[default]
    Hidden,
    /// One bar at a time, for sequential batches.
    Single,
    /// Several bars stacked together, for concurrent batches.
    Multi(MultiProgress),
}

impl ProgressDisplay {
    /// Picks a display for a batch: hidden when `show` is false, stacked bars when `concurrent`.
    #[must_use]
    pub fn new(show: bool, concurrent: bool) -> Self {
        match (show, concurrent) {
            (false, _) => Self::Hidden,
            (true, false) => Self::Single,
            (true, true) => Self::Multi(MultiProgress::new()),
        }
    }

    /// Whether bars are drawn at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Creates a byte bar labelled `label`, or a spinner when the total is unknown.
    pub(crate) fn bar_for(&self, label: &str, total: Option<u64>) -> ProgressBar {
        if !self.is_visible() {
            return ProgressBar::hidden();
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner
            }
        };
        bar.set_message(label.to_string());

        match self {
            Self::Multi(multi) => multi.add(bar),
            Self::Hidden | Self::Single => bar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_display_new_selects_variant() {
        assert!(matches!(
            ProgressDisplay::new(false, true),
            ProgressDisplay::Hidden
        ));
        assert!(matches!(
            ProgressDisplay::new(true, false),
            ProgressDisplay::Single
        ));
        assert!(matches!(
            ProgressDisplay::new(true, true),
            ProgressDisplay::Multi(_)
        ));
    }

    #[test]
    fn test_hidden_display_yields_hidden_bars() {
        let display = ProgressDisplay::Hidden;
        assert!(display.bar_for("file.bin", Some(10)).is_hidden());
        assert!(display.bar_for("file.bin", None).is_hidden());
    }

    #[test]
    fn test_visible_bar_tracks_length() {
        let bar = ProgressDisplay::Single.bar_for("file.bin", Some(1024));
        assert_eq!(bar.length(), Some(1024));
        bar.inc(24);
        assert_eq!(bar.position(), 24);
        bar.finish_and_clear();
    }
}
