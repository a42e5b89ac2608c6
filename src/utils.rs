use indicatif::{ProgressBar, ProgressStyle};

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {human_pos}/{human_len} {percent}% {msg}")
        .expect("hardcoded")
}

pub fn progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(progress_style())
}

/// Removes every whitespace character, for loose key comparisons.
pub fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
