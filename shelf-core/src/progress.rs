//! Merge progress reporting.

/// What happened to one source entry during the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome<'a> {
    Imported { title: &'a str, provider: &'a str },
    Skipped { title: &'a str, provider: &'a str },
}

/// Trait for receiving merge progress updates.
pub trait MergeProgress {
    /// Called after each source entry is processed. `current` is 1-based.
    fn on_entry(&self, current: usize, total: usize, outcome: EntryOutcome<'_>);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl MergeProgress for SilentProgress {
    fn on_entry(&self, _current: usize, _total: usize, _outcome: EntryOutcome<'_>) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl MergeProgress for LogProgress {
    fn on_entry(&self, current: usize, total: usize, outcome: EntryOutcome<'_>) {
        match outcome {
            EntryOutcome::Imported { title, provider } => log::info!(
                "({:3}/{:3}) Importing manga '{}' from source '{}'",
                current,
                total,
                title,
                provider
            ),
            EntryOutcome::Skipped { title, provider } => log::info!(
                "({:3}/{:3}) SKIP manga '{}': source '{}' not matched",
                current,
                total,
                title,
                provider
            ),
        }
    }
}
