/// Construction options for a merge-latest stage.
///
/// # Examples
///
/// ```
/// use merge_latest::logic::MergeLatestOptions;
///
/// let options = MergeLatestOptions::new().eager_close(true);
/// assert!(options.is_eager_close());
/// assert!(!MergeLatestOptions::default().is_eager_close());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeLatestOptions {
    eager_close: bool,
}

impl MergeLatestOptions {
    /// Options for a stage that waits for every upstream to complete.
    pub const fn new() -> Self {
        Self { eager_close: false }
    }

    /// Complete the stage as soon as any one upstream completes.
    pub const fn eager_close(mut self, eager_close: bool) -> Self {
        self.eager_close = eager_close;
        self
    }

    /// Returns `true` if the stage completes on the first upstream completion.
    pub const fn is_eager_close(&self) -> bool {
        self.eager_close
    }
}
