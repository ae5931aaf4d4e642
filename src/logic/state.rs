/// The lifecycle state of a merge-latest stage.
///
/// ```txt
/// Initializing ──▶ Running ──┬──▶ Draining ──▶ Completed
///                            ├──▶ Completed
///                            ├──▶ Cancelled
///                            └──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// Built, not yet activated by the host.
    Initializing,
    /// Activated; merging upstream elements.
    Running,
    /// The stage has completed, but one aggregate still waits for downstream
    /// demand. The next downstream pull delivers it and completes the stage.
    Draining,
    /// Every upstream completed, or one did with eager close enabled.
    Completed,
    /// Downstream cancelled.
    Cancelled,
    /// An upstream failed.
    Failed,
}

impl StageState {
    /// Returns `true` if the stage will not process any more events.
    #[must_use]
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}
