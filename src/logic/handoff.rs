/// A single-slot buffer between aggregate production and downstream demand.
///
/// Holds at most one aggregate. Offering a new one replaces the old.
#[derive(Debug)]
pub(crate) struct Handoff<A> {
    slot: Option<A>,
}

impl<A> Handoff<A> {
    pub(crate) fn new() -> Self {
        Self { slot: None }
    }

    /// Park an aggregate, returning the one it replaced.
    pub(crate) fn offer(&mut self, aggregate: A) -> Option<A> {
        self.slot.replace(aggregate)
    }

    pub(crate) fn take(&mut self) -> Option<A> {
        self.slot.take()
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        self.slot.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.slot = None;
    }
}
