use core::fmt;
use core::mem;

use super::port_set::PortSet;
use super::PortId;

/// The most recent value received on every port.
///
/// Values are kept as options until every port has one; from then on they
/// are kept as a plain slice that combining functions can borrow.
pub(crate) struct LatestBuffer<T> {
    slots: Slots<T>,
}

enum Slots<T> {
    Filling {
        values: Box<[Option<T>]>,
        ready: PortSet,
    },
    Full(Box<[T]>),
}

impl<T> LatestBuffer<T> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: Slots::Filling {
                values: (0..len).map(|_| None).collect(),
                ready: PortSet::new(len),
            },
        }
    }

    /// Store `value` as the latest value of `port`, dropping the previous one.
    ///
    /// Returns `true` if this was the first value received on the port.
    pub(crate) fn store(&mut self, port: PortId, value: T) -> bool {
        let (first, full) = match &mut self.slots {
            Slots::Full(values) => {
                values[port] = value;
                return false;
            }
            Slots::Filling { values, ready } => {
                values[port] = Some(value);
                let first = ready.insert(port);
                (first, ready.is_full())
            }
        };
        if full {
            self.seal();
        }
        first
    }

    /// Returns the latest value of every port, once every port has one.
    pub(crate) fn as_slice(&self) -> Option<&[T]> {
        match &self.slots {
            Slots::Full(values) => Some(&values[..]),
            Slots::Filling { .. } => None,
        }
    }

    pub(crate) fn is_ready(&self, port: PortId) -> bool {
        match &self.slots {
            Slots::Full(values) => port < values.len(),
            Slots::Filling { ready, .. } => ready.contains(port),
        }
    }

    pub(crate) fn ready_len(&self) -> usize {
        match &self.slots {
            Slots::Full(values) => values.len(),
            Slots::Filling { ready, .. } => ready.len(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.slots {
            Slots::Full(values) => values.len(),
            Slots::Filling { values, .. } => values.len(),
        }
    }

    /// Every port has a value: unwrap the options once.
    fn seal(&mut self) {
        let slots = mem::replace(&mut self.slots, Slots::Full(Box::default()));
        self.slots = match slots {
            Slots::Filling { values, .. } => {
                Slots::Full(values.into_vec().into_iter().flatten().collect())
            }
            full => full,
        };
    }
}

impl<T> fmt::Debug for LatestBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatestBuffer")
            .field("len", &self.len())
            .field("ready", &self.ready_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::LatestBuffer;
    use std::rc::Rc;

    #[test]
    fn snapshot_only_once_full() {
        let mut latest = LatestBuffer::new(3);
        assert!(latest.store(0, "a"));
        assert!(latest.store(2, "c"));
        assert!(latest.as_slice().is_none());
        assert!(latest.store(1, "b"));
        assert_eq!(latest.as_slice(), Some(&["a", "b", "c"][..]));

        assert!(!latest.store(0, "a2"));
        assert_eq!(latest.as_slice(), Some(&["a2", "b", "c"][..]));
        assert_eq!(latest.ready_len(), 3);
    }

    #[test]
    fn values_are_dropped_exactly_once() {
        let tracker = Rc::new(());
        {
            let mut latest = LatestBuffer::new(3);
            latest.store(0, tracker.clone());
            latest.store(0, tracker.clone());
            latest.store(2, tracker.clone());
            assert_eq!(Rc::strong_count(&tracker), 3);
            assert!(latest.is_ready(2));
            assert!(!latest.is_ready(1));
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn replaced_values_are_dropped_once_full() {
        let tracker = Rc::new(());
        {
            let mut latest = LatestBuffer::new(2);
            latest.store(0, tracker.clone());
            latest.store(1, tracker.clone());
            assert_eq!(latest.as_slice().map(|s| s.len()), Some(2));
            assert_eq!(Rc::strong_count(&tracker), 3);

            assert!(!latest.store(1, tracker.clone()));
            assert_eq!(Rc::strong_count(&tracker), 3);
            assert!(latest.is_ready(1));
            assert_eq!(latest.ready_len(), 2);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }
}
