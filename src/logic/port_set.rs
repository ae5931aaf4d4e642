use fixedbitset::FixedBitSet;

use super::PortId;

/// A fixed-size set of ports with an O(1) element count.
#[derive(Debug, Clone)]
pub(crate) struct PortSet {
    count: usize,
    ports: FixedBitSet,
}

impl PortSet {
    /// Create an empty set for `len` ports.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            count: 0,
            ports: FixedBitSet::with_capacity(len),
        }
    }

    /// Add the port to the set.
    ///
    /// Returns `true` if the port was not yet in the set.
    pub(crate) fn insert(&mut self, port: PortId) -> bool {
        if !self.ports[port] {
            self.count += 1;
            self.ports.insert(port);
            true
        } else {
            false
        }
    }

    /// Remove the port from the set.
    ///
    /// Returns whether the port was in the set.
    pub(crate) fn remove(&mut self, port: PortId) -> bool {
        if self.ports[port] {
            self.count -= 1;
            self.ports.set(port, false);
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn contains(&self, port: PortId) -> bool {
        self.ports.contains(port)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if every port is in the set.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.count == self.ports.len()
    }
}
