use core::convert::Infallible;

use super::PortId;

/// An event delivered by the host to a merge-latest stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent<E = Infallible> {
    /// The stage was started.
    Activate,
    /// An element can be grabbed from the port.
    ElementAvailable(PortId),
    /// The port completed.
    UpstreamFinished(PortId),
    /// The port failed.
    UpstreamFailed(PortId, E),
    /// Downstream requested one aggregate.
    DownstreamPull,
    /// Downstream stopped consuming.
    DownstreamCancelled,
}

impl<E> StageEvent<E> {
    /// The input port the event refers to, if any.
    pub fn port(&self) -> Option<PortId> {
        match self {
            Self::ElementAvailable(port)
            | Self::UpstreamFinished(port)
            | Self::UpstreamFailed(port, _) => Some(*port),
            Self::Activate | Self::DownstreamPull | Self::DownstreamCancelled => None,
        }
    }
}
