use core::convert::Infallible;

use super::PortId;
use crate::MergeLatestError;

/// The runtime driving a merge-latest stage.
///
/// These are the calls the stage makes *on* its host. The host calls the
/// stage back through the `on_*` handlers of
/// [`MergeLatestLogic`](super::MergeLatestLogic) (or through
/// [`on_event`](super::MergeLatestLogic::on_event)), one event at a time.
///
/// `T` is the element type of the input ports, `A` the aggregate type of the
/// output port and `E` the error type reported by failing upstreams.
pub trait StageHost<T, A, E = Infallible> {
    /// Request one element from `port`.
    fn pull(&mut self, port: PortId);

    /// Retrieve the element that was announced as available on `port`.
    fn grab(&mut self, port: PortId) -> Option<T>;

    /// Emit an aggregate on the output port.
    ///
    /// Only called while downstream has an outstanding pull.
    fn push(&mut self, aggregate: A);

    /// The stage completed successfully. No more calls follow.
    fn complete_stage(&mut self);

    /// The stage failed. No more calls follow.
    fn fail_stage(&mut self, error: MergeLatestError<E>);

    /// Stop consuming `port`.
    fn cancel(&mut self, port: PortId);
}
