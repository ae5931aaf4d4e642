use crate::logic::{Combine, MergeLatestLogic, MergeLatestOptions, PortId, StageHost, StageState};
use crate::utils::{self, WakerVec};
use crate::MergeLatestError;

use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use smallvec::SmallVec;

/// What a poll of the merged stream resolves to.
pub(crate) type Polled<A, E> = Poll<Option<Result<A, MergeLatestError<E>>>>;

/// Answers the calls of a [`MergeLatestLogic`] on behalf of a poll loop.
///
/// Pulls are collected and turned into readiness by the driver, and
/// cancelled ports are collected so their streams can be dropped. The output
/// port has room for exactly one aggregate, which is handed out before the
/// next event is delivered.
struct PollHost<T, A, E> {
    delivered: Option<(PortId, T)>,
    output: Option<A>,
    failure: Option<MergeLatestError<E>>,
    completed: bool,
    requested: SmallVec<[PortId; 8]>,
    cancelled: SmallVec<[PortId; 8]>,
}

impl<T, A, E> PollHost<T, A, E> {
    fn new() -> Self {
        Self {
            delivered: None,
            output: None,
            failure: None,
            completed: false,
            requested: SmallVec::new(),
            cancelled: SmallVec::new(),
        }
    }
}

impl<T, A, E> StageHost<T, A, E> for PollHost<T, A, E> {
    fn pull(&mut self, port: PortId) {
        self.requested.push(port);
    }

    fn grab(&mut self, port: PortId) -> Option<T> {
        match self.delivered.take() {
            Some((delivered, value)) if delivered == port => Some(value),
            other => {
                self.delivered = other;
                None
            }
        }
    }

    fn push(&mut self, aggregate: A) {
        debug_assert!(self.output.is_none(), "output port holds one aggregate");
        self.output = Some(aggregate);
    }

    fn complete_stage(&mut self) {
        self.completed = true;
    }

    fn fail_stage(&mut self, error: MergeLatestError<E>) {
        self.failure = Some(error);
    }

    fn cancel(&mut self, port: PortId) {
        self.cancelled.push(port);
    }
}

/// Drives a [`MergeLatestLogic`] from `Stream::poll_next`.
///
/// Each call to `poll_next` is a downstream pull. Child streams are polled
/// only while they have an outstanding pull and have been woken; every port
/// is visited at most once per call, starting at a random port. A stream is
/// dropped as soon as its port finishes, fails or is cancelled.
pub(crate) struct Driver<T, C, E>
where
    C: Combine<T>,
{
    logic: MergeLatestLogic<T, C>,
    host: PollHost<T, C::Output, E>,
    wakers: WakerVec,
    done: bool,
}

impl<T, C, E> Driver<T, C, E>
where
    C: Combine<T>,
{
    pub(crate) fn new(
        ports: usize,
        options: MergeLatestOptions,
        combine: C,
    ) -> Result<Self, MergeLatestError> {
        let logic = MergeLatestLogic::with_combine(ports, options, combine)?;
        Ok(Self {
            logic,
            host: PollHost::new(),
            wakers: WakerVec::new(ports),
            done: false,
        })
    }

    pub(crate) fn logic(&self) -> &MergeLatestLogic<T, C> {
        &self.logic
    }

    /// Poll the streams once. `split` separates elements from upstream
    /// failures.
    ///
    /// A slot holding `None` is a stream that has been released.
    pub(crate) fn poll_next<S, M>(
        &mut self,
        mut streams: Pin<&mut [Option<S>]>,
        cx: &mut Context<'_>,
        mut split: M,
    ) -> Polled<C::Output, E>
    where
        S: Stream,
        M: FnMut(S::Item) -> Result<T, E>,
    {
        assert!(!self.done, "Stream should not be polled after completion");

        match self.logic.state() {
            StageState::Initializing => {
                self.logic.on_activate(&mut self.host);
                self.logic.on_downstream_pull(&mut self.host);
            }
            StageState::Running | StageState::Draining => {
                self.logic.on_downstream_pull(&mut self.host)
            }
            // A failure was yielded by the previous poll.
            _ => {}
        }
        self.sync_pulls();
        if let Some(polled) = self.take_output(streams.as_mut()) {
            return polled;
        }

        let len = streams.len();
        {
            let mut readiness = self.wakers.readiness().lock().unwrap();
            readiness.set_waker(cx.waker());
            if !readiness.any_ready() {
                return Poll::Pending;
            }
        }

        let start = utils::random(len);
        let mut repulled = false;
        for offset in 0..len {
            let port = (start + offset) % len;
            if !self.logic.is_pulled(port) {
                continue;
            }
            // Readiness is only consumed by a port that is polled below, so
            // ports after an early return keep theirs for the next call.
            if !self.wakers.readiness().lock().unwrap().clear_ready(port) {
                continue;
            }
            let Some(stream) = utils::get_pin_mut(streams.as_mut(), port)
                .and_then(|slot| slot.as_pin_mut())
            else {
                continue;
            };

            let mut cx = Context::from_waker(self.wakers.get(port).unwrap());
            match stream.poll_next(&mut cx) {
                Poll::Ready(Some(item)) => match split(item) {
                    Ok(value) => {
                        self.host.delivered = Some((port, value));
                        self.logic.on_element_available(port, &mut self.host);
                    }
                    Err(error) => {
                        self.host.cancelled.push(port);
                        self.logic.on_upstream_failure(port, error, &mut self.host);
                    }
                },
                Poll::Ready(None) => {
                    self.host.cancelled.push(port);
                    self.logic.on_upstream_finish(port, &mut self.host);
                }
                Poll::Pending => {}
            }

            repulled |= self.sync_pulls();
            if let Some(polled) = self.take_output(streams.as_mut()) {
                return polled;
            }
        }

        // Ports that produced without completing an aggregate have been
        // pulled again, but their wakers won't fire for data they already
        // handed over.
        if repulled {
            cx.waker().wake_by_ref();
        }
        Poll::Pending
    }

    /// Mark every newly pulled port as ready to be polled.
    fn sync_pulls(&mut self) -> bool {
        if self.host.requested.is_empty() {
            return false;
        }
        let mut readiness = self.wakers.readiness().lock().unwrap();
        for port in self.host.requested.drain(..) {
            readiness.set_ready(port);
        }
        true
    }

    /// Drop the streams of every port that finished, failed or was cancelled.
    fn release<S>(&mut self, mut streams: Pin<&mut [Option<S>]>) {
        for port in self.host.cancelled.drain(..) {
            if let Some(mut slot) = utils::get_pin_mut(streams.as_mut(), port) {
                slot.set(None);
            }
        }
    }

    fn take_output<S>(&mut self, streams: Pin<&mut [Option<S>]>) -> Option<Polled<C::Output, E>> {
        self.release(streams);
        if let Some(error) = self.host.failure.take() {
            return Some(Poll::Ready(Some(Err(error))));
        }
        if let Some(aggregate) = self.host.output.take() {
            return Some(Poll::Ready(Some(Ok(aggregate))));
        }
        if self.host.completed || self.logic.state().is_terminal() {
            self.done = true;
            return Some(Poll::Ready(None));
        }
        None
    }
}

/// Dropping the merged stream is a downstream cancellation.
impl<T, C, E> Drop for Driver<T, C, E>
where
    C: Combine<T>,
{
    fn drop(&mut self) {
        if !self.logic.state().is_terminal() {
            self.logic.on_downstream_cancel(&mut self.host);
        }
    }
}

impl<T, C, E> fmt::Debug for Driver<T, C, E>
where
    C: Combine<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("logic", &self.logic)
            .field("done", &self.done)
            .finish()
    }
}

/// Unwrap the result of a driver whose upstreams cannot fail.
pub(crate) fn infallible<A>(polled: Polled<A, core::convert::Infallible>) -> Poll<Option<A>> {
    match polled {
        Poll::Ready(Some(Ok(aggregate))) => Poll::Ready(Some(aggregate)),
        Poll::Ready(Some(Err(MergeLatestError::UpstreamFailure { source, .. }))) => match source {},
        Poll::Ready(Some(Err(MergeLatestError::InvalidConfiguration { .. }))) => {
            unreachable!("configuration is validated on construction")
        }
        Poll::Ready(None) => Poll::Ready(None),
        Poll::Pending => Poll::Pending,
    }
}
