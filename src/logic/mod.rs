//! The merge-latest stage as a host-driven state machine.
//!
//! [`MergeLatestLogic`] owns all of the stage's state: the latest value seen
//! on every input port, which ports have produced at least once, which ports
//! have an outstanding pull, and a single-slot handoff for an aggregate that
//! downstream has not asked for yet. A host (a graph runtime, or the
//! [`stream`](crate::stream) adapters of this crate) feeds it events one at
//! a time, and the stage answers by calling back into the host through
//! [`StageHost`].
//!
//! # Examples
//!
//! Drive a stage by hand with a host that records what it is asked to do:
//!
//! ```
//! use merge_latest::logic::{MergeLatestLogic, MergeLatestOptions, StageEvent, StageHost};
//! use merge_latest::MergeLatestError;
//!
//! #[derive(Default)]
//! struct Host {
//!     offered: Option<char>,
//!     emitted: Vec<Vec<char>>,
//!     completed: bool,
//! }
//!
//! impl StageHost<char, Vec<char>> for Host {
//!     fn pull(&mut self, _port: usize) {}
//!     fn grab(&mut self, _port: usize) -> Option<char> {
//!         self.offered.take()
//!     }
//!     fn push(&mut self, aggregate: Vec<char>) {
//!         self.emitted.push(aggregate);
//!     }
//!     fn complete_stage(&mut self) {
//!         self.completed = true;
//!     }
//!     fn fail_stage(&mut self, _error: MergeLatestError) {}
//!     fn cancel(&mut self, _port: usize) {}
//! }
//!
//! let mut stage = MergeLatestLogic::new(2, MergeLatestOptions::new())?;
//! let mut host = Host::default();
//! stage.on_event(StageEvent::Activate, &mut host);
//!
//! for (port, value) in [(0, 'a'), (1, 'b'), (0, 'c')] {
//!     stage.on_event(StageEvent::DownstreamPull, &mut host);
//!     host.offered = Some(value);
//!     stage.on_event(StageEvent::ElementAvailable(port), &mut host);
//! }
//! assert_eq!(host.emitted, vec![vec!['a', 'b'], vec!['c', 'b']]);
//!
//! stage.on_event(StageEvent::UpstreamFinished(0), &mut host);
//! stage.on_event(StageEvent::UpstreamFinished(1), &mut host);
//! assert!(host.completed);
//! # Ok::<(), MergeLatestError>(())
//! ```

mod combine;
mod event;
mod handoff;
mod host;
mod latest;
mod options;
mod port_set;
mod state;

pub use combine::{Combine, ToArray, ToVec};
pub use event::StageEvent;
pub use host::StageHost;
pub use options::MergeLatestOptions;
pub use state::StageState;

use handoff::Handoff;
use latest::LatestBuffer;
use port_set::PortSet;

use crate::MergeLatestError;

use core::fmt;
use tracing::{debug, trace, warn};

/// Identifies an input port of a stage: `0..ports`.
pub type PortId = usize;

/// Merges N input ports into one output port of latest-value aggregates.
///
/// Every element received on a port replaces that port's latest value. Once
/// every port has produced at least one element, each further element
/// produces an aggregate built by `C` from the latest value of every port.
///
/// Each port is pulled again as soon as it delivers an element, whether or
/// not downstream asked for anything. Aggregates produced without downstream
/// demand wait in a single slot; a newer aggregate replaces a waiting one.
///
/// Completion follows [`MergeLatestOptions::eager_close`]: either the stage
/// completes when the first port completes, or it keeps merging until all of
/// them have, with completed ports keeping their last value.
pub struct MergeLatestLogic<T, C = ToVec>
where
    C: Combine<T>,
{
    latest: LatestBuffer<T>,
    pulled: PortSet,
    closed: PortSet,
    running: usize,
    options: MergeLatestOptions,
    combine: C,
    pending: Handoff<C::Output>,
    demand: bool,
    state: StageState,
}

impl<T: Clone> MergeLatestLogic<T> {
    /// Create a stage for `ports` input ports whose aggregates are `Vec<T>`s
    /// in port order.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if `ports` is zero.
    pub fn new(ports: usize, options: MergeLatestOptions) -> Result<Self, MergeLatestError> {
        Self::with_combine(ports, options, ToVec)
    }
}

impl<T, C> MergeLatestLogic<T, C>
where
    C: Combine<T>,
{
    /// Create a stage for `ports` input ports whose aggregates are built by
    /// `combine`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if `ports` is zero.
    pub fn with_combine(
        ports: usize,
        options: MergeLatestOptions,
        combine: C,
    ) -> Result<Self, MergeLatestError> {
        if ports == 0 {
            return Err(MergeLatestError::no_ports());
        }
        Ok(Self {
            latest: LatestBuffer::new(ports),
            pulled: PortSet::new(ports),
            closed: PortSet::new(ports),
            running: ports,
            options,
            combine,
            pending: Handoff::new(),
            demand: false,
            state: StageState::Initializing,
        })
    }

    /// Handle one event from the host.
    pub fn on_event<E, H>(&mut self, event: StageEvent<E>, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        match event {
            StageEvent::Activate => self.on_activate(host),
            StageEvent::ElementAvailable(port) => self.on_element_available(port, host),
            StageEvent::UpstreamFinished(port) => self.on_upstream_finish(port, host),
            StageEvent::UpstreamFailed(port, error) => self.on_upstream_failure(port, error, host),
            StageEvent::DownstreamPull => self.on_downstream_pull(host),
            StageEvent::DownstreamCancelled => self.on_downstream_cancel(host),
        }
    }

    /// Start the stage: pull every input port.
    pub fn on_activate<E, H>(&mut self, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if self.state != StageState::Initializing {
            warn!(state = ?self.state, "merge latest stage activated twice");
            return;
        }
        self.state = StageState::Running;
        debug!(
            ports = self.ports(),
            eager_close = self.options.is_eager_close(),
            "merge latest stage activated"
        );
        for port in 0..self.ports() {
            self.pull(port, host);
        }
    }

    /// An element is available on `port`.
    ///
    /// The element is grabbed from the host and becomes the port's latest
    /// value. If every port has a value, an aggregate is emitted. The port is
    /// pulled again either way.
    pub fn on_element_available<E, H>(&mut self, port: PortId, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if !self.accepts(port, "element available") {
            return;
        }
        let Some(value) = host.grab(port) else {
            warn!(port, "element announced but nothing to grab");
            return;
        };
        self.pulled.remove(port);

        if self.latest.store(port, value) {
            trace!(port, ready = self.latest.ready_len(), "first element on port");
        }
        if let Some(latest) = self.latest.as_slice() {
            let aggregate = self.combine.combine(latest);
            self.emit(aggregate, host);
        }

        self.pull(port, host);
    }

    /// `port` completed.
    pub fn on_upstream_finish<E, H>(&mut self, port: PortId, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if !self.accepts(port, "upstream finished") {
            return;
        }
        self.close(port);

        if self.options.is_eager_close() {
            debug!(port, "upstream finished, completing eagerly");
            self.cancel_open_ports(host);
            self.complete(host);
        } else {
            self.running -= 1;
            trace!(port, running = self.running, "upstream finished");
            if self.running == 0 {
                self.complete(host);
            }
        }
    }

    /// `port` failed with `error`. This fails the whole stage.
    pub fn on_upstream_failure<E, H>(&mut self, port: PortId, error: E, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if !self.accepts(port, "upstream failed") {
            return;
        }
        self.close(port);
        self.state = StageState::Failed;
        self.pending.clear();
        debug!(port, "upstream failed, failing merge latest stage");

        self.cancel_open_ports(host);
        host.fail_stage(MergeLatestError::UpstreamFailure {
            port,
            source: error,
        });
    }

    /// Downstream requested an aggregate.
    ///
    /// Delivers the waiting aggregate if there is one, and pulls every open
    /// port that has no outstanding pull.
    pub fn on_downstream_pull<E, H>(&mut self, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        match self.state {
            StageState::Running => {}
            StageState::Draining => {
                if let Some(aggregate) = self.pending.take() {
                    trace!("pushing last aggregate");
                    host.push(aggregate);
                }
                self.complete(host);
                return;
            }
            _ => {
                trace!(state = ?self.state, "downstream pull ignored");
                return;
            }
        }

        match self.pending.take() {
            Some(aggregate) => {
                trace!("pushing waiting aggregate");
                host.push(aggregate);
            }
            None => self.demand = true,
        }

        for port in 0..self.ports() {
            if !self.closed.contains(port) {
                self.pull(port, host);
            }
        }
    }

    /// Downstream cancelled: cancel every input port.
    pub fn on_downstream_cancel<E, H>(&mut self, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if self.state.is_terminal() {
            trace!(state = ?self.state, "downstream cancel ignored");
            return;
        }
        self.state = StageState::Cancelled;
        self.pending.clear();
        self.demand = false;
        debug!(ports = self.ports(), "downstream cancelled, cancelling upstreams");

        for port in 0..self.ports() {
            self.close(port);
            host.cancel(port);
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> StageState {
        self.state
    }

    /// The options the stage was built with.
    pub fn options(&self) -> MergeLatestOptions {
        self.options
    }

    /// The number of input ports.
    pub fn ports(&self) -> usize {
        self.latest.len()
    }

    /// The number of ports that have not completed.
    ///
    /// Only counts down when eager close is disabled.
    pub fn running_upstreams(&self) -> usize {
        self.running
    }

    /// The number of ports that have produced at least one element.
    pub fn ready_ports(&self) -> usize {
        self.latest.ready_len()
    }

    /// Returns `true` if `port` has produced at least one element.
    pub fn is_ready(&self, port: PortId) -> bool {
        port < self.ports() && self.latest.is_ready(port)
    }

    /// Returns `true` if `port` has an outstanding pull.
    pub fn is_pulled(&self, port: PortId) -> bool {
        port < self.ports() && self.pulled.contains(port)
    }

    /// Returns `true` if `port` completed, failed or was cancelled.
    pub fn is_closed(&self, port: PortId) -> bool {
        port < self.ports() && self.closed.contains(port)
    }

    /// Returns `true` if an aggregate is waiting for downstream demand.
    pub fn has_pending(&self) -> bool {
        self.pending.is_occupied()
    }

    fn accepts(&self, port: PortId, event: &'static str) -> bool {
        if self.state != StageState::Running {
            trace!(port, event, state = ?self.state, "event ignored");
            false
        } else if port >= self.ports() {
            warn!(port, ports = self.ports(), event, "event for unknown port ignored");
            false
        } else if self.closed.contains(port) {
            warn!(port, event, "event for closed port ignored");
            false
        } else {
            true
        }
    }

    fn pull<E, H>(&mut self, port: PortId, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if self.pulled.insert(port) {
            trace!(port, "pulling port");
            host.pull(port);
        }
    }

    fn emit<E, H>(&mut self, aggregate: C::Output, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if self.demand {
            self.demand = false;
            trace!("pushing aggregate");
            host.push(aggregate);
        } else if self.pending.offer(aggregate).is_some() {
            trace!("waiting aggregate replaced by a newer one");
        } else {
            trace!("aggregate waits for downstream demand");
        }
    }

    fn close(&mut self, port: PortId) {
        self.closed.insert(port);
        self.pulled.remove(port);
    }

    fn cancel_open_ports<E, H>(&mut self, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        for port in 0..self.ports() {
            if self.closed.insert(port) {
                self.pulled.remove(port);
                host.cancel(port);
            }
        }
    }

    fn complete<E, H>(&mut self, host: &mut H)
    where
        H: StageHost<T, C::Output, E>,
    {
        if self.pending.is_occupied() {
            self.state = StageState::Draining;
            debug!("merge latest stage draining its last aggregate");
            return;
        }
        self.state = StageState::Completed;
        debug!("merge latest stage completed");
        host.complete_stage();
    }
}

impl<T, C> fmt::Debug for MergeLatestLogic<T, C>
where
    C: Combine<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeLatestLogic")
            .field("state", &self.state)
            .field("ports", &self.ports())
            .field("ready", &self.latest.ready_len())
            .field("running", &self.running)
            .field("eager_close", &self.options.is_eager_close())
            .field("pending", &self.pending.is_occupied())
            .finish()
    }
}
