use std::sync::{Arc, Mutex};
use std::task::Wake;

use super::ReadinessVec;

/// The waker handed to the stream behind one port.
///
/// Waking it marks the port ready, and wakes the task polling the merged
/// stream the first time the port becomes ready.
#[derive(Debug, Clone)]
pub(crate) struct PortWaker {
    port: usize,
    readiness: Arc<Mutex<ReadinessVec>>,
}

impl PortWaker {
    pub(crate) fn new(port: usize, readiness: Arc<Mutex<ReadinessVec>>) -> Self {
        Self { port, readiness }
    }
}

impl Wake for PortWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref()
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let Ok(mut readiness) = self.readiness.lock() else {
            return;
        };
        let was_ready = readiness.set_ready(self.port);
        if !was_ready {
            if let Some(parent) = readiness.parent_waker() {
                parent.wake_by_ref();
            }
        }
    }
}
