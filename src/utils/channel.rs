//! A single-threaded channel whose receiver returns `Pending` until a value
//! is sent, for exercising the waker paths of the stream adapters.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures_core::Stream;

struct Shared<T> {
    queue: VecDeque<T>,
    waker: Option<Waker>,
    closed: bool,
}

impl<T> Shared<T> {
    fn wake(&mut self) {
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

pub(crate) struct LocalReceiver<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Stream for LocalReceiver<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut shared = self.shared.borrow_mut();
        match shared.queue.pop_front() {
            Some(item) => Poll::Ready(Some(item)),
            None if shared.closed => Poll::Ready(None),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

pub(crate) struct LocalSender<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> LocalSender<T> {
    pub(crate) fn send(&self, item: T) {
        let mut shared = self.shared.borrow_mut();
        shared.queue.push_back(item);
        shared.wake();
    }
}

impl<T> Drop for LocalSender<T> {
    fn drop(&mut self) {
        let mut shared = self.shared.borrow_mut();
        shared.closed = true;
        shared.wake();
    }
}

pub(crate) fn local_channel<T>() -> (LocalSender<T>, LocalReceiver<T>) {
    let shared = Rc::new(RefCell::new(Shared {
        queue: VecDeque::new(),
        waker: None,
        closed: false,
    }));
    (
        LocalSender {
            shared: shared.clone(),
        },
        LocalReceiver { shared },
    )
}
