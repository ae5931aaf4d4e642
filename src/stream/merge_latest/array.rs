use super::driver::{self, Driver};
use super::MergeLatest as MergeLatestTrait;
use crate::logic::{Combine, MergeLatestOptions, ToArray};
use crate::stream::IntoStream;
use crate::utils;
use crate::MergeLatestError;

use core::convert::Infallible;
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

/// A stream that yields the latest value of every stream in an array, each
/// time any of them produces.
///
/// This `struct` is created by the [`merge_latest`] method on the
/// [`MergeLatest`] trait. See its documentation for more.
///
/// [`merge_latest`]: trait.MergeLatest.html#method.merge_latest
/// [`MergeLatest`]: trait.MergeLatest.html
#[pin_project]
pub struct MergeLatest<S, const N: usize, C = ToArray<N>>
where
    S: Stream,
    C: Combine<S::Item>,
{
    #[pin]
    streams: [Option<S>; N],
    driver: Driver<S::Item, C, Infallible>,
}

impl<S, const N: usize, C> MergeLatest<S, N, C>
where
    S: Stream,
    C: Combine<S::Item>,
{
    /// Merge `streams`, building every aggregate with `combine`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if `N` is zero.
    pub fn with_combine(
        streams: [S; N],
        options: MergeLatestOptions,
        combine: C,
    ) -> Result<Self, MergeLatestError> {
        let driver = Driver::new(N, options, combine)?;
        Ok(Self {
            streams: streams.map(Some),
            driver,
        })
    }
}

impl<S, const N: usize, C> fmt::Debug for MergeLatest<S, N, C>
where
    S: Stream + fmt::Debug,
    C: Combine<S::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeLatest")
            .field("streams", &self.streams)
            .field("stage", self.driver.logic())
            .finish()
    }
}

impl<S, const N: usize, C> Stream for MergeLatest<S, N, C>
where
    S: Stream,
    C: Combine<S::Item>,
{
    type Item = C::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let streams = utils::pin_array_as_slice(this.streams);
        driver::infallible(this.driver.poll_next(streams, cx, Ok))
    }
}

impl<S, const N: usize> MergeLatestTrait for [S; N]
where
    S: IntoStream,
    S::Item: Clone,
{
    type Item = <MergeLatest<S::IntoStream, N> as Stream>::Item;
    type Stream = MergeLatest<S::IntoStream, N>;

    fn merge_latest_with(self, options: MergeLatestOptions) -> Result<Self::Stream, MergeLatestError> {
        MergeLatest::with_combine(self.map(|i| i.into_stream()), options, ToArray::<N>)
    }
}

#[cfg(test)]
mod tests {
    use crate::logic::MergeLatestOptions;
    use crate::stream::MergeLatest;
    use crate::utils::channel::local_channel;

    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use futures_lite::future::block_on;
    use futures_lite::prelude::*;
    use futures_lite::stream;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn merge_latest_array_2() {
        block_on(async {
            let a = stream::once("a");
            let b = stream::once("b");
            let mut s = [a, b].merge_latest().unwrap();

            assert_eq!(s.next().await, Some(["a", "b"]));
            assert_eq!(s.next().await, None);
        })
    }

    #[test]
    fn zero_length_array_is_rejected() {
        let streams: [stream::Once<u8>; 0] = [];
        assert!(streams.merge_latest().unwrap_err().is_invalid_configuration());
    }

    #[test]
    fn custom_combine() {
        block_on(async {
            let a = stream::iter(vec![1, 2]);
            let b = stream::pending();
            let max = |latest: &[i32]| latest.iter().copied().max();
            let mut s = super::MergeLatest::with_combine(
                [a.boxed(), b.boxed()],
                MergeLatestOptions::new().eager_close(true),
                max,
            )
            .unwrap();

            // `b` never produces, so nothing is ever emitted.
            assert_eq!(s.next().await, None);
        })
    }

    #[test]
    fn stale_ports_keep_their_value() {
        let mut pool = LocalPool::new();
        let seen = Rc::new(RefCell::new(vec![]));
        let seen2 = seen.clone();

        pool.spawner()
            .spawn_local(async move {
                let (send1, receive1) = local_channel();
                let (send2, receive2) = local_channel();
                let (send3, receive3) = local_channel();
                let mut s = [receive1, receive2, receive3].merge_latest().unwrap();

                send1.send('a');
                send2.send('b');
                send3.send('c');
                seen2.borrow_mut().push(s.next().await);
                send1.send('d');
                seen2.borrow_mut().push(s.next().await);
                send3.send('e');
                seen2.borrow_mut().push(s.next().await);
            })
            .unwrap();

        pool.run();
        assert_eq!(
            *seen.borrow(),
            vec![
                Some(['a', 'b', 'c']),
                Some(['d', 'b', 'c']),
                Some(['d', 'b', 'e'])
            ]
        );
    }
}
