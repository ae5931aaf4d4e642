use super::TryMergeLatest as TryMergeLatestTrait;
use crate::logic::{Combine, MergeLatestOptions, ToVec};
use crate::stream::merge_latest::driver::Driver;
use crate::stream::IntoStream;
use crate::utils;
use crate::MergeLatestError;

use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

/// A stream that yields the latest value of every fallible stream in a
/// `Vec`, or the first error any of them reports.
///
/// This `struct` is created by the [`try_merge_latest`] method on the
/// [`TryMergeLatest`] trait. See its documentation for more.
///
/// [`try_merge_latest`]: trait.TryMergeLatest.html#method.try_merge_latest
/// [`TryMergeLatest`]: trait.TryMergeLatest.html
#[pin_project]
pub struct TryMergeLatest<S, T, E, C = ToVec>
where
    S: Stream<Item = Result<T, E>>,
    C: Combine<T>,
{
    #[pin]
    streams: Vec<Option<S>>,
    driver: Driver<T, C, E>,
}

impl<S, T, E, C> TryMergeLatest<S, T, E, C>
where
    S: Stream<Item = Result<T, E>>,
    C: Combine<T>,
{
    /// Merge `streams`, building every aggregate with `combine`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if `streams` is
    /// empty.
    pub fn with_combine(
        streams: Vec<S>,
        options: MergeLatestOptions,
        combine: C,
    ) -> Result<Self, MergeLatestError> {
        let driver = Driver::new(streams.len(), options, combine)?;
        let streams = streams.into_iter().map(Some).collect();
        Ok(Self { streams, driver })
    }
}

impl<S, T, E, C> fmt::Debug for TryMergeLatest<S, T, E, C>
where
    S: Stream<Item = Result<T, E>> + fmt::Debug,
    C: Combine<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryMergeLatest")
            .field("streams", &self.streams)
            .field("stage", self.driver.logic())
            .finish()
    }
}

impl<S, T, E, C> Stream for TryMergeLatest<S, T, E, C>
where
    S: Stream<Item = Result<T, E>>,
    C: Combine<T>,
{
    type Item = Result<C::Output, MergeLatestError<E>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let streams = utils::pin_vec_as_slice(this.streams);
        this.driver.poll_next(streams, cx, |item| item)
    }
}

impl<S, T, E> TryMergeLatestTrait for Vec<S>
where
    S: IntoStream<Item = Result<T, E>>,
    T: Clone,
{
    type Ok = Vec<T>;
    type Error = E;
    type Stream = TryMergeLatest<S::IntoStream, T, E>;

    fn try_merge_latest_with(
        self,
        options: MergeLatestOptions,
    ) -> Result<Self::Stream, MergeLatestError> {
        let streams = self.into_iter().map(|s| s.into_stream()).collect();
        TryMergeLatest::with_combine(streams, options, ToVec)
    }
}

#[cfg(test)]
mod tests {
    use crate::stream::TryMergeLatest;
    use crate::MergeLatestError;

    use futures::channel::mpsc;
    use futures_lite::future::block_on;
    use futures_lite::prelude::*;
    use futures_lite::stream;

    use std::io;

    #[test]
    fn all_ok_behaves_like_merge_latest() {
        block_on(async {
            let a = stream::once(Ok::<_, io::Error>(1));
            let b = stream::once(Ok(2));
            let mut s = vec![a, b].try_merge_latest().unwrap();

            assert_eq!(s.next().await.unwrap().unwrap(), vec![1, 2]);
            assert!(s.next().await.is_none());
        })
    }

    #[test]
    fn first_error_fails_the_merge() {
        block_on(async {
            let (tx0, rx0) = mpsc::unbounded::<Result<u8, io::Error>>();
            let (tx1, rx1) = mpsc::unbounded();
            let mut s = vec![rx0, rx1].try_merge_latest().unwrap();

            tx0.unbounded_send(Ok(1)).unwrap();
            tx1.unbounded_send(Ok(2)).unwrap();
            assert_eq!(s.next().await.unwrap().unwrap(), vec![1, 2]);

            tx1.unbounded_send(Err(io::ErrorKind::ConnectionReset.into()))
                .unwrap();
            match s.next().await {
                Some(Err(MergeLatestError::UpstreamFailure { port, source })) => {
                    assert_eq!(port, 1);
                    assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
                }
                other => panic!("expected an upstream failure, got {other:?}"),
            }

            // The other port was released along with the failed one.
            assert!(tx0.is_closed());
            assert!(tx0.unbounded_send(Ok(3)).is_err());
            assert!(s.next().await.is_none());
        })
    }

    #[test]
    fn error_before_first_aggregate() {
        block_on(async {
            let a = stream::once(Err::<u8, _>("boom"));
            let b = stream::pending();
            let mut s = vec![a.boxed(), b.boxed()].try_merge_latest().unwrap();

            let err = s.next().await.unwrap().unwrap_err();
            assert_eq!(err.port(), Some(0));
            assert_eq!(err.into_upstream(), Some("boom"));
            assert!(s.next().await.is_none());
        })
    }

    #[test]
    fn empty_vec_is_rejected() {
        let streams: Vec<stream::Once<Result<u8, io::Error>>> = vec![];
        assert!(streams.try_merge_latest().unwrap_err().is_invalid_configuration());
    }
}
