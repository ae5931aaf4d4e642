use super::driver::{self, Driver};
use super::MergeLatest as MergeLatestTrait;
use crate::logic::{Combine, MergeLatestOptions, ToVec};
use crate::stream::IntoStream;
use crate::utils;
use crate::MergeLatestError;

use core::convert::Infallible;
use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

/// A stream that yields the latest value of every stream in a `Vec`, each
/// time any of them produces.
///
/// This `struct` is created by the [`merge_latest`] method on the
/// [`MergeLatest`] trait, or by [`MergeLatest::with_combine`] for a custom
/// combining function. See their documentation for more.
///
/// [`merge_latest`]: trait.MergeLatest.html#method.merge_latest
/// [`MergeLatest`]: trait.MergeLatest.html
#[pin_project]
pub struct MergeLatest<S, C = ToVec>
where
    S: Stream,
    C: Combine<S::Item>,
{
    #[pin]
    streams: Vec<Option<S>>,
    driver: Driver<S::Item, C, Infallible>,
}

impl<S, C> MergeLatest<S, C>
where
    S: Stream,
    C: Combine<S::Item>,
{
    /// Merge `streams`, building every aggregate with `combine`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if `streams` is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use merge_latest::logic::MergeLatestOptions;
    /// use merge_latest::vec::MergeLatest;
    /// use futures_lite::future::block_on;
    /// use futures_lite::{stream, StreamExt};
    ///
    /// block_on(async {
    ///     let streams = vec![stream::once(1), stream::once(2), stream::once(3)];
    ///     let sum = |latest: &[i32]| latest.iter().sum::<i32>();
    ///     let mut s = MergeLatest::with_combine(streams, MergeLatestOptions::new(), sum)?;
    ///
    ///     assert_eq!(s.next().await, Some(6));
    ///     assert_eq!(s.next().await, None);
    ///     Ok::<(), merge_latest::MergeLatestError>(())
    /// })
    /// .unwrap();
    /// ```
    pub fn with_combine(
        streams: Vec<S>,
        options: MergeLatestOptions,
        combine: C,
    ) -> Result<Self, MergeLatestError> {
        let driver = Driver::new(streams.len(), options, combine)?;
        let streams = streams.into_iter().map(Some).collect();
        Ok(Self { streams, driver })
    }

    /// The number of merged streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Always `false`: a merge of no streams cannot be built.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl<S, C> fmt::Debug for MergeLatest<S, C>
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

impl<S, C> Stream for MergeLatest<S, C>
where
    S: Stream,
    C: Combine<S::Item>,
{
    type Item = C::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let streams = utils::pin_vec_as_slice(this.streams);
        driver::infallible(this.driver.poll_next(streams, cx, Ok))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<S> MergeLatestTrait for Vec<S>
where
    S: IntoStream,
    S::Item: Clone,
{
    type Item = <MergeLatest<S::IntoStream> as Stream>::Item;
    type Stream = MergeLatest<S::IntoStream>;

    fn merge_latest_with(self, options: MergeLatestOptions) -> Result<Self::Stream, MergeLatestError> {
        let streams = self.into_iter().map(|s| s.into_stream()).collect();
        MergeLatest::with_combine(streams, options, ToVec)
    }
}
