use crate::logic::MergeLatestOptions;
use crate::MergeLatestError;

use futures_core::Stream;

pub(crate) mod vec;

/// Combines multiple fallible streams into a single stream of their latest
/// values.
///
/// This behaves like [`MergeLatest`][super::MergeLatest], except that every
/// stream yields `Result<T, E>`. The first `Err` from any stream is yielded
/// as [`MergeLatestError::UpstreamFailure`], the other streams are dropped
/// from the merge, and the stream then ends.
///
/// # Examples
///
/// ```
/// use merge_latest::prelude::*;
/// use futures_lite::stream::{self, StreamExt};
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let a = stream::iter(vec![Ok(1), Err("broken")]);
///     let b = stream::once(Ok(2));
///     let mut s = vec![a.boxed(), b.boxed()].try_merge_latest().unwrap();
///
///     assert_eq!(s.next().await.unwrap().unwrap(), vec![1, 2]);
///     let err = s.next().await.unwrap().unwrap_err();
///     assert_eq!(err.port(), Some(0));
///     assert!(s.next().await.is_none());
/// })
/// ```
pub trait TryMergeLatest {
    /// The value held by each stream on success.
    type Ok;

    /// The error type of the streams.
    type Error;

    /// The stream type.
    type Stream: Stream<Item = Result<Self::Ok, MergeLatestError<Self::Error>>>;

    /// Combine multiple fallible streams into a single stream of latest
    /// values, ending once every stream has ended or one has failed.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if there are no
    /// streams to merge.
    fn try_merge_latest(self) -> Result<Self::Stream, MergeLatestError>
    where
        Self: Sized,
    {
        self.try_merge_latest_with(MergeLatestOptions::new())
    }

    /// Combine multiple fallible streams into a single stream of latest
    /// values, with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if there are no
    /// streams to merge.
    fn try_merge_latest_with(
        self,
        options: MergeLatestOptions,
    ) -> Result<Self::Stream, MergeLatestError>;
}
