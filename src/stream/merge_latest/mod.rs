use crate::logic::MergeLatestOptions;
use crate::MergeLatestError;

use futures_core::Stream;

pub(crate) mod array;
pub(crate) mod driver;
pub(crate) mod vec;

/// Combines multiple streams into a single stream of their latest values.
///
/// Nothing is yielded until every stream has produced at least once. After
/// that, every item produced by any stream yields a snapshot holding the most
/// recent item of each stream, in stream order.
///
/// By default the merged stream ends once every stream has ended; streams
/// that ended keep contributing their last item. With
/// [`MergeLatestOptions::eager_close`] it ends as soon as any stream ends.
///
/// # Examples
///
/// ```
/// use merge_latest::prelude::*;
/// use futures_lite::stream::{self, StreamExt};
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let a = stream::once(1);
///     let b = stream::once(2);
///     let c = stream::once(3);
///     let mut s = [a, b, c].merge_latest().unwrap();
///
///     assert_eq!(s.next().await, Some([1, 2, 3]));
///     assert_eq!(s.next().await, None);
/// })
/// ```
pub trait MergeLatest {
    /// The resulting output type.
    type Item;

    /// The stream type.
    type Stream: Stream<Item = Self::Item>;

    /// Combine multiple streams into a single stream of latest values, ending
    /// once every stream has ended.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if there are no
    /// streams to merge.
    fn merge_latest(self) -> Result<Self::Stream, MergeLatestError>
    where
        Self: Sized,
    {
        self.merge_latest_with(MergeLatestOptions::new())
    }

    /// Combine multiple streams into a single stream of latest values, with
    /// the given options.
    ///
    /// # Errors
    ///
    /// Returns [`MergeLatestError::InvalidConfiguration`] if there are no
    /// streams to merge.
    fn merge_latest_with(self, options: MergeLatestOptions) -> Result<Self::Stream, MergeLatestError>;
}
