use futures_core::Stream;

/// Conversion into a [`Stream`].
///
/// Every stream converts into itself. The merge traits accept any collection
/// of `IntoStream` values and convert each before merging.
pub trait IntoStream {
    /// The type of the elements being yielded.
    type Item;

    /// The stream this value turns into.
    type IntoStream: Stream<Item = Self::Item>;

    /// Creates a stream from a value.
    fn into_stream(self) -> Self::IntoStream;
}

impl<S: Stream> IntoStream for S {
    type Item = S::Item;
    type IntoStream = S;

    #[inline]
    fn into_stream(self) -> S {
        self
    }
}
