//! Latest-value fan-in for asynchronous streams.
//!
//! # Examples
//!
//! Follow the most recent reading of several sensors, once each has reported
//! at least once:
//!
//! ```
//! use merge_latest::prelude::*;
//! use futures_lite::future::block_on;
//! use futures_lite::{stream, StreamExt};
//!
//! fn main() {
//!     block_on(async {
//!         let temperature = stream::iter(vec![20, 21]);
//!         let humidity = stream::iter(vec![40]);
//!         let s = [temperature, humidity].merge_latest().unwrap();
//!
//!         let readings: Vec<_> = s.collect().await;
//!         assert_eq!(readings.last(), Some(&[21, 40]));
//!     })
//! }
//! ```
//!
//! # Operations
//!
//! | Name             | Return signature                | When does it return? |
//! | ---              | ---                             | ---                  |
//! | `MergeLatest`    | `C::Output`                     | Each time any stream produces, once all have produced.
//! | `TryMergeLatest` | `Result<C::Output, MergeLatestError<E>>` | Like `MergeLatest`, ending after the first error.
//!
//! Both end once every stream has ended, or as soon as one ends with
//! [`MergeLatestOptions::eager_close`][crate::logic::MergeLatestOptions::eager_close].
pub use into_stream::IntoStream;
pub use merge_latest::MergeLatest;
pub use try_merge_latest::TryMergeLatest;

mod into_stream;
pub(crate) mod merge_latest;
pub(crate) mod try_merge_latest;
