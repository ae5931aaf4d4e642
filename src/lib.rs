//! Latest-value fan-in for async streams and pull/push stage runtimes.
//!
//! A merge-latest stage has N input ports and one output port. It remembers
//! the most recent element of every port and, once each port has produced at
//! least once, emits an aggregate of those latest values every time any port
//! produces. Backpressure is pull-based: an input port is only read after it
//! was pulled, and at most one aggregate waits for downstream demand.
//!
//! The crate comes in two layers:
//!
//! - [`logic`]: the runtime-agnostic state machine,
//!   [`MergeLatestLogic`][logic::MergeLatestLogic]. It reacts to port events
//!   and talks back to its runtime through the
//!   [`StageHost`][logic::StageHost] trait.
//! - [`stream`]: adapters driving that state machine from
//!   [`Stream::poll_next`][futures_core::Stream::poll_next], for `Vec`s and
//!   arrays of streams.
//!
//! # Examples
//!
//! ```rust
//! use merge_latest::prelude::*;
//! use futures_lite::future::block_on;
//! use futures_lite::{stream, StreamExt};
//!
//! block_on(async {
//!     let a = stream::once('a');
//!     let b = stream::once('b');
//!     let mut s = vec![a, b].merge_latest().unwrap();
//!     assert_eq!(s.next().await, Some(vec!['a', 'b']));
//!     assert_eq!(s.next().await, None);
//! })
//! ```
//!
//! # Completion
//!
//! By default the stage completes once every input port has completed, and
//! ports that completed keep contributing their last value. With
//! [`MergeLatestOptions::eager_close`][logic::MergeLatestOptions::eager_close]
//! it completes as soon as any port completes. An upstream failure fails the
//! stage with [`MergeLatestError::UpstreamFailure`].

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod error;
mod utils;

pub mod logic;
pub mod stream;

pub use error::MergeLatestError;

/// The merge-latest prelude.
pub mod prelude {
    pub use super::stream::IntoStream as _;
    pub use super::stream::MergeLatest as _;
    pub use super::stream::TryMergeLatest as _;
}

/// Helper functions and types for fixed-length arrays.
pub mod array {
    pub use crate::stream::merge_latest::array::MergeLatest;
}

/// Helper functions and types for contiguous growable array type with heap-allocated contents,
/// written `Vec<T>`.
pub mod vec {
    pub use crate::stream::merge_latest::vec::MergeLatest;
    pub use crate::stream::try_merge_latest::vec::TryMergeLatest;
}
