//! Utilities to implement the stream adapters of this crate.

mod pin;
mod rng;
mod wakers;

pub(crate) use pin::{get_pin_mut, pin_array_as_slice, pin_vec_as_slice};
pub(crate) use rng::random;
pub(crate) use wakers::WakerVec;

#[cfg(test)]
pub(crate) mod channel;
