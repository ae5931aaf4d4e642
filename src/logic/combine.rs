use core::array;
use core::fmt;

/// Turns the latest value of every port into one aggregate.
///
/// `latest[i]` is the most recent value received on port `i`; the slice
/// always holds one value per port. Closures of the shape
/// `FnMut(&[T]) -> A` implement this trait.
///
/// # Examples
///
/// ```
/// use merge_latest::logic::Combine;
///
/// let mut sum = |latest: &[u32]| latest.iter().sum::<u32>();
/// assert_eq!(sum.combine(&[1, 2, 3][..]), 6);
/// ```
pub trait Combine<T> {
    /// The aggregate type.
    type Output;

    /// Build an aggregate from a snapshot of the latest values.
    fn combine(&mut self, latest: &[T]) -> Self::Output;
}

impl<T, A, F> Combine<T> for F
where
    F: FnMut(&[T]) -> A,
{
    type Output = A;

    fn combine(&mut self, latest: &[T]) -> A {
        self(latest)
    }
}

/// Collects the latest values into a `Vec`, in port order.
///
/// This is the default combining function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToVec;

impl<T: Clone> Combine<T> for ToVec {
    type Output = Vec<T>;

    fn combine(&mut self, latest: &[T]) -> Vec<T> {
        latest.to_vec()
    }
}

/// Collects the latest values into a fixed-length array, in port order.
#[derive(Clone, Copy, Default)]
pub struct ToArray<const N: usize>;

impl<const N: usize> fmt::Debug for ToArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToArray<{N}>")
    }
}

impl<T: Clone, const N: usize> Combine<T> for ToArray<N> {
    type Output = [T; N];

    fn combine(&mut self, latest: &[T]) -> [T; N] {
        debug_assert_eq!(latest.len(), N, "one latest value per port");
        array::from_fn(|port| latest[port].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_port_order() {
        assert_eq!(ToVec.combine(&['x', 'y', 'z'][..]), vec!['x', 'y', 'z']);
        assert_eq!(ToArray::<2>.combine(&[7, 9][..]), [7, 9]);
    }

    #[test]
    fn closures_can_keep_state() {
        let mut calls = 0;
        let mut count = |latest: &[i32]| {
            calls += 1;
            latest.len()
        };
        assert_eq!(count.combine(&[1, 2][..]), 2);
        assert_eq!(count.combine(&[1, 2][..]), 2);
        drop(count);
        assert_eq!(calls, 2);
    }
}
