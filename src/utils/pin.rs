use core::pin::Pin;

/// Project a pinned `Vec` to a pinned slice of its elements.
pub(crate) fn pin_vec_as_slice<T>(vec: Pin<&mut Vec<T>>) -> Pin<&mut [T]> {
    // SAFETY: the elements stay where they are; we only change the view from
    // the vec to its slice. The vec is never resized while pinned.
    unsafe { vec.map_unchecked_mut(|vec| vec.as_mut_slice()) }
}

/// Project a pinned array to a pinned slice of its elements.
pub(crate) fn pin_array_as_slice<T, const N: usize>(array: Pin<&mut [T; N]>) -> Pin<&mut [T]> {
    // SAFETY: `std` _could_ make this unsound if it were to decide Pin's
    // invariants aren't required to transmit through arrays. Otherwise this has
    // the same safety as a normal field pin projection.
    unsafe { array.map_unchecked_mut(|array| &mut array[..]) }
}

/// Returns a pinned mutable reference to the element at `index`, or `None`
/// if the index is out of bounds.
#[inline]
pub(crate) fn get_pin_mut<T>(slice: Pin<&mut [T]>, index: usize) -> Option<Pin<&mut T>> {
    // SAFETY: `get_unchecked_mut` is never used to move the slice inside `self`.
    // `x` is guaranteed to be pinned because it comes from `slice` which is pinned.
    unsafe {
        slice
            .get_unchecked_mut()
            .get_mut(index)
            .map(|x| Pin::new_unchecked(x))
    }
}
