//! Fallible allocation of grid-sized arrays.

use ndarray::Array1;

use crate::error::MaterialError;

/// Allocate an array of `len` copies of `value`.
///
/// Reports [`MaterialError::AllocationFailure`] instead of aborting when the
/// allocator cannot satisfy the request.
pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Array1<T>, MaterialError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MaterialError::AllocationFailure { elements: len })?;
    data.resize(len, value);
    Ok(Array1::from_vec(data))
}
