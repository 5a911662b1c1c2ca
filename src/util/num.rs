/// Reads a signed integer from a raw little-endian buffer, sign-extending it
/// to 64 bits.
///
/// The buffer length selects the lane: 1, 2, 4 or 8 bytes are interpreted as
/// `i8`, `i16`, `i32` or `i64` respectively. Any other length yields `0`.
///
/// # Parameters
/// - `bytes`: The raw value buffer in native byte order.
///
/// # Returns
/// The sign-extended 64-bit value.
///
/// # Example
/// ```
/// use cleat::util::num::integer_from_bytes;
///
/// let bytes = (-7i32).to_ne_bytes();
/// assert_eq!(integer_from_bytes(&bytes), -7);
/// ```
#[must_use]
pub fn integer_from_bytes(bytes: &[u8]) -> i64 {
    match bytes.len() {
        1 => i64::from(bytes[0] as i8),
        2 => {
            let mut raw = [0u8; 2];
            raw.copy_from_slice(&bytes[..2]);
            i64::from(i16::from_ne_bytes(raw))
        },
        4 => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[..4]);
            i64::from(i32::from_ne_bytes(raw))
        },
        8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            i64::from_ne_bytes(raw)
        },
        _ => 0,
    }
}

/// Reads a floating-point number from a raw buffer, widening it to `f64`.
///
/// A 4-byte buffer is read as `f32`, an 8-byte buffer as `f64`. Any other
/// length yields `0.0`.
///
/// # Parameters
/// - `bytes`: The raw value buffer in native byte order.
///
/// # Returns
/// The value widened to `f64`.
#[must_use]
pub fn decimal_from_bytes(bytes: &[u8]) -> f64 {
    match bytes.len() {
        4 => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[..4]);
            f64::from(f32::from_ne_bytes(raw))
        },
        8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            f64::from_ne_bytes(raw)
        },
        _ => 0.0,
    }
}

/// Narrows a 64-bit integer to a raw buffer of the requested size.
///
/// The value is truncated to 1, 2, 4 or 8 bytes. Unsupported sizes produce an
/// empty buffer.
///
/// # Parameters
/// - `value`: The value to narrow.
/// - `size`: The target lane width in bytes.
///
/// # Returns
/// The native-byte-order representation of the narrowed value.
///
/// # Example
/// ```
/// use cleat::util::num::integer_to_bytes;
///
/// assert_eq!(integer_to_bytes(258, 1), vec![2]);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn integer_to_bytes(value: i64, size: usize) -> Vec<u8> {
    match size {
        1 => vec![value as u8],
        2 => (value as i16).to_ne_bytes().to_vec(),
        4 => (value as i32).to_ne_bytes().to_vec(),
        8 => value.to_ne_bytes().to_vec(),
        _ => Vec::new(),
    }
}

/// Narrows an `f64` to a raw buffer of the requested size.
///
/// A size of 4 produces an `f32` representation, a size of 8 an `f64` one.
/// Unsupported sizes produce an empty buffer.
///
/// # Parameters
/// - `value`: The value to narrow.
/// - `size`: The target lane width in bytes.
///
/// # Returns
/// The native-byte-order representation of the narrowed value.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn decimal_to_bytes(value: f64, size: usize) -> Vec<u8> {
    match size {
        4 => (value as f32).to_ne_bytes().to_vec(),
        8 => value.to_ne_bytes().to_vec(),
        _ => Vec::new(),
    }
}
