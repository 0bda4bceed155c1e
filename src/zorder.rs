//! Z-order (Morton) encoding: interleaves two 32-bit coordinates into one
//! 64-bit locality-preserving key. Used as the sort key during bulk
//! loading; keys are never persisted.

use crate::*;

/// Spread the bits of `x` into the even bit positions of a u64.
fn interleave(x: u32) -> u64 {
    let mut result = u64::from(x);
    result = (result | (result << 16)) & 0x0000_FFFF_0000_FFFF;
    result = (result | (result << 8)) & 0x00FF_00FF_00FF_00FF;
    result = (result | (result << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    result = (result | (result << 2)) & 0x3333_3333_3333_3333;
    result = (result | (result << 1)) & 0x5555_5555_5555_5555;
    result
}

fn deinterleave(z: u64) -> u32 {
    let mut x = z & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x >> 4)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x >> 8)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x >> 16)) & 0x0000_0000_FFFF_FFFF;
    x as u32
}

/// Interleave `(x, y)` into a Morton key; injective on the full u32 grid.
pub fn encode(x: u32, y: u32) -> u64 {
    interleave(x) | (interleave(y) << 1)
}

/// Inverse of [`encode`].
pub fn decode(z: u64) -> (u32, u32) {
    (deinterleave(z), deinterleave(z >> 1))
}

/// Quantize `point` onto the 2^32 grid spanned by `bounds` and encode it.
/// Coordinates outside the bounds clamp to the grid edge; a degenerate
/// axis maps to zero.
pub fn encode_point(point: Point, bounds: &Rectangle) -> u64 {
    let quantize = |value: float, origin: float, extent: float| -> u32 {
        if extent < TOLERANCE {
            return 0;
        }
        // f64-to-int casts saturate, so out-of-bounds points clamp
        ((value - origin) / extent * u32::MAX as float) as u32
    };
    encode(
        quantize(point.x, bounds.x, bounds.width),
        quantize(point.y, bounds.y, bounds.height),
    )
}
