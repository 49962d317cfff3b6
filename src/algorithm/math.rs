//! Scalar helpers used when ordering and measuring geometries on the sphere.

use std::f64::consts::PI;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Great-circle distance in metres between two latitude/longitude pairs given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1 * PI / 180.0;
    let lon1 = lon1 * PI / 180.0;
    let lat2 = lat2 * PI / 180.0;
    let lon2 = lon2 * PI / 180.0;

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}

fn hilbert_interleave(mut x: u32) -> u32 {
    x = (x | (x << 8)) & 0x00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;
    x
}

/// Index of cell `(x, y)` along the Hilbert curve filling a `2^n` by `2^n` grid.
///
/// `n` must be in `1..=16` and both coordinates below `2^n`. Branch-free prefix scan after
/// <https://github.com/rawrunprotected/hilbert_curves> (public domain).
pub fn hilbert_encode(n: u32, x: u32, y: u32) -> u32 {
    debug_assert!((1..=16).contains(&n));

    let x = x << (16 - n);
    let y = y << (16 - n);

    let mut a = x ^ y;
    let mut b = 0xFFFF ^ a;
    let mut c = 0xFFFF ^ (x | y);
    let mut d = x & (y ^ 0xFFFF);

    let mut big_a = a | (b >> 1);
    let mut big_b = (a >> 1) ^ a;
    let mut big_c = ((c >> 1) ^ (b & (d >> 1))) ^ c;
    let mut big_d = ((a & (c >> 1)) ^ (d >> 1)) ^ d;

    for shift in [2, 4] {
        a = big_a;
        b = big_b;
        c = big_c;
        d = big_d;
        big_a = (a & (a >> shift)) ^ (b & (b >> shift));
        big_b = (a & (b >> shift)) ^ (b & ((a ^ b) >> shift));
        big_c ^= (a & (c >> shift)) ^ (b & (d >> shift));
        big_d ^= (b & (c >> shift)) ^ ((a ^ b) & (d >> shift));
    }

    a = big_a;
    b = big_b;
    c = big_c;
    d = big_d;
    big_c ^= (a & (c >> 8)) ^ (b & (d >> 8));
    big_d ^= (b & (c >> 8)) ^ ((a ^ b) & (d >> 8));

    let a = big_c ^ (big_c >> 1);
    let b = big_d ^ (big_d >> 1);

    let i0 = x ^ y;
    let i1 = b | (0xFFFF ^ (i0 | a));

    ((hilbert_interleave(i1) << 1) | hilbert_interleave(i0)) >> (32 - 2 * n)
}

/// Map a float onto a `u32` whose unsigned order matches the float order. NaN sorts last.
pub fn hilbert_f32_to_u32(f: f32) -> u32 {
    if f.is_nan() {
        return u32::MAX;
    }
    let bits = f.to_bits();
    if bits & 0x8000_0000 != 0 {
        bits ^ u32::MAX
    } else {
        bits | 0x8000_0000
    }
}
