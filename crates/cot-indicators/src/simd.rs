//! Batch channel computation.
//!
//! These functions compute the same lagged Donchian bands as the streaming
//! [`DonchianChannel`](crate::DonchianChannel) for a whole history at once.
//! The SIMD variant uses the `wide` crate for the window extremes.

use wide::f64x4;

use crate::channel::ChannelBands;

/// Maximum of a slice, four lanes at a time.
pub fn max_simd(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let chunks = values.chunks_exact(4);
    let remainder = chunks.remainder();
    let mut acc = f64x4::splat(f64::NEG_INFINITY);

    for chunk in chunks {
        acc = acc.max(f64x4::new([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    let lanes = acc.to_array();
    let mut max = lanes[0].max(lanes[1]).max(lanes[2].max(lanes[3]));
    for &v in remainder {
        max = max.max(v);
    }
    Some(max)
}

/// Minimum of a slice, four lanes at a time.
pub fn min_simd(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let chunks = values.chunks_exact(4);
    let remainder = chunks.remainder();
    let mut acc = f64x4::splat(f64::INFINITY);

    for chunk in chunks {
        acc = acc.min(f64x4::new([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    let lanes = acc.to_array();
    let mut min = lanes[0].min(lanes[1]).min(lanes[2].min(lanes[3]));
    for &v in remainder {
        min = min.min(v);
    }
    Some(min)
}

/// Lagged channel bands for every bar, scalar implementation.
///
/// Output index `i` holds the bands computed from bars `i - period .. i`,
/// `None` for the first `period` bars.
pub fn channel_bands(high: &[f64], low: &[f64], period: usize) -> Vec<Option<ChannelBands>> {
    let len = high.len().min(low.len());
    let mut result = Vec::with_capacity(len);

    for i in 0..len {
        if period == 0 || i < period {
            result.push(None);
            continue;
        }
        let hi = high[i - period..i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = low[i - period..i].iter().copied().fold(f64::INFINITY, f64::min);
        result.push(Some(ChannelBands::from_extremes(hi, lo)));
    }

    result
}

/// Lagged channel bands for every bar, SIMD window extremes.
pub fn channel_bands_simd(high: &[f64], low: &[f64], period: usize) -> Vec<Option<ChannelBands>> {
    let len = high.len().min(low.len());
    let mut result = Vec::with_capacity(len);

    for i in 0..len {
        if period == 0 || i < period {
            result.push(None);
            continue;
        }
        let bands = match (max_simd(&high[i - period..i]), min_simd(&low[i - period..i])) {
            (Some(hi), Some(lo)) => Some(ChannelBands::from_extremes(hi, lo)),
            _ => None,
        };
        result.push(bands);
    }

    result
}
