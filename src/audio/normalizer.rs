//! Converts raw capture buffers into bounded time-domain signals.
//!
//! Runs synchronously on the capture path, so it stays O(frameCount) with a
//! single output allocation. Analysis is best-effort: anything the pipeline
//! cannot handle skips the cycle silently instead of surfacing an error to
//! the audio path.

use crate::audio::buffer::RawBuffer;

/// Buffers below this frame count are not worth transforming at the
/// configured band resolution.
pub const MIN_FRAME_COUNT: usize = 512;

/// Mean absolute normalized amplitude per channel over one buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelLevels {
    pub left: f64,
    pub right: f64,
}

/// Normalize the left channel of `buffer` into roughly [-1, 1] and compute
/// the per-channel mean levels.
///
/// Returns `None` (a silent no-op) for non-stereo layouts and for buffers
/// under [`MIN_FRAME_COUNT`] frames. Non-finite float samples are clamped to
/// 0.0 and left out of the level sums. Holds no state between calls.
pub fn normalize(buffer: &RawBuffer<'_>) -> Option<(Vec<f64>, ChannelLevels)> {
    if buffer.channel_count() != 2 {
        log::debug!(
            "skipping buffer: unsupported channel layout ({} channels)",
            buffer.channel_count()
        );
        return None;
    }

    let frames = buffer.frame_count();
    if frames < MIN_FRAME_COUNT {
        log::debug!(
            "skipping buffer: {frames} frames is below the {MIN_FRAME_COUNT} frame minimum"
        );
        return None;
    }

    let peak = buffer.format().peak();
    let mut signal = Vec::with_capacity(frames);
    let mut left_sum = 0.0;
    let mut right_sum = 0.0;

    for frame in 0..frames {
        let mut left = buffer.sample(frame, 0) / peak;
        let right = buffer.sample(frame, 1) / peak;

        // Float decoding can surface NaN/Inf artifacts; clamp them out of the
        // signal and exclude them from the level accumulation.
        if left.is_finite() {
            left_sum += left.abs();
        } else {
            left = 0.0;
        }
        if right.is_finite() {
            right_sum += right.abs();
        }

        signal.push(left);
    }

    let levels = ChannelLevels {
        left: left_sum / frames as f64,
        right: right_sum / frames as f64,
    };
    Some((signal, levels))
}
