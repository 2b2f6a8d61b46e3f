//! Raw capture buffers and the PCM sample format table.
//!
//! The capture collaborator hands over one hardware buffer at a time as a
//! borrowed byte slice plus format metadata. Format dispatch happens once per
//! buffer through [`SampleFormat`], not once per sample.

use bytemuck::pod_read_unaligned;

/// Sample encoding reported by the capture collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleEncoding {
    SignedInt,
    UnsignedInt,
    Float,
}

/// Peak divisor for float buffers. Decoders occasionally emit samples a hair
/// above full scale, so the divisor sits slightly above unity.
const FLOAT_PEAK: f64 = 1.00003;

/// Closed table over the supported (encoding, bit depth) combinations.
///
/// Each variant knows its peak magnitude and how to decode one sample from
/// raw bytes. Float is only meaningful at 32 bits; every other combination
/// outside this table is an unsupported format and the buffer is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    S8,
    S16,
    S32,
    U8,
    U16,
    U32,
    F32,
}

impl SampleFormat {
    /// Capability lookup: maps declared format metadata onto a table entry,
    /// or `None` when the combination is not supported.
    pub fn from_parts(encoding: SampleEncoding, bits_per_sample: u8) -> Option<Self> {
        match (encoding, bits_per_sample) {
            (SampleEncoding::SignedInt, 8) => Some(SampleFormat::S8),
            (SampleEncoding::SignedInt, 16) => Some(SampleFormat::S16),
            (SampleEncoding::SignedInt, 32) => Some(SampleFormat::S32),
            (SampleEncoding::UnsignedInt, 8) => Some(SampleFormat::U8),
            (SampleEncoding::UnsignedInt, 16) => Some(SampleFormat::U16),
            (SampleEncoding::UnsignedInt, 32) => Some(SampleFormat::U32),
            (SampleEncoding::Float, 32) => Some(SampleFormat::F32),
            _ => None,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::S8 | SampleFormat::U8 => 1,
            SampleFormat::S16 | SampleFormat::U16 => 2,
            SampleFormat::S32 | SampleFormat::U32 | SampleFormat::F32 => 4,
        }
    }

    /// Maximum representable magnitude for the format, used as the
    /// normalization divisor.
    pub fn peak(self) -> f64 {
        match self {
            SampleFormat::S8 => i8::MAX as f64,
            SampleFormat::S16 => i16::MAX as f64,
            SampleFormat::S32 => i32::MAX as f64,
            SampleFormat::U8 => u8::MAX as f64,
            SampleFormat::U16 => u16::MAX as f64,
            SampleFormat::U32 => u32::MAX as f64,
            SampleFormat::F32 => FLOAT_PEAK,
        }
    }

    /// Decode the sample starting at `bytes[0]`, native-endian.
    ///
    /// `bytes` must hold at least `bytes_per_sample()` bytes.
    pub fn read_sample(self, bytes: &[u8]) -> f64 {
        match self {
            SampleFormat::S8 => bytes[0] as i8 as f64,
            SampleFormat::S16 => pod_read_unaligned::<i16>(&bytes[..2]) as f64,
            SampleFormat::S32 => pod_read_unaligned::<i32>(&bytes[..4]) as f64,
            SampleFormat::U8 => bytes[0] as f64,
            SampleFormat::U16 => pod_read_unaligned::<u16>(&bytes[..2]) as f64,
            SampleFormat::U32 => pod_read_unaligned::<u32>(&bytes[..4]) as f64,
            SampleFormat::F32 => pod_read_unaligned::<f32>(&bytes[..4]) as f64,
        }
    }
}

/// Borrowed view over one hardware buffer of interleaved samples.
///
/// The buffer stays owned by the capture collaborator and is only valid for
/// the duration of one `submit_buffer` call; the borrow enforces that no
/// pipeline stage retains it.
pub struct RawBuffer<'a> {
    data: &'a [u8],
    format: SampleFormat,
    channel_count: usize,
    micros_per_byte: f64,
}

impl<'a> RawBuffer<'a> {
    /// Wrap a raw byte buffer. Returns `None` when the declared
    /// (encoding, bit depth) combination is unsupported.
    pub fn new(
        data: &'a [u8],
        encoding: SampleEncoding,
        bits_per_sample: u8,
        channel_count: usize,
        micros_per_byte: f64,
    ) -> Option<Self> {
        let format = SampleFormat::from_parts(encoding, bits_per_sample)?;
        Some(Self {
            data,
            format,
            channel_count,
            micros_per_byte,
        })
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Number of complete interleaved frames in the buffer.
    pub fn frame_count(&self) -> usize {
        let frame_bytes = self.format.bytes_per_sample() * self.channel_count.max(1);
        self.data.len() / frame_bytes
    }

    /// Playback duration hint for the buffer, in milliseconds.
    pub fn duration_hint_ms(&self) -> u64 {
        (self.data.len() as f64 * self.micros_per_byte / 1000.0) as u64
    }

    /// Decode the sample for `channel` within `frame`.
    pub fn sample(&self, frame: usize, channel: usize) -> f64 {
        let stride = self.format.bytes_per_sample();
        let offset = (frame * self.channel_count + channel) * stride;
        self.format.read_sample(&self.data[offset..])
    }
}
