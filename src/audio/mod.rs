pub mod buffer;
pub mod calculator;
pub mod fft;
pub mod normalizer;

pub use buffer::{RawBuffer, SampleEncoding, SampleFormat};
pub use calculator::{SpectrumCalculator, SpectrumUpdate, MIN_WINDOW, SPECTRUM_SIZE};
pub use normalizer::{ChannelLevels, MIN_FRAME_COUNT};
