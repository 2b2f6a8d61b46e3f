//! Real-time audio spectrum analysis with gravity-decay animation state.
//!
//! Raw PCM buffers come in from a capture collaborator, get normalized into a
//! bounded signal plus left/right loudness levels, run through a recursive
//! FFT on a worker thread, and land in a decay model that a renderer polls
//! for smooth bar and meter animation. Rendering, playback transport, and
//! device handling all live outside this crate; the [`Spectrograph`] facade
//! and the [`SpectrographSink`] trait are the seam.

pub mod audio;
pub mod pipeline;
pub mod utils;
pub mod viz;

pub use audio::buffer::{RawBuffer, SampleEncoding, SampleFormat};
pub use audio::calculator::{SpectrumCalculator, SpectrumUpdate, SPECTRUM_SIZE};
pub use audio::normalizer::ChannelLevels;
pub use pipeline::{Spectrograph, SpectrographSink, DEFAULT_TICK_INTERVAL_MS};
pub use utils::Config;
pub use viz::model::{LevelMeters, SpectrographModel, DEFAULT_BAND_COUNT};
