//! Demo feeder: synthesizes a stereo test tone at capture cadence and drives
//! the full pipeline, logging the animated bars to the terminal.
//!
//! Run with `RUST_LOG=info` to see the band rows; `--once` exits after a
//! couple of seconds (smoke-test mode).

use std::env;
use std::f64::consts::PI;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use spectro_viz::{Config, RawBuffer, SampleEncoding, Spectrograph, SpectrographSink};

/// Frames per synthetic capture buffer, matching a common backend size.
const FRAMES_PER_BUFFER: usize = 1024;

/// Canvas the model scales into; the sink re-samples it down to one row.
const CANVAS_WIDTH: f64 = 120.0;
const CANVAS_HEIGHT: f64 = 40.0;

/// Logs a coarse ASCII rendition of the bars roughly twice a second.
struct TerminalSink {
    updates: u64,
}

impl SpectrographSink for TerminalSink {
    fn on_levels_updated(&mut self, left: f64, right: f64) {
        log::debug!("levels: L={left:.3} R={right:.3}");
    }

    fn on_bands_changed(&mut self, heights: &[f64]) {
        self.updates += 1;
        if self.updates % 32 != 0 {
            return;
        }

        let glyphs = [' ', '.', ':', '-', '=', '+', '*', '#'];
        let columns = 64.min(heights.len());
        let stride = heights.len() / columns;
        let row: String = (0..columns)
            .map(|i| {
                let level = heights[i * stride] / CANVAS_HEIGHT;
                let idx = ((level * (glyphs.len() - 1) as f64) as usize).min(glyphs.len() - 1);
                glyphs[idx]
            })
            .collect();
        log::info!("|{row}|");
    }

    fn on_level_meters_changed(&mut self, left: f64, right: f64) {
        log::trace!("meters: L={left:.1} R={right:.1}");
    }
}

fn main() {
    env_logger::init();

    let config = Config::load();
    let once = env::args().any(|a| a == "--once");

    let sample_rate = config.sample_rate();
    let tone_hz = config.tone_hz();
    log::info!(
        "feeding a {tone_hz:.1}Hz tone at {sample_rate}Hz, {} bands",
        config.band_count()
    );

    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    thread::spawn(move || feed_tone(tx, sample_rate, tone_hz));

    let sink = TerminalSink { updates: 0 };
    let mut graph = Spectrograph::new(CANVAS_WIDTH, CANVAS_HEIGHT, config.band_count(), sink);

    // Stereo s16: 4 bytes per frame.
    let micros_per_byte = 1_000_000.0 / (sample_rate as f64 * 4.0);
    let tick = Duration::from_millis(config.tick_interval_ms());
    let deadline = once.then(|| Instant::now() + Duration::from_secs(2));

    let mut next_tick = Instant::now() + tick;
    loop {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        match rx.recv_timeout(timeout) {
            Ok(bytes) => {
                if let Some(buffer) =
                    RawBuffer::new(&bytes, SampleEncoding::SignedInt, 16, 2, micros_per_byte)
                {
                    graph.submit_buffer(&buffer);
                }
                graph.poll();
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                graph.on_tick();
                next_tick += tick;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Producer side: synthesizes signed 16-bit stereo sine buffers at real-time
/// cadence, standing in for the capture collaborator.
fn feed_tone(tx: mpsc::Sender<Vec<u8>>, sample_rate: u32, tone_hz: f64) {
    let step = 2.0 * PI * tone_hz / sample_rate as f64;
    let cadence =
        Duration::from_micros(FRAMES_PER_BUFFER as u64 * 1_000_000 / sample_rate as u64);

    let mut phase = 0.0f64;
    loop {
        let mut bytes = Vec::with_capacity(FRAMES_PER_BUFFER * 4);
        for _ in 0..FRAMES_PER_BUFFER {
            let sample = (phase.sin() * i16::MAX as f64) as i16;
            phase += step;
            bytes.extend_from_slice(&sample.to_ne_bytes());
            bytes.extend_from_slice(&sample.to_ne_bytes());
        }

        if tx.send(bytes).is_err() {
            return;
        }
        thread::sleep(cadence);
    }
}
