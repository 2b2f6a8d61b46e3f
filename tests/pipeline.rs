//! End-to-end pipeline scenarios: synthetic capture buffers in, animated
//! band state out.

use std::f64::consts::PI;
use std::thread;
use std::time::{Duration, Instant};

use spectro_viz::{RawBuffer, SampleEncoding, Spectrograph, SpectrographSink};

const CANVAS_WIDTH: f64 = 256.0;
const CANVAS_HEIGHT: f64 = 100.0;
const BAND_COUNT: usize = 256;

#[derive(Default)]
struct RecordingSink {
    levels: Vec<(f64, f64)>,
    spectra: Vec<Vec<f64>>,
    bands: Vec<Vec<f64>>,
    meters: Vec<(f64, f64)>,
}

impl SpectrographSink for RecordingSink {
    fn on_levels_updated(&mut self, left: f64, right: f64) {
        self.levels.push((left, right));
    }

    fn on_spectrum_ready(&mut self, magnitudes: &[f64]) {
        self.spectra.push(magnitudes.to_vec());
    }

    fn on_bands_changed(&mut self, heights: &[f64]) {
        self.bands.push(heights.to_vec());
    }

    fn on_level_meters_changed(&mut self, left: f64, right: f64) {
        self.meters.push((left, right));
    }
}

/// Interleaved stereo s16 bytes for a sinusoid landing exactly on `bin` of a
/// `frames`-sample analysis window.
fn sine_buffer_bytes(frames: usize, bin: usize, amplitude: f64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frames * 4);
    for i in 0..frames {
        let phase = 2.0 * PI * bin as f64 * i as f64 / frames as f64;
        let sample = (phase.sin() * amplitude * i16::MAX as f64) as i16;
        bytes.extend_from_slice(&sample.to_ne_bytes());
        bytes.extend_from_slice(&sample.to_ne_bytes());
    }
    bytes
}

fn stereo_s16(bytes: &[u8]) -> RawBuffer<'_> {
    RawBuffer::new(bytes, SampleEncoding::SignedInt, 16, 2, 0.0).unwrap()
}

/// Polls the facade until `count` spectra have been delivered.
fn wait_for_spectra(graph: &mut Spectrograph<RecordingSink>, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while graph.sink().spectra.len() < count {
        graph.poll();
        assert!(Instant::now() < deadline, "timed out waiting for spectrum");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn sinusoid_buffer_produces_one_dominant_peak() {
    const BIN: usize = 32;

    let mut graph = Spectrograph::new(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        BAND_COUNT,
        RecordingSink::default(),
    );

    let bytes = sine_buffer_bytes(1024, BIN, 1.0);
    graph.submit_buffer(&stereo_s16(&bytes));
    wait_for_spectra(&mut graph, 1);

    let sink = graph.sink();
    let spectrum = &sink.spectra[0];
    assert_eq!(spectrum.len(), 256);

    let (peak_bin, &peak) = spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    assert!(
        (peak_bin as i64 - BIN as i64).abs() <= 1,
        "expected peak near bin {BIN}, got {peak_bin}"
    );
    assert!(peak > 0.9, "peak magnitude {peak} too low");

    for (i, &mag) in spectrum.iter().enumerate() {
        if (i as i64 - BIN as i64).abs() > 1 {
            assert!(
                mag < 0.1 * peak,
                "bin {i} holds {mag}, more than 10% of the {peak} peak"
            );
        }
    }

    // Levels were emitted exactly once, and a sine's mean |amplitude| is 2/pi.
    assert_eq!(sink.levels.len(), 1);
    let (left, right) = sink.levels[0];
    assert!((left - 2.0 / PI).abs() < 0.01, "left level {left}");
    assert!((right - 2.0 / PI).abs() < 0.01, "right level {right}");
}

#[test]
fn arrivals_never_lower_bands_between_ticks() {
    let mut graph = Spectrograph::new(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        BAND_COUNT,
        RecordingSink::default(),
    );

    let loud = sine_buffer_bytes(1024, 32, 1.0);
    graph.submit_buffer(&stereo_s16(&loud));
    wait_for_spectra(&mut graph, 1);
    let after_first = graph.model().band_heights();

    // Strictly lower in every band, with no ticks in between.
    let quiet = sine_buffer_bytes(1024, 32, 0.2);
    graph.submit_buffer(&stereo_s16(&quiet));
    wait_for_spectra(&mut graph, 2);

    assert_eq!(graph.model().band_heights(), after_first);
}

#[test]
fn mono_buffer_is_dropped_end_to_end() {
    let mut graph = Spectrograph::new(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        BAND_COUNT,
        RecordingSink::default(),
    );

    let bytes: Vec<u8> = (0..1024i16).flat_map(|v| v.to_ne_bytes()).collect();
    let buffer = RawBuffer::new(&bytes, SampleEncoding::SignedInt, 16, 1, 0.0).unwrap();
    graph.submit_buffer(&buffer);

    thread::sleep(Duration::from_millis(50));
    graph.poll();

    let sink = graph.sink();
    assert!(sink.levels.is_empty());
    assert!(sink.spectra.is_empty());
    assert!(sink.bands.is_empty());
}

#[test]
fn idle_ticks_decay_everything_to_zero() {
    let mut graph = Spectrograph::new(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        BAND_COUNT,
        RecordingSink::default(),
    );

    let bytes = sine_buffer_bytes(1024, 32, 1.0);
    graph.submit_buffer(&stereo_s16(&bytes));
    wait_for_spectra(&mut graph, 1);

    // Heights are non-increasing under decay and settle at the zero fixed point.
    // The meters start near 2.5 * width * (2/pi) and shed 1 per tick, so give
    // the decay enough room to bottom out.
    let mut previous = graph.model().band_heights();
    for _ in 0..700 {
        graph.on_tick();
        let current = graph.model().band_heights();
        for (now, before) in current.iter().zip(previous.iter()) {
            assert!(now <= before, "band rose during idle decay");
            assert!(*now >= 0.0);
        }
        previous = current;
    }
    assert!(previous.iter().all(|&h| h == 0.0));

    let meters = graph.model().level_meters();
    assert_eq!((meters.left, meters.right), (0.0, 0.0));
}

#[test]
fn resize_resets_bands_and_notifies_the_sink() {
    let mut graph = Spectrograph::new(
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        BAND_COUNT,
        RecordingSink::default(),
    );

    let bytes = sine_buffer_bytes(1024, 32, 1.0);
    graph.submit_buffer(&stereo_s16(&bytes));
    wait_for_spectra(&mut graph, 1);

    graph.on_resize(512.0, 200.0, 64);
    assert_eq!(graph.model().band_count(), 64);
    assert!(graph.model().band_heights().iter().all(|&h| h == 1.0));

    let last_notified = graph.sink().bands.last().unwrap();
    assert_eq!(last_notified.len(), 64);
    assert!(last_notified.iter().all(|&h| h == 1.0));
}
