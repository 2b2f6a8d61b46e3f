//! Wires the capture-facing, transform, and visual-state stages together.

use crate::audio::buffer::RawBuffer;
use crate::audio::calculator::SpectrumCalculator;
use crate::audio::normalizer;
use crate::viz::model::SpectrographModel;

/// Nominal decay timer cadence for [`Spectrograph::on_tick`], in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 15;

/// Outbound notifications for the rendering collaborator.
///
/// Every method defaults to a no-op so a sink only implements what it draws.
pub trait SpectrographSink {
    /// Mean absolute left/right levels, once per processed buffer.
    fn on_levels_updated(&mut self, _left: f64, _right: f64) {}

    /// A freshly computed magnitude spectrum, once per completed transform.
    fn on_spectrum_ready(&mut self, _magnitudes: &[f64]) {}

    /// Current bar heights, after every tick and every arrival-driven merge.
    fn on_bands_changed(&mut self, _heights: &[f64]) {}

    /// Current meter heights, after every tick and every level arrival.
    fn on_level_meters_changed(&mut self, _left: f64, _right: f64) {}
}

/// Facade over the whole analysis pipeline.
///
/// Buffers go in through [`submit_buffer`](Self::submit_buffer), decay
/// advances through [`on_tick`](Self::on_tick), and the sink hears about
/// every visible state change. All methods must be driven from the owning
/// context; only the transform itself runs on the internal worker thread.
/// Dropping the facade stops the worker and discards in-flight results.
pub struct Spectrograph<S: SpectrographSink> {
    calculator: SpectrumCalculator,
    model: SpectrographModel,
    sink: S,
}

impl<S: SpectrographSink> Spectrograph<S> {
    pub fn new(canvas_width: f64, canvas_height: f64, band_count: usize, sink: S) -> Self {
        Self {
            calculator: SpectrumCalculator::new(),
            model: SpectrographModel::new(canvas_width, canvas_height, band_count),
            sink,
        }
    }

    /// Capture entry point, called once per available hardware buffer.
    ///
    /// Normalization and level accumulation run synchronously here (cheap,
    /// one pass over the frames); the transform is handed off and never
    /// stalls this path. Unsupported or undersized buffers skip the cycle
    /// silently.
    pub fn submit_buffer(&mut self, buffer: &RawBuffer<'_>) {
        let Some((signal, levels)) = normalizer::normalize(buffer) else {
            return;
        };

        self.sink.on_levels_updated(levels.left, levels.right);
        self.model.load_levels(levels.left, levels.right);
        let meters = self.model.level_meters();
        self.sink.on_level_meters_changed(meters.left, meters.right);

        self.calculator.submit(signal, buffer.duration_hint_ms());
    }

    /// Drain completed spectra into the model, in submission order.
    ///
    /// Call this from the same context as [`on_tick`](Self::on_tick); the
    /// tick handler also drains before it decays.
    pub fn poll(&mut self) {
        while let Some(update) = self.calculator.try_recv() {
            self.sink.on_spectrum_ready(&update.magnitudes);
            self.model.load_spectrum(&update.magnitudes);
            let heights = self.model.band_heights();
            self.sink.on_bands_changed(&heights);
        }
    }

    /// Fixed-interval decay advancement (nominally every
    /// [`DEFAULT_TICK_INTERVAL_MS`] milliseconds).
    pub fn on_tick(&mut self) {
        self.poll();
        self.model.tick();

        let heights = self.model.band_heights();
        self.sink.on_bands_changed(&heights);
        let meters = self.model.level_meters();
        self.sink.on_level_meters_changed(meters.left, meters.right);
    }

    /// Display area changed: hard-resets the animation state.
    pub fn on_resize(&mut self, canvas_width: f64, canvas_height: f64, band_count: usize) {
        self.model.resize(canvas_width, canvas_height, band_count);
        let heights = self.model.band_heights();
        self.sink.on_bands_changed(&heights);
    }

    pub fn model(&self) -> &SpectrographModel {
        &self.model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
