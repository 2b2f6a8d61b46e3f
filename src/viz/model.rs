//! Gravity-decay state for the spectrum bars and level meters.
//!
//! Two independent triggers mutate the same per-band record: a new spectrum
//! raises bars (peak-hold, never lowers them), and a fixed-interval tick pulls
//! everything back down. The model is owned by one consumer context; nothing
//! here is shared or locked.

/// Height and delay every bar and meter snaps back to on init and resize.
const NEUTRAL_HEIGHT: f64 = 1.0;
const NEUTRAL_DELAY: u32 = 1;

/// Horizontal scale applied to incoming mean levels before the raise-only
/// merge into the meters (the meters span half the canvas each).
const LEVEL_SCALE: f64 = 2.5;

/// Default number of spectrum bars, matching the published spectrum size.
pub const DEFAULT_BAND_COUNT: usize = 256;

/// One spectrum bar. `delay` counts ticks since the band was last refreshed;
/// the tick handler subtracts it from the height, so a stale band falls
/// faster on every tick.
#[derive(Clone, Copy, Debug)]
struct BandState {
    height: f64,
    delay: u32,
}

impl BandState {
    fn neutral() -> Self {
        Self {
            height: NEUTRAL_HEIGHT,
            delay: NEUTRAL_DELAY,
        }
    }
}

/// Decaying left/right loudness meter heights.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LevelMeters {
    pub left: f64,
    pub right: f64,
}

/// Per-band and per-meter animation state.
///
/// Runs for the lifetime of the visualization: with no incoming data every
/// bar and meter decays to zero and stays there.
pub struct SpectrographModel {
    bands: Vec<BandState>,
    meters: LevelMeters,
    canvas_width: f64,
    canvas_height: f64,
}

impl SpectrographModel {
    pub fn new(canvas_width: f64, canvas_height: f64, band_count: usize) -> Self {
        let mut model = Self {
            bands: Vec::new(),
            meters: LevelMeters::default(),
            canvas_width,
            canvas_height,
        };
        model.resize(canvas_width, canvas_height, band_count);
        model
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Current bar heights in pixel units, one entry per band.
    pub fn band_heights(&self) -> Vec<f64> {
        self.bands.iter().map(|band| band.height).collect()
    }

    pub fn level_meters(&self) -> LevelMeters {
        self.meters
    }

    /// Data arrival. Subsamples one magnitude per stride, scales it into the
    /// pixel-height domain, and merges under the peak-hold rule: a bar only
    /// moves up, never below its still-decaying peak.
    pub fn load_spectrum(&mut self, spectrum: &[f64]) {
        let stride = spectrum.len() / self.bands.len();
        if stride == 0 {
            log::debug!(
                "spectrum of {} bins is too short for {} bands",
                spectrum.len(),
                self.bands.len()
            );
            return;
        }

        for (i, band) in self.bands.iter_mut().enumerate() {
            let value = (spectrum[i * stride] * self.canvas_height).ceil();
            if value > band.height {
                band.height = value;
                band.delay = 0;
            }
        }
    }

    /// Data arrival for the loudness meters, raise-only.
    pub fn load_levels(&mut self, left: f64, right: f64) {
        let scale = LEVEL_SCALE * self.canvas_width;
        if self.meters.left < scale * left {
            self.meters.left = scale * left;
        }
        if self.meters.right < scale * right {
            self.meters.right = scale * right;
        }
    }

    /// Timer tick: accelerating decay on the bars, constant decay on the
    /// meters, everything floored at zero.
    pub fn tick(&mut self) {
        for band in &mut self.bands {
            band.height = (band.height - band.delay as f64).max(0.0);
            band.delay = band.delay.saturating_add(1);
        }
        self.meters.left = (self.meters.left - 1.0).max(0.0);
        self.meters.right = (self.meters.right - 1.0).max(0.0);
    }

    /// Display geometry changed. Band state does not survive this: every bar
    /// and both meters snap back to the neutral value, with no interpolation
    /// across the reset.
    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64, band_count: usize) {
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        self.bands = vec![BandState::neutral(); band_count.max(1)];
        self.meters = LevelMeters {
            left: NEUTRAL_HEIGHT,
            right: NEUTRAL_HEIGHT,
        };
    }
}
